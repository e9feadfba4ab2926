//! Audio input — capture, downmix, framing.
//!
//! # Flow
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → into_mono
//!           → StreamFramer → AudioFrame → crate::pipeline
//!                         └→ crate::record (raw chunks, recording path)
//! ```
//!
//! The callback side only copies and forwards; framing and everything
//! downstream runs on the consuming thread.

pub mod capture;
pub mod downmix;
pub mod framer;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use downmix::stereo_to_mono;
pub use framer::{AudioFrame, StreamFramer};
