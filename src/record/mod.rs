//! Recording path — raw-PCM capture sessions and WAV serialisation.
//!
//! # Flow
//!
//! ```text
//! AudioChunk (mono) → PcmCapture::push_chunk → CaptureSession buffer
//!                                            │
//!                                      stop()┘
//!                                            ▼
//!                        ClipQuality::validate → encode_wav → bytes
//! ```
//!
//! The recording path never drops or reorders samples; the encoded file is
//! an exact, deterministic copy of the captured stream.

pub mod quality;
pub mod session;
pub mod wav;

pub use quality::{ClipError, ClipQuality};
pub use session::{CaptureSession, PcmCapture, SessionState};
pub use wav::{encode_wav, WAV_HEADER_LEN};
