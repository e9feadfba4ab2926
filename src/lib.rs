//! # Prosody Engine
//!
//! Real-time prosodic feature extraction from a live audio stream, plus a
//! raw-PCM capture path that serialises recording sessions to canonical
//! mono PCM16 WAV bytes.
//!
//! ## Features
//!
//! - **Feature stream**: per-frame RMS, zero-crossing rate, autocorrelation
//!   F0 estimate and a voiced/unvoiced decision, emitted as an ordered
//!   [`FeatureFrame`](dsp::FeatureFrame) stream with monotonic timestamps.
//! - **Recording**: lossless raw-sample capture sessions encoded as
//!   byte-exact 44-byte-header WAV files, ready for upload.
//! - **Derived views**: pitch-register tonality labels and fixed-width
//!   energy contours for UI visualisers.
//!
//! ## Quick Start
//!
//! ```rust
//! use prosody_engine::config::AnalysisConfig;
//! use prosody_engine::dsp::VadConfig;
//! use prosody_engine::pipeline::ProsodyPipeline;
//!
//! // A pipeline for a 16 kHz mono stream with the default 40 ms / 20 ms
//! // framing.
//! let mut pipeline = ProsodyPipeline::new(16_000, &AnalysisConfig::default(), VadConfig::default());
//! pipeline.start();
//!
//! // Feed chunks as the audio source delivers them.
//! for frame in pipeline.process_chunk(&vec![0.0_f32; 1600]) {
//!     println!("{:.0} ms: rms={:.3} voiced={}", frame.timestamp_ms, frame.rms, frame.voiced);
//! }
//! pipeline.stop();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio source → StreamFramer → {rms, zcr, PitchEstimator, VoiceActivityGate}
//!             │                                   │
//!             │                                   ▼
//!             │                          FeatureFrame stream
//!             └→ PcmCapture ──stop()──▶ ClipQuality → encode_wav → bytes
//! ```
//!
//! The audio callback only pushes chunks across a channel; framing,
//! analysis and encoding all run on the consuming side.  See the module
//! documentation for details.

pub mod audio;
pub mod config;
pub mod dsp;
pub mod pipeline;
pub mod record;

// Re-export the main types
pub use config::AppConfig;
pub use dsp::FeatureFrame;
pub use pipeline::ProsodyPipeline;
pub use record::PcmCapture;
