//! Prosody pipeline — chunk stream in, feature stream out.
//!
//! # Architecture
//!
//! ```text
//! AudioChunk (mpsc, from the audio callback)
//!        │
//!        ▼
//! ProsodyPipeline::run()        ← worker thread
//!        │
//!        ├─ StreamFramer        fixed-length overlapping frames
//!        ├─ rms / zcr           per-frame energy + noisiness
//!        ├─ PitchEstimator      autocorrelation F0
//!        └─ VoiceActivityGate   voiced/unvoiced decision
//!        │
//!        ▼
//! FeatureFrame (mpsc) ──▶ UI / coaching consumers
//! ```
//!
//! One pipeline instance per consumer session; instances own their buffers
//! exclusively and never share state.

pub mod probe;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use probe::{LiveProbe, ProbeSnapshot};
pub use runner::ProsodyPipeline;
pub use state::PipelineState;
