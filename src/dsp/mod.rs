//! Per-frame DSP — features, pitch, voicing, and derived views.
//!
//! Everything in this module is a pure function of one analysis frame (or
//! of an already-emitted feature stream): no internal state, no side
//! effects, deterministic output.  The pipeline in [`crate::pipeline`]
//! owns the sequencing; this module owns the math.
//!
//! | Part | Role |
//! |------|------|
//! | [`rms`] / [`zcr`] | energy and zero-crossing rate of a frame |
//! | [`PitchEstimator`] | autocorrelation F0 estimate bounded to a range |
//! | [`VoiceActivityGate`] | energy + ZCR voiced/unvoiced decision |
//! | [`Tonality`] | coarse pitch-register label for coaching UI |
//! | [`EnergyContour`] | fixed-width RMS bins over a feature stream |

pub mod contour;
pub mod features;
pub mod pitch;
pub mod tonality;
pub mod vad;

pub use contour::EnergyContour;
pub use features::{rms, zcr, FeatureFrame};
pub use pitch::{PitchConfig, PitchEstimator};
pub use tonality::Tonality;
pub use vad::{VadConfig, VoiceActivityGate};
