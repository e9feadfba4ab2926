//! Energy + ZCR voice activity gate.
//!
//! A frame counts as voiced when it is loud enough **and** smooth enough:
//! high zero-crossing rates at speech levels indicate fricatives or noise
//! rather than voiced phonation.
//!
//! The source analysers carried two slightly different threshold pairs
//! (the streaming gate at `0.02 / 0.2`, the polling silence floor at
//! `0.01`); both are explicit configuration here — the gate thresholds in
//! [`VadConfig`], the pitch floor in
//! [`PitchConfig`](crate::dsp::PitchConfig).
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::dsp::{VadConfig, VoiceActivityGate};
//!
//! let gate = VoiceActivityGate::new(VadConfig::default());
//! assert!(gate.is_voiced(0.1, 0.05));  // loud, low ZCR → voiced
//! assert!(!gate.is_voiced(0.005, 0.05)); // too quiet
//! assert!(!gate.is_voiced(0.1, 0.4));    // too noisy
//! ```

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// VadConfig
// ---------------------------------------------------------------------------

/// Thresholds for the voicing decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    /// Minimum RMS for a frame to count as voiced (default: `0.02`).
    pub energy_threshold: f32,
    /// Maximum ZCR for a frame to count as voiced (default: `0.2`).
    pub zcr_threshold: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 0.02,
            zcr_threshold: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceActivityGate
// ---------------------------------------------------------------------------

/// Stateless per-frame voiced/unvoiced decision.
#[derive(Debug, Clone)]
pub struct VoiceActivityGate {
    config: VadConfig,
}

impl VoiceActivityGate {
    /// Create a gate with the given thresholds.
    pub fn new(config: VadConfig) -> Self {
        Self { config }
    }

    /// Thresholds currently in use.
    pub fn config(&self) -> VadConfig {
        self.config
    }

    /// `true` when `rms` exceeds the energy floor and `zcr` stays below the
    /// noisiness ceiling.
    pub fn is_voiced(&self, rms: f32, zcr: f32) -> bool {
        rms > self.config.energy_threshold && zcr < self.config.zcr_threshold
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loud_smooth_frame_is_voiced() {
        let gate = VoiceActivityGate::new(VadConfig::default());
        assert!(gate.is_voiced(0.1, 0.05));
    }

    #[test]
    fn quiet_frame_is_unvoiced() {
        let gate = VoiceActivityGate::new(VadConfig::default());
        assert!(!gate.is_voiced(0.01, 0.05));
    }

    #[test]
    fn noisy_frame_is_unvoiced() {
        let gate = VoiceActivityGate::new(VadConfig::default());
        assert!(!gate.is_voiced(0.1, 0.3));
    }

    #[test]
    fn thresholds_are_exclusive_bounds() {
        let gate = VoiceActivityGate::new(VadConfig::default());
        // exactly at the energy floor → not voiced (strict >)
        assert!(!gate.is_voiced(0.02, 0.05));
        // exactly at the ZCR ceiling → not voiced (strict <)
        assert!(!gate.is_voiced(0.1, 0.2));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let gate = VoiceActivityGate::new(VadConfig {
            energy_threshold: 0.001,
            zcr_threshold: 0.5,
        });
        assert!(gate.is_voiced(0.01, 0.3));
    }

    #[test]
    fn silence_is_never_voiced() {
        let gate = VoiceActivityGate::new(VadConfig::default());
        assert!(!gate.is_voiced(0.0, 0.0));
    }
}
