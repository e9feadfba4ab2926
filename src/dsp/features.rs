//! Per-frame acoustic features and the emitted [`FeatureFrame`] record.
//!
//! [`rms`] and [`zcr`] are pure functions of one analysis frame — no state,
//! no side effects, deterministic.  The pipeline combines them with the
//! pitch estimate and the voicing gate into one [`FeatureFrame`] per hop.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::dsp::{rms, zcr};
//!
//! // A frame alternating +0.5 / -0.5 crosses zero at every sample.
//! let frame: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
//! assert!((rms(&frame) - 0.5).abs() < 1e-6);
//! assert!(zcr(&frame) > 0.9);
//! ```

use serde::Serialize;

// ---------------------------------------------------------------------------
// rms
// ---------------------------------------------------------------------------

/// Root-mean-square amplitude of `frame`: `sqrt(mean(x²))`.
///
/// Returns `0.0` for an empty frame.  The result is always `>= 0`.
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mean_sq: f32 = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt()
}

// ---------------------------------------------------------------------------
// zcr
// ---------------------------------------------------------------------------

/// Zero-crossing rate of `frame`: sign changes divided by frame length.
///
/// Uses the `x >= 0` sign convention, so a transition from `-0.1` to `0.0`
/// counts as a crossing.  The result lies in `[0, 1]`; an empty frame
/// returns `0.0`.
pub fn zcr(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / frame.len() as f32
}

// ---------------------------------------------------------------------------
// FeatureFrame
// ---------------------------------------------------------------------------

/// One emitted feature record, covering a single analysis hop.
///
/// Instances are immutable once emitted and owned by whichever consumer
/// receives the stream.  `f0` serialises as `number | null`, matching the
/// wire shape the UI and coaching collaborators expect.
///
/// `jitter` and `shimmer` are placeholder fields carried for the consumers'
/// schema; they are always `0.0` (cycle-to-cycle perturbation analysis is a
/// non-goal of this engine).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureFrame {
    /// Milliseconds since the pipeline started: `hop_count × frame_duration_ms`.
    pub timestamp_ms: f64,
    /// Spacing between successive frames in milliseconds (one hop).
    pub frame_duration_ms: f64,
    /// Root-mean-square amplitude, `>= 0`.
    pub rms: f32,
    /// Zero-crossing rate in `[0, 1]`.
    pub zcr: f32,
    /// Fundamental frequency in Hz, or `None` for unvoiced/silent frames.
    /// When present, lies within the configured `[min_f0, max_f0]` range.
    pub f0: Option<f32>,
    /// Placeholder, always `0.0`.
    pub jitter: f32,
    /// Placeholder, always `0.0`.
    pub shimmer: f32,
    /// Combined energy + ZCR voicing decision for this frame.
    pub voiced: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- rms ---------------------------------------------------------------

    #[test]
    fn rms_of_empty_frame_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms(&vec![0.0_f32; 512]), 0.0);
    }

    #[test]
    fn rms_of_constant_signal_equals_amplitude() {
        let frame = vec![0.3_f32; 1024];
        assert!((rms(&frame) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn rms_of_sine_is_amplitude_over_sqrt2() {
        // 220 Hz sine at 44.1 kHz, amplitude 0.8, whole number of periods
        let sr = 44_100.0_f32;
        let n = 4410; // 100 ms, 22 full periods of 220 Hz
        let frame: Vec<f32> = (0..n)
            .map(|i| 0.8 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sr).sin())
            .collect();
        let expected = 0.8 / 2.0_f32.sqrt();
        let got = rms(&frame);
        assert!(
            (got - expected).abs() / expected < 0.01,
            "rms = {got}, expected {expected}"
        );
    }

    // ---- zcr ---------------------------------------------------------------

    #[test]
    fn zcr_of_empty_frame_is_zero() {
        assert_eq!(zcr(&[]), 0.0);
    }

    #[test]
    fn zcr_of_dc_signal_is_zero() {
        assert_eq!(zcr(&vec![0.5_f32; 256]), 0.0);
    }

    #[test]
    fn zcr_of_alternating_signal_is_near_one() {
        let frame: Vec<f32> = (0..200)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        // 199 crossings over 200 samples
        assert!((zcr(&frame) - 0.995).abs() < 1e-6);
    }

    #[test]
    fn zcr_is_bounded_to_unit_interval() {
        let frame: Vec<f32> = (0..1000).map(|i| ((i * 7919) % 13) as f32 - 6.0).collect();
        let z = zcr(&frame);
        assert!((0.0..=1.0).contains(&z), "zcr = {z}");
    }

    #[test]
    fn zcr_counts_sign_convention_at_zero() {
        // -0.1 → 0.0 is a crossing under the >= 0 convention
        assert!(zcr(&[-0.1, 0.0]) > 0.0);
        // 0.0 → 0.1 is not (both non-negative)
        assert_eq!(zcr(&[0.0, 0.1]), 0.0);
    }

    // ---- FeatureFrame ------------------------------------------------------

    #[test]
    fn feature_frame_serialises_f0_as_null_when_absent() {
        let frame = FeatureFrame {
            timestamp_ms: 20.0,
            frame_duration_ms: 20.0,
            rms: 0.1,
            zcr: 0.05,
            f0: None,
            jitter: 0.0,
            shimmer: 0.0,
            voiced: false,
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"f0\":null"), "json: {json}");
    }

    #[test]
    fn feature_frame_serialises_f0_as_number_when_present() {
        let frame = FeatureFrame {
            timestamp_ms: 0.0,
            frame_duration_ms: 20.0,
            rms: 0.2,
            zcr: 0.04,
            f0: Some(180.0),
            jitter: 0.0,
            shimmer: 0.0,
            voiced: true,
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"f0\":180.0"), "json: {json}");
        assert!(json.contains("\"voiced\":true"), "json: {json}");
    }
}
