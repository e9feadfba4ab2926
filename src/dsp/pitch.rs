//! Autocorrelation-based fundamental-frequency (F0) estimation.
//!
//! One shared implementation serves every call site; the thresholds that
//! used to differ between the streaming and polling analysers are all
//! explicit [`PitchConfig`] fields.
//!
//! # Algorithm
//!
//! 1. Frames whose RMS is below `silence_rms_threshold` return `None`
//!    without correlating.
//! 2. Near-zero leading/trailing samples (`|x| < edge_trim_threshold`) are
//!    trimmed to reduce edge-induced correlation artifacts.
//! 3. `c[lag] = Σ x[i]·x[i+lag]` is computed for every integer lag in
//!    `[sr/max_f0, sr/min_f0]`, clamped to the trimmed length.
//! 4. The lag with the largest positive correlation wins; if no lag in
//!    range correlates positively the frame is unvoiced.
//! 5. Sub-harmonic comparison: when `c[best_lag/k]` (k = 2, 3) retains at
//!    least `subharmonic_ratio` of the peak, the shorter lag is preferred,
//!    so a period-doubled peak loses to the true period.
//! 6. Parabolic interpolation around the winning lag refines the integer
//!    estimate; the refined lag is clamped into the valid range, so the
//!    returned frequency always lies within `[min_f0, max_f0]`.
//!
//! Degenerate inputs — empty frames, frames that trim to nothing, lag
//! ranges that collapse — short-circuit to `None`.  The estimator never
//! panics and never divides by zero.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::dsp::{PitchConfig, PitchEstimator};
//!
//! let estimator = PitchEstimator::new(PitchConfig::default());
//! let sr = 44_100u32;
//! let frame: Vec<f32> = (0..1764) // 40 ms
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sr as f32).sin())
//!     .collect();
//!
//! let f0 = estimator.estimate(&frame, sr).unwrap();
//! assert!((f0 - 220.0).abs() / 220.0 < 0.02);
//! ```

use super::features::rms;

// ---------------------------------------------------------------------------
// PitchConfig
// ---------------------------------------------------------------------------

/// Thresholds and search bounds for [`PitchEstimator`].
#[derive(Debug, Clone, PartialEq)]
pub struct PitchConfig {
    /// Lowest fundamental considered, in Hz (default: `70.0`).
    pub min_f0: f32,
    /// Highest fundamental considered, in Hz (default: `350.0`).
    pub max_f0: f32,
    /// Frames with RMS below this floor are unvoiced without further
    /// analysis (default: `0.01`).
    pub silence_rms_threshold: f32,
    /// Leading/trailing samples with `|x|` below this are trimmed before
    /// correlating (default: `0.02`).
    pub edge_trim_threshold: f32,
    /// A lag `best/k` replaces the raw peak when its correlation retains at
    /// least this fraction of the peak value (default: `0.9`).
    pub subharmonic_ratio: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            min_f0: 70.0,
            max_f0: 350.0,
            silence_rms_threshold: 0.01,
            edge_trim_threshold: 0.02,
            subharmonic_ratio: 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// PitchEstimator
// ---------------------------------------------------------------------------

/// Per-frame F0 estimator.  Holds only configuration — no state survives
/// between frames, so one instance can serve any number of pipelines.
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    config: PitchConfig,
}

impl PitchEstimator {
    /// Create an estimator with the given configuration.
    pub fn new(config: PitchConfig) -> Self {
        Self { config }
    }

    /// Configuration currently in use.
    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Estimate the fundamental frequency of `frame` in Hz.
    ///
    /// Returns `None` for silent, degenerate, or aperiodic frames.  A
    /// returned frequency always lies within `[min_f0, max_f0]`.
    pub fn estimate(&self, frame: &[f32], sample_rate: u32) -> Option<f32> {
        if frame.is_empty() || sample_rate == 0 {
            return None;
        }
        if rms(frame) < self.config.silence_rms_threshold {
            return None;
        }

        let trimmed = trim_edges(frame, self.config.edge_trim_threshold);
        if trimmed.len() < 2 {
            return None;
        }

        let sr = sample_rate as f32;
        let min_lag = ((sr / self.config.max_f0).round() as usize).max(1);
        let max_lag = ((sr / self.config.min_f0).round() as usize).min(trimmed.len() - 1);
        if min_lag > max_lag {
            return None;
        }

        // c[i] holds the correlation at lag (min_lag + i).
        let corr: Vec<f32> = (min_lag..=max_lag)
            .map(|lag| autocorrelation_at(trimmed, lag))
            .collect();

        let (best_idx, &best_val) = corr
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        if best_val <= 0.0 {
            log::debug!("pitch: no positive correlation in lag range [{min_lag}, {max_lag}]");
            return None;
        }

        let best_lag = min_lag + best_idx;
        let chosen = self.prefer_subharmonic(&corr, min_lag, best_lag, best_val);

        // Clamp to the exact period bounds (not the rounded integer lags)
        // so the returned frequency always respects [min_f0, max_f0].
        let refined = refine_lag(&corr, min_lag, chosen)
            .clamp(sr / self.config.max_f0, sr / self.config.min_f0);
        Some(sr / refined)
    }

    /// When the peak sits on a period multiple, a lag at `best/k` keeps
    /// nearly the same correlation; prefer the shortest such lag.
    fn prefer_subharmonic(
        &self,
        corr: &[f32],
        min_lag: usize,
        best_lag: usize,
        best_val: f32,
    ) -> usize {
        let mut chosen = best_lag;
        for k in [2usize, 3] {
            let candidate = ((best_lag as f32 / k as f32).round()) as usize;
            if candidate < min_lag || candidate >= chosen {
                continue;
            }
            let value = corr[candidate - min_lag];
            if value >= self.config.subharmonic_ratio * best_val {
                chosen = candidate;
            }
        }
        if chosen != best_lag {
            log::debug!("pitch: sub-harmonic check moved lag {best_lag} -> {chosen}");
        }
        chosen
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Sub-slice of `frame` with near-zero edges removed.
///
/// Returns an empty slice when every sample is below `threshold`.
fn trim_edges(frame: &[f32], threshold: f32) -> &[f32] {
    let first = match frame.iter().position(|s| s.abs() >= threshold) {
        Some(i) => i,
        None => return &frame[0..0],
    };
    // A first match guarantees a last match.
    let last = frame.iter().rposition(|s| s.abs() >= threshold).unwrap_or(first);
    &frame[first..=last]
}

/// Raw autocorrelation `Σ x[i]·x[i+lag]`.  Caller guarantees `lag < len`.
fn autocorrelation_at(frame: &[f32], lag: usize) -> f32 {
    frame[..frame.len() - lag]
        .iter()
        .zip(&frame[lag..])
        .map(|(a, b)| a * b)
        .sum()
}

/// Parabolic interpolation of the correlation peak at integer lag `lag`.
///
/// Fits a parabola through the peak and its neighbours and returns the
/// fractional lag of the vertex.  Falls back to the integer lag when a
/// neighbour is out of range or the curvature is degenerate.
fn refine_lag(corr: &[f32], min_lag: usize, lag: usize) -> f32 {
    let idx = lag - min_lag;
    if idx == 0 || idx + 1 >= corr.len() {
        return lag as f32;
    }
    let (a, b, c) = (corr[idx - 1], corr[idx], corr[idx + 1]);
    let denom = a - 2.0 * b + c;
    if denom.abs() < 1e-12 {
        return lag as f32;
    }
    let shift = (a - c) / (2.0 * denom);
    lag as f32 + shift.clamp(-0.5, 0.5)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
