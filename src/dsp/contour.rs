//! Energy contour of an emitted feature stream.
//!
//! Visual collaborators (sparkline, heatmap) render a fixed number of bars
//! regardless of how long the speaker talked.  [`EnergyContour`] folds a
//! sequence of [`FeatureFrame`]s into `n` equal-width RMS bins.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::dsp::{EnergyContour, FeatureFrame};
//!
//! let frames: Vec<FeatureFrame> = (0..100)
//!     .map(|i| FeatureFrame {
//!         timestamp_ms: i as f64 * 20.0,
//!         frame_duration_ms: 20.0,
//!         rms: 0.25,
//!         zcr: 0.05,
//!         f0: None,
//!         jitter: 0.0,
//!         shimmer: 0.0,
//!         voiced: false,
//!     })
//!     .collect();
//!
//! let contour = EnergyContour::from_frames(&frames, 20);
//! assert_eq!(contour.bins.len(), 20);
//! assert!((contour.peak() - 0.25).abs() < 1e-6);
//! ```

use super::features::FeatureFrame;

// ---------------------------------------------------------------------------
// EnergyContour
// ---------------------------------------------------------------------------

/// Equal-width RMS bins over a feature stream, each in `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct EnergyContour {
    /// Mean RMS per bin, clamped to `[0.0, 1.0]`.
    pub bins: Vec<f32>,
}

impl EnergyContour {
    /// Fold `frames` into `num_bins` bins.
    ///
    /// The frames are split into `num_bins` equal-sized runs; the mean RMS
    /// of each run becomes one bin.  When there are fewer frames than bins
    /// the remaining bins are padded with `0.0`.  `num_bins == 0` yields an
    /// empty contour.
    pub fn from_frames(frames: &[FeatureFrame], num_bins: usize) -> Self {
        if num_bins == 0 {
            return Self { bins: Vec::new() };
        }
        if frames.is_empty() {
            return Self {
                bins: vec![0.0; num_bins],
            };
        }

        let run = (frames.len() / num_bins).max(1);
        let mut bins: Vec<f32> = frames
            .chunks(run)
            .take(num_bins)
            .map(|chunk| {
                let mean = chunk.iter().map(|f| f.rms).sum::<f32>() / chunk.len() as f32;
                mean.min(1.0)
            })
            .collect();

        bins.resize(num_bins, 0.0);
        Self { bins }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest bin value (useful for display normalisation).
    pub fn peak(&self) -> f32 {
        self.bins.iter().cloned().fold(0.0_f32, f32::max)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
