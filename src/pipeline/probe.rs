//! Best-effort polling view of the live stream.
//!
//! Display loops (a UI redrawing at its own refresh rate) don't need every
//! hop — they need "what does the voice look like right now".  [`LiveProbe`]
//! keeps a sliding window of the most recent samples and computes features
//! on demand, reusing the same [`rms`]/[`PitchEstimator`] implementation as
//! the frame pipeline rather than carrying a second algorithm.
//!
//! Because a polling consumer can miss chunks between snapshots, this view
//! is an approximation for live visuals only.  Anything recorded or
//! persisted must come from [`ProsodyPipeline`](super::ProsodyPipeline) or
//! [`PcmCapture`](crate::record::PcmCapture), which see every sample.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::dsp::PitchConfig;
//! use prosody_engine::pipeline::LiveProbe;
//!
//! let mut probe = LiveProbe::new(44_100, PitchConfig::default());
//! let tone: Vec<f32> = (0..4096)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 200.0 * i as f32 / 44_100.0).sin())
//!     .collect();
//! probe.push(&tone);
//!
//! let snap = probe.snapshot();
//! assert!(snap.energy > 0.3);
//! let f0 = snap.f0.unwrap();
//! assert!((f0 - 200.0).abs() / 200.0 < 0.02);
//! ```

use crate::dsp::{rms, PitchConfig, PitchEstimator, Tonality};

/// Sliding-window length in samples.  Matches the 2048-sample analyser
/// window the live view was tuned with.
pub const PROBE_WINDOW_LEN: usize = 2048;

// ---------------------------------------------------------------------------
// ProbeSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time feature estimate over the probe's window.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSnapshot {
    /// RMS energy of the window.
    pub energy: f32,
    /// Pitch estimate in Hz, `None` when silent or aperiodic.
    pub f0: Option<f32>,
    /// Register label derived from `f0`.
    pub tonality: Tonality,
}

// ---------------------------------------------------------------------------
// LiveProbe
// ---------------------------------------------------------------------------

/// Sliding window over the most recent samples, analysed on demand.
pub struct LiveProbe {
    window: Vec<f32>,
    sample_rate: u32,
    pitch: PitchEstimator,
}

impl LiveProbe {
    /// Create a probe for a stream at `sample_rate` Hz.
    pub fn new(sample_rate: u32, pitch_config: PitchConfig) -> Self {
        Self {
            window: Vec::with_capacity(PROBE_WINDOW_LEN),
            sample_rate,
            pitch: PitchEstimator::new(pitch_config),
        }
    }

    /// Append samples, keeping only the most recent window's worth.
    pub fn push(&mut self, samples: &[f32]) {
        if samples.len() >= PROBE_WINDOW_LEN {
            self.window.clear();
            self.window
                .extend_from_slice(&samples[samples.len() - PROBE_WINDOW_LEN..]);
            return;
        }
        let overflow = (self.window.len() + samples.len()).saturating_sub(PROBE_WINDOW_LEN);
        if overflow > 0 {
            self.window.drain(..overflow);
        }
        self.window.extend_from_slice(samples);
    }

    /// Number of samples currently in the window.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Analyse the current window.
    ///
    /// An empty window yields a silent snapshot (`energy = 0`, no pitch).
    pub fn snapshot(&self) -> ProbeSnapshot {
        let energy = rms(&self.window);
        let f0 = self.pitch.estimate(&self.window, self.sample_rate);
        ProbeSnapshot {
            energy,
            f0,
            tonality: Tonality::classify(f0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
