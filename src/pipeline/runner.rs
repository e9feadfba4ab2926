//! Prosody pipeline — framing and per-frame analysis in arrival order.
//!
//! [`ProsodyPipeline`] owns a [`StreamFramer`] plus the three extractors
//! and turns raw sample chunks into an ordered [`FeatureFrame`] stream.
//! All buffers are per-instance fields, so independent pipelines never
//! share state and each can be unit-tested in isolation.
//!
//! Two ways to drive it:
//!
//! * **Callback-driven** — call [`ProsodyPipeline::process_chunk`] from the
//!   context that receives audio.  One chunk is fully processed before the
//!   next arrives; frames are never reordered or deferred.
//! * **Channel-driven** — hand an mpsc receiver of [`AudioChunk`]s to
//!   [`ProsodyPipeline::run`], which blocks until the source closes and
//!   forwards every frame to an output channel.  This is the path the CLI
//!   uses; the audio callback stays free of DSP.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::config::AnalysisConfig;
//! use prosody_engine::dsp::VadConfig;
//! use prosody_engine::pipeline::ProsodyPipeline;
//!
//! let mut pipeline = ProsodyPipeline::new(16_000, &AnalysisConfig::default(), VadConfig::default());
//! pipeline.start();
//!
//! // 100 ms of silence at 16 kHz: 40 ms frames every 20 ms → 4 frames
//! let frames = pipeline.process_chunk(&vec![0.0_f32; 1600]);
//! assert_eq!(frames.len(), 4);
//! assert!(frames.iter().all(|f| !f.voiced && f.f0.is_none()));
//! pipeline.stop();
//! ```

use std::sync::mpsc;

use crate::audio::{AudioChunk, AudioFrame, StreamFramer};
use crate::config::AnalysisConfig;
use crate::dsp::{rms, zcr, FeatureFrame, PitchEstimator, VadConfig, VoiceActivityGate};

use super::state::PipelineState;

// ---------------------------------------------------------------------------
// ProsodyPipeline
// ---------------------------------------------------------------------------

/// Orchestrates framer → {features, pitch, gate} and stamps the emitted
/// stream with monotonically increasing timestamps.
pub struct ProsodyPipeline {
    state: PipelineState,
    framer: StreamFramer,
    pitch: PitchEstimator,
    gate: VoiceActivityGate,
    sample_rate: u32,
    /// Milliseconds covered by one hop; also the frame spacing.
    hop_ms: f64,
    /// Frames emitted since `start()`.
    hop_count: u64,
}

impl ProsodyPipeline {
    /// Build a pipeline for a stream at `sample_rate` Hz.
    ///
    /// Frame and hop lengths are derived from the configured millisecond
    /// values and fixed for the lifetime of the instance.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate == 0` or the configured frame/hop lengths
    /// round to zero samples (sub-millisecond misconfiguration).
    pub fn new(sample_rate: u32, analysis: &AnalysisConfig, vad: VadConfig) -> Self {
        assert!(sample_rate > 0, "sample_rate must be > 0");
        let frame_len = analysis.frame_len_samples(sample_rate);
        let hop_len = analysis.hop_len_samples(sample_rate);

        Self {
            state: PipelineState::Idle,
            framer: StreamFramer::new(frame_len, hop_len, sample_rate),
            pitch: PitchEstimator::new(analysis.pitch_config()),
            gate: VoiceActivityGate::new(vad),
            sample_rate,
            hop_ms: hop_len as f64 * 1000.0 / sample_rate as f64,
            hop_count: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Sample rate this pipeline was built for, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Enter `Active`, resetting the framer and the timestamp counter.
    ///
    /// Starting an already-active pipeline restarts it from a clean
    /// buffer.
    pub fn start(&mut self) {
        self.framer.reset();
        self.hop_count = 0;
        self.state = PipelineState::Active;
        log::debug!("pipeline: start ({} Hz)", self.sample_rate);
    }

    /// Return to `Idle`, discarding any buffered sub-frame samples.
    ///
    /// Safe to call repeatedly; a second `stop()` does nothing.
    pub fn stop(&mut self) {
        if self.state == PipelineState::Idle {
            return;
        }
        let dropped = self.framer.buffered();
        self.framer.reset();
        self.state = PipelineState::Idle;
        log::debug!("pipeline: stop ({dropped} buffered samples discarded)");
    }

    /// Feed one mono chunk and collect every feature frame it completes.
    ///
    /// Returns an empty vec while `Idle`.  Frames come back in strict
    /// arrival order with `timestamp_ms = hop_count × hop_duration_ms`.
    pub fn process_chunk(&mut self, chunk: &[f32]) -> Vec<FeatureFrame> {
        if !self.state.is_active() {
            return Vec::new();
        }
        self.framer
            .push(chunk)
            .iter()
            .map(|frame| self.analyze(frame))
            .collect()
    }

    /// Drive the pipeline from a chunk channel until the source closes.
    ///
    /// Chunks are downmixed to mono and processed in arrival order; every
    /// emitted frame is forwarded to `frame_tx`.  When the source channel
    /// closes (or errors away), or the frame consumer disappears, the
    /// pipeline transitions to `Idle` and the call returns — it never
    /// panics out of the processing loop.
    pub fn run(&mut self, chunk_rx: mpsc::Receiver<AudioChunk>, frame_tx: mpsc::Sender<FeatureFrame>) {
        self.start();

        while let Ok(chunk) = chunk_rx.recv() {
            if chunk.sample_rate != self.sample_rate {
                log::warn!(
                    "pipeline: chunk at {} Hz on a {} Hz pipeline, skipping",
                    chunk.sample_rate,
                    self.sample_rate
                );
                continue;
            }
            let mono = chunk.into_mono();
            for frame in self.process_chunk(&mono) {
                if frame_tx.send(frame).is_err() {
                    log::info!("pipeline: frame consumer gone, stopping");
                    self.stop();
                    return;
                }
            }
        }

        log::info!("pipeline: audio source closed");
        self.stop();
    }

    /// Run all three extractors over one analysis frame.
    fn analyze(&mut self, frame: &AudioFrame) -> FeatureFrame {
        let rms = rms(&frame.samples);
        let zcr = zcr(&frame.samples);
        let f0 = self.pitch.estimate(&frame.samples, frame.sample_rate);
        let voiced = self.gate.is_voiced(rms, zcr);

        let timestamp_ms = self.hop_count as f64 * self.hop_ms;
        self.hop_count += 1;

        FeatureFrame {
            timestamp_ms,
            frame_duration_ms: self.hop_ms,
            rms,
            zcr,
            f0,
            jitter: 0.0,
            shimmer: 0.0,
            voiced,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
