//! Live audio input via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle for the
//! analysis and recording paths.  The audio callback does no DSP: each
//! hardware buffer is copied into an [`AudioChunk`] and sent over an mpsc
//! channel, so all processing happens on the receiving side of the channel
//! boundary.  The returned [`StreamHandle`] is a RAII guard — dropping it
//! releases the underlying stream on every exit path, error paths included.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use thiserror::Error;

use super::downmix::stereo_to_mono;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One hardware buffer as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]` at the device's native
/// rate.  Both the prosody pipeline and the capture session consume mono;
/// use [`AudioChunk::into_mono`] before handing the chunk to either.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

impl AudioChunk {
    /// Downmix to mono by averaging interleaved channels.
    ///
    /// Already-mono chunks pass through unchanged.
    pub fn into_mono(self) -> Vec<f32> {
        if self.channels <= 1 {
            self.samples
        } else {
            stereo_to_mono(&self.samples, self.channels)
        }
    }

    /// Duration of this chunk in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        (self.samples.len() / self.channels as usize) as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping the handle stops the hardware stream; holding it is the only
/// way to keep chunks flowing.  Teardown therefore happens on every exit
/// path, including panics and early returns.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors raised while opening or starting the input stream.
///
/// These surface at `start()` time so a denied or missing audio source
/// fails fast instead of silently producing an empty feature stream.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Input-device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use prosody_engine::audio::{AudioCapture, AudioChunk};
///
/// let (tx, rx) = mpsc::channel::<AudioChunk>();
/// let capture = AudioCapture::new().unwrap();
/// let _handle = capture.start(tx).unwrap();
///
/// while let Ok(chunk) = rx.recv() {
///     let mono = chunk.into_mono();
///     // feed `mono` to the pipeline / capture session
///     # let _ = mono; break;
/// }
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Open the system default input device at its preferred configuration.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when no input device exists, or
    /// [`CaptureError::DefaultConfig`] when it cannot report a default
    /// stream configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        log::info!(
            "audio input: {} ch @ {} Hz ({})",
            channels,
            sample_rate,
            device.name().unwrap_or_else(|_| "unknown device".into())
        );

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming and send every hardware buffer to `tx`.
    ///
    /// The callback runs on the platform audio thread and only copies and
    /// forwards; send errors (receiver gone) are ignored so the audio
    /// thread never panics mid-stream.
    ///
    /// # Errors
    ///
    /// [`CaptureError::BuildStream`] / [`CaptureError::PlayStream`] when
    /// the platform rejects the stream configuration.
    pub fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<StreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk = AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                };
                let _ = tx.send(chunk);
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    /// Native sample rate of the stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each [`AudioChunk`].
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
