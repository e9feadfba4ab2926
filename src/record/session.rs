//! Raw-PCM capture sessions.
//!
//! [`PcmCapture`] buffers mono sample chunks for the duration of one
//! recording session and serialises them to WAV bytes on stop.  The
//! recording path is independent of the analysis pipeline: it keeps every
//! sample in arrival order (no ring-buffer overwrites, no framing) so the
//! encoded file is an exact copy of what the device delivered.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::record::PcmCapture;
//!
//! let mut capture = PcmCapture::new();
//! capture.start(44_100);
//! capture.push_chunk(&[0.1, -0.1, 0.2]);
//!
//! let wav = capture.stop().expect("first stop yields bytes");
//! assert_eq!(wav.len(), 44 + 3 * 2);
//! assert!(capture.stop().is_none()); // idempotent
//! ```

use super::wav::encode_wav;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle of one [`CaptureSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Chunks are being appended.
    Recording,
    /// No further chunks are accepted.
    Stopped,
}

// ---------------------------------------------------------------------------
// CaptureSession
// ---------------------------------------------------------------------------

/// One recording's worth of raw sample chunks.
///
/// All chunks share the session's sample rate; appends are only accepted
/// while `Recording`.  The session is owned by exactly one capture context
/// — buffers are never shared between sessions.
#[derive(Debug)]
pub struct CaptureSession {
    chunks: Vec<Vec<f32>>,
    sample_rate: u32,
    state: SessionState,
}

impl CaptureSession {
    fn new(sample_rate: u32) -> Self {
        Self {
            chunks: Vec::new(),
            sample_rate,
            state: SessionState::Recording,
        }
    }

    /// Append one mono chunk.  Ignored (with a log) once stopped.
    pub fn push_chunk(&mut self, samples: &[f32]) {
        if self.state != SessionState::Recording {
            log::debug!("capture: chunk dropped, session already stopped");
            return;
        }
        if !samples.is_empty() {
            self.chunks.push(samples.to_vec());
        }
    }

    /// Sample rate of this session in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Total number of buffered samples across all chunks.
    pub fn total_samples(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Buffered duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples() as f32 / self.sample_rate as f32
    }

    /// Stop the session and flatten its chunks into one contiguous buffer,
    /// preserving arrival order.
    pub fn into_samples(mut self) -> Vec<f32> {
        self.state = SessionState::Stopped;
        let mut samples = Vec::with_capacity(self.total_samples());
        for chunk in &self.chunks {
            samples.extend_from_slice(chunk);
        }
        samples
    }
}

// ---------------------------------------------------------------------------
// PcmCapture
// ---------------------------------------------------------------------------

/// Owns at most one active [`CaptureSession`] and converts it to WAV bytes
/// on stop.
#[derive(Debug, Default)]
pub struct PcmCapture {
    session: Option<CaptureSession>,
}

impl PcmCapture {
    /// Create a capture with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh session at `sample_rate` Hz.
    ///
    /// Any previous session still open is discarded — its samples were
    /// never stopped, so they have no destination.
    pub fn start(&mut self, sample_rate: u32) {
        if self.session.is_some() {
            log::warn!("capture: start while recording, discarding previous session");
        }
        self.session = Some(CaptureSession::new(sample_rate));
        log::info!("capture: session started @ {sample_rate} Hz");
    }

    /// `true` while a session is open.
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Buffered duration of the open session, or `0.0` when idle.
    pub fn duration_secs(&self) -> f32 {
        self.session.as_ref().map_or(0.0, CaptureSession::duration_secs)
    }

    /// Append one mono chunk to the open session; a no-op when idle.
    pub fn push_chunk(&mut self, samples: &[f32]) {
        if let Some(session) = self.session.as_mut() {
            session.push_chunk(samples);
        }
    }

    /// Close the session and return the encoded WAV bytes.
    ///
    /// The chunks are concatenated in arrival order and serialised with
    /// [`encode_wav`].  An empty session still yields a valid header-only
    /// file.  Calling `stop` with no open session returns `None` and
    /// performs no teardown twice.
    pub fn stop(&mut self) -> Option<Vec<u8>> {
        let session = self.take_session()?;
        let sample_rate = session.sample_rate();
        let samples = session.into_samples();
        Some(encode_wav(&samples, sample_rate))
    }

    /// Close the session and hand it back unencoded.
    ///
    /// For callers that validate the clip (see
    /// [`ClipQuality`](crate::record::ClipQuality)) before deciding to
    /// encode.  Like [`stop`](Self::stop), a second call returns `None`.
    pub fn take_session(&mut self) -> Option<CaptureSession> {
        let session = self.session.take()?;
        log::info!(
            "capture: session stopped, {} samples ({:.2} s)",
            session.total_samples(),
            session.duration_secs()
        );
        Some(session)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::wav::WAV_HEADER_LEN;

    // ---- Session lifecycle -------------------------------------------------

    #[test]
    fn new_capture_is_idle() {
        let capture = PcmCapture::new();
        assert!(!capture.is_recording());
        assert_eq!(capture.duration_secs(), 0.0);
    }

    #[test]
    fn start_opens_a_recording_session() {
        let mut capture = PcmCapture::new();
        capture.start(48_000);
        assert!(capture.is_recording());
    }

    #[test]
    fn stop_yields_wav_and_closes_session() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        capture.push_chunk(&[0.1, 0.2]);

        let wav = capture.stop().expect("bytes");
        assert_eq!(wav.len(), WAV_HEADER_LEN + 4);
        assert!(!capture.is_recording());
    }

    #[test]
    fn double_stop_returns_none() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        assert!(capture.stop().is_some());
        assert!(capture.stop().is_none());
        assert!(capture.stop().is_none());
    }

    #[test]
    fn stop_without_start_returns_none() {
        let mut capture = PcmCapture::new();
        assert!(capture.stop().is_none());
    }

    #[test]
    fn empty_session_yields_header_only_wav() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        let wav = capture.stop().expect("bytes");
        assert_eq!(wav.len(), WAV_HEADER_LEN);
    }

    // ---- Chunk handling ----------------------------------------------------

    #[test]
    fn chunks_are_concatenated_in_arrival_order() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        capture.push_chunk(&[1.0]);
        capture.push_chunk(&[-1.0]);
        capture.push_chunk(&[0.0]);

        let wav = capture.stop().expect("bytes");
        let payload = &wav[WAV_HEADER_LEN..];
        let first = i16::from_le_bytes(payload[0..2].try_into().unwrap());
        let second = i16::from_le_bytes(payload[2..4].try_into().unwrap());
        let third = i16::from_le_bytes(payload[4..6].try_into().unwrap());
        assert_eq!(first, i16::MAX);
        assert_eq!(second, i16::MIN);
        assert_eq!(third, 0);
    }

    #[test]
    fn push_while_idle_is_ignored() {
        let mut capture = PcmCapture::new();
        capture.push_chunk(&[0.5; 100]); // no session open
        capture.start(44_100);
        let wav = capture.stop().expect("bytes");
        assert_eq!(wav.len(), WAV_HEADER_LEN); // nothing buffered
    }

    #[test]
    fn push_after_session_stop_is_ignored() {
        let mut session = CaptureSession::new(44_100);
        session.push_chunk(&[0.1; 10]);
        let samples = session.into_samples();
        assert_eq!(samples.len(), 10);
        // `into_samples` consumed the session; nothing further can append.
    }

    #[test]
    fn empty_chunks_are_skipped() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        capture.push_chunk(&[]);
        capture.push_chunk(&[0.1]);
        capture.push_chunk(&[]);

        let wav = capture.stop().expect("bytes");
        assert_eq!(wav.len(), WAV_HEADER_LEN + 2);
    }

    #[test]
    fn duration_tracks_buffered_samples() {
        let mut capture = PcmCapture::new();
        capture.start(16_000);
        capture.push_chunk(&vec![0.0; 8_000]);
        assert!((capture.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn restart_discards_previous_session() {
        let mut capture = PcmCapture::new();
        capture.start(44_100);
        capture.push_chunk(&[0.5; 100]);
        capture.start(44_100); // restart without stop
        let wav = capture.stop().expect("bytes");
        assert_eq!(wav.len(), WAV_HEADER_LEN); // old samples gone
    }

    // ---- Session invariants ------------------------------------------------

    #[test]
    fn session_tracks_state_and_totals() {
        let mut session = CaptureSession::new(22_050);
        assert_eq!(session.state(), SessionState::Recording);
        assert_eq!(session.sample_rate(), 22_050);

        session.push_chunk(&[0.1; 441]);
        assert_eq!(session.total_samples(), 441);
        assert!((session.duration_secs() - 0.02).abs() < 1e-6);
    }
}
