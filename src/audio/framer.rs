//! Chunk-to-frame accumulator for overlapping analysis windows.
//!
//! Audio arrives in whatever block size the host delivers; analysis wants
//! fixed-length frames spaced a fixed hop apart.  [`StreamFramer`] bridges
//! the two: samples accumulate in a growable buffer, and every time the
//! buffer holds at least one full frame the first `frame_len` samples are
//! emitted and the first `hop_len` dropped.  With `hop_len < frame_len`
//! consecutive frames overlap by `frame_len - hop_len` samples.
//!
//! Correctness holds for any push size — from a single sample up to many
//! frames' worth — with frames emitted in strict arrival order and no
//! sample skipped or duplicated across chunk boundaries.
//!
//! # Example
//!
//! ```rust
//! use prosody_engine::audio::StreamFramer;
//!
//! let mut framer = StreamFramer::new(4, 2, 16_000);
//! let frames = framer.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames[0].samples, vec![1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(frames[1].samples, vec![3.0, 4.0, 5.0, 6.0]); // 2-sample overlap
//! ```

// ---------------------------------------------------------------------------
// AudioFrame
// ---------------------------------------------------------------------------

/// One fixed-length analysis window.
///
/// Ephemeral: produced and consumed within a single pipeline tick.  The
/// length always equals the framer's configured frame length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    /// Mono samples in `[-1.0, 1.0]`, exactly `frame_len` of them.
    pub samples: Vec<f32>,
    /// Sample rate of the stream this frame was cut from, in Hz.
    pub sample_rate: u32,
    /// Absolute index of `samples[0]` within the session's sample stream.
    pub start_sample: u64,
}

impl AudioFrame {
    /// Frame duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }
}

// ---------------------------------------------------------------------------
// StreamFramer
// ---------------------------------------------------------------------------

/// Accumulates arbitrarily-sized chunks into fixed-length, fixed-hop
/// overlapping frames.
///
/// Frame and hop lengths are fixed for the lifetime of one instance.  The
/// buffer is owned exclusively by the instance — one framer per pipeline,
/// never shared.
pub struct StreamFramer {
    frame_len: usize,
    hop_len: usize,
    sample_rate: u32,
    buf: Vec<f32>,
    /// Absolute sample index of `buf[0]` within the session.
    offset: u64,
}

impl StreamFramer {
    /// Create a framer cutting `frame_len`-sample windows every `hop_len`
    /// samples.
    ///
    /// # Panics
    ///
    /// Panics if `frame_len == 0`, `hop_len == 0`, or `hop_len > frame_len`.
    pub fn new(frame_len: usize, hop_len: usize, sample_rate: u32) -> Self {
        assert!(frame_len > 0, "frame_len must be > 0");
        assert!(
            hop_len > 0 && hop_len <= frame_len,
            "hop_len must be in 1..=frame_len"
        );
        Self {
            frame_len,
            hop_len,
            sample_rate,
            buf: Vec::with_capacity(frame_len * 2),
            offset: 0,
        }
    }

    /// Append `chunk` and return every complete frame it unlocked.
    ///
    /// Accepts chunks of any length, including empty ones.
    pub fn push(&mut self, chunk: &[f32]) -> Vec<AudioFrame> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while self.buf.len() >= self.frame_len {
            frames.push(AudioFrame {
                samples: self.buf[..self.frame_len].to_vec(),
                sample_rate: self.sample_rate,
                start_sample: self.offset,
            });
            self.buf.drain(..self.hop_len);
            self.offset += self.hop_len as u64;
        }
        frames
    }

    /// Discard any buffered sub-frame residue and restart sample indexing.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.offset = 0;
    }

    /// Number of samples currently buffered (always `< frame_len` after a
    /// `push` returns).
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Configured frame length in samples.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Configured hop length in samples.
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Sample rate the framer was created with, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    // ---- Basic emission ----------------------------------------------------

    #[test]
    fn no_frame_until_buffer_fills() {
        let mut framer = StreamFramer::new(8, 4, 16_000);
        assert!(framer.push(&ramp(7)).is_empty());
        assert_eq!(framer.buffered(), 7);
    }

    #[test]
    fn exact_frame_emits_once() {
        let mut framer = StreamFramer::new(8, 4, 16_000);
        let frames = framer.push(&ramp(8));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].samples, ramp(8));
        assert_eq!(frames[0].start_sample, 0);
        assert_eq!(framer.buffered(), 4); // 8 - hop
    }

    #[test]
    fn overlap_equals_frame_minus_hop() {
        let mut framer = StreamFramer::new(6, 2, 16_000);
        let frames = framer.push(&ramp(8));
        assert_eq!(frames.len(), 2);
        // second frame starts hop samples later and repeats the overlap
        assert_eq!(frames[0].samples, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(frames[1].samples, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(frames[1].start_sample, 2);
    }

    #[test]
    fn hop_equal_to_frame_means_no_overlap() {
        let mut framer = StreamFramer::new(4, 4, 16_000);
        let frames = framer.push(&ramp(12));
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].samples, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(frames[1].samples, vec![4.0, 5.0, 6.0, 7.0]);
        assert_eq!(frames[2].samples, vec![8.0, 9.0, 10.0, 11.0]);
    }

    // ---- Chunk-boundary invariance -----------------------------------------

    /// Frames must be identical no matter how the stream is chopped into
    /// pushes — one sample at a time, odd sizes, or all at once.
    #[test]
    fn framing_is_invariant_to_chunking() {
        let signal = ramp(1000);
        let collect = |chunk_size: usize| -> Vec<AudioFrame> {
            let mut framer = StreamFramer::new(64, 16, 16_000);
            let mut out = Vec::new();
            for chunk in signal.chunks(chunk_size) {
                out.extend(framer.push(chunk));
            }
            out
        };

        let reference = collect(1000);
        for chunk_size in [1, 3, 16, 63, 64, 65, 999] {
            let frames = collect(chunk_size);
            assert_eq!(frames, reference, "chunk size {chunk_size} diverged");
        }
    }

    #[test]
    fn coverage_has_no_gaps_or_extra_duplication() {
        // Every position in [0, N) must be covered, and consecutive frames
        // must overlap by exactly frame_len - hop_len.
        let (frame_len, hop_len) = (40usize, 15usize);
        let n = 400usize;
        let mut framer = StreamFramer::new(frame_len, hop_len, 16_000);
        let mut frames = Vec::new();
        for chunk in ramp(n).chunks(7) {
            frames.extend(framer.push(chunk));
        }

        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.start_sample, (i * hop_len) as u64);
            // contents must be the original contiguous run
            let start = i * hop_len;
            let expected: Vec<f32> = (start..start + frame_len).map(|v| v as f32).collect();
            assert_eq!(frame.samples, expected);
        }

        // last emitted frame covers up to the final full window
        let covered = (frames.len() - 1) * hop_len + frame_len;
        assert!(covered <= n);
        assert!(n - covered < hop_len + frame_len);
    }

    #[test]
    fn empty_push_is_a_no_op() {
        let mut framer = StreamFramer::new(8, 4, 16_000);
        framer.push(&ramp(3));
        assert!(framer.push(&[]).is_empty());
        assert_eq!(framer.buffered(), 3);
    }

    #[test]
    fn single_push_spanning_many_frames() {
        let mut framer = StreamFramer::new(10, 5, 16_000);
        let frames = framer.push(&ramp(100));
        // (100 - 10) / 5 + 1 = 19 frames
        assert_eq!(frames.len(), 19);
        assert_eq!(frames.last().unwrap().start_sample, 90);
    }

    // ---- Reset -------------------------------------------------------------

    #[test]
    fn reset_discards_residue_and_restarts_indexing() {
        let mut framer = StreamFramer::new(8, 4, 16_000);
        framer.push(&ramp(10));
        assert!(framer.buffered() > 0);

        framer.reset();
        assert_eq!(framer.buffered(), 0);

        let frames = framer.push(&ramp(8));
        assert_eq!(frames[0].start_sample, 0);
    }

    // ---- Metadata ----------------------------------------------------------

    #[test]
    fn frames_carry_sample_rate() {
        let mut framer = StreamFramer::new(4, 2, 48_000);
        let frames = framer.push(&ramp(4));
        assert_eq!(frames[0].sample_rate, 48_000);
    }

    #[test]
    fn frame_duration_ms() {
        let frame = AudioFrame {
            samples: vec![0.0; 480],
            sample_rate: 48_000,
            start_sample: 0,
        };
        assert!((frame.duration_ms() - 10.0).abs() < 1e-9);
    }

    // ---- Panic guards ------------------------------------------------------

    #[test]
    #[should_panic(expected = "frame_len must be > 0")]
    fn zero_frame_len_panics() {
        StreamFramer::new(0, 1, 16_000);
    }

    #[test]
    #[should_panic(expected = "hop_len must be in 1..=frame_len")]
    fn hop_larger_than_frame_panics() {
        StreamFramer::new(4, 5, 16_000);
    }

    #[test]
    #[should_panic(expected = "hop_len must be in 1..=frame_len")]
    fn zero_hop_panics() {
        StreamFramer::new(4, 0, 16_000);
    }
}
