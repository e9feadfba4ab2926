//! Channel downmixing.
//!
//! The DSP path is mono throughout; input devices commonly deliver
//! interleaved stereo.  [`stereo_to_mono`] averages the channels of each
//! interleaved sample group.  No resampling happens anywhere in this crate
//! — the pipeline and the recorder both run at the device's native rate.

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging.
///
/// The output length is `samples.len() / channels`.
///
/// * `channels == 1` returns the input as an owned `Vec` unchanged.
/// * `channels == 0` returns an empty vector.
///
/// # Example
///
/// ```rust
/// use prosody_engine::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono, vec![0.0, 0.0]);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|group| group.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
