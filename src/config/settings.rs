//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across
//! threads.  The defaults are the values both source analysers were tuned
//! with; the two threshold pairs that used to be hard-coded in separate
//! call sites ([`VadConfig`] vs the pitch silence floor) are explicit,
//! separately-configurable fields here.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::dsp::{PitchConfig, VadConfig};
use crate::record::ClipQuality;

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Audio input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Input device name — `None` means the system default.
    pub input_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { input_device: None }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Framing and pitch-search settings for the prosody pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lowest fundamental considered, in Hz.
    pub min_f0: f32,
    /// Highest fundamental considered, in Hz.
    pub max_f0: f32,
    /// Analysis window length in milliseconds.
    pub frame_length_ms: f32,
    /// Stride between successive windows in milliseconds
    /// (must not exceed `frame_length_ms`).
    pub hop_length_ms: f32,
    /// RMS floor below which a frame skips pitch analysis entirely.
    pub silence_rms_threshold: f32,
    /// Amplitude floor for trimming near-zero frame edges before
    /// correlating.
    pub edge_trim_threshold: f32,
    /// Sub-harmonic acceptance ratio for the octave-error check.
    pub subharmonic_ratio: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_f0: 70.0,
            max_f0: 350.0,
            frame_length_ms: 40.0,
            hop_length_ms: 20.0,
            silence_rms_threshold: 0.01,
            edge_trim_threshold: 0.02,
            subharmonic_ratio: 0.9,
        }
    }
}

impl AnalysisConfig {
    /// Window length in samples at `sample_rate` Hz (at least 1).
    pub fn frame_len_samples(&self, sample_rate: u32) -> usize {
        ((sample_rate as f64 * self.frame_length_ms as f64 / 1000.0).round() as usize).max(1)
    }

    /// Hop length in samples at `sample_rate` Hz (at least 1).
    pub fn hop_len_samples(&self, sample_rate: u32) -> usize {
        ((sample_rate as f64 * self.hop_length_ms as f64 / 1000.0).round() as usize).max(1)
    }

    /// The pitch-estimator view of these settings.
    pub fn pitch_config(&self) -> PitchConfig {
        PitchConfig {
            min_f0: self.min_f0,
            max_f0: self.max_f0,
            silence_rms_threshold: self.silence_rms_threshold,
            edge_trim_threshold: self.edge_trim_threshold,
            subharmonic_ratio: self.subharmonic_ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingConfig
// ---------------------------------------------------------------------------

/// Capture-session limits and output location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Minimum clip length in seconds accepted for upload.
    pub min_secs: f32,
    /// Maximum clip length in seconds accepted for upload.
    pub max_secs: f32,
    /// Where the CLI writes WAV files — `None` uses the platform
    /// recordings directory (see [`AppPaths`]).
    pub output_dir: Option<PathBuf>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            min_secs: 0.5,
            max_secs: 300.0,
            output_dir: None,
        }
    }
}

impl RecordingConfig {
    /// Build the clip validator these limits describe.
    pub fn clip_quality(&self) -> ClipQuality {
        ClipQuality::new(self.min_secs, self.max_secs)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use prosody_engine::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audio input settings.
    pub audio: AudioConfig,
    /// Framing and pitch-search settings.
    pub analysis: AnalysisConfig,
    /// Voicing-gate thresholds.
    pub vad: VadConfig,
    /// Capture-session limits and output location.
    pub recording: RecordingConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` survives a TOML round trip
    /// without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path must return `Default` without
    /// error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    /// The defaults both source analysers were tuned with.
    #[test]
    fn default_values_match_observed_tuning() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.analysis.min_f0, 70.0);
        assert_eq!(cfg.analysis.max_f0, 350.0);
        assert_eq!(cfg.analysis.frame_length_ms, 40.0);
        assert_eq!(cfg.analysis.hop_length_ms, 20.0);
        assert_eq!(cfg.analysis.silence_rms_threshold, 0.01);
        assert_eq!(cfg.vad.energy_threshold, 0.02);
        assert_eq!(cfg.vad.zcr_threshold, 0.2);
        assert_eq!(cfg.recording.min_secs, 0.5);
        assert!(cfg.audio.input_device.is_none());
    }

    /// Modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.audio.input_device = Some("USB Microphone".into());
        cfg.analysis.min_f0 = 60.0;
        cfg.analysis.max_f0 = 400.0;
        cfg.analysis.frame_length_ms = 50.0;
        cfg.vad.energy_threshold = 0.03;
        cfg.recording.max_secs = 120.0;
        cfg.recording.output_dir = Some(PathBuf::from("/tmp/clips"));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
    }

    // ---- Sample conversions ------------------------------------------------

    #[test]
    fn frame_and_hop_lengths_in_samples() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.frame_len_samples(44_100), 1764); // 40 ms
        assert_eq!(cfg.hop_len_samples(44_100), 882); // 20 ms
        assert_eq!(cfg.frame_len_samples(16_000), 640);
        assert_eq!(cfg.hop_len_samples(16_000), 320);
    }

    #[test]
    fn sample_lengths_never_round_to_zero() {
        let cfg = AnalysisConfig {
            frame_length_ms: 0.001,
            hop_length_ms: 0.001,
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.frame_len_samples(16_000), 1);
        assert_eq!(cfg.hop_len_samples(16_000), 1);
    }

    #[test]
    fn pitch_config_mirrors_analysis_fields() {
        let cfg = AnalysisConfig {
            min_f0: 80.0,
            max_f0: 300.0,
            silence_rms_threshold: 0.015,
            ..AnalysisConfig::default()
        };
        let pitch = cfg.pitch_config();
        assert_eq!(pitch.min_f0, 80.0);
        assert_eq!(pitch.max_f0, 300.0);
        assert_eq!(pitch.silence_rms_threshold, 0.015);
    }

    #[test]
    fn clip_quality_uses_recording_limits() {
        let cfg = RecordingConfig {
            min_secs: 1.0,
            max_secs: 10.0,
            output_dir: None,
        };
        let quality = cfg.clip_quality();
        assert_eq!(quality.min_secs, 1.0);
        assert_eq!(quality.max_secs, 10.0);
    }
}
