//! tts-narrator configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use speech_client::{DEFAULT_SERVER, DEFAULT_SPEED, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};
use std::fs;
use std::path::PathBuf;

use crate::narrator::{DEFAULT_GAP_SECS, NarrationSettings};
use crate::text::ChunkLimits;
use crate::text::shaper::{DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// Base address of the speech server
    #[serde(default = "default_server")]
    pub server: String,

    /// Default voice preset name
    #[serde(default)]
    pub voice: Option<String>,

    /// Seed for deterministic output
    #[serde(default)]
    pub seed: Option<i64>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Playback speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Silence between chunks in seconds
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Merge chunks shorter than this
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Split sentences longer than this
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Per-chunk synthesis timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_gap() -> f64 {
    DEFAULT_GAP_SECS
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            voice: None,
            seed: None,
            temperature: default_temperature(),
            speed: default_speed(),
            gap: default_gap(),
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NarratorConfig {
    /// Get the config file path: ~/.config/tts-narrator/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("tts-narrator").join("config.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: NarratorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn limits(&self) -> ChunkLimits {
        ChunkLimits::new(self.min_chars, self.max_chars)
    }

    pub fn settings(&self) -> NarrationSettings {
        NarrationSettings {
            voice: self.voice.clone(),
            seed: self.seed,
            temperature: self.temperature,
            speed: self.speed,
            gap_secs: self.gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert_eq!(config.server, "http://localhost:8090");
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.gap, 0.4);
        assert_eq!(config.min_chars, 40);
        assert_eq!(config.max_chars, 300);
        assert_eq!(config.timeout_secs, 300);
        assert!(config.voice.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_path() {
        let path = NarratorConfig::config_path().unwrap();
        assert!(path.ends_with(".config/tts-narrator/config.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
server = "http://gpu-box:9000"
voice = "cylon"
seed = 42
temperature = 0.7
speed = 1.2
gap = 0.25
min_chars = 20
max_chars = 200
"#;
        let config: NarratorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server, "http://gpu-box:9000");
        assert_eq!(config.voice, Some("cylon".to_string()));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.speed, 1.2);
        assert_eq!(config.gap, 0.25);
        assert_eq!(config.limits(), ChunkLimits::new(20, 200));
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: NarratorConfig = toml::from_str("").unwrap();
        assert_eq!(config, NarratorConfig::default());
    }

    #[test]
    fn test_settings_from_config() {
        let config = NarratorConfig {
            voice: Some("ada".to_string()),
            gap: 0.0,
            ..NarratorConfig::default()
        };
        let settings = config.settings();
        assert_eq!(settings.voice.as_deref(), Some("ada"));
        assert_eq!(settings.gap_secs, 0.0);
        assert_eq!(settings.temperature, 0.9);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = NarratorConfig {
            seed: Some(7),
            ..NarratorConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: NarratorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
