use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, VireoError};

// Default values for the Veo provider configuration
fn default_poll_interval_secs() -> u64 {
    5
}

fn default_mux_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub google: GoogleConfig,
    pub media: MediaConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// API key for the Generative Language API.
    /// Falls back to the GEMINI_API_KEY environment variable when empty.
    pub api_key: String,
    /// Model used for standard-quality video generation
    pub video_model: String,
    /// Model used when fast generation is requested
    pub video_fast_model: String,
    /// Seconds to wait between successive job status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Wall-clock timeout for mux operations, in seconds
    #[serde(default = "default_mux_timeout_secs")]
    pub mux_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where generated videos are written when no explicit
    /// output path is given
    pub dir: PathBuf,
}

impl GoogleConfig {
    /// Resolve the API key from config, falling back to the environment.
    /// Returns None when no credential is available anywhere.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google: GoogleConfig {
                api_key: String::new(),
                video_model: "veo-3.1-generate-preview".to_string(),
                video_fast_model: "veo-3.1-fast-generate-preview".to_string(),
                poll_interval_secs: default_poll_interval_secs(),
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                mux_timeout_secs: default_mux_timeout_secs(),
            },
            output: OutputConfig {
                dir: PathBuf::from("exports"),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VireoError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| VireoError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VireoError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VireoError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config::default();
        let toml_text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_text).unwrap();

        assert_eq!(parsed.google.video_model, "veo-3.1-generate-preview");
        assert_eq!(parsed.google.poll_interval_secs, 5);
        assert_eq!(parsed.media.binary_path, "ffmpeg");
        assert_eq!(parsed.media.mux_timeout_secs, 60);
        assert_eq!(parsed.output.dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_poll_interval_defaults_when_missing() {
        let toml_text = r#"
            [google]
            api_key = "test-key"
            video_model = "veo-3.1-generate-preview"
            video_fast_model = "veo-3.1-fast-generate-preview"

            [media]
            binary_path = "ffmpeg"

            [output]
            dir = "exports"
        "#;

        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.google.poll_interval_secs, 5);
        assert_eq!(config.media.mux_timeout_secs, 60);
    }

    #[test]
    fn test_resolve_api_key_from_config() {
        let mut config = Config::default();
        config.google.api_key = "abc123".to_string();
        assert_eq!(config.google.resolve_api_key(), Some("abc123".to_string()));
    }
}
