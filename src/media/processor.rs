use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::info;

use super::{MediaCommandBuilder, MediaProcessorTrait};
use crate::config::MediaConfig;
use crate::error::{Result, VireoError};

/// Concrete implementation of media processor (ffmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    /// Mux an audio file onto a video track.
    ///
    /// The encoder invocation is bounded by the configured wall-clock
    /// timeout; the poll-based generation path has no such bound.
    async fn mux_audio_video(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Muxing audio {} onto video {} -> {}",
            audio_path.display(),
            video_path.display(),
            output_path.display()
        );

        let command = self
            .command_builder
            .mux_audio_video(video_path, audio_path, output_path)
            .with_timeout(Duration::from_secs(self.config.mux_timeout_secs));

        command.execute().await?;

        info!("Mux completed successfully");
        Ok(())
    }

    /// Synthesize a placeholder test video with a tone track
    async fn create_test_video(
        &self,
        output_path: &Path,
        duration_secs: u32,
        size: &str,
        fps: u32,
    ) -> Result<()> {
        info!(
            "Creating {}s {} test video at {}",
            duration_secs,
            size,
            output_path.display()
        );

        let command = self
            .command_builder
            .create_test_video(output_path, duration_secs, size, fps);
        command.execute().await?;

        info!("Test video created");
        Ok(())
    }

    /// Check if the media processor is available
    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| VireoError::Media(format!("Media processor not found: {}", e)))?;

        if output.status.success() {
            info!("Media processor is available");
            Ok(())
        } else {
            Err(VireoError::Media(
                "Media processor version check failed".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_availability_check() {
        let processor = MediaProcessorImpl::new(MediaConfig {
            binary_path: "/nonexistent/ffmpeg-binary".to_string(),
            mux_timeout_secs: 60,
        });

        let result = processor.check_availability();
        assert!(matches!(result, Err(VireoError::Media(_))));
    }
}
