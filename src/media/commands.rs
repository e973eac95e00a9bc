use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, VireoError};

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
    pub timeout: Option<Duration>,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
            timeout: None,
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add a lavfi-synthesized input (test sources, tone generators)
    pub fn lavfi_input<S: Into<String>>(self, source: S) -> Self {
        self.arg("-f").arg("lavfi").arg("-i").arg(source)
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Copy video stream without re-encoding
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Stop writing when the shortest input stream ends
    pub fn shortest(self) -> Self {
        self.arg("-shortest")
    }

    /// Abort the process when it exceeds the given wall-clock duration
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Execute the command
    pub async fn execute(&self) -> Result<()> {
        debug!(
            "Executing media processing command: {} {:?}",
            self.binary_path, self.args
        );
        debug!("Description: {}", self.description);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args);

        let run = cmd.output();
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, run).await.map_err(|_| {
                VireoError::Media(format!(
                    "{} timed out after {} seconds",
                    self.description,
                    timeout.as_secs()
                ))
            })?,
            None => run.await,
        }
        .map_err(|e| VireoError::Media(format!("Failed to execute media processor: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VireoError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(())
    }
}

/// Builder for common media processing operations
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build the audio/video mux command: copy the video stream,
    /// transcode audio to AAC, stop at the shortest stream
    pub fn mux_audio_video<P: AsRef<Path>>(
        &self,
        video_path: P,
        audio_path: P,
        output_path: P,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio/video mux")
            .overwrite()
            .input(video_path)
            .input(audio_path)
            .copy_video()
            .audio_codec("aac")
            .shortest()
            .output(output_path)
    }

    /// Build a placeholder test video command from synthesized inputs
    pub fn create_test_video<P: AsRef<Path>>(
        &self,
        output_path: P,
        duration_secs: u32,
        size: &str,
        fps: u32,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Test video synthesis")
            .overwrite()
            .lavfi_input(format!(
                "testsrc=duration={}:size={}:rate={}",
                duration_secs, size, fps
            ))
            .lavfi_input(format!("sine=frequency=1000:duration={}", duration_secs))
            .video_codec("libx264")
            .audio_codec("aac")
            .shortest()
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mux_command_argument_contract() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let command = builder.mux_audio_video("in.mp4", "in.wav", "out.mp4");

        assert_eq!(command.binary_path, "ffmpeg");
        assert_eq!(
            command.args,
            vec![
                "-y", "-i", "in.mp4", "-i", "in.wav", "-c:v", "copy", "-c:a", "aac", "-shortest",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_test_video_command_contract() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let command = builder.create_test_video("test.mp4", 5, "640x480", 30);

        assert_eq!(
            command.args,
            vec![
                "-y",
                "-f",
                "lavfi",
                "-i",
                "testsrc=duration=5:size=640x480:rate=30",
                "-f",
                "lavfi",
                "-i",
                "sine=frequency=1000:duration=5",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-shortest",
                "test.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_media_error() {
        let command = MediaCommand::new("/nonexistent/ffmpeg-binary", "Version check")
            .arg("-version");

        let result = command.execute().await;
        assert!(matches!(result, Err(VireoError::Media(_))));
    }

    #[tokio::test]
    async fn test_timeout_aborts_long_running_process() {
        let command = MediaCommand::new("sleep", "Slow process")
            .arg("5")
            .with_timeout(Duration::from_millis(100));

        let result = command.execute().await;
        match result {
            Err(VireoError::Media(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout error, got {:?}", other),
        }
    }
}
