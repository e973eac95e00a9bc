use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, VireoError};
use crate::generation::{GenerationRequest, GenerationResult};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::provider::ProviderRegistry;

pub struct Workflow {
    config: Config,
    registry: ProviderRegistry,
    media: Box<dyn MediaProcessorTrait>,
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        let registry = ProviderRegistry::with_defaults();
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        Self {
            config,
            registry,
            media,
        }
    }

    /// Generate a video through the named provider.
    ///
    /// Misconfiguration (unknown provider, missing credential) is an
    /// error; everything the remote service does is reported through
    /// the returned envelope's success flag.
    pub async fn generate(
        &self,
        provider_name: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResult> {
        let provider = self.registry.create(provider_name, &self.config)?;
        info!(
            "Generating video with provider '{}': {}",
            provider.name(),
            request.prompt
        );

        let result = provider.generate(&request).await;

        match (&result.file_path, &result.error) {
            (Some(path), _) => info!("Generation succeeded: {}", path.display()),
            (None, Some(error)) => warn!("Generation failed: {}", error),
            (None, None) => {}
        }

        Ok(result)
    }

    /// Mux an audio file onto a video track
    pub async fn mux<P: AsRef<Path>>(&self, video_path: P, audio_path: P, output_path: P) -> Result<()> {
        let video_path = video_path.as_ref();
        let audio_path = audio_path.as_ref();
        let output_path = output_path.as_ref();

        if !video_path.exists() {
            return Err(VireoError::FileNotFound(video_path.display().to_string()));
        }
        if !audio_path.exists() {
            return Err(VireoError::FileNotFound(audio_path.display().to_string()));
        }

        self.media.check_availability()?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        self.media
            .mux_audio_video(video_path, audio_path, output_path)
            .await
    }

    /// Synthesize a placeholder test video
    pub async fn test_video<P: AsRef<Path>>(
        &self,
        output_path: P,
        duration_secs: u32,
        size: &str,
        fps: u32,
    ) -> Result<()> {
        let output_path = output_path.as_ref();

        self.media.check_availability()?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        self.media
            .create_test_video(output_path, duration_secs, size, fps)
            .await
    }

    /// Registered provider names
    pub fn provider_names(&self) -> Vec<&str> {
        self.registry.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_workflow() -> Workflow {
        let mut config = Config::default();
        // Never reachable in these tests; guards against accidental
        // process execution.
        config.media.binary_path = "/nonexistent/ffmpeg-binary".to_string();
        Workflow::new(config)
    }

    #[tokio::test]
    async fn test_mux_requires_existing_inputs() {
        let workflow = test_workflow();
        let dir = tempdir().unwrap();

        let video = dir.path().join("missing.mp4");
        let audio = dir.path().join("missing.wav");
        let output = dir.path().join("out.mp4");

        let result = workflow.mux(&video, &audio, &output).await;
        assert!(matches!(result, Err(VireoError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_with_unknown_provider_is_an_error() {
        let workflow = test_workflow();
        let request = GenerationRequest::new("a red ball bouncing");

        let result = workflow.generate("sora", request).await;
        assert!(matches!(result, Err(VireoError::UnknownProvider(_))));
    }
}
