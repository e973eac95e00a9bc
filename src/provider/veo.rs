use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info};

use async_trait::async_trait;

use crate::config::{Config, GoogleConfig};
use crate::error::{Result, VireoError};
use crate::generation::{GenerationRequest, GenerationResult, ImageSource};
use crate::provider::client::{GenAiHttpClient, GenerationClient, GenerationOptions};
use crate::provider::VideoProvider;

/// Google Veo video provider.
///
/// Submits a generation job, polls it to completion at a fixed
/// interval, and writes the produced bytes to disk. Every outcome is
/// reported through the [`GenerationResult`] envelope; only
/// misconfiguration (missing credential) is surfaced as an error, and
/// that happens at construction time before any network I/O.
pub struct VeoProvider {
    config: GoogleConfig,
    output_dir: PathBuf,
    client: Arc<dyn GenerationClient>,
}

impl VeoProvider {
    pub const NAME: &'static str = "veo";

    /// Create a provider with an injected client (used by tests and
    /// by callers that manage their own transport)
    pub fn new(config: GoogleConfig, output_dir: PathBuf, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            config,
            output_dir,
            client,
        }
    }

    /// Create a provider backed by the real HTTP client.
    ///
    /// Fails with [`VireoError::Auth`] when no API key is resolvable,
    /// without constructing a client or touching the network.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .google
            .resolve_api_key()
            .ok_or_else(|| VireoError::Auth(Self::NAME.to_string()))?;

        Ok(Self::new(
            config.google.clone(),
            config.output.dir.clone(),
            Arc::new(GenAiHttpClient::new(api_key)),
        ))
    }

    fn model_for(&self, request: &GenerationRequest) -> &str {
        if request.use_fast_model {
            &self.config.video_fast_model
        } else {
            &self.config.video_model
        }
    }

    /// Internal pipeline: submit, poll, persist. Every step returns
    /// Result; `generate` maps any Err into a failure envelope.
    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let model = self.model_for(request);

        info!("Veo: generating video ({})", request.aspect_ratio);
        debug!("Prompt: {}", request.prompt);
        debug!("Model: {}", model);

        let options = GenerationOptions {
            aspect_ratio: request.aspect_ratio.clone(),
            duration_seconds: request.duration_seconds,
            person_generation: request.person_generation,
        };

        let mut handle = match &request.image {
            Some(ImageSource::Url(url)) => {
                // Fetch the first frame before submitting anything; a
                // failed fetch aborts the whole operation.
                let image_bytes = self.client.fetch_image(url).await?;
                self.client
                    .submit_with_image(model, &request.prompt, &image_bytes, &options)
                    .await?
            }
            Some(ImageSource::Bytes(image_bytes)) => {
                self.client
                    .submit_with_image(model, &request.prompt, image_bytes, &options)
                    .await?
            }
            None => self.client.submit(model, &request.prompt, &options).await?,
        };

        info!("Waiting for generation...");
        while !handle.done {
            tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
            handle = self.client.poll(handle).await?;
        }

        // A completed job with nothing produced is a normal outcome,
        // not a fault.
        let mut artifacts = handle.artifacts.unwrap_or_default();
        if artifacts.is_empty() {
            info!("Veo: job completed without producing a video");
            return Ok(GenerationResult::failure(Self::NAME, "No video generated"));
        }
        let data = artifacts.remove(0).data;

        let file_path = match &request.output_path {
            Some(path) => path.clone(),
            None => {
                let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
                self.output_dir
                    .join(format!("{}_{}.mp4", Self::NAME, timestamp))
            }
        };

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&file_path, &data).await?;

        info!("Veo: saved to {}", file_path.display());

        let metadata = HashMap::from([
            ("aspect_ratio".to_string(), request.aspect_ratio.clone()),
            ("model".to_string(), model.to_string()),
            ("prompt".to_string(), request.prompt.clone()),
        ]);

        Ok(GenerationResult::success(
            Self::NAME,
            file_path,
            data,
            metadata,
        ))
    }
}

#[async_trait]
impl VideoProvider for VeoProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports_image_to_video(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(e) => {
                error!("Veo generation failed: {}", e);
                GenerationResult::failure(Self::NAME, e.to_string())
            }
        }
    }
}
