use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::error::{Result, VireoError};
use crate::generation::PersonGeneration;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Options forwarded to the remote service alongside the prompt
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub aspect_ratio: String,
    pub duration_seconds: u32,
    pub person_generation: PersonGeneration,
}

/// A produced video artifact, bytes already resolved
#[derive(Debug, Clone)]
pub struct VideoArtifact {
    pub data: Vec<u8>,
}

/// Opaque handle for a long-running generation job.
///
/// Returned by submission, refreshed by polling. Owned by a single
/// poller for the duration of the operation; never shared.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Opaque operation token, e.g. "operations/abc123"
    pub token: String,
    pub done: bool,
    /// Present once the job completes; may be empty when the service
    /// produced nothing
    pub artifacts: Option<Vec<VideoArtifact>>,
}

impl JobHandle {
    pub fn pending<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
            done: false,
            artifacts: None,
        }
    }
}

/// Boundary to the remote generation service.
///
/// Injected into providers at construction so tests can substitute a
/// fake without touching the network.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Submit a text-to-video job; returns immediately with a handle
    async fn submit(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<JobHandle>;

    /// Submit an image-to-video job carrying raw first-frame bytes
    async fn submit_with_image(
        &self,
        model: &str,
        prompt: &str,
        image: &[u8],
        options: &GenerationOptions,
    ) -> Result<JobHandle>;

    /// Refresh a handle by asking the service for its current state
    async fn poll(&self, handle: JobHandle) -> Result<JobHandle>;

    /// Fetch raw image bytes from a URL; any non-2xx status is an error
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

// Wire types for the Generative Language long-running operation API

#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResult>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoPayload {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

/// HTTP implementation of [`GenerationClient`] against the Google
/// Generative Language API
pub struct GenAiHttpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GenAiHttpClient {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used against local test servers)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn submit_instances(
        &self,
        model: &str,
        instances: serde_json::Value,
        options: &GenerationOptions,
    ) -> Result<JobHandle> {
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.base_url, model, self.api_key
        );

        let body = json!({
            "instances": instances,
            "parameters": {
                "aspectRatio": options.aspect_ratio,
                "durationSeconds": options.duration_seconds,
                "personGeneration": options.person_generation.as_str(),
            },
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VireoError::Provider(
                "veo".to_string(),
                format!("Job submission failed {}: {}", status, error_text),
            ));
        }

        let operation: OperationResponse = response.json().await?;
        debug!("Submitted generation job: {}", operation.name);

        self.handle_from_operation(operation).await
    }

    /// Translate an operation response into a domain handle, resolving
    /// artifact bytes when the job is already done
    async fn handle_from_operation(&self, operation: OperationResponse) -> Result<JobHandle> {
        if let Some(error) = operation.error {
            return Err(VireoError::Provider(
                "veo".to_string(),
                format!("Remote job failed: {}", error.message),
            ));
        }

        if !operation.done {
            return Ok(JobHandle::pending(operation.name));
        }

        let samples = operation
            .response
            .and_then(|r| r.generate_video_response)
            .map(|r| r.generated_samples)
            .unwrap_or_default();

        let mut artifacts = Vec::with_capacity(samples.len());
        for sample in samples {
            if let Some(video) = sample.video {
                artifacts.push(VideoArtifact {
                    data: self.resolve_video_bytes(video).await?,
                });
            }
        }

        Ok(JobHandle {
            token: operation.name,
            done: true,
            artifacts: Some(artifacts),
        })
    }

    /// The service returns either inline base64 bytes or a download URI
    async fn resolve_video_bytes(&self, video: VideoPayload) -> Result<Vec<u8>> {
        if let Some(encoded) = video.bytes_base64_encoded {
            return BASE64.decode(encoded.as_bytes()).map_err(|e| {
                VireoError::Provider("veo".to_string(), format!("Invalid video payload: {}", e))
            });
        }

        let uri = video.uri.ok_or_else(|| {
            VireoError::Provider(
                "veo".to_string(),
                "Generated video carries neither bytes nor a URI".to_string(),
            )
        })?;

        debug!("Downloading generated video from {}", uri);
        let response = self
            .client
            .get(&uri)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VireoError::Provider(
                "veo".to_string(),
                format!("Video download failed with status {}", response.status()),
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl GenerationClient for GenAiHttpClient {
    async fn submit(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<JobHandle> {
        self.submit_instances(model, json!([{ "prompt": prompt }]), options)
            .await
    }

    async fn submit_with_image(
        &self,
        model: &str,
        prompt: &str,
        image: &[u8],
        options: &GenerationOptions,
    ) -> Result<JobHandle> {
        let instances = json!([{
            "prompt": prompt,
            "image": { "bytesBase64Encoded": BASE64.encode(image) },
        }]);
        self.submit_instances(model, instances, options).await
    }

    async fn poll(&self, handle: JobHandle) -> Result<JobHandle> {
        let url = format!("{}/{}?key={}", self.base_url, handle.token, self.api_key);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VireoError::Provider(
                "veo".to_string(),
                format!("Job poll failed {}: {}", status, error_text),
            ));
        }

        let operation: OperationResponse = response.json().await?;
        self.handle_from_operation(operation).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(VireoError::Provider(
                "veo".to_string(),
                format!("Image fetch failed with status {}", response.status()),
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
