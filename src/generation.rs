use std::collections::HashMap;
use std::path::PathBuf;

/// Source image for image-to-video generation
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Fetch the image from a URL before submission
    Url(String),
    /// Use raw image bytes directly
    Bytes(Vec<u8>),
}

/// Content-safety tier for people in generated footage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonGeneration {
    AllowAdult,
    DontAllow,
}

impl PersonGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonGeneration::AllowAdult => "allow_adult",
            PersonGeneration::DontAllow => "dont_allow",
        }
    }
}

/// A single video generation request.
///
/// Immutable once submitted: providers take it by reference and never
/// modify it. A request with a source image is treated as
/// image-to-video; without one, text-to-video.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Scene description
    pub prompt: String,
    /// Optional first-frame image to animate
    pub image: Option<ImageSource>,
    /// "16:9", "9:16", or "1:1"
    pub aspect_ratio: String,
    /// Duration hint in seconds (the model may ignore it)
    pub duration_seconds: u32,
    /// Use the faster, lower-quality model tier
    pub use_fast_model: bool,
    /// Content-safety tier
    pub person_generation: PersonGeneration,
    /// Where to save the video; a path under the configured output
    /// directory is synthesized when absent
    pub output_path: Option<PathBuf>,
}

impl GenerationRequest {
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            aspect_ratio: "16:9".to_string(),
            duration_seconds: 5,
            use_fast_model: false,
            person_generation: PersonGeneration::AllowAdult,
            output_path: None,
        }
    }

    /// Whether this request is image-to-video
    pub fn is_image_to_video(&self) -> bool {
        self.image.is_some()
    }
}

/// Uniform success/failure envelope returned by every generation
/// operation.
///
/// Exactly one of `data` and `error` is present; the `success` and
/// `failure` constructors are the only way to build one, so the
/// invariant holds structurally.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub success: bool,
    /// Name of the provider that produced this result
    pub provider: String,
    /// Fixed to "video" for this workflow
    pub content_type: String,
    /// Destination file the payload was written to (success only)
    pub file_path: Option<PathBuf>,
    /// Raw payload bytes (success only)
    pub data: Option<Vec<u8>>,
    /// Descriptive metadata: model used, aspect ratio, echoed prompt
    pub metadata: HashMap<String, String>,
    /// Human-readable failure description (failure only)
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success<S: Into<String>>(
        provider: S,
        file_path: PathBuf,
        data: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            success: true,
            provider: provider.into(),
            content_type: "video".to_string(),
            file_path: Some(file_path),
            data: Some(data),
            metadata,
            error: None,
        }
    }

    pub fn failure<S: Into<String>, E: Into<String>>(provider: S, error: E) -> Self {
        Self {
            success: false,
            provider: provider.into(),
            content_type: "video".to_string(),
            file_path: None,
            data: None,
            metadata: HashMap::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("a red ball bouncing");
        assert_eq!(request.prompt, "a red ball bouncing");
        assert_eq!(request.aspect_ratio, "16:9");
        assert_eq!(request.duration_seconds, 5);
        assert!(!request.use_fast_model);
        assert!(!request.is_image_to_video());
    }

    #[test]
    fn test_request_with_image_is_image_to_video() {
        let mut request = GenerationRequest::new("animate this");
        request.image = Some(ImageSource::Url("https://example.com/frame.png".to_string()));
        assert!(request.is_image_to_video());
    }

    #[test]
    fn test_success_envelope_invariant() {
        let result = GenerationResult::success(
            "veo",
            PathBuf::from("exports/out.mp4"),
            vec![0, 1, 2],
            HashMap::new(),
        );
        assert!(result.success);
        assert!(result.data.is_some());
        assert!(result.file_path.is_some());
        assert!(result.error.is_none());
        assert_eq!(result.content_type, "video");
    }

    #[test]
    fn test_failure_envelope_invariant() {
        let result = GenerationResult::failure("veo", "No video generated");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.file_path.is_none());
        assert_eq!(result.error.as_deref(), Some("No video generated"));
    }
}
