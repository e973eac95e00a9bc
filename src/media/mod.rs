// Modular media processing architecture
//
// This module provides a clean abstraction over the external encoder:
// - Processor: ffmpeg-backed implementation
// - Commands: command builders and abstractions

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media processing operations
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Mux an audio file onto a video track
    async fn mux_audio_video(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Synthesize a placeholder test video with a tone track
    async fn create_test_video(
        &self,
        output_path: &Path,
        duration_secs: u32,
        size: &str,
        fps: u32,
    ) -> Result<()>;

    /// Check if the media processor is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (ffmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
