use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a video from a text prompt via a remote provider
    Generate {
        /// Scene description
        #[arg(short, long)]
        prompt: String,

        /// Provider to use
        #[arg(long, default_value = "veo")]
        provider: String,

        /// First-frame image URL for image-to-video
        #[arg(long)]
        image_url: Option<String>,

        /// Aspect ratio: 16:9, 9:16, or 1:1
        #[arg(short, long, default_value = "16:9")]
        aspect_ratio: String,

        /// Duration hint in seconds
        #[arg(short, long, default_value = "5")]
        duration: u32,

        /// Output video file (defaults to a timestamped name under
        /// the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the faster, lower-quality model tier
        #[arg(long)]
        fast: bool,

        /// Disallow people in the generated footage
        #[arg(long)]
        no_people: bool,
    },

    /// Mux an audio file onto a video track
    Mux {
        /// Input video file
        #[arg(short, long)]
        video: PathBuf,

        /// Input audio file
        #[arg(short, long)]
        audio: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Create a placeholder test video with a tone track
    TestVideo {
        /// Output video file
        #[arg(short, long, default_value = "exports/test_video.mp4")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u32,

        /// Frame size, e.g. 640x480
        #[arg(short, long, default_value = "640x480")]
        size: String,

        /// Frame rate
        #[arg(short, long, default_value = "30")]
        fps: u32,
    },

    /// List registered video providers
    Providers,
}
