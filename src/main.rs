//! Vireo - AI Video Generation Workflow
//!
//! This is the main entry point for the Vireo application, which
//! generates videos through remote providers such as Google Veo and
//! muxes audio onto video tracks using ffmpeg.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vireo::cli::{Args, Commands};
use vireo::config::Config;
use vireo::generation::{GenerationRequest, ImageSource, PersonGeneration};
use vireo::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting Vireo - AI Video Generation Workflow");

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Create workflow instance
    let workflow = Workflow::new(config);

    // Execute command
    match args.command {
        Commands::Generate {
            prompt,
            provider,
            image_url,
            aspect_ratio,
            duration,
            output,
            fast,
            no_people,
        } => {
            info!("Generating video via provider '{}'", provider);

            let mut request = GenerationRequest::new(prompt);
            request.image = image_url.map(ImageSource::Url);
            request.aspect_ratio = aspect_ratio;
            request.duration_seconds = duration;
            request.use_fast_model = fast;
            request.person_generation = if no_people {
                PersonGeneration::DontAllow
            } else {
                PersonGeneration::AllowAdult
            };
            request.output_path = output;

            let result = workflow.generate(&provider, request).await?;
            if result.success {
                let path = result
                    .file_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("Video generated: {}", path);
                if let Some(model) = result.metadata.get("model") {
                    println!("Model: {}", model);
                }
            } else {
                let error = result.error.unwrap_or_else(|| "unknown error".to_string());
                println!("Generation failed: {}", error);
                std::process::exit(1);
            }
        }
        Commands::Mux {
            video,
            audio,
            output,
        } => {
            info!("Muxing {} + {}", video.display(), audio.display());
            workflow.mux(&video, &audio, &output).await?;
            println!("Created: {}", output.display());
        }
        Commands::TestVideo {
            output,
            duration,
            size,
            fps,
        } => {
            info!("Creating test video: {}", output.display());
            workflow.test_video(&output, duration, &size, fps).await?;
            println!("Test video created: {}", output.display());
        }
        Commands::Providers => {
            println!("Registered providers:");
            for name in workflow.provider_names() {
                println!("  {}", name);
            }
        }
    }

    info!("Vireo workflow completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let vireo_dir = std::env::current_dir()?.join(".vireo");
    let log_dir = vireo_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "vireo.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
