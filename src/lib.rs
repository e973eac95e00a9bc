//! Vireo - AI Video Generation Workflow
//!
//! A Rust implementation of a video generation workflow that submits
//! prompts to a remote generation service (Google Veo), polls the job
//! to completion, and muxes audio onto video tracks using ffmpeg.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod media;
pub mod provider;
pub mod workflow;
