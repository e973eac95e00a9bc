// Modular video provider architecture
//
// This module provides the provider abstraction and its registry:
// - Client: boundary trait to the remote generation service
// - Veo: Google Veo implementation with submit/poll semantics

pub mod client;
pub mod veo;

use async_trait::async_trait;
use std::collections::HashMap;

pub use client::{GenAiHttpClient, GenerationClient, GenerationOptions, JobHandle, VideoArtifact};
pub use veo::VeoProvider;

use crate::config::Config;
use crate::error::{Result, VireoError};
use crate::generation::{GenerationRequest, GenerationResult};

/// Main trait for video generation providers
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Identifying name of this provider
    fn name(&self) -> &str;

    /// Whether the provider accepts a first-frame image
    fn supports_image_to_video(&self) -> bool;

    /// Generate a video for the request.
    ///
    /// Always returns an envelope: remote-service faults are folded
    /// into a failure result, never raised to the caller.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

/// Factory function building a provider from configuration.
///
/// Construction is the place where credential preconditions are
/// checked; a missing API key fails here, before any network I/O.
pub type ProviderFactory = fn(&Config) -> Result<Box<dyn VideoProvider>>;

/// Explicit name-to-factory mapping, populated at process start.
///
/// Registration is an ordinary method call so the mapping stays
/// inspectable and testable.
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with all built-in providers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(VeoProvider::NAME, |config| {
            let provider = VeoProvider::from_config(config)?;
            Ok(Box::new(provider) as Box<dyn VideoProvider>)
        });
        registry
    }

    pub fn register<S: Into<String>>(&mut self, name: S, factory: ProviderFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn create(&self, name: &str, config: &Config) -> Result<Box<dyn VideoProvider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| VireoError::UnknownProvider(name.to_string()))?;
        factory(config)
    }

    /// Registered provider names, sorted for stable output
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contains_veo() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["veo"]);
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let registry = ProviderRegistry::with_defaults();
        let result = registry.create("sora", &Config::default());
        assert!(matches!(result, Err(VireoError::UnknownProvider(name)) if name == "sora"));
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        // Default config has no API key; make sure the environment
        // fallback is empty too.
        std::env::remove_var("GEMINI_API_KEY");

        let registry = ProviderRegistry::with_defaults();
        let result = registry.create("veo", &Config::default());
        assert!(matches!(result, Err(VireoError::Auth(provider)) if provider == "veo"));
    }
}
