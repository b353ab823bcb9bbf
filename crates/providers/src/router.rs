//! Provider router — builds and selects the completion provider from config.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tutorly_config::AppConfig;
use tutorly_core::error::ProviderError;
use tutorly_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Holds the registered providers and the name of the active one.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// The active provider, or `NotConfigured` if it was never registered.
    pub fn active(&self) -> Result<Arc<dyn Provider>, ProviderError> {
        self.default()
            .ok_or_else(|| ProviderError::NotConfigured(self.default_provider.clone()))
    }
}

/// Build providers from configuration.
///
/// Every `[providers.<name>]` table is registered, and the active provider is
/// added from defaults when it has no table of its own.
pub fn build_from_config(config: &AppConfig) -> Result<ProviderRouter, ProviderError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let mut router = ProviderRouter::new(&config.provider);

    for (name, provider_config) in &config.providers {
        let api_key = config.api_key_for(name).unwrap_or_default();

        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        let provider = OpenAiCompatProvider::new(name, &base_url, api_key, timeout)?;
        router.register(name.clone(), Arc::new(provider));
    }

    if router.get(&config.provider).is_none() {
        let api_key = config.resolved_api_key().unwrap_or_default();
        let base_url = default_base_url(&config.provider);
        let provider = OpenAiCompatProvider::new(&config.provider, &base_url, api_key, timeout)?;
        router.register(config.provider.clone(), Arc::new(provider));
    }

    info!(provider = %config.provider, model = %config.model, "Completion provider ready");
    Ok(router)
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "groq" => "https://api.groq.com/openai/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
