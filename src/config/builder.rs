use anyhow::Result;

use super::types::{Config, LlmProvider, LlmSettings, ModelSettings};

#[derive(Debug)]
pub struct ConfigBuilder {
    pub(super) llm: LlmSettings,
    pub(super) models: ModelSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            llm: LlmSettings::default(),
            models: ModelSettings::default(),
        }
    }

    pub fn with_llm<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut LlmSettings),
    {
        update(&mut self.llm);
        self
    }

    pub fn with_models<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ModelSettings),
    {
        update(&mut self.models);
        self
    }

    /// Switch provider presets, resetting the endpoint, model and credential
    /// to that provider's defaults. A key never follows a provider switch;
    /// callers re-read it from the new provider's environment variable.
    pub fn with_provider(self, provider: LlmProvider) -> Self {
        if self.llm.provider == provider {
            return self;
        }
        self.with_llm(|llm| {
            llm.provider = provider;
            llm.api_key.clear();
            llm.base_url = provider.default_base_url().to_string();
        })
        .with_models(|models| {
            models.model = provider.default_model().to_string();
            models.structured_output = provider.default_structured_output();
        })
    }

    pub fn build(self) -> Result<Config> {
        Ok(Config {
            llm: self.llm,
            models: self.models,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
