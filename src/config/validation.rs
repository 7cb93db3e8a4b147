use anyhow::Result;

use crate::error::PipelineError;

use super::types::Config;

/// Startup checks. A missing credential is fatal here rather than at the
/// first model call.
pub fn validate(config: &Config) -> Result<()> {
    if config.llm.api_key.trim().is_empty() {
        let provider = config.llm.provider;
        return Err(PipelineError::Configuration(format!(
            "{} API key not found. Set {} or add it to {}",
            provider.display_name(),
            provider.api_key_env_var(),
            Config::config_path()?.display()
        ))
        .into());
    }

    if config.llm.base_url.trim().is_empty() {
        return Err(PipelineError::Configuration("LLM base URL is empty".to_string()).into());
    }

    if config.models.model.trim().is_empty() {
        return Err(PipelineError::Configuration("Model identifier is empty".to_string()).into());
    }

    if config.llm.timeout_secs == 0 {
        return Err(
            PipelineError::Configuration("Timeout must be greater than zero".to_string()).into(),
        );
    }

    Ok(())
}
