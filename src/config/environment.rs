use anyhow::{Context, Result, anyhow};
use std::env;
use std::str::FromStr;

use super::builder::ConfigBuilder;
use super::types::LlmProvider;

pub fn apply_env_overrides(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(provider_raw) = env_string("PLANWRIGHT_PROVIDER")? {
        let provider = provider_raw
            .parse::<LlmProvider>()
            .with_context(|| format!("Failed to parse PLANWRIGHT_PROVIDER value '{provider_raw}'"))?;
        builder = builder.with_provider(provider);
    }

    if let Some(base_url) = env_string("PLANWRIGHT_BASE_URL")? {
        builder = builder.with_llm(|llm| llm.base_url = base_url);
    }

    let key_var = builder.llm.provider.api_key_env_var();
    if let Some(api_key) = env_string(key_var)? {
        builder = builder.with_llm(|llm| llm.api_key = api_key.trim().to_string());
    }

    if let Some(timeout) = env_parsed::<u64>("PLANWRIGHT_TIMEOUT_SECS")? {
        builder = builder.with_llm(|llm| llm.timeout_secs = timeout);
    }

    if let Some(model) = env_string("PLANWRIGHT_MODEL")? {
        builder = builder.with_models(|models| models.model = model);
    }

    if let Some(max_tokens) = env_parsed::<u32>("PLANWRIGHT_MAX_TOKENS")? {
        builder = builder.with_models(|models| models.max_tokens = max_tokens);
    }

    if let Some(temperature) = env_parsed::<f32>("PLANWRIGHT_TEMPERATURE")? {
        builder = builder.with_models(|models| models.temperature = temperature);
    }

    if let Some(structured) = env_parsed::<bool>("PLANWRIGHT_STRUCTURED_OUTPUT")? {
        builder = builder.with_models(|models| models.structured_output = structured);
    }

    Ok(builder)
}

/// Read a variable, treating blank values as unset.
pub fn env_string(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(anyhow!("{key} contains invalid UTF-8")),
    }
}

pub fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = env_string(key)? else {
        return Ok(None);
    };

    let parsed = value
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key} value '{value}'"))?;
    Ok(Some(parsed))
}
