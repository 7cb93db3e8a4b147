use anyhow::{Context, Result};
use dirs::home_dir;
use std::{fs, path::Path};

use super::Config;
use super::builder::ConfigBuilder;
use super::environment::apply_env_overrides;
use super::types::{FileConfig, PersistedConfig};
use super::validation::validate;

impl Config {
    pub fn config_path() -> Result<std::path::PathBuf> {
        let mut path = home_dir().context("Could not determine home directory")?;
        path.push(".planwright/config");
        Ok(path)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Defaults, then the config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_unvalidated()?;
        validate(&config)?;
        Ok(config)
    }

    /// Same layering as [`Config::load`] without the credential check, for
    /// commands that edit the configuration itself.
    pub fn load_unvalidated() -> Result<Self> {
        apply_env_overrides(Self::persisted_builder()?)?.build()
    }

    /// Defaults plus the config file, without environment overrides. This is
    /// what `save` may write back; env-only secrets never reach the file.
    pub fn load_persisted() -> Result<Self> {
        Self::persisted_builder()?.build()
    }

    /// Layer environment overrides on top of an already loaded config.
    pub fn with_env_overrides(self) -> Result<Self> {
        let builder = ConfigBuilder {
            llm: self.llm,
            models: self.models,
        };
        apply_env_overrides(builder)?.build()
    }

    fn persisted_builder() -> Result<ConfigBuilder> {
        let path = Self::config_path()?;
        let builder = ConfigBuilder::new();

        if path.exists() {
            Self::apply_file(builder, &path)
        } else {
            Ok(builder)
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let payload = PersistedConfig::from(self);
        let json = serde_json::to_string_pretty(&payload)
            .context("Failed to serialize configuration to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate(self)
    }

    fn apply_file(builder: ConfigBuilder, path: &Path) -> Result<ConfigBuilder> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(builder);
        }

        let file: FileConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing JSON config at {}", path.display()))?;

        Ok(file.apply(builder))
    }
}

impl FileConfig {
    pub(super) fn apply(self, builder: ConfigBuilder) -> ConfigBuilder {
        let FileConfig { llm, models } = self;

        let builder = match llm.provider {
            Some(provider) => builder.with_provider(provider),
            None => builder,
        };

        builder
            .with_llm(|settings| {
                if let Some(api_key) = llm.api_key {
                    settings.api_key = api_key;
                }
                if let Some(timeout) = llm.timeout_secs {
                    settings.timeout_secs = timeout;
                }
                if let Some(base_url) = llm.base_url {
                    settings.base_url = base_url;
                }
                if let Some(user_agent) = llm.user_agent {
                    settings.user_agent = user_agent;
                }
            })
            .with_models(|settings| {
                if let Some(model) = models.model {
                    settings.model = model;
                }
                if let Some(max_tokens) = models.max_tokens {
                    settings.max_tokens = max_tokens;
                }
                if let Some(temperature) = models.temperature {
                    settings.temperature = temperature;
                }
                if let Some(structured) = models.structured_output {
                    settings.structured_output = structured;
                }
            })
    }
}
