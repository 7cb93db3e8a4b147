use anyhow::{Context, Result};
use colored::*;

use crate::config::{Config, LlmProvider};

use super::args::ConfigArgs;
use super::util::mask_api_key;

pub(crate) fn handle_config(args: &ConfigArgs) -> Result<()> {
    let persisted = update_config(args)?;

    if args.has_updates() {
        println!(
            "✅ Configuration saved to {}",
            Config::config_path()?.display()
        );
    }

    let effective = persisted.with_env_overrides()?;
    print_config(&effective);

    if let Err(err) = effective.validate() {
        println!();
        println!("{} {}", "⚠️".yellow(), err.to_string().yellow());
    }

    Ok(())
}

/// Apply `args` to the file-backed config and save it when anything changed.
/// Environment overrides are left out so they are never written to disk.
pub(crate) fn update_config(args: &ConfigArgs) -> Result<Config> {
    let mut config = Config::load_persisted()?;

    if args.has_updates() {
        apply_updates(&mut config, args)?;
        config.save()?;
    }

    Ok(config)
}

fn apply_updates(config: &mut Config, args: &ConfigArgs) -> Result<()> {
    if let Some(provider) = &args.provider {
        let provider: LlmProvider = provider.parse()?;
        if provider != config.llm.provider {
            let previous = config.clone();
            *config = Config::builder()
                .with_provider(provider)
                .with_llm(|llm| {
                    llm.timeout_secs = previous.llm.timeout_secs;
                    llm.user_agent = previous.llm.user_agent;
                })
                .with_models(|models| {
                    models.max_tokens = previous.models.max_tokens;
                    models.temperature = previous.models.temperature;
                })
                .build()
                .context("Failed to switch provider")?;
        }
    }

    if let Some(api_key) = &args.api_key {
        config.llm.api_key = api_key.trim().to_string();
    }

    if let Some(model) = &args.model {
        config.models.model = model.trim().to_string();
    }

    if let Some(base_url) = &args.base_url {
        config.llm.base_url = base_url.trim().to_string();
    }

    if let Some(timeout) = args.timeout {
        config.llm.timeout_secs = timeout;
    }

    if let Some(max_tokens) = args.max_tokens {
        config.models.max_tokens = max_tokens;
    }

    if let Some(temperature) = args.temperature {
        config.models.temperature = temperature;
    }

    if let Some(structured) = args.structured_output {
        config.models.structured_output = structured;
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("📋 Current configuration:");
    println!("   Provider: {}", config.llm.provider.display_name());
    println!("   API Key: {}", mask_api_key(&config.llm.api_key));
    println!("   Base URL: {}", config.llm.base_url);
    println!("   Model: {}", config.models.model);
    println!("   Timeout: {}s", config.llm.timeout_secs);
    println!("   Max Tokens: {}", config.models.max_tokens);
    println!("   Temperature: {}", config.models.temperature);
    println!("   Structured Output: {}", config.models.structured_output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env::{EnvGuard, env_lock};
    use tempfile::TempDir;

    fn args() -> ConfigArgs {
        ConfigArgs {
            provider: None,
            api_key: None,
            model: None,
            base_url: None,
            timeout: None,
            max_tokens: None,
            temperature: None,
            structured_output: None,
        }
    }

    #[test]
    fn update_never_persists_environment_values() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();

        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", Some("env-only-secret")),
            ("PLANWRIGHT_MODEL", Some("env-model")),
        ]);

        let saved = update_config(&ConfigArgs {
            timeout: Some(30),
            ..args()
        })
        .unwrap();
        assert_eq!(saved.llm.timeout_secs, 30);

        let written = std::fs::read_to_string(Config::config_path().unwrap()).unwrap();
        assert!(!written.contains("env-only-secret"));
        assert!(!written.contains("env-model"));

        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["llm"]["api_key"], "");
        assert_eq!(json["llm"]["timeout_secs"], 30);
    }

    #[test]
    fn switching_provider_discards_old_key() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();
        let _env = EnvGuard::new(&[("HOME", Some(home.as_str()))]);

        update_config(&ConfigArgs {
            api_key: Some("gemini-key".to_string()),
            ..args()
        })
        .unwrap();

        let switched = update_config(&ConfigArgs {
            provider: Some("openai".to_string()),
            ..args()
        })
        .unwrap();
        assert_eq!(switched.llm.provider, LlmProvider::OpenAi);
        assert_eq!(switched.llm.api_key, "");
        assert_eq!(switched.llm.base_url, LlmProvider::OpenAi.default_base_url());
    }

    #[test]
    fn without_updates_nothing_is_written() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();
        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", Some("env-only-secret")),
        ]);

        update_config(&args()).unwrap();
        assert!(!Config::config_path().unwrap().exists());
    }
}
