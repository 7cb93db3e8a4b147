//! Serialized access to the process environment for tests.

use std::sync::{Mutex, MutexGuard, OnceLock};

const MANAGED_VARS: &[&str] = &[
    "PLANWRIGHT_PROVIDER",
    "PLANWRIGHT_BASE_URL",
    "PLANWRIGHT_MODEL",
    "PLANWRIGHT_TIMEOUT_SECS",
    "PLANWRIGHT_MAX_TOKENS",
    "PLANWRIGHT_TEMPERATURE",
    "PLANWRIGHT_STRUCTURED_OUTPUT",
    "GEMINI_API_KEY",
    "OPENROUTER_API_KEY",
    "OPENAI_API_KEY",
];

pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    /// Clears every variable the loader reads, then applies `vars`.
    pub(crate) fn new(vars: &[(&str, Option<&str>)]) -> Self {
        let mut keys: Vec<&str> = MANAGED_VARS.to_vec();
        keys.extend(vars.iter().map(|(key, _)| *key));
        keys.push("HOME");

        let saved = keys
            .iter()
            .map(|key| (key.to_string(), std::env::var(key).ok()))
            .collect::<Vec<_>>();

        for key in MANAGED_VARS {
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in vars {
            match value {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.iter().rev() {
            match value {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
