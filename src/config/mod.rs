//! Configuration for the planwright pipeline.
//!
//! Settings are layered: built-in defaults, then `~/.planwright/config`
//! (JSON), then environment variables. The provider credential must be
//! present after layering or loading fails.

mod builder;
mod constants;
mod defaults;
mod environment;
mod loader;
mod types;
mod validation;

pub use types::{Config, LlmProvider, LlmSettings, ModelSettings};

#[cfg(test)]
pub(crate) mod test_env;
