use thiserror::Error;

/// Failures surfaced by the plan/generate/review pipeline.
///
/// None of these are retried. A failed trigger leaves the session exactly
/// as it was before the trigger fired.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport failure{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Schema violation for {contract}: {reason}")]
    SchemaViolation {
        contract: &'static str,
        reason: String,
    },

    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),
}

impl PipelineError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn schema(contract: &'static str, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            contract,
            reason: reason.into(),
        }
    }

    pub fn invalid_trigger(reason: impl Into<String>) -> Self {
        Self::InvalidTrigger(reason.into())
    }

    /// Short label used in user-facing error indicators.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Transport { .. } => "transport",
            PipelineError::SchemaViolation { .. } => "schema",
            PipelineError::InvalidTrigger(_) => "trigger",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_includes_status_when_known() {
        let err = PipelineError::http(429, "Rate limit exceeded");
        assert_eq!(
            err.to_string(),
            "Transport failure (status 429): Rate limit exceeded"
        );

        let err = PipelineError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport failure: connection refused");
    }

    #[test]
    fn schema_violation_names_the_contract() {
        let err = PipelineError::schema("CodeOutput", "missing field `code`");
        assert_eq!(err.kind(), "schema");
        assert!(err.to_string().contains("CodeOutput"));
        assert!(err.to_string().contains("missing field `code`"));
    }
}
