use thiserror::Error;

/// Errors raised while building a [`MailMindConfig`](super::configuration::MailMindConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// One or more validation rules failed. Every broken rule is listed.
    #[error("Configuration validation failed:\n{}", format_errors(.errors))]
    Validation { errors: Vec<String> },

    /// An environment variable could not be converted to the field's type.
    #[error("invalid value {value:?} in {env_key} for {field}: expected {expected}")]
    Coercion {
        field: &'static str,
        env_key: String,
        value: String,
        expected: &'static str,
    },

    /// An explicit value had the wrong shape for its field.
    #[error("invalid value for {field}: expected {expected}, found {found}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("unknown configuration field: {0}")]
    UnknownField(String),
}

impl ConfigError {
    /// Validation messages, empty for any other kind of failure.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            ConfigError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

fn format_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|error| format!("  - {}", error))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors raised while merging graph state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Attempting to delete a message with an ID that doesn't exist ('{0}')")]
    UnknownMessageId(String),
}
