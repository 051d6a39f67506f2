use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use enum_as_inner::EnumAsInner;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::ConfigError;
use super::source::{ConfigSource, ProcessEnv};

/// Per-invocation configuration bag handed over by the orchestration runtime.
///
/// Settings live under its `configurable` key.
pub type RunnableConfig = Value;

pub const CONFIGURABLE_KEY: &str = "configurable";

pub const DEFAULT_MODEL: &str = "google_genai/gemini-1.5-flash";
pub const DEFAULT_MODEL_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_MAX_TOKENS: i64 = 2048;
pub const DEFAULT_GMAIL_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: i64 = 3;

/// Tokens (compared case-insensitively) that read as `true` for boolean fields.
pub const TRUTHY_TOKENS: [&str; 4] = ["true", "1", "yes", "on"];

/// A raw setting value before it is materialized into [`MailMindConfig`].
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum ConfigValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    OptionalStr,
    Int,
    Float,
    Bool,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Str => "a string",
            FieldKind::OptionalStr => "a string or null",
            FieldKind::Int => "an integer",
            FieldKind::Float => "a number",
            FieldKind::Bool => "a boolean",
        }
    }
}

/// One recognized setting: its name, type and literal default.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: fn() -> ConfigValue,
}

impl FieldSpec {
    /// Environment variable consulted for this field.
    pub fn env_key(&self) -> String {
        self.name.to_uppercase()
    }
}

/// The defaults table every build starts from.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "model",
        kind: FieldKind::Str,
        default: default_model,
    },
    FieldSpec {
        name: "model_temperature",
        kind: FieldKind::Float,
        default: default_model_temperature,
    },
    FieldSpec {
        name: "max_tokens",
        kind: FieldKind::Int,
        default: default_max_tokens,
    },
    FieldSpec {
        name: "gmail_client_id",
        kind: FieldKind::OptionalStr,
        default: unset,
    },
    FieldSpec {
        name: "gmail_client_secret",
        kind: FieldKind::OptionalStr,
        default: unset,
    },
    FieldSpec {
        name: "gmail_redirect_uri",
        kind: FieldKind::Str,
        default: default_gmail_redirect_uri,
    },
    FieldSpec {
        name: "google_api_key",
        kind: FieldKind::OptionalStr,
        default: unset,
    },
    FieldSpec {
        name: "timeout_seconds",
        kind: FieldKind::Int,
        default: default_timeout_seconds,
    },
    FieldSpec {
        name: "retry_attempts",
        kind: FieldKind::Int,
        default: default_retry_attempts,
    },
];

fn default_model() -> ConfigValue {
    ConfigValue::Str(DEFAULT_MODEL.to_string())
}

fn default_model_temperature() -> ConfigValue {
    ConfigValue::Float(DEFAULT_MODEL_TEMPERATURE)
}

fn default_max_tokens() -> ConfigValue {
    ConfigValue::Int(DEFAULT_MAX_TOKENS)
}

fn default_gmail_redirect_uri() -> ConfigValue {
    ConfigValue::Str(DEFAULT_GMAIL_REDIRECT_URI.to_string())
}

fn default_timeout_seconds() -> ConfigValue {
    ConfigValue::Int(DEFAULT_TIMEOUT_SECONDS)
}

fn default_retry_attempts() -> ConfigValue {
    ConfigValue::Int(DEFAULT_RETRY_ATTEMPTS)
}

fn unset() -> ConfigValue {
    ConfigValue::Null
}

/// Looks up a recognized field by name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

pub fn is_truthy(raw: &str) -> bool {
    TRUTHY_TOKENS
        .iter()
        .any(|token| raw.eq_ignore_ascii_case(token))
}

fn parse_raw(kind: FieldKind, raw: &str) -> Option<ConfigValue> {
    match kind {
        FieldKind::Str | FieldKind::OptionalStr => Some(ConfigValue::Str(raw.to_string())),
        FieldKind::Int => raw.trim().parse().ok().map(ConfigValue::Int),
        FieldKind::Float => raw.trim().parse().ok().map(ConfigValue::Float),
        FieldKind::Bool => Some(ConfigValue::Bool(is_truthy(raw))),
    }
}

/// Converts an environment variable's text into the field's type.
pub fn coerce_env_value(
    spec: &FieldSpec,
    env_key: &str,
    raw: &str,
) -> Result<ConfigValue, ConfigError> {
    parse_raw(spec.kind, raw).ok_or_else(|| ConfigError::Coercion {
        field: spec.name,
        env_key: env_key.to_string(),
        value: raw.to_string(),
        expected: spec.kind.expected(),
    })
}

fn invalid(spec: &FieldSpec, found: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: spec.name,
        expected: spec.kind.expected(),
        found: found.into(),
    }
}

fn json_to_config_value(spec: &FieldSpec, value: Value) -> Result<ConfigValue, ConfigError> {
    match (spec.kind, value) {
        (FieldKind::OptionalStr, Value::Null) => Ok(ConfigValue::Null),
        (_, Value::Null) => Ok((spec.default)()),
        (FieldKind::Str | FieldKind::OptionalStr, Value::String(text)) => {
            Ok(ConfigValue::Str(text))
        }
        (FieldKind::Int, Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| {
                        float.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(float)
                    })
                    .map(|float| float as i64)
            })
            .map(ConfigValue::Int)
            .ok_or_else(|| invalid(spec, number.to_string())),
        (FieldKind::Float, Value::Number(number)) => number
            .as_f64()
            .map(ConfigValue::Float)
            .ok_or_else(|| invalid(spec, number.to_string())),
        (FieldKind::Bool, Value::Bool(flag)) => Ok(ConfigValue::Bool(flag)),
        (kind, Value::String(text)) => {
            parse_raw(kind, &text).ok_or_else(|| invalid(spec, format!("{:?}", text)))
        }
        (_, other) => Err(invalid(spec, other.to_string())),
    }
}

/// Layered settings builder.
///
/// Starts from [`FIELDS`] defaults, takes explicit values, then fills every
/// field still at its default (or null) from a [`ConfigSource`] before
/// validating the result.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    values: BTreeMap<&'static str, ConfigValue>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            values: FIELDS
                .iter()
                .map(|spec| (spec.name, (spec.default)()))
                .collect(),
        }
    }

    /// Sets a field by name from a JSON value.
    pub fn set(mut self, name: &str, value: Value) -> Result<Self, ConfigError> {
        let spec = field(name).ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
        let value = json_to_config_value(spec, value)?;
        self.values.insert(spec.name, value);
        Ok(self)
    }

    fn put(mut self, name: &'static str, value: ConfigValue) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn model(self, model: impl Into<String>) -> Self {
        self.put("model", ConfigValue::Str(model.into()))
    }

    pub fn model_temperature(self, temperature: f64) -> Self {
        self.put("model_temperature", ConfigValue::Float(temperature))
    }

    pub fn max_tokens(self, max_tokens: i64) -> Self {
        self.put("max_tokens", ConfigValue::Int(max_tokens))
    }

    pub fn gmail_client_id(self, client_id: impl Into<String>) -> Self {
        self.put("gmail_client_id", ConfigValue::Str(client_id.into()))
    }

    pub fn gmail_client_secret(self, client_secret: impl Into<String>) -> Self {
        self.put("gmail_client_secret", ConfigValue::Str(client_secret.into()))
    }

    pub fn gmail_redirect_uri(self, redirect_uri: impl Into<String>) -> Self {
        self.put("gmail_redirect_uri", ConfigValue::Str(redirect_uri.into()))
    }

    pub fn google_api_key(self, api_key: impl Into<String>) -> Self {
        self.put("google_api_key", ConfigValue::Str(api_key.into()))
    }

    pub fn timeout_seconds(self, timeout_seconds: i64) -> Self {
        self.put("timeout_seconds", ConfigValue::Int(timeout_seconds))
    }

    pub fn retry_attempts(self, retry_attempts: i64) -> Self {
        self.put("retry_attempts", ConfigValue::Int(retry_attempts))
    }

    /// Builds against the process environment.
    pub fn build(self) -> Result<MailMindConfig, ConfigError> {
        self.build_with(&ProcessEnv)
    }

    pub fn build_with<S: ConfigSource + ?Sized>(
        mut self,
        source: &S,
    ) -> Result<MailMindConfig, ConfigError> {
        for spec in FIELDS {
            let default = (spec.default)();
            let current = self.values.entry(spec.name).or_insert_with(|| default.clone());
            if !current.is_null() && *current != default {
                continue;
            }

            let env_key = spec.env_key();
            if let Some(raw) = source.lookup(&env_key) {
                debug!(field = spec.name, env_key = %env_key, "Filling configuration field from environment");
                *current = coerce_env_value(spec, &env_key, &raw)?;
            }
        }

        let config = MailMindConfig {
            model: self.take_string("model")?,
            model_temperature: self.take_float("model_temperature")?,
            max_tokens: self.take_int("max_tokens")?,
            gmail_client_id: self.take_optional_string("gmail_client_id")?,
            gmail_client_secret: self.take_optional_string("gmail_client_secret")?,
            gmail_redirect_uri: self.take_string("gmail_redirect_uri")?,
            google_api_key: self.take_optional_string("google_api_key")?,
            timeout_seconds: self.take_int("timeout_seconds")?,
            retry_attempts: self.take_int("retry_attempts")?,
        };
        config.validate()?;
        Ok(config)
    }

    fn take(&mut self, name: &'static str) -> Result<(&'static FieldSpec, ConfigValue), ConfigError> {
        let spec = field(name).ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
        let value = self
            .values
            .remove(name)
            .unwrap_or_else(|| (spec.default)());
        Ok((spec, value))
    }

    fn take_string(&mut self, name: &'static str) -> Result<String, ConfigError> {
        let (spec, value) = self.take(name)?;
        value
            .into_str()
            .map_err(|other| invalid(spec, format!("{:?}", other)))
    }

    fn take_optional_string(&mut self, name: &'static str) -> Result<Option<String>, ConfigError> {
        match self.take(name)? {
            (_, ConfigValue::Null) => Ok(None),
            (_, ConfigValue::Str(text)) => Ok(Some(text)),
            (spec, other) => Err(invalid(spec, format!("{:?}", other))),
        }
    }

    fn take_int(&mut self, name: &'static str) -> Result<i64, ConfigError> {
        let (spec, value) = self.take(name)?;
        value
            .into_int()
            .map_err(|other| invalid(spec, format!("{:?}", other)))
    }

    fn take_float(&mut self, name: &'static str) -> Result<f64, ConfigError> {
        match self.take(name)? {
            (_, ConfigValue::Float(float)) => Ok(float),
            (_, ConfigValue::Int(int)) => Ok(int as f64),
            (spec, other) => Err(invalid(spec, format!("{:?}", other))),
        }
    }
}

/// Validated settings for the email assistant.
///
/// A value of this type always satisfies every validation rule; there is no
/// way to change it after construction.
#[derive(Clone, PartialEq)]
pub struct MailMindConfig {
    model: String,
    model_temperature: f64,
    max_tokens: i64,
    gmail_client_id: Option<String>,
    gmail_client_secret: Option<String>,
    gmail_redirect_uri: String,
    google_api_key: Option<String>,
    timeout_seconds: i64,
    retry_attempts: i64,
}

impl MailMindConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigBuilder::new().build()
    }

    /// Builds settings from the `configurable` entries of a runtime bag,
    /// falling back to the process environment.
    pub fn from_runnable_config(config: Option<&RunnableConfig>) -> Result<Self, ConfigError> {
        Self::from_runnable_config_with(config, &ProcessEnv)
    }

    pub fn from_runnable_config_with<S: ConfigSource + ?Sized>(
        config: Option<&RunnableConfig>,
        source: &S,
    ) -> Result<Self, ConfigError> {
        let configurable = config
            .and_then(|c| c.get(CONFIGURABLE_KEY))
            .and_then(|c| c.as_object());

        let mut builder = ConfigBuilder::new();
        if let Some(configurable) = configurable {
            for (key, value) in configurable {
                if field(key).is_none() {
                    debug!(key = %key, "Ignoring unrecognized configurable key");
                    continue;
                }
                builder = builder.set(key, value.clone())?;
            }
        }
        builder.build_with(source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if is_blank(&self.google_api_key) {
            errors.push("GOOGLE_API_KEY is required for LLM operations".to_string());
        }

        if is_blank(&self.gmail_client_id) || is_blank(&self.gmail_client_secret) {
            errors.push(
                "Gmail API credentials (GMAIL_CLIENT_ID, GMAIL_CLIENT_SECRET) are required"
                    .to_string(),
            );
        }

        if !(0.0..=1.0).contains(&self.model_temperature) {
            errors.push("model_temperature must be between 0.0 and 1.0".to_string());
        }

        if self.max_tokens <= 0 {
            errors.push("max_tokens must be positive".to_string());
        }

        if self.timeout_seconds <= 0 {
            errors.push("timeout_seconds must be positive".to_string());
        }

        if self.retry_attempts < 0 {
            errors.push("retry_attempts must be non-negative".to_string());
        }

        if Url::parse(&self.gmail_redirect_uri).is_err() {
            errors.push("gmail_redirect_uri must be a valid URL".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation { errors })
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The part of `model` before the first `/`, if any.
    pub fn provider(&self) -> Option<&str> {
        self.model.split_once('/').map(|(provider, _)| provider)
    }

    /// The part of `model` after the first `/`, or the whole identifier.
    pub fn model_name(&self) -> &str {
        self.model
            .split_once('/')
            .map_or(self.model.as_str(), |(_, name)| name)
    }

    pub fn model_temperature(&self) -> f64 {
        self.model_temperature
    }

    pub fn max_tokens(&self) -> i64 {
        self.max_tokens
    }

    pub fn gmail_client_id(&self) -> Option<&str> {
        self.gmail_client_id.as_deref()
    }

    pub fn gmail_client_secret(&self) -> Option<&str> {
        self.gmail_client_secret.as_deref()
    }

    pub fn gmail_redirect_uri(&self) -> &str {
        &self.gmail_redirect_uri
    }

    pub fn redirect_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.gmail_redirect_uri)
    }

    pub fn google_api_key(&self) -> Option<&str> {
        self.google_api_key.as_deref()
    }

    pub fn timeout_seconds(&self) -> i64 {
        self.timeout_seconds
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unsigned_abs())
    }

    pub fn retry_attempts(&self) -> i64 {
        self.retry_attempts
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "***"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for MailMindConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailMindConfig")
            .field("model", &self.model)
            .field("model_temperature", &self.model_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("gmail_client_id", &self.gmail_client_id)
            .field("gmail_client_secret", &redact(&self.gmail_client_secret))
            .field("gmail_redirect_uri", &self.gmail_redirect_uri)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}
