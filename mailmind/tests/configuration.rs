use std::collections::HashMap;

use mailmind::{ConfigError, MailMindConfig};
use serde_json::json;

fn credentials_env() -> HashMap<String, String> {
    [
        ("GOOGLE_API_KEY", "google-key"),
        ("GMAIL_CLIENT_ID", "client-id"),
        ("GMAIL_CLIENT_SECRET", "client-secret"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

#[test]
fn explicit_values_are_kept_as_given() {
    let config = MailMindConfig::builder()
        .model("openai/gpt-4o-mini")
        .model_temperature(0.4)
        .max_tokens(1024)
        .gmail_client_id("id")
        .gmail_client_secret("secret")
        .gmail_redirect_uri("https://mail.example.com/oauth/callback")
        .google_api_key("key")
        .timeout_seconds(10)
        .retry_attempts(5)
        .build_with(&credentials_env())
        .unwrap();

    assert_eq!(config.model(), "openai/gpt-4o-mini");
    assert_eq!(config.model_temperature(), 0.4);
    assert_eq!(config.max_tokens(), 1024);
    assert_eq!(config.gmail_client_id(), Some("id"));
    assert_eq!(config.gmail_client_secret(), Some("secret"));
    assert_eq!(config.google_api_key(), Some("key"));
    assert_eq!(config.timeout_seconds(), 10);
    assert_eq!(config.retry_attempts(), 5);
    assert_eq!(
        config.redirect_url().unwrap().host_str(),
        Some("mail.example.com")
    );
}

#[test]
fn runnable_config_takes_known_keys_only() {
    let bag = json!({ "configurable": { "max_tokens": 4096, "unused_key": "x" } });

    let config = MailMindConfig::from_runnable_config_with(Some(&bag), &credentials_env()).unwrap();

    assert_eq!(config.max_tokens(), 4096);
    assert!(!format!("{:?}", config).contains("unused_key"));
}

#[test]
fn runnable_config_without_configurable_uses_environment() {
    let mut env = credentials_env();
    env.insert("MODEL".to_string(), "anthropic/claude-3-haiku".to_string());

    for bag in [None, Some(json!({})), Some(json!({ "configurable": "nope" })), Some(json!(42))] {
        let config = MailMindConfig::from_runnable_config_with(bag.as_ref(), &env).unwrap();
        assert_eq!(config.model(), "anthropic/claude-3-haiku");
    }
}

#[test]
fn runnable_config_values_pass_through_validation() {
    let bag = json!({ "configurable": { "model_temperature": 1.5, "retry_attempts": -1 } });

    let error = MailMindConfig::from_runnable_config_with(Some(&bag), &credentials_env()).unwrap_err();
    let text = error.to_string();

    assert!(text.contains("model_temperature must be between 0.0 and 1.0"));
    assert!(text.contains("retry_attempts must be non-negative"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn runnable_config_rejects_badly_typed_known_keys() {
    let bag = json!({ "configurable": { "max_tokens": [1, 2] } });

    let error = MailMindConfig::from_runnable_config_with(Some(&bag), &credentials_env()).unwrap_err();

    assert!(matches!(error, ConfigError::InvalidValue { field: "max_tokens", .. }));
}

#[test]
fn temperature_error_co_occurs_with_missing_credentials() {
    let error = MailMindConfig::builder()
        .model_temperature(1.5)
        .build_with(&HashMap::<String, String>::new())
        .unwrap_err();
    let text = error.to_string();

    assert!(text.contains("model_temperature must be between 0.0 and 1.0"));
    assert!(text.contains("GOOGLE_API_KEY is required"));
    assert!(text.contains("Gmail API credentials"));
}
