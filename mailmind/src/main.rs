use std::process::ExitCode;

use mailmind::{init, MailMindConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize environment variables from .env
    init();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match MailMindConfig::from_env() {
        Ok(config) => {
            info!(
                model = config.model(),
                provider = config.provider().unwrap_or("-"),
                temperature = config.model_temperature(),
                max_tokens = config.max_tokens(),
                redirect_uri = config.gmail_redirect_uri(),
                timeout_seconds = config.timeout_seconds(),
                retry_attempts = config.retry_attempts(),
                "Successfully loaded configuration"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
