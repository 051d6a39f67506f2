use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::configuration::{MailMindConfig, RunnableConfig};
use super::source::{ConfigSource, ProcessEnv};
use super::state::{InputState, OutputState};

/// The orchestration graph that handles a request.
///
/// Implemented by the pipeline that talks to Gmail and the LLM; this crate
/// only defines the boundary.
#[async_trait]
pub trait EmailGraph: Send + Sync {
    async fn invoke(&self, input: InputState, settings: &MailMindConfig) -> Result<OutputState>;
}

/// Runs one invocation with settings derived from its runtime bag.
///
/// Settings errors are returned as-is. A failing graph yields an
/// [`OutputState::error`] instead.
pub async fn run_graph<G>(
    graph: &G,
    input: InputState,
    config: Option<&RunnableConfig>,
) -> Result<OutputState>
where
    G: EmailGraph + ?Sized,
{
    run_graph_with(graph, input, config, &ProcessEnv).await
}

pub async fn run_graph_with<G, S>(
    graph: &G,
    input: InputState,
    config: Option<&RunnableConfig>,
    source: &S,
) -> Result<OutputState>
where
    G: EmailGraph + ?Sized,
    S: ConfigSource + Sync + ?Sized,
{
    let settings = MailMindConfig::from_runnable_config_with(config, source)?;
    Ok(invoke_with(graph, input, &settings).await)
}

/// Runs one invocation with already validated settings.
pub async fn invoke_with<G>(graph: &G, input: InputState, settings: &MailMindConfig) -> OutputState
where
    G: EmailGraph + ?Sized,
{
    let user_id = input.user_id.clone();
    info!(user_id = %user_id, model = settings.model(), "Invoking email graph");

    match graph.invoke(input, settings).await {
        Ok(output) => output,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Email graph failed");
            OutputState::error(e.to_string())
        }
    }
}
