pub mod assistant;

pub use assistant::configuration::{ConfigBuilder, MailMindConfig, RunnableConfig};
pub use assistant::error::{ConfigError, StateError};
pub use assistant::graph::{run_graph, run_graph_with, EmailGraph};
pub use assistant::messages::{add_messages, Message, Role};
pub use assistant::source::{ConfigSource, ProcessEnv};
pub use assistant::state::{InputState, InputStateUpdate, OutputState};

use dotenv::dotenv;

/// Loads `.env` into the process environment, if one exists.
pub fn init() {
    dotenv().ok();
}
