pub mod configuration;
pub mod error;
pub mod graph;
pub mod messages;
pub mod source;
pub mod state;
