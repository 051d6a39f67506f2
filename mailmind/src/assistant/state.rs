use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::StateError;
use super::messages::{add_messages, Message};

pub const DEFAULT_USER_ID: &str = "default_user";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

/// What a caller hands to the email graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Conversation so far. Combined with [`add_messages`], never overwritten.
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            user_id: default_user_id(),
        }
    }
}

impl InputState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            user_id: user_id.into(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Folds a later record into this one. Messages merge by id; `user_id`
    /// takes the later value.
    pub fn merge(&mut self, other: InputState) -> Result<(), StateError> {
        self.apply(InputStateUpdate {
            messages: other.messages,
            user_id: Some(other.user_id),
        })
    }

    pub fn apply(&mut self, update: InputStateUpdate) -> Result<(), StateError> {
        self.messages = add_messages(self.messages.clone(), update.messages)?;
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        Ok(())
    }
}

/// Partial change to an [`InputState`], as produced by one graph step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputStateUpdate {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// What the email graph hands back.
///
/// `status` is free text; `pending`, `success` and `error` are the values
/// callers look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputState {
    /// Email content, search results, drafts and so on.
    #[serde(default)]
    pub result: Map<String, Value>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl Default for OutputState {
    fn default() -> Self {
        Self {
            result: Map::new(),
            status: default_status(),
            message: String::new(),
        }
    }
}

impl OutputState {
    pub fn success(result: Map<String, Value>, message: impl Into<String>) -> Self {
        Self {
            result,
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: Map::new(),
            status: STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }
}
