use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StateError;

/// Id of a [`Role::Remove`] message that clears every earlier message.
pub const REMOVE_ALL_MESSAGES: &str = "__remove_all__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
    Tool,
    /// Marker asking the reducer to delete the message with the same id.
    Remove,
}

/// A conversation message exchanged with the orchestration graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }

    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Deletion marker for the message with `id`.
    pub fn remove(id: impl Into<String>) -> Self {
        Self::new(Role::Remove, "").with_id(id)
    }

    pub fn remove_all() -> Self {
        Self::remove(REMOVE_ALL_MESSAGES)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_removal(&self) -> bool {
        self.role == Role::Remove
    }

    fn ensure_id(&mut self) -> &str {
        self.id.get_or_insert_with(|| Uuid::new_v4().to_string())
    }
}

/// Merges `right` into `left` by message id.
///
/// Messages without an id get a fresh one. A message whose id is already
/// present replaces it in place, new ids are appended, and first-seen order
/// is kept. [`Role::Remove`] markers delete the message they name; a
/// `REMOVE_ALL_MESSAGES` marker drops everything before the last such marker.
pub fn add_messages(
    mut left: Vec<Message>,
    mut right: Vec<Message>,
) -> Result<Vec<Message>, StateError> {
    for message in left.iter_mut() {
        message.ensure_id();
    }

    let mut remove_all_at = None;
    for (index, message) in right.iter_mut().enumerate() {
        let clears_all = message.ensure_id() == REMOVE_ALL_MESSAGES && message.is_removal();
        if clears_all {
            remove_all_at = Some(index);
        }
    }
    if let Some(index) = remove_all_at {
        return Ok(right.split_off(index + 1));
    }

    let mut merged = left;
    let mut positions: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .filter_map(|(index, message)| message.id.clone().map(|id| (id, index)))
        .collect();
    let mut to_remove: HashSet<String> = HashSet::new();

    for message in right {
        let id = message.id.clone().unwrap_or_default();
        match positions.get(&id).copied() {
            Some(_) if message.is_removal() => {
                to_remove.insert(id);
            }
            Some(index) => {
                to_remove.remove(&id);
                merged[index] = message;
            }
            None if message.is_removal() => {
                return Err(StateError::UnknownMessageId(id));
            }
            None => {
                positions.insert(id, merged.len());
                merged.push(message);
            }
        }
    }

    merged.retain(|message| {
        message
            .id
            .as_ref()
            .map_or(true, |id| !to_remove.contains(id))
    });
    Ok(merged)
}
