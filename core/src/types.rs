//! Domain DTOs for the todos collection.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Field names follow the endpoint's camelCase JSON (`userId`). Integration
//! tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Identifier reserved for an item the store has not persisted yet.
    pub const TEMP_ID: u64 = 0;

    /// The unsaved row shown while a create is in flight.
    pub fn placeholder(user_id: u64, title: &str) -> Self {
        Self {
            id: Self::TEMP_ID,
            user_id,
            title: title.to_string(),
            completed: false,
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.id == Self::TEMP_ID
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn status(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }
}
