//! Session configuration from flags and environment.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Shown instead of the task list when no owner is configured.
pub const SETUP_INSTRUCTIONS: &str = "\
No user id is configured, so there is no todo list to show.

Pick the numeric id your todos are stored under and pass it with
`--user-id <ID>` or export `TODO_USER_ID=<ID>`, then start again.
Point at a different collection endpoint with `--api-url` or `TODO_API_URL`.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no user id configured")]
    MissingUserId,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo", version, about = "Manage a remote todo list from the terminal")]
pub struct Config {
    /// Base URL of the todos collection endpoint.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Owner id every todo is scoped to.
    #[arg(long, env = "TODO_USER_ID")]
    pub user_id: Option<u64>,

    /// How long an error banner stays up, in milliseconds.
    #[arg(long, env = "TODO_ERROR_TIMEOUT_MS", default_value_t = 3000)]
    pub error_timeout_ms: u64,
}

impl Config {
    /// The configured owner. Zero is reserved and counts as unset.
    pub fn owner(&self) -> Result<u64, ConfigError> {
        match self.user_id {
            Some(id) if id != 0 => Ok(id),
            _ => Err(ConfigError::MissingUserId),
        }
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }
}
