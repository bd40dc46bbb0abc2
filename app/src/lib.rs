//! Client-side reconciler for a remote todo list.
//!
//! # Overview
//! A `Session` owns the in-memory list for one owner and keeps it consistent
//! with a `TodoStore` while add, delete, toggle, and rename calls are in
//! flight, publishing a `Snapshot` after every transition.
//!
//! # Design
//! - `store`: the remote collection seam and its HTTP implementation.
//! - `state`: the owned container and its synchronous transitions.
//! - `session`: async operations that sequence store calls and transitions.
//! - `view`: pure filtering and derived counts.
//! - `banner`: the single auto-expiring error slot.
//! - `config`, `command`, `render`: the terminal front end.

pub mod banner;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod state;
pub mod store;
pub mod view;

pub use banner::{ErrorSlot, ERROR_TIMEOUT};
pub use config::{Config, ConfigError};
pub use error::{TodoError, TransportError};
pub use session::{BulkOutcome, Session};
pub use store::{HttpTodoStore, TodoStore};
pub use view::{Filter, Snapshot, Summary};
