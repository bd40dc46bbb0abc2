//! State reconciler: keeps the in-memory list consistent with the store
//! across concurrent, independently failing operations.
//!
//! # Design
//! - `Session` is a cheap handle over one shared `Inner`; clone it into as
//!   many tasks as there are operations in flight.
//! - Every transition goes through `apply`, which holds the write lock for
//!   one synchronous closure and then publishes a `Snapshot`. Locks are never
//!   held across a store call.
//! - Results arrive and apply in completion order, not issue order.
//! - A failed call is logged, downgraded to a `TodoError`, raised on the
//!   banner, and returned to the caller. Busy marks are released on both
//!   branches.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use todo_core::Todo;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::banner::ERROR_TIMEOUT;
use crate::error::TodoError;
use crate::state::AppState;
use crate::store::TodoStore;
use crate::view::{Filter, Snapshot};

/// Per-item results of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: Vec<u64>,
    pub failed: Vec<u64>,
}

impl BulkOutcome {
    fn collect<T>(ids: Vec<u64>, results: Vec<Result<T, TodoError>>) -> Self {
        let mut outcome = Self::default();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(_) => outcome.succeeded.push(id),
                Err(_) => outcome.failed.push(id),
            }
        }
        outcome
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

struct Inner<S> {
    store: S,
    state: RwLock<AppState>,
    updates: watch::Sender<Snapshot>,
    error_timeout: Duration,
}

pub struct Session<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TodoStore + 'static> Session<S> {
    pub fn new(store: S) -> Self {
        Self::with_error_timeout(store, ERROR_TIMEOUT)
    }

    pub fn with_error_timeout(store: S, error_timeout: Duration) -> Self {
        let (updates, _) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(Inner {
                store,
                state: RwLock::new(AppState::default()),
                updates,
                error_timeout,
            }),
        }
    }

    /// Receiver that sees a fresh `Snapshot` after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.updates.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.state.read().await.snapshot()
    }

    /// Current authoritative copy of one todo, ignoring the filter.
    pub async fn todo(&self, id: u64) -> Option<Todo> {
        self.inner.state.read().await.find(id).cloned()
    }

    async fn apply<R>(&self, transition: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = self.inner.state.write().await;
        let out = transition(&mut state);
        self.inner.updates.send_replace(state.snapshot());
        out
    }

    /// Apply `transition` and raise `error` in the same step, then start the
    /// banner countdown.
    async fn fail(&self, error: TodoError, transition: impl FnOnce(&mut AppState)) -> TodoError {
        let generation = self
            .apply(|state| {
                transition(state);
                state.error.raise(error)
            })
            .await;
        self.schedule_expiry(generation);
        error
    }

    fn schedule_expiry(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.error_timeout).await;
            let mut state = inner.state.write().await;
            if state.error.expire(generation) {
                inner.updates.send_replace(state.snapshot());
            }
        });
    }

    /// The placeholder has no remote identity; nothing is sent for it and it
    /// never enters the busy set.
    async fn reject_unsaved(&self, error: TodoError) -> TodoError {
        warn!("ignoring operation on unsaved todo");
        self.fail(error, |_| {}).await
    }

    pub async fn set_filter(&self, filter: Filter) {
        self.apply(|state| state.filter = filter).await;
    }

    pub async fn dismiss_error(&self) {
        self.apply(|state| state.error.dismiss()).await;
    }

    /// Fetch the owner's todos. Only the first call does anything.
    pub async fn load(&self) -> Result<(), TodoError> {
        let first = self
            .apply(|state| {
                state.error.dismiss();
                state.begin_load()
            })
            .await;
        if !first {
            warn!("initial load already ran; ignoring");
            return Ok(());
        }

        debug!(owner = self.inner.store.owner(), "loading todos");
        match self.inner.store.list_all().await {
            Ok(todos) => {
                debug!(count = todos.len(), "loaded todos");
                self.apply(|state| state.replace_all(todos)).await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load todos");
                Err(self.fail(TodoError::Load, |_| {}).await)
            }
        }
    }

    /// Create a todo. A blank title is rejected before any network call.
    pub async fn add(&self, title: &str) -> Result<Todo, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(self.fail(TodoError::EmptyTitle, |_| {}).await);
        }

        let placeholder = Todo::placeholder(self.inner.store.owner(), title);
        let token = self.apply(|state| state.stage(placeholder)).await;

        debug!(title, "creating todo");
        match self.inner.store.create(title).await {
            Ok(created) => {
                self.apply(|state| {
                    state.append(created.clone());
                    state.unstage(token);
                })
                .await;
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "failed to create todo");
                Err(self.fail(TodoError::Add, |state| state.unstage(token)).await)
            }
        }
    }

    pub async fn delete(&self, id: u64) -> Result<(), TodoError> {
        if id == Todo::TEMP_ID {
            return Err(self.reject_unsaved(TodoError::Delete).await);
        }
        self.apply(|state| state.mark_busy(id)).await;

        debug!(id, "deleting todo");
        match self.inner.store.remove(id).await {
            Ok(()) => {
                self.apply(|state| {
                    state.remove(id);
                    state.unmark_busy(id);
                })
                .await;
                Ok(())
            }
            Err(err) => {
                warn!(id, error = %err, "failed to delete todo");
                Err(self.fail(TodoError::Delete, |state| state.unmark_busy(id)).await)
            }
        }
    }

    /// Delete every completed todo, each independently.
    pub async fn delete_completed(&self) -> BulkOutcome {
        let ids: Vec<u64> = {
            let state = self.inner.state.read().await;
            state
                .todos()
                .iter()
                .filter(|todo| todo.completed)
                .map(|todo| todo.id)
                .collect()
        };

        let results = join_all(ids.iter().map(|&id| self.delete(id))).await;
        BulkOutcome::collect(ids, results)
    }

    /// Flip one todo's completion, trusting the value the store echoes back.
    pub async fn toggle(&self, todo: &Todo) -> Result<Todo, TodoError> {
        self.set_status(todo.id, !todo.completed, TodoError::Update).await
    }

    /// Complete everything, or un-complete everything if all are done
    /// already. Todos already at the target are skipped.
    ///
    /// Per-item failures surface as `TodoError::Delete`.
    pub async fn toggle_all(&self) -> BulkOutcome {
        let (target, ids) = {
            let state = self.inner.state.read().await;
            let target = !state.todos().iter().all(|todo| todo.completed);
            let ids: Vec<u64> = state
                .todos()
                .iter()
                .filter(|todo| todo.completed != target)
                .map(|todo| todo.id)
                .collect();
            (target, ids)
        };

        let results = join_all(
            ids.iter()
                .map(|&id| self.set_status(id, target, TodoError::Delete)),
        )
        .await;
        BulkOutcome::collect(ids, results)
    }

    async fn set_status(
        &self,
        id: u64,
        completed: bool,
        on_failure: TodoError,
    ) -> Result<Todo, TodoError> {
        if id == Todo::TEMP_ID {
            return Err(self.reject_unsaved(on_failure).await);
        }
        self.apply(|state| state.mark_busy(id)).await;

        debug!(id, completed, "updating status");
        match self.inner.store.update_status(id, completed).await {
            Ok(updated) => {
                self.apply(|state| {
                    state.set_completed(id, updated.completed);
                    state.unmark_busy(id);
                })
                .await;
                Ok(updated)
            }
            Err(err) => {
                warn!(id, error = %err, "failed to update status");
                Err(self.fail(on_failure, |state| state.unmark_busy(id)).await)
            }
        }
    }

    /// Rename a todo. An unchanged title succeeds without a call; a blank
    /// one deletes the todo instead.
    pub async fn rename(&self, id: u64, title: &str) -> Result<(), TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return self.delete(id).await;
        }

        if id == Todo::TEMP_ID {
            return Err(self.reject_unsaved(TodoError::Update).await);
        }

        let unchanged = self.inner.state.read().await.title_of(id) == Some(title);
        if unchanged {
            return Ok(());
        }

        self.apply(|state| state.mark_busy(id)).await;

        debug!(id, title, "renaming todo");
        match self.inner.store.update_title(id, title).await {
            Ok(updated) => {
                self.apply(|state| {
                    state.set_title(id, updated.title);
                    state.unmark_busy(id);
                })
                .await;
                Ok(())
            }
            Err(err) => {
                warn!(id, error = %err, "failed to rename todo");
                Err(self.fail(TodoError::Update, |state| state.unmark_busy(id)).await)
            }
        }
    }
}
