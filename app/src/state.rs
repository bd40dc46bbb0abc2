//! The single owned state container behind a session.
//!
//! # Design
//! Every method here is a synchronous, in-memory transition. The reconciler
//! calls exactly one batch of them per lock acquisition, so observers never
//! see a half-applied operation.

use std::collections::BTreeSet;

use todo_core::Todo;

use crate::banner::ErrorSlot;
use crate::view::{self, Filter, Snapshot, Summary};

/// Placeholder for an add that has not resolved yet, tagged with the
/// submission that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    token: u64,
    todo: Todo,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    todos: Vec<Todo>,
    temp: Option<Pending>,
    next_token: u64,
    busy: BTreeSet<u64>,
    pub filter: Filter,
    pub error: ErrorSlot,
    loaded: bool,
}

impl AppState {
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn title_of(&self, id: u64) -> Option<&str> {
        self.find(id).map(|todo| todo.title.as_str())
    }

    pub fn temp(&self) -> Option<&Todo> {
        self.temp.as_ref().map(|pending| &pending.todo)
    }

    pub fn busy(&self) -> &BTreeSet<u64> {
        &self.busy
    }

    /// Flip the loaded flag; returns `false` if a load already happened.
    pub fn begin_load(&mut self) -> bool {
        !std::mem::replace(&mut self.loaded, true)
    }

    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    /// Show `todo` as the in-flight placeholder and return its token.
    pub fn stage(&mut self, todo: Todo) -> u64 {
        self.next_token += 1;
        self.temp = Some(Pending {
            token: self.next_token,
            todo,
        });
        self.next_token
    }

    /// Drop the placeholder if it still belongs to `token`.
    pub fn unstage(&mut self, token: u64) {
        if self.temp.as_ref().is_some_and(|pending| pending.token == token) {
            self.temp = None;
        }
    }

    pub fn append(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    pub fn remove(&mut self, id: u64) {
        self.todos.retain(|todo| todo.id != id);
    }

    pub fn set_completed(&mut self, id: u64, completed: bool) {
        for todo in self.todos.iter_mut().filter(|todo| todo.id == id) {
            todo.completed = completed;
        }
    }

    pub fn set_title(&mut self, id: u64, title: String) {
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) {
            todo.title = title;
        }
    }

    pub fn mark_busy(&mut self, id: u64) {
        self.busy.insert(id);
    }

    pub fn unmark_busy(&mut self, id: u64) {
        self.busy.remove(&id);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            visible: view::visible(&self.todos, self.filter),
            temp: self.temp().cloned(),
            busy: self.busy.clone(),
            error: self.error.current(),
            filter: self.filter,
            summary: Summary::of(&self.todos),
            submitting: self.temp.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TodoError;

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            user_id: 1,
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn load_is_only_granted_once() {
        let mut state = AppState::default();
        assert!(state.begin_load());
        assert!(!state.begin_load());
    }

    #[test]
    fn stale_token_keeps_newer_placeholder() {
        let mut state = AppState::default();
        let first = state.stage(Todo::placeholder(1, "first"));
        let second = state.stage(Todo::placeholder(1, "second"));
        state.unstage(first);
        assert_eq!(state.temp().map(|t| t.title.as_str()), Some("second"));
        state.unstage(second);
        assert!(state.temp().is_none());
    }

    #[test]
    fn edits_only_touch_the_target() {
        let mut state = AppState::default();
        state.replace_all(vec![todo(1, "a", false), todo(2, "b", false)]);
        state.set_completed(2, true);
        state.set_title(1, "renamed".to_string());
        assert_eq!(
            state.todos(),
            &[todo(1, "renamed", false), todo(2, "b", true)]
        );
        state.remove(1);
        assert_eq!(state.todos(), &[todo(2, "b", true)]);
    }

    #[test]
    fn edits_on_missing_id_are_ignored() {
        let mut state = AppState::default();
        state.replace_all(vec![todo(1, "a", false)]);
        state.set_completed(9, true);
        state.set_title(9, "x".to_string());
        state.remove(9);
        assert_eq!(state.todos(), &[todo(1, "a", false)]);
    }

    #[test]
    fn snapshot_reflects_filter_busy_and_error() {
        let mut state = AppState::default();
        state.replace_all(vec![todo(1, "a", false), todo(2, "b", true)]);
        state.filter = Filter::Completed;
        state.mark_busy(2);
        state.error.raise(TodoError::Update);
        state.stage(Todo::placeholder(1, "c"));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.visible, vec![todo(2, "b", true)]);
        assert!(snapshot.is_busy(2));
        assert_eq!(snapshot.error_text().as_deref(), Some("Unable to update a todo"));
        assert_eq!(snapshot.summary.active_count, 1);
        assert!(snapshot.submitting);
        assert_eq!(snapshot.temp.map(|t| t.id), Some(Todo::TEMP_ID));

        state.unmark_busy(2);
        assert!(!state.snapshot().is_busy(2));
    }
}
