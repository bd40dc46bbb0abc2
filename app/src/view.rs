//! Derived views over the authoritative list.
//!
//! Everything here is a pure function of `(todos, filter)`; the reconciler
//! recomputes it after every transition and publishes it as a `Snapshot`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use todo_core::Todo;

use crate::error::TodoError;

/// View selector over the list by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter {0:?} (expected all, active or completed)")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    /// Accepts the plain names and the URL fragment forms (`#/active`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('#').trim_start_matches('/');
        match name.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// The subsequence of `todos` selected by `filter`, in list order.
pub fn visible(todos: &[Todo], filter: Filter) -> Vec<Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).cloned().collect()
}

/// Counts that drive the footer and the toggle-all affordance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub active_count: usize,
    pub all_completed: bool,
    pub any_completed: bool,
}

impl Summary {
    pub fn of(todos: &[Todo]) -> Self {
        let active_count = todos.iter().filter(|todo| !todo.completed).count();
        Self {
            total: todos.len(),
            active_count,
            all_completed: !todos.is_empty() && active_count == 0,
            any_completed: active_count < todos.len(),
        }
    }

    /// Footer and toggle-all are only offered for a non-empty list.
    pub fn has_items(&self) -> bool {
        self.total > 0
    }

    pub fn items_left(&self) -> String {
        let noun = if self.active_count == 1 { "item" } else { "items" };
        format!("{} {noun} left", self.active_count)
    }
}

/// Everything the presentation layer needs after a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub visible: Vec<Todo>,
    pub temp: Option<Todo>,
    pub busy: BTreeSet<u64>,
    pub error: Option<TodoError>,
    pub filter: Filter,
    pub summary: Summary,
    /// An add is in flight; the new-todo input should not accept another.
    pub submitting: bool,
}

impl Snapshot {
    pub fn is_busy(&self, id: u64) -> bool {
        self.busy.contains(&id)
    }

    pub fn error_text(&self) -> Option<String> {
        self.error.map(|error| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: u64, completed: bool) -> Todo {
        Todo {
            id,
            user_id: 1,
            title: format!("todo {id}"),
            completed,
        }
    }

    fn ids(todos: &[Todo]) -> Vec<u64> {
        todos.iter().map(|t| t.id).collect()
    }

    #[test]
    fn filters_select_by_completion() {
        let list = vec![todo(1, false), todo(2, true), todo(3, false)];
        assert_eq!(ids(&visible(&list, Filter::All)), vec![1, 2, 3]);
        assert_eq!(ids(&visible(&list, Filter::Active)), vec![1, 3]);
        assert_eq!(ids(&visible(&list, Filter::Completed)), vec![2]);
    }

    #[test]
    fn active_and_completed_partition_all() {
        let lists = [
            vec![],
            vec![todo(1, true)],
            vec![todo(1, false), todo(2, false)],
            vec![todo(4, true), todo(2, false), todo(9, true), todo(3, false)],
        ];
        for list in lists {
            let mut active = ids(&visible(&list, Filter::Active));
            let completed = ids(&visible(&list, Filter::Completed));
            assert!(active.iter().all(|id| !completed.contains(id)));
            active.extend(completed);
            active.sort_unstable();
            let mut all = ids(&visible(&list, Filter::All));
            all.sort_unstable();
            assert_eq!(active, all);
        }
    }

    #[test]
    fn summary_of_empty_list() {
        let summary = Summary::of(&[]);
        assert!(!summary.all_completed);
        assert!(!summary.any_completed);
        assert!(!summary.has_items());
        assert_eq!(summary.items_left(), "0 items left");
    }

    #[test]
    fn summary_counts() {
        let summary = Summary::of(&[todo(1, false), todo(2, true)]);
        assert_eq!(summary.active_count, 1);
        assert!(summary.any_completed);
        assert!(!summary.all_completed);
        assert_eq!(summary.items_left(), "1 item left");

        let summary = Summary::of(&[todo(1, true), todo(2, true)]);
        assert!(summary.all_completed);
        assert_eq!(summary.items_left(), "0 items left");
    }

    #[test]
    fn filter_parses_names_and_fragments() {
        assert_eq!("active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("Completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert_eq!("#/".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("#/completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("done".parse::<Filter>().is_err());
    }
}
