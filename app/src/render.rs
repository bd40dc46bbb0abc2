//! Plain-text rendering of a `Snapshot`.

use std::fmt::Write;

use todo_core::Todo;

use crate::view::Snapshot;

pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    if snapshot.summary.has_items() {
        let marker = if snapshot.summary.all_completed { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{marker} toggle all");
    }

    for todo in &snapshot.visible {
        row(&mut out, todo, snapshot.is_busy(todo.id));
    }
    if let Some(temp) = &snapshot.temp {
        row(&mut out, temp, true);
    }

    if snapshot.summary.has_items() {
        let clear = if snapshot.summary.any_completed {
            " | clear-completed"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{} | filter: {}{clear}",
            snapshot.summary.items_left(),
            snapshot.filter
        );
    }

    if let Some(error) = snapshot.error_text() {
        let _ = writeln!(out, "! {error} (dismiss)");
    }

    out
}

fn row(out: &mut String, todo: &Todo, loading: bool) {
    let check = if todo.completed { "[x]" } else { "[ ]" };
    let id = if todo.is_temporary() {
        "-".to_string()
    } else {
        todo.id.to_string()
    };
    let spinner = if loading { " ..." } else { "" };
    let _ = writeln!(out, "{check} {id:>4} {}{spinner}", todo.title);
}
