//! Line commands accepted by the terminal front end.

use thiserror::Error;
use todo_core::Todo;

use crate::view::{Filter, Snapshot, UnknownFilter};

pub const HELP: &str = "\
commands:
  add <title>            create a todo
  rm <id>                delete a todo
  toggle <id>            flip a todo's completion
  toggle-all             complete all, or reopen all if everything is done
  rename <id> <title>    change a title (empty title deletes)
  clear-completed        delete every completed todo
  filter <all|active|completed>
  dismiss                hide the error banner
  list                   redraw the list
  help                   show this text
  quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Delete(u64),
    Toggle(u64),
    ToggleAll,
    Rename(u64, String),
    ClearCompleted,
    Filter(Filter),
    Dismiss,
    List,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),
    #[error("{0:?} is not a todo id")]
    BadId(String),
    #[error(transparent)]
    Filter(#[from] UnknownFilter),
}

/// Why the front end will not send a command right now.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Refusal {
    #[error("still saving the previous todo, wait for it before adding another")]
    Submitting,
    #[error("todo {0} is still saving, wait for it to finish")]
    Busy(u64),
    #[error("the new todo has no id until it is saved")]
    Unsaved,
}

impl Command {
    /// The todo a per-item command acts on.
    pub fn target(&self) -> Option<u64> {
        match self {
            Command::Delete(id) | Command::Toggle(id) | Command::Rename(id, _) => Some(*id),
            _ => None,
        }
    }

    /// Controls that conflict with an in-flight operation are disabled:
    /// one add at a time, and nothing on a busy or unsaved todo.
    pub fn check(&self, snapshot: &Snapshot) -> Result<(), Refusal> {
        if matches!(self, Command::Add(_)) && snapshot.submitting {
            return Err(Refusal::Submitting);
        }
        match self.target() {
            Some(Todo::TEMP_ID) => Err(Refusal::Unsaved),
            Some(id) if snapshot.is_busy(id) => Err(Refusal::Busy(id)),
            _ => Ok(()),
        }
    }

    /// Parse one input line. The title arguments keep their inner spacing;
    /// trimming is left to the session.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match verb {
            "" | "list" | "ls" => Ok(Command::List),
            "add" | "a" => Ok(Command::Add(rest.to_string())),
            "rm" | "delete" => Ok(Command::Delete(parse_id("rm", rest)?)),
            "toggle" | "t" => Ok(Command::Toggle(parse_id("toggle", rest)?)),
            "toggle-all" => Ok(Command::ToggleAll),
            "rename" | "mv" => {
                let rest = rest.trim_start();
                let (id, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::Rename(parse_id("rename", id)?, title.to_string()))
            }
            "clear-completed" | "clear" => Ok(Command::ClearCompleted),
            "filter" | "f" => Ok(Command::Filter(rest.parse()?)),
            "dismiss" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(verb: &'static str, raw: &str) -> Result<u64, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CommandError::MissingId(verb));
    }
    raw.parse().map_err(|_| CommandError::BadId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_on(ids: &[u64]) -> Snapshot {
        Snapshot {
            busy: ids.iter().copied().collect(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn add_is_refused_while_submitting() {
        let submitting = Snapshot {
            temp: Some(Todo::placeholder(1, "first")),
            submitting: true,
            ..Snapshot::default()
        };
        let add = Command::Add("second".to_string());
        assert_eq!(add.check(&submitting), Err(Refusal::Submitting));
        assert_eq!(add.check(&Snapshot::default()), Ok(()));
        assert_eq!(Command::Toggle(3).check(&submitting), Ok(()));
    }

    #[test]
    fn item_commands_are_refused_on_busy_ids() {
        let snapshot = busy_on(&[4]);
        assert_eq!(Command::Delete(4).check(&snapshot), Err(Refusal::Busy(4)));
        assert_eq!(Command::Toggle(4).check(&snapshot), Err(Refusal::Busy(4)));
        assert_eq!(
            Command::Rename(4, "x".to_string()).check(&snapshot),
            Err(Refusal::Busy(4))
        );
        assert_eq!(Command::Delete(5).check(&snapshot), Ok(()));
        assert_eq!(Command::ToggleAll.check(&snapshot), Ok(()));
    }

    #[test]
    fn item_commands_are_refused_on_unsaved_id() {
        let snapshot = Snapshot::default();
        assert_eq!(Command::Delete(0).check(&snapshot), Err(Refusal::Unsaved));
        assert_eq!(
            Command::Rename(0, "x".to_string()).check(&snapshot),
            Err(Refusal::Unsaved)
        );
        assert_eq!(Command::Toggle(0).check(&snapshot), Err(Refusal::Unsaved));
    }

    #[test]
    fn parses_titles_verbatim() {
        assert_eq!(
            Command::parse("add buy  milk").unwrap(),
            Command::Add("buy  milk".to_string())
        );
        assert_eq!(Command::parse("add").unwrap(), Command::Add(String::new()));
    }

    #[test]
    fn parses_ids() {
        assert_eq!(Command::parse("rm 4").unwrap(), Command::Delete(4));
        assert_eq!(Command::parse("toggle 12").unwrap(), Command::Toggle(12));
        assert_eq!(
            Command::parse("rename 3 walk the cat").unwrap(),
            Command::Rename(3, "walk the cat".to_string())
        );
        assert_eq!(
            Command::parse("rename 3").unwrap(),
            Command::Rename(3, String::new())
        );
    }

    #[test]
    fn rejects_bad_ids() {
        assert_eq!(Command::parse("rm"), Err(CommandError::MissingId("rm")));
        assert_eq!(
            Command::parse("toggle x"),
            Err(CommandError::BadId("x".to_string()))
        );
    }

    #[test]
    fn parses_filters_and_bare_verbs() {
        assert_eq!(
            Command::parse("filter active").unwrap(),
            Command::Filter(Filter::Active)
        );
        assert!(matches!(
            Command::parse("filter soon"),
            Err(CommandError::Filter(_))
        ));
        assert_eq!(Command::parse("toggle-all").unwrap(), Command::ToggleAll);
        assert_eq!(Command::parse("").unwrap(), Command::List);
        assert_eq!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
