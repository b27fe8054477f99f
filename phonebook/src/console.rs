use std::fmt::Write as _;

use phonebook_core::RecordId;
use thiserror::Error;

use crate::sync::{Decision, NotificationKind, ViewState};

pub const HELP: &str = "\
Commands:
  list                    show the contacts again
  add <name> <number>     add a contact (the last word is the number)
  name <text>             set the draft name
  number <text>           set the draft number
  submit                  submit the draft
  update <id>             overwrite a contact with the draft
  delete <id>             delete a contact
  filter [text]           show contacts whose name contains text
  refresh                 reload contacts from the server
  yes | no                answer the pending question
  help                    show this help
  quit                    exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { name: String, number: String },
    Name(String),
    Number(String),
    Submit,
    Update(RecordId),
    Delete(RecordId),
    Filter(String),
    Refresh,
    Answer(Decision),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "" => Err(CommandError::Empty),
        "list" | "ls" => Ok(Command::List),
        "add" => {
            let (name, number) = rest
                .rsplit_once(char::is_whitespace)
                .map(|(name, number)| (name.trim(), number))
                .filter(|(name, _)| !name.is_empty())
                .ok_or(CommandError::Usage("add <name> <number>"))?;
            Ok(Command::Add {
                name: name.to_string(),
                number: number.to_string(),
            })
        }
        "name" => Ok(Command::Name(rest.to_string())),
        "number" => Ok(Command::Number(rest.to_string())),
        "submit" => Ok(Command::Submit),
        "update" => required_id(rest, "update <id>").map(Command::Update),
        "delete" | "rm" => required_id(rest, "delete <id>").map(Command::Delete),
        "filter" => Ok(Command::Filter(rest.to_string())),
        "refresh" => Ok(Command::Refresh),
        "yes" | "y" => Ok(Command::Answer(Decision::Accept)),
        "no" | "n" => Ok(Command::Answer(Decision::Decline)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required_id(rest: &str, usage: &'static str) -> Result<RecordId, CommandError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(CommandError::Usage(usage));
    }
    Ok(RecordId::parse(rest))
}

pub fn render(view: &ViewState) -> String {
    let mut out = String::from("Phonebook\n");
    if let Some(notification) = &view.notification {
        let tag = match notification.kind {
            NotificationKind::Info => "info",
            NotificationKind::Error => "error",
        };
        let _ = writeln!(out, "[{tag}] {}", notification.message);
    }
    if !view.filter.is_empty() {
        let _ = writeln!(out, "Filter by name: {}", view.filter);
    }
    if !view.draft.name.is_empty() || !view.draft.number.is_empty() {
        let _ = writeln!(
            out,
            "Draft: name: {} number: {}",
            view.draft.name, view.draft.number
        );
    }
    out.push_str("Contacts\n");
    if view.visible.is_empty() {
        out.push_str("  (none)\n");
    }
    for record in &view.visible {
        let _ = writeln!(out, "  [{}] {} {}", record.id, record.name, record.number);
    }
    if let Some(pending) = &view.pending_confirmation {
        let _ = writeln!(out, "? {} [yes/no]", pending.prompt());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::PendingConfirmation;
    use phonebook_core::{ContactFields, Record};

    #[test]
    fn parses_add_with_multi_word_name() {
        assert_eq!(
            parse_command("add Ada Lovelace 040-123").unwrap(),
            Command::Add {
                name: "Ada Lovelace".to_string(),
                number: "040-123".to_string(),
            }
        );
        assert_eq!(
            parse_command("add Ada"),
            Err(CommandError::Usage("add <name> <number>"))
        );
    }

    #[test]
    fn parses_ids_and_answers() {
        assert_eq!(
            parse_command("delete 2").unwrap(),
            Command::Delete(RecordId::Number(2))
        );
        assert_eq!(
            parse_command("update x9").unwrap(),
            Command::Update(RecordId::Text("x9".to_string()))
        );
        assert_eq!(
            parse_command(" y ").unwrap(),
            Command::Answer(Decision::Accept)
        );
        assert_eq!(parse_command("no").unwrap(), Command::Answer(Decision::Decline));
        assert!(parse_command("delete").is_err());
    }

    #[test]
    fn filter_without_text_clears_it() {
        assert_eq!(parse_command("filter").unwrap(), Command::Filter(String::new()));
        assert_eq!(
            parse_command("filter  ad ").unwrap(),
            Command::Filter("ad".to_string())
        );
    }

    #[test]
    fn rejects_unknown_and_empty_input() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("frobnicate"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn render_shows_visible_records_and_prompt() {
        let bob = Record {
            id: RecordId::Number(2),
            name: "Bob".to_string(),
            number: "456".to_string(),
        };
        let view = ViewState {
            snapshot: vec![bob.clone()],
            visible: vec![bob.clone()],
            filter: "bo".to_string(),
            draft: ContactFields::new("Ada", ""),
            pending_confirmation: Some(PendingConfirmation::Delete { record: bob }),
            ..ViewState::default()
        };

        let text = render(&view);

        assert!(text.contains("Filter by name: bo\n"));
        assert!(text.contains("Draft: name: Ada number: \n"));
        assert!(text.contains("  [2] Bob 456\n"));
        assert!(text.ends_with("? Confirm deletion of: Bob [yes/no]\n"));
    }

    #[test]
    fn render_marks_empty_list() {
        let text = render(&ViewState::default());
        assert_eq!(text, "Phonebook\nContacts\n  (none)\n");
    }
}
