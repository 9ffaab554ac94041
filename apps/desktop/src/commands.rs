//! Commands typed into an interactive session.

use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  select <path>   pick an image file (max 10 MB, PNG and JPG recommended)
  remove          forget the selected image
  submit          classify the selected image
  status          show the selected file and the current result
  help            show this text
  quit            leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Select(PathBuf),
    Remove,
    Submit,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    MissingPath,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Result<UiCommand, ParseError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "select" | "open" => {
            if rest.is_empty() {
                Err(ParseError::MissingPath)
            } else {
                Ok(UiCommand::Select(PathBuf::from(unquote(rest))))
            }
        }
        "remove" => Ok(UiCommand::Remove),
        "submit" | "classify" => Ok(UiCommand::Submit),
        "status" => Ok(UiCommand::Status),
        "help" | "?" => Ok(UiCommand::Help),
        "quit" | "exit" => Ok(UiCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
