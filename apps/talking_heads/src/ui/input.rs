//! Line commands typed by the user.

use chrono::NaiveDate;
use thiserror::Error;

use crate::controller::events::{GivenDate, UserIntent};

pub const HELP: &str = "\
commands:
  add                      start a new talk
  edit N                   edit talk number N
  rate N S                 set the score (1-5) of talk number N in place
  title TEXT               set the title of the open talk
  score N                  set the score (1-5) of the open talk
  given YYYY-MM-DD|today|none
  fetch                    suggest a title for the new talk
  confirm                  add the new talk
  done                     finish editing
  remove                   delete the talk being edited (asks first)
  yes | no                 answer the delete question
  dismiss                  close the new-talk form or an alert
  load | save | clear      talk store actions
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("unknown command `{0}`; type `help`")]
    UnknownCommand(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{value}` is not a valid argument for `{command}`")]
    InvalidArgument { command: &'static str, value: String },
}

pub fn parse_command(line: &str) -> Result<UserIntent, InputError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "" => return Err(InputError::Empty),
        "add" => UserIntent::Add,
        "edit" => UserIntent::Edit(parse_number("edit", rest)?),
        "rate" => {
            let (number, score) = rest.split_once(char::is_whitespace).ok_or(
                InputError::MissingArgument {
                    command: "rate",
                    expected: "a talk number and a score",
                },
            )?;
            UserIntent::Rate(parse_number("rate", number)?, parse_score("rate", score.trim())?)
        }
        // An empty title is allowed; it only disables confirm/done.
        "title" => UserIntent::Title(rest.to_string()),
        "score" => UserIntent::Score(parse_score("score", rest)?),
        "given" => UserIntent::Given(parse_given(rest)?),
        "fetch" => UserIntent::FetchTitle,
        "confirm" => UserIntent::ConfirmAdd,
        "done" => UserIntent::Done,
        "remove" => UserIntent::Remove,
        "yes" | "y" => UserIntent::ConfirmRemoval,
        "no" | "n" => UserIntent::CancelRemoval,
        "dismiss" | "ok" | "cancel" => UserIntent::Dismiss,
        "load" => UserIntent::Load,
        "save" => UserIntent::Save,
        "clear" => UserIntent::Clear,
        "show" | "ls" => UserIntent::Show,
        "help" | "?" => UserIntent::Help,
        "quit" | "exit" | "q" => UserIntent::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(intent)
}

fn parse_number(command: &'static str, value: &str) -> Result<usize, InputError> {
    if value.is_empty() {
        return Err(InputError::MissingArgument {
            command,
            expected: "a number",
        });
    }
    value.parse().map_err(|_| invalid(command, value))
}

fn parse_score(command: &'static str, value: &str) -> Result<u8, InputError> {
    let score = parse_number(command, value)?;
    u8::try_from(score).map_err(|_| invalid(command, value))
}

fn parse_given(value: &str) -> Result<GivenDate, InputError> {
    match value.to_ascii_lowercase().as_str() {
        "" => Err(InputError::MissingArgument {
            command: "given",
            expected: "a date (YYYY-MM-DD), `today` or `none`",
        }),
        "today" => Ok(GivenDate::Today),
        "none" | "no" => Ok(GivenDate::NotGiven),
        date => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(GivenDate::On)
            .map_err(|_| invalid("given", value)),
    }
}

fn invalid(command: &'static str, value: &str) -> InputError {
    InputError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}
