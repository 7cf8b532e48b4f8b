//! Line-oriented driver commands read from stdin.

use std::{str::FromStr, time::Duration};

use keycode::{Chord, Key};
use thiserror::Error;

/// One driver command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Key press.
    Down(Key),
    /// Key release.
    Up(Key),
    /// Press every key of a combination, then release them in reverse.
    Tap(Chord),
    /// Pause before reading the next command.
    Wait(Duration),
    /// Reload the configuration file and swap the table.
    Reload,
    /// Hide the persistent overlay.
    Dismiss,
    /// Print the engine phase.
    Status,
    /// Stop the engine and exit.
    Quit,
}

/// Error parsing a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// First word is not a command.
    #[error("unknown command '{0}'")]
    Unknown(String),
    /// Command needs an argument.
    #[error("'{0}' needs an argument")]
    MissingArg(&'static str),
    /// Argument is not a key.
    #[error("unknown key '{0}'")]
    BadKey(String),
    /// Argument is not a combination.
    #[error("invalid key combination '{0}'")]
    BadChord(String),
    /// Argument is not a number of milliseconds.
    #[error("invalid duration '{0}'")]
    BadNumber(String),
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.parse().map(Some)
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (word, rest) = s
            .trim()
            .split_once(char::is_whitespace)
            .map_or((s.trim(), ""), |(w, r)| (w, r.trim()));
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseError::MissingArg(name))
            } else {
                Ok(rest)
            }
        };
        let key = |name: &'static str| {
            let raw = arg(name)?;
            Key::from_spec(raw).ok_or_else(|| ParseError::BadKey(raw.to_string()))
        };
        match word.to_ascii_lowercase().as_str() {
            "down" | "press" => key("down").map(Self::Down),
            "up" | "release" => key("up").map(Self::Up),
            "tap" => {
                let raw = arg("tap")?;
                Chord::parse(raw)
                    .map(Self::Tap)
                    .ok_or_else(|| ParseError::BadChord(raw.to_string()))
            }
            "wait" | "sleep" => {
                let raw = arg("wait")?;
                raw.parse::<u64>()
                    .map(|ms| Self::Wait(Duration::from_millis(ms)))
                    .map_err(|_| ParseError::BadNumber(raw.to_string()))
            }
            "reload" => Ok(Self::Reload),
            "dismiss" => Ok(Self::Dismiss),
            "status" => Ok(Self::Status),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}
