use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A user intent forwarded into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum TimerCommand {
    Start,
    Pause,
    Resume,
    Cancel,
    SetHours(u8),
    SetMinutes(u8),
    SetSeconds(u8),
}

impl FromStr for TimerCommand {
    type Err = ValidationError;

    /// Parse one line of input: `start`, `pause`, `resume`, `cancel`
    /// (or their first letters), or `hours N`, `minutes N`, `seconds N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| ValidationError::UnknownCommand(String::new()))?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(ValidationError::UnknownCommand(s.trim().to_string()));
        }

        let value = |arg: Option<&str>| -> Result<u8, ValidationError> {
            let raw = arg.ok_or_else(|| ValidationError::InvalidFormat {
                input: s.trim().to_string(),
                message: "missing value".into(),
            })?;
            raw.parse::<u8>().map_err(|_| ValidationError::InvalidFormat {
                input: raw.to_string(),
                message: "expected a number from 0 to 255".into(),
            })
        };

        let cmd = match (verb, arg) {
            ("start" | "s", None) => TimerCommand::Start,
            ("pause" | "p", None) => TimerCommand::Pause,
            ("resume" | "r", None) => TimerCommand::Resume,
            ("cancel" | "c", None) => TimerCommand::Cancel,
            ("hours" | "h", arg) => TimerCommand::SetHours(value(arg)?),
            ("minutes" | "m", arg) => TimerCommand::SetMinutes(value(arg)?),
            ("seconds" | "sec", arg) => TimerCommand::SetSeconds(value(arg)?),
            _ => return Err(ValidationError::UnknownCommand(s.trim().to_string())),
        };
        Ok(cmd)
    }
}
