//! Duration parsing for the `--{a,m,c}time-{older,newer}` CLI filters.

use clap::builder::{PossibleValue, TypedValueParser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, Command, Error as ClapError};
use std::ffi::OsStr;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseDurationError {
    Empty,
    InvalidNumber,
    InvalidUnit,
}

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty duration string"),
            Self::InvalidNumber => write!(f, "invalid number"),
            Self::InvalidUnit => write!(f, "invalid time unit (expected s, m, h, d, w or y)"),
        }
    }
}

impl std::error::Error for ParseDurationError {}

/// Parses a `<number><unit>` duration, e.g. `30s`, `2h`, `1w`.
///
/// # Errors
/// Returns [`ParseDurationError`] if the string is empty, the numeric
/// part doesn't parse, or the unit suffix isn't one of `s/m/h/d/w/y`.
pub fn parse_duration(raw: &str) -> Result<Duration, ParseDurationError> {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    let digit_end = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if digit_end == 0 {
        return Err(ParseDurationError::InvalidNumber);
    }

    let (num_str, unit_str) = s.split_at(digit_end);
    let quantity: u64 = num_str.parse().map_err(|_| ParseDurationError::InvalidNumber)?;

    let secs = match unit_str {
        "" | "s" | "sec" | "second" | "seconds" => quantity,
        "m" | "min" | "minute" | "minutes" => quantity * 60,
        "h" | "hour" | "hours" => quantity * 3600,
        "d" | "day" | "days" => quantity * 86400,
        "w" | "week" | "weeks" => quantity * 604_800,
        "y" | "year" | "years" => quantity * 31_536_000,
        _ => return Err(ParseDurationError::InvalidUnit),
    };

    Ok(Duration::from_secs(secs))
}

/// A `clap` value parser for `DUR` arguments, with suggested values on error.
#[derive(Clone, Debug)]
pub struct DurationParser;

impl TypedValueParser for DurationParser {
    type Value = Duration;

    fn parse_ref(
        &self,
        cmd: &Command,
        _arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, ClapError> {
        let value_str = value
            .to_str()
            .ok_or_else(|| ClapError::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;

        parse_duration(value_str).map_err(|err| {
            let mut error = ClapError::new(ErrorKind::InvalidValue).with_cmd(cmd);
            error.insert(
                ContextKind::InvalidValue,
                ContextValue::String(format!("{err}")),
            );
            error.insert(
                ContextKind::SuggestedValue,
                ContextValue::Strings(vec!["30s".into(), "15m".into(), "2h".into(), "7d".into()]),
            );
            error
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        Some(Box::new(
            [
                PossibleValue::new("30s").help("30 seconds"),
                PossibleValue::new("15m").help("15 minutes"),
                PossibleValue::new("2h").help("2 hours"),
                PossibleValue::new("7d").help("7 days"),
                PossibleValue::new("2w").help("2 weeks"),
            ]
            .into_iter(),
        ))
    }
}
