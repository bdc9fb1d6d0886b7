//! Tokenizer for prefix-style command lines: `verb target value`, e.g. `gain ch1 1.5`.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const MAX_CHANNEL: u8 = 3;

/// Unit tag attached to a numeric token. Time units are normalized to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Multiplier,
    Seconds,
    Hertz,
}

/// One classified argument token.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Number(f64),
    Channel(u8),
    Multiplier(f64),
    Text(String),
}

impl Argument {
    pub fn classify(token: &str) -> Self {
        if let Some((value, unit)) = parse_value(token) {
            return match unit {
                Some(Unit::Multiplier) => Argument::Multiplier(value),
                _ => Argument::Number(value),
            };
        }
        if let Some(id) = parse_channel_target(token) {
            return Argument::Channel(id);
        }
        Argument::Text(token.to_string())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Number(value) => write!(f, "{value}"),
            Argument::Channel(id) => write!(f, "ch{id}"),
            Argument::Multiplier(value) => write!(f, "{value}x"),
            Argument::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub verb: String,
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
        }
    }
}

impl std::error::Error for ParseError {}

fn channel_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^ch(\d+)$").ok()).as_ref()
}

/// `ch0`..`ch3` (case-insensitive). Out-of-range ids return `None`.
pub fn parse_channel_target(token: &str) -> Option<u8> {
    let lowered = token.to_lowercase();
    let captures = channel_pattern()?.captures(&lowered)?;
    let id: u8 = captures.get(1)?.as_str().parse().ok()?;
    (id <= MAX_CHANNEL).then_some(id)
}

fn finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a number with an optional unit suffix.
///
/// Suffixes are checked in order: `x`, `ms`, `us`/`µs`, `s`, `Hz`, then a bare number.
pub fn parse_value(token: &str) -> Option<(f64, Option<Unit>)> {
    let token = token.trim();
    if let Some(number) = token.strip_suffix('x') {
        return finite(number).map(|v| (v, Some(Unit::Multiplier)));
    }
    if let Some(number) = token.strip_suffix("ms") {
        return finite(number).map(|v| (v / 1000.0, Some(Unit::Seconds)));
    }
    for micro in ["us", "\u{b5}s", "\u{3bc}s"] {
        if let Some(number) = token.strip_suffix(micro) {
            return finite(number).map(|v| (v / 1e6, Some(Unit::Seconds)));
        }
    }
    if let Some(number) = token.strip_suffix('s') {
        return finite(number).map(|v| (v, Some(Unit::Seconds)));
    }
    if let Some(number) = token.strip_suffix("Hz") {
        return finite(number).map(|v| (v, Some(Unit::Hertz)));
    }
    finite(token).map(|v| (v, None))
}

/// Split a line into a lowercased verb and classified arguments.
pub fn parse(line: &str) -> Result<ParsedCommand, ParseError> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().ok_or(ParseError::Empty)?.to_lowercase();
    let args = tokens.map(Argument::classify).collect();
    Ok(ParsedCommand { verb, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_then_number() {
        let parsed = parse("gain ch1 1.5").expect("parse");
        assert_eq!(parsed.verb, "gain");
        assert_eq!(parsed.args, vec![Argument::Channel(1), Argument::Number(1.5)]);
    }

    #[test]
    fn verb_is_lowercased() {
        let parsed = parse("  SEEK 1.5  ").expect("parse");
        assert_eq!(parsed.verb, "seek");
        assert_eq!(parsed.args, vec![Argument::Number(1.5)]);
    }

    #[test]
    fn empty_and_blank_lines_fail() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse(" \t "), Err(ParseError::Empty));
        assert_eq!(ParseError::Empty.to_string(), "empty command");
    }

    #[test]
    fn unit_suffixes_normalize() {
        assert_eq!(parse_value("10ms"), Some((0.01, Some(Unit::Seconds))));
        assert_eq!(parse_value("250us"), Some((0.00025, Some(Unit::Seconds))));
        assert_eq!(parse_value("5\u{b5}s"), Some((0.000005, Some(Unit::Seconds))));
        assert_eq!(parse_value("2s"), Some((2.0, Some(Unit::Seconds))));
        assert_eq!(parse_value("120Hz"), Some((120.0, Some(Unit::Hertz))));
        assert_eq!(parse_value("1.5x"), Some((1.5, Some(Unit::Multiplier))));
        assert_eq!(parse_value("0.25"), Some((0.25, None)));
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("x"), None);
    }

    #[test]
    fn multiplier_token_is_tagged() {
        let parsed = parse("gain ch0 2x").expect("parse");
        assert_eq!(parsed.args[1], Argument::Multiplier(2.0));
        assert_eq!(parsed.args[1].to_string(), "2x");
    }

    #[test]
    fn out_of_range_channel_is_text() {
        assert_eq!(parse_channel_target("ch3"), Some(3));
        assert_eq!(parse_channel_target("CH0"), Some(0));
        assert_eq!(parse_channel_target("ch5"), None);
        let parsed = parse("gain ch5 1").expect("parse");
        assert_eq!(parsed.args[0], Argument::Text("ch5".to_string()));
    }

    #[test]
    fn non_finite_numbers_stay_text() {
        let parsed = parse("seek inf NaN").expect("parse");
        assert_eq!(
            parsed.args,
            vec![Argument::Text("inf".into()), Argument::Text("NaN".into())]
        );
    }
}
