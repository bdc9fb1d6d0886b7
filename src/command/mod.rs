//! Command definitions shared by the registry, the line parser, and the completion engine.
//!
//! A [`CommandDef`] is plain data plus two function pointers: the handler, which receives an
//! explicit `&mut AppState` and the validated argument values, and an optional per-argument
//! completer. Nothing here captures ambient state.

mod help;
mod parser;
mod registry;
#[cfg(test)]
mod tests;

pub use parser::{parse, parse_channel_target, parse_value, Argument, ParseError, ParsedCommand, Unit};
pub use registry::CommandRegistry;

use crate::state::AppState;
use serde::Serialize;
use std::fmt;

/// Top-level command groups. Each group carries a display color index (1-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Transport,
    Params,
    Lanes,
    Markers,
    View,
    System,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 6] = [
        CommandCategory::Transport,
        CommandCategory::Params,
        CommandCategory::Lanes,
        CommandCategory::Markers,
        CommandCategory::View,
        CommandCategory::System,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandCategory::Transport => "transport",
            CommandCategory::Params => "params",
            CommandCategory::Lanes => "lanes",
            CommandCategory::Markers => "markers",
            CommandCategory::View => "view",
            CommandCategory::System => "system",
        }
    }

    pub fn color(self) -> u8 {
        match self {
            CommandCategory::Transport => 1,
            CommandCategory::Params => 2,
            CommandCategory::Lanes => 3,
            CommandCategory::Markers => 4,
            CommandCategory::View => 5,
            CommandCategory::System => 6,
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Float,
    String,
    Bool,
    Enum,
}

impl ParamType {
    pub fn label(self) -> &'static str {
        match self {
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Bool => "bool",
            ParamType::Enum => "enum",
        }
    }
}

/// A validated argument value as handed to a command handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// A float parameter given with an `x` suffix; handlers may treat it as a scale factor.
    Multiplier(f64),
    Bool(bool),
    Text(String),
    Channel(u8),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) | Value::Multiplier(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Render the value the way a user would type it.
    pub fn as_text(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Multiplier(v) => format!("{v}x"),
            Value::Bool(v) => v.to_string(),
            Value::Text(text) => text.clone(),
            Value::Channel(id) => format!("ch{id}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Declarative parameter schema used for validation, help, and completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandParam {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Present for optional parameters.
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub completions: Vec<String>,
}

impl CommandParam {
    pub fn new(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            min: None,
            max: None,
            enum_values: Vec::new(),
            default: None,
            completions: Vec::new(),
        }
    }

    pub fn float(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Float, description)
    }

    pub fn int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Int, description)
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::String, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Bool, description)
            .with_completions(&["on", "off"])
    }

    /// Enum parameter; its values double as the static completion list.
    pub fn choice(name: impl Into<String>, description: impl Into<String>, values: &[&str]) -> Self {
        let mut param = Self::new(name, ParamType::Enum, description);
        param.enum_values = values.iter().map(|v| v.to_string()).collect();
        param.completions = param.enum_values.clone();
        param
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn at_least(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn optional(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_completions(mut self, values: &[&str]) -> Self {
        self.completions = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Static completion values filtered by a case-insensitive prefix.
    pub fn static_completions(&self, partial: &str) -> Vec<String> {
        let needle = partial.to_lowercase();
        self.completions
            .iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
            .cloned()
            .collect()
    }

    /// Coerce a parsed argument into this parameter's type and check bounds.
    pub fn coerce(&self, arg: &Argument) -> Result<Value, String> {
        let value = match self.kind {
            ParamType::Float => match arg {
                Argument::Number(v) => Value::Float(*v),
                Argument::Multiplier(v) => Value::Multiplier(*v),
                other => return Err(format!("expected a number, got '{other}'")),
            },
            ParamType::Int => match arg {
                Argument::Number(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                    Value::Int(*v as i64)
                }
                other => return Err(format!("expected an integer, got '{other}'")),
            },
            ParamType::Bool => match arg {
                Argument::Number(v) if *v == 1.0 => Value::Bool(true),
                Argument::Number(v) if *v == 0.0 => Value::Bool(false),
                Argument::Text(text) => match text.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => Value::Bool(true),
                    "false" | "off" | "no" => Value::Bool(false),
                    _ => return Err(format!("expected on/off, got '{text}'")),
                },
                other => return Err(format!("expected on/off, got '{other}'")),
            },
            ParamType::String => match arg {
                Argument::Channel(id) => Value::Channel(*id),
                other => Value::Text(other.to_string()),
            },
            ParamType::Enum => {
                let text = arg.to_string();
                match self
                    .enum_values
                    .iter()
                    .find(|candidate| candidate.eq_ignore_ascii_case(&text))
                {
                    Some(canonical) => Value::Text(canonical.clone()),
                    None => {
                        return Err(format!("must be one of: {}", self.enum_values.join(", ")))
                    }
                }
            }
        };

        if let Some(number) = value.as_f64() {
            if let Some(min) = self.min {
                if number < min {
                    return Err(format!("must be >= {min}"));
                }
            }
            if let Some(max) = self.max {
                if number > max {
                    return Err(format!("must be <= {max}"));
                }
            }
        }
        Ok(value)
    }
}

/// Result a handler hands back to the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Message(String),
    Lines(Vec<String>),
    Silent,
    ClearOutput,
    Quit,
    /// Ask the frame loop to start a background analysis with the current kernel.
    Analyze,
}

impl CommandOutcome {
    pub fn message(text: impl Into<String>) -> Self {
        CommandOutcome::Message(text.into())
    }

    /// Lines to append to the CLI output panel.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            CommandOutcome::Message(text) => text.lines().map(str::to_string).collect(),
            CommandOutcome::Lines(lines) => lines.clone(),
            _ => Vec::new(),
        }
    }
}

/// Recoverable dispatch failures. The command is never invoked when one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument { name: String, usage: String },
    InvalidValue { name: String, reason: String },
    /// The handler ran and reported a failure.
    Handler(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => {
                write!(f, "no such command: {name} (type 'help' for commands)")
            }
            CommandError::MissingArgument { name, usage } => {
                write!(f, "missing argument <{name}> (usage: {usage})")
            }
            CommandError::InvalidValue { name, reason } => {
                write!(f, "invalid value for {name}: {reason}")
            }
            CommandError::Handler(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub type CommandHandler = fn(&mut AppState, &[Value]) -> Result<CommandOutcome, String>;

/// Dynamic completion for argument `index` given the partial token.
pub type ArgCompleter = fn(&AppState, usize, &str) -> Vec<String>;

/// Full command metadata. Immutable once registered.
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub name: String,
    pub category: CommandCategory,
    pub short: String,
    pub long: String,
    pub params: Vec<CommandParam>,
    pub key_binding: Option<String>,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub handler: CommandHandler,
    pub completer: Option<ArgCompleter>,
}

impl CommandDef {
    pub fn new(
        name: impl Into<String>,
        category: CommandCategory,
        short: impl Into<String>,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            short: short.into(),
            long: String::new(),
            params: Vec::new(),
            key_binding: None,
            aliases: Vec::new(),
            hidden: false,
            handler,
            completer: None,
        }
    }

    pub fn long(mut self, text: impl Into<String>) -> Self {
        self.long = text.into();
        self
    }

    pub fn param(mut self, param: CommandParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    pub fn key(mut self, binding: impl Into<String>) -> Self {
        self.key_binding = Some(binding.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn completer(mut self, completer: ArgCompleter) -> Self {
        self.completer = Some(completer);
        self
    }

    /// True when no required parameter follows an optional one.
    pub fn params_well_ordered(&self) -> bool {
        let mut seen_optional = false;
        for param in &self.params {
            if param.is_optional() {
                seen_optional = true;
            } else if seen_optional {
                return false;
            }
        }
        true
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.is_optional()).count()
    }

    /// Completions for argument `index`: the dynamic completer wins, otherwise the static list.
    pub fn get_completions(&self, state: &AppState, index: usize, partial: &str) -> Vec<String> {
        let Some(param) = self.params.get(index) else {
            return Vec::new();
        };
        match self.completer {
            Some(completer) => completer(state, index, partial),
            None => param.static_completions(partial),
        }
    }

    /// Validate arguments against the schema, filling defaults for omitted optionals.
    /// Arguments beyond the declared parameters are ignored.
    pub fn bind(&self, args: &[Argument]) -> Result<Vec<Value>, CommandError> {
        let mut values = Vec::with_capacity(self.params.len());
        for (index, param) in self.params.iter().enumerate() {
            match (args.get(index), &param.default) {
                (Some(arg), _) => {
                    let value = param.coerce(arg).map_err(|reason| CommandError::InvalidValue {
                        name: param.name.clone(),
                        reason,
                    })?;
                    values.push(value);
                }
                (None, Some(default)) => values.push(default.clone()),
                (None, None) => {
                    return Err(CommandError::MissingArgument {
                        name: param.name.clone(),
                        usage: self.usage(),
                    })
                }
            }
        }
        Ok(values)
    }

    /// Validate then run the handler.
    pub fn invoke(&self, state: &mut AppState, args: &[Argument]) -> Result<CommandOutcome, CommandError> {
        let values = self.bind(args)?;
        (self.handler)(state, &values).map_err(CommandError::Handler)
    }
}
