//! User-defined command aliases persisted as a TOML `[aliases]` table.
//!
//! ```toml
//! [aliases]
//! ll = "list_commands"
//! p = "play"
//! ```

use crate::command::CommandRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const ALIAS_FILE: &str = "aliases.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

#[derive(Debug)]
pub enum AliasError {
    Empty,
    /// The name belongs to a built-in command.
    Conflict(String),
    NotFound(String),
    Io(io::Error),
}

impl fmt::Display for AliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasError::Empty => write!(f, "usage: alias <name> <command>"),
            AliasError::Conflict(name) => write!(f, "cannot override built-in command: {name}"),
            AliasError::NotFound(name) => write!(f, "no such alias: {name}"),
            AliasError::Io(err) => write!(f, "failed to save aliases: {err}"),
        }
    }
}

impl std::error::Error for AliasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AliasError::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasChange {
    Added,
    Updated { previous: String },
}

#[derive(Debug, Default)]
pub struct AliasManager {
    path: Option<PathBuf>,
    aliases: BTreeMap<String, String>,
}

impl AliasManager {
    /// `<config dir>/tau/aliases.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tau").join(ALIAS_FILE))
    }

    /// Load from `path`. A missing or unreadable file yields an empty alias set.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let aliases = match read_aliases(&path) {
            Ok(aliases) => aliases,
            Err(err) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable alias file");
                }
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            aliases,
        }
    }

    /// Alias set that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Replace a leading alias with its target, keeping the rest of the line.
    /// One level only: the target is not resolved again.
    pub fn resolve(&self, line: &str) -> String {
        let trimmed = line.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim_start()),
            None => (trimmed, ""),
        };
        match self.aliases.get(head) {
            Some(target) if rest.is_empty() => target.clone(),
            Some(target) => format!("{target} {rest}"),
            None => line.to_string(),
        }
    }

    pub fn set(
        &mut self,
        name: &str,
        command: &str,
        registry: &CommandRegistry,
    ) -> Result<AliasChange, AliasError> {
        let name = name.trim();
        let command = command.trim();
        if name.is_empty() || command.is_empty() {
            return Err(AliasError::Empty);
        }
        if registry.contains(name) {
            return Err(AliasError::Conflict(name.to_string()));
        }

        let previous = self.aliases.insert(name.to_string(), command.to_string());
        if let Err(err) = self.save() {
            match &previous {
                Some(old) => self.aliases.insert(name.to_string(), old.clone()),
                None => self.aliases.remove(name),
            };
            return Err(err);
        }
        Ok(match previous {
            Some(previous) => AliasChange::Updated { previous },
            None => AliasChange::Added,
        })
    }

    /// Remove an alias, returning its former target.
    pub fn remove(&mut self, name: &str) -> Result<String, AliasError> {
        let previous = self
            .aliases
            .remove(name)
            .ok_or_else(|| AliasError::NotFound(name.to_string()))?;
        if let Err(err) = self.save() {
            self.aliases.insert(name.to_string(), previous);
            return Err(err);
        }
        Ok(previous)
    }

    /// Write the alias table. No-op for in-memory managers.
    pub fn save(&self) -> Result<(), AliasError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let result = write_aliases(path, &self.aliases);
        if let Err(err) = &result {
            tracing::warn!(path = %path.display(), error = %err, "alias save failed");
        }
        result.map_err(AliasError::Io)
    }

    pub fn format_list(&self) -> Vec<String> {
        if self.aliases.is_empty() {
            return vec![
                "No user aliases defined.".to_string(),
                "Use: alias <name> <command>".to_string(),
            ];
        }
        let mut lines = vec!["User aliases:".to_string()];
        lines.extend(
            self.aliases
                .iter()
                .map(|(name, command)| format!("  {name} = {command}")),
        );
        if let Some(path) = &self.path {
            lines.push(String::new());
            lines.push(format!("Stored in: {}", path.display()));
        }
        lines
    }
}

fn read_aliases(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    let file: AliasFile = toml::from_str(&content)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    Ok(file.aliases)
}

fn write_aliases(path: &Path, aliases: &BTreeMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = AliasFile {
        aliases: aliases.clone(),
    };
    let content = toml::to_string_pretty(&file)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    fs::write(path, content)
}
