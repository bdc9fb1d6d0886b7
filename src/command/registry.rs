use super::{Argument, CommandCategory, CommandDef, CommandError, CommandOutcome};
use crate::state::AppState;
use std::collections::BTreeMap;

/// Registry of command definitions, keyed by name.
///
/// Constructed once at start-up and passed by reference to the components that need it.
/// Access is single-threaded; wrap it in a lock before sharing across threads.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDef>,
    aliases: BTreeMap<String, String>,
    keys: BTreeMap<String, String>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::commands::register_all(&mut registry);
        registry
    }

    /// Insert or overwrite by name. The last registration for a name wins.
    pub fn register(&mut self, def: CommandDef) {
        if let Some(previous) = self.commands.remove(&def.name) {
            for alias in &previous.aliases {
                if self.aliases.get(alias) == Some(&previous.name) {
                    self.aliases.remove(alias);
                }
            }
            if let Some(key) = &previous.key_binding {
                if self.keys.get(key) == Some(&previous.name) {
                    self.keys.remove(key);
                }
            }
        }
        for alias in &def.aliases {
            self.aliases.insert(alias.clone(), def.name.clone());
        }
        if let Some(key) = &def.key_binding {
            self.keys.insert(key.clone(), def.name.clone());
        }
        self.commands.insert(def.name.clone(), def);
    }

    /// Exact-name lookup. Aliases are not consulted.
    pub fn get(&self, name: &str) -> Option<&CommandDef> {
        self.commands.get(name)
    }

    /// Map a command name or built-in alias to its canonical name.
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.commands.contains_key(name) {
            return Some(name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// Lookup by name or built-in alias.
    pub fn lookup(&self, name: &str) -> Option<&CommandDef> {
        self.resolve_name(name).and_then(|canonical| self.commands.get(canonical))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.keys.get(key).and_then(|name| self.commands.get(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Visible command names starting with `prefix` (case-insensitive), sorted by name.
    pub fn list_names(&self, prefix: &str) -> Vec<String> {
        let needle = prefix.to_lowercase();
        self.commands
            .values()
            .filter(|def| !def.hidden && def.name.to_lowercase().starts_with(&needle))
            .map(|def| def.name.clone())
            .collect()
    }

    /// Argument completions for `name`; empty for unknown commands or out-of-range indexes.
    pub fn get_completions(
        &self,
        name: &str,
        state: &AppState,
        param_index: usize,
        partial: &str,
    ) -> Vec<String> {
        self.lookup(name)
            .map(|def| def.get_completions(state, param_index, partial))
            .unwrap_or_default()
    }

    /// Visible commands in a category, sorted by name.
    pub fn list_by_category(&self, category: CommandCategory) -> Vec<&CommandDef> {
        self.commands
            .values()
            .filter(|def| def.category == category && !def.hidden)
            .collect()
    }

    /// Number of visible commands in a category.
    pub fn category_count(&self, category: CommandCategory) -> usize {
        self.list_by_category(category).len()
    }

    /// Visible commands sorted by (category, name).
    pub fn list_all(&self) -> Vec<&CommandDef> {
        let mut all: Vec<&CommandDef> = self.commands.values().filter(|def| !def.hidden).collect();
        all.sort_by(|a, b| (a.category, &a.name).cmp(&(b.category, &b.name)));
        all
    }

    /// Look up, validate, and invoke. Validation failures leave `state` untouched.
    pub fn dispatch(
        &self,
        state: &mut AppState,
        verb: &str,
        args: &[Argument],
    ) -> Result<CommandOutcome, CommandError> {
        let def = self
            .lookup(verb)
            .ok_or_else(|| CommandError::UnknownCommand(verb.to_string()))?;
        let result = def.invoke(state, args);
        match &result {
            Ok(_) => tracing::debug!(command = %def.name, args = args.len(), "dispatched"),
            Err(err) => tracing::debug!(command = %def.name, error = %err, "dispatch rejected"),
        }
        result
    }
}
