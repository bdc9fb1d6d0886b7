//! Hierarchical completion: categories at the root, then commands, then argument values.


use crate::command::{CommandCategory, CommandDef, CommandRegistry};
use crate::state::AppState;
use crate::utf8_safe::ellipsize;

const DESCRIPTION_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Category,
    Command,
    Argument,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub text: String,
    pub description: String,
    pub category: Option<CommandCategory>,
    /// Color index (1-6) of the owning category; 0 when uncategorized.
    pub color: u8,
    /// Lines for the preview pane.
    pub help: Vec<String>,
    pub kind: CompletionKind,
    /// Commands contained in a category item.
    pub command_count: usize,
    /// False for `<param>` placeholders, which describe but never insert.
    pub insertable: bool,
}

impl CompletionItem {
    fn for_category(category: CommandCategory, count: usize) -> Self {
        Self {
            text: category.name().to_string(),
            description: format!("{count} commands"),
            category: Some(category),
            color: category.color(),
            help: vec![
                format!("Category: {category}"),
                String::new(),
                format!("{count} commands. Right arrow to browse."),
            ],
            kind: CompletionKind::Category,
            command_count: count,
            insertable: true,
        }
    }

    fn for_command(def: &CommandDef) -> Self {
        Self {
            text: def.name.clone(),
            description: ellipsize(&def.short, DESCRIPTION_CHARS),
            category: Some(def.category),
            color: def.category.color(),
            help: def.help_lines(),
            kind: CompletionKind::Command,
            command_count: 0,
            insertable: true,
        }
    }

    fn for_argument(def: &CommandDef, index: usize, text: String, insertable: bool) -> Self {
        let (name, description) = def
            .params
            .get(index)
            .map(|param| (param.name.as_str(), param.description.as_str()))
            .unwrap_or(("argument", ""));
        Self {
            text,
            description: ellipsize(description, DESCRIPTION_CHARS),
            category: Some(def.category),
            color: def.category.color(),
            help: vec![
                format!("{} \u{2192} {name}", def.name),
                String::new(),
                description.to_string(),
                format!("Usage: {}", def.usage()),
            ],
            kind: CompletionKind::Argument,
            command_count: 0,
            insertable,
        }
    }
}

/// Source of completion items for `(buffer, current category)`.
pub trait CompletionProvider {
    fn complete(&self, buffer: &str, category: Option<CommandCategory>) -> Vec<CompletionItem>;
}

impl<F> CompletionProvider for F
where
    F: Fn(&str, Option<CommandCategory>) -> Vec<CompletionItem>,
{
    fn complete(&self, buffer: &str, category: Option<CommandCategory>) -> Vec<CompletionItem> {
        self(buffer, category)
    }
}

/// Popup state owned by the input handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionState {
    items: Vec<CompletionItem>,
    visible: bool,
    selected: usize,
    category: Option<CommandCategory>,
}

impl CompletionState {
    pub fn items(&self) -> &[CompletionItem] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn category(&self) -> Option<CommandCategory> {
        self.category
    }

    /// Recompute items for `buffer`. Selection resets when the list changes.
    pub fn update<P: CompletionProvider + ?Sized>(&mut self, buffer: &str, provider: &P) {
        let items = provider.complete(buffer, self.category);
        if items != self.items || self.selected >= items.len() {
            self.selected = 0;
        }
        self.items = items;
        self.visible = !self.items.is_empty();
    }

    /// Replace items directly, keeping the same invariants as [`CompletionState::update`].
    pub fn set_items(&mut self, items: Vec<CompletionItem>) {
        self.update("", &move |_: &str, _: Option<CommandCategory>| items.clone());
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.items.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn selected_item(&self) -> Option<&CompletionItem> {
        self.items.get(self.selected)
    }

    pub fn hide(&mut self) {
        self.items.clear();
        self.visible = false;
        self.selected = 0;
        self.category = None;
    }

    /// Enter the selected category. Fails (no transition) on command or argument items.
    pub fn drill_into(&mut self) -> bool {
        match self.selected_item() {
            Some(item) if item.kind == CompletionKind::Category => {
                self.category = item.category;
                self.selected = 0;
                true
            }
            _ => false,
        }
    }

    /// Return to the root level. Fails when already there.
    pub fn drill_out(&mut self) -> bool {
        if self.category.take().is_some() {
            self.selected = 0;
            true
        } else {
            false
        }
    }
}

fn category_items(registry: &CommandRegistry, prefix: &str) -> Vec<CompletionItem> {
    let needle = prefix.to_lowercase();
    CommandCategory::ALL
        .iter()
        .filter(|category| category.name().starts_with(&needle))
        .filter_map(|&category| {
            let count = registry.category_count(category);
            (count > 0).then(|| CompletionItem::for_category(category, count))
        })
        .collect()
}

fn command_items(
    registry: &CommandRegistry,
    prefix: &str,
    category: Option<CommandCategory>,
) -> Vec<CompletionItem> {
    registry
        .list_names(prefix)
        .iter()
        .filter_map(|name| registry.get(name))
        .filter(|def| category.map_or(true, |wanted| def.category == wanted))
        .map(CompletionItem::for_command)
        .collect()
}

/// Completion items for the text before the cursor.
///
/// * Root with a prefix of at most one character: one item per non-empty category. When a
///   single-character prefix matches no category, command names are offered instead.
/// * Inside a category, or with a longer prefix: matching command names.
/// * After a recognized verb: values for the argument being typed, or a `<param>` placeholder.
pub fn rich_completions(
    registry: &CommandRegistry,
    state: &AppState,
    buffer: &str,
    category: Option<CommandCategory>,
) -> Vec<CompletionItem> {
    let tokens: Vec<&str> = buffer.split_whitespace().collect();
    let trailing_space = buffer.ends_with(char::is_whitespace);

    if tokens.is_empty() || (tokens.len() == 1 && !trailing_space) {
        let prefix = tokens.first().copied().unwrap_or("");
        if category.is_none() && prefix.chars().count() <= 1 {
            let items = category_items(registry, prefix);
            if !items.is_empty() || prefix.is_empty() {
                return items;
            }
        }
        return command_items(registry, prefix, category);
    }

    let Some(def) = registry.lookup(&tokens[0].to_lowercase()) else {
        return Vec::new();
    };
    let (index, partial) = if trailing_space {
        (tokens.len() - 1, "")
    } else {
        (tokens.len() - 2, tokens[tokens.len() - 1])
    };
    let Some(param) = def.params.get(index) else {
        return Vec::new();
    };

    let values = def.get_completions(state, index, partial);
    if values.is_empty() {
        return vec![CompletionItem::for_argument(
            def,
            index,
            format!("<{}>", param.name),
            false,
        )];
    }
    values
        .into_iter()
        .map(|value| CompletionItem::for_argument(def, index, value, true))
        .collect()
}
