use super::{CommandDef, CommandParam, CommandRegistry, ParamType};
use serde_json::{json, Value as Json};

fn bound(value: Option<f64>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_string())
}

impl CommandParam {
    /// One-line parameter spec, e.g. `tau <float> [0.0001..1] =0.005` or `mode (envelope | points)`.
    pub fn spec(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if self.kind == ParamType::Enum {
            parts.push(format!("({})", self.enum_values.join(" | ")));
        } else {
            parts.push(format!("<{}>", self.kind.label()));
        }
        if self.min.is_some() || self.max.is_some() {
            parts.push(format!(
                "[{}..{}]",
                bound(self.min, "-\u{221e}"),
                bound(self.max, "\u{221e}")
            ));
        }
        match &self.default {
            Some(default) if !default.as_text().is_empty() => parts.push(format!("={default}")),
            _ => {}
        }
        parts.join(" ")
    }
}

impl CommandDef {
    /// `name <required> [optional]`
    pub fn usage(&self) -> String {
        let mut parts = vec![self.name.clone()];
        for param in &self.params {
            if param.is_optional() {
                parts.push(format!("[{}]", param.name));
            } else {
                parts.push(format!("<{}>", param.name));
            }
        }
        parts.join(" ")
    }

    /// Usage padded to a column followed by the short description.
    pub fn summary_line(&self) -> String {
        format!("{:<30} {}", self.usage(), self.short)
    }

    /// Full help block shown by `help <cmd>` and in the completion preview pane.
    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Command: {}", self.name)];
        if !self.aliases.is_empty() {
            lines.push(format!("Aliases: {}", self.aliases.join(", ")));
        }
        lines.push(format!("Usage: {}", self.usage()));
        lines.push(format!("Description: {}", self.short));

        if !self.long.is_empty() {
            lines.push(String::new());
            lines.extend(self.long.lines().map(str::to_string));
        }

        if !self.params.is_empty() {
            lines.push(String::new());
            lines.push("Parameters:".to_string());
            for param in &self.params {
                lines.push(format!("  {}", param.spec()));
                lines.push(format!("    {}", param.description));
            }
        }

        if let Some(key) = &self.key_binding {
            lines.push(format!("Keyboard: {key}"));
        }
        lines.push(format!(
            "Category: {} (color {})",
            self.category,
            self.category.color()
        ));
        lines
    }
}

impl CommandDef {
    /// Machine-readable metadata; handlers and completers are omitted.
    pub fn metadata(&self) -> Json {
        json!({
            "name": self.name,
            "category": self.category,
            "short": self.short,
            "long": self.long,
            "usage": self.usage(),
            "aliases": self.aliases,
            "key": self.key_binding,
            "params": self.params,
        })
    }
}

impl CommandRegistry {
    /// Every non-hidden command, ordered by category then name.
    pub fn metadata(&self) -> Json {
        Json::Array(self.list_all().into_iter().map(CommandDef::metadata).collect())
    }
}
