//! Command-line input state: buffer with a char cursor, history, and the output ring.

use crate::completion::{CompletionItem, CompletionKind};
use crate::utf8_safe::{byte_index, char_count};
use std::collections::VecDeque;

const HISTORY_LIMIT: usize = 100;
const OUTPUT_LIMIT: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct CliState {
    buffer: String,
    /// Cursor position in chars, not bytes.
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    history_temp: String,
    output: VecDeque<String>,
}

impl CliState {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text left of the cursor; completion works on this.
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..byte_index(&self.buffer, self.cursor)]
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = char_count(&self.buffer);
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = byte_index(&self.buffer, self.cursor);
        self.buffer.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_index(&self.buffer, self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor >= char_count(&self.buffer) {
            return;
        }
        let at = byte_index(&self.buffer, self.cursor);
        self.buffer.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(char_count(&self.buffer));
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = char_count(&self.buffer);
    }

    pub fn clear_input(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_index = None;
    }

    /// Older entry. The in-progress line is kept and restored by [`CliState::history_down`].
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => {
                self.history_temp = self.buffer.clone();
                self.history.len() - 1
            }
            Some(index) => index.saturating_sub(1),
        };
        self.history_index = Some(index);
        let entry = self.history[index].clone();
        self.set_buffer(entry);
    }

    pub fn history_down(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        if index + 1 < self.history.len() {
            self.history_index = Some(index + 1);
            let entry = self.history[index + 1].clone();
            self.set_buffer(entry);
        } else {
            self.history_index = None;
            let temp = std::mem::take(&mut self.history_temp);
            self.set_buffer(temp);
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Take the current line. Empty lines return `None` and are not recorded.
    pub fn submit(&mut self) -> Option<String> {
        let line = self.buffer.trim().to_string();
        self.clear_input();
        if line.is_empty() {
            return None;
        }
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
            if self.history.len() > HISTORY_LIMIT {
                self.history.remove(0);
            }
        }
        Some(line)
    }

    pub fn push_output(&mut self, line: impl Into<String>) {
        if self.output.len() == OUTPUT_LIMIT {
            self.output.pop_front();
        }
        self.output.push_back(line.into());
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    pub fn output(&self) -> &VecDeque<String> {
        &self.output
    }

    /// Insert a completion at the cursor. Command-position items replace the verb;
    /// argument items replace the token being typed. The rest of the token under the
    /// cursor is replaced too, and text after it is kept. Placeholders are never inserted.
    pub fn accept_completion(&mut self, item: &CompletionItem) -> bool {
        if !item.insertable || item.kind == CompletionKind::Category {
            return false;
        }
        let before = self.before_cursor();
        let tokens = before.split_whitespace().count();
        let trailing_space = before.ends_with(char::is_whitespace);
        let keep = if tokens == 0 || (tokens == 1 && !trailing_space) {
            ""
        } else {
            before.trim_end_matches(|c: char| !c.is_whitespace())
        };
        let rest = self.buffer[before.len()..]
            .trim_start_matches(|c: char| !c.is_whitespace())
            .trim_start();

        let head = format!("{keep}{} ", item.text);
        let cursor = char_count(&head);
        self.buffer = format!("{head}{rest}");
        self.cursor = cursor;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, kind: CompletionKind, insertable: bool) -> CompletionItem {
        CompletionItem {
            text: text.to_string(),
            description: String::new(),
            category: None,
            color: 0,
            help: Vec::new(),
            kind,
            command_count: 0,
            insertable,
        }
    }

    fn typed(text: &str) -> CliState {
        let mut cli = CliState::default();
        for ch in text.chars() {
            cli.insert_char(ch);
        }
        cli
    }

    #[test]
    fn editing_respects_multibyte_chars() {
        let mut cli = typed("gain µ");
        cli.move_left();
        cli.insert_char('2');
        assert_eq!(cli.buffer(), "gain 2µ");
        cli.end();
        cli.backspace();
        assert_eq!(cli.buffer(), "gain 2");
        cli.home();
        cli.delete();
        assert_eq!(cli.buffer(), "ain 2");
        assert_eq!(cli.cursor(), 0);
    }

    #[test]
    fn submit_records_history_once() {
        let mut cli = typed("  play ");
        assert_eq!(cli.submit(), Some("play".to_string()));
        assert_eq!(cli.buffer(), "");
        cli.set_buffer("play");
        cli.submit();
        assert_eq!(cli.history(), ["play"]);
        assert_eq!(cli.submit(), None);
    }

    #[test]
    fn history_browse_restores_in_progress_line() {
        let mut cli = CliState::default();
        for line in ["seek 1", "play"] {
            cli.set_buffer(line);
            cli.submit();
        }
        cli.set_buffer("zo");
        cli.history_up();
        assert_eq!(cli.buffer(), "play");
        cli.history_up();
        assert_eq!(cli.buffer(), "seek 1");
        cli.history_up();
        assert_eq!(cli.buffer(), "seek 1");
        cli.history_down();
        assert_eq!(cli.buffer(), "play");
        cli.history_down();
        assert_eq!(cli.buffer(), "zo");
    }

    #[test]
    fn history_is_capped() {
        let mut cli = CliState::default();
        for i in 0..150 {
            cli.set_buffer(format!("seek {i}"));
            cli.submit();
        }
        assert_eq!(cli.history().len(), 100);
        assert_eq!(cli.history()[0], "seek 50");
    }

    #[test]
    fn output_ring_drops_oldest() {
        let mut cli = CliState::default();
        for i in 0..120 {
            cli.push_output(format!("line {i}"));
        }
        assert_eq!(cli.output().len(), 100);
        assert_eq!(cli.output().front().map(String::as_str), Some("line 20"));
        cli.clear_output();
        assert!(cli.output().is_empty());
    }

    #[test]
    fn command_completion_replaces_line() {
        let mut cli = typed("sc");
        assert!(cli.accept_completion(&item("scrub", CompletionKind::Command, true)));
        assert_eq!(cli.buffer(), "scrub ");
        assert_eq!(cli.cursor(), 6);
    }

    #[test]
    fn argument_completion_replaces_last_token() {
        let mut cli = typed("display_mode po");
        assert!(cli.accept_completion(&item("points", CompletionKind::Argument, true)));
        assert_eq!(cli.buffer(), "display_mode points ");

        let mut cli = typed("goto ");
        cli.accept_completion(&item("intro", CompletionKind::Argument, true));
        assert_eq!(cli.buffer(), "goto intro ");
    }

    #[test]
    fn placeholders_and_categories_are_not_inserted() {
        let mut cli = typed("seek ");
        assert!(!cli.accept_completion(&item("<time>", CompletionKind::Argument, false)));
        assert_eq!(cli.buffer(), "seek ");
        assert!(!cli.accept_completion(&item("transport", CompletionKind::Category, true)));
    }

    #[test]
    fn completion_after_multibyte_separator() {
        let mut cli = typed("lane_toggle\u{a0}");
        assert!(cli.accept_completion(&item("3", CompletionKind::Argument, true)));
        assert_eq!(cli.buffer(), "lane_toggle\u{a0}3 ");
        assert_eq!(cli.cursor(), 14);

        let mut cli = typed("gain\u{3000}ch");
        assert!(cli.accept_completion(&item("ch1", CompletionKind::Argument, true)));
        assert_eq!(cli.buffer(), "gain\u{3000}ch1 ");
    }

    #[test]
    fn command_completion_keeps_text_after_cursor() {
        let mut cli = typed("play 1.5");
        cli.home();
        cli.move_right();
        cli.move_right();
        assert!(cli.accept_completion(&item("play", CompletionKind::Command, true)));
        assert_eq!(cli.buffer(), "play 1.5");
        assert_eq!(cli.cursor(), 5);

        let mut cli = typed("seek 2 extra");
        for _ in 0.." extra".len() {
            cli.move_left();
        }
        assert!(cli.accept_completion(&item("4", CompletionKind::Argument, true)));
        assert_eq!(cli.buffer(), "seek 4 extra");
    }
}
