use super::App;
use crate::app::logging::log_debug;
use crate::completion::CompletionKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Cli,
}

/// Shift+digit on a US layout; `)` is Shift+0.
fn shifted_digit(ch: char) -> Option<usize> {
    ")!@#$%^&*(".find(ch)
}

impl App {
    /// Route one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        log_debug(&format!(
            "key event: {:?} with modifiers: {:?}",
            key.code, key.modifiers
        ));
        self.redraw = true;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return true;
        }

        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Cli => self.handle_cli_key(key),
        }
        self.should_quit
    }

    fn enter_cli(&mut self) {
        self.mode = InputMode::Cli;
        self.cli.clear_input();
        self.completion.hide();
    }

    fn leave_cli(&mut self) {
        self.mode = InputMode::Normal;
        self.cli.clear_input();
        self.completion.hide();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(':') => self.enter_cli(),
            KeyCode::Char('?') => {
                self.execute_line("help");
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                self.toggle_lane(ch as usize - '0' as usize);
            }
            KeyCode::Char(ch) if shifted_digit(ch).is_some() => {
                if let Some(id) = shifted_digit(ch) {
                    self.cycle_lane(id);
                }
            }
            code => {
                if let Some(command) = self.key_command(code, shift) {
                    self.execute_line(&command);
                }
            }
        }
    }

    /// Normal-mode shortcuts, expressed as command lines so they share one execution path.
    fn key_command(&self, code: KeyCode, shift: bool) -> Option<String> {
        let kernel = &self.state.kernel;
        let command = match code {
            KeyCode::Left if shift => "scrub_pct -10".to_string(),
            KeyCode::Right if shift => "scrub_pct 10".to_string(),
            KeyCode::Left => "scrub_pct -1".to_string(),
            KeyCode::Right => "scrub_pct 1".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::Char(' ') => "toggle_play".to_string(),
            KeyCode::Char('<') | KeyCode::Char(',') => "zoom_in".to_string(),
            KeyCode::Char('>') | KeyCode::Char('.') => "zoom_out".to_string(),
            KeyCode::Char('o') => "toggle_mode".to_string(),
            KeyCode::Char('K') => "reprocess".to_string(),
            KeyCode::Char('Q') => "quit".to_string(),
            KeyCode::Char('m') => {
                let stamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                format!("mark marker_{stamp}")
            }
            KeyCode::Char('`') => "next_marker".to_string(),
            KeyCode::Char('~') => "prev_marker".to_string(),
            KeyCode::Char('z') => "tau_a_semitone -1".to_string(),
            KeyCode::Char('Z') => "tau_a_semitone 1".to_string(),
            KeyCode::Char('x') => "tau_r_semitone -1".to_string(),
            KeyCode::Char('X') => "tau_r_semitone 1".to_string(),
            KeyCode::Char('c') => format!("thr {}", (kernel.threshold - 0.5).max(0.5)),
            KeyCode::Char('C') => format!("thr {}", (kernel.threshold + 0.5).min(20.0)),
            KeyCode::Char('v') => format!("ref {}", (kernel.refractory - 0.005).max(0.001)),
            _ => return None,
        };
        Some(command)
    }

    fn toggle_lane(&mut self, id: usize) {
        let line = self
            .state
            .lanes
            .toggle_visibility(id)
            .unwrap_or_else(|err| format!("{} {err}", super::ERROR_PREFIX));
        self.cli.push_output(line);
    }

    fn cycle_lane(&mut self, id: usize) {
        let line = self
            .state
            .lanes
            .cycle_mode(id)
            .unwrap_or_else(|err| format!("{} {err}", super::ERROR_PREFIX));
        self.cli.push_output(line);
    }

    fn handle_cli_key(&mut self, key: KeyEvent) {
        let popup = self.completion.is_visible();
        match key.code {
            KeyCode::Esc if popup => self.completion.hide(),
            KeyCode::Esc => self.leave_cli(),
            // Placeholders describe the argument; Enter on one runs the line instead.
            KeyCode::Enter if popup && self.selected_is_insertable() => self.accept_selected(),
            KeyCode::Enter => {
                self.completion.hide();
                if let Some(line) = self.cli.submit() {
                    self.execute_line(&line);
                }
            }
            KeyCode::Tab if popup => self.accept_selected(),
            KeyCode::Up if popup => self.completion.select_prev(),
            KeyCode::Down if popup => self.completion.select_next(),
            KeyCode::Up => self.cli.history_up(),
            KeyCode::Down => self.cli.history_down(),
            KeyCode::Right if popup => self.accept_selected(),
            KeyCode::Left if popup && self.completion.category().is_some() => {
                self.completion.drill_out();
                self.refresh_completions();
            }
            KeyCode::Left => {
                self.cli.move_left();
                self.refresh_completions();
            }
            KeyCode::Right => {
                self.cli.move_right();
                self.refresh_completions();
            }
            KeyCode::Home => {
                self.cli.home();
                self.refresh_completions();
            }
            KeyCode::End => {
                self.cli.end();
                self.refresh_completions();
            }
            KeyCode::Backspace => {
                self.cli.backspace();
                self.refresh_completions();
            }
            KeyCode::Delete => {
                self.cli.delete();
                self.refresh_completions();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_cli_char(ch);
            }
            _ => {}
        }
    }

    fn insert_cli_char(&mut self, ch: char) {
        // On an empty line, digits still drive the lanes.
        if self.cli.buffer().is_empty() {
            if ch.is_ascii_digit() {
                self.toggle_lane(ch as usize - '0' as usize);
                return;
            }
            if let Some(id) = shifted_digit(ch) {
                self.cycle_lane(id);
                return;
            }
        }
        self.cli.insert_char(ch);
        self.refresh_completions();
    }

    fn selected_is_insertable(&self) -> bool {
        self.completion
            .selected_item()
            .is_some_and(|item| item.insertable)
    }

    fn accept_selected(&mut self) {
        let Some(item) = self.completion.selected_item().cloned() else {
            self.completion.hide();
            return;
        };
        if item.kind == CompletionKind::Category {
            self.completion.drill_into();
            self.refresh_completions();
        } else if self.cli.accept_completion(&item) {
            self.refresh_completions();
        } else {
            self.completion.hide();
        }
    }
}
