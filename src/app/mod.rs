//! Frame-loop core: owns the registry, alias store, state and CLI, and turns command lines
//! and key presses into state changes and output lines. Nothing here touches the terminal.

mod keys;
pub mod logging;

pub use keys::InputMode;

use crate::alias::{AliasChange, AliasManager};
use crate::cli::CliState;
use crate::command::{parse, CommandCategory, CommandError, CommandOutcome, CommandRegistry};
use crate::completion::{rich_completions, CompletionState};
use crate::config::AppConfig;
use crate::layout::{compute_layout, LayoutInputs, LayoutMetrics};
use crate::state::AppState;
use crate::worker::{AnalysisJob, AnalysisMessage, AnalysisRequest, SignalProcessor, TsvFileProcessor};
use logging::{log_debug, log_debug_content};
use std::sync::Arc;

const ERROR_PREFIX: &str = "\u{2717}";

pub struct App {
    registry: CommandRegistry,
    aliases: AliasManager,
    state: AppState,
    cli: CliState,
    completion: CompletionState,
    mode: InputMode,
    processor: Option<Arc<dyn SignalProcessor + Sync>>,
    job: Option<AnalysisJob>,
    should_quit: bool,
    redraw: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let aliases = match config.resolved_aliases_path() {
            Some(path) => AliasManager::load(path),
            None => AliasManager::in_memory(),
        };
        let mut state = AppState::new(config.duration, config.layout_config());
        state.audio_path = config.audio.clone();
        state.data_path = config.data.clone();

        let mut app = Self::with_parts(CommandRegistry::with_builtins(), aliases, state);
        if let Some(path) = &config.data {
            app.set_processor(TsvFileProcessor::new(path));
        }
        app
    }

    /// Assemble an App from explicit parts; no files are read.
    pub fn with_parts(registry: CommandRegistry, aliases: AliasManager, state: AppState) -> Self {
        Self {
            registry,
            aliases,
            state,
            cli: CliState::default(),
            completion: CompletionState::default(),
            mode: InputMode::Normal,
            processor: None,
            job: None,
            should_quit: false,
            redraw: true,
        }
    }

    pub fn set_processor<P: SignalProcessor + Sync>(&mut self, processor: P) {
        self.processor = Some(Arc::new(processor));
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn aliases(&self) -> &AliasManager {
        &self.aliases
    }

    pub fn cli(&self) -> &CliState {
        &self.cli
    }

    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn has_active_job(&self) -> bool {
        self.job.is_some()
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Geometry for this frame, from the current lanes, popup and output.
    pub fn frame_layout(&self, term_height: u16, term_width: u16) -> LayoutMetrics {
        let inputs = LayoutInputs {
            special_lane_heights: self.state.lanes.special_lane_heights(),
            completion_item_count: self.completion.items().len(),
            completions_visible: self.completion.is_visible(),
            cli_output_line_count: self.cli.output().len(),
        };
        compute_layout(term_height, term_width, &self.state.layout, &inputs)
    }

    /// Advance playback by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.state.transport.playing {
            self.state.transport.update(dt);
            self.redraw = true;
        }
    }

    /// Run one command line and append its display lines to the CLI output.
    /// Returns the same lines for callers that want them directly.
    pub fn execute_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        log_debug_content(&format!("execute: {line}"));

        let expanded = self.aliases.resolve(line);
        let lines = match self.run(&expanded) {
            Ok(lines) => lines,
            Err(err) => {
                let verb = expanded.split_whitespace().next().unwrap_or_default();
                self.state.lanes.add_log(format!("{verb}: {err}"));
                vec![format!("{ERROR_PREFIX} {err}")]
            }
        };
        for output in &lines {
            self.cli.push_output(output.clone());
        }
        self.redraw = true;
        lines
    }

    fn run(&mut self, line: &str) -> Result<Vec<String>, CommandError> {
        let parsed = parse(line).map_err(|err| CommandError::Handler(err.to_string()))?;
        let def = self
            .registry
            .lookup(&parsed.verb)
            .ok_or_else(|| CommandError::UnknownCommand(parsed.verb.clone()))?;
        let canonical = def.name.clone();

        match canonical.as_str() {
            "help" | "list_commands" | "alias" | "unalias" | "aliases" => {
                def.bind(&parsed.args)?;
                // Names as typed: `10ms` stays `10ms`.
                let words: Vec<&str> = line.split_whitespace().skip(1).collect();
                let first = words.first().copied().unwrap_or_default();
                self.run_frontend(&canonical, first, &words)
            }
            _ => {
                let outcome = self
                    .registry
                    .dispatch(&mut self.state, &parsed.verb, &parsed.args)?;
                Ok(self.apply(outcome))
            }
        }
    }

    fn apply(&mut self, outcome: CommandOutcome) -> Vec<String> {
        match outcome {
            CommandOutcome::ClearOutput => {
                self.cli.clear_output();
                Vec::new()
            }
            CommandOutcome::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            CommandOutcome::Analyze => self.start_analysis(),
            other => other.display_lines(),
        }
    }

    fn run_frontend(
        &mut self,
        command: &str,
        first: &str,
        words: &[&str],
    ) -> Result<Vec<String>, CommandError> {
        match command {
            "help" if first.is_empty() => Ok(self.help_overview()),
            "help" => self.help_for(first),
            "list_commands" => Ok(self.command_listing()),
            "aliases" => Ok(self.aliases.format_list()),
            "alias" if words.len() < 2 => match words.first() {
                None => Ok(self.aliases.format_list()),
                Some(name) => Ok(vec![match self.aliases.get(name) {
                    Some(target) => format!("{name} \u{2192} {target}"),
                    None => format!("no such alias: {name}"),
                }]),
            },
            "alias" => {
                let name = words[0];
                let target = words[1..].join(" ");
                let change = self
                    .aliases
                    .set(name, &target, &self.registry)
                    .map_err(|err| CommandError::Handler(err.to_string()))?;
                Ok(vec![match change {
                    AliasChange::Added => format!("alias {name} \u{2192} {target}"),
                    AliasChange::Updated { previous } => {
                        format!("alias {name} \u{2192} {target} (was: {previous})")
                    }
                }])
            }
            _ => {
                let previous = self
                    .aliases
                    .remove(first)
                    .map_err(|err| CommandError::Handler(err.to_string()))?;
                Ok(vec![format!("removed alias {first} (was: {previous})")])
            }
        }
    }

    fn help_overview(&self) -> Vec<String> {
        let mut lines = vec!["Commands (help <command> for details):".to_string()];
        for category in CommandCategory::ALL {
            let names: Vec<&str> = self
                .registry
                .list_by_category(category)
                .into_iter()
                .filter(|def| !def.hidden)
                .map(|def| def.name.as_str())
                .collect();
            if !names.is_empty() {
                lines.push(format!("  {:<10} {}", category.name(), names.join(", ")));
            }
        }
        lines
    }

    fn help_for(&self, name: &str) -> Result<Vec<String>, CommandError> {
        let name = name.to_lowercase();
        if let Some(def) = self.registry.lookup(&name) {
            return Ok(def.help_lines());
        }
        match self.aliases.get(&name) {
            Some(target) => Ok(vec![format!("{name} is an alias for: {target}")]),
            None => Err(CommandError::UnknownCommand(name)),
        }
    }

    fn command_listing(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for category in CommandCategory::ALL {
            let defs: Vec<_> = self
                .registry
                .list_by_category(category)
                .into_iter()
                .filter(|def| !def.hidden)
                .collect();
            if defs.is_empty() {
                continue;
            }
            lines.push(format!("[{category}]"));
            lines.extend(defs.iter().map(|def| format!("  {}", def.summary_line())));
        }
        lines
    }

    fn start_analysis(&mut self) -> Vec<String> {
        if self.job.is_some() {
            return vec!["analysis already running".to_string()];
        }
        let Some(processor) = self.processor.as_ref().map(Arc::clone) else {
            return vec![format!(
                "{ERROR_PREFIX} no analysis table (start with --data <PATH>)"
            )];
        };
        let request = AnalysisRequest {
            audio_path: self.state.audio_path.clone(),
            kernel: self.state.kernel,
        };
        tracing::info!(kernel = %request.kernel, "analysis started");
        self.job = Some(AnalysisJob::spawn(processor, request));
        self.state.analysis_pending = true;
        self.state.lanes.add_log(format!("reprocess: {}", self.state.kernel));
        vec!["analysis started".to_string()]
    }

    /// Check the analysis job without blocking. Returns true when it finished this call.
    pub fn poll_analysis(&mut self) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        let Some(message) = job.poll() else {
            return false;
        };
        self.job = None;
        self.state.analysis_pending = false;
        let line = match message {
            AnalysisMessage::Finished { table, elapsed } => {
                let summary = table.summary();
                self.state.analysis = Some(summary);
                tracing::info!(
                    rows = summary.rows,
                    channels = summary.channels,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "analysis finished"
                );
                format!(
                    "analysis: {} rows, {} channels, {} events ({} ms)",
                    summary.rows,
                    summary.channels,
                    summary.events,
                    elapsed.as_millis()
                )
            }
            AnalysisMessage::Failed(reason) => {
                tracing::warn!(%reason, "analysis failed");
                format!("{ERROR_PREFIX} analysis failed: {reason}")
            }
        };
        log_debug(&line);
        self.state.lanes.add_log(line.clone());
        self.cli.push_output(line);
        self.redraw = true;
        true
    }

    fn refresh_completions(&mut self) {
        let registry = &self.registry;
        let state = &self.state;
        let buffer = self.cli.before_cursor().to_string();
        self.completion
            .update(&buffer, &|text: &str, category: Option<CommandCategory>| {
                rich_completions(registry, state, text, category)
            });
    }
}
