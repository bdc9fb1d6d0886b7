//! `ratatui` front-end: terminal setup, the poll/draw loop, and the painter that turns
//! [`LayoutMetrics`] bands into widgets.

use crate::app::{App, InputMode};
use crate::completion::{CompletionItem, CompletionKind};
use crate::layout::{LayoutMetrics, Region};
use crate::log_debug;
use crate::state::{Lane, LaneMode, EVENTS_LANE, LOGS_LANE};
use crate::terminal_restore::TerminalRestoreGuard;
use crate::utf8_safe::{fit_columns, window_by_columns};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const ACCENT: Color = Color::Rgb(255, 176, 80);
const DIM: Color = Color::Rgb(130, 130, 140);
const TEXT: Color = Color::Rgb(210, 205, 200);
const ERROR: Color = Color::Rgb(255, 90, 90);

/// Configure the terminal, run the drawing loop, and tear everything down.
pub fn run_app(app: &mut App) -> Result<()> {
    let terminal_guard = TerminalRestoreGuard::new();
    terminal_guard.enable_raw_mode()?;
    let mut stdout = io::stdout();
    terminal_guard.enter_alt_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app_loop(&mut terminal, app);

    drop(terminal);
    terminal_guard.restore();
    result
}

fn app_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw(frame, app))?;
    let mut last_tick = Instant::now();

    loop {
        let finished = app.poll_analysis();
        let animating = app.state().transport.playing || app.has_active_job();
        let poll_duration = if animating {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        let now = Instant::now();
        app.tick(now.duration_since(last_tick).as_secs_f64());
        last_tick = now;

        let mut should_draw = app.take_redraw_request() || finished || animating;
        if event::poll(poll_duration)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    app.handle_key(key);
                    should_draw = true;
                }
                Event::Resize(width, height) => {
                    log_debug(&format!("resize: {width}x{height}"));
                    should_draw = true;
                }
                _ => {}
            }
        }

        if should_draw {
            terminal.draw(|frame| draw(frame, app))?;
        }
        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

fn band(region: Region, area: Rect) -> Rect {
    Rect::new(area.x, area.y.saturating_add(region.y), area.width, region.height)
        .intersection(area)
}

fn category_color(index: u8) -> Color {
    match index {
        1 => Color::Green,
        2 => Color::Yellow,
        3 => Color::Cyan,
        4 => Color::Magenta,
        5 => Color::Blue,
        6 => Color::Red,
        _ => TEXT,
    }
}

fn line_style(line: &str) -> Style {
    if line.starts_with('\u{2717}') {
        Style::default().fg(ERROR)
    } else {
        Style::default().fg(TEXT)
    }
}

/// Paint one frame. Layout is recomputed from the live frame size every time.
pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.size();
    let metrics = app.frame_layout(area.height, area.width);
    if metrics.terminal_too_small {
        draw_too_small(frame, area, app, &metrics);
        return;
    }

    draw_header(frame, band(metrics.header(), area), app);
    draw_data_lanes(frame, band(metrics.data_lanes(), area), app);
    if app.completion().is_visible() {
        draw_completions(frame, band(metrics.cli_output(), area), app);
    } else {
        draw_output(frame, band(metrics.cli_output(), area), app);
    }
    draw_special_lanes(frame, band(metrics.special_lanes(), area), app);
    draw_status(frame, band(metrics.status_line(), area), app);
    // Prompt row may overlap the output band.
    draw_prompt(frame, band(metrics.cli_prompt(), area), app);
}

fn draw_too_small(frame: &mut Frame<'_>, area: Rect, app: &App, metrics: &LayoutMetrics) {
    let layout = &app.state().layout;
    let lines = vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{}x{} (need {}x{})",
            metrics.term_width, metrics.term_height, layout.min_terminal_width, layout.min_terminal_height
        )),
        Line::from("Resize the terminal or press Q to quit"),
    ];
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let rect = Rect::new(area.x, area.y + top, area.width, area.height - top).intersection(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_header(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let state = app.state();
    let width = rect.width as usize;
    let mut lines = vec![fit_columns(
        &format!("[?]help [Q]quit [:]CLI  {}", state.status_line()),
        width,
    )];
    let indicators: String = state
        .lanes
        .iter()
        .filter(|lane| !lane.is_special())
        .map(|lane| {
            let mark = match lane.mode {
                LaneMode::Hidden => '\u{25cb}',
                LaneMode::Compact => 'c',
                LaneMode::Full => '\u{25cf}',
            };
            format!("[{}:{mark}]", lane.id)
        })
        .collect();
    let source = state
        .data_path
        .as_ref()
        .map(|path| format!(" \u{2502} {}", path.display()))
        .unwrap_or_default();
    lines.push(fit_columns(&format!("{indicators}{source}"), width));

    let style = Style::default().add_modifier(Modifier::REVERSED);
    let text: Vec<Line> = lines
        .into_iter()
        .take(rect.height as usize)
        .map(|line| Line::from(Span::styled(line, style)))
        .collect();
    frame.render_widget(Paragraph::new(text), rect);
}

/// Marker ruler followed by one block per visible data lane.
fn draw_data_lanes(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let state = app.state();
    let width = rect.width as usize;
    let (left, right) = state.transport.window();
    let span = (right - left).max(f64::EPSILON);

    let mut ruler: Vec<char> = vec!['\u{2500}'; width];
    for marker in state.markers.iter() {
        if marker.time >= left && marker.time <= right {
            let col = (((marker.time - left) / span) * (width.saturating_sub(1)) as f64) as usize;
            if let Some(cell) = ruler.get_mut(col) {
                *cell = '\u{25bc}';
            }
        }
    }
    let mut lines = vec![Line::from(Span::styled(
        ruler.into_iter().collect::<String>(),
        Style::default().fg(DIM),
    ))];

    for lane in state.lanes.visible_data_lanes() {
        lines.extend(lane_lines(lane, app, width));
    }
    lines.truncate(rect.height as usize);
    frame.render_widget(Paragraph::new(lines), rect);
}

fn lane_lines(lane: &Lane, app: &App, width: usize) -> Vec<Line<'static>> {
    let state = app.state();
    let current = state.lanes.current == lane.id;
    let analysis = match (state.analysis, state.analysis_pending) {
        (_, true) => "processing\u{2026}".to_string(),
        (Some(summary), false) if lane.id <= summary.channels => {
            format!("{} rows, {} events", summary.rows, summary.events)
        }
        _ => "no data".to_string(),
    };
    let title = format!(
        "{}{} {:<8} gain {:.2}  {}  {}",
        if current { '>' } else { ' ' },
        lane.id,
        lane.name,
        lane.gain,
        state.display,
        analysis
    );
    let title_style = if current {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    };
    let mut lines = vec![Line::from(Span::styled(fit_columns(&title, width), title_style))];
    for _ in 1..lane.height() {
        lines.push(Line::from(Span::styled(
            "\u{00b7}".repeat(width),
            Style::default().fg(DIM),
        )));
    }
    lines
}

fn draw_output(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let output = app.cli().output();
    let skip = output.len().saturating_sub(rect.height as usize);
    let lines: Vec<Line> = output
        .iter()
        .skip(skip)
        .map(|line| {
            Line::from(Span::styled(
                window_by_columns(line, 0, rect.width as usize).to_string(),
                line_style(line),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rect);
}

fn completion_line(item: &CompletionItem, selected: bool, width: usize) -> Line<'static> {
    let label = match item.kind {
        CompletionKind::Category => format!("{}/ ({} commands)", item.text, item.command_count),
        _ => item.text.clone(),
    };
    let text = fit_columns(&format!(" {label:<20} {}", item.description), width);
    let mut style = Style::default().fg(category_color(item.color));
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if !item.insertable {
        style = style.add_modifier(Modifier::DIM);
    }
    Line::from(Span::styled(text, style))
}

fn draw_completions(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height < 3 {
        return;
    }
    let completion = app.completion();
    let preview_rows = app.state().layout.completion_preview_height.min(rect.height - 3);
    let list_rect = Rect::new(rect.x, rect.y, rect.width, rect.height - preview_rows);
    let preview_rect = Rect::new(rect.x, list_rect.bottom(), rect.width, preview_rows);

    let visible = list_rect.height.saturating_sub(2) as usize;
    let offset = completion.selected_index().saturating_sub(visible.saturating_sub(1));
    let inner_width = list_rect.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = completion
        .items()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, item)| completion_line(item, idx == completion.selected_index(), inner_width))
        .collect();

    let title = match completion.category() {
        Some(category) => format!(" {category} \u{2190} back "),
        None => " completions ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(DIM))
        .title(Span::styled(title, Style::default().fg(ACCENT)));
    frame.render_widget(Paragraph::new(lines).block(block), list_rect);

    if preview_rows > 0 {
        let help: Vec<Line> = completion
            .selected_item()
            .map(|item| item.help.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|line| !line.is_empty())
            .take(preview_rows as usize)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(DIM))))
            .collect();
        frame.render_widget(Paragraph::new(help), preview_rect);
    }
}

fn draw_prompt(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let cli = app.cli();
    let line = match app.mode() {
        InputMode::Cli => {
            let before = UnicodeWidthStr::width(cli.before_cursor()) as u16;
            frame.set_cursor(
                rect.x.saturating_add(1).saturating_add(before).min(rect.right().saturating_sub(1)),
                rect.y,
            );
            Line::from(vec![
                Span::styled(":", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
                Span::raw(fit_columns(cli.buffer(), rect.width.saturating_sub(1) as usize)),
            ])
        }
        InputMode::Normal => Line::from(Span::styled(
            fit_columns("Press : for commands, ? for help", rect.width as usize),
            Style::default().fg(DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), Rect::new(rect.x, rect.y, rect.width, 1));
}

/// Events above logs, each with a title row and its newest lines.
fn draw_special_lanes(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let width = rect.width as usize;
    let mut lines = Vec::new();
    for id in [EVENTS_LANE, LOGS_LANE] {
        let Some(lane) = app.state().lanes.get(id) else {
            continue;
        };
        let rows = lane.height() as usize;
        if rows == 0 {
            continue;
        }
        lines.push(Line::from(Span::styled(
            fit_columns(&format!("\u{2500} {} ({}) ", lane.name, lane.id), width),
            Style::default().fg(ACCENT),
        )));
        let body = rows - 1;
        let skip = lane.content.len().saturating_sub(body);
        let mut shown = 0;
        for entry in lane.content.iter().skip(skip) {
            lines.push(Line::from(Span::styled(fit_columns(entry, width), line_style(entry))));
            shown += 1;
        }
        for _ in shown..body {
            lines.push(Line::from(""));
        }
    }
    lines.truncate(rect.height as usize);
    frame.render_widget(Paragraph::new(lines), rect);
}

fn draw_status(frame: &mut Frame<'_>, rect: Rect, app: &App) {
    if rect.height == 0 {
        return;
    }
    let state = app.state();
    let mode = match app.mode() {
        InputMode::Normal => "NORMAL",
        InputMode::Cli => "CLI",
    };
    let analysis = if state.analysis_pending {
        "analysis: running".to_string()
    } else if let Some(summary) = state.analysis {
        format!("analysis: {} ch", summary.channels)
    } else {
        "analysis: none".to_string()
    };
    let text = format!(
        " {mode} \u{2502} {} \u{2502} markers {} \u{2502} aliases {} \u{2502} {analysis}",
        state.kernel,
        state.markers.len(),
        app.aliases().len()
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            fit_columns(&text, rect.width as usize),
            Style::default().add_modifier(Modifier::REVERSED),
        ))),
        rect,
    );
}
