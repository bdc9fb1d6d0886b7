//! Frame geometry: splits the terminal into header, data lanes, CLI output, prompt,
//! special lanes, and status line.
//!
//! `compute_layout` is a pure function. Every frame builds a fresh [`LayoutMetrics`]; nothing
//! is cached between calls.


/// Fixed layout knobs. Edited values produce a new config via [`LayoutConfig::with_override`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub header_height: u16,
    pub cli_prompt_height: u16,
    pub cli_status_height: u16,
    /// Rows between the prompt and the status line (feedback area).
    pub cli_prompt_offset: u16,
    pub cli_output_min_height: u16,
    pub cli_output_max_height: u16,
    pub completion_max_items: u16,
    pub completion_preview_height: u16,
    pub min_data_viewport: u16,
    pub min_terminal_width: u16,
    pub min_terminal_height: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 2,
            cli_prompt_height: 1,
            cli_status_height: 1,
            cli_prompt_offset: 4,
            cli_output_min_height: 0,
            cli_output_max_height: 8,
            completion_max_items: 8,
            completion_preview_height: 3,
            min_data_viewport: 4,
            min_terminal_width: 80,
            min_terminal_height: 24,
        }
    }
}

impl LayoutConfig {
    pub const KEYS: [&'static str; 11] = [
        "header_height",
        "cli_prompt_height",
        "cli_status_height",
        "cli_prompt_offset",
        "cli_output_min_height",
        "cli_output_max_height",
        "completion_max_items",
        "completion_preview_height",
        "min_data_viewport",
        "min_terminal_width",
        "min_terminal_height",
    ];

    pub fn get(&self, key: &str) -> Option<u16> {
        let value = match key {
            "header_height" => self.header_height,
            "cli_prompt_height" => self.cli_prompt_height,
            "cli_status_height" => self.cli_status_height,
            "cli_prompt_offset" => self.cli_prompt_offset,
            "cli_output_min_height" => self.cli_output_min_height,
            "cli_output_max_height" => self.cli_output_max_height,
            "completion_max_items" => self.completion_max_items,
            "completion_preview_height" => self.completion_preview_height,
            "min_data_viewport" => self.min_data_viewport,
            "min_terminal_width" => self.min_terminal_width,
            "min_terminal_height" => self.min_terminal_height,
            _ => return None,
        };
        Some(value)
    }

    /// Copy of this config with one knob replaced.
    pub fn with_override(&self, key: &str, value: u16) -> Result<Self, String> {
        let mut next = *self;
        let slot = match key {
            "header_height" => &mut next.header_height,
            "cli_prompt_height" => &mut next.cli_prompt_height,
            "cli_status_height" => &mut next.cli_status_height,
            "cli_prompt_offset" => &mut next.cli_prompt_offset,
            "cli_output_min_height" => &mut next.cli_output_min_height,
            "cli_output_max_height" => &mut next.cli_output_max_height,
            "completion_max_items" => &mut next.completion_max_items,
            "completion_preview_height" => &mut next.completion_preview_height,
            "min_data_viewport" => &mut next.min_data_viewport,
            "min_terminal_width" => &mut next.min_terminal_width,
            "min_terminal_height" => &mut next.min_terminal_height,
            _ => return Err(format!("unknown layout key: {key}")),
        };
        *slot = value;
        if next.cli_output_min_height > next.cli_output_max_height {
            return Err("cli_output_min_height must not exceed cli_output_max_height".to_string());
        }
        if next.cli_prompt_height == 0 || next.cli_status_height == 0 {
            return Err("cli_prompt_height and cli_status_height must be at least 1".to_string());
        }
        if next.min_terminal_width == 0 {
            return Err("min_terminal_width must be at least 1".to_string());
        }
        if next.fixed_rows() > next.min_terminal_height {
            return Err(format!(
                "header, prompt, status and min_data_viewport need {} rows; min_terminal_height is {}",
                next.fixed_rows(),
                next.min_terminal_height
            ));
        }
        Ok(next)
    }

    /// Rows that must fit before anything else is placed: header, prompt, status line and
    /// the minimum data viewport.
    pub fn fixed_rows(&self) -> u16 {
        self.header_height
            .saturating_add(self.cli_prompt_height.max(1))
            .saturating_add(self.cli_status_height.max(1))
            .saturating_add(self.min_data_viewport)
    }

    /// `key = value` lines for display.
    pub fn describe(&self) -> Vec<String> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| format!("{key:<26} = {value}")))
            .collect()
    }
}

/// Per-frame dynamic inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutInputs {
    /// Visible heights of the special lanes (events, logs); 0 when hidden.
    pub special_lane_heights: Vec<u16>,
    pub completion_item_count: usize,
    pub completions_visible: bool,
    pub cli_output_line_count: usize,
}

/// A horizontal band of rows spanning the full terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub y: u16,
    pub height: u16,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutMetrics {
    pub term_height: u16,
    pub term_width: u16,

    pub header_y: u16,
    pub data_lanes_y: u16,
    pub cli_output_y: u16,
    pub cli_prompt_y: u16,
    pub special_lanes_y: u16,
    pub status_line_y: u16,

    pub header_height: u16,
    pub data_viewport_height: u16,
    pub cli_output_height: u16,
    pub cli_prompt_height: u16,
    pub special_lanes_height: u16,

    /// When set, only the terminal dimensions are meaningful.
    pub terminal_too_small: bool,
}

impl LayoutMetrics {
    pub fn header(&self) -> Region {
        Region {
            y: self.header_y,
            height: self.header_height,
        }
    }

    pub fn data_lanes(&self) -> Region {
        Region {
            y: self.data_lanes_y,
            height: self.data_viewport_height,
        }
    }

    pub fn cli_output(&self) -> Region {
        Region {
            y: self.cli_output_y,
            height: self.cli_output_height,
        }
    }

    pub fn cli_prompt(&self) -> Region {
        Region {
            y: self.cli_prompt_y,
            height: self.cli_prompt_height,
        }
    }

    pub fn special_lanes(&self) -> Region {
        Region {
            y: self.special_lanes_y,
            height: self.special_lanes_height,
        }
    }

    pub fn status_line(&self) -> Region {
        Region {
            y: self.status_line_y,
            height: if self.terminal_too_small { 0 } else { 1 },
        }
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Compute frame geometry for a `term_height` x `term_width` terminal.
pub fn compute_layout(
    term_height: u16,
    term_width: u16,
    config: &LayoutConfig,
    inputs: &LayoutInputs,
) -> LayoutMetrics {
    let mut metrics = LayoutMetrics {
        term_height,
        term_width,
        ..LayoutMetrics::default()
    };

    if term_width < config.min_terminal_width
        || term_height < config.min_terminal_height
        || term_height == 0
        || term_width == 0
        || term_height < config.fixed_rows()
    {
        metrics.terminal_too_small = true;
        return metrics;
    }

    let header_height = config.header_height;
    metrics.header_y = 0;
    metrics.header_height = header_height;
    metrics.cli_prompt_height = config.cli_prompt_height;
    metrics.status_line_y = term_height - 1;

    // Special lanes can never claim rows owned by the header, prompt, or status line.
    let special_budget = term_height
        .saturating_sub(header_height)
        .saturating_sub(config.cli_prompt_height)
        .saturating_sub(config.cli_status_height);
    let requested_special = inputs
        .special_lane_heights
        .iter()
        .fold(0u16, |total, height| total.saturating_add(*height));
    metrics.special_lanes_height = requested_special.min(special_budget);

    let fixed = header_height
        .saturating_add(config.cli_prompt_height)
        .saturating_add(metrics.special_lanes_height)
        .saturating_add(config.cli_status_height);
    let remaining = term_height.saturating_sub(fixed);
    let room_for_cli = remaining.saturating_sub(config.min_data_viewport);

    let cli_height = if inputs.completions_visible {
        let items = clamp_u16(inputs.completion_item_count).min(config.completion_max_items);
        items
            .saturating_add(2)
            .saturating_add(config.completion_preview_height)
    } else {
        let desired = clamp_u16(inputs.cli_output_line_count).min(config.cli_output_max_height);
        desired
            .min(room_for_cli.max(config.cli_output_min_height))
            .max(config.cli_output_min_height)
    };
    // The data viewport keeps its minimum; the CLI panel gives way.
    metrics.cli_output_height = cli_height.min(room_for_cli);
    metrics.data_viewport_height = remaining - metrics.cli_output_height;

    metrics.data_lanes_y = metrics.header_y + header_height;
    metrics.cli_output_y = metrics.data_lanes_y + metrics.data_viewport_height;
    metrics.special_lanes_y = metrics
        .status_line_y
        .saturating_sub(metrics.special_lanes_height);
    metrics.cli_prompt_y = metrics
        .special_lanes_y
        .saturating_sub(config.cli_prompt_offset.max(config.cli_prompt_height).max(1))
        .max(metrics.data_lanes_y);

    metrics
}
