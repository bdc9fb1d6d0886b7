use std::collections::VecDeque;
use std::fmt;

pub const LANE_COUNT: usize = 10;
pub const LOGS_LANE: usize = 0;
pub const EVENTS_LANE: usize = 9;
/// Height of a visible logs/events lane.
pub const SPECIAL_LANE_HEIGHT: u16 = 4;
pub const DEFAULT_FULL_HEIGHT: u16 = 8;
pub const MAX_FULL_HEIGHT: u16 = 30;
const MAX_CONTENT_LINES: usize = 100;

const DATA_LANE_NAMES: [&str; 8] = [
    "audio", "pulse1", "pulse2", "env", "ch5", "ch6", "ch7", "ch8",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneMode {
    Hidden,
    Compact,
    Full,
}

impl fmt::Display for LaneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LaneMode::Hidden => "hidden",
            LaneMode::Compact => "compact",
            LaneMode::Full => "full",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub id: usize,
    pub name: String,
    pub mode: LaneMode,
    saved_mode: Option<LaneMode>,
    pub full_height: u16,
    pub gain: f64,
    /// Text content for the pinned logs/events lanes.
    pub content: VecDeque<String>,
}

impl Lane {
    fn new(id: usize, name: &str, mode: LaneMode) -> Self {
        Self {
            id,
            name: name.to_string(),
            mode,
            saved_mode: None,
            full_height: DEFAULT_FULL_HEIGHT,
            gain: 1.0,
            content: VecDeque::new(),
        }
    }

    pub fn is_special(&self) -> bool {
        self.id == LOGS_LANE || self.id == EVENTS_LANE
    }

    pub fn is_visible(&self) -> bool {
        self.mode != LaneMode::Hidden
    }

    /// Rows this lane occupies in the current mode.
    pub fn height(&self) -> u16 {
        if self.is_special() {
            return if self.is_visible() { SPECIAL_LANE_HEIGHT } else { 0 };
        }
        match self.mode {
            LaneMode::Hidden => 0,
            LaneMode::Compact => 1,
            LaneMode::Full => self.full_height,
        }
    }

    fn push_content(&mut self, line: String) {
        if self.content.len() == MAX_CONTENT_LINES {
            self.content.pop_front();
        }
        self.content.push_back(line);
    }
}

/// Ten lanes: 0 = logs, 1..=8 = data, 9 = events.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneStore {
    lanes: Vec<Lane>,
    pub current: usize,
}

impl Default for LaneStore {
    fn default() -> Self {
        let mut lanes = Vec::with_capacity(LANE_COUNT);
        lanes.push(Lane::new(LOGS_LANE, "logs", LaneMode::Full));
        for (offset, name) in DATA_LANE_NAMES.iter().enumerate() {
            let id = offset + 1;
            let mode = if id <= 4 { LaneMode::Compact } else { LaneMode::Hidden };
            lanes.push(Lane::new(id, name, mode));
        }
        lanes.push(Lane::new(EVENTS_LANE, "events", LaneMode::Hidden));
        Self { lanes, current: 1 }
    }
}

impl LaneStore {
    pub fn get(&self, id: usize) -> Option<&Lane> {
        self.lanes.get(id)
    }

    fn get_mut(&mut self, id: usize) -> Result<&mut Lane, String> {
        self.lanes
            .get_mut(id)
            .ok_or_else(|| format!("invalid lane: {id}"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }

    /// Data lanes (1..=8) that are currently visible, in order.
    pub fn visible_data_lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes
            .iter()
            .filter(|lane| !lane.is_special() && lane.is_visible())
    }

    /// Hidden lanes restore their previous mode (compact if never shown); visible lanes hide.
    pub fn toggle_visibility(&mut self, id: usize) -> Result<String, String> {
        let lane = self.get_mut(id)?;
        let status = if lane.mode == LaneMode::Hidden {
            lane.mode = match lane.saved_mode {
                Some(LaneMode::Full) => LaneMode::Full,
                _ => LaneMode::Compact,
            };
            if lane.mode == LaneMode::Full && !lane.is_special() {
                format!("visible ({} lines)", lane.full_height)
            } else {
                "visible (1 line)".to_string()
            }
        } else {
            lane.saved_mode = Some(lane.mode);
            lane.mode = LaneMode::Hidden;
            "hidden".to_string()
        };
        let message = format!("Lane {} ({}): {status}", lane.id, lane.name);
        if (1..=8).contains(&id) {
            self.current = id;
        }
        Ok(message)
    }

    /// Compact <-> full for data lanes. Special lanes have no size modes.
    pub fn cycle_mode(&mut self, id: usize) -> Result<String, String> {
        let lane = self.get_mut(id)?;
        if lane.is_special() {
            return Ok(format!(
                "Lane {} ({}): special lane (no size modes)",
                lane.id, lane.name
            ));
        }
        let status = if lane.mode == LaneMode::Full {
            lane.mode = LaneMode::Compact;
            "compact (1 line)".to_string()
        } else {
            lane.mode = LaneMode::Full;
            format!("full ({} lines)", lane.full_height)
        };
        Ok(format!("Lane {} ({}): {status}", lane.id, lane.name))
    }

    pub fn set_full_height(&mut self, id: usize, height: u16) -> Result<String, String> {
        if !(1..=MAX_FULL_HEIGHT).contains(&height) {
            return Err(format!("height must be 1-{MAX_FULL_HEIGHT}, got {height}"));
        }
        let lane = self.get_mut(id)?;
        lane.full_height = height;
        Ok(format!(
            "Lane {} ({}) full height set to {height} lines",
            lane.id, lane.name
        ))
    }

    pub fn set_gain(&mut self, id: usize, gain: f64) -> Result<f64, String> {
        let lane = self.get_mut(id)?;
        lane.gain = gain;
        Ok(lane.gain)
    }

    pub fn multiply_gain(&mut self, id: usize, factor: f64) -> Result<f64, String> {
        let lane = self.get_mut(id)?;
        lane.gain *= factor;
        Ok(lane.gain)
    }

    /// Heights of the special lanes in display order: events above logs.
    pub fn special_lane_heights(&self) -> Vec<u16> {
        [EVENTS_LANE, LOGS_LANE]
            .iter()
            .filter_map(|&id| self.lanes.get(id))
            .map(Lane::height)
            .collect()
    }

    pub fn add_log(&mut self, line: impl Into<String>) {
        if let Some(lane) = self.lanes.get_mut(LOGS_LANE) {
            lane.push_content(line.into());
        }
    }

    pub fn add_event(&mut self, line: impl Into<String>) {
        if let Some(lane) = self.lanes.get_mut(EVENTS_LANE) {
            lane.push_content(line.into());
        }
    }
}
