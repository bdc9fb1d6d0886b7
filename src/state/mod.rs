//! Workstation state the command handlers mutate: transport, kernel params, markers, lanes.
//!
//! The layout and completion engines only read from here.

mod kernel;
mod lanes;
mod markers;
mod transport;
#[cfg(test)]
mod tests;

pub use kernel::{KernelParams, MAX_TAU, MIN_TAU};
pub use lanes::{
    Lane, LaneMode, LaneStore, EVENTS_LANE, LANE_COUNT, LOGS_LANE, MAX_FULL_HEIGHT,
    SPECIAL_LANE_HEIGHT,
};
pub use markers::{Marker, MarkerStore};
pub use transport::Transport;

use crate::layout::LayoutConfig;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DURATION: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Envelope,
    Points,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Envelope => DisplayMode::Points,
            DisplayMode::Points => DisplayMode::Envelope,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "envelope" => Some(DisplayMode::Envelope),
            "points" => Some(DisplayMode::Points),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Envelope => write!(f, "envelope"),
            DisplayMode::Points => write!(f, "points"),
        }
    }
}

/// Shape of the last finished analysis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub channels: usize,
    pub events: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub transport: Transport,
    pub kernel: KernelParams,
    pub markers: MarkerStore,
    pub lanes: LaneStore,
    pub display: DisplayMode,
    pub layout: LayoutConfig,
    pub audio_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub analysis: Option<AnalysisSummary>,
    pub analysis_pending: bool,
}

impl AppState {
    pub fn new(duration: f64, layout: LayoutConfig) -> Self {
        Self {
            transport: Transport::new(duration),
            kernel: KernelParams::default(),
            markers: MarkerStore::default(),
            lanes: LaneStore::default(),
            display: DisplayMode::default(),
            layout,
            audio_path: None,
            data_path: None,
            analysis: None,
            analysis_pending: false,
        }
    }

    /// One-line transport summary used by `status` and the header.
    pub fn status_line(&self) -> String {
        let (left, right) = self.transport.window();
        format!(
            "{} {:.3}s / {:.3}s  span {:.3}s [{:.3}..{:.3}]  mode {}",
            if self.transport.playing { "\u{25b6}" } else { "\u{25a0}" },
            self.transport.position,
            self.transport.duration,
            self.transport.span,
            left,
            right,
            self.display
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, LayoutConfig::default())
    }
}
