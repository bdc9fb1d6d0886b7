pub const DEFAULT_DURATION_SECONDS: f64 = 60.0;
pub const DEFAULT_HEADER_HEIGHT: u16 = 2;
pub const DEFAULT_CLI_OUTPUT_MAX_HEIGHT: u16 = 8;
pub const DEFAULT_MIN_DATA_VIEWPORT: u16 = 4;
pub const DEFAULT_COMPLETION_MAX_ITEMS: u16 = 8;
pub const DEFAULT_COMPLETION_PREVIEW_HEIGHT: u16 = 3;

pub(super) const HEADER_HEIGHT_RANGE: (u16, u16) = (1, 4);
pub(super) const CLI_OUTPUT_MAX_RANGE: (u16, u16) = (1, 50);
pub(super) const MIN_DATA_VIEWPORT_RANGE: (u16, u16) = (1, 40);
pub(super) const COMPLETION_MAX_ITEMS_RANGE: (u16, u16) = (1, 20);
pub(super) const COMPLETION_PREVIEW_RANGE: (u16, u16) = (0, 10);
/// Upper bound on timeline length (24 hours).
pub(super) const MAX_DURATION_SECONDS: f64 = 86_400.0;

