//! Shared crate-wide constants.

/// Bounds, in seconds, applied to the configured default notification
/// duration before it is converted to milliseconds.
pub const NOTIFICATION_MIN_SECS: i64 = 2;
pub const NOTIFICATION_MAX_SECS: i64 = 120;

/// Fallback used when `audio.display_titles_time` is missing.
pub const NOTIFICATION_DEFAULT_SECS: i64 = 10;

/// Length of the frame-pacing window. Once this much time has been
/// accumulated the average frame duration is recomputed and the counters
/// reset.
///
/// Units: milliseconds.
pub const FRAME_PACING_WINDOW_MS: u32 = 500;

/// Average frame duration assumed before the first pacing window closes.
pub const INITIAL_AVERAGE_FRAME_MS: u32 = 10;

/// Clock overlay refresh interval in milliseconds.
pub const CLOCK_REFRESH_MS: i64 = 1000;

/// How long the controller-activity indicator stays lit after an input.
pub const ACTIVITY_FLASH_MS: u32 = 150;

/// Duration of a sliding push transition.
pub const SLIDE_TRANSITION_MS: u32 = 250;

/// Rows left between stacked async notification widgets.
pub const ASYNC_NOTIFICATION_PADDING: u16 = 1;

/// Terminals narrower than this are treated as small screens: the help bar,
/// clock and activity indicator are hidden while a second screen is
/// stacked.
pub const SMALL_SCREEN_COLUMNS: u16 = 60;
