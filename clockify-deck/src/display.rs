//! Key title rendering and the tick-side cache.
//!
//! The host's tick fires every second but the API is only consulted every
//! [`REFRESH_EVERY_TICKS`] ticks; in between, a cached elapsed time advances
//! locally.

use time::Duration;

use crate::settings::PluginSettings;

pub const REFRESH_EVERY_TICKS: u32 = 10;

/// What the host pushes to the physical key after a refresh: the state
/// indicator plus the rendered title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub active: bool,
    pub title: String,
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_seconds = elapsed.whole_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Render the key title from the current configuration and the elapsed time
/// of the running entry, if any.
///
/// A configured template has `{workspaceName}`, `{projectName}`, `{taskName}`,
/// `{timerName}`, `{clientName}` and `{timer}` substituted verbatim. Without
/// one, the non-empty parts of project/task/timer name stack above the
/// elapsed time.
pub fn render_title(settings: &PluginSettings, elapsed: Option<Duration>) -> String {
    let timer = elapsed.map(format_elapsed).unwrap_or_default();

    if !settings.title_format.is_empty() {
        return settings
            .title_format
            .replace("{workspaceName}", &settings.workspace_name)
            .replace("{projectName}", &settings.project_name)
            .replace("{taskName}", &settings.task_name)
            .replace("{timerName}", &settings.timer_name)
            .replace("{clientName}", &settings.client_name)
            .replace("{timer}", &timer);
    }

    let mut lines: Vec<&str> = Vec::new();
    for name in [
        &settings.project_name,
        &settings.task_name,
        &settings.timer_name,
    ] {
        if !name.is_empty() {
            lines.push(name);
        }
    }
    if !timer.is_empty() {
        lines.push(&timer);
    }
    lines.join("\n")
}

/// Tick throttle state. Starts due for a refresh; [`reset`](Self::reset) on
/// key press or settings change forces the next tick back to the API.
#[derive(Debug)]
pub struct DisplayState {
    ticks_since_refresh: u32,
    cached_elapsed: Option<Duration>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            ticks_since_refresh: REFRESH_EVERY_TICKS,
            cached_elapsed: None,
        }
    }

    pub fn reset(&mut self) {
        self.ticks_since_refresh = REFRESH_EVERY_TICKS;
        self.cached_elapsed = None;
    }

    /// Whether the next tick should ask the API instead of the cache.
    pub fn needs_refresh(&self) -> bool {
        self.ticks_since_refresh >= REFRESH_EVERY_TICKS
    }

    /// Store a fresh elapsed value from the API.
    pub fn refreshed(&mut self, elapsed: Option<Duration>) {
        self.ticks_since_refresh = 0;
        self.cached_elapsed = elapsed;
    }

    /// Advance one tick between refreshes; a cached running timer gains one
    /// second locally.
    pub fn tick(&mut self) -> Option<Duration> {
        self.ticks_since_refresh += 1;
        if let Some(elapsed) = self.cached_elapsed.as_mut() {
            *elapsed += Duration::SECOND;
        }
        self.cached_elapsed
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.cached_elapsed
    }
}
