//! Display modes and the state the controller carries between ticks.

use core::time::Duration;

/// What the panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Clock,
    Price,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Clock => DisplayMode::Price,
            DisplayMode::Price => DisplayMode::Clock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Clock => "clock",
            DisplayMode::Price => "price",
        }
    }
}

/// Controller state, owned by [`DisplayModeController`](crate::DisplayModeController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub current_mode: DisplayMode,
    /// Monotonic time of the last mode flip (or startup).
    pub last_change_at: Duration,
    /// Minute shown on the panel; `None` before the first clock render.
    pub last_rendered_minute: Option<u8>,
    pub price_rendered_this_cycle: bool,
    /// Next clock frame must be a full refresh.
    pub full_redraw_pending: bool,
}

impl ControllerState {
    pub fn new(now: Duration) -> Self {
        Self {
            current_mode: DisplayMode::Clock,
            last_change_at: now,
            last_rendered_minute: None,
            price_rendered_this_cycle: false,
            full_redraw_pending: true,
        }
    }

    /// Time since the last flip, saturating at zero if `now` runs backwards.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_change_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_alternates() {
        assert_eq!(DisplayMode::Clock.toggled(), DisplayMode::Price);
        assert_eq!(DisplayMode::Price.toggled(), DisplayMode::Clock);
    }

    #[test]
    fn startup_state() {
        let state = ControllerState::new(Duration::from_secs(3));
        assert_eq!(state.current_mode, DisplayMode::Clock);
        assert_eq!(state.last_change_at, Duration::from_secs(3));
        assert_eq!(state.last_rendered_minute, None);
        assert!(!state.price_rendered_this_cycle);
        assert!(state.full_redraw_pending);
    }

    #[test]
    fn elapsed_saturates() {
        let state = ControllerState::new(Duration::from_secs(10));
        assert_eq!(state.elapsed(Duration::from_secs(4)), Duration::ZERO);
        assert_eq!(state.elapsed(Duration::from_secs(15)), Duration::from_secs(5));
    }
}
