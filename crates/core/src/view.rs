//! View state handed to the presentation layer after every transition.

use crate::announcement::Announcement;
use serde::{Deserialize, Serialize};

/// Banner text shown before any route exists.
pub const IDLE_PROMPT: &str = "Where do you want to go?";

/// What the turn-by-turn UI should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Instruction banner text
    pub instruction_text: String,

    /// Whether the disclosure arrow next to the banner is visible
    pub arrow_visible: bool,

    /// Whether tapping the banner opens the step list
    pub route_button_enabled: bool,

    /// Whether navigation is running (drives the start/stop button)
    pub navigation_active: bool,
}

impl ViewState {
    /// State before a route has been computed.
    pub fn idle() -> Self {
        Self {
            instruction_text: IDLE_PROMPT.to_string(),
            arrow_visible: false,
            route_button_enabled: false,
            navigation_active: false,
        }
    }

    /// State after an announcement was produced.
    pub fn announcing(announcement: &Announcement, navigation_active: bool) -> Self {
        Self {
            instruction_text: announcement.text.clone(),
            arrow_visible: true,
            route_button_enabled: true,
            navigation_active,
        }
    }

    /// Same banner, different navigation flag.
    pub fn with_navigation(mut self, active: bool) -> Self {
        self.navigation_active = active;
        self
    }

    /// Title of the start/stop navigation button.
    pub fn navigation_button_title(&self) -> &'static str {
        if self.navigation_active {
            "Stop navigation"
        } else {
            "Start navigation"
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_view() {
        let view = ViewState::idle();
        assert_eq!(view.instruction_text, IDLE_PROMPT);
        assert!(!view.arrow_visible);
        assert!(!view.route_button_enabled);
        assert_eq!(view.navigation_button_title(), "Start navigation");
    }

    #[test]
    fn test_announcing_view_enables_route_button() {
        let a = Announcement::arrived("done");
        let view = ViewState::announcing(&a, true);
        assert_eq!(view.instruction_text, "done");
        assert!(view.arrow_visible);
        assert!(view.route_button_enabled);
        assert_eq!(view.navigation_button_title(), "Stop navigation");
        assert!(!view.with_navigation(false).navigation_active);
    }
}
