//! User-facing instructions and distance rounding.

use crate::route::Step;
use crate::Time;
use serde::{Deserialize, Serialize};

/// Round `value` to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Distance as shown in the route preview (one decimal).
pub fn preview_distance(meters: f64) -> f64 {
    round_to(meters, 1)
}

/// Distance as shown for a single upcoming step (two decimals).
pub fn step_distance(meters: f64) -> f64 {
    round_to(meters, 2)
}

/// Render a rounded distance the way it is spoken: always with a fractional
/// part, so `15.0` stays `"15.0"`.
pub fn format_distance(meters: f64) -> String {
    format!("{:?}", meters)
}

/// What triggered an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncementKind {
    /// First message after a route is loaded: current and next step
    Preview,
    /// A boundary was crossed and the next step begins
    Step,
    /// The last boundary was crossed
    Arrived,
}

/// An instruction to display and speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Text shown in the instruction banner and passed to speech
    pub text: String,

    /// What produced it
    pub kind: AnnouncementKind,

    /// When it was produced
    pub issued_at: Time,
}

impl Announcement {
    fn new(text: String, kind: AnnouncementKind) -> Self {
        Self {
            text,
            kind,
            issued_at: chrono::Utc::now(),
        }
    }

    /// Two-step preview: `"In {d1} meter {i1}, then in {d2} meters, {i2}"`.
    ///
    /// Falls back to the single step form when there is no next step.
    pub fn preview(current: &Step, next: Option<&Step>) -> Self {
        let first = format!(
            "In {} meter {}",
            format_distance(preview_distance(current.distance_meters)),
            current.instruction
        );
        let text = match next {
            Some(next) => format!(
                "{}, then in {} meters, {}",
                first,
                format_distance(preview_distance(next.distance_meters)),
                next.instruction
            ),
            None => first,
        };
        Self::new(text, AnnouncementKind::Preview)
    }

    /// Single step: `"In {d} meter {instruction}"`.
    pub fn step(step: &Step) -> Self {
        let text = format!(
            "In {} meter {}",
            format_distance(step_distance(step.distance_meters)),
            step.instruction
        );
        Self::new(text, AnnouncementKind::Step)
    }

    /// Arrival message.
    pub fn arrived(message: impl Into<String>) -> Self {
        Self::new(message.into(), AnnouncementKind::Arrived)
    }
}

impl std::fmt::Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
