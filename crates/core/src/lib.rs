//! Wayfinder core data models.
//!
//! This crate defines the data structures shared by the route progress
//! tracker, the navigation session and its collaborators.

#![warn(missing_docs)]

// Core identities
mod id;

// Geography and routes
mod geo;
mod route;

// What the user sees and hears
mod announcement;
mod view;
mod event;

// Re-exports
pub use id::*;

pub use geo::{Coordinate, EARTH_RADIUS_METERS};
pub use route::{Route, Step};
pub use announcement::{
    format_distance, preview_distance, round_to, step_distance, Announcement, AnnouncementKind,
};
pub use view::{ViewState, IDLE_PROMPT};
pub use event::{Event, EventKind};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
