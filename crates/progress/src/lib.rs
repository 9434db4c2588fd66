//! Route progress tracking.
//!
//! Step cursor, geofence bookkeeping and the step list.

#![warn(missing_docs)]

pub mod tracker;
pub mod config;
pub mod itinerary;

pub use tracker::{GeofenceRequest, Outcome, RouteProgressTracker};
pub use config::TrackerConfig;
pub use itinerary::{Itinerary, ItineraryRow};

/// Error type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors surfaced by the tracker.
///
/// Stale region ids and operations while idle are not errors; they show up
/// as ignored outcomes.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The route cannot be tracked
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Configuration values are unusable
    #[error("Invalid config: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
