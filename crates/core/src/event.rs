//! Event model - the navigation timeline.

use crate::id::{EventId, RegionId, RouteId};
use crate::Time;
use serde::{Deserialize, Serialize};

/// Something the tracker did, recorded at a specific time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// When it happened
    pub timestamp: Time,

    /// What happened
    pub kind: EventKind,
}

impl Event {
    /// Create a new event stamped now.
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: chrono::Utc::now(),
            kind,
        }
    }
}

/// Tracker transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A route replaced the active steps
    RouteLoaded {
        /// Route that was loaded
        route_id: RouteId,
        /// Number of steps in it
        steps: usize,
        /// Route generation assigned by the tracker
        generation: u64,
    },
    /// A boundary was entered and the cursor moved
    Advanced {
        /// Region that was entered
        region: RegionId,
        /// Cursor after the move
        cursor: usize,
    },
    /// The last boundary was entered
    Arrived {
        /// Region that was entered
        region: RegionId,
    },
    /// Navigation was stopped by the user
    Stopped,
    /// An entry notification did not match an outstanding region
    StaleRegion {
        /// Region that was reported
        region: RegionId,
    },
    /// An operation arrived while no route was being tracked
    NotTracking,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::RouteLoaded { route_id, steps, generation } => {
                write!(f, "route {} loaded ({} steps, generation {})", route_id, steps, generation)
            }
            EventKind::Advanced { region, cursor } => {
                write!(f, "entered {} -> step {}", region, cursor)
            }
            EventKind::Arrived { region } => write!(f, "entered {} -> arrived", region),
            EventKind::Stopped => write!(f, "stopped"),
            EventKind::StaleRegion { region } => write!(f, "stale region {}", region),
            EventKind::NotTracking => write!(f, "not tracking"),
        }
    }
}
