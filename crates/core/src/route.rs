//! Route model - the output of a directions request.

use crate::geo::Coordinate;
use crate::id::RouteId;
use crate::Time;
use serde::{Deserialize, Serialize};

/// One instruction segment of a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable instruction, e.g. "Turn right onto Main St"
    pub instruction: String,

    /// Length of the segment in meters
    pub distance_meters: f64,

    /// Point whose geofence marks the start of this step
    pub boundary: Coordinate,

    /// Geofence radius in meters (0 = use the tracker default)
    #[serde(default)]
    pub radius_meters: f64,
}

impl Step {
    /// Create a step with no explicit geofence radius.
    pub fn new(instruction: impl Into<String>, distance_meters: f64, boundary: Coordinate) -> Self {
        Self {
            instruction: instruction.into(),
            distance_meters,
            boundary,
            radius_meters: 0.0,
        }
    }

    /// Set an explicit geofence radius.
    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }
}

/// An ordered, immutable sequence of steps in travel order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier
    pub id: RouteId,

    /// Where the route starts
    pub pickup: Coordinate,

    /// Where the route ends
    pub destination: Coordinate,

    /// Steps in travel order
    pub steps: Vec<Step>,

    /// When the route was computed
    pub computed_at: Time,
}

impl Route {
    /// Create a route computed now.
    pub fn new(pickup: Coordinate, destination: Coordinate, steps: Vec<Step>) -> Self {
        Self {
            id: RouteId::new(),
            pickup,
            destination,
            steps,
            computed_at: chrono::Utc::now(),
        }
    }

    /// Total length of all steps in meters.
    pub fn total_distance(&self) -> f64 {
        self.steps.iter().map(|s| s.distance_meters).sum()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the route has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_radius_defaults_to_zero_when_missing() {
        let json = r#"{
            "instruction": "Turn left",
            "distance_meters": 42.5,
            "boundary": { "latitude": 1.0, "longitude": 2.0 }
        }"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert_eq!(step.radius_meters, 0.0);
        assert_eq!(step.instruction, "Turn left");
    }

    #[test]
    fn test_total_distance() {
        let origin = Coordinate::new(0.0, 0.0);
        let route = Route::new(
            origin,
            origin,
            vec![
                Step::new("Depart", 0.0, origin),
                Step::new("Turn right", 120.34, origin),
                Step::new("Arrive", 15.0, origin),
            ],
        );
        assert!((route.total_distance() - 135.34).abs() < 1e-9);
        assert_eq!(route.len(), 3);
        assert!(!route.is_empty());
    }
}
