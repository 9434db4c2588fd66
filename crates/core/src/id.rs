//! Unique identifiers for Wayfinder entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a computed Route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId(Ulid);

impl RouteId {
    /// Generate a new RouteId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RouteId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for an Event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Ulid);

impl EventId {
    /// Generate a new EventId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a geofence registered for one step boundary.
///
/// Rendered as `"{generation}:{step_index}"`. The step index is the key
/// within a route; the generation tells apart regions of routes that have
/// since been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId {
    /// Route load counter of the tracker that issued this id
    pub generation: u64,
    /// Index of the step whose boundary this region marks
    pub step_index: usize,
}

impl RegionId {
    /// Create a region id for a step of the given route generation.
    pub fn new(generation: u64, step_index: usize) -> Self {
        Self {
            generation,
            step_index,
        }
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.generation, self.step_index)
    }
}

/// Error returned when a region id string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid region id: {0}")]
pub struct ParseRegionIdError(pub String);

impl std::str::FromStr for RegionId {
    type Err = ParseRegionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (generation, step) = s
            .split_once(':')
            .ok_or_else(|| ParseRegionIdError(s.to_string()))?;
        let generation = generation
            .parse()
            .map_err(|_| ParseRegionIdError(s.to_string()))?;
        let step_index = step.parse().map_err(|_| ParseRegionIdError(s.to_string()))?;
        Ok(Self::new(generation, step_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id_display_and_parse() {
        let id = RegionId::new(3, 7);
        assert_eq!(id.to_string(), "3:7");
        assert_eq!("3:7".parse::<RegionId>().unwrap(), id);
    }

    #[test]
    fn test_region_id_rejects_bare_index() {
        assert!("7".parse::<RegionId>().is_err());
        assert!("a:b".parse::<RegionId>().is_err());
    }

    #[test]
    fn test_route_id_roundtrip_through_string() {
        let id = RouteId::new();
        let parsed: RouteId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
