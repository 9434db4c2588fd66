//! Route progress tracking.
//!
//! The tracker owns the active steps and a cursor into them. It never talks
//! to the region monitor directly: every operation returns an [`Outcome`]
//! listing the geofence requests to apply, the announcement to show and
//! speak, and the event to record.
//!
//! ```text
//! Idle --load_route--> Tracking(cursor = start)
//! Tracking --entered(valid, cursor < last)--> Tracking(cursor + 1)
//! Tracking --entered(valid, cursor >= last)--> Idle (arrived)
//! Tracking --stop--> Idle
//! Idle --entered(*)--> Idle (ignored)
//! ```

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use wayfinder_core::{
    Announcement, Coordinate, Event, EventKind, RegionId, Route, RouteId, Step,
};

use crate::{Result, TrackerConfig, TrackerError};

/// A request for the region monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum GeofenceRequest {
    /// Start monitoring a step boundary
    Register {
        /// Region id
        id: RegionId,
        /// Boundary location
        center: Coordinate,
        /// Radius in meters
        radius_meters: f64,
    },
    /// Stop monitoring a region
    Cancel {
        /// Region id
        id: RegionId,
    },
}

/// Result of a tracker operation.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Geofence requests, cancellations first
    pub requests: Vec<GeofenceRequest>,

    /// Instruction to display and speak, if any
    pub announcement: Option<Announcement>,

    /// Whether the turn-by-turn banner should become visible
    pub show_turn_by_turn: bool,

    /// Whether the tracker is tracking after the operation
    pub tracking: bool,

    /// What happened
    pub event: Event,
}

impl Outcome {
    fn ignored(kind: EventKind, tracking: bool) -> Self {
        Self {
            requests: Vec::new(),
            announcement: None,
            show_turn_by_turn: false,
            tracking,
            event: Event::new(kind),
        }
    }

    /// Whether the operation left the tracker untouched.
    pub fn is_ignored(&self) -> bool {
        matches!(
            self.event.kind,
            EventKind::StaleRegion { .. } | EventKind::NotTracking
        )
    }

    /// Whether this outcome ended navigation at the destination.
    pub fn is_arrival(&self) -> bool {
        matches!(self.event.kind, EventKind::Arrived { .. })
    }
}

/// Tracks progress along the active route.
#[derive(Debug)]
pub struct RouteProgressTracker {
    config: TrackerConfig,
    route_id: Option<RouteId>,
    steps: Vec<Step>,
    cursor: usize,
    tracking: bool,
    generation: u64,
    outstanding: BTreeSet<RegionId>,
}

impl RouteProgressTracker {
    /// Create an idle tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            route_id: None,
            steps: Vec::new(),
            cursor: 0,
            tracking: false,
            generation: 0,
            outstanding: BTreeSet::new(),
        }
    }

    /// Load a route, replacing the active one.
    ///
    /// Fails with [`TrackerError::InvalidRoute`] when the route has no step
    /// at the configured start index; the tracker is left unchanged.
    pub fn load_route(&mut self, route: &Route) -> Result<Outcome> {
        if route.steps.is_empty() {
            return Err(TrackerError::InvalidRoute("route has no steps".to_string()));
        }
        let start = self.config.start_index;
        if start >= route.steps.len() {
            return Err(TrackerError::InvalidRoute(format!(
                "route has {} steps but tracking starts at step {}",
                route.steps.len(),
                start
            )));
        }

        let mut requests = self.cancel_outstanding();

        self.generation += 1;
        self.route_id = Some(route.id);
        self.steps = route.steps.clone();
        self.cursor = start;
        self.tracking = true;

        for (index, step) in self.steps.iter().enumerate().skip(1) {
            let id = RegionId::new(self.generation, index);
            let radius_meters = if step.radius_meters > 0.0 {
                step.radius_meters
            } else {
                self.config.geofence_radius_meters
            };
            requests.push(GeofenceRequest::Register {
                id,
                center: step.boundary,
                radius_meters,
            });
            self.outstanding.insert(id);
        }

        let announcement =
            Announcement::preview(&self.steps[self.cursor], self.steps.get(self.cursor + 1));

        info!(
            "Loaded route {} ({} steps, generation {}), starting at step {}",
            route.id,
            self.steps.len(),
            self.generation,
            self.cursor
        );

        Ok(Outcome {
            requests,
            announcement: Some(announcement),
            show_turn_by_turn: true,
            tracking: true,
            event: Event::new(EventKind::RouteLoaded {
                route_id: route.id,
                steps: self.steps.len(),
                generation: self.generation,
            }),
        })
    }

    /// Handle a geofence entry notification.
    ///
    /// Ids that are not outstanding (stale routes, repeated entries) and
    /// entries while idle are ignored.
    pub fn on_geofence_entered(&mut self, id: RegionId) -> Outcome {
        if !self.tracking {
            debug!("Ignoring entry of {}: not tracking", id);
            return Outcome::ignored(EventKind::NotTracking, false);
        }
        if !self.outstanding.remove(&id) {
            warn!("Ignoring entry of stale region {}", id);
            return Outcome::ignored(EventKind::StaleRegion { region: id }, true);
        }

        let mut requests = vec![GeofenceRequest::Cancel { id }];
        self.cursor += 1;

        if self.cursor < self.steps.len() {
            let announcement = Announcement::step(&self.steps[self.cursor]);
            debug!("Entered {}, now at step {}", id, self.cursor);
            return Outcome {
                requests,
                announcement: Some(announcement),
                show_turn_by_turn: true,
                tracking: true,
                event: Event::new(EventKind::Advanced {
                    region: id,
                    cursor: self.cursor,
                }),
            };
        }

        requests.extend(self.cancel_outstanding());
        self.tracking = false;
        self.cursor = 0;
        info!("Arrived at destination of route {:?}", self.route_id);

        Outcome {
            requests,
            announcement: Some(Announcement::arrived(self.config.arrival_message.clone())),
            show_turn_by_turn: true,
            tracking: false,
            event: Event::new(EventKind::Arrived { region: id }),
        }
    }

    /// Stop tracking. Idempotent.
    pub fn stop(&mut self) -> Outcome {
        self.cursor = 0;
        if !self.tracking {
            debug!("Stop requested while not tracking");
            return Outcome::ignored(EventKind::NotTracking, false);
        }

        self.tracking = false;
        let requests = self.cancel_outstanding();
        info!("Stopped tracking route {:?}", self.route_id);

        Outcome {
            requests,
            announcement: None,
            show_turn_by_turn: false,
            tracking: false,
            event: Event::new(EventKind::Stopped),
        }
    }

    fn cancel_outstanding(&mut self) -> Vec<GeofenceRequest> {
        std::mem::take(&mut self.outstanding)
            .into_iter()
            .map(|id| GeofenceRequest::Cancel { id })
            .collect()
    }

    /// Index of the step being followed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a route is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Steps of the last loaded route.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step being followed, while tracking.
    pub fn current_step(&self) -> Option<&Step> {
        if self.tracking {
            self.steps.get(self.cursor)
        } else {
            None
        }
    }

    /// Id of the last loaded route.
    pub fn route_id(&self) -> Option<RouteId> {
        self.route_id
    }

    /// Number of successful route loads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Regions registered and not yet entered or cancelled.
    pub fn outstanding(&self) -> impl Iterator<Item = &RegionId> {
        self.outstanding.iter()
    }

    /// Tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Default for RouteProgressTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
