//! Navigation session - the single owner of tracker state.
//!
//! UI events and geofence entry notifications are funneled into one task
//! and handled strictly one at a time.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use wayfinder_core::{Coordinate, Event, RegionId, Route, RouteId, ViewState};
use wayfinder_progress::{
    GeofenceRequest, Itinerary, Outcome, RouteProgressTracker, TrackerConfig,
};
use wayfinder_services::{DirectionsService, RegionMonitor, SpeechAnnouncer, ViewPresenter};

use crate::{Result, SessionError};

const COMMAND_CAPACITY: usize = 64;

/// Inputs to the session.
#[derive(Debug)]
pub enum SessionEvent {
    /// A destination was picked; compute and load a route
    RouteRequested {
        /// Current user location
        pickup: Coordinate,
        /// Chosen destination
        destination: Coordinate,
    },
    /// The start/stop navigation button was tapped
    NavigationToggled,
    /// The region monitor reported an entry
    GeofenceEntered(RegionId),
    /// The step list was opened
    StepsRequested(oneshot::Sender<Itinerary>),
    /// Read the current state
    Snapshot(oneshot::Sender<SessionSnapshot>),
    /// Stop tracking and end the session task
    Shutdown,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Last loaded route
    pub route_id: Option<RouteId>,
    /// Tracker cursor
    pub cursor: usize,
    /// Whether a route is being tracked
    pub tracking: bool,
    /// Route loads so far
    pub generation: u64,
    /// Regions still registered
    pub outstanding: Vec<RegionId>,
    /// Last published view state
    pub view: ViewState,
    /// Most recent tracker events, oldest first
    pub journal: Vec<Event>,
}

/// The platform services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Route computation
    pub directions: Arc<dyn DirectionsService>,
    /// Geofence registration and entry events
    pub monitor: Arc<dyn RegionMonitor>,
    /// Spoken instructions
    pub announcer: Arc<dyn SpeechAnnouncer>,
    /// View-state consumer
    pub presenter: Arc<dyn ViewPresenter>,
}

/// Owns the tracker and applies its outcomes to the collaborators.
pub struct NavigationSession {
    tracker: RouteProgressTracker,
    services: Collaborators,
    route: Option<Route>,
    view: ViewState,
    journal: VecDeque<Event>,
}

impl NavigationSession {
    /// Create a session with an idle tracker.
    pub fn new(config: TrackerConfig, services: Collaborators) -> Self {
        Self {
            tracker: RouteProgressTracker::new(config),
            services,
            route: None,
            view: ViewState::idle(),
            journal: VecDeque::new(),
        }
    }

    /// Run the session on its own task.
    ///
    /// The monitor subscription is taken before returning, so no entry
    /// reported after this call is missed.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let entries = self.services.monitor.subscribe();
        let task = tokio::spawn(self.run(rx, entries));
        (SessionHandle { tx }, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionEvent>,
        entries: broadcast::Receiver<RegionId>,
    ) {
        info!("Navigation session started");
        self.services.presenter.present(&self.view).await;

        let mut entries = Some(entries);
        loop {
            tokio::select! {
                // Entries first: a notification sent before a command is
                // handled before it.
                biased;

                entry = next_entry(&mut entries) => match entry {
                    Ok(id) => self.handle(SessionEvent::GeofenceEntered(id)).await,
                    // Dropped ids are never redelivered; tracking stays at
                    // the current step until a later region is entered.
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        error!("Missed {} geofence notifications", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("Region monitor closed its notification channel");
                        entries = None;
                    }
                },
                command = commands.recv() => match command {
                    Some(SessionEvent::Shutdown) | None => break,
                    Some(event) => self.handle(event).await,
                },
            }
        }

        if self.tracker.is_tracking() {
            let outcome = self.tracker.stop();
            self.apply(outcome).await;
        }
        info!("Navigation session ended");
    }

    /// Handle one event.
    pub async fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::RouteRequested {
                pickup,
                destination,
            } => self.request_route(pickup, destination).await,
            SessionEvent::NavigationToggled => self.toggle_navigation().await,
            SessionEvent::GeofenceEntered(id) => {
                let outcome = self.tracker.on_geofence_entered(id);
                self.apply(outcome).await;
            }
            SessionEvent::StepsRequested(reply) => {
                let _ = reply.send(Itinerary::from_steps(self.tracker.steps()));
            }
            SessionEvent::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionEvent::Shutdown => {
                let outcome = self.tracker.stop();
                self.apply(outcome).await;
            }
        }
    }

    async fn request_route(&mut self, pickup: Coordinate, destination: Coordinate) {
        info!("Requesting route from {} to {}", pickup, destination);

        let route = match self.services.directions.calculate(pickup, destination).await {
            Ok(route) => route,
            Err(e) => {
                warn!("Route request failed: {}", e);
                self.services.presenter.present(&self.view).await;
                return;
            }
        };

        match self.tracker.load_route(&route) {
            Ok(outcome) => {
                self.route = Some(route);
                self.apply(outcome).await;
            }
            Err(e) => {
                warn!("Cannot track route {}: {}", route.id, e);
                self.services.presenter.present(&self.view).await;
            }
        }
    }

    async fn toggle_navigation(&mut self) {
        if self.tracker.is_tracking() {
            let outcome = self.tracker.stop();
            self.apply(outcome).await;
            return;
        }

        let Some(route) = self.route.clone() else {
            debug!("Navigation toggled without a route");
            return;
        };

        match self.tracker.load_route(&route) {
            Ok(outcome) => self.apply(outcome).await,
            Err(e) => warn!("Cannot restart route {}: {}", route.id, e),
        }
    }

    /// Push an outcome out to the collaborators.
    async fn apply(&mut self, outcome: Outcome) {
        debug!("{}", outcome.event.kind);
        let ignored = outcome.is_ignored();
        if self.journal.len() >= self.tracker.config().journal_limit {
            self.journal.pop_front();
        }
        self.journal.push_back(outcome.event);
        if ignored {
            return;
        }

        for request in outcome.requests {
            let result = match request {
                GeofenceRequest::Register {
                    id,
                    center,
                    radius_meters,
                } => self.services.monitor.register(id, center, radius_meters).await,
                GeofenceRequest::Cancel { id } => self.services.monitor.cancel(id).await,
            };
            if let Err(e) = result {
                warn!("Region monitor request failed: {}", e);
            }
        }

        self.view = match &outcome.announcement {
            Some(announcement) => {
                let config = self.tracker.config();
                self.services
                    .announcer
                    .speak(&announcement.text, &config.speech_language, config.speech_rate)
                    .await;
                ViewState::announcing(announcement, outcome.tracking)
            }
            None => self.view.clone().with_navigation(outcome.tracking),
        };
        self.services.presenter.present(&self.view).await;
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            route_id: self.tracker.route_id(),
            cursor: self.tracker.cursor(),
            tracking: self.tracker.is_tracking(),
            generation: self.tracker.generation(),
            outstanding: self.tracker.outstanding().copied().collect(),
            view: self.view.clone(),
            journal: self.journal.iter().cloned().collect(),
        }
    }
}

async fn next_entry(
    entries: &mut Option<broadcast::Receiver<RegionId>>,
) -> std::result::Result<RegionId, broadcast::error::RecvError> {
    match entries {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Cloneable sender side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    async fn send(&self, event: SessionEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| SessionError::Closed)
    }

    /// Ask for a route and start tracking it.
    pub async fn request_route(&self, pickup: Coordinate, destination: Coordinate) -> Result<()> {
        self.send(SessionEvent::RouteRequested {
            pickup,
            destination,
        })
        .await
    }

    /// Tap the start/stop navigation button.
    pub async fn toggle_navigation(&self) -> Result<()> {
        self.send(SessionEvent::NavigationToggled).await
    }

    /// Report a geofence entry.
    pub async fn geofence_entered(&self, id: RegionId) -> Result<()> {
        self.send(SessionEvent::GeofenceEntered(id)).await
    }

    /// Fetch the step list of the last loaded route.
    pub async fn steps(&self) -> Result<Itinerary> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionEvent::StepsRequested(reply)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Fetch the current state. Everything sent before this call has been
    /// handled when it returns.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionEvent::Snapshot(reply)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// End the session.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(SessionEvent::Shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::{EventKind, Step};
    use wayfinder_services::{
        InMemoryDirections, RecordingPresenter, SimulatedRegionMonitor, TracingAnnouncer,
    };

    struct Harness {
        directions: Arc<InMemoryDirections>,
        monitor: Arc<SimulatedRegionMonitor>,
        announcer: Arc<TracingAnnouncer>,
        presenter: Arc<RecordingPresenter>,
    }

    impl Harness {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                directions: Arc::new(InMemoryDirections::new(steps)),
                monitor: Arc::new(SimulatedRegionMonitor::new()),
                announcer: Arc::new(TracingAnnouncer::new()),
                presenter: Arc::new(RecordingPresenter::new()),
            }
        }

        fn collaborators(&self) -> Collaborators {
            Collaborators {
                directions: self.directions.clone(),
                monitor: self.monitor.clone(),
                announcer: self.announcer.clone(),
                presenter: self.presenter.clone(),
            }
        }

        fn spawn(&self) -> (SessionHandle, JoinHandle<()>) {
            self.spawn_with(TrackerConfig::default())
        }

        fn spawn_with(&self, config: TrackerConfig) -> (SessionHandle, JoinHandle<()>) {
            NavigationSession::new(config, self.collaborators()).spawn()
        }
    }

    fn at(lat: f64) -> Coordinate {
        Coordinate::new(lat, 0.0)
    }

    fn scenario_steps() -> Vec<Step> {
        vec![
            Step::new("Depart", 0.0, at(0.0)),
            Step::new("Turn right", 120.34, at(0.001)),
            Step::new("Arrive", 15.0, at(0.002)),
        ]
    }

    #[tokio::test]
    async fn test_drive_to_arrival() {
        let harness = Harness::new(scenario_steps());
        let (handle, task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.tracking);
        assert_eq!(snapshot.cursor, 1);
        assert_eq!(
            snapshot.view.instruction_text,
            "In 120.3 meter Turn right, then in 15.0 meters, Arrive"
        );
        assert_eq!(harness.monitor.len().await, 2);

        harness.monitor.observe(at(0.001)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.cursor, 2);
        assert_eq!(snapshot.view.instruction_text, "In 15.0 meter Arrive");

        harness.monitor.observe(at(0.002)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.tracking);
        assert_eq!(snapshot.cursor, 0);
        assert_eq!(snapshot.view.instruction_text, "You have arrived at your destination");
        assert_eq!(snapshot.view.navigation_button_title(), "Start navigation");
        assert!(harness.monitor.is_empty().await);

        let spoken = harness.announcer.spoken().await;
        assert_eq!(spoken.len(), 3);
        assert!(spoken.iter().all(|u| u.language == "en-GB" && u.rate == 0.5));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_stops_and_restarts() {
        let harness = Harness::new(scenario_steps());
        let (handle, _task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        handle.toggle_navigation().await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.tracking);
        assert_eq!(snapshot.cursor, 0);
        assert!(snapshot.outstanding.is_empty());
        assert!(harness.monitor.is_empty().await);
        assert_eq!(snapshot.view.navigation_button_title(), "Start navigation");

        handle.toggle_navigation().await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.tracking);
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.cursor, 1);
        assert_eq!(harness.monitor.len().await, 2);
    }

    #[tokio::test]
    async fn test_entries_after_stop_are_ignored() {
        let harness = Harness::new(scenario_steps());
        let (handle, _task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let ids = handle.snapshot().await.unwrap().outstanding;
        handle.toggle_navigation().await.unwrap();

        for id in ids {
            handle.geofence_entered(id).await.unwrap();
        }
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.tracking);
        assert_eq!(snapshot.cursor, 0);
        assert!(matches!(
            snapshot.journal.last().unwrap().kind,
            EventKind::NotTracking
        ));
    }

    #[tokio::test]
    async fn test_new_route_replaces_old_regions() {
        let harness = Harness::new(scenario_steps());
        let (handle, _task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let old_ids = handle.snapshot().await.unwrap().outstanding;

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.generation, 2);

        let monitored: Vec<RegionId> =
            harness.monitor.regions().await.into_iter().map(|(id, _)| id).collect();
        assert!(old_ids.iter().all(|id| !monitored.contains(id)));

        handle.geofence_entered(old_ids[0]).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.cursor, 1);
        assert!(matches!(
            snapshot.journal.last().unwrap().kind,
            EventKind::StaleRegion { .. }
        ));
    }

    #[tokio::test]
    async fn test_journal_keeps_most_recent_events() {
        let harness = Harness::new(scenario_steps());
        let (handle, _task) = harness.spawn_with(TrackerConfig {
            journal_limit: 3,
            ..Default::default()
        });

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        for _ in 0..10 {
            handle.geofence_entered(RegionId::new(9, 9)).await.unwrap();
        }
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.journal.len(), 3);
        assert!(snapshot
            .journal
            .iter()
            .all(|e| matches!(e.kind, EventKind::StaleRegion { .. })));
        assert!(snapshot.tracking);
    }

    #[tokio::test]
    async fn test_failed_route_request_keeps_idle_view() {
        let harness = Harness::new(Vec::new());
        let (handle, _task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.tracking);
        assert!(snapshot.route_id.is_none());
        assert!(!snapshot.view.route_button_enabled);

        let latest = harness.presenter.latest().await.unwrap();
        assert_eq!(latest, ViewState::idle());
    }

    #[tokio::test]
    async fn test_steps_skip_departure() {
        let harness = Harness::new(scenario_steps());
        let (handle, _task) = harness.spawn();

        assert!(handle.steps().await.unwrap().is_empty());
        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        let itinerary = handle.steps().await.unwrap();
        assert_eq!(itinerary.len(), 2);
        assert_eq!(itinerary.rows[0].distance_text, "120.3 meter");
    }

    #[tokio::test]
    async fn test_handle_fails_after_shutdown() {
        let harness = Harness::new(scenario_steps());
        let (handle, task) = harness.spawn();

        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(matches!(
            handle.toggle_navigation().await,
            Err(SessionError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_regions() {
        let harness = Harness::new(scenario_steps());
        let (handle, task) = harness.spawn();

        handle.request_route(at(0.0), at(0.002)).await.unwrap();
        handle.snapshot().await.unwrap();
        assert_eq!(harness.monitor.len().await, 2);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(harness.monitor.is_empty().await);

        let history = harness.presenter.history().await;
        let preview = history
            .iter()
            .find(|v| v.instruction_text.starts_with("In 120.3"))
            .unwrap();
        assert!(preview.arrow_visible);
        assert_eq!(
            harness.announcer.spoken().await[0].text,
            preview.instruction_text
        );
    }
}
