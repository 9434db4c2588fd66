//! Collaborator trait abstractions.

use async_trait::async_trait;
use tokio::sync::broadcast;
use wayfinder_core::{Coordinate, RegionId, Route, ViewState};

/// Error type for collaborator operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur when talking to a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The directions service could not produce a route
    #[error("No route found from {from} to {to}")]
    NoRouteFound {
        /// Requested pickup
        from: Coordinate,
        /// Requested destination
        to: Coordinate,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The region monitor refused a request
    #[error("Region monitoring error: {0}")]
    Monitor(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Computes routes between two points.
#[async_trait]
pub trait DirectionsService: Send + Sync {
    /// Calculate a route from `pickup` to `destination`.
    async fn calculate(&self, pickup: Coordinate, destination: Coordinate) -> Result<Route>;
}

/// Circular region monitoring.
///
/// Registration and cancellation are fire-and-forget requests. Entry
/// notifications are delivered asynchronously through [`subscribe`].
///
/// [`subscribe`]: RegionMonitor::subscribe
#[async_trait]
pub trait RegionMonitor: Send + Sync {
    /// Start monitoring a region.
    async fn register(&self, id: RegionId, center: Coordinate, radius_meters: f64) -> Result<()>;

    /// Stop monitoring a region. Cancelling an unknown id is not an error.
    async fn cancel(&self, id: RegionId) -> Result<()>;

    /// Receive entry notifications.
    fn subscribe(&self) -> broadcast::Receiver<RegionId>;
}

/// Text-to-speech output.
#[async_trait]
pub trait SpeechAnnouncer: Send + Sync {
    /// Speak `text`. Nothing is returned; failures are the announcer's concern.
    async fn speak(&self, text: &str, language: &str, rate: f32);
}

/// Receives view-state updates after every tracker transition.
#[async_trait]
pub trait ViewPresenter: Send + Sync {
    /// Show `view`.
    async fn present(&self, view: &ViewState);
}
