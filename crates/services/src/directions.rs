//! Directions service implementations.
//!
//! Routing itself is the host SDK's job. These backends serve precomputed
//! steps so sessions can run without one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wayfinder_core::{Coordinate, Route, Step};

use super::{DirectionsService, Result, ServiceError};

/// On-disk route format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFile {
    /// Steps in travel order
    pub steps: Vec<Step>,
}

impl RouteFile {
    /// Read and parse a route file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the route file as pretty JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json.as_bytes()).await?;
        Ok(())
    }
}

fn build_route(pickup: Coordinate, destination: Coordinate, steps: Vec<Step>) -> Result<Route> {
    if steps.is_empty() {
        warn!("No steps available from {} to {}", pickup, destination);
        return Err(ServiceError::NoRouteFound {
            from: pickup,
            to: destination,
        });
    }
    let route = Route::new(pickup, destination, steps);
    debug!("Computed route {} with {} steps", route.id, route.len());
    Ok(route)
}

/// Serves the route stored in a JSON file, re-read on every request.
pub struct FileDirections {
    path: PathBuf,
}

impl FileDirections {
    /// Create a directions service backed by `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DirectionsService for FileDirections {
    async fn calculate(&self, pickup: Coordinate, destination: Coordinate) -> Result<Route> {
        let file = RouteFile::load(&self.path).await?;
        build_route(pickup, destination, file.steps)
    }
}

/// In-memory directions service.
pub struct InMemoryDirections {
    steps: Arc<Mutex<Vec<Step>>>,
}

impl InMemoryDirections {
    /// Create a service that answers every request with `steps`.
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps)),
        }
    }

    /// Replace the steps returned by later requests.
    pub async fn set_steps(&self, steps: Vec<Step>) {
        *self.steps.lock().await = steps;
    }
}

impl Default for InMemoryDirections {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DirectionsService for InMemoryDirections {
    async fn calculate(&self, pickup: Coordinate, destination: Coordinate) -> Result<Route> {
        let steps = self.steps.lock().await.clone();
        build_route(pickup, destination, steps)
    }
}
