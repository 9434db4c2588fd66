//! Simulated region monitoring.
//!
//! Keeps circular regions in memory and reports an entry when a position fix
//! lands inside one. Each registration fires at most once.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, trace};
use wayfinder_core::{Coordinate, RegionId};

use super::{RegionMonitor, Result};

/// Entry notifications buffered per subscriber. A subscriber that falls
/// further behind loses the oldest ids and gets `RecvError::Lagged`.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A monitored circular region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Center of the circle
    pub center: Coordinate,
    /// Radius in meters
    pub radius_meters: f64,
}

/// In-memory region monitor driven by [`observe`](Self::observe).
pub struct SimulatedRegionMonitor {
    regions: Arc<Mutex<BTreeMap<RegionId, Region>>>,
    entries: broadcast::Sender<RegionId>,
}

impl SimulatedRegionMonitor {
    /// Create a monitor with no regions.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a monitor buffering up to `capacity` unread entries per
    /// subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (entries, _) = broadcast::channel(capacity.max(1));
        Self {
            regions: Arc::new(Mutex::new(BTreeMap::new())),
            entries,
        }
    }

    /// Feed a position fix. Returns the regions entered, in id order.
    pub async fn observe(&self, position: Coordinate) -> Vec<RegionId> {
        let mut regions = self.regions.lock().await;
        let entered: Vec<RegionId> = regions
            .iter()
            .filter(|(_, region)| position.is_within(&region.center, region.radius_meters))
            .map(|(id, _)| *id)
            .collect();

        for id in &entered {
            regions.remove(id);
            debug!("Entered region {} at {}", id, position);
            // No subscribers is fine: nobody is navigating.
            let _ = self.entries.send(*id);
        }

        entered
    }

    /// Currently monitored regions, in id order.
    pub async fn regions(&self) -> Vec<(RegionId, Region)> {
        self.regions
            .lock()
            .await
            .iter()
            .map(|(id, region)| (*id, *region))
            .collect()
    }

    /// Number of monitored regions.
    pub async fn len(&self) -> usize {
        self.regions.lock().await.len()
    }

    /// Whether no region is monitored.
    pub async fn is_empty(&self) -> bool {
        self.regions.lock().await.is_empty()
    }
}

impl Default for SimulatedRegionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegionMonitor for SimulatedRegionMonitor {
    async fn register(&self, id: RegionId, center: Coordinate, radius_meters: f64) -> Result<()> {
        trace!("Monitoring region {} at {} (r={}m)", id, center, radius_meters);
        self.regions.lock().await.insert(
            id,
            Region {
                center,
                radius_meters,
            },
        );
        Ok(())
    }

    async fn cancel(&self, id: RegionId) -> Result<()> {
        if self.regions.lock().await.remove(&id).is_some() {
            trace!("Stopped monitoring region {}", id);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<RegionId> {
        self.entries.subscribe()
    }
}
