//! Simulated drives along a route.
//!
//! Produces position fixes between step boundaries and feeds them to a
//! [`SimulatedRegionMonitor`], which reports entries to the session.

use serde::Serialize;
use tracing::debug;
use wayfinder_core::{Coordinate, Step};
use wayfinder_services::SimulatedRegionMonitor;

use crate::{Result, SessionHandle, SessionSnapshot};

/// Linear interpolation between two fixes.
fn lerp(a: &Coordinate, b: &Coordinate, t: f64) -> Coordinate {
    Coordinate::new(
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
    )
}

/// Positions from the first step boundary to the last.
///
/// Each leg between consecutive boundaries is split into `samples_per_leg`
/// intervals; every boundary appears exactly once.
pub fn interpolate_path(steps: &[Step], samples_per_leg: usize) -> Vec<Coordinate> {
    let samples = samples_per_leg.max(1);
    let mut path = Vec::with_capacity(steps.len() * samples);

    if let Some(first) = steps.first() {
        path.push(first.boundary);
    }
    for leg in steps.windows(2) {
        let (from, to) = (&leg[0].boundary, &leg[1].boundary);
        for i in 1..=samples {
            path.push(lerp(from, to, i as f64 / samples as f64));
        }
    }
    path
}

/// What happened at one fix.
#[derive(Debug, Clone, Serialize)]
pub struct DriveFrame {
    /// Position that was observed
    pub position: Coordinate,
    /// Instruction banner after the fix was processed
    pub instruction: String,
    /// Whether the session is still tracking
    pub tracking: bool,
}

/// Feed `path` to the monitor one fix at a time.
///
/// After each fix the session is queried, so every reported entry has been
/// handled before the next fix. Stops early once tracking ends.
pub async fn drive(
    handle: &SessionHandle,
    monitor: &SimulatedRegionMonitor,
    path: &[Coordinate],
) -> Result<(Vec<DriveFrame>, SessionSnapshot)> {
    let mut frames = Vec::new();
    let mut snapshot = handle.snapshot().await?;

    for position in path {
        if !snapshot.tracking {
            break;
        }
        let entered = monitor.observe(*position).await;
        snapshot = handle.snapshot().await?;
        if !entered.is_empty() {
            debug!("Fix {} entered {:?}", position, entered);
            frames.push(DriveFrame {
                position: *position,
                instruction: snapshot.view.instruction_text.clone(),
                tracking: snapshot.tracking,
            });
        }
    }

    Ok((frames, snapshot))
}
