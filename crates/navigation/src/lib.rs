//! Navigation session for Wayfinder.
//!
//! Runs the route progress tracker on a single task, feeds it UI events and
//! geofence notifications, and pushes the results to speech and view
//! collaborators.

#![warn(missing_docs)]

pub mod session;
pub mod simulate;

pub use session::{
    Collaborators, NavigationSession, SessionEvent, SessionHandle, SessionSnapshot,
};
pub use simulate::{drive, interpolate_path, DriveFrame};

/// Error type for session handle operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors returned by a [`SessionHandle`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session task has ended
    #[error("Navigation session is closed")]
    Closed,
}
