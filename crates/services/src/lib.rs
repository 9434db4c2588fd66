//! Collaborator abstractions and reference implementations for Wayfinder.
//!
//! The directions service, region monitor, speech announcer and view
//! presenter are owned by the host platform. This crate defines the traits
//! the navigation session talks to, plus in-process implementations used by
//! the CLI and tests.

#![warn(missing_docs)]

pub mod trait_;
pub mod directions;
pub mod monitor;
pub mod speech;
pub mod presenter;

pub use trait_::{
    DirectionsService, RegionMonitor, Result, ServiceError, SpeechAnnouncer, ViewPresenter,
};
pub use directions::{FileDirections, InMemoryDirections, RouteFile};
pub use monitor::{Region, SimulatedRegionMonitor, DEFAULT_CHANNEL_CAPACITY};
pub use speech::{TracingAnnouncer, Utterance};
pub use presenter::RecordingPresenter;
