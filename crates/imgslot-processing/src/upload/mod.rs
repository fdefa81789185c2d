//! Upload module
//!
//! Sequential per-variant uploads with aggregated progress and the
//! at-most-one-in-flight guard.

pub mod coordinator;
pub mod progress;

pub use coordinator::{InFlightGuard, UploadCoordinator};
pub use progress::ProgressTracker;
