//! imgslot pipeline library
//!
//! `PipelineController` drives one image field: it wires file selection,
//! URL paste and removal through validation, generation, upload and
//! deletion, and exposes the resulting state as an observable value.

pub mod components;
pub mod controller;
pub mod state;
pub mod thumbnail;

pub use components::PipelineComponents;
pub use controller::PipelineController;
pub use state::PipelineState;
