//! imgslot storage library
//!
//! This crate provides the storage abstraction the image pipeline writes to,
//! plus a local filesystem backend and an in-memory backend.
//!
//! # Path and URL format
//!
//! Storage paths are flat names produced by the name resolver, e.g.
//! `event-hackfest-original-6f1c....webp`. Every backend publishes an object
//! at `{base_url}/images/{path}`. The `images` segment is what lets the
//! deletion resolver tell our URLs apart from pasted external ones; see the
//! `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgslot_core::StorageBackend;
pub use keys::{public_url, storage_path_from_url, validate_path};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use traits::{ProgressFn, Storage, StorageError, StorageResult};
