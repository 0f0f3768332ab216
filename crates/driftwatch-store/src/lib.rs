//! driftwatch-store - Object store abstraction
//!
//! Contracts, diff payloads, and rendered reports all live in a bucket/key
//! object store. This crate defines the [`ObjectStore`] trait plus two
//! implementations: [`FsStore`] backed by a directory tree for real runs,
//! and [`MemoryStore`] for tests.

pub mod fs;
pub mod location;
pub mod memory;
pub mod store;

pub use fs::FsStore;
pub use location::DataLocation;
pub use memory::MemoryStore;
pub use store::{get_json, put_json, ObjectInfo, ObjectStore, StoreError};
