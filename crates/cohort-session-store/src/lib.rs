//! # Cohort Session Store
//!
//! Storage abstraction for the cohort session manager. Provides a trait-based
//! interface over the tab-scoped persistence area - the region that survives
//! a page reload but not a new session - plus the storage-key contract every
//! namespace writes under.
//!
//! ## Key Types
//!
//! - [`StorageArea`] - the async trait for all persistence operations
//! - [`MemoryStorage`] - in-memory storage for tests and embedding hosts
//! - [`keys`] - the per-namespace storage keys and the teardown sweep list
//!
//! ## Design Notes
//!
//! - **Opaque values**: the area stores strings only; encrypted namespaces
//!   persist wire payloads, plaintext namespaces persist JSON.
//! - **Disjoint keys**: each namespace owns exactly one key, so no write can
//!   clobber another namespace's record.
//! - **Absent is not an error**: reading a missing key yields `Ok(None)`.

pub mod error;
pub mod keys;
pub mod memory;
pub mod traits;

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use traits::StorageArea;
