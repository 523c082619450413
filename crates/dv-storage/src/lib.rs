//! Storage abstraction for the dv documentation viewer.
//!
//! This crate provides a [`Storage`] trait for abstracting directory listing and
//! content retrieval from the underlying backend. The manifest only ever asks
//! two questions of a file system: "what is in this directory?" and "what is in
//! this file?". Keeping them behind a trait enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (local disk today, anything listable tomorrow)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `list()` and `read()` methods
//! - [`FsStorage`] implementation for the local filesystem
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dv_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new();
//! for entry in storage.list(Path::new("docs"))? {
//!     println!("{} ({:?})", entry.path.display(), entry.kind);
//! }
//! # Ok::<(), dv_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
