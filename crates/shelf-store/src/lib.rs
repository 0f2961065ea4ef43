//! File-backed storage for Shelf collections.
//!
//! A collection is persisted in one of two layouts:
//!
//! - [`SingleFileBackend`] -- the whole collection as one JSON array in one file
//! - [`DirectoryBackend`] -- one `<id>.json` file per record in a directory
//!
//! Both implement the [`Backend`] trait. [`open_backend`] picks the layout
//! for a path once, returning the closed [`StorageBackend`] enum.
//!
//! # Design Rules
//!
//! 1. Every write goes through [`atomic::write_json_atomic`]: write
//!    `<path>.tmp`, then rename over `<path>`.
//! 2. File handles are opened per operation, never held.
//! 3. The single-file backend serializes its read-modify-write cycle behind
//!    an internal lock.
//! 4. Directory enumeration is best-effort; malformed entries are skipped.
//! 5. Errors are propagated unchanged, never retried.

pub mod atomic;
pub mod config;
pub mod directory;
pub mod error;
pub mod select;
pub mod single_file;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{StoreConfig, WriteOptions};
pub use directory::DirectoryBackend;
pub use error::{StoreError, StoreResult};
pub use select::{detect_kind, open_backend, StorageBackend};
pub use single_file::SingleFileBackend;
pub use traits::{Backend, BackendKind};
