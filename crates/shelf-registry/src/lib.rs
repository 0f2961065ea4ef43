//! In-memory index for Shelf collections.
//!
//! A [`Registry`] maps string keys (stringified record identifiers) to
//! values. It has no persistence responsibility; a collection loads it once
//! from its backend and then mirrors every successful mutation into it so
//! that reads never touch the disk.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry lookups
//! - [`registry`] -- The [`Registry`] map itself

pub mod error;
pub mod registry;

pub use error::{RegistryError, Result};
pub use registry::Registry;
