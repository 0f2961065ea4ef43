//! Write-through collections of typed records.
//!
//! [`CollectionManager`] owns one storage backend and one in-memory
//! [`Registry`](shelf_registry::Registry). The backend is chosen from the
//! collection path when the manager is opened, the registry is filled from
//! it once, and from then on:
//!
//! - `create` / `update` / `delete` write to the backend first and mirror
//!   into the registry only on success;
//! - `get`, `get_all`, `get_list` and the sorted variants read the registry
//!   only.
//!
//! # Modules
//!
//! - [`manager`] -- [`CollectionManager`]
//! - [`sort`] -- [`SortOptions`] and the stable ordering policy
//! - [`assets`] -- [`AssetIndex`], the externally populated asset side-table
//! - [`error`] -- [`CollectionError`]

pub mod assets;
pub mod error;
pub mod manager;
pub mod sort;

pub use assets::AssetIndex;
pub use error::{CollectionError, CollectionResult};
pub use manager::CollectionManager;
pub use sort::{sort_records, SortKey, SortOptions, SortOrder};
