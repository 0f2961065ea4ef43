//! Foundation types for Shelf collection stores.
//!
//! This crate defines the capability set every storable record must satisfy
//! and the small value types shared by the backend, registry, and collection
//! crates. Every other Shelf crate depends on `shelf-types`.
//!
//! # Key Types
//!
//! - [`Record`] -- Identifier and timestamp accessors required by a collection
//! - [`RecordId`] -- Integer record identifier, allocated from 1
//! - [`Timestamp`] -- UTC wall-clock time used for creation/modification dates
//! - [`AssetRef`] -- Reference to a media asset annotated onto a record

pub mod asset;
pub mod error;
pub mod record;

pub use asset::AssetRef;
pub use error::TypeError;
pub use record::{parse_record_id, record_key, Record, RecordId, Timestamp};
