use chrono::{DateTime, Utc};

use crate::error::TypeError;

/// Identifier of a record within one collection.
///
/// Identifiers are allocated from 1 upward and are unique per collection.
pub type RecordId = u64;

/// Wall-clock time used for creation and modification dates.
pub type Timestamp = DateTime<Utc>;

/// The capability set any storable record must satisfy.
///
/// A collection is parameterized over this trait rather than a concrete type.
/// Implementors carry arbitrary domain fields in addition to the identifier
/// and the two timestamps; the collection only ever touches these six
/// accessors.
pub trait Record: Clone {
    /// The record's identifier.
    fn id(&self) -> RecordId;

    /// Assign the record's identifier. Called by the collection on create.
    fn set_id(&mut self, id: RecordId);

    /// When the record was first created.
    fn creation_date(&self) -> Timestamp;

    fn set_creation_date(&mut self, at: Timestamp);

    /// When the record was last written.
    fn modification_date(&self) -> Timestamp;

    fn set_modification_date(&mut self, at: Timestamp);
}

/// The string key a record is indexed under.
pub fn record_key(id: RecordId) -> String {
    id.to_string()
}

/// Parse a record identifier from its string form (a registry key or a file
/// stem).
///
/// Only plain decimal digits are accepted; signs, whitespace and zero are
/// rejected.
pub fn parse_record_id(s: &str) -> Result<RecordId, TypeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeError::InvalidRecordId(s.to_string()));
    }
    let id: RecordId = s
        .parse()
        .map_err(|_| TypeError::InvalidRecordId(s.to_string()))?;
    if id == 0 {
        return Err(TypeError::ZeroRecordId);
    }
    Ok(id)
}
