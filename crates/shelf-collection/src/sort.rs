//! Ordering policy for record snapshots.
//!
//! Sorting is stable and always operates on an owned snapshot, never on the
//! registry. An unrecognized sort key leaves the input order untouched.

use std::fmt;

use shelf_types::Record;

/// Field a snapshot can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    CreationDate,
    ModificationDate,
}

impl SortKey {
    /// Parse a key name: `id`, `creationDate` or `modificationDate`.
    ///
    /// Any other name, including the empty string, yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "creationDate" => Some(Self::CreationDate),
            "modificationDate" => Some(Self::ModificationDate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreationDate => "creationDate",
            Self::ModificationDate => "modificationDate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// `asc` or `ascending` (any case) is ascending; everything else is
    /// descending.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("asc") || name.eq_ignore_ascii_case("ascending") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to order a snapshot. `sort_by: None` means no reordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl SortOptions {
    pub fn new(sort_by: SortKey, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_order,
        }
    }

    /// Build options from the textual key and order names.
    pub fn parse(sort_by: &str, sort_order: &str) -> Self {
        Self {
            sort_by: SortKey::from_name(sort_by),
            sort_order: SortOrder::from_name(sort_order),
        }
    }
}

/// Stable-sort `items` according to `options`.
///
/// Records with equal keys keep their relative input order in both
/// directions.
pub fn sort_records<T: Record>(mut items: Vec<T>, options: &SortOptions) -> Vec<T> {
    let Some(key) = options.sort_by else {
        return items;
    };
    let descending = options.sort_order == SortOrder::Descending;

    items.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Id => a.id().cmp(&b.id()),
            SortKey::CreationDate => a.creation_date().cmp(&b.creation_date()),
            SortKey::ModificationDate => a.modification_date().cmp(&b.modification_date()),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    items
}
