use chrono::Utc;
use serde::{Deserialize, Serialize};
use shelf_types::{Record, RecordId, Timestamp};

/// A titled text note, the record type the CLI manages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub creation_date: Timestamp,
    pub modification_date: Timestamp,
}

impl Note {
    /// A note not yet stored; the collection assigns id and dates.
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
            tags,
            creation_date: now,
            modification_date: now,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Record for Note {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn creation_date(&self) -> Timestamp {
        self.creation_date
    }

    fn set_creation_date(&mut self, at: Timestamp) {
        self.creation_date = at;
    }

    fn modification_date(&self) -> Timestamp {
        self.modification_date
    }

    fn set_modification_date(&mut self, at: Timestamp) {
        self.modification_date = at;
    }
}
