use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shelf_types::{Record, RecordId, Timestamp};

/// Minimal record used by the backend tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: RecordId,
    pub caption: String,
    pub creation_date: Timestamp,
    pub modification_date: Timestamp,
}

impl Record for Photo {
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

pub fn photo(id: RecordId, caption: &str) -> Photo {
    let at = Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap();
    Photo {
        id,
        caption: caption.to_string(),
        creation_date: at,
        modification_date: at,
    }
}
