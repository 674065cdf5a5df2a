//! Status values as stored on a record.
//!
//! A record's `status` is a denormalized copy of a status option, not a
//! live reference: renaming a label on the template later does not
//! rewrite records that already carry the old copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::template::StatusOption;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusValue {
    pub name: String,
    pub label: String,
    pub color: String,
}

/// One entry of a record's append-only status history.
///
/// Entries are never edited or removed once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: StatusValue,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

impl From<&StatusOption> for StatusValue {
    fn from(option: &StatusOption) -> Self {
        Self {
            name: option.name.clone(),
            label: option.label.clone(),
            color: option.color.clone(),
        }
    }
}
