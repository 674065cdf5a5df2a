use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SoftDelete;

/// A timeline event on a patient record (admission, referral, lab
/// result received, ...). Free-form `kind` — the set is not fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalEvent {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub title: String,
    pub kind: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl SoftDelete for ClinicalEvent {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub kind: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
}
