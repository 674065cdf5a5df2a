use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a server-side backup archive. Creation, storage and
/// restore all happen on the backend; the client lists, triggers and
/// downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInfo {
    pub id: Uuid,
    pub file_name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
