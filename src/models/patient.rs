//! Patient records: template-shaped section data plus status tracking.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::status::{StatusEntry, StatusValue};
use super::template::StatusOption;

/// Nested record payload: section name → field name → value.
///
/// The shape mirrors the referenced template at the time of entry but
/// is not re-validated once stored — fields can survive template edits.
pub type SectionData = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: Uuid,
    /// Weak reference; template changes are not retroactively migrated.
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub section_data: SectionData,
    pub status: Option<StatusValue>,
    #[serde(default)]
    pub status_history: Vec<StatusEntry>,
    /// Soft-delete flag, independent of the clinical status.
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Record-level additions to the template's status option set.
    #[serde(default)]
    pub status_overrides: Vec<StatusOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn field_value(&self, section: &str, field: &str) -> Option<&Value> {
        self.section_data.get(section).and_then(|s| s.get(field))
    }
}

/// Payload for creating a record from a template selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub template_id: Uuid,
    #[serde(default)]
    pub section_data: SectionData,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub total: u64,
    pub active: u64,
    #[serde(default)]
    pub by_status: HashMap<String, u64>,
}
