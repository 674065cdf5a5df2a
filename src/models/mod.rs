//! Wire data model for the practice-management backend.
//!
//! One file per entity. All wire types use camelCase serde renames to
//! match the backend's JSON; identifiers used as storage keys
//! (`section.name`, `field.name`, `status.name`) are validated with
//! [`validate_key`] while labels remain free display text.

pub mod ai;
pub mod appointment;
pub mod backup;
pub mod enums;
pub mod event;
pub mod filters;
pub mod note;
pub mod notification;
pub mod patient;
pub mod status;
pub mod template;
pub mod user;
pub mod visit;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use ai::AiSummary;
pub use appointment::{Appointment, NewAppointment};
pub use backup::BackupInfo;
pub use enums::{AppointmentStatus, FieldType, NotificationKind, Role};
pub use event::{ClinicalEvent, NewEvent};
pub use filters::{AppointmentFilter, NotificationFilter, PatientListFilter, SubListFilter};
pub use note::{NewNote, Note};
pub use notification::{NewSystemNotification, Notification, SystemNotification};
pub use patient::{NewPatient, PatientRecord, PatientStats, SectionData};
pub use status::{StatusEntry, StatusValue};
pub use template::{FieldDef, StatusOption, Template, TemplateDraft, TemplateSection};
pub use user::{LoginRequest, LoginResponse, NewUser, User, UserPatch};
pub use visit::{NewVisit, Visit, VisitPatch};

/// Errors from model parsing and identifier validation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
    #[error("'{0}' is not a valid storage key (letters, digits, '_' and '-' only, no spaces)")]
    InvalidKey(String),
}

/// Storage keys are stable identifiers: they survive label edits and are
/// used as map keys in `sectionData`, so they must never contain spaces.
pub fn validate_key(key: &str) -> Result<(), ModelError> {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("key regex is valid")
    });
    if re.is_match(key) {
        Ok(())
    } else {
        Err(ModelError::InvalidKey(key.to_string()))
    }
}

/// Soft-deletable sub-records (visits, events, notes).
///
/// Deleting an already-deleted record and restoring a live one are
/// no-ops: both operations are idempotent and touch nothing but the
/// flag itself.
pub trait SoftDelete {
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);

    fn mark_deleted(&mut self) {
        self.set_deleted(true);
    }

    fn restore(&mut self) {
        self.set_deleted(false);
    }
}

/// One page of a list query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Shared fixtures for the crate's test modules.
#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use super::{PatientRecord, Template};

    pub(crate) fn sample_template() -> Template {
        serde_json::from_value(json!({
            "id": "6f9c2a58-1f6e-4f7a-9f2b-9a3c1e6b2d41",
            "name": "general-intake",
            "description": "General intake form",
            "isPrivate": false,
            "isDefault": true,
            "sections": [
                {
                    "name": "demographics",
                    "label": "Demographics",
                    "fields": [
                        {"name": "firstName", "label": "First name", "type": "text", "required": true},
                        {"name": "age", "label": "Age", "type": "number", "required": false}
                    ]
                },
                {
                    "name": "history",
                    "label": "Medical history",
                    "fields": [
                        {"name": "smoker", "label": "Smoker", "type": "checkbox", "required": false}
                    ]
                }
            ],
            "statusOptions": [
                {"name": "active", "label": "Active", "color": "#4caf50", "isDefault": true},
                {"name": "discharged", "label": "Discharged", "color": "#9e9e9e"}
            ],
            "createdAt": "2026-01-10T09:00:00Z",
            "updatedAt": "2026-01-10T09:00:00Z"
        }))
        .unwrap()
    }

    pub(crate) fn sample_record() -> PatientRecord {
        serde_json::from_value(json!({
            "id": "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9",
            "templateId": "6f9c2a58-1f6e-4f7a-9f2b-9a3c1e6b2d41",
            "sectionData": {
                "demographics": {"firstName": "Ada", "age": 36},
                "history": {"smoker": false}
            },
            "status": {"name": "active", "label": "Active", "color": "#4caf50"},
            "statusHistory": [],
            "isActive": true,
            "tags": ["urgent"],
            "statusOverrides": [],
            "createdAt": "2026-02-01T08:30:00Z",
            "updatedAt": "2026-02-01T08:30:00Z"
        }))
        .unwrap()
    }
}
