//! Status transitions and the append-only history.
//!
//! The state set is open: whatever status options the record's template
//! defines, plus record-level overrides. Any status may transition to
//! any other — there are no terminal states, and a status like
//! "discharged" can be re-entered at any time. Every accepted change
//! appends exactly one history entry; history entries are never edited
//! or removed.

use chrono::{DateTime, Utc};

use crate::models::template::{StatusOption, Template};
use crate::models::{PatientRecord, StatusEntry, StatusValue};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusError {
    #[error("Status option not found: {0}")]
    OptionNotFound(String),
}

/// Result of applying a status change to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    /// The record's status was replaced and an entry appended.
    Applied(StatusEntry),
    /// Target name and label both matched the current status; nothing
    /// was written and no history entry was produced.
    Unchanged,
}

/// The resolved option set for a record: template options with
/// record-level overrides unioned in by name (overrides win).
pub fn resolve_status_options(
    template: Option<&Template>,
    overrides: &[StatusOption],
) -> Vec<StatusOption> {
    let mut options: Vec<StatusOption> = template
        .map(|t| t.status_options.clone())
        .unwrap_or_default();
    for over in overrides {
        match options.iter_mut().find(|o| o.name == over.name) {
            Some(existing) => *existing = over.clone(),
            None => options.push(over.clone()),
        }
    }
    options
}

pub fn find_option<'a>(options: &'a [StatusOption], name: &str) -> Option<&'a StatusOption> {
    options.iter().find(|o| o.name == name)
}

/// The option to preselect for a fresh record: the flagged default,
/// else the first.
pub fn default_option(options: &[StatusOption]) -> Option<&StatusOption> {
    options
        .iter()
        .find(|o| o.is_default)
        .or_else(|| options.first())
}

/// Apply a status change.
///
/// The target must exist in `options`. Change detection compares both
/// `name` and `label` against the current status: a label-only edit
/// (same name, new display text) counts as a real transition and gets
/// its own history entry, while a fully identical target is a no-op.
pub fn apply_status_change(
    record: &mut PatientRecord,
    target: &str,
    options: &[StatusOption],
    changed_by: &str,
    at: DateTime<Utc>,
) -> Result<StatusChange, StatusError> {
    let option =
        find_option(options, target).ok_or_else(|| StatusError::OptionNotFound(target.into()))?;
    let next = StatusValue::from(option);

    if let Some(current) = &record.status {
        if current.name == next.name && current.label == next.label {
            return Ok(StatusChange::Unchanged);
        }
    }

    let entry = StatusEntry {
        status: next.clone(),
        changed_at: at,
        changed_by: changed_by.to_string(),
    };
    tracing::debug!(
        record = %record.id,
        status = %next.name,
        changed_by,
        "status transition"
    );
    record.status = Some(next);
    record.status_history.push(entry.clone());
    Ok(StatusChange::Applied(entry))
}
