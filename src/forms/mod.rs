//! Form state for record editing.
//!
//! The stored document is nested (`section → field → value`); editing
//! widgets want a flat field-keyed shape. Mapping is schema-driven in
//! both directions: [`to_form_state`] flattens in schema order with
//! absent values defaulting to empty, and [`to_document`] writes back
//! only fields the schema knows about. The write-back is deliberately
//! template-scoped — data for fields outside the schema is not
//! rewritten; the schema resolver keeps such records on the inferred
//! path so those fields still reach the form.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{PatientRecord, SectionData};
use crate::schema::ResolvedSchema;

/// Flat form key. Field names are only unique within their section, so
/// the section name is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldKey {
    pub section: String,
    pub field: String,
}

impl FieldKey {
    pub fn new(section: &str, field: &str) -> Self {
        Self {
            section: section.to_string(),
            field: field.to_string(),
        }
    }
}

/// Flat, field-keyed editing state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<FieldKey, Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, field: &str, value: Value) {
        self.values.insert(FieldKey::new(section, field), value);
    }

    pub fn get(&self, section: &str, field: &str) -> Option<&Value> {
        self.values.get(&FieldKey::new(section, field))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.values.iter()
    }
}

/// Client-side validation failures, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Reported with the *section label* so the UI can point the user
    /// at the right part of the form.
    #[error("Required field '{field}' in section '{section}' is empty")]
    RequiredFieldEmpty { section: String, field: String },
}

/// Flatten a record against a schema. Every schema field gets an entry;
/// values missing from the record default to `null`.
pub fn to_form_state(record: &PatientRecord, schema: &ResolvedSchema) -> FormState {
    let mut form = FormState::new();
    for section in schema.form_sections() {
        for field in &section.fields {
            let value = record
                .field_value(&section.name, &field.name)
                .cloned()
                .unwrap_or(Value::Null);
            form.set(&section.name, &field.name, value);
        }
    }
    form
}

/// Nest a form back into a document, schema-scoped: only fields the
/// schema names are written.
pub fn to_document(form: &FormState, schema: &ResolvedSchema) -> SectionData {
    let mut data = SectionData::new();
    for section in schema.form_sections() {
        for field in &section.fields {
            if let Some(value) = form.get(&section.name, &field.name) {
                data.entry(section.name.clone())
                    .or_default()
                    .insert(field.name.clone(), value.clone());
            }
        }
    }
    data
}

/// A value counts as empty when it is absent, `null`, a blank string,
/// or an empty array. Numbers and booleans (including `false`) are
/// always filled.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Required-field gate. Walks sections in schema order and reports the
/// first violation by section label; submission must not proceed (and
/// no request may be issued) until it passes.
pub fn validate_required(form: &FormState, schema: &ResolvedSchema) -> Result<(), ValidationError> {
    for section in schema.form_sections() {
        for field in &section.fields {
            if !field.required {
                continue;
            }
            let filled = form
                .get(&section.name, &field.name)
                .is_some_and(|v| !is_empty_value(v));
            if !filled {
                return Err(ValidationError::RequiredFieldEmpty {
                    section: section.label.clone(),
                    field: field.label.clone(),
                });
            }
        }
    }
    Ok(())
}
