//! Template resolution for record forms.
//!
//! A record is normally rendered against its template. When the
//! template cannot be used — deleted, access-denied, or the record
//! carries data the template no longer describes — the schema is
//! reconstructed from the stored values instead. The two cases are kept
//! apart as [`ResolvedSchema`] variants so callers must consciously
//! branch on "authoritative schema" vs "best-effort reconstruction":
//! inferred fields have no `required`/`options` metadata and no status
//! options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::template::{StatusOption, Template};
use crate::models::{FieldType, PatientRecord, SectionData};

#[derive(Debug, Clone)]
pub enum ResolvedSchema {
    /// The record's template, fetched and covering all stored data.
    Authoritative(Template),
    /// Reconstructed from the record's own values. Degraded mode:
    /// keeps every stored field viewable and editable.
    Inferred(InferredTemplate),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredTemplate {
    pub sections: Vec<InferredSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredSection {
    pub name: String,
    pub label: String,
    pub fields: Vec<InferredField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
}

/// A section as the form layer sees it, independent of where the
/// schema came from.
#[derive(Debug, Clone)]
pub struct FormSection {
    pub name: String,
    pub label: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: Option<Vec<String>>,
}

impl ResolvedSchema {
    pub fn is_inferred(&self) -> bool {
        matches!(self, Self::Inferred(_))
    }

    /// Status options are only known for authoritative schemas.
    pub fn status_options(&self) -> &[StatusOption] {
        match self {
            Self::Authoritative(template) => &template.status_options,
            Self::Inferred(_) => &[],
        }
    }

    /// Unified section list for rendering and validation, in schema
    /// order. Inferred fields are never required and carry no options.
    pub fn form_sections(&self) -> Vec<FormSection> {
        match self {
            Self::Authoritative(template) => template
                .sections
                .iter()
                .map(|section| FormSection {
                    name: section.name.clone(),
                    label: section.label.clone(),
                    fields: section
                        .fields
                        .iter()
                        .map(|field| FormField {
                            name: field.name.clone(),
                            label: field.label.clone(),
                            field_type: field.field_type,
                            required: field.required,
                            options: field.options.clone(),
                        })
                        .collect(),
                })
                .collect(),
            Self::Inferred(inferred) => inferred
                .sections
                .iter()
                .map(|section| FormSection {
                    name: section.name.clone(),
                    label: section.label.clone(),
                    fields: section
                        .fields
                        .iter()
                        .map(|field| FormField {
                            name: field.name.clone(),
                            label: field.label.clone(),
                            field_type: field.field_type,
                            required: false,
                            options: None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Pick the schema for a record.
///
/// The template wins only when it is present and covers every stored
/// key; otherwise the record's data is authoritative enough to rebuild
/// a schema from, so nothing the user once entered disappears from the
/// form.
pub fn resolve_for_record(template: Option<Template>, record: &PatientRecord) -> ResolvedSchema {
    match template {
        Some(template) if template.covers(&record.section_data) => {
            ResolvedSchema::Authoritative(template)
        }
        Some(template) => {
            tracing::debug!(
                record = %record.id,
                template = %template.id,
                "record data outside template, using inferred schema"
            );
            ResolvedSchema::Inferred(infer_template(&record.section_data))
        }
        None => ResolvedSchema::Inferred(infer_template(&record.section_data)),
    }
}

/// Rebuild a schema from stored values alone.
pub fn infer_template(data: &SectionData) -> InferredTemplate {
    InferredTemplate {
        sections: data
            .iter()
            .map(|(section_name, fields)| InferredSection {
                name: section_name.clone(),
                label: humanize(section_name),
                fields: fields
                    .iter()
                    .map(|(field_name, value)| InferredField {
                        name: field_name.clone(),
                        label: humanize(field_name),
                        field_type: infer_field_type(value),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Runtime-value introspection: booleans render as checkboxes, numbers
/// as number inputs, everything else as text.
pub fn infer_field_type(value: &Value) -> FieldType {
    match value {
        Value::Bool(_) => FieldType::Checkbox,
        Value::Number(_) => FieldType::Number,
        _ => FieldType::Text,
    }
}

/// Turn a storage key into a display label: `bloodPressure` and
/// `blood_pressure` both become "Blood pressure".
fn humanize(key: &str) -> String {
    let mut words = String::new();
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            words.push(' ');
            prev_lower = false;
        } else if ch.is_uppercase() && prev_lower {
            words.push(' ');
            words.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            words.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{sample_record, sample_template};
    use serde_json::json;

    #[test]
    fn covered_record_resolves_authoritative() {
        let record = sample_record();
        let schema = resolve_for_record(Some(sample_template()), &record);
        assert!(!schema.is_inferred());
        assert_eq!(schema.status_options().len(), 2);
    }

    #[test]
    fn missing_template_resolves_inferred() {
        let record = sample_record();
        let schema = resolve_for_record(None, &record);
        assert!(schema.is_inferred());
        assert!(schema.status_options().is_empty());
    }

    #[test]
    fn uncovered_record_falls_back_to_inference() {
        let mut record = sample_record();
        record
            .section_data
            .entry("demographics".into())
            .or_default()
            .insert("legacyScore".into(), json!(7));

        let schema = resolve_for_record(Some(sample_template()), &record);
        assert!(schema.is_inferred());

        // The legacy field survives on the form path.
        let sections = schema.form_sections();
        let demographics = sections.iter().find(|s| s.name == "demographics").unwrap();
        assert!(demographics.fields.iter().any(|f| f.name == "legacyScore"));
    }

    #[test]
    fn inference_maps_runtime_types() {
        assert_eq!(infer_field_type(&json!(true)), FieldType::Checkbox);
        assert_eq!(infer_field_type(&json!(42)), FieldType::Number);
        assert_eq!(infer_field_type(&json!(1.5)), FieldType::Number);
        assert_eq!(infer_field_type(&json!("text")), FieldType::Text);
        assert_eq!(infer_field_type(&json!(null)), FieldType::Text);
        assert_eq!(infer_field_type(&json!(["a"])), FieldType::Text);
    }

    #[test]
    fn inferred_fields_are_never_required() {
        let record = sample_record();
        let schema = resolve_for_record(None, &record);
        for section in schema.form_sections() {
            for field in section.fields {
                assert!(!field.required);
                assert!(field.options.is_none());
            }
        }
    }

    #[test]
    fn inferred_sections_follow_stored_data() {
        let record = sample_record();
        let inferred = infer_template(&record.section_data);
        let names: Vec<_> = inferred.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["demographics", "history"]);

        let demographics = &inferred.sections[0];
        let smoker = inferred.sections[1]
            .fields
            .iter()
            .find(|f| f.name == "smoker")
            .unwrap();
        assert_eq!(smoker.field_type, FieldType::Checkbox);
        let age = demographics.fields.iter().find(|f| f.name == "age").unwrap();
        assert_eq!(age.field_type, FieldType::Number);
    }

    #[test]
    fn humanize_splits_keys() {
        assert_eq!(humanize("firstName"), "First name");
        assert_eq!(humanize("blood_pressure"), "Blood pressure");
        assert_eq!(humanize("follow-up"), "Follow up");
        assert_eq!(humanize("age"), "Age");
    }
}
