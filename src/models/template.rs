//! Record templates: admin-configurable schemas of sections, fields and
//! status options.
//!
//! `name` fields are storage keys (see [`super::validate_key`]); `label`
//! fields are freely editable display text. Records reference templates
//! weakly — editing a template never migrates existing records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FieldType;
use super::patient::SectionData;
use super::{validate_key, ModelError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_default: bool,
    pub sections: Vec<TemplateSection>,
    pub status_options: Vec<StatusOption>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSection {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One allowed value of a record's status, with display metadata.
/// Exactly one option should carry `is_default` at creation time;
/// this is advisory and not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOption {
    pub name: String,
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Template {
    pub fn find_section(&self, name: &str) -> Option<&TemplateSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn find_field(&self, section: &str, field: &str) -> Option<&FieldDef> {
        self.find_section(section)
            .and_then(|s| s.fields.iter().find(|f| f.name == field))
    }

    /// Does this template describe every key stored in `data`?
    ///
    /// A record whose data contains keys outside its template (fields
    /// that survived a template edit) is not covered, and must be
    /// rendered through the inferred-schema path instead.
    pub fn covers(&self, data: &SectionData) -> bool {
        data.iter().all(|(section, fields)| {
            fields
                .keys()
                .all(|field| self.find_field(section, field).is_some())
        })
    }

    /// The option flagged as default, falling back to the first one.
    pub fn default_status_option(&self) -> Option<&StatusOption> {
        self.status_options
            .iter()
            .find(|o| o.is_default)
            .or_else(|| self.status_options.first())
    }
}

/// Payload for creating or replacing a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_default: bool,
    pub sections: Vec<TemplateSection>,
    pub status_options: Vec<StatusOption>,
}

impl TemplateDraft {
    /// Validate every storage key before the draft leaves the client.
    ///
    /// Section names must be unique, field names unique within their
    /// section, status option names unique. A default-count other than
    /// one is logged but accepted.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut section_names = std::collections::HashSet::new();
        for section in &self.sections {
            validate_key(&section.name)?;
            if !section_names.insert(section.name.as_str()) {
                return Err(ModelError::InvalidKey(format!(
                    "duplicate section '{}'",
                    section.name
                )));
            }
            let mut field_names = std::collections::HashSet::new();
            for field in &section.fields {
                validate_key(&field.name)?;
                if !field_names.insert(field.name.as_str()) {
                    return Err(ModelError::InvalidKey(format!(
                        "duplicate field '{}' in section '{}'",
                        field.name, section.name
                    )));
                }
            }
        }
        let mut option_names = std::collections::HashSet::new();
        for option in &self.status_options {
            validate_key(&option.name)?;
            if !option_names.insert(option.name.as_str()) {
                return Err(ModelError::InvalidKey(format!(
                    "duplicate status option '{}'",
                    option.name
                )));
            }
        }
        let defaults = self.status_options.iter().filter(|o| o.is_default).count();
        if defaults != 1 {
            tracing::warn!(
                template = %self.name,
                defaults,
                "template does not have exactly one default status option"
            );
        }
        Ok(())
    }
}
