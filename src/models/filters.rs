//! List-query filters. These double as cache-key components, so every
//! filter derives `Eq + Hash` and owns its parameters by value.

use chrono::NaiveDate;
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatientListFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
    pub template_id: Option<Uuid>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl PatientListFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".into(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("status".into(), status.clone()));
        }
        if let Some(is_active) = self.is_active {
            query.push(("isActive".into(), is_active.to_string()));
        }
        if let Some(template_id) = self.template_id {
            query.push(("template".into(), template_id.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort".into(), sort.clone()));
        }
        if let Some(search) = &self.search {
            query.push(("search".into(), search.clone()));
        }
        query
    }
}

/// Filter for per-patient sub-resources (visits, events, notes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubListFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub include_deleted: bool,
}

impl SubListFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".into(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        if self.include_deleted {
            query.push(("includeDeleted".into(), "true".into()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub limit: Option<u32>,
}

impl NotificationFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if self.unread_only {
            query.push(("unreadOnly".into(), "true".into()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(patient_id) = self.patient_id {
            query.push(("patient".into(), patient_id.to_string()));
        }
        if let Some(from) = self.from {
            query.push(("from".into(), from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to".into(), to.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".into(), status.as_str().into()));
        }
        query
    }
}
