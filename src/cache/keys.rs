//! Composite cache keys.
//!
//! The key space mirrors the read surface: list pages keyed by their
//! full filter, single entities by id, per-patient sub-resources by
//! parent id plus their own filter. [`QueryFamily`] groups keys for the
//! invalidation engine; [`QueryKey::scope_id`] exposes the id a key is
//! scoped to, when it has one.

use uuid::Uuid;

use crate::models::{AppointmentFilter, NotificationFilter, PatientListFilter, SubListFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    PatientList,
    Patient,
    PatientVisits,
    PatientEvents,
    PatientNotes,
    PatientStatusHistory,
    PatientStatusOptions,
    PatientStats,
    TemplateList,
    Template,
    UserList,
    User,
    NotificationList,
    SystemNotificationList,
    AppointmentList,
    Appointment,
    BackupList,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    PatientList(PatientListFilter),
    Patient(Uuid),
    PatientVisits {
        patient_id: Uuid,
        filter: SubListFilter,
    },
    PatientEvents {
        patient_id: Uuid,
        filter: SubListFilter,
    },
    PatientNotes {
        patient_id: Uuid,
        filter: SubListFilter,
    },
    PatientStatusHistory(Uuid),
    PatientStatusOptions(Uuid),
    PatientStats,
    TemplateList,
    Template(Uuid),
    UserList,
    User(Uuid),
    NotificationList(NotificationFilter),
    SystemNotificationList,
    AppointmentList(AppointmentFilter),
    Appointment(Uuid),
    BackupList,
}

impl QueryKey {
    pub fn family(&self) -> QueryFamily {
        match self {
            Self::PatientList(_) => QueryFamily::PatientList,
            Self::Patient(_) => QueryFamily::Patient,
            Self::PatientVisits { .. } => QueryFamily::PatientVisits,
            Self::PatientEvents { .. } => QueryFamily::PatientEvents,
            Self::PatientNotes { .. } => QueryFamily::PatientNotes,
            Self::PatientStatusHistory(_) => QueryFamily::PatientStatusHistory,
            Self::PatientStatusOptions(_) => QueryFamily::PatientStatusOptions,
            Self::PatientStats => QueryFamily::PatientStats,
            Self::TemplateList => QueryFamily::TemplateList,
            Self::Template(_) => QueryFamily::Template,
            Self::UserList => QueryFamily::UserList,
            Self::User(_) => QueryFamily::User,
            Self::NotificationList(_) => QueryFamily::NotificationList,
            Self::SystemNotificationList => QueryFamily::SystemNotificationList,
            Self::AppointmentList(_) => QueryFamily::AppointmentList,
            Self::Appointment(_) => QueryFamily::Appointment,
            Self::BackupList => QueryFamily::BackupList,
        }
    }

    /// The id this key is scoped to: the patient for patient-rooted
    /// keys, the entity itself for other single-entity keys. List and
    /// aggregate keys have no scope.
    pub fn scope_id(&self) -> Option<Uuid> {
        match self {
            Self::Patient(id)
            | Self::PatientStatusHistory(id)
            | Self::PatientStatusOptions(id)
            | Self::Template(id)
            | Self::User(id)
            | Self::Appointment(id) => Some(*id),
            Self::PatientVisits { patient_id, .. }
            | Self::PatientEvents { patient_id, .. }
            | Self::PatientNotes { patient_id, .. } => Some(*patient_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn different_filters_hash_to_different_keys() {
        use std::collections::HashSet;
        let mut keys = HashSet::new();
        keys.insert(QueryKey::PatientList(PatientListFilter::default()));
        keys.insert(QueryKey::PatientList(PatientListFilter {
            page: Some(2),
            ..Default::default()
        }));
        keys.insert(QueryKey::PatientList(PatientListFilter {
            status: Some("active".into()),
            ..Default::default()
        }));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn sub_resource_keys_scope_to_their_patient() {
        let patient_id = Uuid::new_v4();
        let key = QueryKey::PatientVisits {
            patient_id,
            filter: SubListFilter::default(),
        };
        assert_eq!(key.scope_id(), Some(patient_id));
        assert_eq!(key.family(), QueryFamily::PatientVisits);
    }

    #[test]
    fn list_keys_have_no_scope() {
        assert_eq!(QueryKey::PatientStats.scope_id(), None);
        assert_eq!(
            QueryKey::PatientList(PatientListFilter::default()).scope_id(),
            None
        );
        assert_eq!(QueryKey::BackupList.scope_id(), None);
    }
}
