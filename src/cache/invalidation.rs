//! Declarative cache invalidation.
//!
//! Instead of every mutation hand-listing the cache keys it affects,
//! each entity kind declares once which query families its changes can
//! touch, and a single engine walks the cache evicting matching keys.
//! Parent-scoped families only drop keys for the changed id, so one
//! patient's mutation does not flush another patient's detail view.

use uuid::Uuid;

use super::keys::QueryFamily;
use super::QueryCache;

/// What kind of entity a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Record-level data: section data, tags, activation flag.
    Patient,
    /// A status transition (also feeds history and stats).
    PatientStatus,
    Visit,
    Event,
    Note,
    /// Record-level status option set.
    StatusOption,
    Template,
    User,
    Notification,
    SystemNotification,
    Appointment,
    Backup,
}

/// A completed mutation, as the invalidation engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityChange {
    pub kind: EntityKind,
    /// The id the change is scoped to: the patient id for
    /// patient-rooted kinds, the entity id otherwise. `None` widens
    /// the eviction to the whole family.
    pub target: Option<Uuid>,
}

impl EntityChange {
    pub fn new(kind: EntityKind, target: Option<Uuid>) -> Self {
        Self { kind, target }
    }

    pub fn patient(id: Uuid) -> Self {
        Self::new(EntityKind::Patient, Some(id))
    }

    pub fn patient_status(id: Uuid) -> Self {
        Self::new(EntityKind::PatientStatus, Some(id))
    }
}

/// The dependency declaration: which query families a change to each
/// entity kind can affect.
pub fn affected_families(kind: EntityKind) -> &'static [QueryFamily] {
    use QueryFamily::*;
    match kind {
        EntityKind::Patient => &[PatientList, Patient, PatientStats],
        EntityKind::PatientStatus => &[PatientList, Patient, PatientStats, PatientStatusHistory],
        EntityKind::Visit => &[PatientVisits, Patient],
        EntityKind::Event => &[PatientEvents, Patient],
        EntityKind::Note => &[PatientNotes, Patient],
        EntityKind::StatusOption => &[PatientStatusOptions, Patient],
        EntityKind::Template => &[TemplateList, Template],
        EntityKind::User => &[UserList, User],
        EntityKind::Notification => &[NotificationList],
        EntityKind::SystemNotification => &[SystemNotificationList],
        EntityKind::Appointment => &[AppointmentList, Appointment],
        EntityKind::Backup => &[BackupList],
    }
}

/// Walk the cache and evict everything the change can have affected.
pub fn invalidate(cache: &mut QueryCache, change: &EntityChange) {
    let families = affected_families(change.kind);
    let dropped = cache.evict_where(|key| {
        if !families.contains(&key.family()) {
            return false;
        }
        match (key.scope_id(), change.target) {
            // Scoped key: only evict when the change targets it.
            (Some(scope), Some(target)) => scope == target,
            // Change without a target evicts the whole family.
            (Some(_), None) => true,
            // Unscoped keys (lists, stats) always go.
            (None, _) => true,
        }
    });
    tracing::debug!(kind = ?change.kind, target = ?change.target, dropped, "cache invalidation");
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::keys::QueryKey;
    use crate::models::{PatientListFilter, SubListFilter};
    use serde_json::json;

    fn seeded_cache(patient: Uuid, other: Uuid) -> QueryCache {
        let mut cache = QueryCache::new();
        cache.insert(QueryKey::PatientList(PatientListFilter::default()), json!([]));
        cache.insert(
            QueryKey::PatientList(PatientListFilter {
                page: Some(2),
                ..Default::default()
            }),
            json!([]),
        );
        cache.insert(QueryKey::Patient(patient), json!({"id": "a"}));
        cache.insert(QueryKey::Patient(other), json!({"id": "b"}));
        cache.insert(QueryKey::PatientStats, json!({"total": 2}));
        cache.insert(QueryKey::PatientStatusHistory(patient), json!([]));
        cache.insert(
            QueryKey::PatientVisits {
                patient_id: patient,
                filter: SubListFilter::default(),
            },
            json!([]),
        );
        cache.insert(QueryKey::BackupList, json!([]));
        cache
    }

    #[test]
    fn status_change_evicts_lists_stats_history_and_the_patient() {
        let patient = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut cache = seeded_cache(patient, other);

        invalidate(&mut cache, &EntityChange::patient_status(patient));

        // Every list page and the stats entry are gone.
        assert!(!cache.contains(&QueryKey::PatientList(PatientListFilter::default())));
        assert!(!cache.contains(&QueryKey::PatientStats));
        assert!(!cache.contains(&QueryKey::Patient(patient)));
        assert!(!cache.contains(&QueryKey::PatientStatusHistory(patient)));
        // Unrelated entries survive.
        assert!(cache.contains(&QueryKey::Patient(other)));
        assert!(cache.contains(&QueryKey::BackupList));
    }

    #[test]
    fn visit_change_is_scoped_to_its_patient() {
        let patient = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut cache = seeded_cache(patient, other);

        invalidate(
            &mut cache,
            &EntityChange::new(EntityKind::Visit, Some(patient)),
        );

        assert!(!cache.contains(&QueryKey::PatientVisits {
            patient_id: patient,
            filter: SubListFilter::default(),
        }));
        assert!(!cache.contains(&QueryKey::Patient(patient)));
        // A visit does not touch status history or stats.
        assert!(cache.contains(&QueryKey::PatientStatusHistory(patient)));
        assert!(cache.contains(&QueryKey::PatientStats));
        assert!(cache.contains(&QueryKey::Patient(other)));
    }

    #[test]
    fn targetless_change_widens_to_the_whole_family() {
        let patient = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut cache = seeded_cache(patient, other);

        invalidate(&mut cache, &EntityChange::new(EntityKind::Patient, None));

        assert!(!cache.contains(&QueryKey::Patient(patient)));
        assert!(!cache.contains(&QueryKey::Patient(other)));
        assert!(!cache.contains(&QueryKey::PatientStats));
    }

    #[test]
    fn backup_change_leaves_patient_caches_alone() {
        let patient = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut cache = seeded_cache(patient, other);
        let before = cache.len();

        invalidate(&mut cache, &EntityChange::new(EntityKind::Backup, None));

        assert!(!cache.contains(&QueryKey::BackupList));
        assert_eq!(cache.len(), before - 1);
    }

    #[test]
    fn every_kind_declares_at_least_one_family() {
        for kind in [
            EntityKind::Patient,
            EntityKind::PatientStatus,
            EntityKind::Visit,
            EntityKind::Event,
            EntityKind::Note,
            EntityKind::StatusOption,
            EntityKind::Template,
            EntityKind::User,
            EntityKind::Notification,
            EntityKind::SystemNotification,
            EntityKind::Appointment,
            EntityKind::Backup,
        ] {
            assert!(!affected_families(kind).is_empty(), "{kind:?}");
        }
    }
}
