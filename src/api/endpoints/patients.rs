//! Patient record endpoints: list/detail, section updates, form
//! submission, status transitions, tags and stats.

use serde_json::json;
use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::forms::{self, FormState};
use crate::models::template::StatusOption;
use crate::models::{
    NewPatient, Page, PatientListFilter, PatientRecord, PatientStats, SectionData, StatusEntry,
    StatusValue,
};
use crate::schema::ResolvedSchema;
use crate::status;

impl<T: Transport> PraxisClient<T> {
    pub async fn list_patients(
        &self,
        filter: &PatientListFilter,
        scope: &CancelScope,
    ) -> Result<Page<PatientRecord>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientList(filter.clone()),
            ApiRequest::get("/patients").with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn get_patient(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        self.fetch_cached(
            QueryKey::Patient(id),
            ApiRequest::get(format!("/patients/{id}")),
            scope,
        )
        .await
    }

    pub async fn create_patient(
        &self,
        new: &NewPatient,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        let created: PatientRecord = self
            .send(
                ApiRequest::post("/patients", serde_json::to_value(new).unwrap_or_default()),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient(created.id));
        self.cache_put(QueryKey::Patient(created.id), &created);
        tracing::info!(patient = %created.id, "patient record created");
        Ok(created)
    }

    /// Replace a record's section data. The update is template-scoped:
    /// callers go through [`Self::submit_patient_form`], which only
    /// writes fields the resolved schema names.
    pub async fn update_patient_sections(
        &self,
        id: Uuid,
        section_data: &SectionData,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        let updated: PatientRecord = self
            .send(
                ApiRequest::put(
                    format!("/patients/{id}"),
                    json!({ "sectionData": section_data }),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient(id));
        self.cache_put(QueryKey::Patient(id), &updated);
        Ok(updated)
    }

    /// Validate and persist an edited record form.
    ///
    /// The required-field gate runs first: an invalid form is rejected
    /// with the offending section's label before any request is
    /// issued.
    pub async fn submit_patient_form(
        &self,
        id: Uuid,
        schema: &ResolvedSchema,
        form: &FormState,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        forms::validate_required(form, schema)?;
        let document = forms::to_document(form, schema);
        self.update_patient_sections(id, &document, scope).await
    }

    /// Change a record's status.
    ///
    /// The target must exist in `options` (the resolved set: template
    /// options plus record-level overrides); the backend appends the
    /// history entry and stamps the acting user from the session.
    pub async fn update_patient_status(
        &self,
        id: Uuid,
        target: &str,
        options: &[StatusOption],
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        let option = status::find_option(options, target)
            .ok_or_else(|| crate::status::StatusError::OptionNotFound(target.into()))?;
        let value = StatusValue::from(option);

        let updated: PatientRecord = self
            .send(
                ApiRequest::put(format!("/patients/{id}/status"), json!({ "status": value })),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient_status(id));
        self.cache_put(QueryKey::Patient(id), &updated);
        tracing::info!(patient = %id, status = %value.name, "patient status updated");
        Ok(updated)
    }

    /// Apply one status payload to many records.
    ///
    /// Not atomic: the backend updates each record independently and
    /// reports only the aggregate outcome. Whenever a response was
    /// received — success or aggregate failure — list, stats and
    /// per-id caches are invalidated, so partially applied changes
    /// become visible on the next read.
    pub async fn batch_update_status(
        &self,
        ids: &[Uuid],
        target: &StatusValue,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        if ids.is_empty() {
            return Err(ApiError::EmptyBatch);
        }
        let result = self
            .send_unit(
                ApiRequest::post(
                    "/patients/batch-status",
                    json!({ "ids": ids, "status": target }),
                ),
                scope,
            )
            .await;

        match &result {
            Ok(()) | Err(ApiError::Application(_)) => {
                for id in ids {
                    self.invalidate(EntityChange::patient_status(*id));
                }
            }
            Err(_) => {}
        }
        result
    }

    /// Soft-delete or reactivate a record (`isActive` flag). Never a
    /// hard delete.
    pub async fn set_patient_active(
        &self,
        id: Uuid,
        active: bool,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        let updated: PatientRecord = self
            .send(
                ApiRequest::put(format!("/patients/{id}/active"), json!({ "isActive": active })),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient(id));
        self.cache_put(QueryKey::Patient(id), &updated);
        Ok(updated)
    }

    /// Add a tag. Duplicates are rejected client-side, without a
    /// request.
    pub async fn add_tag(
        &self,
        record: &PatientRecord,
        tag: &str,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        if record.has_tag(tag) {
            return Err(ApiError::DuplicateTag);
        }
        let updated: PatientRecord = self
            .send(
                ApiRequest::post(format!("/patients/{}/tags", record.id), json!({ "tag": tag })),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient(record.id));
        self.cache_put(QueryKey::Patient(record.id), &updated);
        Ok(updated)
    }

    pub async fn remove_tag(
        &self,
        record: &PatientRecord,
        tag: &str,
        scope: &CancelScope,
    ) -> Result<PatientRecord, ApiError> {
        let updated: PatientRecord = self
            .send(
                ApiRequest::delete(format!("/patients/{}/tags", record.id))
                    .with_query(vec![("tag".into(), tag.into())]),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::patient(record.id));
        self.cache_put(QueryKey::Patient(record.id), &updated);
        Ok(updated)
    }

    pub async fn get_status_history(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Vec<StatusEntry>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientStatusHistory(id),
            ApiRequest::get(format!("/patients/{id}/status-history")),
            scope,
        )
        .await
    }

    /// The record's resolved status option set (template plus
    /// record-level overrides), as the backend sees it.
    pub async fn get_status_options(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Vec<StatusOption>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientStatusOptions(id),
            ApiRequest::get(format!("/patients/{id}/status-options")),
            scope,
        )
        .await
    }

    /// Add a record-level status option.
    pub async fn add_status_option(
        &self,
        id: Uuid,
        option: &StatusOption,
        scope: &CancelScope,
    ) -> Result<Vec<StatusOption>, ApiError> {
        crate::models::validate_key(&option.name)
            .map_err(|e| ApiError::Application(e.to_string()))?;
        let options: Vec<StatusOption> = self
            .send(
                ApiRequest::post(
                    format!("/patients/{id}/status-options"),
                    serde_json::to_value(option).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::StatusOption, Some(id)));
        Ok(options)
    }

    pub async fn remove_status_option(
        &self,
        id: Uuid,
        name: &str,
        scope: &CancelScope,
    ) -> Result<Vec<StatusOption>, ApiError> {
        let options: Vec<StatusOption> = self
            .send(
                ApiRequest::delete(format!("/patients/{id}/status-options/{name}")),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::StatusOption, Some(id)));
        Ok(options)
    }

    pub async fn get_patient_stats(&self, scope: &CancelScope) -> Result<PatientStats, ApiError> {
        self.fetch_cached(
            QueryKey::PatientStats,
            ApiRequest::get("/patients/stats"),
            scope,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Anonymous;
    use crate::api::transport::MockTransport;
    use crate::forms::to_form_state;
    use crate::models::fixtures::{sample_record, sample_template};
    use crate::schema::ResolvedSchema;
    use std::sync::Arc;

    fn client() -> PraxisClient<MockTransport> {
        PraxisClient::new(MockTransport::new(), Arc::new(Anonymous))
    }

    fn record_json(record: &PatientRecord) -> serde_json::Value {
        serde_json::to_value(record).unwrap()
    }

    #[tokio::test]
    async fn status_update_refreshes_list_and_detail_caches() {
        let mock = MockTransport::new();
        let mut updated = sample_record();
        updated.status = Some(StatusValue {
            name: "discharged".into(),
            label: "Discharged".into(),
            color: "#9e9e9e".into(),
        });
        mock.push_data(record_json(&updated));
        let client = PraxisClient::new(mock, Arc::new(Anonymous));

        let record = sample_record();
        let list_key = QueryKey::PatientList(PatientListFilter::default());
        client.cache_seed(list_key.clone(), serde_json::json!([{"id": record.id}]));
        client.cache_seed(QueryKey::Patient(record.id), record_json(&record));
        client.cache_seed(QueryKey::PatientStats, serde_json::json!({"total": 1}));

        let options = sample_template().status_options;
        let result = client
            .update_patient_status(record.id, "discharged", &options, &CancelScope::detached())
            .await
            .unwrap();
        assert_eq!(result.status.as_ref().unwrap().name, "discharged");

        // Stale list and stats entries are gone; the detail entry now
        // holds the updated record without a refetch.
        assert!(!client.cache_contains(&list_key));
        assert!(!client.cache_contains(&QueryKey::PatientStats));
        assert!(client.cache_contains(&QueryKey::Patient(record.id)));
        let fetched = client
            .get_patient(record.id, &CancelScope::detached())
            .await
            .unwrap();
        assert_eq!(fetched.status.as_ref().unwrap().name, "discharged");
    }

    #[tokio::test]
    async fn unknown_status_option_fails_before_any_request() {
        let mock = MockTransport::new();
        let client = PraxisClient::new(mock, Arc::new(Anonymous));
        let record = sample_record();

        let err = client
            .update_patient_status(
                record.id,
                "archived",
                &sample_template().status_options,
                &CancelScope::detached(),
            )
            .await
            .unwrap_err();
        assert!(err.is_preflight());
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_tag_rejected_without_network_call() {
        let client = client();
        let record = sample_record();
        assert!(record.has_tag("urgent"));

        let err = client
            .add_tag(&record, "urgent", &CancelScope::detached())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateTag));
        assert_eq!(err.to_string(), "This tag already exists");
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn new_tag_goes_to_the_backend() {
        let client = client();
        let mut updated = sample_record();
        updated.tags.push("follow-up".into());
        client.transport().push_data(record_json(&updated));

        let record = sample_record();
        let result = client
            .add_tag(&record, "follow-up", &CancelScope::detached())
            .await
            .unwrap();
        assert!(result.has_tag("follow-up"));
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn required_field_gate_blocks_submission() {
        let client = client();
        let mut record = sample_record();
        record
            .section_data
            .get_mut("demographics")
            .unwrap()
            .insert("firstName".into(), serde_json::json!(""));
        let schema = ResolvedSchema::Authoritative(sample_template());
        let form = to_form_state(&record, &schema);

        let err = client
            .submit_patient_form(record.id, &schema, &form, &CancelScope::detached())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Demographics"));
        // No PUT was issued.
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn valid_form_submits_schema_scoped_document() {
        let client = client();
        let record = sample_record();
        client.transport().push_data(record_json(&record));
        let schema = ResolvedSchema::Authoritative(sample_template());
        let form = to_form_state(&record, &schema);

        client
            .submit_patient_form(record.id, &schema, &form, &CancelScope::detached())
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["sectionData"]["demographics"]["firstName"], "Ada");
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_client_side() {
        let client = client();
        let target = StatusValue {
            name: "active".into(),
            label: "Active".into(),
            color: "#4caf50".into(),
        };
        let err = client
            .batch_update_status(&[], &target, &CancelScope::detached())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::EmptyBatch));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn batch_failure_still_invalidates_affected_ids() {
        let client = client();
        client.transport().push_failure("2 of 2 updates failed");
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        client.cache_seed(QueryKey::Patient(p1), serde_json::json!({"id": p1}));
        client.cache_seed(QueryKey::Patient(p2), serde_json::json!({"id": p2}));
        client.cache_seed(QueryKey::PatientStats, serde_json::json!({}));

        let target = StatusValue {
            name: "discharged".into(),
            label: "Discharged".into(),
            color: "#9e9e9e".into(),
        };
        let err = client
            .batch_update_status(&[p1, p2], &target, &CancelScope::detached())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Application(_)));

        // Aggregate failure: per-id results are unknown, so every
        // affected entry is dropped and refetched on next read.
        assert!(!client.cache_contains(&QueryKey::Patient(p1)));
        assert!(!client.cache_contains(&QueryKey::Patient(p2)));
        assert!(!client.cache_contains(&QueryKey::PatientStats));
    }

    #[tokio::test]
    async fn batch_transport_error_leaves_cache_alone() {
        let client = client();
        client.transport().push(Err(
            crate::api::transport::TransportError::Connect("http://localhost:5000".into()),
        ));
        let p1 = Uuid::new_v4();
        client.cache_seed(QueryKey::Patient(p1), serde_json::json!({"id": p1}));

        let target = StatusValue {
            name: "active".into(),
            label: "Active".into(),
            color: "#4caf50".into(),
        };
        let err = client
            .batch_update_status(&[p1], &target, &CancelScope::detached())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(client.cache_contains(&QueryKey::Patient(p1)));
    }

    #[tokio::test]
    async fn list_patients_is_cached_per_filter() {
        let client = client();
        let page = serde_json::json!({
            "items": [], "total": 0, "page": 1, "limit": 20
        });
        client.transport().push_data(page.clone());
        client.transport().push_data(page);

        let filter_a = PatientListFilter::default();
        let filter_b = PatientListFilter {
            status: Some("active".into()),
            ..Default::default()
        };
        let scope = CancelScope::detached();
        let _ = client.list_patients(&filter_a, &scope).await.unwrap();
        let _ = client.list_patients(&filter_a, &scope).await.unwrap();
        // Same filter twice: one request. New filter: second request.
        assert_eq!(client.transport().request_count(), 1);
        let _ = client.list_patients(&filter_b, &scope).await.unwrap();
        assert_eq!(client.transport().request_count(), 2);
    }
}
