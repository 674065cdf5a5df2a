//! Per-patient timeline event endpoints.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{ClinicalEvent, NewEvent, Page, SubListFilter};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_events(
        &self,
        patient_id: Uuid,
        filter: &SubListFilter,
        scope: &CancelScope,
    ) -> Result<Page<ClinicalEvent>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientEvents {
                patient_id,
                filter: filter.clone(),
            },
            ApiRequest::get(format!("/patients/{patient_id}/events")).with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn create_event(
        &self,
        patient_id: Uuid,
        new: &NewEvent,
        scope: &CancelScope,
    ) -> Result<ClinicalEvent, ApiError> {
        let event: ClinicalEvent = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/events"),
                    serde_json::to_value(new).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Event, Some(patient_id)));
        Ok(event)
    }

    /// Soft delete; idempotent on the backend.
    pub async fn delete_event(
        &self,
        patient_id: Uuid,
        event_id: Uuid,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::delete(format!("/patients/{patient_id}/events/{event_id}")),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::Event, Some(patient_id)));
        Ok(())
    }

    pub async fn restore_event(
        &self,
        patient_id: Uuid,
        event_id: Uuid,
        scope: &CancelScope,
    ) -> Result<ClinicalEvent, ApiError> {
        let event: ClinicalEvent = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/events/{event_id}/restore"),
                    serde_json::json!({}),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Event, Some(patient_id)));
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Anonymous;
    use crate::api::transport::MockTransport;
    use std::sync::Arc;

    fn client() -> PraxisClient<MockTransport> {
        PraxisClient::new(MockTransport::new(), Arc::new(Anonymous))
    }

    #[tokio::test]
    async fn event_mutations_leave_visit_caches_alone() {
        let client = client();
        let patient_id = Uuid::new_v4();
        let visits_key = QueryKey::PatientVisits {
            patient_id,
            filter: SubListFilter::default(),
        };
        let events_key = QueryKey::PatientEvents {
            patient_id,
            filter: SubListFilter::default(),
        };
        client.cache_seed(visits_key.clone(), serde_json::json!([]));
        client.cache_seed(events_key.clone(), serde_json::json!([]));
        client.transport().push(Ok(crate::api::transport::RawResponse::json(
            200,
            serde_json::json!({"success": true}),
        )));

        client
            .delete_event(patient_id, Uuid::new_v4(), &CancelScope::detached())
            .await
            .unwrap();

        assert!(!client.cache_contains(&events_key));
        assert!(client.cache_contains(&visits_key));
    }
}
