//! Per-patient visit endpoints. Deletes are soft and restorable.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{NewVisit, Page, SubListFilter, Visit, VisitPatch};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_visits(
        &self,
        patient_id: Uuid,
        filter: &SubListFilter,
        scope: &CancelScope,
    ) -> Result<Page<Visit>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientVisits {
                patient_id,
                filter: filter.clone(),
            },
            ApiRequest::get(format!("/patients/{patient_id}/visits")).with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn create_visit(
        &self,
        patient_id: Uuid,
        new: &NewVisit,
        scope: &CancelScope,
    ) -> Result<Visit, ApiError> {
        let visit: Visit = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/visits"),
                    serde_json::to_value(new).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Visit, Some(patient_id)));
        Ok(visit)
    }

    pub async fn update_visit(
        &self,
        patient_id: Uuid,
        visit_id: Uuid,
        patch: &VisitPatch,
        scope: &CancelScope,
    ) -> Result<Visit, ApiError> {
        let visit: Visit = self
            .send(
                ApiRequest::put(
                    format!("/patients/{patient_id}/visits/{visit_id}"),
                    serde_json::to_value(patch).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Visit, Some(patient_id)));
        Ok(visit)
    }

    /// Soft delete: flags the visit `isDeleted`; deleting an
    /// already-deleted visit is a backend no-op.
    pub async fn delete_visit(
        &self,
        patient_id: Uuid,
        visit_id: Uuid,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::delete(format!("/patients/{patient_id}/visits/{visit_id}")),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::Visit, Some(patient_id)));
        Ok(())
    }

    pub async fn restore_visit(
        &self,
        patient_id: Uuid,
        visit_id: Uuid,
        scope: &CancelScope,
    ) -> Result<Visit, ApiError> {
        let visit: Visit = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/visits/{visit_id}/restore"),
                    serde_json::json!({}),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Visit, Some(patient_id)));
        Ok(visit)
    }
}
