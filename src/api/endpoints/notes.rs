//! Per-patient note endpoints.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{NewNote, Note, Page, SubListFilter};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_notes(
        &self,
        patient_id: Uuid,
        filter: &SubListFilter,
        scope: &CancelScope,
    ) -> Result<Page<Note>, ApiError> {
        self.fetch_cached(
            QueryKey::PatientNotes {
                patient_id,
                filter: filter.clone(),
            },
            ApiRequest::get(format!("/patients/{patient_id}/notes")).with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn create_note(
        &self,
        patient_id: Uuid,
        new: &NewNote,
        scope: &CancelScope,
    ) -> Result<Note, ApiError> {
        let note: Note = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/notes"),
                    serde_json::to_value(new).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Note, Some(patient_id)));
        Ok(note)
    }

    pub async fn update_note(
        &self,
        patient_id: Uuid,
        note_id: Uuid,
        content: &str,
        scope: &CancelScope,
    ) -> Result<Note, ApiError> {
        let note: Note = self
            .send(
                ApiRequest::put(
                    format!("/patients/{patient_id}/notes/{note_id}"),
                    serde_json::json!({ "content": content }),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Note, Some(patient_id)));
        Ok(note)
    }

    /// Soft delete; idempotent on the backend.
    pub async fn delete_note(
        &self,
        patient_id: Uuid,
        note_id: Uuid,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::delete(format!("/patients/{patient_id}/notes/{note_id}")),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::Note, Some(patient_id)));
        Ok(())
    }

    pub async fn restore_note(
        &self,
        patient_id: Uuid,
        note_id: Uuid,
        scope: &CancelScope,
    ) -> Result<Note, ApiError> {
        let note: Note = self
            .send(
                ApiRequest::post(
                    format!("/patients/{patient_id}/notes/{note_id}/restore"),
                    serde_json::json!({}),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Note, Some(patient_id)));
        Ok(note)
    }
}
