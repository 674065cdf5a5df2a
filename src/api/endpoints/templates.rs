//! Patient template endpoints and the schema resolver entry point.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{PatientRecord, Template, TemplateDraft};
use crate::schema::{self, ResolvedSchema};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_templates(&self, scope: &CancelScope) -> Result<Vec<Template>, ApiError> {
        self.fetch_cached(
            QueryKey::TemplateList,
            ApiRequest::get("/patient-templates"),
            scope,
        )
        .await
    }

    pub async fn get_template(&self, id: Uuid, scope: &CancelScope) -> Result<Template, ApiError> {
        self.fetch_cached(
            QueryKey::Template(id),
            ApiRequest::get(format!("/patient-templates/{id}")),
            scope,
        )
        .await
    }

    /// Create a template. Storage keys are validated client-side
    /// before the draft leaves the machine.
    pub async fn create_template(
        &self,
        draft: &TemplateDraft,
        scope: &CancelScope,
    ) -> Result<Template, ApiError> {
        draft
            .validate()
            .map_err(|e| ApiError::Application(e.to_string()))?;
        let template: Template = self
            .send(
                ApiRequest::post(
                    "/patient-templates",
                    serde_json::to_value(draft).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Template, Some(template.id)));
        self.cache_put(QueryKey::Template(template.id), &template);
        Ok(template)
    }

    pub async fn update_template(
        &self,
        id: Uuid,
        draft: &TemplateDraft,
        scope: &CancelScope,
    ) -> Result<Template, ApiError> {
        draft
            .validate()
            .map_err(|e| ApiError::Application(e.to_string()))?;
        let template: Template = self
            .send(
                ApiRequest::put(
                    format!("/patient-templates/{id}"),
                    serde_json::to_value(draft).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Template, Some(id)));
        self.cache_put(QueryKey::Template(id), &template);
        Ok(template)
    }

    pub async fn delete_template(&self, id: Uuid, scope: &CancelScope) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::delete(format!("/patient-templates/{id}")), scope)
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Template, Some(id)));
        Ok(())
    }

    /// Resolve the schema to render a record with.
    ///
    /// When the record's template is missing, deleted or access-denied
    /// — or no longer covers the stored data — the schema is inferred
    /// from the record itself so it stays viewable and editable.
    /// Transport failures and cancellation still propagate: degraded
    /// mode is for unusable templates, not an unreachable backend.
    pub async fn resolve_schema(
        &self,
        record: &PatientRecord,
        scope: &CancelScope,
    ) -> Result<ResolvedSchema, ApiError> {
        let Some(template_id) = record.template_id else {
            return Ok(schema::resolve_for_record(None, record));
        };
        match self.get_template(template_id, scope).await {
            Ok(template) => Ok(schema::resolve_for_record(Some(template), record)),
            Err(ApiError::Application(message)) => {
                tracing::warn!(
                    record = %record.id,
                    template = %template_id,
                    message,
                    "template unusable, inferring schema from record data"
                );
                Ok(schema::resolve_for_record(None, record))
            }
            Err(ApiError::Http(status)) if status == 403 || status == 404 => {
                Ok(schema::resolve_for_record(None, record))
            }
            Err(other) => Err(other),
        }
    }
}
