//! Binary export endpoints. Validated by HTTP status and content type
//! rather than the JSON envelope.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::envelope;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::models::PatientListFilter;

impl<T: Transport> PraxisClient<T> {
    /// Render one record as PDF.
    pub async fn export_patient_pdf(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Vec<u8>, ApiError> {
        let raw = self
            .execute(ApiRequest::get(format!("/patients/{id}/export/pdf")), scope)
            .await?;
        envelope::decode_binary(&raw, "application/pdf")
    }

    /// Export the (filtered) patient list as CSV.
    pub async fn export_patients_csv(
        &self,
        filter: &PatientListFilter,
        scope: &CancelScope,
    ) -> Result<Vec<u8>, ApiError> {
        let raw = self
            .execute(
                ApiRequest::get("/patients/export/csv").with_query(filter.to_query()),
                scope,
            )
            .await?;
        envelope::decode_binary(&raw, "text/csv")
    }

    /// Full clinical report for one record.
    pub async fn patient_report(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Vec<u8>, ApiError> {
        let raw = self
            .execute(ApiRequest::get(format!("/patients/{id}/report")), scope)
            .await?;
        envelope::decode_binary(&raw, "application/pdf")
    }
}
