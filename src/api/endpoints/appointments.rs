//! Appointment endpoints.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        scope: &CancelScope,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.fetch_cached(
            QueryKey::AppointmentList(filter.clone()),
            ApiRequest::get("/appointments").with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn get_appointment(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Appointment, ApiError> {
        self.fetch_cached(
            QueryKey::Appointment(id),
            ApiRequest::get(format!("/appointments/{id}")),
            scope,
        )
        .await
    }

    pub async fn create_appointment(
        &self,
        new: &NewAppointment,
        scope: &CancelScope,
    ) -> Result<Appointment, ApiError> {
        let appointment: Appointment = self
            .send(
                ApiRequest::post(
                    "/appointments",
                    serde_json::to_value(new).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Appointment, Some(appointment.id)));
        self.cache_put(QueryKey::Appointment(appointment.id), &appointment);
        Ok(appointment)
    }

    pub async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        scope: &CancelScope,
    ) -> Result<Appointment, ApiError> {
        let appointment: Appointment = self
            .send(
                ApiRequest::put(
                    format!("/appointments/{id}/status"),
                    serde_json::json!({ "status": status }),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Appointment, Some(id)));
        self.cache_put(QueryKey::Appointment(id), &appointment);
        Ok(appointment)
    }

    pub async fn cancel_appointment(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<Appointment, ApiError> {
        self.update_appointment_status(id, AppointmentStatus::Cancelled, scope)
            .await
    }
}
