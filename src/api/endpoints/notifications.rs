//! Notification endpoints: per-user notifications and system-wide
//! broadcasts.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{NewSystemNotification, Notification, NotificationFilter, SystemNotification};

impl<T: Transport> PraxisClient<T> {
    pub async fn list_notifications(
        &self,
        filter: &NotificationFilter,
        scope: &CancelScope,
    ) -> Result<Vec<Notification>, ApiError> {
        self.fetch_cached(
            QueryKey::NotificationList(filter.clone()),
            ApiRequest::get("/notifications").with_query(filter.to_query()),
            scope,
        )
        .await
    }

    pub async fn mark_notification_read(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::put(format!("/notifications/{id}/read"), serde_json::json!({})),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::Notification, Some(id)));
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, scope: &CancelScope) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::put("/notifications/read-all", serde_json::json!({})),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::Notification, None));
        Ok(())
    }

    pub async fn list_system_notifications(
        &self,
        scope: &CancelScope,
    ) -> Result<Vec<SystemNotification>, ApiError> {
        self.fetch_cached(
            QueryKey::SystemNotificationList,
            ApiRequest::get("/system-notifications"),
            scope,
        )
        .await
    }

    /// Admin-only broadcast to every user.
    pub async fn publish_system_notification(
        &self,
        new: &NewSystemNotification,
        scope: &CancelScope,
    ) -> Result<SystemNotification, ApiError> {
        let published: SystemNotification = self
            .send(
                ApiRequest::post(
                    "/system-notifications",
                    serde_json::to_value(new).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::SystemNotification, None));
        Ok(published)
    }

    pub async fn dismiss_system_notification(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::delete(format!("/system-notifications/{id}")),
            scope,
        )
        .await?;
        self.invalidate(EntityChange::new(EntityKind::SystemNotification, None));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Anonymous;
    use crate::api::transport::{MockTransport, RawResponse};
    use std::sync::Arc;

    fn client() -> PraxisClient<MockTransport> {
        PraxisClient::new(MockTransport::new(), Arc::new(Anonymous))
    }

    #[tokio::test]
    async fn marking_read_evicts_every_notification_list() {
        let client = client();
        let all = QueryKey::NotificationList(NotificationFilter::default());
        let unread = QueryKey::NotificationList(NotificationFilter {
            unread_only: true,
            ..Default::default()
        });
        client.cache_seed(all.clone(), serde_json::json!([]));
        client.cache_seed(unread.clone(), serde_json::json!([]));
        client.transport().push(Ok(RawResponse::json(
            200,
            serde_json::json!({"success": true}),
        )));

        client
            .mark_notification_read(Uuid::new_v4(), &CancelScope::detached())
            .await
            .unwrap();
        assert!(!client.cache_contains(&all));
        assert!(!client.cache_contains(&unread));
    }

    #[tokio::test]
    async fn system_broadcasts_do_not_touch_user_notifications() {
        let client = client();
        let user_list = QueryKey::NotificationList(NotificationFilter::default());
        client.cache_seed(user_list.clone(), serde_json::json!([]));
        client.cache_seed(QueryKey::SystemNotificationList, serde_json::json!([]));
        client.transport().push_data(serde_json::json!({
            "id": Uuid::new_v4(),
            "message": "Maintenance tonight at 22:00",
            "kind": "system",
            "active": true,
            "createdAt": "2026-04-01T12:00:00Z",
        }));

        client
            .publish_system_notification(
                &NewSystemNotification {
                    message: "Maintenance tonight at 22:00".into(),
                    kind: crate::models::NotificationKind::System,
                },
                &CancelScope::detached(),
            )
            .await
            .unwrap();

        assert!(!client.cache_contains(&QueryKey::SystemNotificationList));
        assert!(client.cache_contains(&user_list));
    }
}
