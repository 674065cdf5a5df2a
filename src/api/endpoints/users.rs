//! User administration and login/logout.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::{LoginRequest, LoginResponse, NewUser, User, UserPatch};

impl<T: Transport> PraxisClient<T> {
    /// Authenticate. On success the caller stores the returned token in
    /// its [`crate::api::auth::SessionCredentials`]; the client itself
    /// holds no token state.
    pub async fn login(
        &self,
        request: &LoginRequest,
        scope: &CancelScope,
    ) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .send(
                ApiRequest::post(
                    "/users/login",
                    serde_json::to_value(request).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        tracing::info!(user = %response.user.username, "login succeeded");
        Ok(response)
    }

    /// Invalidate the server-side session. The caller clears its
    /// credentials and, typically, the whole cache.
    pub async fn logout(&self, scope: &CancelScope) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::post("/users/logout", serde_json::json!({})), scope)
            .await?;
        self.clear_cache();
        Ok(())
    }

    pub async fn list_users(&self, scope: &CancelScope) -> Result<Vec<User>, ApiError> {
        self.fetch_cached(QueryKey::UserList, ApiRequest::get("/users"), scope)
            .await
    }

    pub async fn get_user(&self, id: Uuid, scope: &CancelScope) -> Result<User, ApiError> {
        self.fetch_cached(
            QueryKey::User(id),
            ApiRequest::get(format!("/users/{id}")),
            scope,
        )
        .await
    }

    pub async fn create_user(
        &self,
        new: &NewUser,
        scope: &CancelScope,
    ) -> Result<User, ApiError> {
        let user: User = self
            .send(
                ApiRequest::post("/users", serde_json::to_value(new).unwrap_or_default()),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::User, Some(user.id)));
        self.cache_put(QueryKey::User(user.id), &user);
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        patch: &UserPatch,
        scope: &CancelScope,
    ) -> Result<User, ApiError> {
        let user: User = self
            .send(
                ApiRequest::put(
                    format!("/users/{id}"),
                    serde_json::to_value(patch).unwrap_or_default(),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::User, Some(id)));
        self.cache_put(QueryKey::User(id), &user);
        Ok(user)
    }

    /// Deactivation is the user-level soft delete.
    pub async fn set_user_active(
        &self,
        id: Uuid,
        active: bool,
        scope: &CancelScope,
    ) -> Result<User, ApiError> {
        let user: User = self
            .send(
                ApiRequest::put(
                    format!("/users/{id}/active"),
                    serde_json::json!({ "isActive": active }),
                ),
                scope,
            )
            .await?;
        self.invalidate(EntityChange::new(EntityKind::User, Some(id)));
        self.cache_put(QueryKey::User(id), &user);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{Anonymous, SessionCredentials};
    use crate::api::transport::MockTransport;
    use std::sync::Arc;

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": Uuid::new_v4(),
            "username": "admin",
            "email": "admin@clinic.example",
            "role": "admin",
            "isActive": true,
            "createdAt": "2026-01-01T00:00:00Z",
        })
    }

    #[tokio::test]
    async fn login_returns_token_for_the_session_store() {
        let client = PraxisClient::new(MockTransport::new(), Arc::new(Anonymous));
        client.transport().push_data(serde_json::json!({
            "token": "jwt-token",
            "user": user_json(),
        }));

        let response = client
            .login(
                &LoginRequest {
                    username: "admin".into(),
                    password: "hunter2".into(),
                },
                &CancelScope::detached(),
            )
            .await
            .unwrap();

        let creds = SessionCredentials::new();
        creds.set_token(&response.token);
        assert!(creds.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_the_cache() {
        let client = PraxisClient::new(MockTransport::new(), Arc::new(Anonymous));
        client.cache_seed(QueryKey::UserList, serde_json::json!([]));
        client.transport().push(Ok(crate::api::transport::RawResponse::json(
            200,
            serde_json::json!({"success": true}),
        )));

        client.logout(&CancelScope::detached()).await.unwrap();
        assert_eq!(client.cached_len(), 0);
    }

    #[tokio::test]
    async fn user_update_refreshes_user_caches() {
        let client = PraxisClient::new(MockTransport::new(), Arc::new(Anonymous));
        let user_value = user_json();
        let id: Uuid = serde_json::from_value(user_value["id"].clone()).unwrap();
        client.cache_seed(QueryKey::UserList, serde_json::json!([]));
        client.transport().push_data(user_value);

        client
            .update_user(id, &UserPatch::default(), &CancelScope::detached())
            .await
            .unwrap();
        assert!(!client.cache_contains(&QueryKey::UserList));
        assert!(client.cache_contains(&QueryKey::User(id)));
    }
}
