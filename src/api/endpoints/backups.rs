//! Backup endpoints. Archives live on the backend; the client lists,
//! triggers, restores and builds download URLs.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::cache::{EntityChange, EntityKind, QueryKey};
use crate::models::BackupInfo;

impl<T: Transport> PraxisClient<T> {
    pub async fn list_backups(&self, scope: &CancelScope) -> Result<Vec<BackupInfo>, ApiError> {
        self.fetch_cached(QueryKey::BackupList, ApiRequest::get("/backups"), scope)
            .await
    }

    pub async fn create_backup(&self, scope: &CancelScope) -> Result<BackupInfo, ApiError> {
        let backup: BackupInfo = self
            .send(ApiRequest::post("/backups", serde_json::json!({})), scope)
            .await?;
        self.invalidate(EntityChange::new(EntityKind::Backup, None));
        tracing::info!(backup = %backup.id, "backup created");
        Ok(backup)
    }

    pub async fn restore_backup(&self, id: Uuid, scope: &CancelScope) -> Result<(), ApiError> {
        self.send_unit(
            ApiRequest::post(format!("/backups/{id}/restore"), serde_json::json!({})),
            scope,
        )
        .await?;
        // A restore can have rewritten anything; start from scratch.
        self.clear_cache();
        Ok(())
    }

    /// Download URL for a backup archive.
    ///
    /// Downloads open a separate browser navigation context, which
    /// cannot carry an Authorization header — so this URL carries the
    /// bearer token as a query parameter instead. Deliberate deviation
    /// from the header convention used everywhere else.
    pub fn backup_download_url(&self, id: Uuid) -> String {
        let base = self.config().base_url.trim_end_matches('/');
        match self.credentials().bearer_token() {
            Some(token) => format!("{base}/api/backups/{id}/download?token={token}"),
            None => format!("{base}/api/backups/{id}/download"),
        }
    }
}
