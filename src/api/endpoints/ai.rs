//! AI summary endpoint. Generation runs on the backend; responses are
//! not cached — each request produces a fresh summary.

use uuid::Uuid;

use crate::api::client::PraxisClient;
use crate::api::error::ApiError;
use crate::api::scope::CancelScope;
use crate::api::transport::{ApiRequest, Transport};
use crate::models::AiSummary;

impl<T: Transport> PraxisClient<T> {
    pub async fn summarize_patient(
        &self,
        id: Uuid,
        scope: &CancelScope,
    ) -> Result<AiSummary, ApiError> {
        self.send(
            ApiRequest::post("/ai/summarize", serde_json::json!({ "patientId": id })),
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
    use std::sync::Arc;

    #[tokio::test]
    async fn summaries_are_never_cached() {
        let client = PraxisClient::new(MockTransport::new(), Arc::new(Anonymous));
        let summary = serde_json::json!({
            "summary": "Stable.",
            "model": "gpt-sim",
            "generatedAt": "2026-04-01T12:00:00Z",
        });
        client.transport().push_data(summary.clone());
        client.transport().push_data(summary);

        let id = Uuid::new_v4();
        let scope = CancelScope::detached();
        client.summarize_patient(id, &scope).await.unwrap();
        client.summarize_patient(id, &scope).await.unwrap();
        // Two calls, two requests.
        assert_eq!(client.transport().request_count(), 2);
        assert_eq!(client.cached_len(), 0);
    }
}
