//! The client core: credential injection, cancellation racing,
//! cache-aware reads and the invalidation hookup shared by every
//! endpoint module.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{invalidate, EntityChange, Lookup, QueryCache, QueryKey};
use crate::config::ClientConfig;

use super::auth::CredentialsProvider;
use super::envelope;
use super::error::ApiError;
use super::scope::CancelScope;
use super::transport::{ApiRequest, RawResponse, Transport};

pub struct PraxisClient<T: Transport> {
    transport: T,
    credentials: Arc<dyn CredentialsProvider>,
    cache: Mutex<QueryCache>,
    config: ClientConfig,
}

impl<T: Transport> PraxisClient<T> {
    pub fn new(transport: T, credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self::with_config(transport, credentials, ClientConfig::default())
    }

    pub fn with_config(
        transport: T,
        credentials: Arc<dyn CredentialsProvider>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            cache: Mutex::new(QueryCache::new()),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialsProvider {
        self.credentials.as_ref()
    }

    /// Drop every cached read, e.g. on logout.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Execute a request with credentials attached, racing the scope.
    /// A cancelled request resolves without ever touching the cache.
    pub(crate) async fn execute(
        &self,
        mut request: ApiRequest,
        scope: &CancelScope,
    ) -> Result<RawResponse, ApiError> {
        request.bearer = self.credentials.bearer_token();
        let path = request.path.clone();
        tokio::select! {
            biased;
            _ = scope.cancelled() => {
                tracing::debug!(path = %path, "request cancelled by scope");
                Err(ApiError::Cancelled)
            }
            result = self.transport.execute(request) => Ok(result?),
        }
    }

    /// Envelope-decoded request without cache involvement.
    pub(crate) async fn send<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        scope: &CancelScope,
    ) -> Result<R, ApiError> {
        let raw = self.execute(request, scope).await?;
        envelope::decode(&raw)
    }

    /// Envelope-decoded request where no data is expected.
    pub(crate) async fn send_unit(
        &self,
        request: ApiRequest,
        scope: &CancelScope,
    ) -> Result<(), ApiError> {
        let raw = self.execute(request, scope).await?;
        envelope::decode_unit(&raw)
    }

    /// Cache-aware read: serve a fresh entry without a request,
    /// otherwise fetch, store, and return.
    pub(crate) async fn fetch_cached<R: DeserializeOwned>(
        &self,
        key: QueryKey,
        request: ApiRequest,
        scope: &CancelScope,
    ) -> Result<R, ApiError> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Lookup::Fresh(value) = cache.get(&key) {
                return serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()));
            }
        }

        let raw = self.execute(request, scope).await?;
        let value: Value = envelope::decode(&raw)?;
        let typed: R =
            serde_json::from_value(value.clone()).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, value);
        }
        Ok(typed)
    }

    /// Direct cache write for a mutation that returned the updated
    /// entity.
    pub(crate) fn cache_put(&self, key: QueryKey, entity: &impl Serialize) {
        if let (Ok(mut cache), Ok(value)) = (self.cache.lock(), serde_json::to_value(entity)) {
            cache.insert(key, value);
        }
    }

    /// Run a change through the declarative invalidation engine.
    pub(crate) fn invalidate(&self, change: EntityChange) {
        if let Ok(mut cache) = self.cache.lock() {
            invalidate(&mut cache, &change);
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub(crate) fn cache_contains(&self, key: &QueryKey) -> bool {
        self.cache.lock().map(|c| c.contains(key)).unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn cache_seed(&self, key: QueryKey, value: Value) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, value);
        }
    }
}
