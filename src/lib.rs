//! Praxis — a typed client for template-driven patient records.
//!
//! Layers, leaf to root: wire [`models`], the [`schema`] resolver with
//! its inference fallback, the [`forms`] mapping/validation layer, the
//! [`status`] state machine, the request-keyed [`cache`] with
//! declarative invalidation, and the [`api`] REST client that ties
//! them together.

pub mod api;
pub mod cache;
pub mod config;
pub mod forms;
pub mod models;
pub mod schema;
pub mod status;

use tracing_subscriber::EnvFilter;

pub use api::{
    ApiError, CancelHandle, CancelScope, HttpTransport, MutationOutcome, PraxisClient,
    SessionCredentials,
};
pub use config::ClientConfig;

/// Initialize tracing for binaries embedding the client. Safe to call
/// more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
