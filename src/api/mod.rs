//! REST client for the practice-management backend.
//!
//! All endpoints live on [`client::PraxisClient`], split into one
//! module per feature area under [`endpoints`]. Reads go through the
//! query cache; mutations feed the declarative invalidation engine and
//! write returned entities straight into the cache.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod outcome;
pub mod scope;
pub mod transport;

pub use auth::{Anonymous, CredentialsProvider, SessionCredentials, StaticToken};
pub use client::PraxisClient;
pub use error::ApiError;
pub use outcome::MutationOutcome;
pub use scope::{CancelHandle, CancelScope};
pub use transport::{HttpTransport, MockTransport, Transport};
