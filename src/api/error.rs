//! Client-side error taxonomy.
//!
//! Four classes, mirroring how the UI reacts: transport failures (the
//! request never completed), application errors carried in the
//! response envelope, client-side validation failures raised before
//! any request, and missing-reference errors. All are recoverable —
//! the caller converts them into a [`super::outcome::MutationOutcome`]
//! for toast display.

use crate::forms::ValidationError;
use crate::status::StatusError;

use super::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connect, timeout, I/O).
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The backend answered with `success: false`; carries its
    /// `message` (or a default) even when the HTTP status was 200.
    #[error("{0}")]
    Application(String),
    /// Non-2xx response without a usable envelope.
    #[error("HTTP {0}")]
    Http(u16),
    #[error("Malformed response: {0}")]
    Decode(String),
    /// The request's [`super::scope::CancelScope`] fired first.
    #[error("Request cancelled")]
    Cancelled,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error("This tag already exists")]
    DuplicateTag,
    #[error("At least one patient id is required")]
    EmptyBatch,
    /// Binary endpoint answered with a non-200 status.
    #[error("Export failed with HTTP status {0}")]
    ExportFailed(u16),
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

impl ApiError {
    /// Validation and reference errors are raised before any request
    /// is issued; everything else implies the wire was touched.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Status(_) | Self::DuplicateTag | Self::EmptyBatch
        )
    }
}
