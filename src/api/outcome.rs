//! Uniform mutation result for the UI layer.
//!
//! Mutations are wrapped locally and converted into one shape the toast
//! layer understands. Errors are surfaced, never swallowed, and never
//! retried automatically.

use serde::Serialize;

use super::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> MutationOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, ApiError>> for MutationOutcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err.to_string()),
        }
    }
}
