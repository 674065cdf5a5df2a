use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An AI-generated record summary. Generation happens on the backend;
/// the client only requests and renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub summary: String,
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}
