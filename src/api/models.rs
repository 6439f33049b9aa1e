use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    /// Normalized key that produced the answer; `null` for the fallback.
    pub matched: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuRequest {
    /// Absent on the first turn of a conversation.
    #[serde(default)]
    pub selection: Option<String>,
    /// `path` from the previous reply.
    #[serde(default)]
    pub path: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
