//! AI narrative analysis.
//!
//! A chat-completion backend behind the [`backend::AiBackend`] trait and
//! the [`narrative::NarrativeAgent`] that turns trimmed fixture or player
//! data into free-text analysis.

pub mod backend;
pub mod narrative;

use thiserror::Error;

/// Errors that can occur while producing a narrative.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("AI backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("AI request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Missing credential: set {0}")]
    MissingCredential(String),

    #[error("AI response unparseable: {0}")]
    ResponseParseError(String),

    #[error("AI response contained no choices")]
    EmptyResponse,

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Text shown in place of the analysis.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::MissingCredential(var) => format!(
                "AI analysis is not configured. Set {} to enable it.",
                var
            ),
            AgentError::RequestFailed { message, .. } => message.clone(),
            AgentError::Timeout(_) => {
                "The AI service did not respond in time. Please try again later.".to_string()
            }
            AgentError::BackendUnavailable(_) => {
                "The AI service is unavailable. Please try again later.".to_string()
            }
            AgentError::ResponseParseError(_) | AgentError::EmptyResponse | AgentError::Json(_) => {
                "Failed to generate analysis".to_string()
            }
        }
    }
}
