//! Screen composers.
//!
//! One method per dashboard screen. Each issues the fetches that screen
//! needs (concurrently where they are independent), normalizes the results
//! and returns a typed record. Independent parts of a screen are wrapped in
//! [`Section`] so one failed request degrades to an inline message without
//! hiding its siblings.

pub mod fixture;
pub mod league;
pub mod player;

use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

use crate::agents::narrative::NarrativeAgent;
use crate::fetch::{FetchError, SportsClient};

/// Errors that stop a whole screen, as opposed to one section of it.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ScreenError {
    pub fn user_message(&self) -> String {
        match self {
            ScreenError::NotFound(what) => format!("{} not found.", what),
            ScreenError::Fetch(e) => e.user_message(),
        }
    }
}

/// One independently loaded part of a screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Error { message: String },
}

impl<T> Section<T> {
    pub fn ready(data: T) -> Self {
        Section::Ready { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Section::Error {
            message: message.into(),
        }
    }

    /// Wrap a fetch result, logging the failure under `name`.
    pub fn from_result(name: &str, result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => Section::ready(data),
            Err(e) => {
                warn!("Section {} degraded: {}", name, e);
                Section::error(e.user_message())
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Section::Ready { .. } => None,
            Section::Error { message } => Some(message),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Section::Ready { data } => Section::Ready { data: f(data) },
            Section::Error { message } => Section::Error { message },
        }
    }

    pub fn as_ref(&self) -> Section<&T> {
        match self {
            Section::Ready { data } => Section::Ready { data },
            Section::Error { message } => Section::Error {
                message: message.clone(),
            },
        }
    }
}

/// Serialize a section through a borrowed view of its data.
pub(crate) fn serialize_section_with<'a, T, V, S>(
    section: &'a Section<T>,
    view: impl FnOnce(&'a T) -> V,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    section.as_ref().map(view).serialize(serializer)
}

/// Shared entry point for every screen.
#[derive(Debug, Clone)]
pub struct Screens {
    client: SportsClient,
    narrative: Arc<NarrativeAgent>,
    default_season: i32,
}

impl Screens {
    pub fn new(client: SportsClient, narrative: Arc<NarrativeAgent>, default_season: i32) -> Self {
        Self {
            client,
            narrative,
            default_season,
        }
    }

    pub fn client(&self) -> &SportsClient {
        &self.client
    }

    pub fn narrative(&self) -> &NarrativeAgent {
        &self.narrative
    }

    pub fn default_season(&self) -> i32 {
        self.default_season
    }

    fn season(&self, season: Option<i32>) -> i32 {
        season.unwrap_or(self.default_season)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_serializes_with_status_tag() {
        let ready: Section<Vec<u32>> = Section::ready(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            json!({"status": "ready", "data": [1, 2]})
        );

        let failed: Section<Vec<u32>> = Section::error("Boom");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"status": "error", "message": "Boom"})
        );
    }

    #[test]
    fn test_section_from_result_uses_user_message() {
        let section: Section<u32> = Section::from_result(
            "standings",
            Err(FetchError::RemoteRequestFailed {
                status: 429,
                message: "Too many requests".into(),
            }),
        );
        assert!(!section.is_ready());
        assert_eq!(section.message(), Some("Too many requests"));
        assert_eq!(section.map(|v| v + 1).data(), None);
    }

    #[test]
    fn test_screen_error_messages() {
        assert_eq!(
            ScreenError::NotFound("Fixture 7".into()).user_message(),
            "Fixture 7 not found."
        );
        let e: ScreenError = FetchError::MissingCredential("FOOTBALL_API_KEY".into()).into();
        assert!(e.user_message().contains("FOOTBALL_API_KEY"));
    }
}
