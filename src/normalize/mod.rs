//! Response normalization.
//!
//! Pure functions turning the provider's nested JSON into the flat view
//! records in [`crate::models`]. One submodule per resource family.
//!
//! Every provider body is an envelope `{ "response": ... }`. A body without
//! that field is a [`NormalizeError::MalformedPayload`]; inside the
//! envelope, missing or null nested fields fall back to documented
//! defaults (0, "N/A", empty list) instead of failing. An individual item
//! that cannot be read at all is skipped with a warning.

pub mod fixtures;
pub mod leagues;
pub mod players;
pub mod predictions;
mod raw;
pub mod standings;
pub mod transfers;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::Team;

/// Errors that can occur during normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default display text for absent string fields.
pub const NOT_AVAILABLE: &str = "N/A";

fn envelope(body: &Value) -> Result<&Value, NormalizeError> {
    body.get("response").ok_or_else(|| {
        NormalizeError::MalformedPayload("expected an object with a `response` field".to_string())
    })
}

/// Items of an array envelope. `null` counts as empty; unreadable items
/// are skipped.
pub fn response_items<T: DeserializeOwned>(body: &Value) -> Result<Vec<T>, NormalizeError> {
    match envelope(body)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match T::deserialize(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping unreadable response item {}: {}", idx, e);
                    None
                }
            })
            .collect()),
        other => Err(NormalizeError::MalformedPayload(format!(
            "expected `response` to be an array, got {}",
            kind_of(other)
        ))),
    }
}

/// Single object envelope (`/teams/statistics`). An empty array or null
/// response means "no data".
pub fn response_object<T: DeserializeOwned>(body: &Value) -> Result<Option<T>, NormalizeError> {
    match envelope(body)? {
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(items) => Ok(Some(T::deserialize(&items[0])?)),
        obj @ Value::Object(_) => Ok(Some(T::deserialize(obj)?)),
        other => Err(NormalizeError::MalformedPayload(format!(
            "expected `response` to be an object, got {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn team_from_raw(raw: Option<&raw::RawTeam>) -> Team {
    match raw {
        Some(t) => Team {
            id: t.id.unwrap_or_default(),
            name: t.name.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            logo_url: t.logo.clone(),
            code: t.code.clone(),
            country: t.country.clone(),
            founded: t.founded,
            venue_name: None,
        },
        None => Team::new(Default::default(), NOT_AVAILABLE),
    }
}
