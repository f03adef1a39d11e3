//! REST API endpoints.
//!
//! Axum-based HTTP API exposing every screen as JSON, plus the favorite
//! leagues list.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::screens::player::TREND_SEASONS;
use crate::screens::ScreenError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The provider failed; the message is already user-facing.
    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScreenError> for ApiError {
    fn from(e: ScreenError) -> Self {
        match e {
            ScreenError::NotFound(what) => ApiError::NotFound(what),
            ScreenError::Fetch(e) => {
                warn!("Upstream failure: {}", e);
                ApiError::Upstream(e.user_message())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => cors.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                warn!("Invalid CORS origin {:?}, allowing any", origin);
                cors.allow_origin(Any)
            }
        },
    }
}

/// Build the router with every route, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    use routes::{favorites, fixtures, leagues, meta, players};

    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(meta::health))
        .route("/api/selection", get(meta::selection))
        .route("/api/leagues", get(leagues::list_leagues))
        .route("/api/leagues/:league/dashboard", get(leagues::dashboard))
        .route("/api/leagues/:league/matches", get(leagues::matches))
        .route("/api/leagues/:league/standings", get(leagues::standings))
        .route("/api/leagues/:league/transfers", get(leagues::transfers))
        .route(
            "/api/leagues/:league/teams/:team/analytics",
            get(leagues::team_analytics),
        )
        .route("/api/countries/:country/standings", get(leagues::country_tables))
        .route("/api/fixtures/live", get(fixtures::live_fixtures))
        .route("/api/fixtures/:fixture", get(fixtures::details))
        .route("/api/fixtures/:fixture/live", get(fixtures::live_stats))
        .route("/api/fixtures/:fixture/preview", get(fixtures::preview))
        .route("/api/fixtures/:fixture/analysis", get(fixtures::analysis))
        .route("/api/h2h/:team_a/:team_b", get(fixtures::head_to_head))
        .route("/api/players/compare", get(players::compare))
        .route("/api/players/:player", get(players::details))
        .route("/api/players/:player/trends", get(players::trends))
        .route("/api/players/:player/analysis", get(players::analysis))
        .route("/api/favorites", get(favorites::list))
        .route("/api/favorites/toggle", post(favorites::toggle))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse a comma-separated list of seasons ("2022,2023").
pub(crate) fn parse_seasons(raw: &str) -> Result<Vec<i32>, ApiError> {
    let seasons = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("invalid season: {}", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if seasons.len() > TREND_SEASONS {
        return Err(ApiError::BadRequest(format!(
            "at most {} seasons per request, got {}",
            TREND_SEASONS,
            seasons.len()
        )));
    }
    Ok(seasons)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::state::AppState;
    use crate::agents::narrative::NarrativeAgent;
    use crate::config::AppConfig;
    use crate::fetch::{ClientConfig, SportsClient};
    use crate::screens::Screens;
    use crate::storage::{FavoritesStore, StorageConfig};

    pub fn test_state(base_url: &str, data_dir: &std::path::Path) -> AppState {
        let client = SportsClient::new(ClientConfig {
            base_url: base_url.to_string(),
            api_key: Some("test-key".into()),
            ..ClientConfig::default()
        })
        .unwrap();
        let narrative = Arc::new(NarrativeAgent::disabled("AI analysis is not configured."));
        let favorites =
            FavoritesStore::open(&StorageConfig::new(data_dir.to_path_buf())).unwrap();
        AppState {
            screens: Screens::new(client, narrative, 2024),
            favorites: Arc::new(favorites),
            config: Arc::new(AppConfig::default()),
        }
    }

    pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
