use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::FavoriteLeague;

pub async fn list(State(state): State<AppState>) -> Json<Vec<FavoriteLeague>> {
    Json(state.favorites.list())
}

/// Add the league if absent, remove it if present; returns the new list.
pub async fn toggle(
    State(state): State<AppState>,
    Json(league): Json<FavoriteLeague>,
) -> Result<Json<Vec<FavoriteLeague>>, ApiError> {
    let favorites = state.favorites.clone();
    let list = tokio::task::spawn_blocking(move || favorites.toggle(league))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(list))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, post_json, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state("http://127.0.0.1:9", tmp.path());

        let (status, json) = get_json(build_router(state.clone()), "/api/favorites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));

        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/favorites/toggle",
            json!({"leagueId": "39", "name": "Premier League", "countryName": "England"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["leagueId"], 39);
        assert_eq!(json[0]["countryName"], "England");

        let (_, json) = post_json(
            build_router(state.clone()),
            "/api/favorites/toggle",
            json!({"leagueId": 39, "name": "Premier League"}),
        )
        .await;
        assert_eq!(json, json!([]));
        assert!(state.favorites.list().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_rejects_bad_league_id() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state("http://127.0.0.1:9", tmp.path()));
        let (status, _) = post_json(
            app,
            "/api/favorites/toggle",
            json!({"leagueId": "premier", "name": "Premier League"}),
        )
        .await;
        assert!(status.is_client_error());
    }
}
