use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{LeagueId, TeamId};
use crate::screens::ScreenError;
use crate::selection::{fetch_and_apply, SelectionState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_configured: bool,
    pub narrative_enabled: bool,
    pub default_season: i32,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider_configured: state.screens.client().has_credential(),
        narrative_enabled: state.screens.narrative().is_enabled(),
        default_season: state.screens.default_season(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SelectionParams {
    pub country: Option<String>,
    pub league: Option<u32>,
    pub team: Option<u32>,
    pub season: Option<i32>,
}

/// Walk the filter chain as far as the given parameters reach and return
/// the chain with every option list loaded along the way.
pub async fn selection(
    State(state): State<AppState>,
    Query(params): Query<SelectionParams>,
) -> Result<Json<SelectionState>, ApiError> {
    let client = state.screens.client();
    let mut chain =
        SelectionState::new(params.season.unwrap_or(state.screens.default_season()));

    if params.country.is_none() && params.league.is_none() {
        let request = chain.load_countries();
        fetch_and_apply(client, &mut chain, request)
            .await
            .map_err(ScreenError::from)?;
    }
    if let Some(request) = chain.set_country(params.country) {
        fetch_and_apply(client, &mut chain, request)
            .await
            .map_err(ScreenError::from)?;
    }
    if let Some(request) = chain.set_league(params.league.map(LeagueId::new)) {
        fetch_and_apply(client, &mut chain, request)
            .await
            .map_err(ScreenError::from)?;
    }
    if let Some(request) = chain.set_team(params.team.map(TeamId::new)) {
        fetch_and_apply(client, &mut chain, request)
            .await
            .map_err(ScreenError::from)?;
    }

    Ok(Json(chain))
}
