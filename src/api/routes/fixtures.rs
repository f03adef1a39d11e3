use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::agents::narrative::Narrative;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Fixture, FixtureId, LeagueId, TeamId};
use crate::screens::fixture::{FixtureDetails, HeadToHeadScreen, LiveStats, PreviewScreen};
use crate::screens::Section;

#[derive(Debug, Deserialize)]
pub struct LiveParams {
    pub league: Option<u32>,
}

pub async fn live_fixtures(
    State(state): State<AppState>,
    Query(params): Query<LiveParams>,
) -> Json<Section<Vec<Fixture>>> {
    Json(
        state
            .screens
            .live_fixtures(params.league.map(LeagueId::new))
            .await,
    )
}

pub async fn details(
    State(state): State<AppState>,
    Path(fixture): Path<u32>,
) -> Result<Json<FixtureDetails>, ApiError> {
    Ok(Json(
        state.screens.fixture_details(FixtureId::new(fixture)).await?,
    ))
}

pub async fn live_stats(
    State(state): State<AppState>,
    Path(fixture): Path<u32>,
) -> Result<Json<LiveStats>, ApiError> {
    Ok(Json(state.screens.live_stats(FixtureId::new(fixture)).await?))
}

pub async fn preview(
    State(state): State<AppState>,
    Path(fixture): Path<u32>,
) -> Result<Json<PreviewScreen>, ApiError> {
    Ok(Json(
        state.screens.match_preview(FixtureId::new(fixture)).await?,
    ))
}

pub async fn analysis(
    State(state): State<AppState>,
    Path(fixture): Path<u32>,
) -> Result<Json<Narrative>, ApiError> {
    Ok(Json(
        state
            .screens
            .fixture_narrative(FixtureId::new(fixture))
            .await?,
    ))
}

pub async fn head_to_head(
    State(state): State<AppState>,
    Path((team_a, team_b)): Path<(u32, u32)>,
) -> Result<Json<HeadToHeadScreen>, ApiError> {
    if team_a == team_b {
        return Err(ApiError::BadRequest(
            "head-to-head needs two different teams".to_string(),
        ));
    }
    Ok(Json(
        state
            .screens
            .head_to_head(TeamId::new(team_a), TeamId::new(team_b))
            .await,
    ))
}
