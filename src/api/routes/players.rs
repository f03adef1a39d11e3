use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::agents::narrative::Narrative;
use crate::api::state::AppState;
use crate::api::{parse_seasons, ApiError};
use crate::models::{LeagueId, PlayerComparison, PlayerId, PlayerTrend, TrendStat};
use crate::screens::player::PlayerDetails;
use crate::screens::Section;

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    pub season: Option<i32>,
    pub league: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub first: u32,
    pub second: u32,
    pub season: Option<i32>,
    pub league: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub stat: Option<TrendStat>,
    /// Comma-separated seasons
    pub seasons: Option<String>,
}

pub async fn details(
    State(state): State<AppState>,
    Path(player): Path<u32>,
    Query(params): Query<PlayerParams>,
) -> Json<PlayerDetails> {
    Json(
        state
            .screens
            .player_details(
                PlayerId::new(player),
                params.season,
                params.league.map(LeagueId::new),
            )
            .await,
    )
}

pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Json<Section<PlayerComparison>> {
    Json(
        state
            .screens
            .compare_players(
                PlayerId::new(params.first),
                PlayerId::new(params.second),
                params.season,
                params.league.map(LeagueId::new),
            )
            .await,
    )
}

pub async fn trends(
    State(state): State<AppState>,
    Path(player): Path<u32>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Section<PlayerTrend>>, ApiError> {
    let seasons = params.seasons.as_deref().map(parse_seasons).transpose()?;
    Ok(Json(
        state
            .screens
            .player_trends(
                PlayerId::new(player),
                params.stat.unwrap_or_default(),
                seasons,
            )
            .await,
    ))
}

pub async fn analysis(
    State(state): State<AppState>,
    Path(player): Path<u32>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<Narrative>, ApiError> {
    Ok(Json(
        state
            .screens
            .player_narrative(PlayerId::new(player), params.season)
            .await?,
    ))
}
