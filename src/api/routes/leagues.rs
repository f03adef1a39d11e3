use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{LeagueId, SortConfig, SortDirection, StandingSortKey, TeamId};
use crate::screens::league::{
    Dashboard, LeagueBrowser, LeagueMatches, StandingsTable, TeamAnalytics, TransfersScreen,
};
use crate::screens::Section;

#[derive(Debug, Deserialize)]
pub struct SeasonParams {
    pub season: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LeaguesParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchesParams {
    pub season: Option<i32>,
    pub round: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    pub season: Option<i32>,
    pub sort: Option<StandingSortKey>,
    pub direction: Option<SortDirection>,
}

impl StandingsParams {
    fn sort_config(&self) -> SortConfig {
        SortConfig {
            key: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        }
    }
}

pub async fn list_leagues(
    State(state): State<AppState>,
    Query(params): Query<LeaguesParams>,
) -> Json<LeagueBrowser> {
    let query = params.q.as_deref().filter(|q| !q.trim().is_empty());
    Json(state.screens.leagues(query).await)
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(league): Path<u32>,
    Query(params): Query<SeasonParams>,
) -> Json<Dashboard> {
    let today = Utc::now().date_naive();
    Json(
        state
            .screens
            .dashboard(LeagueId::new(league), params.season, today)
            .await,
    )
}

pub async fn matches(
    State(state): State<AppState>,
    Path(league): Path<u32>,
    Query(params): Query<MatchesParams>,
) -> Json<Section<LeagueMatches>> {
    Json(
        state
            .screens
            .league_matches(LeagueId::new(league), params.season, params.round.as_deref())
            .await,
    )
}

pub async fn standings(
    State(state): State<AppState>,
    Path(league): Path<u32>,
    Query(params): Query<StandingsParams>,
) -> Json<StandingsTable> {
    Json(
        state
            .screens
            .standings(LeagueId::new(league), params.season, params.sort_config())
            .await,
    )
}

pub async fn country_tables(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<Vec<StandingsTable>>, ApiError> {
    let tables = state
        .screens
        .country_tables(&country, params.season, params.sort_config())
        .await;
    if tables.is_empty() {
        return Err(ApiError::NotFound(format!("No tracked leagues for {}", country)));
    }
    Ok(Json(tables))
}

pub async fn transfers(
    State(state): State<AppState>,
    Path(league): Path<u32>,
    Query(params): Query<SeasonParams>,
) -> Json<TransfersScreen> {
    Json(
        state
            .screens
            .transfers(LeagueId::new(league), params.season)
            .await,
    )
}

pub async fn team_analytics(
    State(state): State<AppState>,
    Path((league, team)): Path<(u32, u32)>,
    Query(params): Query<SeasonParams>,
) -> Json<TeamAnalytics> {
    Json(
        state
            .screens
            .team_analytics(LeagueId::new(league), params.season, TeamId::new(team))
            .await,
    )
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, test_state};
    use axum::http::StatusCode;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_standings_sorted_by_query() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/standings")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"errors":[],"response":[{"league":{"standings":[[
                    {"rank":1,"team":{"id":50,"name":"Man City"},"points":28,
                     "all":{"played":10,"win":9,"draw":1,"lose":0,"goals":{"for":25,"against":6}}},
                    {"rank":2,"team":{"id":42,"name":"Arsenal"},"points":20,
                     "all":{"played":10,"win":6,"draw":2,"lose":2,"goals":{"for":20,"against":8}}}
                ]]}}]}"#,
            )
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&server.url(), tmp.path()));
        let (status, json) = get_json(
            app,
            "/api/leagues/39/standings?season=2023&sort=rank&direction=desc",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sort"]["direction"], "desc");
        assert_eq!(json["rows"]["data"][0]["team"]["name"], "Arsenal");
        assert_eq!(json["rows"]["data"][1]["goal_difference"], 19);
    }

    #[tokio::test]
    async fn test_dashboard_reports_missing_credential_per_section() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state("http://127.0.0.1:9", tmp.path());
        let client = crate::fetch::SportsClient::new(crate::fetch::ClientConfig::default()).unwrap();
        state.screens = crate::screens::Screens::new(
            client,
            std::sync::Arc::new(crate::agents::narrative::NarrativeAgent::disabled("off")),
            2024,
        );

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/leagues/39/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        for section in ["upcoming", "recent_results", "top_scorers", "top_assists"] {
            assert_eq!(json[section]["status"], "error");
            assert!(json[section]["message"]
                .as_str()
                .unwrap()
                .contains("FOOTBALL_API_KEY"));
        }
    }

    #[tokio::test]
    async fn test_unknown_country_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state("http://127.0.0.1:9", tmp.path()));
        let (status, json) = get_json(app, "/api/countries/Atlantis/standings").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
