//! League-level screens: dashboard, league browser, matches by round,
//! standings, transfers and team analytics.

use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::{Serialize, Serializer};
use tracing::info;

use super::{serialize_section_with, Screens, Section};
use crate::calculate::{self, Streak};
use crate::models::{
    CountryLeagues, Fixture, LeagueId, SortConfig, Squad, StandingRow, StatusCode, TeamId,
    TeamSeasonStats, TopPlayer, TransferFeed,
};
use crate::normalize::{self, fixtures::DASHBOARD_LIMIT};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub league: LeagueId,
    pub season: i32,
    pub upcoming: Section<Vec<Fixture>>,
    pub recent_results: Section<Vec<Fixture>>,
    pub top_scorers: Section<Vec<TopPlayer>>,
    pub top_assists: Section<Vec<TopPlayer>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueBrowser {
    pub query: Option<String>,
    pub countries: Section<Vec<CountryLeagues>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueMatches {
    pub league: LeagueId,
    pub season: i32,
    pub rounds: Vec<String>,
    pub selected_round: Option<String>,
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsTable {
    pub league: LeagueId,
    pub season: i32,
    pub sort: SortConfig,
    #[serde(serialize_with = "serialize_rows")]
    pub rows: Section<Vec<StandingRow>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransfersScreen {
    pub league: LeagueId,
    pub requested_season: i32,
    pub feed: Section<TransferFeed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalytics {
    pub league: LeagueId,
    pub season: i32,
    pub team: TeamId,
    #[serde(serialize_with = "serialize_team_stats")]
    pub statistics: Section<Option<TeamSeasonStats>>,
    pub streak: Option<Streak>,
    pub squad: Section<Option<Squad>>,
}

fn serialize_rows<S: Serializer>(
    rows: &Section<Vec<StandingRow>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serialize_section_with(
        rows,
        |rows| rows.iter().map(StandingRow::view).collect::<Vec<_>>(),
        serializer,
    )
}

fn serialize_team_stats<S: Serializer>(
    stats: &Section<Option<TeamSeasonStats>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serialize_section_with(stats, |s| s.as_ref().map(TeamSeasonStats::view), serializer)
}

/// The round to show when none is requested: the round of the earliest
/// fixture not yet started, else the last round. Postponed and cancelled
/// fixtures never pin the default.
fn default_round(fixtures: &[Fixture], rounds: &[String]) -> Option<String> {
    fixtures
        .iter()
        .filter(|f| f.status.code == StatusCode::Scheduled)
        .min_by_key(|f| (f.date.is_none(), f.date))
        .and_then(|f| f.league.round.clone())
        .or_else(|| rounds.last().cloned())
}

impl Screens {
    /// Upcoming fixtures, recent results, top scorers and top assists of a
    /// league. The three requests are independent.
    pub async fn dashboard(
        &self,
        league: LeagueId,
        season: Option<i32>,
        today: NaiveDate,
    ) -> Dashboard {
        let season = self.season(season);
        let (fixtures, scorers, assists) = tokio::join!(
            self.client.league_fixtures(league, season),
            self.client.top_scorers(league, season, DASHBOARD_LIMIT),
            self.client.top_assists(league, season, DASHBOARD_LIMIT),
        );
        info!("Loaded dashboard for league {} season {}", league, season);

        let fixtures = Section::from_result("fixtures", fixtures);
        Dashboard {
            league,
            season,
            upcoming: fixtures.as_ref().map(|f| {
                normalize::fixtures::upcoming(f, today, DASHBOARD_LIMIT)
            }),
            recent_results: fixtures.map(|f| {
                normalize::fixtures::recent_results(&f, today, DASHBOARD_LIMIT)
            }),
            top_scorers: Section::from_result("top_scorers", scorers),
            top_assists: Section::from_result("top_assists", assists),
        }
    }

    /// All leagues grouped by country, optionally filtered by name.
    pub async fn leagues(&self, query: Option<&str>) -> LeagueBrowser {
        let leagues = self.client.leagues(None).await;
        let countries = Section::from_result("leagues", leagues).map(|leagues| {
            let leagues = match query {
                Some(q) => normalize::leagues::search(&leagues, q)
                    .into_iter()
                    .cloned()
                    .collect(),
                None => leagues,
            };
            normalize::leagues::group_by_country(leagues)
        });
        info!("Loaded league browser (query: {:?})", query);
        LeagueBrowser {
            query: query.map(str::to_string),
            countries,
        }
    }

    /// Fixtures of one round; rounds keep provider order.
    pub async fn league_matches(
        &self,
        league: LeagueId,
        season: Option<i32>,
        round: Option<&str>,
    ) -> Section<LeagueMatches> {
        let season = self.season(season);
        let fixtures = self.client.league_fixtures(league, season).await;
        info!("Loaded matches for league {} season {}", league, season);

        Section::from_result("league_matches", fixtures).map(|fixtures| {
            let rounds = normalize::fixtures::rounds(&fixtures);
            let selected_round = match round {
                Some(r) => Some(r.to_string()),
                None => default_round(&fixtures, &rounds),
            };
            let fixtures = match &selected_round {
                Some(r) => normalize::fixtures::by_round(&fixtures, r)
                    .into_iter()
                    .cloned()
                    .collect(),
                None => fixtures,
            };
            LeagueMatches {
                league,
                season,
                rounds,
                selected_round,
                fixtures,
            }
        })
    }

    /// League table sorted by any column.
    pub async fn standings(
        &self,
        league: LeagueId,
        season: Option<i32>,
        sort: SortConfig,
    ) -> StandingsTable {
        let season = self.season(season);
        let rows = self.client.standings(league, season).await;
        info!("Loaded standings for league {} season {}", league, season);

        StandingsTable {
            league,
            season,
            sort,
            rows: Section::from_result("standings", rows).map(|mut rows| {
                normalize::standings::sort_rows(&mut rows, sort);
                rows
            }),
        }
    }

    /// Tables for every tracked league of a country, fetched concurrently.
    /// Each table degrades on its own.
    pub async fn country_tables(
        &self,
        country: &str,
        season: Option<i32>,
        sort: SortConfig,
    ) -> Vec<StandingsTable> {
        let ids = normalize::leagues::country_league_ids(country);
        info!("Loading {} tables for {}", ids.len(), country);
        join_all(
            ids.iter()
                .map(|id| self.standings(LeagueId::new(*id), season, sort)),
        )
        .await
    }

    /// Transfers of a league. An empty season falls back to the one
    /// before it with a notice.
    pub async fn transfers(&self, league: LeagueId, season: Option<i32>) -> TransfersScreen {
        let season = self.season(season);
        let current = self.client.transfers(league, season).await;

        let previous_season = season.checked_sub(1);
        let feed = match (current, previous_season) {
            (Ok(current), Some(fallback_season)) if current.is_empty() => {
                let fallback = match self.client.transfers(league, fallback_season).await {
                    Ok(list) => Some(list),
                    Err(e) => {
                        tracing::warn!("Fallback transfers for {} failed: {}", fallback_season, e);
                        None
                    }
                };
                Section::ready(normalize::transfers::feed(
                    season,
                    current,
                    fallback_season,
                    fallback,
                ))
            }
            (other, _) => Section::from_result("transfers", other).map(|current| {
                normalize::transfers::feed(season, current, season, None)
            }),
        };
        info!("Loaded transfers for league {} season {}", league, season);

        TransfersScreen {
            league,
            requested_season: season,
            feed,
        }
    }

    /// Season statistics and squad of one team.
    pub async fn team_analytics(
        &self,
        league: LeagueId,
        season: Option<i32>,
        team: TeamId,
    ) -> TeamAnalytics {
        let season = self.season(season);
        let (stats, squad) = tokio::join!(
            self.client.team_statistics(league, season, team),
            self.client.squad(team),
        );
        info!("Loaded team analytics for team {} league {}", team, league);

        let statistics = Section::from_result("team_statistics", stats);
        let streak = statistics
            .data()
            .and_then(|s| s.as_ref())
            .and_then(|s| s.form.as_deref())
            .and_then(calculate::current_streak);

        TeamAnalytics {
            league,
            season,
            team,
            statistics,
            streak,
            squad: Section::from_result("squad", squad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, StandingSortKey};
    use crate::screens::test_support::{fixture_json, provider_fail, provider_ok, screens};
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn season_fixtures() -> serde_json::Value {
        json!({
            "errors": [],
            "response": [
                fixture_json(1, "2024-08-16T19:00:00+00:00", "FT", (Some(1), Some(0)), "Regular Season - 1"),
                fixture_json(2, "2024-08-24T14:00:00+00:00", "FT", (Some(0), Some(2)), "Regular Season - 2"),
                fixture_json(3, "2024-09-01T15:00:00+00:00", "NS", (None, None), "Regular Season - 3"),
                fixture_json(4, "2024-09-14T15:00:00+00:00", "NS", (None, None), "Regular Season - 4"),
            ]
        })
    }

    #[tokio::test]
    async fn test_dashboard_isolates_failed_section() {
        let mut server = mockito::Server::new_async().await;
        let _fixtures = provider_ok(&mut server, "/fixtures", Matcher::Any, season_fixtures()).await;
        let _scorers = provider_fail(&mut server, "/players/topscorers", 500, "Server error").await;
        let _assists = provider_ok(
            &mut server,
            "/players/topassists",
            Matcher::Any,
            json!({"errors": [], "response": []}),
        )
        .await;

        let screens = screens(&server);
        let today = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();
        let dashboard = screens.dashboard(LeagueId::new(39), None, today).await;

        assert_eq!(dashboard.season, 2024);
        let upcoming: Vec<u32> = dashboard
            .upcoming
            .data()
            .unwrap()
            .iter()
            .map(|f| f.id.get())
            .collect();
        assert_eq!(upcoming, vec![3, 4]);
        let recent: Vec<u32> = dashboard
            .recent_results
            .data()
            .unwrap()
            .iter()
            .map(|f| f.id.get())
            .collect();
        assert_eq!(recent, vec![2, 1]);
        assert_eq!(dashboard.top_scorers.message(), Some("Server error"));
        assert!(dashboard.top_assists.data().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_league_matches_defaults_to_first_open_round() {
        let mut server = mockito::Server::new_async().await;
        let _m = provider_ok(&mut server, "/fixtures", Matcher::Any, season_fixtures()).await;

        let screens = screens(&server);
        let matches = screens
            .league_matches(LeagueId::new(39), Some(2024), None)
            .await;
        let matches = matches.data().unwrap();
        assert_eq!(matches.rounds.len(), 4);
        assert_eq!(matches.selected_round.as_deref(), Some("Regular Season - 3"));
        assert_eq!(matches.fixtures.len(), 1);

        let picked = screens
            .league_matches(LeagueId::new(39), Some(2024), Some("Regular Season - 1"))
            .await;
        assert_eq!(picked.data().unwrap().fixtures[0].id.get(), 1);
    }

    #[tokio::test]
    async fn test_default_round_skips_postponed_and_extra_time_finishes() {
        let mut server = mockito::Server::new_async().await;
        let _m = provider_ok(
            &mut server,
            "/fixtures",
            Matcher::Any,
            json!({"errors": [], "response": [
                fixture_json(1, "2024-08-16T19:00:00+00:00", "PST", (None, None), "Regular Season - 1"),
                fixture_json(2, "2024-08-24T14:00:00+00:00", "FT", (Some(0), Some(2)), "Regular Season - 2"),
                fixture_json(3, "2024-09-01T15:00:00+00:00", "AET", (Some(2), Some(1)), "Regular Season - 3"),
                fixture_json(5, "2024-09-21T15:00:00+00:00", "NS", (None, None), "Regular Season - 5"),
                fixture_json(4, "2024-09-14T15:00:00+00:00", "NS", (None, None), "Regular Season - 4"),
            ]}),
        )
        .await;

        let screens = screens(&server);
        let matches = screens
            .league_matches(LeagueId::new(39), Some(2024), None)
            .await;
        let matches = matches.data().unwrap();
        assert_eq!(matches.selected_round.as_deref(), Some("Regular Season - 4"));
        assert_eq!(matches.fixtures[0].id.get(), 4);
    }

    #[tokio::test]
    async fn test_default_round_is_last_when_nothing_scheduled() {
        let mut server = mockito::Server::new_async().await;
        let _m = provider_ok(
            &mut server,
            "/fixtures",
            Matcher::Any,
            json!({"errors": [], "response": [
                fixture_json(1, "2024-08-16T19:00:00+00:00", "FT", (Some(1), Some(0)), "Regular Season - 1"),
                fixture_json(2, "2024-08-24T14:00:00+00:00", "PEN", (Some(1), Some(1)), "Regular Season - 2"),
            ]}),
        )
        .await;

        let screens = screens(&server);
        let matches = screens.league_matches(LeagueId::new(39), None, None).await;
        assert_eq!(
            matches.data().unwrap().selected_round.as_deref(),
            Some("Regular Season - 2")
        );
    }

    #[tokio::test]
    async fn test_transfers_without_previous_season_skip_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _current = provider_ok(
            &mut server,
            "/players/transfers",
            Matcher::UrlEncoded("season".into(), i32::MIN.to_string()),
            json!({"errors": [], "response": []}),
        )
        .await;

        let screens = screens(&server);
        let screen = screens.transfers(LeagueId::new(39), Some(i32::MIN)).await;
        let feed = screen.feed.data().unwrap();
        assert_eq!(feed.season, i32::MIN);
        assert!(feed.transfers.is_empty());
    }

    #[tokio::test]
    async fn test_standings_sorted_and_serialized_with_derived_columns() {
        let mut server = mockito::Server::new_async().await;
        let _m = provider_ok(
            &mut server,
            "/standings",
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("league".into(), "39".into()),
                Matcher::UrlEncoded("season".into(), "2023".into()),
            ]),
            json!({"errors": [], "response": [{"league": {"standings": [[
                {"rank": 1, "team": {"id": 50, "name": "Man City"}, "points": 28,
                 "all": {"played": 10, "win": 9, "draw": 1, "lose": 0,
                         "goals": {"for": 25, "against": 6}}},
                {"rank": 2, "team": {"id": 42, "name": "Arsenal"}, "points": 20,
                 "all": {"played": 10, "win": 6, "draw": 2, "lose": 2,
                         "goals": {"for": 20, "against": 8}}}
            ]]}}]}),
        )
        .await;

        let screens = screens(&server);
        let sort = SortConfig {
            key: StandingSortKey::Points,
            direction: SortDirection::Asc,
        };
        let table = screens.standings(LeagueId::new(39), Some(2023), sort).await;
        let rows = table.rows.data().unwrap();
        assert_eq!(rows[0].team.name, "Arsenal");

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["rows"]["status"], "ready");
        assert_eq!(json["rows"]["data"][0]["goal_difference"], 12);
        assert_eq!(json["rows"]["data"][0]["win_percentage"], "60.0");
        assert_eq!(json["rows"]["data"][0]["points_per_game"], "2.00");
    }

    #[tokio::test]
    async fn test_transfers_fall_back_to_previous_season() {
        let mut server = mockito::Server::new_async().await;
        let _current = provider_ok(
            &mut server,
            "/players/transfers",
            Matcher::UrlEncoded("season".into(), "2024".into()),
            json!({"errors": [], "response": []}),
        )
        .await;
        let _previous = provider_ok(
            &mut server,
            "/players/transfers",
            Matcher::UrlEncoded("season".into(), "2023".into()),
            json!({"errors": [], "response": [{
                "player": {"id": 1, "name": "J. Doe"},
                "transfers": [{"date": "2023-07-01", "type": "Free",
                               "teams": {"in": {"id": 2, "name": "A"}, "out": {"id": 3, "name": "B"}}}]
            }]}),
        )
        .await;

        let screens = screens(&server);
        let screen = screens.transfers(LeagueId::new(39), Some(2024)).await;
        let feed = screen.feed.data().unwrap();
        assert_eq!(screen.requested_season, 2024);
        assert_eq!(feed.season, 2023);
        assert_eq!(feed.transfers.len(), 1);
        assert!(feed.notice.as_deref().unwrap().contains("2023"));
    }

    #[tokio::test]
    async fn test_team_analytics_streak_and_failed_squad() {
        let mut server = mockito::Server::new_async().await;
        let _stats = provider_ok(
            &mut server,
            "/teams/statistics",
            Matcher::Any,
            json!({"errors": [], "response": {
                "team": {"id": 33, "name": "Man United"},
                "league": {"id": 39, "name": "Premier League", "season": 2024},
                "form": "LWWW",
                "fixtures": {"played": {"total": 4}, "wins": {"total": 3},
                             "draws": {"total": 0}, "loses": {"total": 1}},
                "goals": {"for": {"total": {"total": 8}, "average": {"total": "2.0"}},
                          "against": {"total": {"total": 3}, "average": {"total": "0.8"}}},
                "clean_sheet": {"total": 2},
                "failed_to_score": {"total": 0}
            }}),
        )
        .await;
        let _squad = provider_fail(&mut server, "/players/squads", 503, "Unavailable").await;

        let screens = screens(&server);
        let analytics = screens
            .team_analytics(LeagueId::new(39), None, TeamId::new(33))
            .await;

        assert_eq!(analytics.streak.unwrap().to_string(), "3 wins");
        assert_eq!(analytics.squad.message(), Some("Unavailable"));
        let json = serde_json::to_value(&analytics).unwrap();
        assert_eq!(json["statistics"]["data"]["win_percentage"], "75.0");
    }
}
