//! Sports-data provider client.
//!
//! Authenticated GET requests against the provider, one typed method per
//! resource. Every request carries the `x-rapidapi-host` and
//! `x-rapidapi-key` headers; failures are normalized into [`FetchError`].

use std::time::Duration;

use futures_util::future::try_join_all;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::ProviderConfig;
use crate::models::{
    Fixture, FixtureId, HeadToHeadRecord, League, LeagueId, MatchEvent, MatchStatistics,
    PlayerId, PlayerStatistics, Prediction, Squad, StandingRow, Team, TeamId, TeamSeasonStats,
    TopPlayer, Transfer,
};
use crate::normalize::{self, NormalizeError};

pub const HOST_HEADER: &str = "x-rapidapi-host";
pub const KEY_HEADER: &str = "x-rapidapi-key";

/// Errors that can occur while talking to the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed with status {status}: {message}")]
    RemoteRequestFailed { status: u16, message: String },

    #[error("Missing credential: set {0}")]
    MissingCredential(String),

    #[error("Malformed response: {0}")]
    Malformed(#[from] NormalizeError),
}

impl FetchError {
    /// Short text suitable for an inline screen message.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(e) if e.is_timeout() => {
                "The data provider did not respond in time. Please try again later.".to_string()
            }
            FetchError::Transport(_) => {
                "Could not reach the data provider. Please try again later.".to_string()
            }
            FetchError::RemoteRequestFailed { message, .. } => message.clone(),
            FetchError::MissingCredential(var) => {
                format!("The sports data API key is not configured ({}).", var)
            }
            FetchError::InvalidUrl(_) | FetchError::Malformed(_) => {
                "Received unexpected data from the provider.".to_string()
            }
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub host: String,
    /// `None` makes every request fail with [`FetchError::MissingCredential`]
    pub api_key: Option<String>,
    /// Name of the variable the key is read from, for error messages
    pub api_key_env: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let provider = ProviderConfig::default();
        Self {
            base_url: provider.base_url,
            host: provider.host,
            api_key: None,
            api_key_env: provider.api_key_env,
            timeout: Duration::from_secs(provider.timeout_seconds),
            user_agent: concat!("ssport-analytics/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&ProviderConfig> for ClientConfig {
    fn from(provider: &ProviderConfig) -> Self {
        Self {
            base_url: provider.base_url.clone(),
            host: provider.host.clone(),
            api_key: provider.api_key(),
            api_key_env: provider.api_key_env.clone(),
            timeout: provider.timeout(),
            ..Self::default()
        }
    }
}

/// Provider client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SportsClient {
    client: Client,
    config: ClientConfig,
}

impl SportsClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("ssport-analytics")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_provider(provider: &ProviderConfig) -> Result<Self, FetchError> {
        Self::new(ClientConfig::from(provider))
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| FetchError::InvalidUrl(format!("{}/{}: {}", base, path, e)))
    }

    /// GET `path` with `query`, returning the parsed JSON body.
    ///
    /// Non-success statuses and provider errors reported inside a 200 body
    /// both become [`FetchError::RemoteRequestFailed`].
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| FetchError::MissingCredential(self.config.api_key_env.clone()))?;
        let url = self.url(path)?;

        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url.clone())
            .header(HOST_HEADER, &self.config.host)
            .header(KEY_HEADER, key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "API request failed".to_string());
            warn!("GET {} failed: {} {}", url, status.as_u16(), message);
            return Err(FetchError::RemoteRequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        if let Some(message) = body.get("errors").and_then(logical_error) {
            warn!("GET {} reported errors: {}", url, message);
            return Err(FetchError::RemoteRequestFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    // ── Leagues / teams ─────────────────────────────────────────────

    pub async fn leagues(&self, season: Option<i32>) -> Result<Vec<League>, FetchError> {
        let mut query = Vec::new();
        if let Some(season) = season {
            query.push(("season", season.to_string()));
        }
        let body = self.get("/leagues", &query).await?;
        Ok(normalize::leagues::leagues(&body)?)
    }

    /// Leagues of one country, for the selection chain.
    pub async fn leagues_in_country(&self, country: &str) -> Result<Vec<League>, FetchError> {
        let body = self
            .get("/leagues", &[("country", country.to_string())])
            .await?;
        Ok(normalize::leagues::leagues(&body)?)
    }

    pub async fn league(&self, league: LeagueId) -> Result<Option<League>, FetchError> {
        let body = self.get("/leagues", &[("id", league.to_string())]).await?;
        Ok(normalize::leagues::leagues(&body)?.into_iter().next())
    }

    pub async fn teams(&self, league: LeagueId, season: i32) -> Result<Vec<Team>, FetchError> {
        let body = self
            .get(
                "/teams",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::leagues::teams(&body)?)
    }

    // ── Standings / fixtures ────────────────────────────────────────

    pub async fn standings(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<StandingRow>, FetchError> {
        let body = self
            .get(
                "/standings",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::standings::standings(&body)?)
    }

    pub async fn league_fixtures(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<Fixture>, FetchError> {
        let body = self
            .get(
                "/fixtures",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::fixtures::fixtures(&body)?)
    }

    pub async fn fixture(&self, fixture: FixtureId) -> Result<Option<Fixture>, FetchError> {
        let body = self.get("/fixtures", &[("id", fixture.to_string())]).await?;
        Ok(normalize::fixtures::fixtures(&body)?.into_iter().next())
    }

    /// Fixtures currently in play, optionally restricted to one league.
    pub async fn live_fixtures(&self, league: Option<LeagueId>) -> Result<Vec<Fixture>, FetchError> {
        let live = match league {
            Some(id) => id.to_string(),
            None => "all".to_string(),
        };
        let body = self.get("/fixtures", &[("live", live)]).await?;
        Ok(normalize::fixtures::fixtures(&body)?)
    }

    pub async fn fixture_statistics(
        &self,
        fixture: FixtureId,
        half: bool,
    ) -> Result<MatchStatistics, FetchError> {
        let mut query = vec![("fixture", fixture.to_string())];
        if half {
            query.push(("half", "true".to_string()));
        }
        let body = self.get("/fixtures/statistics", &query).await?;
        Ok(normalize::fixtures::statistics(&body)?)
    }

    pub async fn fixture_events(&self, fixture: FixtureId) -> Result<Vec<MatchEvent>, FetchError> {
        let body = self
            .get("/fixtures/events", &[("fixture", fixture.to_string())])
            .await?;
        Ok(normalize::fixtures::events(&body)?)
    }

    pub async fn head_to_head(
        &self,
        team_a: TeamId,
        team_b: TeamId,
    ) -> Result<HeadToHeadRecord, FetchError> {
        let body = self
            .get(
                "/fixtures/headtohead",
                &[("h2h", format!("{}-{}", team_a, team_b))],
            )
            .await?;
        Ok(normalize::fixtures::head_to_head(&body, team_a, team_b)?)
    }

    // ── Predictions / team statistics ───────────────────────────────

    /// Provider prediction plus the past meetings bundled with it.
    pub async fn prediction(
        &self,
        fixture: FixtureId,
    ) -> Result<(Option<Prediction>, Vec<Fixture>), FetchError> {
        let body = self
            .get("/predictions", &[("fixture", fixture.to_string())])
            .await?;
        Ok((
            normalize::predictions::prediction(&body)?,
            normalize::predictions::prediction_meetings(&body)?,
        ))
    }

    pub async fn team_statistics(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<Option<TeamSeasonStats>, FetchError> {
        let body = self
            .get(
                "/teams/statistics",
                &[
                    ("league", league.to_string()),
                    ("season", season.to_string()),
                    ("team", team.to_string()),
                ],
            )
            .await?;
        Ok(normalize::predictions::team_statistics(&body)?)
    }

    /// Home and away team statistics, fetched concurrently.
    pub async fn team_statistics_pair(
        &self,
        league: LeagueId,
        season: i32,
        home: TeamId,
        away: TeamId,
    ) -> Result<(Option<TeamSeasonStats>, Option<TeamSeasonStats>), FetchError> {
        tokio::try_join!(
            self.team_statistics(league, season, home),
            self.team_statistics(league, season, away)
        )
    }

    // ── Players ─────────────────────────────────────────────────────

    pub async fn player(
        &self,
        player: PlayerId,
        season: i32,
    ) -> Result<Option<PlayerStatistics>, FetchError> {
        let body = self
            .get(
                "/players",
                &[("id", player.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::players::player_statistics(&body)?
            .into_iter()
            .next())
    }

    /// Two players for the same season, fetched concurrently.
    pub async fn player_pair(
        &self,
        first: PlayerId,
        second: PlayerId,
        season: i32,
    ) -> Result<(Option<PlayerStatistics>, Option<PlayerStatistics>), FetchError> {
        tokio::try_join!(self.player(first, season), self.player(second, season))
    }

    /// One player across several seasons, fetched concurrently; results
    /// keep the order of `seasons`.
    pub async fn player_seasons(
        &self,
        player: PlayerId,
        seasons: &[i32],
    ) -> Result<Vec<(i32, Option<PlayerStatistics>)>, FetchError> {
        let stats = try_join_all(seasons.iter().map(|s| self.player(player, *s))).await?;
        Ok(seasons.iter().copied().zip(stats).collect())
    }

    pub async fn squad(&self, team: TeamId) -> Result<Option<Squad>, FetchError> {
        let body = self
            .get("/players/squads", &[("team", team.to_string())])
            .await?;
        Ok(normalize::players::squad(&body)?)
    }

    /// Home and away squads, fetched concurrently.
    pub async fn squads(
        &self,
        home: TeamId,
        away: TeamId,
    ) -> Result<(Option<Squad>, Option<Squad>), FetchError> {
        tokio::try_join!(self.squad(home), self.squad(away))
    }

    pub async fn top_scorers(
        &self,
        league: LeagueId,
        season: i32,
        limit: usize,
    ) -> Result<Vec<TopPlayer>, FetchError> {
        let body = self
            .get(
                "/players/topscorers",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::players::top_players(&body, limit)?)
    }

    pub async fn top_assists(
        &self,
        league: LeagueId,
        season: i32,
        limit: usize,
    ) -> Result<Vec<TopPlayer>, FetchError> {
        let body = self
            .get(
                "/players/topassists",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::players::top_players(&body, limit)?)
    }

    pub async fn transfers(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<Transfer>, FetchError> {
        let body = self
            .get(
                "/players/transfers",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(normalize::transfers::transfers(&body)?)
    }
}

/// Provider error text from a failed response body, if it has one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| value.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| value.get("errors").and_then(logical_error))
}

/// The provider's `errors` field: an empty array or object means success.
fn logical_error(errors: &Value) -> Option<String> {
    match errors {
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Object(map) if !map.is_empty() => Some(
            map.iter()
                .map(|(k, v)| match v.as_str() {
                    Some(s) => format!("{}: {}", k, s),
                    None => format!("{}: {}", k, v),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
