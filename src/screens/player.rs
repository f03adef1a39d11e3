//! Player screens: details with the league filter, side-by-side
//! comparison, season trends and the AI narrative.

use serde::Serialize;
use tracing::info;

use super::{ScreenError, Screens, Section};
use crate::agents::narrative::{Narrative, PlayerBrief};
use crate::models::{LeagueId, PlayerComparison, PlayerId, PlayerTrend, StatsSelection, TrendStat};
use crate::normalize;

/// Seasons plotted by default on the trend screen.
pub const TREND_SEASONS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDetails {
    pub player: PlayerId,
    pub season: i32,
    pub league: Option<LeagueId>,
    /// `None` inside a ready section when the provider knows no such
    /// player for the season.
    pub statistics: Section<Option<StatsSelection>>,
}

/// `count` consecutive seasons ending at `latest`, oldest first.
pub fn trend_seasons(latest: i32, count: usize) -> Vec<i32> {
    let span = i32::try_from(count.saturating_sub(1)).unwrap_or(i32::MAX);
    (latest.saturating_sub(span)..=latest).take(count).collect()
}

impl Screens {
    /// One player's statistics for a season, narrowed to `league` when it
    /// has an entry there.
    pub async fn player_details(
        &self,
        player: PlayerId,
        season: Option<i32>,
        league: Option<LeagueId>,
    ) -> PlayerDetails {
        let season = self.season(season);
        let stats = self.client.player(player, season).await;
        info!("Loaded player {} season {}", player, season);

        PlayerDetails {
            player,
            season,
            league,
            statistics: Section::from_result("player", stats)
                .map(|s| s.map(|s| normalize::players::select_for_league(s, league))),
        }
    }

    /// Two players under the same season and league filter.
    pub async fn compare_players(
        &self,
        first: PlayerId,
        second: PlayerId,
        season: Option<i32>,
        league: Option<LeagueId>,
    ) -> Section<PlayerComparison> {
        let season = self.season(season);
        let pair = self.client.player_pair(first, second, season).await;
        info!("Loaded comparison {} vs {} season {}", first, second, season);
        Section::from_result("comparison", pair)
            .map(|(a, b)| normalize::players::comparison(a, b, league))
    }

    /// One value of `stat` per season. Seasons default to the last
    /// [`TREND_SEASONS`] ending at the configured season; longer lists are
    /// cut to their first [`TREND_SEASONS`] entries.
    pub async fn player_trends(
        &self,
        player: PlayerId,
        stat: TrendStat,
        seasons: Option<Vec<i32>>,
    ) -> Section<PlayerTrend> {
        let mut seasons = seasons
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| trend_seasons(self.default_season, TREND_SEASONS));
        seasons.truncate(TREND_SEASONS);
        let per_season = self.client.player_seasons(player, &seasons).await;
        info!(
            "Loaded {} trend for player {} over {} seasons",
            stat.label(),
            player,
            seasons.len()
        );
        Section::from_result("trends", per_season)
            .map(|per_season| normalize::players::trend(player, stat, &per_season))
    }

    /// AI narrative for a player's season.
    pub async fn player_narrative(
        &self,
        player: PlayerId,
        season: Option<i32>,
    ) -> Result<Narrative, ScreenError> {
        if let Some(unavailable) = self.narrative.unavailable() {
            return Ok(unavailable);
        }
        let season = self.season(season);
        let stats = self
            .client
            .player(player, season)
            .await?
            .ok_or_else(|| ScreenError::NotFound(format!("Player {}", player)))?;

        let narrative = self.narrative.analyze_player(&PlayerBrief::new(&stats)).await;
        info!("Player narrative for {}: {:?}", player, narrative.text().is_some());
        Ok(narrative)
    }
}
