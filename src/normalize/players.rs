//! `/players`, `/players/squads`, `/players/topscorers` and
//! `/players/topassists`.

use serde_json::Value;

use super::raw::{RawPlayer, RawPlayerEntry, RawPlayerStats, RawSquadEntry};
use super::{response_items, team_from_raw, NormalizeError, NOT_AVAILABLE};
use crate::models::{
    CardStats, GamesStats, GoalStats, LeagueId, PlayerComparison, PlayerId, PlayerProfile,
    PlayerSeasonStats, PlayerStatistics, PlayerTrend, Squad, SquadPlayer, StatsSelection,
    TopPlayer, TrendPoint, TrendStat,
};

/// Shown when a player has no entry for the selected league.
pub const LEAGUE_FALLBACK_NOTICE: &str =
    "No statistics found for the selected league. Showing all available competitions.";

fn profile_from_raw(raw: Option<RawPlayer>) -> Option<PlayerProfile> {
    let raw = raw?;
    Some(PlayerProfile {
        id: raw.id?,
        name: raw.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        photo: raw.photo,
        age: raw.age,
        nationality: raw.nationality,
    })
}

fn season_stats_from_raw(raw: RawPlayerStats) -> PlayerSeasonStats {
    let league = raw.league.unwrap_or_default();
    let games = raw.games.unwrap_or_default();
    let goals = raw.goals.unwrap_or_default();
    let cards = raw.cards.unwrap_or_default();
    PlayerSeasonStats {
        team: team_from_raw(raw.team.as_ref()),
        league_id: league.id,
        league_name: league.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        season: league.season,
        games: GamesStats {
            appearances: games.appearances.unwrap_or(0),
            minutes: games.minutes.unwrap_or(0),
            position: games
                .position
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: games.rating,
        },
        goals: GoalStats {
            total: goals.total.unwrap_or(0),
            assists: goals.assists.unwrap_or(0),
        },
        cards: CardStats {
            yellow: cards.yellow.unwrap_or(0),
            red: cards.red.unwrap_or(0),
        },
    }
}

fn statistics_from_raw(entry: RawPlayerEntry) -> Option<PlayerStatistics> {
    Some(PlayerStatistics {
        player: profile_from_raw(entry.player)?,
        entries: entry
            .statistics
            .unwrap_or_default()
            .into_iter()
            .map(season_stats_from_raw)
            .collect(),
    })
}

/// Normalize a `/players` body.
pub fn player_statistics(body: &Value) -> Result<Vec<PlayerStatistics>, NormalizeError> {
    let entries: Vec<RawPlayerEntry> = response_items(body)?;
    Ok(entries.into_iter().filter_map(statistics_from_raw).collect())
}

/// Pick the entries for `league`. Without a league filter every entry is
/// kept; when nothing matches, every entry is kept with a notice.
pub fn select_for_league(stats: PlayerStatistics, league: Option<LeagueId>) -> StatsSelection {
    let Some(league) = league else {
        return StatsSelection {
            player: stats.player,
            entries: stats.entries,
            fallback_notice: None,
        };
    };

    let matching: Vec<PlayerSeasonStats> = stats
        .entries
        .iter()
        .filter(|e| e.league_id == Some(league))
        .cloned()
        .collect();

    if matching.is_empty() {
        StatsSelection {
            player: stats.player,
            entries: stats.entries,
            fallback_notice: Some(LEAGUE_FALLBACK_NOTICE.to_string()),
        }
    } else {
        StatsSelection {
            player: stats.player,
            entries: matching,
            fallback_notice: None,
        }
    }
}

/// Normalize a `/players/squads` body. The first team listed is used.
pub fn squad(body: &Value) -> Result<Option<Squad>, NormalizeError> {
    let entries: Vec<RawSquadEntry> = response_items(body)?;
    Ok(entries.into_iter().next().map(|entry| Squad {
        team: team_from_raw(entry.team.as_ref()),
        players: entry
            .players
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                Some(SquadPlayer {
                    id: p.id?,
                    name: p.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    age: p.age,
                    number: p.number,
                    position: p.position,
                    photo: p.photo,
                })
            })
            .collect(),
    }))
}

/// Normalize a `/players/topscorers` or `/players/topassists` body, keeping
/// provider order and at most `limit` players.
pub fn top_players(body: &Value, limit: usize) -> Result<Vec<TopPlayer>, NormalizeError> {
    Ok(player_statistics(body)?
        .into_iter()
        .take(limit)
        .map(|stats| {
            let first = stats.entries.into_iter().next();
            TopPlayer {
                player: stats.player,
                team: first.as_ref().map(|e| e.team.clone()),
                goals: first.as_ref().map_or(0, |e| e.goals.total),
                assists: first.as_ref().map_or(0, |e| e.goals.assists),
                appearances: first.as_ref().map_or(0, |e| e.games.appearances),
            }
        })
        .collect())
}

/// One trend point per requested season, read from that season's first
/// statistics entry. Seasons without data plot as 0.
pub fn trend(
    player_id: PlayerId,
    stat: TrendStat,
    seasons: &[(i32, Option<PlayerStatistics>)],
) -> PlayerTrend {
    PlayerTrend {
        player_id,
        stat,
        label: stat.label(),
        points: seasons
            .iter()
            .map(|(season, stats)| {
                let entry = stats.as_ref().and_then(|s| s.entries.first());
                TrendPoint {
                    season: *season,
                    value: entry.map_or(0, |e| stat.value(e)),
                    has_data: entry.is_some(),
                }
            })
            .collect(),
    }
}

/// Two players side by side under the same league filter.
pub fn comparison(
    first: Option<PlayerStatistics>,
    second: Option<PlayerStatistics>,
    league: Option<LeagueId>,
) -> PlayerComparison {
    PlayerComparison {
        first: first.map(|s| select_for_league(s, league)),
        second: second.map(|s| select_for_league(s, league)),
    }
}
