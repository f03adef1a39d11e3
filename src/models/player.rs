//! Player records: profiles, per-competition statistics, squads, leaders.

use serde::{Deserialize, Serialize};

use super::{LeagueId, PlayerId, Team};

/// Biographical player data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
    pub photo: Option<String>,
    pub age: Option<u32>,
    pub nationality: Option<String>,
}

/// Appearances block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamesStats {
    pub appearances: u32,
    pub minutes: u32,
    /// "N/A" when the provider gives none
    pub position: String,
    pub rating: Option<String>,
}

/// Goals block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalStats {
    pub total: u32,
    pub assists: u32,
}

/// Disciplinary block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    pub yellow: u32,
    pub red: u32,
}

/// A player's numbers for one team in one league and season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub team: Team,
    pub league_id: Option<LeagueId>,
    pub league_name: String,
    pub season: Option<i32>,
    pub games: GamesStats,
    pub goals: GoalStats,
    pub cards: CardStats,
}

/// A player with every league/season entry the provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub player: PlayerProfile,
    pub entries: Vec<PlayerSeasonStats>,
}

/// Entries chosen for the active league filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSelection {
    pub player: PlayerProfile,
    pub entries: Vec<PlayerSeasonStats>,
    /// Set when no entry matched the requested league and all entries
    /// are shown instead
    pub fallback_notice: Option<String>,
}

impl StatsSelection {
    pub fn is_fallback(&self) -> bool {
        self.fallback_notice.is_some()
    }

    /// The entry to headline (first selected), if any.
    pub fn primary(&self) -> Option<&PlayerSeasonStats> {
        self.entries.first()
    }
}

/// Squad list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlayer {
    pub id: PlayerId,
    pub name: String,
    pub age: Option<u32>,
    pub number: Option<u32>,
    pub position: Option<String>,
    pub photo: Option<String>,
}

/// A team's current squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub team: Team,
    pub players: Vec<SquadPlayer>,
}

/// Top scorer / top assist provider entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPlayer {
    pub player: PlayerProfile,
    pub team: Option<Team>,
    pub goals: u32,
    pub assists: u32,
    pub appearances: u32,
}

/// Stat plotted on the player trend screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStat {
    #[default]
    Goals,
    Assists,
    Minutes,
    /// Yellow + red
    Cards,
}

impl TrendStat {
    pub fn label(&self) -> &'static str {
        match self {
            TrendStat::Goals => "Goals",
            TrendStat::Assists => "Assists",
            TrendStat::Minutes => "Minutes Played",
            TrendStat::Cards => "Cards (Yellow + Red)",
        }
    }

    /// Read this stat from one entry.
    pub fn value(&self, stats: &PlayerSeasonStats) -> u32 {
        match self {
            TrendStat::Goals => stats.goals.total,
            TrendStat::Assists => stats.goals.assists,
            TrendStat::Minutes => stats.games.minutes,
            TrendStat::Cards => stats.cards.yellow + stats.cards.red,
        }
    }
}

impl std::str::FromStr for TrendStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "goals" => Ok(TrendStat::Goals),
            "assists" => Ok(TrendStat::Assists),
            "minutes" => Ok(TrendStat::Minutes),
            "cards" => Ok(TrendStat::Cards),
            other => Err(format!("unknown stat: {}", other)),
        }
    }
}

/// One point of a season-over-season trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub season: i32,
    pub value: u32,
    /// False when the provider had no entry for that season
    pub has_data: bool,
}

/// Season trend for one stat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTrend {
    pub player_id: PlayerId,
    pub stat: TrendStat,
    pub label: &'static str,
    pub points: Vec<TrendPoint>,
}

/// Two players side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub first: Option<StatsSelection>,
    pub second: Option<StatsSelection>,
}
