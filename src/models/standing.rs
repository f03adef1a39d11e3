//! League table rows.

use serde::{Deserialize, Serialize};

use super::Team;
use crate::calculate;

/// A league table row as reported by the provider.
///
/// Derived columns are methods, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    /// Recent results, oldest first ("WWDLW")
    pub form: Option<String>,
    /// Qualification note, e.g. "Promotion - Champions League"
    pub description: Option<String>,
    /// Table group for multi-group competitions
    pub group: Option<String>,
}

impl StandingRow {
    pub fn goal_difference(&self) -> i64 {
        calculate::goal_difference(self.goals_for, self.goals_against)
    }

    pub fn points_per_game(&self) -> String {
        calculate::per_game(self.points, self.played)
    }

    pub fn goals_per_game(&self) -> String {
        calculate::per_game(self.goals_for, self.played)
    }

    pub fn goals_against_per_game(&self) -> String {
        calculate::per_game(self.goals_against, self.played)
    }

    pub fn win_percentage(&self) -> String {
        calculate::percentage(self.won, self.played)
    }

    /// Row plus derived columns, ready to serialize.
    pub fn view(&self) -> StandingView<'_> {
        StandingView {
            row: self,
            goal_difference: self.goal_difference(),
            points_per_game: self.points_per_game(),
            goals_per_game: self.goals_per_game(),
            goals_against_per_game: self.goals_against_per_game(),
            win_percentage: self.win_percentage(),
        }
    }
}

/// Serialized table row with derived columns.
#[derive(Debug, Serialize)]
pub struct StandingView<'a> {
    #[serde(flatten)]
    pub row: &'a StandingRow,
    pub goal_difference: i64,
    pub points_per_game: String,
    pub goals_per_game: String,
    pub goals_against_per_game: String,
    pub win_percentage: String,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingSortKey {
    #[default]
    Rank,
    Team,
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    Points,
    PointsPerGame,
    GoalsPerGame,
    GoalsAgainstPerGame,
    WinPercentage,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Flip direction; re-clicking the active column toggles it.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Parse a snake_case variant name ("points_per_game", "desc").
fn parse_variant<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    use serde::de::IntoDeserializer;
    let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        s.trim().into_deserializer();
    T::deserialize(de).map_err(|e| e.to_string())
}

impl std::str::FromStr for StandingSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s)
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s)
    }
}

/// Active sort column and direction of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: StandingSortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Select `key`: same column toggles the direction, a new column
    /// starts ascending.
    pub fn select(self, key: StandingSortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}
