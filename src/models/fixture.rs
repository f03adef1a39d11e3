//! Fixture (match) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{FixtureId, LeagueId, Team, TeamId};

/// Match status, keyed on the provider's short status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "raw", rename_all = "snake_case")]
pub enum StatusCode {
    /// TBD, NS
    Scheduled,
    /// 1H, 2H, ET, BT, P, SUSP, INT, LIVE
    InPlay,
    /// HT
    HalfTime,
    /// FT, AET, PEN
    Finished,
    /// PST
    Postponed,
    /// CANC, ABD, AWD, WO
    Cancelled,
    Unknown(String),
}

impl StatusCode {
    /// Map a provider short code into the status vocabulary.
    pub fn from_short(short: &str) -> Self {
        match short.trim() {
            "TBD" | "NS" => StatusCode::Scheduled,
            "1H" | "2H" | "ET" | "BT" | "P" | "SUSP" | "INT" | "LIVE" => StatusCode::InPlay,
            "HT" => StatusCode::HalfTime,
            "FT" | "AET" | "PEN" => StatusCode::Finished,
            "PST" => StatusCode::Postponed,
            "CANC" | "ABD" | "AWD" | "WO" => StatusCode::Cancelled,
            other => StatusCode::Unknown(other.to_string()),
        }
    }

    /// Whether a score is meaningful to show (match underway or done).
    pub fn has_score(&self) -> bool {
        matches!(
            self,
            StatusCode::InPlay | StatusCode::HalfTime | StatusCode::Finished
        )
    }

    pub fn is_live(&self) -> bool {
        matches!(self, StatusCode::InPlay | StatusCode::HalfTime)
    }
}

/// Match status as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureStatus {
    pub code: StatusCode,
    /// Provider short code as received, e.g. "FT"
    pub short: String,
    /// Human-readable status, e.g. "Match Finished"
    pub long: String,
    pub elapsed_minutes: Option<u32>,
}

impl FixtureStatus {
    pub fn from_short(short: &str) -> Self {
        Self {
            code: StatusCode::from_short(short),
            short: short.to_string(),
            long: String::new(),
            elapsed_minutes: None,
        }
    }

    /// Strictly "FT", the only status the recent-results list accepts.
    pub fn is_full_time(&self) -> bool {
        self.short == "FT"
    }
}

/// League context a fixture belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRef {
    pub id: LeagueId,
    pub name: String,
    pub season: Option<i32>,
    pub round: Option<String>,
}

/// A single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    /// Kick-off time; `None` when the provider date is missing or malformed
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub status: FixtureStatus,
    pub home_team: Team,
    pub away_team: Team,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub league: LeagueRef,
}

/// Result of a finished fixture from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Fixture {
    /// Calendar day of kick-off (UTC).
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|d| d.date_naive())
    }

    /// Outcome by goals; unplayed fixtures (no goals) have none.
    pub fn outcome(&self) -> Option<Outcome> {
        let (home, away) = (self.home_goals?, self.away_goals?);
        Some(match home.cmp(&away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        })
    }

    /// Goals scored by `team` in this fixture, 0 if it did not take part.
    pub fn goals_for(&self, team: TeamId) -> u32 {
        if self.home_team.id == team {
            self.home_goals.unwrap_or(0)
        } else if self.away_team.id == team {
            self.away_goals.unwrap_or(0)
        } else {
            0
        }
    }

    /// "Home 2 - 1 Away", or "Home vs Away" before kick-off.
    pub fn scoreline(&self) -> String {
        match (self.home_goals, self.away_goals) {
            (Some(h), Some(a)) if self.status.code.has_score() => format!(
                "{} {} - {} {}",
                self.home_team.name, h, a, self.away_team.name
            ),
            _ => format!("{} vs {}", self.home_team.name, self.away_team.name),
        }
    }
}

/// Kind of an in-match event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Goal,
    Card,
    Substitution,
    Var,
    Other,
}

impl EventKind {
    pub fn from_provider(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "goal" => EventKind::Goal,
            "card" => EventKind::Card,
            "subst" => EventKind::Substitution,
            "var" => EventKind::Var,
            _ => EventKind::Other,
        }
    }
}

/// One entry of a fixture's event timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: Option<u32>,
    pub extra_minute: Option<u32>,
    pub team_id: TeamId,
    pub team_name: String,
    pub player: Option<String>,
    pub assist: Option<String>,
    pub kind: EventKind,
    /// e.g. "Normal Goal", "Yellow Card"
    pub detail: String,
}

/// A goal as listed under a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub scorer: String,
    pub minute: Option<u32>,
    pub assist: Option<String>,
}

/// Goals and assist providers for one side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideGoals {
    pub goals: Vec<Goal>,
    pub assists: Vec<String>,
}

/// Goal breakdown for both sides of a fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub home: SideGoals,
    pub away: SideGoals,
}

/// One row of the side-by-side statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    /// Provider stat type, e.g. "Ball Possession"
    pub kind: String,
    /// Display label, e.g. "Possession"
    pub label: String,
    pub home: String,
    pub away: String,
}

/// Side-by-side match statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub lines: Vec<StatLine>,
}

impl MatchStatistics {
    pub fn line(&self, kind: &str) -> Option<&StatLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(home_goals: Option<u32>, away_goals: Option<u32>, short: &str) -> Fixture {
        Fixture {
            id: FixtureId::new(1),
            date: None,
            venue: None,
            status: FixtureStatus::from_short(short),
            home_team: Team::new(TeamId::new(1), "Arsenal"),
            away_team: Team::new(TeamId::new(2), "Chelsea"),
            home_goals,
            away_goals,
            league: LeagueRef {
                id: LeagueId::new(39),
                name: "Premier League".to_string(),
                season: Some(2024),
                round: None,
            },
        }
    }

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(StatusCode::from_short("NS"), StatusCode::Scheduled);
        assert_eq!(StatusCode::from_short("2H"), StatusCode::InPlay);
        assert_eq!(StatusCode::from_short("HT"), StatusCode::HalfTime);
        assert_eq!(StatusCode::from_short("PEN"), StatusCode::Finished);
        assert_eq!(StatusCode::from_short("PST"), StatusCode::Postponed);
        assert_eq!(StatusCode::from_short("ABD"), StatusCode::Cancelled);
        assert_eq!(
            StatusCode::from_short("XYZ"),
            StatusCode::Unknown("XYZ".to_string())
        );
    }

    #[test]
    fn test_live_status() {
        assert!(StatusCode::HalfTime.is_live());
        assert!(!StatusCode::Finished.is_live());
        assert!(StatusCode::Finished.has_score());
        assert!(!StatusCode::Scheduled.has_score());
    }

    #[test]
    fn test_outcome() {
        assert_eq!(fixture(Some(2), Some(1), "FT").outcome(), Some(Outcome::HomeWin));
        assert_eq!(fixture(Some(0), Some(3), "FT").outcome(), Some(Outcome::AwayWin));
        assert_eq!(fixture(Some(1), Some(1), "FT").outcome(), Some(Outcome::Draw));
        assert_eq!(fixture(None, None, "NS").outcome(), None);
    }

    #[test]
    fn test_goals_for() {
        let f = fixture(Some(2), Some(1), "FT");
        assert_eq!(f.goals_for(TeamId::new(1)), 2);
        assert_eq!(f.goals_for(TeamId::new(2)), 1);
        assert_eq!(f.goals_for(TeamId::new(99)), 0);
    }

    #[test]
    fn test_scoreline() {
        assert_eq!(fixture(Some(2), Some(1), "FT").scoreline(), "Arsenal 2 - 1 Chelsea");
        assert_eq!(fixture(None, None, "NS").scoreline(), "Arsenal vs Chelsea");
    }

    #[test]
    fn test_event_kind_from_provider() {
        assert_eq!(EventKind::from_provider("Goal"), EventKind::Goal);
        assert_eq!(EventKind::from_provider("subst"), EventKind::Substitution);
        assert_eq!(EventKind::from_provider("Var"), EventKind::Var);
        assert_eq!(EventKind::from_provider("whatever"), EventKind::Other);
    }
}
