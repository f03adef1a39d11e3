//! Provider predictions, team season statistics and rule-based previews.

use serde::{Deserialize, Serialize};

use super::{LeagueId, Team};
use crate::calculate;

/// Win/draw/win probabilities as provider percentage strings ("45%").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomePercent {
    pub home: String,
    pub draw: String,
    pub away: String,
}

impl OutcomePercent {
    /// Largest of the three probabilities, as a number.
    pub fn max_percent(&self) -> f64 {
        [&self.home, &self.draw, &self.away]
            .iter()
            .filter_map(|p| p.trim().trim_end_matches('%').trim().parse::<f64>().ok())
            .fold(0.0, f64::max)
    }
}

/// The provider's prediction for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted winner name; "N/A" when the provider has none
    pub winner: String,
    pub winner_comment: Option<String>,
    pub advice: String,
    pub percent: OutcomePercent,
    pub under_over: Option<String>,
    pub goals_home: Option<String>,
    pub goals_away: Option<String>,
}

/// A team's aggregate numbers for one league season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    pub team: Team,
    pub league_id: Option<LeagueId>,
    pub league_name: String,
    pub season: Option<i32>,
    pub form: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goals_for_average: f64,
    pub goals_against_average: f64,
    pub clean_sheets: u32,
    pub failed_to_score: u32,
}

impl TeamSeasonStats {
    pub fn win_percentage(&self) -> String {
        calculate::percentage(self.wins, self.played)
    }

    pub fn goals_per_game(&self) -> String {
        calculate::per_game(self.goals_for, self.played)
    }

    pub fn clean_sheet_percentage(&self) -> String {
        calculate::percentage(self.clean_sheets, self.played)
    }

    pub fn playing_style(&self) -> &'static str {
        calculate::playing_style(self.goals_for_average, self.goals_against_average)
    }

    pub fn view(&self) -> TeamSeasonView<'_> {
        TeamSeasonView {
            stats: self,
            win_percentage: self.win_percentage(),
            goals_per_game: self.goals_per_game(),
            clean_sheet_percentage: self.clean_sheet_percentage(),
            form_description: calculate::form_description(self.form.as_deref()),
            playing_style: self.playing_style(),
        }
    }
}

/// Serialized team statistics with derived columns.
#[derive(Debug, Serialize)]
pub struct TeamSeasonView<'a> {
    #[serde(flatten)]
    pub stats: &'a TeamSeasonStats,
    pub win_percentage: String,
    pub goals_per_game: String,
    pub clean_sheet_percentage: String,
    pub form_description: String,
    pub playing_style: &'static str,
}

/// Rule-based match preview assembled from prediction and team data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchPreview {
    pub summary: String,
    pub key_factors: Vec<String>,
    pub form_analysis: String,
    pub head_to_head: Option<String>,
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamId;

    #[test]
    fn test_max_percent() {
        let p = OutcomePercent {
            home: "45%".to_string(),
            draw: "10%".to_string(),
            away: "45 %".to_string(),
        };
        assert_eq!(p.max_percent(), 45.0);
        assert_eq!(OutcomePercent::default().max_percent(), 0.0);
    }

    #[test]
    fn test_team_season_zero_played() {
        let stats = TeamSeasonStats {
            team: Team::new(TeamId::new(1), "Arsenal"),
            league_id: None,
            league_name: String::new(),
            season: None,
            form: None,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goals_for_average: 0.0,
            goals_against_average: 0.0,
            clean_sheets: 0,
            failed_to_score: 0,
        };
        assert_eq!(stats.win_percentage(), "0.0");
        assert_eq!(stats.goals_per_game(), "0.00");
        assert_eq!(stats.clean_sheet_percentage(), "0.0");
        let view = serde_json::to_value(stats.view()).unwrap();
        assert_eq!(view["form_description"], "N/A");
        assert_eq!(view["playing_style"], "Defensive, low-scoring");
    }
}
