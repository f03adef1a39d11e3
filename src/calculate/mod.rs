//! Derived metric calculation.
//!
//! Every ratio here divides by `max(denominator, 1)`, so a team or player
//! with zero matches reports `0.00` / `0.0` rather than NaN or infinity.
//! Display strings are produced at data-preparation time:
//! - per-game rates: 2 decimals
//! - percentages: 1 decimal

use serde::{Deserialize, Serialize};

/// `numerator / max(denominator, 1)`.
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

/// Per-game rate formatted to 2 decimals, e.g. `per_game(20, 10) == "2.00"`.
pub fn per_game(total: u32, played: u32) -> String {
    format!("{:.2}", ratio(total, played))
}

/// Percentage formatted to 1 decimal, e.g. `percentage(6, 10) == "60.0"`.
pub fn percentage(part: u32, whole: u32) -> String {
    format!("{:.1}", ratio(part, whole) * 100.0)
}

/// Signed goal difference.
pub fn goal_difference(goals_for: u32, goals_against: u32) -> i64 {
    goals_for as i64 - goals_against as i64
}

/// Single match result letter in a form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            FormResult::Win => "wins",
            FormResult::Draw => "draws",
            FormResult::Loss => "losses",
        }
    }
}

/// Parse a provider form string ("WWDLW", oldest first). Unknown letters
/// are skipped.
pub fn parse_form(form: &str) -> Vec<FormResult> {
    form.chars().filter_map(FormResult::from_char).collect()
}

/// The last `n` results of a form string, as a string.
pub fn last_n(form: &str, n: usize) -> String {
    let chars: Vec<char> = form.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}

/// Current run of identical results at the end of a form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub result: FormResult,
    pub length: u32,
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.length, self.result.plural())
    }
}

/// Streak at the end of the form string; `None` for an empty form.
pub fn current_streak(form: &str) -> Option<Streak> {
    let results = parse_form(form);
    let last = *results.last()?;
    let length = results.iter().rev().take_while(|r| **r == last).count() as u32;
    Some(Streak {
        result: last,
        length,
    })
}

/// "3W 1D 1L in last 5 matches", or "N/A" without form data.
pub fn form_description(form: Option<&str>) -> String {
    let Some(form) = form.filter(|f| !f.is_empty()) else {
        return "N/A".to_string();
    };
    let recent = parse_form(&last_n(form, 5));
    let count = |r: FormResult| recent.iter().filter(|x| **x == r).count();
    format!(
        "{}W {}D {}L in last 5 matches",
        count(FormResult::Win),
        count(FormResult::Draw),
        count(FormResult::Loss)
    )
}

/// Coarse playing-style label from average goals scored/conceded per game.
pub fn playing_style(goals_for_avg: f64, goals_against_avg: f64) -> &'static str {
    if goals_for_avg > 2.0 && goals_against_avg > 1.5 {
        "Attacking, high-scoring"
    } else if goals_for_avg > 2.0 && goals_against_avg < 1.0 {
        "Dominant, balanced"
    } else if goals_for_avg < 1.5 && goals_against_avg < 1.0 {
        "Defensive, low-scoring"
    } else {
        "Balanced"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(5, 0), 5.0);
        assert!(ratio(7, 0).is_finite());
    }

    #[test]
    fn test_per_game_formatting() {
        assert_eq!(per_game(20, 10), "2.00");
        assert_eq!(per_game(8, 10), "0.80");
        assert_eq!(per_game(0, 0), "0.00");
        assert_eq!(per_game(10, 3), "3.33");
    }

    #[test]
    fn test_percentage_formatting() {
        assert_eq!(percentage(6, 10), "60.0");
        assert_eq!(percentage(0, 0), "0.0");
        assert_eq!(percentage(1, 3), "33.3");
    }

    #[test]
    fn test_goal_difference_negative() {
        assert_eq!(goal_difference(20, 8), 12);
        assert_eq!(goal_difference(3, 9), -6);
    }

    #[test]
    fn test_current_streak() {
        let streak = current_streak("LDWWW").unwrap();
        assert_eq!(streak.result, FormResult::Win);
        assert_eq!(streak.length, 3);
        assert_eq!(streak.to_string(), "3 wins");

        assert_eq!(current_streak("WL").unwrap().to_string(), "1 losses");
        assert!(current_streak("").is_none());
    }

    #[test]
    fn test_form_description_uses_last_five() {
        assert_eq!(
            form_description(Some("LLLLWWDLW")),
            "3W 1D 1L in last 5 matches"
        );
        assert_eq!(form_description(None), "N/A");
        assert_eq!(form_description(Some("")), "N/A");
    }

    #[test]
    fn test_last_n_short_form() {
        assert_eq!(last_n("WD", 5), "WD");
        assert_eq!(last_n("WWDLLW", 5), "WDLLW");
    }

    #[test]
    fn test_playing_style() {
        assert_eq!(playing_style(2.4, 1.8), "Attacking, high-scoring");
        assert_eq!(playing_style(2.4, 0.7), "Dominant, balanced");
        assert_eq!(playing_style(1.1, 0.8), "Defensive, low-scoring");
        assert_eq!(playing_style(1.6, 1.2), "Balanced");
    }
}
