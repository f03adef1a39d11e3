//! `/standings` and table sorting.

use std::cmp::Ordering;

use serde_json::Value;

use super::raw::{RawStandingRow, RawStandingsEntry};
use super::{response_items, team_from_raw, NormalizeError};
use crate::calculate;
use crate::models::{SortConfig, SortDirection, StandingRow, StandingSortKey};

fn row_from_raw(raw: RawStandingRow) -> StandingRow {
    let all = raw.all.unwrap_or_default();
    let goals = all.goals.unwrap_or_default();
    StandingRow {
        rank: raw.rank.unwrap_or(0),
        team: team_from_raw(raw.team.as_ref()),
        played: all.played.unwrap_or(0),
        won: all.win.unwrap_or(0),
        drawn: all.draw.unwrap_or(0),
        lost: all.lose.unwrap_or(0),
        goals_for: goals.goals_for.unwrap_or(0),
        goals_against: goals.against.unwrap_or(0),
        points: raw.points.unwrap_or(0),
        form: raw.form.filter(|f| !f.is_empty()),
        description: raw.description,
        group: raw.group,
    }
}

/// Normalize a `/standings` body.
///
/// The provider nests one table per group; all groups are flattened in
/// order, each row keeping its group name.
pub fn standings(body: &Value) -> Result<Vec<StandingRow>, NormalizeError> {
    let entries: Vec<RawStandingsEntry> = response_items(body)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| e.league.and_then(|l| l.standings))
        .flatten()
        .flatten()
        .map(row_from_raw)
        .collect())
}

fn compare(a: &StandingRow, b: &StandingRow, key: StandingSortKey) -> Ordering {
    let ratio = |n: u32, d: u32| calculate::ratio(n, d);
    match key {
        StandingSortKey::Rank => a.rank.cmp(&b.rank),
        StandingSortKey::Team => a.team.name.to_lowercase().cmp(&b.team.name.to_lowercase()),
        StandingSortKey::Played => a.played.cmp(&b.played),
        StandingSortKey::Won => a.won.cmp(&b.won),
        StandingSortKey::Drawn => a.drawn.cmp(&b.drawn),
        StandingSortKey::Lost => a.lost.cmp(&b.lost),
        StandingSortKey::GoalsFor => a.goals_for.cmp(&b.goals_for),
        StandingSortKey::GoalsAgainst => a.goals_against.cmp(&b.goals_against),
        StandingSortKey::GoalDifference => a.goal_difference().cmp(&b.goal_difference()),
        StandingSortKey::Points => a.points.cmp(&b.points),
        StandingSortKey::PointsPerGame => {
            ratio(a.points, a.played).total_cmp(&ratio(b.points, b.played))
        }
        StandingSortKey::GoalsPerGame => {
            ratio(a.goals_for, a.played).total_cmp(&ratio(b.goals_for, b.played))
        }
        StandingSortKey::GoalsAgainstPerGame => {
            ratio(a.goals_against, a.played).total_cmp(&ratio(b.goals_against, b.played))
        }
        StandingSortKey::WinPercentage => ratio(a.won, a.played).total_cmp(&ratio(b.won, b.played)),
    }
}

/// Sort rows in place by the configured column. Ties keep provider order.
pub fn sort_rows(rows: &mut [StandingRow], config: SortConfig) {
    rows.sort_by(|a, b| {
        let ord = compare(a, b, config.key);
        match config.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
