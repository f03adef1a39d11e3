//! `/predictions`, `/teams/statistics` and the rule-based match preview.

use serde_json::Value;

use super::fixtures::fixture_from_raw;
use super::raw::{RawPredictionEntry, RawTeamStatistics, RawTotal};
use super::{response_items, response_object, team_from_raw, NormalizeError, NOT_AVAILABLE};
use crate::calculate;
use crate::models::{
    Fixture, HeadToHeadRecord, MatchPreview, OutcomePercent, Prediction, TeamSeasonStats,
};

/// Meetings summarized in a preview.
pub const PREVIEW_MEETINGS: usize = 5;

/// Normalize a `/predictions` body. `None` when the provider has no
/// prediction for the fixture.
pub fn prediction(body: &Value) -> Result<Option<Prediction>, NormalizeError> {
    let entries: Vec<RawPredictionEntry> = response_items(body)?;
    Ok(entries
        .into_iter()
        .find_map(|e| e.predictions)
        .map(|p| {
            let winner = p.winner.unwrap_or_default();
            let percent = p.percent.unwrap_or_default();
            let goals = p.goals.unwrap_or_default();
            Prediction {
                winner: winner.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                winner_comment: winner.comment,
                advice: p.advice.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                percent: OutcomePercent {
                    home: percent.home.unwrap_or_else(|| "0%".to_string()),
                    draw: percent.draw.unwrap_or_else(|| "0%".to_string()),
                    away: percent.away.unwrap_or_else(|| "0%".to_string()),
                },
                under_over: p.under_over,
                goals_home: goals.home,
                goals_away: goals.away,
            }
        }))
}

/// Past meetings bundled with a `/predictions` body, as the provider
/// orders them.
pub fn prediction_meetings(body: &Value) -> Result<Vec<Fixture>, NormalizeError> {
    let entries: Vec<RawPredictionEntry> = response_items(body)?;
    Ok(entries
        .into_iter()
        .next()
        .and_then(|e| e.h2h)
        .unwrap_or_default()
        .into_iter()
        .filter_map(fixture_from_raw)
        .collect())
}

fn total(raw: Option<&RawTotal>) -> u32 {
    raw.and_then(|t| t.total).unwrap_or(0)
}

/// Normalize a `/teams/statistics` body.
pub fn team_statistics(body: &Value) -> Result<Option<TeamSeasonStats>, NormalizeError> {
    let Some(raw): Option<RawTeamStatistics> = response_object(body)? else {
        return Ok(None);
    };
    let league = raw.league.unwrap_or_default();
    let fixtures = raw.fixtures.unwrap_or_default();
    let goals = raw.goals.unwrap_or_default();
    let goals_for = goals.goals_for.unwrap_or_default();
    let goals_against = goals.against.unwrap_or_default();

    Ok(Some(TeamSeasonStats {
        team: team_from_raw(raw.team.as_ref()),
        league_id: league.id,
        league_name: league.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        season: league.season,
        form: raw.form.filter(|f| !f.is_empty()),
        played: total(fixtures.played.as_ref()),
        wins: total(fixtures.wins.as_ref()),
        draws: total(fixtures.draws.as_ref()),
        losses: total(fixtures.loses.as_ref()),
        goals_for: total(goals_for.total.as_ref()),
        goals_against: total(goals_against.total.as_ref()),
        goals_for_average: goals_for.average.and_then(|a| a.total).unwrap_or(0.0),
        goals_against_average: goals_against.average.and_then(|a| a.total).unwrap_or(0.0),
        clean_sheets: total(raw.clean_sheet.as_ref()),
        failed_to_score: total(raw.failed_to_score.as_ref()),
    }))
}

fn form_block(stats: &TeamSeasonStats) -> String {
    let form = stats.form.as_deref().unwrap_or("");
    let last5 = calculate::last_n(form, 5);
    let streak = calculate::current_streak(&last5)
        .map(|s| s.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "{}:\n- Last 5 matches: {}\n- Current streak: {}\n- Recent form: {}\n- Style: {}",
        stats.team.name,
        if last5.is_empty() { NOT_AVAILABLE } else { last5.as_str() },
        streak,
        calculate::form_description(stats.form.as_deref()),
        stats.playing_style()
    )
}

fn meetings_block(fixture: &Fixture, meetings: &[Fixture]) -> Option<String> {
    let record = HeadToHeadRecord::new(
        fixture.home_team.id,
        fixture.away_team.id,
        meetings.iter().take(PREVIEW_MEETINGS).cloned().collect(),
    );
    let summary = record.summary();
    if summary.total_matches == 0 {
        return None;
    }
    let results: Vec<String> = record.finished().map(Fixture::scoreline).collect();
    Some(format!(
        "Head-to-Head (last {} meetings):\n{}\n\nRecord:\n- {} wins: {}\n- {} wins: {}\n- Draws: {}",
        summary.total_matches,
        results.join("\n"),
        fixture.home_team.name,
        summary.team_a_wins,
        fixture.away_team.name,
        summary.team_b_wins,
        summary.draws
    ))
}

/// Assemble a preview from whatever data is available. Missing prediction
/// or team statistics degrade to generic wording rather than failing.
pub fn match_preview(
    fixture: &Fixture,
    prediction: Option<&Prediction>,
    home_stats: Option<&TeamSeasonStats>,
    away_stats: Option<&TeamSeasonStats>,
    meetings: &[Fixture],
) -> MatchPreview {
    let home = &fixture.home_team.name;
    let away = &fixture.away_team.name;
    let mut preview = MatchPreview::default();

    match prediction {
        Some(p) => {
            preview.summary = format!(
                "Based on our analysis, {} is the predicted winner for this match with a {}% probability. {}",
                p.winner,
                p.percent.max_percent(),
                p.advice
            );
            preview.key_factors.push(format!("{} win probability: {}", home, p.percent.home));
            preview.key_factors.push(format!("Draw probability: {}", p.percent.draw));
            preview.key_factors.push(format!("{} win probability: {}", away, p.percent.away));
            preview.recommendation = p.advice.clone();
        }
        None => {
            let date = fixture
                .day()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "TBD".to_string());
            preview.summary = format!(
                "This match between {} and {} in the {} on {} promises to be an interesting encounter.",
                home, away, fixture.league.name, date
            );
            preview
                .key_factors
                .push("Historical performance between these teams".to_string());
            preview.key_factors.push("Current form and momentum".to_string());
            preview.key_factors.push(format!("Home advantage for {}", home));
            preview.recommendation =
                "Watch this match for an exciting display of football.".to_string();
        }
    }

    match (home_stats, away_stats) {
        (Some(h), Some(a)) => {
            for stats in [h, a] {
                preview.key_factors.push(format!(
                    "{} has scored {} goals this season ({} per game)",
                    stats.team.name,
                    stats.goals_for,
                    stats.goals_per_game()
                ));
            }
            for stats in [h, a] {
                preview.key_factors.push(format!(
                    "{} has conceded {} goals this season",
                    stats.team.name, stats.goals_against
                ));
            }
            preview.form_analysis = format!("{}\n\n{}", form_block(h), form_block(a));
        }
        _ => preview.form_analysis = "Form data not available.".to_string(),
    }

    preview.head_to_head = meetings_block(fixture, meetings);
    preview
}
