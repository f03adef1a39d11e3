//! Provider wire types.
//!
//! Every field is optional: the provider omits or nulls fields freely, and
//! numbers sometimes arrive as strings ("1.7", "55%").

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{FixtureId, LeagueId, PlayerId, TeamId};

/// Number or numeric string, anything else is `None`.
fn flex_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }))
}

fn flex_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(flex_f64(d)?.filter(|n| *n >= 0.0).map(|n| n as u32))
}

/// String, or a number rendered as a string.
fn flex_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

// ── Shared ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    pub id: Option<TeamId>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub founded: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVenue {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNamed {
    pub id: Option<PlayerId>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTotal {
    #[serde(default, deserialize_with = "flex_u32")]
    pub total: Option<u32>,
}

// ── Leagues / teams ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeagueEntry {
    pub league: Option<RawLeague>,
    pub country: Option<RawCountry>,
    pub seasons: Option<Vec<RawSeason>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeague {
    pub id: Option<LeagueId>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCountry {
    pub name: Option<String>,
    pub code: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSeason {
    pub year: Option<i32>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub current: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamEntry {
    pub team: Option<RawTeam>,
    pub venue: Option<RawVenue>,
}

// ── Fixtures ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFixtureEntry {
    pub fixture: Option<RawFixtureInfo>,
    pub league: Option<RawFixtureLeague>,
    pub teams: Option<RawSides>,
    pub goals: Option<RawGoals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFixtureInfo {
    pub id: Option<FixtureId>,
    pub date: Option<String>,
    pub venue: Option<RawVenue>,
    pub status: Option<RawStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    pub long: Option<String>,
    pub short: Option<String>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub elapsed: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFixtureLeague {
    pub id: Option<LeagueId>,
    pub name: Option<String>,
    pub season: Option<i32>,
    pub round: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSides {
    pub home: Option<RawTeam>,
    pub away: Option<RawTeam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGoals {
    #[serde(default, deserialize_with = "flex_u32")]
    pub home: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFixtureStatistics {
    pub team: Option<RawTeam>,
    pub statistics: Option<Vec<RawStat>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStat {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    pub time: Option<RawEventTime>,
    pub team: Option<RawTeam>,
    pub player: Option<RawNamed>,
    pub assist: Option<RawNamed>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventTime {
    #[serde(default, deserialize_with = "flex_u32")]
    pub elapsed: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub extra: Option<u32>,
}

// ── Standings ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStandingsEntry {
    pub league: Option<RawStandingsLeague>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStandingsLeague {
    pub standings: Option<Vec<Vec<RawStandingRow>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStandingRow {
    #[serde(default, deserialize_with = "flex_u32")]
    pub rank: Option<u32>,
    pub team: Option<RawTeam>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub points: Option<u32>,
    pub group: Option<String>,
    pub form: Option<String>,
    pub description: Option<String>,
    pub all: Option<RawRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "flex_u32")]
    pub played: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub win: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub draw: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub lose: Option<u32>,
    pub goals: Option<RawForAgainst>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForAgainst {
    #[serde(rename = "for", default, deserialize_with = "flex_u32")]
    pub goals_for: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub against: Option<u32>,
}

// ── Players ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerEntry {
    pub player: Option<RawPlayer>,
    pub statistics: Option<Vec<RawPlayerStats>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    pub id: Option<PlayerId>,
    pub name: Option<String>,
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub age: Option<u32>,
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub number: Option<u32>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerStats {
    pub team: Option<RawTeam>,
    pub league: Option<RawFixtureLeague>,
    pub games: Option<RawGames>,
    pub goals: Option<RawPlayerGoals>,
    pub cards: Option<RawCards>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGames {
    /// The provider spells it "appearences".
    #[serde(rename = "appearences", alias = "appearances", default, deserialize_with = "flex_u32")]
    pub appearances: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub minutes: Option<u32>,
    pub position: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerGoals {
    #[serde(default, deserialize_with = "flex_u32")]
    pub total: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub assists: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCards {
    #[serde(default, deserialize_with = "flex_u32")]
    pub yellow: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    pub red: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSquadEntry {
    pub team: Option<RawTeam>,
    pub players: Option<Vec<RawPlayer>>,
}

// ── Transfers ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransferEntry {
    pub player: Option<RawNamed>,
    pub transfers: Option<Vec<RawTransfer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransfer {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub teams: Option<RawTransferTeams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransferTeams {
    #[serde(rename = "in")]
    pub to: Option<RawTeam>,
    #[serde(rename = "out")]
    pub from: Option<RawTeam>,
}

// ── Predictions / team statistics ───────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPredictionEntry {
    pub predictions: Option<RawPrediction>,
    pub h2h: Option<Vec<RawFixtureEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrediction {
    pub winner: Option<RawWinner>,
    pub under_over: Option<String>,
    pub goals: Option<RawPredictedGoals>,
    pub advice: Option<String>,
    pub percent: Option<RawPercent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWinner {
    pub name: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPredictedGoals {
    #[serde(default, deserialize_with = "flex_string")]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    pub away: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPercent {
    #[serde(default, deserialize_with = "flex_string")]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    pub draw: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    pub away: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamStatistics {
    pub league: Option<RawFixtureLeague>,
    pub team: Option<RawTeam>,
    pub form: Option<String>,
    pub fixtures: Option<RawTeamFixtures>,
    pub goals: Option<RawTeamGoals>,
    pub clean_sheet: Option<RawTotal>,
    pub failed_to_score: Option<RawTotal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamFixtures {
    pub played: Option<RawTotal>,
    pub wins: Option<RawTotal>,
    pub draws: Option<RawTotal>,
    pub loses: Option<RawTotal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamGoals {
    #[serde(rename = "for")]
    pub goals_for: Option<RawGoalSide>,
    pub against: Option<RawGoalSide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGoalSide {
    pub total: Option<RawTotal>,
    pub average: Option<RawAverage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAverage {
    #[serde(default, deserialize_with = "flex_f64")]
    pub total: Option<f64>,
}
