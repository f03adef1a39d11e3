//! `/fixtures`, `/fixtures/events`, `/fixtures/statistics` and
//! `/fixtures/headtohead`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::raw::{RawEvent, RawFixtureEntry, RawFixtureStatistics};
use super::{response_items, team_from_raw, NormalizeError, NOT_AVAILABLE};
use crate::models::{
    EventKind, Fixture, FixtureStatus, Goal, GoalSummary, HeadToHeadRecord, LeagueRef,
    MatchEvent, MatchStatistics, SideGoals, StatLine, StatusCode, TeamId,
};

/// How many fixtures the dashboard lists per section.
pub const DASHBOARD_LIMIT: usize = 5;

/// Provider stat types shown in the side-by-side table, with labels.
pub const STAT_TYPES: &[(&str, &str)] = &[
    ("Ball Possession", "Possession"),
    ("Total Shots", "Total Shots"),
    ("Shots on Goal", "Shots on Goal"),
    ("Shots off Goal", "Shots off Goal"),
    ("Shots insidebox", "Shots Inside Box"),
    ("Shots outsidebox", "Shots Outside Box"),
    ("Blocked Shots", "Blocked Shots"),
    ("Total passes", "Total Passes"),
    ("Passes accurate", "Accurate Passes"),
    ("Passes %", "Pass Accuracy"),
    ("Fouls", "Fouls"),
    ("Yellow Cards", "Yellow Cards"),
    ("Red Cards", "Red Cards"),
    ("Goalkeeper Saves", "Goalkeeper Saves"),
    ("Corner Kicks", "Corner Kicks"),
    ("Offsides", "Offsides"),
];

fn parse_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

pub(super) fn fixture_from_raw(entry: RawFixtureEntry) -> Option<Fixture> {
    let info = entry.fixture?;
    let id = info.id?;
    let status = info.status.unwrap_or_default();
    let short = status.short.unwrap_or_default();
    let league = entry.league.unwrap_or_default();
    let teams = entry.teams.unwrap_or_default();
    let goals = entry.goals.unwrap_or_default();

    Some(Fixture {
        id,
        date: parse_date(info.date.as_deref()),
        venue: info.venue.and_then(|v| v.name),
        status: FixtureStatus {
            code: StatusCode::from_short(&short),
            short,
            long: status.long.unwrap_or_default(),
            elapsed_minutes: status.elapsed,
        },
        home_team: team_from_raw(teams.home.as_ref()),
        away_team: team_from_raw(teams.away.as_ref()),
        home_goals: goals.home,
        away_goals: goals.away,
        league: LeagueRef {
            id: league.id.unwrap_or_default(),
            name: league.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            season: league.season,
            round: league.round,
        },
    })
}

/// Normalize a `/fixtures` body. Entries without a fixture id are dropped.
pub fn fixtures(body: &Value) -> Result<Vec<Fixture>, NormalizeError> {
    let entries: Vec<RawFixtureEntry> = response_items(body)?;
    Ok(entries.into_iter().filter_map(fixture_from_raw).collect())
}

/// Distinct round names in first-seen order.
pub fn rounds(fixtures: &[Fixture]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for round in fixtures.iter().filter_map(|f| f.league.round.as_ref()) {
        if !seen.contains(round) {
            seen.push(round.clone());
        }
    }
    seen
}

/// Fixtures of one round.
pub fn by_round<'a>(fixtures: &'a [Fixture], round: &str) -> Vec<&'a Fixture> {
    fixtures
        .iter()
        .filter(|f| f.league.round.as_deref() == Some(round))
        .collect()
}

/// Fixtures dated after `today`, soonest first, at most `limit`.
pub fn upcoming(fixtures: &[Fixture], today: NaiveDate, limit: usize) -> Vec<Fixture> {
    let mut list: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| f.day().is_some_and(|d| d > today))
        .cloned()
        .collect();
    list.sort_by_key(|f| f.date);
    list.truncate(limit);
    list
}

/// Full-time fixtures dated on or before `today`, newest first, at most
/// `limit`.
pub fn recent_results(fixtures: &[Fixture], today: NaiveDate, limit: usize) -> Vec<Fixture> {
    let mut list: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| f.day().is_some_and(|d| d <= today) && f.status.is_full_time())
        .cloned()
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    list.truncate(limit);
    list
}

/// Normalize a `/fixtures/events` body.
pub fn events(body: &Value) -> Result<Vec<MatchEvent>, NormalizeError> {
    let raw: Vec<RawEvent> = response_items(body)?;
    Ok(raw
        .into_iter()
        .map(|e| {
            let time = e.time.unwrap_or_default();
            let team = team_from_raw(e.team.as_ref());
            MatchEvent {
                minute: time.elapsed,
                extra_minute: time.extra,
                team_id: team.id,
                team_name: team.name,
                player: e.player.and_then(|p| p.name),
                assist: e.assist.and_then(|p| p.name),
                kind: EventKind::from_provider(e.kind.as_deref().unwrap_or("")),
                detail: e.detail.unwrap_or_default(),
            }
        })
        .collect())
}

/// Goals and assists per side. Goals credited to any team other than
/// `home` count for the away side.
pub fn goal_summary(events: &[MatchEvent], home: TeamId) -> GoalSummary {
    let mut summary = GoalSummary::default();
    for event in events.iter().filter(|e| e.kind == EventKind::Goal) {
        let side: &mut SideGoals = if event.team_id == home {
            &mut summary.home
        } else {
            &mut summary.away
        };
        side.goals.push(Goal {
            scorer: event
                .player
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            minute: event.minute,
            assist: event.assist.clone(),
        });
        if let Some(assist) = &event.assist {
            side.assists.push(assist.clone());
        }
    }
    summary
}

/// Normalize a `/fixtures/statistics` body into the fixed side-by-side
/// table. The first entry is the home side; absent values read "0".
pub fn statistics(body: &Value) -> Result<MatchStatistics, NormalizeError> {
    let sides: Vec<RawFixtureStatistics> = response_items(body)?;
    let value_of = |side: usize, kind: &str| -> String {
        sides
            .get(side)
            .and_then(|s| s.statistics.as_ref())
            .and_then(|stats| stats.iter().find(|st| st.kind.as_deref() == Some(kind)))
            .and_then(|st| st.value.clone())
            .unwrap_or_else(|| "0".to_string())
    };

    Ok(MatchStatistics {
        home_team: sides
            .first()
            .and_then(|s| s.team.as_ref())
            .and_then(|t| t.name.clone()),
        away_team: sides
            .get(1)
            .and_then(|s| s.team.as_ref())
            .and_then(|t| t.name.clone()),
        lines: STAT_TYPES
            .iter()
            .map(|(kind, label)| StatLine {
                kind: kind.to_string(),
                label: label.to_string(),
                home: value_of(0, kind),
                away: value_of(1, kind),
            })
            .collect(),
    })
}

/// Normalize a `/fixtures/headtohead` body into a record between `team_a`
/// and `team_b`, newest meeting first.
pub fn head_to_head(
    body: &Value,
    team_a: TeamId,
    team_b: TeamId,
) -> Result<HeadToHeadRecord, NormalizeError> {
    let mut meetings = fixtures(body)?;
    meetings.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(HeadToHeadRecord::new(team_a, team_b, meetings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixtureId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry(id: u32, date: &str, short: &str, round: &str, goals: (Value, Value)) -> Value {
        json!({
            "fixture": {
                "id": id,
                "date": date,
                "venue": {"name": "Emirates Stadium"},
                "status": {"long": "Whatever", "short": short, "elapsed": null}
            },
            "league": {"id": 39, "name": "Premier League", "season": 2024, "round": round},
            "teams": {
                "home": {"id": 42, "name": "Arsenal"},
                "away": {"id": 49, "name": "Chelsea"}
            },
            "goals": {"home": goals.0, "away": goals.1}
        })
    }

    fn season() -> Vec<Fixture> {
        let body = json!({
            "response": [
                entry(1, "2024-08-10T14:00:00+00:00", "FT", "Regular Season - 1", (json!(2), json!(0))),
                entry(2, "2024-08-17T14:00:00+00:00", "FT", "Regular Season - 2", (json!(1), json!(1))),
                entry(3, "2024-08-24T14:00:00+00:00", "PST", "Regular Season - 3", (json!(null), json!(null))),
                entry(4, "2024-08-31T14:00:00+00:00", "NS", "Regular Season - 1", (json!(null), json!(null))),
                entry(5, "2024-09-14T14:00:00+00:00", "NS", "Regular Season - 4", (json!(null), json!(null))),
                entry(6, "bad-date", "NS", "Regular Season - 4", (json!(null), json!(null)))
            ]
        });
        fixtures(&body).unwrap()
    }

    #[test]
    fn test_fixtures_normalized() {
        let list = season();
        assert_eq!(list.len(), 6);
        let first = &list[0];
        assert_eq!(first.id, FixtureId::new(1));
        assert_eq!(first.status.code, StatusCode::Finished);
        assert_eq!(first.home_goals, Some(2));
        assert_eq!(first.venue.as_deref(), Some("Emirates Stadium"));
        assert!(list[5].date.is_none());
        assert_eq!(list[3].home_goals, None);
    }

    #[test]
    fn test_rounds_first_seen_order() {
        let list = season();
        assert_eq!(
            rounds(&list),
            vec![
                "Regular Season - 1",
                "Regular Season - 2",
                "Regular Season - 3",
                "Regular Season - 4"
            ]
        );
        assert_eq!(by_round(&list, "Regular Season - 1").len(), 2);
        assert!(by_round(&list, "Final").is_empty());
    }

    #[test]
    fn test_upcoming_and_recent_split() {
        let list = season();
        let today = NaiveDate::from_ymd_opt(2024, 8, 24).unwrap();

        let up: Vec<u32> = upcoming(&list, today, 5).iter().map(|f| f.id.get()).collect();
        assert_eq!(up, vec![4, 5]);

        // postponed fixture on `today` is not full time
        let recent: Vec<u32> = recent_results(&list, today, 5)
            .iter()
            .map(|f| f.id.get())
            .collect();
        assert_eq!(recent, vec![2, 1]);

        assert_eq!(recent_results(&list, today, 1).len(), 1);
    }

    #[test]
    fn test_goal_summary_per_side() {
        let body = json!({
            "response": [
                {"time": {"elapsed": 12}, "team": {"id": 42, "name": "Arsenal"},
                 "player": {"id": 1, "name": "Saka"}, "assist": {"id": 2, "name": "Odegaard"},
                 "type": "Goal", "detail": "Normal Goal"},
                {"time": {"elapsed": 30}, "team": {"id": 49, "name": "Chelsea"},
                 "player": {"id": 3, "name": "Palmer"}, "assist": {"id": null, "name": null},
                 "type": "Card", "detail": "Yellow Card"},
                {"time": {"elapsed": 77, "extra": null}, "team": {"id": 49, "name": "Chelsea"},
                 "player": {"id": 3, "name": "Palmer"}, "assist": null,
                 "type": "Goal", "detail": "Penalty"}
            ]
        });
        let events = events(&body).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].kind, EventKind::Card);

        let summary = goal_summary(&events, TeamId::new(42));
        assert_eq!(summary.home.goals.len(), 1);
        assert_eq!(summary.home.assists, vec!["Odegaard"]);
        assert_eq!(summary.away.goals[0].scorer, "Palmer");
        assert_eq!(summary.away.goals[0].minute, Some(77));
        assert!(summary.away.assists.is_empty());
    }

    #[test]
    fn test_statistics_table_defaults_to_zero() {
        let body = json!({
            "response": [
                {"team": {"id": 42, "name": "Arsenal"},
                 "statistics": [
                    {"type": "Ball Possession", "value": "61%"},
                    {"type": "Total Shots", "value": 14},
                    {"type": "Red Cards", "value": null}
                 ]},
                {"team": {"id": 49, "name": "Chelsea"},
                 "statistics": [{"type": "Ball Possession", "value": "39%"}]}
            ]
        });
        let stats = statistics(&body).unwrap();
        assert_eq!(stats.lines.len(), STAT_TYPES.len());
        assert_eq!(stats.home_team.as_deref(), Some("Arsenal"));

        let possession = stats.line("Ball Possession").unwrap();
        assert_eq!(possession.label, "Possession");
        assert_eq!((possession.home.as_str(), possession.away.as_str()), ("61%", "39%"));

        let shots = stats.line("Total Shots").unwrap();
        assert_eq!((shots.home.as_str(), shots.away.as_str()), ("14", "0"));
        assert_eq!(stats.line("Red Cards").unwrap().home, "0");
    }

    #[test]
    fn test_statistics_empty_response() {
        let stats = statistics(&json!({"response": []})).unwrap();
        assert!(stats.home_team.is_none());
        assert!(stats.lines.iter().all(|l| l.home == "0" && l.away == "0"));
    }

    #[test]
    fn test_head_to_head_totals() {
        let body = json!({
            "response": [
                entry(1, "2022-01-10T14:00:00+00:00", "FT", "R", (json!(2), json!(0))),
                entry(2, "2023-01-10T14:00:00+00:00", "FT", "R", (json!(1), json!(1))),
                entry(3, "2024-01-10T14:00:00+00:00", "FT", "R", (json!(0), json!(3))),
                entry(4, "2025-01-10T14:00:00+00:00", "NS", "R", (json!(null), json!(null)))
            ]
        });
        let record = head_to_head(&body, TeamId::new(42), TeamId::new(49)).unwrap();
        let s = record.summary();
        assert_eq!(s.team_a_wins + s.team_b_wins + s.draws, s.total_matches);
        assert_eq!(s.total_matches, 3);
        assert_eq!((s.team_a_goals, s.team_b_goals), (3, 4));
        assert_eq!(record.fixtures.len(), 4);
        assert_eq!(record.latest(1)[0].id, FixtureId::new(4));
    }
}
