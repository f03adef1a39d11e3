//! `/leagues` and `/teams`.

use chrono::NaiveDate;
use serde_json::Value;

use super::raw::{RawLeagueEntry, RawSeason, RawTeamEntry};
use super::{response_items, team_from_raw, NormalizeError, NOT_AVAILABLE};
use crate::models::{Country, CountryLeagues, League, Season, Team};

/// Top-division league ids per country, used by the advanced table's
/// country picker.
pub const COUNTRY_LEAGUES: &[(&str, &[u32])] = &[
    ("England", &[39, 40, 41, 42]),
    ("Spain", &[140, 141]),
    ("Germany", &[78, 79]),
    ("Italy", &[135, 136]),
    ("France", &[61, 62]),
];

/// League ids tracked for `country`, empty when it is not mapped.
pub fn country_league_ids(country: &str) -> &'static [u32] {
    COUNTRY_LEAGUES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(country))
        .map(|(_, ids)| *ids)
        .unwrap_or(&[])
}

fn parse_day(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn season_from_raw(raw: &RawSeason) -> Option<Season> {
    Some(Season {
        year: raw.year?,
        start_date: parse_day(raw.start.as_deref()),
        end_date: parse_day(raw.end.as_deref()),
        is_current: raw.current.unwrap_or(false),
    })
}

/// Normalize a `/leagues` body. Entries without a league id are dropped.
pub fn leagues(body: &Value) -> Result<Vec<League>, NormalizeError> {
    let entries: Vec<RawLeagueEntry> = response_items(body)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let league = entry.league?;
            let country = entry.country.unwrap_or_default();
            Some(League {
                id: league.id?,
                name: league.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                kind: league.kind.unwrap_or_default(),
                country: Country {
                    name: country.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    code: country.code,
                    flag: country.flag,
                },
                logo_url: league.logo,
                seasons: entry
                    .seasons
                    .unwrap_or_default()
                    .iter()
                    .filter_map(season_from_raw)
                    .collect(),
            })
        })
        .collect())
}

/// Normalize a `/teams` body.
pub fn teams(body: &Value) -> Result<Vec<Team>, NormalizeError> {
    let entries: Vec<RawTeamEntry> = response_items(body)?;
    Ok(entries
        .iter()
        .filter(|entry| entry.team.as_ref().and_then(|t| t.id).is_some())
        .map(|entry| {
            let mut team = team_from_raw(entry.team.as_ref());
            team.venue_name = entry.venue.as_ref().and_then(|v| v.name.clone());
            team
        })
        .collect())
}

/// Group leagues by country name, countries in first-seen order.
pub fn group_by_country(leagues: Vec<League>) -> Vec<CountryLeagues> {
    let mut groups: Vec<CountryLeagues> = Vec::new();
    for league in leagues {
        match groups.iter_mut().find(|g| g.country.name == league.country.name) {
            Some(group) => group.leagues.push(league),
            None => groups.push(CountryLeagues {
                country: league.country.clone(),
                leagues: vec![league],
            }),
        }
    }
    groups
}

/// Case-insensitive substring filter on league or country name.
pub fn search<'a>(leagues: &'a [League], query: &str) -> Vec<&'a League> {
    let query = query.trim().to_lowercase();
    leagues
        .iter()
        .filter(|l| {
            query.is_empty()
                || l.name.to_lowercase().contains(&query)
                || l.country.name.to_lowercase().contains(&query)
        })
        .collect()
}
