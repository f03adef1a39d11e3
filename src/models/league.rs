//! League, season, country and team records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LeagueId, TeamId};

/// Country a league belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

/// One season of a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub year: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
}

/// A league (or cup) competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    /// "League" or "Cup"
    pub kind: String,
    pub country: Country,
    pub logo_url: Option<String>,
    pub seasons: Vec<Season>,
}

impl League {
    /// The season flagged current by the provider, if any.
    pub fn current_season(&self) -> Option<&Season> {
        self.seasons.iter().find(|s| s.is_current)
    }

    /// Year of the current season, or `fallback` when none is flagged.
    pub fn current_season_year(&self, fallback: i32) -> i32 {
        self.current_season().map(|s| s.year).unwrap_or(fallback)
    }
}

/// All leagues of one country, as listed on the leagues screen.
#[derive(Debug, Clone, Serialize)]
pub struct CountryLeagues {
    pub country: Country,
    pub leagues: Vec<League>,
}

/// A club or national team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub logo_url: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<u32>,
    pub venue_name: Option<String>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            logo_url: None,
            code: None,
            country: None,
            founded: None,
            venue_name: None,
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}
