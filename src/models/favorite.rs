//! Favorite league entries.

use serde::{Deserialize, Serialize};

use super::{League, LeagueId};

/// A league the user pinned. Keyed by `league_id`.
///
/// Field names follow the camelCase layout of the persisted array so
/// lists written by the browser client load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLeague {
    pub league_id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_flag: Option<String>,
}

impl FavoriteLeague {
    pub fn new(league_id: LeagueId, name: impl Into<String>) -> Self {
        Self {
            league_id,
            name: name.into(),
            logo_url: None,
            country_name: None,
            country_flag: None,
        }
    }
}

impl From<&League> for FavoriteLeague {
    fn from(league: &League) -> Self {
        Self {
            league_id: league.id,
            name: league.name.clone(),
            logo_url: league.logo_url.clone(),
            country_name: Some(league.country.name.clone()),
            country_flag: league.country.flag.clone(),
        }
    }
}
