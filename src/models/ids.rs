//! Provider identifiers.
//!
//! The sports-data provider emits numeric ids, but the same ids also reach
//! us as strings (query strings, CLI arguments, favorites written by older
//! clients). Every id type accepts either form and normalizes to `u32`, so
//! `"39"` and `39` compare equal everywhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to interpret a value as a provider id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id: {value:?}")]
pub struct IdParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Wire form of an id before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

fn parse_raw(kind: &'static str, raw: RawId) -> Result<u32, IdParseError> {
    match raw {
        RawId::Number(n) => u32::try_from(n).map_err(|_| IdParseError {
            kind,
            value: n.to_string(),
        }),
        RawId::Text(s) => s.trim().parse::<u32>().map_err(|_| IdParseError { kind, value: s }),
    }
}

macro_rules! provider_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "RawId", into = "u32")]
        pub struct $name(u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl TryFrom<RawId> for $name {
            type Error = IdParseError;

            fn try_from(raw: RawId) -> Result<Self, Self::Error> {
                parse_raw($kind, raw).map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_raw($kind, RawId::Text(s.to_string())).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

provider_id!(
    /// League (competition) id, e.g. 39 for the Premier League.
    LeagueId,
    "league"
);
provider_id!(TeamId, "team");
provider_id!(PlayerId, "player");
provider_id!(FixtureId, "fixture");
