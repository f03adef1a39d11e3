//! # SSport Analytics
//!
//! Football analytics aggregation layer over a third-party sports-data API.
//!
//! ## Architecture
//!
//! - **fetch**: Authenticated provider client, one typed method per resource
//! - **normalize**: Raw provider JSON to flat view records
//! - **models**: View records (leagues, fixtures, standings, players, ...)
//! - **calculate**: Derived ratios, form strings and streaks
//! - **selection**: Country → league → team → player filter chain
//! - **storage**: Favorite leagues persisted on disk
//! - **agents**: AI narrative analysis over a chat-completion backend
//! - **screens**: Per-screen composers with per-section failure isolation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod agents;
pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod screens;
pub mod selection;
pub mod storage;

pub use models::*;

use std::time::Duration;

/// Parse a polling interval such as "30s", "2m" or "1h". A bare number is
/// seconds. Zero is rejected.
pub fn parse_interval(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit) = match s.char_indices().last()? {
        (idx, 'h') => (&s[..idx], 3600),
        (idx, 'm') => (&s[..idx], 60),
        (idx, 's') => (&s[..idx], 1),
        _ => (s, 1),
    };

    let secs = digits.trim().parse::<u64>().ok()?.checked_mul(unit)?;
    (secs > 0).then(|| Duration::from_secs(secs))
}
