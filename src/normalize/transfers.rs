//! `/players/transfers`.

use chrono::NaiveDate;
use serde_json::Value;

use super::raw::RawTransferEntry;
use super::{response_items, team_from_raw, NormalizeError, NOT_AVAILABLE};
use crate::models::{Transfer, TransferFeed, TransferType};

/// Shown when the feed is empty for both the requested and fallback
/// seasons.
pub const NO_TRANSFERS_NOTICE: &str = "No transfer data available for this league. This could be because the transfer window is closed or data is not yet available.";

/// Notice for a feed served from `season` instead of the requested one.
pub fn fallback_notice(season: i32) -> String {
    format!(
        "Showing transfer data from the {} season as current season data is not yet available.",
        season
    )
}

/// Normalize a `/players/transfers` body: one record per move, newest
/// first. Moves without a date sort last.
pub fn transfers(body: &Value) -> Result<Vec<Transfer>, NormalizeError> {
    let entries: Vec<RawTransferEntry> = response_items(body)?;
    let mut list: Vec<Transfer> = entries
        .into_iter()
        .flat_map(|entry| {
            let player = entry.player.unwrap_or_default();
            let player_id = player.id.unwrap_or_default();
            let player_name = player.name.unwrap_or_else(|| NOT_AVAILABLE.to_string());
            entry
                .transfers
                .unwrap_or_default()
                .into_iter()
                .map(move |t| {
                    let teams = t.teams.unwrap_or_default();
                    Transfer {
                        player_id,
                        player_name: player_name.clone(),
                        from_team: team_from_raw(teams.from.as_ref()),
                        to_team: team_from_raw(teams.to.as_ref()),
                        date: t
                            .date
                            .as_deref()
                            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
                        transfer_type: TransferType::from_provider(t.kind.as_deref()),
                    }
                })
        })
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(list)
}

/// Build the feed shown for a league: the requested season when it has
/// moves, otherwise the fallback season with a notice, otherwise an empty
/// feed explaining why.
pub fn feed(
    season: i32,
    current: Vec<Transfer>,
    fallback_season: i32,
    fallback: Option<Vec<Transfer>>,
) -> TransferFeed {
    if !current.is_empty() {
        return TransferFeed {
            season,
            transfers: current,
            notice: None,
        };
    }
    match fallback {
        Some(list) if !list.is_empty() => TransferFeed {
            season: fallback_season,
            transfers: list,
            notice: Some(fallback_notice(fallback_season)),
        },
        _ => TransferFeed {
            season,
            transfers: Vec::new(),
            notice: Some(NO_TRANSFERS_NOTICE.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "response": [
                {"player": {"id": 1, "name": "Declan Rice"},
                 "transfers": [
                    {"date": "2019-07-01", "type": "Loan",
                     "teams": {"in": {"id": 48, "name": "West Ham"}, "out": {"id": 49, "name": "Chelsea"}}},
                    {"date": "2023-07-15", "type": "€ 116.6M",
                     "teams": {"in": {"id": 42, "name": "Arsenal"}, "out": {"id": 48, "name": "West Ham"}}}
                 ]},
                {"player": {"id": 2, "name": "Someone"},
                 "transfers": [
                    {"date": null, "type": "Free", "teams": {"in": null, "out": null}},
                    {"date": "2024-01-02", "type": "N/A",
                     "teams": {"in": {"id": 1, "name": "A"}, "out": {"id": 2, "name": "B"}}}
                 ]}
            ]
        })
    }

    #[test]
    fn test_transfers_flattened_newest_first() {
        let list = transfers(&body()).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(list[1].to_team.name, "Arsenal");
        assert_eq!(list[1].transfer_type, TransferType::Fee("€ 116.6M".to_string()));
        assert_eq!(list[2].transfer_type, TransferType::Loan);
        assert!(list[3].date.is_none());
        assert_eq!(list[3].from_team.name, NOT_AVAILABLE);
    }

    #[test]
    fn test_feed_current_season() {
        let list = transfers(&body()).unwrap();
        let feed = feed(2024, list, 2023, None);
        assert_eq!(feed.season, 2024);
        assert!(feed.notice.is_none());
    }

    #[test]
    fn test_feed_falls_back_with_notice() {
        let list = transfers(&body()).unwrap();
        let feed = feed(2024, Vec::new(), 2023, Some(list));
        assert_eq!(feed.season, 2023);
        assert_eq!(
            feed.notice.as_deref(),
            Some("Showing transfer data from the 2023 season as current season data is not yet available.")
        );
    }

    #[test]
    fn test_feed_empty_explains() {
        let feed = feed(2024, Vec::new(), 2023, Some(Vec::new()));
        assert!(feed.transfers.is_empty());
        assert_eq!(feed.notice.as_deref(), Some(NO_TRANSFERS_NOTICE));
    }
}
