//! Transfer records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PlayerId, Team};

/// How a player moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum TransferType {
    Free,
    Loan,
    /// Provider amount text, e.g. "€ 12M"; empty when undisclosed
    Fee(String),
}

impl TransferType {
    /// Interpret the provider `type` field. Anything that is not a free or
    /// loan move is a fee, with the raw text kept ("N/A" counts as
    /// undisclosed).
    pub fn from_provider(raw: Option<&str>) -> Self {
        let raw = raw.map(str::trim).unwrap_or("");
        match raw.to_ascii_lowercase().as_str() {
            "free" | "free agent" => TransferType::Free,
            "loan" | "back from loan" | "return from loan" => TransferType::Loan,
            "" | "n/a" | "-" => TransferType::Fee(String::new()),
            _ => TransferType::Fee(raw.to_string()),
        }
    }
}

/// A single player move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub player_id: PlayerId,
    pub player_name: String,
    pub from_team: Team,
    pub to_team: Team,
    pub date: Option<NaiveDate>,
    pub transfer_type: TransferType,
}

/// Transfers for a league, possibly from an earlier season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferFeed {
    pub season: i32,
    pub transfers: Vec<Transfer>,
    /// Explains a fallback season or an empty feed
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_type_from_provider() {
        assert_eq!(TransferType::from_provider(Some("Free")), TransferType::Free);
        assert_eq!(TransferType::from_provider(Some("Loan")), TransferType::Loan);
        assert_eq!(
            TransferType::from_provider(Some("€ 12M")),
            TransferType::Fee("€ 12M".to_string())
        );
        assert_eq!(
            TransferType::from_provider(Some("N/A")),
            TransferType::Fee(String::new())
        );
        assert_eq!(TransferType::from_provider(None), TransferType::Fee(String::new()));
    }

    #[test]
    fn test_transfer_type_serialization() {
        let json = serde_json::to_value(TransferType::Fee("€ 5M".to_string())).unwrap();
        assert_eq!(json["kind"], "fee");
        assert_eq!(json["amount"], "€ 5M");
        let json = serde_json::to_value(TransferType::Loan).unwrap();
        assert_eq!(json["kind"], "loan");
    }
}
