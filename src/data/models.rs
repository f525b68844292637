//! Core data models for The Odds API event-odds endpoint and the tabular
//! rows built from it.
//!
//! Upstream types are deserialized leniently: every field the extractors can
//! live without is `#[serde(default)]` so one sparse outcome never discards
//! a whole response.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Placeholder player name for outcomes without a `description`.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// Sentinel written in place of a missing price.
pub const NOT_AVAILABLE: &str = "N/A";

pub const PLAYER_COLUMN: &str = "Player";
pub const YARDAGE_COLUMN: &str = "Yardage";

// =============================================================================
// The Odds API response types
// =============================================================================

/// Response of `GET /v4/sports/{sport}/events/{event_id}/odds`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventOdds {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sport_key: String,
    /// Kept as sent; only used for display.
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl EventOdds {
    /// First bookmaker whose title matches exactly (case-sensitive).
    pub fn bookmaker(&self, title: &str) -> Option<&Bookmaker> {
        self.bookmakers.iter().find(|b| b.title == title)
    }

    pub fn matchup(&self) -> String {
        if self.home_team.is_empty() && self.away_team.is_empty() {
            return self.id.clone();
        }
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Outcome {
    /// Side of the bet ("Over", "Under", "Yes", ...).
    #[serde(default)]
    pub name: String,
    /// Player the prop refers to.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Line for over/under markets.
    #[serde(default)]
    pub point: Option<Decimal>,
}

impl Outcome {
    pub fn player(&self) -> &str {
        self.description.as_deref().unwrap_or(UNKNOWN_PLAYER)
    }

    pub fn side(&self) -> OutcomeSide {
        OutcomeSide::parse(&self.name)
    }

    /// Price as a cell, or the `N/A` sentinel.
    pub fn price_cell(&self) -> CellValue {
        match self.price {
            Some(p) => CellValue::Number(p),
            None => CellValue::Text(NOT_AVAILABLE.to_string()),
        }
    }
}

// =============================================================================
// Enums
// =============================================================================

/// The six player-prop markets collected per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarketKey {
    Receptions,
    AnytimeTd,
    PassTds,
    PassYds,
    RushYds,
    ReceptionYds,
}

impl MarketKey {
    /// Sheet order in the output workbook.
    pub const ALL: [MarketKey; 6] = [
        Self::Receptions,
        Self::AnytimeTd,
        Self::PassTds,
        Self::PassYds,
        Self::RushYds,
        Self::ReceptionYds,
    ];

    /// Order of the `markets` query parameter.
    pub const QUERY_ORDER: [MarketKey; 6] = [
        Self::PassTds,
        Self::PassYds,
        Self::RushYds,
        Self::Receptions,
        Self::ReceptionYds,
        Self::AnytimeTd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receptions => "player_receptions",
            Self::AnytimeTd => "player_anytime_td",
            Self::PassTds => "player_pass_tds",
            Self::PassYds => "player_pass_yds",
            Self::RushYds => "player_rush_yds",
            Self::ReceptionYds => "player_reception_yds",
        }
    }

    pub fn kind(&self) -> MarketKind {
        match self {
            Self::AnytimeTd => MarketKind::Binary,
            _ => MarketKind::Line,
        }
    }

    /// Comma-separated `markets` query value.
    pub fn query_value() -> String {
        Self::QUERY_ORDER
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown market key: {s}"))
    }
}

/// Extraction strategy for a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    /// Over/Under around a line; one row per player.
    Line,
    /// Single price per outcome; one row per outcome.
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSide {
    Over,
    Under,
    Other,
}

impl OutcomeSide {
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("over") {
            Self::Over
        } else if name.eq_ignore_ascii_case("under") {
            Self::Under
        } else {
            Self::Other
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Blank,
    Text(String),
    Number(Decimal),
}

impl From<Option<Decimal>> for CellValue {
    fn from(v: Option<Decimal>) -> Self {
        v.map(Self::Number).unwrap_or(Self::Blank)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One output row: column name -> value, in column insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, keeping its original position if it already exists.
    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_key_roundtrips_through_str() {
        for key in MarketKey::ALL {
            assert_eq!(key.as_str().parse::<MarketKey>().unwrap(), key);
        }
        assert!("h2h".parse::<MarketKey>().is_err());
    }

    #[test]
    fn test_query_value_order() {
        assert_eq!(
            MarketKey::query_value(),
            "player_pass_tds,player_pass_yds,player_rush_yds,player_receptions,player_reception_yds,player_anytime_td"
        );
    }

    #[test]
    fn test_only_anytime_td_is_binary() {
        let binary: Vec<_> = MarketKey::ALL
            .into_iter()
            .filter(|k| k.kind() == MarketKind::Binary)
            .collect();
        assert_eq!(binary, vec![MarketKey::AnytimeTd]);
    }

    #[test]
    fn test_side_parse_case_insensitive() {
        assert_eq!(OutcomeSide::parse("Over"), OutcomeSide::Over);
        assert_eq!(OutcomeSide::parse("OVER"), OutcomeSide::Over);
        assert_eq!(OutcomeSide::parse("under"), OutcomeSide::Under);
        assert_eq!(OutcomeSide::parse("Yes"), OutcomeSide::Other);
    }

    #[test]
    fn test_deserialize_event_odds() {
        let body = r#"{
            "id": "evt1",
            "sport_key": "americanfootball_nfl",
            "commence_time": "2024-09-08T17:00:00Z",
            "home_team": "Chicago Bears",
            "away_team": "Tennessee Titans",
            "bookmakers": [{
                "key": "draftkings",
                "title": "DraftKings",
                "last_update": "2024-09-08T12:00:00Z",
                "markets": [{
                    "key": "player_receptions",
                    "outcomes": [
                        {"name": "Over", "description": "DJ Moore", "price": -110, "point": 4.5},
                        {"name": "Under", "description": "DJ Moore", "point": 4.5}
                    ]
                }]
            }]
        }"#;
        let event: EventOdds = serde_json::from_str(body).unwrap();
        assert_eq!(event.matchup(), "Tennessee Titans @ Chicago Bears");
        assert!(event.commence_time.is_some());

        let dk = event.bookmaker("DraftKings").unwrap();
        let outcomes = &dk.markets[0].outcomes;
        assert_eq!(outcomes[0].price, Some(dec!(-110)));
        assert_eq!(outcomes[0].point, Some(dec!(4.5)));
        assert_eq!(outcomes[1].price, None);
        assert_eq!(outcomes[1].price_cell(), CellValue::Text("N/A".to_string()));

        // Exact, case-sensitive title match.
        assert!(event.bookmaker("draftkings").is_none());
    }

    #[test]
    fn test_loose_commence_time_keeps_event() {
        let body = r#"{
            "id": "evt1",
            "commence_time": "2024-09-08 17:00",
            "bookmakers": [{
                "title": "DraftKings",
                "markets": [{
                    "key": "player_receptions",
                    "outcomes": [{"name": "Over", "description": "A", "price": -110, "point": 4.5}]
                }]
            }]
        }"#;
        let event: EventOdds = serde_json::from_str(body).unwrap();
        assert_eq!(event.commence_time.as_deref(), Some("2024-09-08 17:00"));
        assert_eq!(event.bookmaker("DraftKings").unwrap().markets[0].outcomes.len(), 1);
    }

    #[test]
    fn test_outcome_without_description_is_unknown_player() {
        let o: Outcome = serde_json::from_str(r#"{"name": "Yes", "price": 250}"#).unwrap();
        assert_eq!(o.player(), UNKNOWN_PLAYER);
    }

    #[test]
    fn test_row_set_keeps_column_position() {
        let mut row = Row::new()
            .with("Player", "A".into())
            .with("Yardage", CellValue::Blank);
        row.set("Player", "B".into());
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["Player", "Yardage"]);
        assert_eq!(row.get("Player"), Some(&CellValue::Text("B".to_string())));
        assert_eq!(row.columns().count(), 2);
    }
}
