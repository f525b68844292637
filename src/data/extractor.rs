//! Reshape one bookmaker's market into output rows.
//!
//! Line markets (yards, receptions, passing TDs) merge the Over and Under
//! outcomes of a player into a single row. The anytime-TD market emits one
//! row per outcome, repeated players included.

use std::collections::HashMap;

use crate::data::models::{
    CellValue, Market, MarketKind, OutcomeSide, Row, PLAYER_COLUMN, YARDAGE_COLUMN,
};

/// Rows keyed by player, in first-seen order.
#[derive(Debug, Default)]
pub struct RowTable {
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing row for `key`, or a new one built by `init` and appended.
    pub fn get_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> Row) -> &mut Row {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.rows.push(init());
                let idx = self.rows.len() - 1;
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &mut self.rows[idx]
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

pub fn over_column(label: &str) -> String {
    format!("{label} Over Odds")
}

pub fn under_column(label: &str) -> String {
    format!("{label} Under Odds")
}

pub fn odds_column(label: &str) -> String {
    format!("{label} Odds")
}

/// Over/Under rows, one per player.
///
/// The line is taken from the first outcome seen for a player. Outcomes whose
/// side is neither over nor under still create the player's row but fill no
/// odds column.
pub fn extract_line_market(market: &Market, label: &str) -> Vec<Row> {
    let over = over_column(label);
    let under = under_column(label);
    let mut table = RowTable::new();

    for outcome in &market.outcomes {
        let player = outcome.player();
        let row = table.get_or_insert_with(player, || {
            Row::new()
                .with(PLAYER_COLUMN, player.into())
                .with(YARDAGE_COLUMN, outcome.point.into())
                .with(over.clone(), CellValue::Blank)
                .with(under.clone(), CellValue::Blank)
        });

        match outcome.side() {
            OutcomeSide::Over => row.set(over.clone(), outcome.price_cell()),
            OutcomeSide::Under => row.set(under.clone(), outcome.price_cell()),
            OutcomeSide::Other => {}
        }
    }

    table.into_rows()
}

/// One row per outcome with a single odds column.
pub fn extract_binary_market(market: &Market, label: &str) -> Vec<Row> {
    let odds = odds_column(label);

    market
        .outcomes
        .iter()
        .map(|outcome| {
            Row::new()
                .with(PLAYER_COLUMN, outcome.player().into())
                .with(odds.clone(), outcome.price_cell())
        })
        .collect()
}

/// Dispatch on the market's extraction strategy.
pub fn extract(market: &Market, kind: MarketKind, label: &str) -> Vec<Row> {
    match kind {
        MarketKind::Line => extract_line_market(market, label),
        MarketKind::Binary => extract_binary_market(market, label),
    }
}
