//! Per-market row accumulation across all events of a run.
//!
//! One `Aggregator` is built per run and handed from the collector to the
//! exporter. Rows only ever get appended, in arrival order.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::debug;

use crate::data::extractor;
use crate::data::models::{Bookmaker, MarketKey, Row};

/// Which configured bookmaker a block of odds came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSource {
    Primary,
    Secondary,
}

#[derive(Debug)]
pub struct Aggregator {
    sheets: HashMap<MarketKey, Vec<Row>>,
    /// Markets the secondary bookmaker may contribute to.
    secondary_markets: Vec<MarketKey>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(vec![MarketKey::Receptions])
    }
}

impl Aggregator {
    pub fn new(secondary_markets: Vec<MarketKey>) -> Self {
        Self {
            sheets: MarketKey::ALL.into_iter().map(|k| (k, Vec::new())).collect(),
            secondary_markets,
        }
    }

    /// Primary rows are always taken; secondary rows only for fallback markets.
    pub fn accepts(&self, key: MarketKey, source: BookSource) -> bool {
        match source {
            BookSource::Primary => true,
            BookSource::Secondary => self.secondary_markets.contains(&key),
        }
    }

    /// Append `rows` to the market's sheet if the policy allows it.
    /// Returns the number of rows taken.
    pub fn absorb(&mut self, key: MarketKey, source: BookSource, rows: Vec<Row>) -> usize {
        if !self.accepts(key, source) {
            return 0;
        }
        let n = rows.len();
        self.sheets.entry(key).or_default().extend(rows);
        n
    }

    /// Extract and absorb every recognized market of one bookmaker.
    ///
    /// Column labels use the bookmaker's title. Unknown market keys are skipped.
    pub fn absorb_bookmaker(&mut self, source: BookSource, bookmaker: &Bookmaker) -> usize {
        let mut total = 0;

        for market in &bookmaker.markets {
            let key = match MarketKey::from_str(&market.key) {
                Ok(key) => key,
                Err(_) => {
                    debug!(market = %market.key, bookmaker = %bookmaker.title, "Ignoring unknown market");
                    continue;
                }
            };

            if !self.accepts(key, source) {
                continue;
            }

            let rows = extractor::extract(market, key.kind(), &bookmaker.title);
            total += self.absorb(key, source, rows);
        }

        total
    }

    pub fn rows(&self, key: MarketKey) -> &[Row] {
        self.sheets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every market in sheet order, empty ones included.
    pub fn sheets(&self) -> impl Iterator<Item = (MarketKey, &[Row])> {
        MarketKey::ALL.into_iter().map(move |k| (k, self.rows(k)))
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }
}
