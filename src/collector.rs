//! Run loop: fetch each event once, feed the primary and secondary
//! bookmaker blocks into the aggregator.
//!
//! Events are processed strictly in order. A failed fetch, whatever the
//! cause, is logged and the event contributes nothing.

use tracing::info;

use crate::api::client::{find_bookmaker, log_fetch_failure, OddsSource};
use crate::data::models::EventOdds;
use crate::state::aggregator::{Aggregator, BookSource};

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub events: usize,
    pub failed_fetches: usize,
    pub missing_bookmakers: usize,
    pub rows: usize,
}

pub struct PropsCollector<'a, S: OddsSource> {
    source: &'a S,
    primary: String,
    secondary: String,
}

impl<'a, S: OddsSource> PropsCollector<'a, S> {
    pub fn new(source: &'a S, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            source,
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Process every event in order into `aggregator`.
    pub async fn collect(&self, event_ids: &[String], aggregator: &mut Aggregator) -> CollectStats {
        let mut stats = CollectStats::default();

        for event_id in event_ids {
            stats.events += 1;

            let event = match self.source.fetch_event(event_id).await {
                Ok(event) => event,
                Err(e) => {
                    for bookmaker in [&self.primary, &self.secondary] {
                        log_fetch_failure(event_id, bookmaker, &e);
                    }
                    stats.failed_fetches += 1;
                    continue;
                }
            };

            self.absorb_event(event_id, &event, aggregator, &mut stats);
        }

        info!(
            events = stats.events,
            failed_fetches = stats.failed_fetches,
            missing_bookmakers = stats.missing_bookmakers,
            rows = stats.rows,
            "Collection finished"
        );

        stats
    }

    fn absorb_event(
        &self,
        event_id: &str,
        event: &EventOdds,
        aggregator: &mut Aggregator,
        stats: &mut CollectStats,
    ) {
        let books = [
            (BookSource::Primary, self.primary.as_str()),
            (BookSource::Secondary, self.secondary.as_str()),
        ];

        for (source, title) in books {
            match find_bookmaker(event_id, event, title) {
                Some(bookmaker) => {
                    let rows = aggregator.absorb_bookmaker(source, bookmaker);
                    stats.rows += rows;
                    info!(
                        event_id,
                        matchup = %event.matchup(),
                        commence_time = ?event.commence_time,
                        bookmaker = title,
                        markets = bookmaker.markets.len(),
                        rows,
                        "Odds absorbed"
                    );
                }
                None => stats.missing_bookmakers += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ApiError;
    use crate::data::models::{Bookmaker, Market, MarketKey, Outcome};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSource {
        events: HashMap<String, EventOdds>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OddsSource for MockSource {
        async fn fetch_event(&self, event_id: &str) -> Result<EventOdds, ApiError> {
            self.calls.lock().unwrap().push(event_id.to_string());
            self.events
                .get(event_id)
                .cloned()
                .ok_or_else(|| ApiError::from_response(404, "not found"))
        }
    }

    fn bookmaker(title: &str) -> Bookmaker {
        let receptions = Market {
            key: "player_receptions".to_string(),
            outcomes: vec![Outcome {
                name: "Over".to_string(),
                description: Some("A".to_string()),
                price: Some(dec!(-110)),
                point: Some(dec!(4.5)),
            }],
        };
        let anytime = Market {
            key: "player_anytime_td".to_string(),
            outcomes: vec![Outcome {
                name: "Yes".to_string(),
                description: Some("A".to_string()),
                price: Some(dec!(150)),
                point: None,
            }],
        };
        Bookmaker {
            key: title.to_lowercase(),
            title: title.to_string(),
            markets: vec![receptions, anytime],
        }
    }

    fn event(id: &str, books: &[&str]) -> EventOdds {
        EventOdds {
            id: id.to_string(),
            bookmakers: books.iter().map(|b| bookmaker(b)).collect(),
            ..EventOdds::default()
        }
    }

    #[tokio::test]
    async fn test_failed_event_does_not_stop_later_events() {
        let source = MockSource {
            events: HashMap::from([("e2".to_string(), event("e2", &["DraftKings", "FanDuel"]))]),
            calls: Mutex::new(Vec::new()),
        };
        let collector = PropsCollector::new(&source, "DraftKings", "FanDuel");
        let mut agg = Aggregator::default();

        let ids = vec!["e1".to_string(), "e2".to_string()];
        let stats = collector.collect(&ids, &mut agg).await;

        assert_eq!(stats.events, 2);
        assert_eq!(stats.failed_fetches, 1);
        // DK: receptions + anytime, FD: receptions only.
        assert_eq!(stats.rows, 3);
        assert_eq!(agg.rows(MarketKey::Receptions).len(), 2);
        assert_eq!(agg.rows(MarketKey::AnytimeTd).len(), 1);
        // One request per event.
        assert_eq!(*source.calls.lock().unwrap(), ids);
    }

    #[tokio::test]
    async fn test_missing_bookmaker_is_counted() {
        let source = MockSource {
            events: HashMap::from([("e1".to_string(), event("e1", &["BetMGM", "FanDuel"]))]),
            calls: Mutex::new(Vec::new()),
        };
        let collector = PropsCollector::new(&source, "DraftKings", "FanDuel");
        let mut agg = Aggregator::default();

        let stats = collector.collect(&["e1".to_string()], &mut agg).await;

        assert_eq!(stats.missing_bookmakers, 1);
        assert_eq!(agg.rows(MarketKey::Receptions).len(), 1);
        assert!(agg.rows(MarketKey::AnytimeTd).is_empty());
    }
}
