//! Async REST client for The Odds API event-odds endpoint.
//!
//! One GET per event returns every bookmaker's player props for that event.
//! Requests are issued one at a time; there is no retry or rate limiting.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::data::models::{Bookmaker, EventOdds, MarketKey};

use super::errors::ApiError;

/// Anything that can produce the odds for one event.
#[async_trait]
pub trait OddsSource {
    async fn fetch_event(&self, event_id: &str) -> Result<EventOdds, ApiError>;
}

/// Async REST client for The Odds API.
pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    sport_key: String,
    regions: String,
    odds_format: String,
    markets: String,
}

impl OddsApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.odds_api_base_url.trim_end_matches('/').to_string(),
            api_key: settings.odds_api_key.clone(),
            sport_key: settings.sport_key.clone(),
            regions: settings.regions.clone(),
            odds_format: settings.odds_format.clone(),
            markets: MarketKey::query_value(),
        })
    }

    pub fn event_url(&self, event_id: &str) -> String {
        format!(
            "{}/v4/sports/{}/events/{}/odds",
            self.base_url, self.sport_key, event_id
        )
    }

    /// Odds for one event from one bookmaker.
    ///
    /// Failures and a missing bookmaker are logged and yield `None`.
    pub async fn fetch_bookmaker(&self, event_id: &str, bookmaker: &str) -> Option<Bookmaker> {
        match self.fetch_event(event_id).await {
            Ok(event) => find_bookmaker(event_id, &event, bookmaker).cloned(),
            Err(e) => {
                log_fetch_failure(event_id, bookmaker, &e);
                None
            }
        }
    }
}

/// Bookmaker block by exact title, logging when the event has none.
pub fn find_bookmaker<'a>(event_id: &str, event: &'a EventOdds, title: &str) -> Option<&'a Bookmaker> {
    let found = event.bookmaker(title);
    if found.is_none() {
        warn!(event_id, bookmaker = title, "No odds found");
    }
    found
}

pub fn log_fetch_failure(event_id: &str, bookmaker: &str, error: &ApiError) {
    warn!(
        event_id,
        bookmaker,
        status_code = ?error.status_code(),
        error = %error,
        "Unable to fetch odds"
    );
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn fetch_event(&self, event_id: &str) -> Result<EventOdds, ApiError> {
        if event_id.is_empty() {
            return Err(ApiError::InvalidRequest("empty event id".to_string()));
        }

        let url = self.event_url(event_id);
        debug!(event_id, url = %url, "API request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.regions.as_str()),
                ("markets", self.markets.as_str()),
                ("oddsFormat", self.odds_format.as_str()),
            ])
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();

        let remaining = header_str(response.headers(), "x-requests-remaining");
        let used = header_str(response.headers(), "x-requests-used");
        if remaining.is_some() || used.is_some() {
            debug!(
                event_id,
                requests_remaining = ?remaining,
                requests_used = ?used,
                "Odds API quota"
            );
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let text = response.text().await.map_err(ApiError::from_reqwest)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
