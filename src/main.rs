//! NFL player prop odds collector.
//!
//! Pulls player props for a fixed slate of events from The Odds API,
//! keeps the primary bookmaker's lines for every market plus the secondary
//! bookmaker's reception lines, and writes one spreadsheet sheet per market.
//!
//! Flow:
//! - one GET per event, sequentially
//! - per bookmaker, per market: reshape outcomes into rows
//! - append rows to the per-market aggregate
//! - export all six aggregates to a single workbook

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use nfl_props_odds::api::client::OddsApiClient;
use nfl_props_odds::collector::PropsCollector;
use nfl_props_odds::config::Settings;
use nfl_props_odds::export::workbook::WorkbookExporter;
use nfl_props_odds::state::aggregator::Aggregator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration.
    let settings = Settings::from_env();

    // Initialize logging.
    init_logging(&settings);

    info!("=== NFL Player Props Odds Export ===");
    info!(
        base_url = %settings.odds_api_base_url,
        sport = %settings.sport_key,
        events = settings.event_ids.len(),
        primary = %settings.primary_bookmaker,
        secondary = %settings.secondary_bookmaker,
        output = %settings.output_path.display(),
        "Configuration loaded"
    );

    // Validate settings.
    if let Err(errors) = settings.validate() {
        for e in &errors {
            error!(error = %e, "Configuration error");
        }
        anyhow::bail!("Configuration validation failed");
    }

    let run_id = Uuid::new_v4();
    run(&settings).instrument(info_span!("run", %run_id)).await
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let client = OddsApiClient::new(settings)?;

    let mut aggregator = Aggregator::new(settings.secondary_market_keys());
    let collector = PropsCollector::new(
        &client,
        settings.primary_bookmaker.as_str(),
        settings.secondary_bookmaker.as_str(),
    );
    collector.collect(&settings.event_ids, &mut aggregator).await;

    let summary = WorkbookExporter::new().export(&aggregator, &settings.output_path)?;
    for (key, rows) in &summary.sheets {
        info!(sheet = %key, rows, "Sheet written");
    }

    info!(
        path = %settings.output_path.display(),
        "Odds data has been successfully exported"
    );
    Ok(())
}

fn init_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}
