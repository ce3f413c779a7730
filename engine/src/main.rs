// home-dash: one refresh of the price dashboard, printed to the terminal.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use engine::config::settings::DashboardSettings;
use engine::data::{CsvSource, MarketDataSource, YahooChartSource};
use engine::models::{DashboardRequest, RefreshOutcome};
use engine::render;
use engine::services::DashboardService;
use shared::models::{ChartStyle, IndicatorKind, PeriodSpec, TickerQuote};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "home-dash", about = "Fetch a price series, add moving averages and print a summary")]
struct Cli {
    /// Ticker symbol, e.g. NVDA
    #[arg(long)]
    ticker: Option<String>,

    /// One of 1d, 1wk, 1mo, 1y, max
    #[arg(long, default_value = "1d")]
    period: PeriodSpec,

    /// SMA/EMA window in bars
    #[arg(long)]
    window: Option<usize>,

    /// Indicator to overlay (sma or ema); repeatable
    #[arg(long = "indicator")]
    indicators: Vec<IndicatorKind>,

    /// candlestick or line
    #[arg(long, default_value = "candlestick")]
    chart: ChartStyle,

    #[arg(long, value_enum, default_value = "yahoo")]
    source: SourceKind,

    /// Directory of <TICKER>.csv files, used with --source csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Number of most recent rows to print
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Skip the watchlist strip
    #[arg(long)]
    no_watchlist: bool,

    /// Print the snapshot as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn build_source(cli: &Cli, settings: &DashboardSettings) -> Result<Box<dyn MarketDataSource>> {
    Ok(match cli.source {
        SourceKind::Yahoo => Box::new(
            YahooChartSource::new(&settings.provider).context("failed to build HTTP client")?,
        ),
        SourceKind::Csv => {
            let Some(dir) = cli.data_dir.clone() else {
                bail!("--data-dir is required with --source csv");
            };
            Box::new(CsvSource::new(dir))
        }
    })
}

// Request defaults come from settings; flags override them.
fn build_request(cli: &Cli, settings: &DashboardSettings) -> DashboardRequest {
    let mut request = DashboardRequest::from_settings(settings);
    if let Some(ticker) = &cli.ticker {
        request.ticker = ticker.clone();
    }
    if let Some(window) = cli.window {
        request.window = window;
    }
    request.period = cli.period;
    request
        .with_overlays(cli.indicators.iter().copied())
        .with_chart_style(cli.chart)
}

/// `--json` output: the refresh and the watchlist in one document.
#[derive(Serialize)]
struct JsonReport<'a> {
    outcome: &'a RefreshOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    watchlist: Option<&'a [TickerQuote]>,
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = DashboardSettings::default();
    if let Some(secs) = cli.timeout_secs {
        settings.provider.request_timeout_secs = secs;
    }

    let request = build_request(&cli, &settings);
    let source = build_source(&cli, &settings)?;
    let service = DashboardService::new(source, settings)?;

    let outcome = service
        .refresh(&request)
        .await
        .with_context(|| format!("refresh failed for '{}'", request.ticker))?;

    let quotes = if cli.no_watchlist {
        None
    } else {
        Some(service.watchlist().await.context("watchlist refresh failed")?)
    };

    if cli.json {
        let report = JsonReport {
            outcome: &outcome,
            watchlist: quotes.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &outcome {
        RefreshOutcome::Empty { ticker } => {
            info!(%ticker, "No data for ticker; nothing to display");
            println!("No data available for {}.", ticker);
        }
        RefreshOutcome::Ready(snapshot) => {
            print!("{}", render::metrics_block(snapshot));
            println!();
            print!("{}", render::price_table(snapshot, cli.rows));
        }
    }

    if let Some(quotes) = &quotes {
        println!();
        println!("Watchlist");
        print!("{}", render::watchlist_block(quotes));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(ticker = ?cli.ticker, period = %cli.period, "Starting home-dash");

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings_defaults() {
        let settings = DashboardSettings::default();

        let cli = Cli::parse_from(["home-dash"]);
        let request = build_request(&cli, &settings);
        assert_eq!(request.ticker, settings.default_ticker);
        assert_eq!(request.window, settings.default_window);
        assert_eq!(request.period, PeriodSpec::Day1);

        let cli = Cli::parse_from([
            "home-dash", "--ticker", "aapl", "--period", "1wk", "--window", "9", "--indicator", "ema", "--chart", "line",
        ]);
        let request = build_request(&cli, &settings);
        assert_eq!(request.ticker, "aapl");
        assert_eq!(request.period, PeriodSpec::Week1);
        assert_eq!(request.window, 9);
        assert_eq!(request.overlays, vec![IndicatorKind::Ema]);
        assert_eq!(request.chart_style, ChartStyle::Line);
    }

    #[test]
    fn test_json_report_is_one_document() {
        let outcome = RefreshOutcome::Empty { ticker: "ZZZZ".to_string() };
        let quotes = vec![TickerQuote {
            symbol: "AAPL".to_string(),
            last_price: 110.0,
            change: 22.0,
            percent_change: 25.0,
        }];
        let report = JsonReport { outcome: &outcome, watchlist: Some(&quotes) };

        let text = serde_json::to_string_pretty(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["outcome"]["Empty"]["ticker"], "ZZZZ");
        assert_eq!(value["watchlist"][0]["symbol"], "AAPL");

        let report = JsonReport { outcome: &outcome, watchlist: None };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("watchlist").is_none());
    }
}
