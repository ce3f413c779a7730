// Handler for the sidebar ticker strip
use chrono::Utc;
use shared::models::{PeriodSpec, TickerQuote};

use super::summarize::quote;
use crate::data::source::{BarsRequest, MarketDataSource};
use crate::data::timezone::TimeNormalizer;
use crate::error::EngineError;

/// Intraday (1d at 1m) quote per symbol. Symbols without data are skipped;
/// fetch failures abort the whole strip.
pub async fn handle_watchlist<S: MarketDataSource + ?Sized>(
    source: &S,
    normalizer: &TimeNormalizer,
    symbols: &[String],
) -> Result<Vec<TickerQuote>, EngineError> {
    let mut quotes = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let request = BarsRequest::for_period(symbol, PeriodSpec::Day1, Utc::now());
        let series = source.fetch(&request).await?;
        if series.is_empty() {
            tracing::warn!(%symbol, "Skipping watchlist symbol without data");
            continue;
        }
        let series = normalizer.normalize(series);
        match quote(&series) {
            Ok(q) => quotes.push(q),
            Err(EngineError::ZeroReferencePrice { .. }) => {
                tracing::warn!(%symbol, "Skipping watchlist symbol with zero opening price");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(quotes)
}
