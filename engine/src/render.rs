// Plain-text rendering of a refresh for terminal output
use std::fmt::Write;

use shared::models::{ChartStyle, IndicatorColumn, TickerQuote, PRICE_COLUMNS};
use shared::utils::{chart_title, format_delta, format_price, format_volume};

use crate::models::DashboardSnapshot;

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

pub fn metrics_block(snapshot: &DashboardSnapshot) -> String {
    let m = &snapshot.metrics;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Last Price: {}  {}",
        snapshot.ticker,
        format_price(m.last_close),
        format_delta(m.change, m.percent_change)
    );
    let _ = writeln!(
        out,
        "High: {}  Low: {}  Volume: {}",
        format_price(m.high),
        format_price(m.low),
        format_volume(m.total_volume)
    );
    out
}

/// Price table (last `rows` bars) with the selected overlays appended as columns.
pub fn price_table(snapshot: &DashboardSnapshot, rows: usize) -> String {
    let overlays: Vec<&IndicatorColumn> = snapshot.overlays();
    let bars = &snapshot.series.bars;
    let skip = bars.len().saturating_sub(rows);

    let mut header: Vec<String> = match snapshot.chart_style {
        ChartStyle::Candlestick => PRICE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ChartStyle::Line => vec![PRICE_COLUMNS[0].to_string(), "Close".to_string()],
    };
    header.extend(overlays.iter().map(|c| c.descriptor.label()));

    let mut out = String::new();
    let _ = writeln!(out, "{}", chart_title(&snapshot.ticker, snapshot.period));
    let _ = writeln!(out, "{}", header.join("\t"));
    for (i, bar) in bars.iter().enumerate().skip(skip) {
        let mut line: Vec<String> = vec![bar.timestamp.to_string()];
        match snapshot.chart_style {
            ChartStyle::Candlestick => {
                line.push(format!("{:.2}", bar.open));
                line.push(format!("{:.2}", bar.high));
                line.push(format!("{:.2}", bar.low));
                line.push(format!("{:.2}", bar.close));
                line.push(format_volume(bar.volume));
            }
            ChartStyle::Line => line.push(format!("{:.2}", bar.close)),
        }
        line.extend(overlays.iter().map(|c| cell(c.values.get(i).copied().flatten())));
        let _ = writeln!(out, "{}", line.join("\t"));
    }
    out
}

pub fn watchlist_block(quotes: &[TickerQuote]) -> String {
    let mut out = String::new();
    for q in quotes {
        let _ = writeln!(
            out,
            "{:<6} {:>14}  {}",
            q.symbol,
            format_price(q.last_price),
            format_delta(q.change, q.percent_change)
        );
    }
    out
}
