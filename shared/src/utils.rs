// Display helpers shared by anything that renders a dashboard snapshot.

use crate::models::PeriodSpec;

/// `123.456` -> `"123.46 USD"`
pub fn format_price(value: f64) -> String {
    format!("{:.2} USD", value)
}

/// `(5.0, 5.0)` -> `"5.00 (5.00%)"`
pub fn format_delta(change: f64, percent_change: f64) -> String {
    format!("{:.2} ({:.2}%)", change, percent_change)
}

/// Groups digits in threes: `1234567` -> `"1,234,567"`.
pub fn format_volume(volume: u64) -> String {
    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn chart_title(ticker: &str, period: PeriodSpec) -> String {
    format!("{} {} Chart", ticker, period.code().to_uppercase())
}
