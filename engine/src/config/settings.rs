// Dashboard settings. Only in-process defaults are used; nothing is read from disk.
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::EngineError;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// IANA name of the zone bars are displayed in.
    pub display_timezone: String,
    pub default_ticker: String,
    pub default_window: usize,
    pub max_window: usize,
    pub watchlist: Vec<String>,
    pub provider: ProviderSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl DashboardSettings {
    pub fn display_zone(&self) -> Result<Tz, EngineError> {
        self.display_timezone.parse::<Tz>().map_err(|e| {
            EngineError::Config(format!(
                "unknown display timezone '{}': {}",
                self.display_timezone, e
            ))
        })
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            display_timezone: "America/Costa_Rica".to_string(),
            default_ticker: "NVDA".to_string(),
            default_window: 20,
            max_window: 364,
            watchlist: ["AAPL", "AMZN", "GOOGL", "MSFT", "NVDA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            provider: ProviderSettings::default(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            request_timeout_secs: 10,
        }
    }
}
