use super::types::*;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// Market line used when no quote is available.
pub const FLAT: &str = "Flat";

pub struct MarketPulse {
    client: Client,
    base_url: String,
}

/// Percent change from the first session's open to its close.
pub fn session_change(quote: &ChartQuote) -> Option<f64> {
    let open = quote.open.first().copied().flatten()?;
    let close = quote.close.first().copied().flatten()?;
    if open == 0.0 {
        return None;
    }
    Some((close - open) / open * 100.0)
}

/// "NVDA UP 1.23%" / "NVDA DOWN 0.40%". Zero change reads as DOWN.
pub fn format_move(ticker: &str, change_pct: f64) -> String {
    let direction = if change_pct > 0.0 { "UP" } else { "DOWN" };
    format!("{} {} {:.2}%", ticker, direction, change_pct.abs())
}

impl MarketPulse {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        // The chart endpoint rejects non-browser agents.
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36")
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Today's move for `ticker`, or `None` when the session has no data.
    pub async fn daily_change(&self, ticker: &str) -> Result<Option<f64>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let resp = self.client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await
            .context("market chart request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("market chart {} ({}): {}", ticker, status, body);
        }

        let parsed: ChartResponse = resp.json().await
            .context("failed to parse market chart response")?;

        let change = parsed
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.indicators.quote.into_iter().next())
            .and_then(|q| session_change(&q));

        Ok(change)
    }

    /// Market line for prompts. Never fails: any problem reads as "Flat".
    pub async fn market_line(&self, ticker: &str) -> String {
        match self.daily_change(ticker).await {
            Ok(Some(change)) => format_move(ticker, change),
            Ok(None) => FLAT.to_string(),
            Err(e) => {
                tracing::warn!(ticker, error = %e, "market quote failed");
                FLAT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(open: Option<f64>, close: Option<f64>) -> ChartQuote {
        ChartQuote {
            open: vec![open],
            close: vec![close],
        }
    }

    #[test]
    fn test_session_change() {
        let change = session_change(&quote(Some(100.0), Some(101.5))).unwrap();
        assert!((change - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_session_change_missing_values() {
        assert!(session_change(&quote(None, Some(1.0))).is_none());
        assert!(session_change(&quote(Some(0.0), Some(1.0))).is_none());
        assert!(session_change(&ChartQuote { open: vec![], close: vec![] }).is_none());
    }

    #[test]
    fn test_format_move() {
        assert_eq!(format_move("NVDA", 1.234), "NVDA UP 1.23%");
        assert_eq!(format_move("NVDA", -0.4), "NVDA DOWN 0.40%");
        assert_eq!(format_move("NVDA", 0.0), "NVDA DOWN 0.00%");
    }

    #[test]
    fn test_chart_response_with_nulls_parses() {
        let json = r#"{"chart":{"result":[{"meta":{"symbol":"NVDA"},
            "indicators":{"quote":[{"open":[120.0,null],"close":[118.8,null],"volume":[1]}]}}],
            "error":null}}"#;
        let parsed: ChartResponse = serde_json::from_str(json).unwrap();
        let result = parsed.chart.result.unwrap();
        let change = session_change(&result[0].indicators.quote[0]).unwrap();
        assert!((change + 1.0).abs() < 1e-9);
    }
}
