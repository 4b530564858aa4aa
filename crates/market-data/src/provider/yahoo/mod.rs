//! Yahoo Finance market data provider.
//!
//! This is the primary provider. It covers:
//! - Equities/ETFs (e.g., AAPL, 7203.T)
//! - Foreign exchange rates (e.g., USDJPY=X)
//!
//! Quotes come from the v7 quote batch endpoint, history from the spark
//! batch endpoint with the v8 chart endpoint as the per-symbol path.

mod models;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{ChartSeries, RealtimeQuote};
use crate::provider::{QuoteProvider, QUOTE_BATCH_SIZE, SPARK_RANGE};

use models::{YahooChartResponse, YahooChartResult, YahooQuoteResponse, YahooSparkResponse};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get cookie: {}", e),
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get crumb: {}", e),
            })?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    /// Fetch one batch of realtime quotes (at most [`QUOTE_BATCH_SIZE`] symbols).
    async fn fetch_quote_chunk(
        &self,
        symbols: &[String],
    ) -> Result<Vec<RealtimeQuote>, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/quote?symbols={}&crumb={}",
            encode(&symbols.join(",")),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data: YahooQuoteResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse quote response: {}", e),
                })?;

        Ok(data
            .quote_response
            .result
            .into_iter()
            .filter_map(|item| {
                let price = item.regular_market_price?;
                if !price.is_finite() {
                    return None;
                }
                Some(RealtimeQuote {
                    symbol: item.symbol,
                    price,
                    currency: item.currency,
                    previous_close: item.regular_market_previous_close.filter(|p| p.is_finite()),
                })
            })
            .collect())
    }

    /// Fetch one spark history batch.
    async fn fetch_spark_chunk(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, ChartSeries>, MarketDataError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/spark?symbols={}&range={}&interval=1d",
            encode(&symbols.join(",")),
            SPARK_RANGE
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data: YahooSparkResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse spark response: {}", e),
                })?;

        let mut result = HashMap::new();
        for item in data.spark.result {
            if let Some(series) = item.response.first().and_then(chart_result_to_series) {
                if !series.is_empty() {
                    result.insert(item.symbol, series);
                }
            }
        }

        Ok(result)
    }
}

// ============================================================================
// QuoteProvider Implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, RealtimeQuote>, MarketDataError> {
        let mut result = HashMap::new();
        let mut last_err: Option<MarketDataError> = None;

        for chunk in symbols.chunks(QUOTE_BATCH_SIZE) {
            debug!("Fetching {} quotes from Yahoo", chunk.len());
            match self.fetch_quote_chunk(chunk).await {
                Ok(quotes) => {
                    for quote in quotes {
                        result.insert(quote.symbol.clone(), quote);
                    }
                }
                Err(e) => {
                    warn!("Quote batch of {} symbols failed: {}", chunk.len(), e);
                    last_err = Some(e);
                }
            }
        }

        // A failing chunk only drops its own symbols; error out only when
        // every chunk failed and nothing was fetched.
        match last_err {
            Some(e) if result.is_empty() && !symbols.is_empty() => Err(e),
            _ => Ok(result),
        }
    }

    async fn fetch_spark(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, ChartSeries>, MarketDataError> {
        let mut result = HashMap::new();
        let mut last_err: Option<MarketDataError> = None;

        for chunk in symbols.chunks(QUOTE_BATCH_SIZE) {
            debug!("Fetching spark history for {} symbols from Yahoo", chunk.len());
            match self.fetch_spark_chunk(chunk).await {
                Ok(series) => result.extend(series),
                Err(e) => {
                    warn!("Spark batch of {} symbols failed: {}", chunk.len(), e);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if result.is_empty() && !symbols.is_empty() => Err(e),
            _ => Ok(result),
        }
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChartSeries, MarketDataError> {
        debug!(
            "Fetching chart for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            encode(symbol),
            start.timestamp(),
            end.timestamp()
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data: YahooChartResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse chart response: {}", e),
                })?;

        let series = data
            .chart
            .result
            .as_deref()
            .and_then(|results| results.first())
            .and_then(chart_result_to_series)
            .ok_or(MarketDataError::NoDataForRange)?;

        if series.is_empty() {
            return Err(MarketDataError::NoDataForRange);
        }

        Ok(series)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a chart result payload into a [`ChartSeries`].
///
/// Null closes become NaN so they stay visibly missing instead of
/// turning into zeros.
fn chart_result_to_series(result: &YahooChartResult) -> Option<ChartSeries> {
    let timestamps = result.timestamp.as_ref()?;
    let closes = &result.indicators.as_ref()?.quote.first()?.close;

    let mut out = ChartSeries::default();
    for (ts, close) in timestamps.iter().zip(closes.iter()) {
        out.timestamps.push(*ts);
        out.closes.push(close.unwrap_or(f64::NAN));
    }

    Some(out)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote_batch() {
        let payload = r#"{
            "quoteResponse": {
                "result": [
                    {
                        "symbol": "AAPL",
                        "currency": "USD",
                        "regularMarketPrice": 232.5,
                        "regularMarketPreviousClose": 230.1
                    },
                    {
                        "symbol": "7203.T",
                        "currency": "JPY",
                        "regularMarketPrice": 2850.0
                    }
                ],
                "error": null
            }
        }"#;

        let data: YahooQuoteResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(data.quote_response.result.len(), 2);
        assert_eq!(data.quote_response.result[0].symbol, "AAPL");
        assert_eq!(
            data.quote_response.result[0].regular_market_previous_close,
            Some(230.1)
        );
        assert_eq!(
            data.quote_response.result[1].regular_market_previous_close,
            None
        );
    }

    #[test]
    fn test_parse_chart_with_null_closes() {
        let payload = r#"{
            "chart": {
                "result": [
                    {
                        "timestamp": [1700000000, 1700086400, 1700172800],
                        "indicators": {
                            "quote": [
                                { "close": [150.0, null, 152.5] }
                            ]
                        }
                    }
                ],
                "error": null
            }
        }"#;

        let data: YahooChartResponse = serde_json::from_str(payload).unwrap();
        let result = data.chart.result.as_deref().unwrap().first().unwrap();
        let series = chart_result_to_series(result).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes[0], 150.0);
        assert!(series.closes[1].is_nan());
        assert_eq!(series.closes[2], 152.5);
    }

    #[test]
    fn test_parse_spark_batch() {
        let payload = r#"{
            "spark": {
                "result": [
                    {
                        "symbol": "MSFT",
                        "response": [
                            {
                                "timestamp": [1700000000, 1700086400],
                                "indicators": {
                                    "quote": [ { "close": [370.0, 371.5] } ]
                                }
                            }
                        ]
                    },
                    {
                        "symbol": "EMPTY",
                        "response": []
                    }
                ]
            }
        }"#;

        let data: YahooSparkResponse = serde_json::from_str(payload).unwrap();
        let mut result = HashMap::new();
        for item in data.spark.result {
            if let Some(series) = item.response.first().and_then(chart_result_to_series) {
                result.insert(item.symbol, series);
            }
        }

        assert_eq!(result.len(), 1);
        assert_eq!(result["MSFT"].closes, vec![370.0, 371.5]);
    }

    #[test]
    fn test_chart_result_without_timestamps_is_none() {
        let payload = r#"{ "chart": { "result": [ { "indicators": { "quote": [] } } ] } }"#;
        let data: YahooChartResponse = serde_json::from_str(payload).unwrap();
        let result = data.chart.result.as_deref().unwrap().first().unwrap();
        assert!(chart_result_to_series(result).is_none());
    }
}
