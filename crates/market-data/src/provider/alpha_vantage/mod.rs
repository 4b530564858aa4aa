//! Alpha Vantage market data provider implementation.
//!
//! Used as the fill-in provider: the refresh pipeline only consults it
//! for symbols the primary provider failed to resolve.
//!
//! - Realtime quotes via the GLOBAL_QUOTE endpoint
//! - Daily close series via the TIME_SERIES_DAILY endpoint
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute,
//! so consecutive requests within one call are paced.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{ChartSeries, RealtimeQuote};
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Delay between consecutive requests (free tier: 5 calls per minute).
const REQUEST_DELAY: Duration = Duration::from_secs(12);

/// Alpha Vantage market data provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// GLOBAL_QUOTE response
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
}

/// TIME_SERIES_DAILY response
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Map the three "soft failure" payload fields into errors.
    fn check_payload_errors(
        error_message: Option<String>,
        note: Option<String>,
        information: Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(message) = error_message {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            });
        }
        // A "Note" or "Information" field in place of data means the
        // free tier quota was exhausted.
        if note.is_some() || information.is_some() {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_global_quote(&self, symbol: &str) -> Result<RealtimeQuote, MarketDataError> {
        let url = format!(
            "{}?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            BASE_URL,
            urlencoding::encode(symbol),
            self.api_key
        );

        let data: GlobalQuoteResponse = self.client.get(&url).send().await?.json().await.map_err(
            |e| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse GLOBAL_QUOTE response: {}", e),
            },
        )?;

        Self::check_payload_errors(data.error_message, data.note, data.information)?;

        let quote = data
            .global_quote
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let price = quote
            .price
            .as_deref()
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|p| p.is_finite())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(RealtimeQuote {
            symbol: quote.symbol.unwrap_or_else(|| symbol.to_string()),
            price,
            // GLOBAL_QUOTE does not report a currency
            currency: None,
            previous_close: quote
                .previous_close
                .as_deref()
                .and_then(|p| p.parse::<f64>().ok())
                .filter(|p| p.is_finite()),
        })
    }
}

// ============================================================================
// QuoteProvider Implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, RealtimeQuote>, MarketDataError> {
        let mut result = HashMap::new();

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(REQUEST_DELAY).await;
            }

            debug!("Fetching quote for {} from Alpha Vantage", symbol);
            match self.fetch_global_quote(symbol).await {
                Ok(quote) => {
                    result.insert(symbol.clone(), quote);
                }
                Err(MarketDataError::RateLimited { provider }) => {
                    // Quota exhausted, further symbols would fail too
                    warn!("Alpha Vantage rate limited, dropping remaining symbols");
                    if result.is_empty() {
                        return Err(MarketDataError::RateLimited { provider });
                    }
                    break;
                }
                Err(e) => {
                    warn!("Alpha Vantage quote for {} failed: {}", symbol, e);
                }
            }
        }

        Ok(result)
    }

    async fn fetch_spark(
        &self,
        _symbols: &[String],
    ) -> Result<HashMap<String, ChartSeries>, MarketDataError> {
        // No batch history endpoint; the pipeline falls back to
        // per-symbol fetch_series calls.
        Ok(HashMap::new())
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChartSeries, MarketDataError> {
        let url = format!(
            "{}?function=TIME_SERIES_DAILY&symbol={}&outputsize=full&apikey={}",
            BASE_URL,
            urlencoding::encode(symbol),
            self.api_key
        );

        debug!("Fetching daily series for {} from Alpha Vantage", symbol);

        let data: TimeSeriesResponse = self.client.get(&url).send().await?.json().await.map_err(
            |e| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse TIME_SERIES_DAILY response: {}", e),
            },
        )?;

        Self::check_payload_errors(data.error_message, data.note, data.information)?;

        let time_series = data
            .time_series
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        // Dates arrive as a map, so sort into ascending timestamp order.
        let mut rows: Vec<(i64, f64)> = time_series
            .into_iter()
            .filter_map(|(date, quote)| {
                let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
                let ts = day.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
                let close = quote.close.parse::<f64>().unwrap_or(f64::NAN);
                Some((ts, close))
            })
            .filter(|(ts, _)| *ts >= start.timestamp() && *ts <= end.timestamp())
            .collect();
        rows.sort_by_key(|(ts, _)| *ts);

        if rows.is_empty() {
            return Err(MarketDataError::NoDataForRange);
        }

        let (timestamps, closes) = rows.into_iter().unzip();
        Ok(ChartSeries::new(timestamps, closes))
    }
}

// ============================================================================
// Tests
// ============================================================================
