//! Yahoo Finance API response models.
//!
//! Covers the three endpoints the provider uses: the v7 quote batch,
//! the spark history batch, and the v8 per-symbol chart.

use serde::Deserialize;

// ============================================================================
// v7 quote batch
// ============================================================================

/// Main response wrapper for the v7 quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteResponse {
    pub quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteResult {
    #[serde(default)]
    pub result: Vec<YahooQuoteItem>,
    // Note: error field exists in the API but we handle errors via HTTP status
}

/// One symbol's entry in a quote batch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteItem {
    pub symbol: String,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
}

// ============================================================================
// Spark history batch
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YahooSparkResponse {
    pub spark: YahooSparkResult,
}

#[derive(Debug, Deserialize)]
pub struct YahooSparkResult {
    #[serde(default)]
    pub result: Vec<YahooSparkItem>,
}

#[derive(Debug, Deserialize)]
pub struct YahooSparkItem {
    pub symbol: String,
    #[serde(default)]
    pub response: Vec<YahooChartResult>,
}

// ============================================================================
// v8 chart (shared by spark entries and per-symbol chart fetches)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooIndicatorQuote>,
}

/// Close array with nulls for halted/missing sessions
#[derive(Debug, Deserialize)]
pub struct YahooIndicatorQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
