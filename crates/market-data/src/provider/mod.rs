//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The [`QuoteProvider`] trait that all providers implement
//! - Concrete provider implementations (Yahoo, Alpha Vantage)
//!
//! # Architecture
//!
//! The provider system is designed to be:
//! - **Provider-agnostic**: The core crate only sees the trait
//! - **Partial-success**: batch fetches return whatever resolved, a
//!   failing chunk never poisons its siblings
//! - **Composable**: a secondary provider can fill in symbols the
//!   primary missed

pub mod alpha_vantage;
pub mod yahoo;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{ChartSeries, RealtimeQuote};

pub use alpha_vantage::AlphaVantageProvider;
pub use yahoo::YahooProvider;

/// Maximum symbols per realtime quote request.
pub const QUOTE_BATCH_SIZE: usize = 10;

/// Range keyword for batched spark history requests (two years, daily).
pub const SPARK_RANGE: &str = "2y";

/// A source of realtime quotes and daily historical close series.
///
/// Implementations must not touch storage; they translate upstream
/// payloads into [`RealtimeQuote`] / [`ChartSeries`] and nothing else.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch current quotes for a set of symbols.
    ///
    /// Partial success: symbols the provider could not resolve are
    /// simply absent from the returned map. An error is returned only
    /// when nothing at all could be fetched.
    async fn fetch_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, RealtimeQuote>, MarketDataError>;

    /// Fetch batched daily close series covering roughly the last two
    /// years for many symbols at once.
    ///
    /// Symbols without history are absent from the map.
    async fn fetch_spark(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, ChartSeries>, MarketDataError>;

    /// Fetch the daily close series for a single symbol over an
    /// explicit window.
    async fn fetch_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChartSeries, MarketDataError>;
}
