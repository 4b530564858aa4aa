//! Domain models shared by all market data providers.

use serde::{Deserialize, Serialize};

/// A realtime quote for a single symbol.
///
/// Prices are plain `f64` because providers deliver IEEE floats and the
/// pipeline only ever derives ratios from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeQuote {
    /// Uppercase ticker symbol, e.g. `AAPL`, `7203.T`, `USDJPY=X`.
    pub symbol: String,
    /// Last traded price in the symbol's native currency.
    pub price: f64,
    /// ISO currency code as reported by the provider, when known.
    pub currency: Option<String>,
    /// Previous session's close, when the provider reports it.
    pub previous_close: Option<f64>,
}

/// A daily historical close series for one symbol.
///
/// `timestamps` are epoch seconds in strictly ascending order and
/// `closes` is the same length. A missing close for a trading day is
/// `f64::NAN`, never silently zero: a zero close would poison change
/// ratios downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub timestamps: Vec<i64>,
    pub closes: Vec<f64>,
}

impl ChartSeries {
    pub fn new(timestamps: Vec<i64>, closes: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), closes.len());
        Self { timestamps, closes }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First finite close in the series, scanning forward.
    pub fn earliest_valid_close(&self) -> Option<f64> {
        self.closes.iter().copied().find(|c| c.is_finite())
    }

    /// Most recent finite close in the series, scanning backward.
    pub fn latest_valid_close(&self) -> Option<f64> {
        self.closes.iter().rev().copied().find(|c| c.is_finite())
    }

    /// True when at least one close is finite.
    pub fn has_valid_close(&self) -> bool {
        self.closes.iter().any(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_close_scans() {
        let series = ChartSeries::new(
            vec![100, 200, 300, 400],
            vec![f64::NAN, 12.0, f64::NAN, 15.0],
        );
        assert_eq!(series.earliest_valid_close(), Some(12.0));
        assert_eq!(series.latest_valid_close(), Some(15.0));
        assert!(series.has_valid_close());
    }

    #[test]
    fn test_all_nan_series_has_no_valid_close() {
        let series = ChartSeries::new(vec![100, 200], vec![f64::NAN, f64::NAN]);
        assert_eq!(series.earliest_valid_close(), None);
        assert_eq!(series.latest_valid_close(), None);
        assert!(!series.has_valid_close());
    }

    #[test]
    fn test_empty_series() {
        let series = ChartSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.latest_valid_close(), None);
    }
}
