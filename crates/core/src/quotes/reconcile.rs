//! Reconciliation of freshly fetched data into stored quote records.
//!
//! This is a pure merge. The rule everywhere is COALESCE: a fresh value
//! wins and bumps its timestamp; a missing fresh value leaves the stored
//! value and its timestamp untouched. A failed fetch therefore degrades
//! a record's freshness, never its content.

use chrono::{DateTime, Utc};

use super::model::{BaselinePeriod, QuoteRecord};

/// Everything one refresh cycle learned about a symbol.
///
/// `price` is already resolved through its priority chain (fresh quote,
/// else the series' most recent valid close) by the refresh service;
/// each baseline is the selector's output, `None` when the series fetch
/// failed or produced nothing usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub day: Option<f64>,
    pub month: Option<f64>,
    pub year: Option<f64>,
}

impl Observation {
    pub fn baseline(&self, period: BaselinePeriod) -> Option<f64> {
        match period {
            BaselinePeriod::Day => self.day,
            BaselinePeriod::Month => self.month,
            BaselinePeriod::Year => self.year,
        }
    }

    pub fn set_baseline(&mut self, period: BaselinePeriod, value: Option<f64>) {
        match period {
            BaselinePeriod::Day => self.day = value,
            BaselinePeriod::Month => self.month = value,
            BaselinePeriod::Year => self.year = value,
        }
    }
}

/// Merge an observation into the stored record for `symbol`.
///
/// Field rules:
/// - `price`: fresh value, else stored; `updated_at` advances only on a
///   fresh value.
/// - `currency`: fresh value, else stored.
/// - each baseline independently: fresh value sets it and bumps its
///   timestamp, otherwise both the stored value and its timestamp are
///   retained.
///
/// Idempotent for a fixed `now`: reconciling the same observation into
/// its own output changes nothing.
pub fn reconcile(
    symbol: &str,
    observation: &Observation,
    existing: Option<&QuoteRecord>,
    now: DateTime<Utc>,
) -> QuoteRecord {
    let mut record = existing
        .cloned()
        .unwrap_or_else(|| QuoteRecord::new(symbol));

    if let Some(price) = observation.price.filter(|p| p.is_finite()) {
        record.price = Some(price);
        record.updated_at = Some(now);
    }

    if let Some(currency) = observation.currency.as_ref() {
        record.currency = Some(currency.clone());
    }

    for period in BaselinePeriod::ALL {
        if let Some(value) = observation.baseline(period).filter(|v| v.is_finite()) {
            record.set_baseline(period, Some(value), Some(now));
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 22, h, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_values_win_and_bump_timestamps() {
        let observation = Observation {
            price: Some(155.0),
            currency: Some("USD".to_string()),
            day: Some(148.0),
            month: Some(140.0),
            year: Some(120.0),
        };

        let record = reconcile("AAPL", &observation, None, at(12));
        assert_eq!(record.price, Some(155.0));
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert_eq!(record.updated_at, Some(at(12)));
        assert_eq!(record.price_1d, Some(148.0));
        assert_eq!(record.updated_1d_at, Some(at(12)));
        assert_eq!(record.price_1y, Some(120.0));
    }

    #[test]
    fn test_baselines_retained_when_fetch_fails() {
        // Stored record with known-good baselines
        let mut stored = QuoteRecord::new("AAPL");
        stored.price = Some(150.0);
        stored.updated_at = Some(at(8));
        stored.set_baseline(BaselinePeriod::Day, Some(148.0), Some(at(8)));
        stored.set_baseline(BaselinePeriod::Month, Some(140.0), Some(at(8)));

        // Fresh quote arrived but the chart fetch failed entirely
        let observation = Observation {
            price: Some(155.0),
            currency: None,
            ..Default::default()
        };

        let record = reconcile("AAPL", &observation, Some(&stored), at(12));
        assert_eq!(record.price, Some(155.0));
        assert_eq!(record.updated_at, Some(at(12)));
        // Baselines and their timestamps untouched
        assert_eq!(record.price_1d, Some(148.0));
        assert_eq!(record.updated_1d_at, Some(at(8)));
        assert_eq!(record.price_1m, Some(140.0));
        assert_eq!(record.updated_1m_at, Some(at(8)));
        assert_eq!(record.price_1y, None);
    }

    #[test]
    fn test_total_failure_leaves_record_unchanged() {
        let mut stored = QuoteRecord::new("AAPL");
        stored.price = Some(150.0);
        stored.updated_at = Some(at(8));
        stored.set_baseline(BaselinePeriod::Year, Some(120.0), Some(at(8)));

        let record = reconcile("AAPL", &Observation::default(), Some(&stored), at(12));
        assert_eq!(record, stored);
    }

    #[test]
    fn test_idempotent_for_fixed_now() {
        let observation = Observation {
            price: Some(155.0),
            currency: Some("USD".to_string()),
            day: Some(148.0),
            month: None,
            year: Some(120.0),
        };

        let once = reconcile("AAPL", &observation, None, at(12));
        let twice = reconcile("AAPL", &observation, Some(&once), at(12));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nan_observation_values_are_ignored() {
        let mut stored = QuoteRecord::new("AAPL");
        stored.price = Some(150.0);
        stored.set_baseline(BaselinePeriod::Day, Some(148.0), Some(at(8)));

        let observation = Observation {
            price: Some(f64::NAN),
            day: Some(f64::NAN),
            ..Default::default()
        };

        let record = reconcile("AAPL", &observation, Some(&stored), at(12));
        assert_eq!(record.price, Some(150.0));
        assert_eq!(record.price_1d, Some(148.0));
        assert_eq!(record.updated_1d_at, Some(at(8)));
    }
}
