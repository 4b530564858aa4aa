//! Quote record domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lookback periods for which a baseline close is kept.
///
/// The selector itself takes an arbitrary target timestamp, so adding
/// further periods later is a storage change, not an algorithm change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselinePeriod {
    Day,
    Month,
    Year,
}

impl BaselinePeriod {
    pub const ALL: [BaselinePeriod; 3] =
        [BaselinePeriod::Day, BaselinePeriod::Month, BaselinePeriod::Year];

    /// Short label used in logs and report output.
    pub fn label(&self) -> &'static str {
        match self {
            BaselinePeriod::Day => "1d",
            BaselinePeriod::Month => "1m",
            BaselinePeriod::Year => "1y",
        }
    }

    /// Epoch-second target for this lookback, relative to `as_of`.
    ///
    /// The one-day target is the end of the previous UTC calendar day
    /// (midnight minus one second), so "previous trading day" resolves
    /// through the backward scan rather than calendar arithmetic. Over
    /// a weekend that lands on Friday's close without special-casing.
    pub fn target_timestamp(&self, as_of: DateTime<Utc>) -> i64 {
        match self {
            BaselinePeriod::Day => {
                let midnight = as_of
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default()
                    .and_utc();
                midnight.timestamp() - 1
            }
            BaselinePeriod::Month => (as_of - Duration::days(30)).timestamp(),
            BaselinePeriod::Year => (as_of - Duration::days(365)).timestamp(),
        }
    }
}

/// The persisted state for one symbol: current price plus one baseline
/// close per lookback period, each with its own refresh timestamp.
///
/// Every value column is nullable. A missing baseline means "never
/// successfully computed", and reconciliation never replaces a known
/// value with null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Uppercase ticker symbol, primary key.
    pub symbol: String,
    /// Latest known price in the symbol's native currency.
    pub price: Option<f64>,
    /// ISO currency code as last reported by the provider.
    pub currency: Option<String>,
    /// When `price` was last refreshed.
    pub updated_at: Option<DateTime<Utc>>,
    /// One-trading-day baseline close.
    pub price_1d: Option<f64>,
    pub updated_1d_at: Option<DateTime<Utc>>,
    /// One-month baseline close.
    pub price_1m: Option<f64>,
    pub updated_1m_at: Option<DateTime<Utc>>,
    /// One-year baseline close.
    pub price_1y: Option<f64>,
    pub updated_1y_at: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            currency: None,
            updated_at: None,
            price_1d: None,
            updated_1d_at: None,
            price_1m: None,
            updated_1m_at: None,
            price_1y: None,
            updated_1y_at: None,
        }
    }

    pub fn baseline(&self, period: BaselinePeriod) -> Option<f64> {
        match period {
            BaselinePeriod::Day => self.price_1d,
            BaselinePeriod::Month => self.price_1m,
            BaselinePeriod::Year => self.price_1y,
        }
    }

    pub fn baseline_updated_at(&self, period: BaselinePeriod) -> Option<DateTime<Utc>> {
        match period {
            BaselinePeriod::Day => self.updated_1d_at,
            BaselinePeriod::Month => self.updated_1m_at,
            BaselinePeriod::Year => self.updated_1y_at,
        }
    }

    pub fn set_baseline(
        &mut self,
        period: BaselinePeriod,
        value: Option<f64>,
        at: Option<DateTime<Utc>>,
    ) {
        match period {
            BaselinePeriod::Day => {
                self.price_1d = value;
                self.updated_1d_at = at;
            }
            BaselinePeriod::Month => {
                self.price_1m = value;
                self.updated_1m_at = at;
            }
            BaselinePeriod::Year => {
                self.price_1y = value;
                self.updated_1y_at = at;
            }
        }
    }

    /// True when the current price and every baseline is present.
    /// The FX self-heal path uses this to decide whether a refresh is
    /// needed before a rate can be served.
    pub fn has_all_prices(&self) -> bool {
        self.price.is_some()
            && self.price_1d.is_some()
            && self.price_1m.is_some()
            && self.price_1y.is_some()
    }

    /// True when every baseline was refreshed on the given UTC date.
    pub fn baselines_fresh_on(&self, date: chrono::NaiveDate) -> bool {
        BaselinePeriod::ALL.iter().all(|p| {
            self.baseline_updated_at(*p)
                .map(|at| at.date_naive() == date)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_target_is_end_of_previous_utc_day() {
        let as_of = Utc.with_ymd_and_hms(2025, 8, 22, 14, 30, 0).unwrap();
        let target = BaselinePeriod::Day.target_timestamp(as_of);
        let expected = Utc.with_ymd_and_hms(2025, 8, 21, 23, 59, 59).unwrap();
        assert_eq!(target, expected.timestamp());
    }

    #[test]
    fn test_month_and_year_targets() {
        let as_of = Utc.with_ymd_and_hms(2025, 8, 22, 14, 30, 0).unwrap();
        assert_eq!(
            BaselinePeriod::Month.target_timestamp(as_of),
            (as_of - Duration::days(30)).timestamp()
        );
        assert_eq!(
            BaselinePeriod::Year.target_timestamp(as_of),
            (as_of - Duration::days(365)).timestamp()
        );
    }

    #[test]
    fn test_baselines_fresh_on() {
        let now = Utc.with_ymd_and_hms(2025, 8, 22, 9, 0, 0).unwrap();
        let mut record = QuoteRecord::new("AAPL");
        assert!(!record.baselines_fresh_on(now.date_naive()));

        for period in BaselinePeriod::ALL {
            record.set_baseline(period, Some(100.0), Some(now));
        }
        assert!(record.baselines_fresh_on(now.date_naive()));
        assert!(!record.baselines_fresh_on(now.date_naive().succ_opt().unwrap()));
    }

    #[test]
    fn test_has_all_prices() {
        let mut record = QuoteRecord::new("USDJPY=X");
        record.price = Some(150.0);
        record.price_1d = Some(149.0);
        record.price_1m = Some(147.0);
        assert!(!record.has_all_prices());
        record.price_1y = Some(140.0);
        assert!(record.has_all_prices());
    }
}
