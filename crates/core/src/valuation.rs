//! Per-holding valuation rows.
//!
//! Combines holdings, stored quote records, and the USD/JPY rate into
//! display-ready rows: price and position value in both currencies plus
//! day/month/year change fractions in both currency domains.
//!
//! Conversion uses the current rate for every figure, including
//! baselines. That is a deliberate approximation: the same rate appears
//! in numerator and denominator of a change ratio, so the converted
//! domain's change rates equal the native ones, and only the absolute
//! converted values carry the approximation.

use std::collections::HashMap;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::holdings::Holding;
use crate::quotes::changes::change_rate;
use crate::quotes::fx::{currency_domain, CurrencyDomain};
use crate::quotes::model::{BaselinePeriod, QuoteRecord};

/// One display row for an owned position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRow {
    pub symbol: String,
    pub company_name: Option<String>,
    pub shares: Decimal,
    pub price_usd: Option<f64>,
    pub price_jpy: Option<f64>,
    pub value_usd: Option<f64>,
    pub value_jpy: Option<f64>,
    pub day_change_usd: Option<f64>,
    pub day_change_jpy: Option<f64>,
    pub month_change_usd: Option<f64>,
    pub month_change_jpy: Option<f64>,
    pub year_change_usd: Option<f64>,
    pub year_change_jpy: Option<f64>,
}

/// Build valuation rows for all holdings.
///
/// `fx_rate` is JPY per USD. Rows for symbols without a stored quote
/// record still appear, with every figure null.
pub fn build_valuations(
    holdings: &[Holding],
    quotes: &HashMap<String, QuoteRecord>,
    fx_rate: Option<f64>,
) -> Vec<ValuationRow> {
    holdings
        .iter()
        .map(|holding| build_row(holding, quotes.get(&holding.symbol), fx_rate))
        .collect()
}

fn build_row(holding: &Holding, record: Option<&QuoteRecord>, fx_rate: Option<f64>) -> ValuationRow {
    // Provider-reported currency wins over the declared one; the
    // declared currency covers symbols never successfully quoted.
    let currency = record
        .and_then(|r| r.currency.clone())
        .or_else(|| holding.currency.map(|c| c.as_str().to_string()));
    let domain = currency_domain(&holding.symbol, currency.as_deref());

    let price = record.and_then(|r| r.price).filter(|p| p.is_finite());
    let shares = holding.shares.to_f64();

    let to_usd = |value: Option<f64>| -> Option<f64> {
        match domain {
            CurrencyDomain::Usd => value,
            CurrencyDomain::Jpy => value.zip(fx_rate).map(|(v, r)| v / r),
            CurrencyDomain::Other => None,
        }
    };
    let to_jpy = |value: Option<f64>| -> Option<f64> {
        match domain {
            CurrencyDomain::Jpy => value,
            CurrencyDomain::Usd => value.zip(fx_rate).map(|(v, r)| v * r),
            CurrencyDomain::Other => None,
        }
    };

    let baseline = |period: BaselinePeriod| record.and_then(|r| r.baseline(period));

    let change_pair = |period: BaselinePeriod| -> (Option<f64>, Option<f64>) {
        let base = baseline(period);
        (
            change_rate(to_usd(price), to_usd(base)),
            change_rate(to_jpy(price), to_jpy(base)),
        )
    };

    let (day_change_usd, day_change_jpy) = change_pair(BaselinePeriod::Day);
    let (month_change_usd, month_change_jpy) = change_pair(BaselinePeriod::Month);
    let (year_change_usd, year_change_jpy) = change_pair(BaselinePeriod::Year);

    let price_usd = to_usd(price);
    let price_jpy = to_jpy(price);

    ValuationRow {
        symbol: holding.symbol.clone(),
        company_name: holding.company_name.clone(),
        shares: holding.shares,
        price_usd,
        price_jpy,
        value_usd: price_usd.zip(shares).map(|(p, s)| p * s),
        value_jpy: price_jpy.zip(shares).map(|(p, s)| p * s),
        day_change_usd,
        day_change_jpy,
        month_change_usd,
        month_change_jpy,
        year_change_usd,
        year_change_jpy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_record(symbol: &str, price: f64, day: f64) -> QuoteRecord {
        let mut record = QuoteRecord::new(symbol);
        record.price = Some(price);
        record.currency = Some("USD".to_string());
        record.price_1d = Some(day);
        record
    }

    #[test]
    fn test_day_change_equal_across_domains() {
        let holding = Holding::new("AAPL", dec!(2));
        let quotes = HashMap::from([("AAPL".to_string(), usd_record("AAPL", 100.0, 95.0))]);

        let rows = build_valuations(&[holding], &quotes, Some(150.0));
        let row = &rows[0];

        let expected = (100.0 - 95.0) / 95.0;
        assert!((row.day_change_usd.unwrap() - expected).abs() < 1e-12);
        assert!((row.day_change_jpy.unwrap() - expected).abs() < 1e-12);
        assert!((expected - 0.0526).abs() < 1e-3);
    }

    #[test]
    fn test_usd_holding_converted_values() {
        let holding = Holding::new("AAPL", dec!(2));
        let quotes = HashMap::from([("AAPL".to_string(), usd_record("AAPL", 100.0, 95.0))]);

        let rows = build_valuations(&[holding], &quotes, Some(150.0));
        let row = &rows[0];

        assert_eq!(row.price_usd, Some(100.0));
        assert_eq!(row.price_jpy, Some(15_000.0));
        assert_eq!(row.value_usd, Some(200.0));
        assert_eq!(row.value_jpy, Some(30_000.0));
    }

    #[test]
    fn test_tokyo_holding_converted_values() {
        let mut record = QuoteRecord::new("7203.T");
        record.price = Some(3_000.0);
        record.currency = Some("JPY".to_string());
        record.price_1m = Some(2_500.0);

        let holding = Holding::new("7203.T", dec!(100));
        let quotes = HashMap::from([("7203.T".to_string(), record)]);

        let rows = build_valuations(&[holding], &quotes, Some(150.0));
        let row = &rows[0];

        assert_eq!(row.price_jpy, Some(3_000.0));
        assert_eq!(row.price_usd, Some(20.0));
        assert_eq!(row.value_jpy, Some(300_000.0));
        let expected = (3_000.0 - 2_500.0) / 2_500.0;
        assert!((row.month_change_jpy.unwrap() - expected).abs() < 1e-12);
        assert!((row.month_change_usd.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_rate_blocks_conversion_only() {
        let holding = Holding::new("AAPL", dec!(1));
        let quotes = HashMap::from([("AAPL".to_string(), usd_record("AAPL", 100.0, 95.0))]);

        let rows = build_valuations(&[holding], &quotes, None);
        let row = &rows[0];

        assert_eq!(row.price_usd, Some(100.0));
        assert_eq!(row.price_jpy, None);
        assert!(row.day_change_usd.is_some());
        assert_eq!(row.day_change_jpy, None);
    }

    #[test]
    fn test_zero_baseline_change_undefined() {
        let holding = Holding::new("AAPL", dec!(1));
        let quotes = HashMap::from([("AAPL".to_string(), usd_record("AAPL", 100.0, 0.0))]);

        let rows = build_valuations(&[holding], &quotes, Some(150.0));
        assert_eq!(rows[0].day_change_usd, None);
    }

    #[test]
    fn test_unquoted_holding_yields_null_row() {
        let holding = Holding::new("NEWPOS", dec!(5));
        let rows = build_valuations(&[holding], &HashMap::new(), Some(150.0));
        let row = &rows[0];
        assert_eq!(row.symbol, "NEWPOS");
        assert_eq!(row.price_usd, None);
        assert_eq!(row.value_jpy, None);
        assert_eq!(row.day_change_usd, None);
    }
}
