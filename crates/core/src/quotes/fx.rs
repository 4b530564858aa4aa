//! USD/JPY exchange rate normalization and currency-domain
//! classification.
//!
//! The tracker stores one FX row under the reserved symbol
//! [`FX_SYMBOL`](crate::constants::FX_SYMBOL), oriented as JPY per USD.
//! Providers occasionally return the inverse pair orientation; since a
//! plausible JPY-per-USD rate is far above 1 and its inverse far below,
//! any rate in (0, 1) is inverted on ingest.

use crate::constants::{FX_SYMBOL, TOKYO_SUFFIX};
use crate::quotes::model::QuoteRecord;

/// Which currency a symbol's prices are natively denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyDomain {
    Usd,
    Jpy,
    /// Unrecognized; values pass through unconverted.
    Other,
}

/// Classify a symbol's native currency domain.
///
/// Tokyo listings (`.T` suffix) and anything the provider reports as JPY
/// are JPY-native; an explicit USD report (or no report at all for a
/// non-Tokyo symbol) means USD.
pub fn currency_domain(symbol: &str, currency: Option<&str>) -> CurrencyDomain {
    if symbol.ends_with(TOKYO_SUFFIX) {
        return CurrencyDomain::Jpy;
    }
    match currency.map(|c| c.to_ascii_uppercase()) {
        Some(ref c) if c == "JPY" => CurrencyDomain::Jpy,
        Some(ref c) if c == "USD" => CurrencyDomain::Usd,
        Some(_) => CurrencyDomain::Other,
        // US-listed symbols without a currency report are the common
        // case for the fill-in provider
        None => CurrencyDomain::Usd,
    }
}

/// Normalize a raw exchange rate to JPY-per-USD orientation.
///
/// Returns `None` for non-finite or non-positive rates; inverts rates
/// in (0, 1).
pub fn normalize_rate(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    if raw < 1.0 {
        Some(1.0 / raw)
    } else {
        Some(raw)
    }
}

/// Effective JPY-per-USD rate from the stored FX record.
pub fn effective_fx_rate(record: &QuoteRecord) -> Option<f64> {
    debug_assert_eq!(record.symbol, FX_SYMBOL);
    record.price.and_then(normalize_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_rate_is_flipped() {
        let rate = normalize_rate(0.0066225).unwrap();
        assert!((rate - 151.0).abs() < 0.01);
    }

    #[test]
    fn test_normal_rate_passes_through() {
        assert_eq!(normalize_rate(151.0), Some(151.0));
        assert_eq!(normalize_rate(1.0), Some(1.0));
    }

    #[test]
    fn test_degenerate_rates_rejected() {
        assert_eq!(normalize_rate(0.0), None);
        assert_eq!(normalize_rate(-151.0), None);
        assert_eq!(normalize_rate(f64::NAN), None);
        assert_eq!(normalize_rate(f64::INFINITY), None);
    }

    #[test]
    fn test_tokyo_suffix_is_jpy() {
        assert_eq!(currency_domain("7203.T", None), CurrencyDomain::Jpy);
        // Suffix wins even over a conflicting currency report
        assert_eq!(currency_domain("7203.T", Some("USD")), CurrencyDomain::Jpy);
    }

    #[test]
    fn test_currency_report_classification() {
        assert_eq!(currency_domain("AAPL", Some("USD")), CurrencyDomain::Usd);
        assert_eq!(currency_domain("XYZ", Some("jpy")), CurrencyDomain::Jpy);
        assert_eq!(currency_domain("SAP.DE", Some("EUR")), CurrencyDomain::Other);
        assert_eq!(currency_domain("AAPL", None), CurrencyDomain::Usd);
    }

    #[test]
    fn test_effective_fx_rate_normalizes() {
        let mut record = QuoteRecord::new(FX_SYMBOL);
        record.price = Some(0.0066225);
        let rate = effective_fx_rate(&record).unwrap();
        assert!(rate > 1.0);

        record.price = None;
        assert_eq!(effective_fx_rate(&record), None);
    }
}
