//! Holding domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// The two currencies the tracker supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Jpy,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "JPY" => Ok(Currency::Jpy),
            other => Err(Error::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// One owned position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Uppercase ticker symbol, unique across the portfolio.
    pub symbol: String,
    /// Number of shares held. Decimal to keep fractional share counts
    /// exact through storage round-trips.
    pub shares: Decimal,
    /// Declared currency, when the suffix alone cannot classify the
    /// symbol (e.g. a JPY-denominated fund without a `.T` suffix).
    pub currency: Option<Currency>,
    /// Display name, fetched lazily from the provider when absent.
    pub company_name: Option<String>,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, shares: Decimal) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            shares,
            currency: None,
            company_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_round_trip() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("JPY".parse::<Currency>().unwrap(), Currency::Jpy);
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[test]
    fn test_new_uppercases_symbol() {
        let holding = Holding::new("aapl", dec!(10.5));
        assert_eq!(holding.symbol, "AAPL");
        assert_eq!(holding.shares, dec!(10.5));
    }
}
