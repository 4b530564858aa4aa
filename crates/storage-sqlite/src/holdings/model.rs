//! Database models for holdings.

use std::str::FromStr;

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kabufolio_core::holdings::{Currency, Holding};

/// Database model for the holdings table.
///
/// Share counts are stored as decimal text so fractional positions
/// survive round-trips without float drift.
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HoldingDB {
    pub symbol: String,
    pub shares: String,
    pub currency: Option<String>,
    pub company_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl HoldingDB {
    pub fn from_domain(holding: &Holding) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            symbol: holding.symbol.clone(),
            shares: holding.shares.to_string(),
            currency: holding.currency.map(|c| c.as_str().to_string()),
            company_name: holding.company_name.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            symbol: db.symbol,
            shares: Decimal::from_str(&db.shares).unwrap_or_default(),
            currency: db.currency.as_deref().and_then(|c| c.parse::<Currency>().ok()),
            company_name: db.company_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fractional_shares_round_trip() {
        let mut holding = Holding::new("AAPL", dec!(10.123456));
        holding.currency = Some(Currency::Usd);

        let db = HoldingDB::from_domain(&holding);
        assert_eq!(db.shares, "10.123456");

        let back = Holding::from(db);
        assert_eq!(back, holding);
    }

    #[test]
    fn test_unknown_currency_becomes_none() {
        let mut db = HoldingDB::from_domain(&Holding::new("AAPL", dec!(1)));
        db.currency = Some("EUR".to_string());
        assert_eq!(Holding::from(db).currency, None);
    }
}
