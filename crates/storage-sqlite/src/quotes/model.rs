//! Database models for quote records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use kabufolio_core::quotes::QuoteRecord;

/// Database model for the quotes table, one row per symbol.
///
/// Timestamps are stored as RFC3339 text.
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
#[diesel(table_name = crate::schema::quotes)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecordDB {
    pub symbol: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub updated_at: Option<String>,
    pub price_1d: Option<f64>,
    pub updated_1d_at: Option<String>,
    pub price_1m: Option<f64>,
    pub updated_1m_at: Option<String>,
    pub price_1y: Option<f64>,
    pub updated_1y_at: Option<String>,
}

fn to_db_time(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.to_rfc3339())
}

fn from_db_time(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

impl From<&QuoteRecord> for QuoteRecordDB {
    fn from(record: &QuoteRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            price: record.price,
            currency: record.currency.clone(),
            updated_at: to_db_time(record.updated_at),
            price_1d: record.price_1d,
            updated_1d_at: to_db_time(record.updated_1d_at),
            price_1m: record.price_1m,
            updated_1m_at: to_db_time(record.updated_1m_at),
            price_1y: record.price_1y,
            updated_1y_at: to_db_time(record.updated_1y_at),
        }
    }
}

impl From<QuoteRecordDB> for QuoteRecord {
    fn from(db: QuoteRecordDB) -> Self {
        Self {
            symbol: db.symbol,
            price: db.price,
            currency: db.currency,
            updated_at: from_db_time(db.updated_at),
            price_1d: db.price_1d,
            updated_1d_at: from_db_time(db.updated_1d_at),
            price_1m: db.price_1m,
            updated_1m_at: from_db_time(db.updated_1m_at),
            price_1y: db.price_1y,
            updated_1y_at: from_db_time(db.updated_1y_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trip_preserves_nulls_and_timestamps() {
        let mut record = QuoteRecord::new("AAPL");
        record.price = Some(150.25);
        record.currency = Some("USD".to_string());
        record.updated_at = Some(Utc.with_ymd_and_hms(2025, 8, 22, 12, 0, 0).unwrap());
        record.price_1d = Some(148.0);
        record.updated_1d_at = record.updated_at;

        let db = QuoteRecordDB::from(&record);
        assert_eq!(db.price_1m, None);
        assert_eq!(db.updated_1m_at, None);

        let back = QuoteRecord::from(db);
        assert_eq!(back, record);
    }

    #[test]
    fn test_unparseable_timestamp_becomes_null() {
        assert_eq!(from_db_time(Some("not a date".to_string())), None);
        assert_eq!(from_db_time(None), None);
    }
}
