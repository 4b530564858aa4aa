use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::QuoteRecordDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::quotes::dsl as quotes_dsl;
use kabufolio_core::quotes::store::QuoteRecordStore;
use kabufolio_core::quotes::QuoteRecord;
use kabufolio_core::Result;

pub struct QuoteRepository {
    pool: Arc<DbPool>,
}

impl QuoteRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRecordStore for QuoteRepository {
    async fn upsert(&self, record: &QuoteRecord) -> Result<QuoteRecord> {
        let db_row = QuoteRecordDB::from(record);
        let mut conn = get_connection(&self.pool)?;

        diesel::replace_into(quotes_dsl::quotes)
            .values(&db_row)
            .execute(&mut conn)
            .into_core()?;

        Ok(record.clone())
    }

    fn get(&self, symbol: &str) -> Result<Option<QuoteRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let result = quotes_dsl::quotes
            .find(symbol)
            .first::<QuoteRecordDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(result.map(QuoteRecord::from))
    }

    fn list_all(&self) -> Result<Vec<QuoteRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let results = quotes_dsl::quotes
            .order(quotes_dsl::symbol.asc())
            .load::<QuoteRecordDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(QuoteRecord::from).collect())
    }
}
