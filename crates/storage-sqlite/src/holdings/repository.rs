use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::holdings::dsl as holdings_dsl;
use kabufolio_core::holdings::{Holding, HoldingStore};
use kabufolio_core::Result;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HoldingStore for HoldingRepository {
    async fn save(&self, holding: &Holding) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;

        let mut db_row = HoldingDB::from_domain(holding);

        // A replace would reset created_at, so carry it over on update.
        let existing_created_at = holdings_dsl::holdings
            .find(&holding.symbol)
            .select(holdings_dsl::created_at)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;
        if let Some(created_at) = existing_created_at {
            db_row.created_at = created_at;
        }

        diesel::replace_into(holdings_dsl::holdings)
            .values(&db_row)
            .execute(&mut conn)
            .into_core()?;

        Ok(holding.clone())
    }

    async fn delete(&self, symbol: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::delete(holdings_dsl::holdings.find(symbol))
            .execute(&mut conn)
            .into_core()?;

        Ok(())
    }

    fn get(&self, symbol: &str) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let result = holdings_dsl::holdings
            .find(symbol)
            .first::<HoldingDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(result.map(Holding::from))
    }

    fn list_all(&self) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let results = holdings_dsl::holdings
            .order(holdings_dsl::symbol.asc())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(Holding::from).collect())
    }
}
