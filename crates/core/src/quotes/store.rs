//! Quote record storage trait.
//!
//! Abstracts the persistence layer so different storage backends can be
//! used interchangeably, and so the refresh service can be tested with
//! in-memory mocks.

use async_trait::async_trait;

use super::model::QuoteRecord;
use crate::errors::Result;

/// Storage interface for per-symbol quote records.
///
/// Rows are keyed on symbol; `upsert` is an insert-or-update. The store
/// never interprets the record, the reconcile step has already decided
/// every field.
#[async_trait]
pub trait QuoteRecordStore: Send + Sync {
    /// Inserts or updates the record for its symbol.
    async fn upsert(&self, record: &QuoteRecord) -> Result<QuoteRecord>;

    /// Gets the record for a symbol, if one exists.
    fn get(&self, symbol: &str) -> Result<Option<QuoteRecord>>;

    /// Lists every stored record.
    fn list_all(&self) -> Result<Vec<QuoteRecord>>;
}
