//! Holding storage trait.

use async_trait::async_trait;

use super::model::Holding;
use crate::errors::Result;

/// Storage interface for holdings.
///
/// Mutations are async because they go through the write path; simple
/// reads are sync.
#[async_trait]
pub trait HoldingStore: Send + Sync {
    /// Inserts or updates a holding, keyed on its symbol.
    async fn save(&self, holding: &Holding) -> Result<Holding>;

    /// Deletes a holding by symbol. Quote rows are not cascaded.
    async fn delete(&self, symbol: &str) -> Result<()>;

    /// Gets a holding by symbol.
    fn get(&self, symbol: &str) -> Result<Option<Holding>>;

    /// Lists all holdings.
    fn list_all(&self) -> Result<Vec<Holding>>;
}
