//! Quote refresh module.
//!
//! This module implements the quote-refresh and baseline-reconciliation
//! pipeline:
//!
//! - [`model`] - The persisted per-symbol quote record and baseline periods
//! - [`store`] - Storage trait for quote records
//! - [`baseline`] - Baseline close selection over daily series
//! - [`fx`] - USD/JPY rate normalization and currency-domain classification
//! - [`changes`] - Guarded fractional change rates
//! - [`reconcile`] - Pure merge of fetched data into stored records
//! - [`refresh`] - The orchestrating service
//!
//! # Architecture
//!
//! ```text
//! RefreshService ──> QuoteProvider (market-data crate)
//!       │
//!       ├──> baseline / fx / changes / reconcile  (pure functions)
//!       │
//!       └──> QuoteRecordStore / HoldingStore      (storage traits)
//! ```
//!
//! The pure modules carry the semantics; the service only wires fetching,
//! selection, and persistence together. That split keeps every rule
//! testable without a database or network.

pub mod baseline;
pub mod changes;
pub mod fx;
pub mod model;
pub mod reconcile;
pub mod refresh;
pub mod store;


// Re-export commonly used types for convenience
pub use model::{BaselinePeriod, QuoteRecord};
pub use reconcile::{reconcile, Observation};
pub use refresh::{
    RefreshParams, RefreshReport, RefreshService, SkipReason, SymbolOutcome, SymbolStatus,
};
pub use store::QuoteRecordStore;
