//! Kabufolio Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for kabufolio, a personal
//! US/JP stock portfolio tracker. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod quotes;
pub mod valuation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
