//! SQLite storage implementation for Kabufolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage traits defined in `kabufolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for holdings and quote records
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` and `market-data` crates are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)       market-data (providers)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod holdings;
pub mod quotes;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from kabufolio-core for convenience
pub use kabufolio_core::errors::{DatabaseError, Error, Result};
