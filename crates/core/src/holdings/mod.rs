//! Holdings module.
//!
//! A holding is one owned position: a symbol, a share count, and an
//! optional declared currency and company name. The refresh pipeline
//! only reads the symbol set; CRUD exists for the surrounding app.

pub mod model;
pub mod store;

pub use model::{Currency, Holding};
pub use store::HoldingStore;
