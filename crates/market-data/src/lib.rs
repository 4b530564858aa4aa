//! Kabufolio Market Data Crate
//!
//! Provider-agnostic market data fetching for the kabufolio portfolio
//! tracker.
//!
//! # Overview
//!
//! This crate supports:
//! - Batched realtime quotes for equities and FX pairs
//! - Daily historical close series (batched spark + per-symbol chart)
//! - Multiple providers: Yahoo Finance (primary), Alpha Vantage (fill-in)
//!
//! All providers sit behind the [`provider::QuoteProvider`] trait so the
//! core crate never depends on a concrete upstream API.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{ChartSeries, RealtimeQuote};
pub use provider::{AlphaVantageProvider, QuoteProvider, YahooProvider};
