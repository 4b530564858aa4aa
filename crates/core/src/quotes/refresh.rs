//! Quote refresh service.
//!
//! Orchestrates one refresh cycle: resolve the symbol set, fetch
//! realtime quotes and historical series, select baselines, normalize
//! the FX row, reconcile against stored records, and upsert per symbol.
//!
//! A refresh run never fails because of upstream data problems; the
//! worst case is a report with zero updates. Only an unusable symbol
//! universe (a storage read failure while resolving it) is an error.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, error, warn};

use kabufolio_market_data::{ChartSeries, QuoteProvider, RealtimeQuote};

use crate::constants::{CHART_FALLBACK_CAP, FX_SYMBOL, SERIES_FETCH_WORKERS, SERIES_WINDOW_DAYS};
use crate::errors::{Error, Result};
use crate::holdings::HoldingStore;
use crate::quotes::baseline::select_baseline;
use crate::quotes::fx::normalize_rate;
use crate::quotes::model::{BaselinePeriod, QuoteRecord};
use crate::quotes::reconcile::{reconcile, Observation};
use crate::quotes::store::QuoteRecordStore;

// ============================================================================
// Parameters and Report Types
// ============================================================================

/// Parameters for one refresh run.
#[derive(Debug, Clone, Default)]
pub struct RefreshParams {
    /// Explicit symbols to refresh. When `None` or empty, the union of
    /// holdings and already-stored quote rows is used. The FX symbol is
    /// always included either way.
    pub symbols: Option<Vec<String>>,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Recompute baselines even when they were already refreshed today.
    pub force: bool,
}

/// Why a symbol produced no write this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a quote nor a usable series came back; the stored record
    /// is left exactly as it was.
    NoFreshData,
}

/// Outcome status for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolStatus {
    /// Record reconciled and written.
    Updated,
    /// Dry run: record reconciled, write suppressed.
    Previewed,
    Skipped(SkipReason),
    /// The per-symbol upsert failed; other symbols are unaffected.
    Failed(String),
}

/// Per-symbol result within a refresh report.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub status: SymbolStatus,
    /// Reconciled price, for report consumers.
    pub price: Option<f64>,
    /// False when the staleness skip left baselines as they were.
    pub baselines_recomputed: bool,
}

/// Aggregate result of one refresh run.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Number of symbols actually written.
    pub updated: usize,
    /// Effective JPY-per-USD rate after this run, when known.
    pub fx_rate: Option<f64>,
    pub outcomes: Vec<SymbolOutcome>,
}

impl RefreshReport {
    pub fn summary(&self) -> String {
        let failed = self
            .outcomes
            .iter()
            .filter(|o| matches!(o.status, SymbolStatus::Failed(_)))
            .count();
        format!(
            "updated {}/{} symbols ({} failed), fx rate {}",
            self.updated,
            self.outcomes.len(),
            failed,
            self.fx_rate
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }
}

// ============================================================================
// Refresh Service
// ============================================================================

/// The quote refresh service.
///
/// Generic over its stores so tests can drop in mocks; providers are
/// trait objects because they are chosen at runtime from configuration.
pub struct RefreshService<Q, H>
where
    Q: QuoteRecordStore,
    H: HoldingStore,
{
    quote_store: Arc<Q>,
    holding_store: Arc<H>,
    provider: Arc<dyn QuoteProvider>,
    /// Optional fill-in provider, consulted only for symbols the
    /// primary missed.
    secondary: Option<Arc<dyn QuoteProvider>>,
}

impl<Q, H> RefreshService<Q, H>
where
    Q: QuoteRecordStore,
    H: HoldingStore,
{
    pub fn new(
        quote_store: Arc<Q>,
        holding_store: Arc<H>,
        provider: Arc<dyn QuoteProvider>,
        secondary: Option<Arc<dyn QuoteProvider>>,
    ) -> Self {
        Self {
            quote_store,
            holding_store,
            provider,
            secondary,
        }
    }

    /// Run one refresh cycle.
    pub async fn refresh(&self, params: RefreshParams) -> Result<RefreshReport> {
        let now = Utc::now();
        self.refresh_at(params, now).await
    }

    /// [`refresh`](Self::refresh) with an explicit clock, so tests can
    /// pin `now`.
    pub async fn refresh_at(
        &self,
        params: RefreshParams,
        now: DateTime<Utc>,
    ) -> Result<RefreshReport> {
        let symbols = self.resolve_symbols(&params)?;
        debug!("Refreshing {} symbols", symbols.len());

        // Stored records, for staleness checks and reconciliation.
        let mut existing: HashMap<String, QuoteRecord> = HashMap::new();
        for symbol in &symbols {
            if let Some(record) = self.quote_store.get(symbol)? {
                existing.insert(symbol.clone(), record);
            }
        }

        // Staleness skip: symbols whose baselines were already refreshed
        // today keep them; their current price still updates.
        let series_symbols: Vec<String> = symbols
            .iter()
            .filter(|s| {
                params.force
                    || existing
                        .get(*s)
                        .map(|r| !r.baselines_fresh_on(now.date_naive()))
                        .unwrap_or(true)
            })
            .cloned()
            .collect();

        let quotes = self.fetch_quotes(&symbols).await;
        let series_map = self.fetch_series_batch(&series_symbols, now).await;

        let mut report = RefreshReport::default();
        for symbol in &symbols {
            let recompute = series_symbols.contains(symbol);
            let observation = build_observation(
                symbol,
                quotes.get(symbol),
                series_map.get(symbol),
                recompute,
                now,
            );

            let stored = existing.get(symbol);
            let record = reconcile(symbol, &observation, stored, now);

            if symbol == FX_SYMBOL {
                report.fx_rate = record
                    .price
                    .or_else(|| stored.and_then(|r| r.price))
                    .and_then(normalize_rate);
            }

            let has_data = observation.price.is_some()
                || BaselinePeriod::ALL
                    .iter()
                    .any(|p| observation.baseline(*p).is_some());

            let status = if !has_data {
                debug!("No fresh data for {}, record left untouched", symbol);
                SymbolStatus::Skipped(SkipReason::NoFreshData)
            } else if params.dry_run {
                SymbolStatus::Previewed
            } else {
                match self.quote_store.upsert(&record).await {
                    Ok(_) => {
                        report.updated += 1;
                        SymbolStatus::Updated
                    }
                    Err(e) => {
                        // A storage failure stays scoped to this symbol.
                        error!("Failed to persist quote record for {}: {}", symbol, e);
                        SymbolStatus::Failed(e.to_string())
                    }
                }
            };

            report.outcomes.push(SymbolOutcome {
                symbol: symbol.clone(),
                status,
                price: record.price,
                baselines_recomputed: recompute,
            });
        }

        debug!("Refresh finished: {}", report.summary());
        Ok(report)
    }

    /// The stored USD/JPY rate record, self-healing when incomplete.
    ///
    /// A missing row or any null among the four price fields triggers a
    /// forced refresh of just the FX symbol before serving.
    pub async fn get_fx_rate(&self) -> Result<QuoteRecord> {
        let current = self.quote_store.get(FX_SYMBOL)?;
        let complete = current.as_ref().map(QuoteRecord::has_all_prices).unwrap_or(false);

        if !complete {
            debug!("FX record incomplete, refreshing {}", FX_SYMBOL);
            self.refresh(RefreshParams {
                symbols: Some(vec![FX_SYMBOL.to_string()]),
                dry_run: false,
                force: true,
            })
            .await?;
        }

        self.quote_store.get(FX_SYMBOL)?.ok_or_else(|| {
            Error::InvalidExchangeRate(format!("no {} record after refresh", FX_SYMBOL))
        })
    }

    /// Plain store read for one symbol.
    pub fn get_quote(&self, symbol: &str) -> Result<Option<QuoteRecord>> {
        self.quote_store.get(&symbol.to_uppercase())
    }

    /// Plain store read of every record.
    pub fn list_quotes(&self) -> Result<Vec<QuoteRecord>> {
        self.quote_store.list_all()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Resolve the symbol universe for this run: explicit list, or
    /// holdings plus stored rows. Uppercased, deduplicated, FX always
    /// present.
    fn resolve_symbols(&self, params: &RefreshParams) -> Result<Vec<String>> {
        let mut set: BTreeSet<String> = match &params.symbols {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => {
                let mut set: BTreeSet<String> = self
                    .holding_store
                    .list_all()?
                    .into_iter()
                    .map(|h| h.symbol.to_uppercase())
                    .collect();
                set.extend(
                    self.quote_store
                        .list_all()?
                        .into_iter()
                        .map(|r| r.symbol.to_uppercase()),
                );
                set
            }
        };
        set.insert(FX_SYMBOL.to_string());
        Ok(set.into_iter().collect())
    }

    /// Realtime quotes from the primary provider, with the secondary
    /// filling in symbols the primary missed.
    async fn fetch_quotes(&self, symbols: &[String]) -> HashMap<String, RealtimeQuote> {
        let mut quotes = match self.provider.fetch_quotes(symbols).await {
            Ok(map) => map,
            Err(e) => {
                warn!("Quote fetch from {} failed: {}", self.provider.id(), e);
                HashMap::new()
            }
        };

        if let Some(secondary) = &self.secondary {
            let missing: Vec<String> = symbols
                .iter()
                .filter(|s| !quotes.contains_key(*s))
                .cloned()
                .collect();
            if !missing.is_empty() {
                debug!(
                    "Filling in {} symbols from {}",
                    missing.len(),
                    secondary.id()
                );
                match secondary.fetch_quotes(&missing).await {
                    Ok(map) => quotes.extend(map),
                    Err(e) => warn!("Fill-in fetch from {} failed: {}", secondary.id(), e),
                }
            }
        }

        quotes
    }

    /// Historical series: spark batch first, then per-symbol chart
    /// fallback with bounded concurrency, capped per run.
    async fn fetch_series_batch(
        &self,
        symbols: &[String],
        now: DateTime<Utc>,
    ) -> HashMap<String, ChartSeries> {
        if symbols.is_empty() {
            return HashMap::new();
        }

        let mut series_map = match self.provider.fetch_spark(symbols).await {
            Ok(map) => map,
            Err(e) => {
                warn!("Spark fetch from {} failed: {}", self.provider.id(), e);
                HashMap::new()
            }
        };

        let missing: Vec<String> = symbols
            .iter()
            .filter(|s| !series_map.contains_key(*s))
            .take(CHART_FALLBACK_CAP)
            .cloned()
            .collect();
        if missing.is_empty() {
            return series_map;
        }

        debug!("Chart fallback for {} symbols", missing.len());
        let start = now - Duration::days(SERIES_WINDOW_DAYS);
        let fetched: Vec<(String, Option<ChartSeries>)> = stream::iter(missing)
            .map(|symbol| {
                let provider = Arc::clone(&self.provider);
                async move {
                    match provider.fetch_series(&symbol, start, now).await {
                        Ok(series) => (symbol, Some(series)),
                        Err(e) => {
                            debug!("Chart fetch for {} failed: {}", symbol, e);
                            (symbol, None)
                        }
                    }
                }
            })
            .buffer_unordered(SERIES_FETCH_WORKERS)
            .collect()
            .await;

        for (symbol, series) in fetched {
            if let Some(series) = series {
                series_map.insert(symbol, series);
            }
        }

        series_map
    }
}

/// Assemble what this cycle learned about one symbol.
///
/// Price priority: fresh quote, else the series' most recent valid
/// close. Baselines come from the series selector and only when this
/// symbol's baselines are being recomputed. The FX symbol's values are
/// normalized to JPY-per-USD orientation and its currency pinned to JPY.
fn build_observation(
    symbol: &str,
    quote: Option<&RealtimeQuote>,
    series: Option<&ChartSeries>,
    recompute_baselines: bool,
    now: DateTime<Utc>,
) -> Observation {
    let mut observation = Observation {
        price: quote
            .map(|q| q.price)
            .filter(|p| p.is_finite())
            .or_else(|| series.and_then(ChartSeries::latest_valid_close)),
        currency: quote.and_then(|q| q.currency.clone()),
        ..Default::default()
    };

    if recompute_baselines {
        if let Some(series) = series {
            for period in BaselinePeriod::ALL {
                let target = period.target_timestamp(now);
                observation.set_baseline(period, select_baseline(series, target));
            }
        }
    }

    if symbol == FX_SYMBOL {
        observation.price = observation.price.and_then(normalize_rate);
        for period in BaselinePeriod::ALL {
            observation.set_baseline(period, observation.baseline(period).and_then(normalize_rate));
        }
        observation.currency = Some("JPY".to_string());
    }

    observation
}
