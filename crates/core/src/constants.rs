/// Reserved symbol holding the USD/JPY exchange rate row.
pub const FX_SYMBOL: &str = "USDJPY=X";

/// Suffix identifying Tokyo Stock Exchange listings.
pub const TOKYO_SUFFIX: &str = ".T";

/// Historical window fetched for baseline selection, in days.
/// Two years comfortably covers the one-year lookback plus holidays.
pub const SERIES_WINDOW_DAYS: i64 = 730;

/// Cap on per-symbol chart fallback fetches in one refresh run.
pub const CHART_FALLBACK_CAP: usize = 50;

/// Concurrent per-symbol chart fetches during the fallback pass.
pub const SERIES_FETCH_WORKERS: usize = 5;
