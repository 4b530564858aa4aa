//! Baseline close selection over daily series.
//!
//! Given an ascending daily close series and a lookback target, pick
//! the close that best represents "the price as of that moment":
//!
//! 1. Binary search for the rightmost timestamp at or before the target
//!    (inclusive boundary).
//! 2. Scan backward from there to the first finite close, skipping NaN
//!    placeholders for halted or missing sessions.
//! 3. If the target predates the series or everything at/before it is
//!    NaN, fall back to the earliest finite close, then to the latest.
//!
//! `None` comes back only when no finite close exists at all.

use kabufolio_market_data::ChartSeries;

/// Select the baseline close for `target` (epoch seconds) from parallel
/// timestamp/close slices.
pub fn select_baseline_from(timestamps: &[i64], closes: &[f64], target: i64) -> Option<f64> {
    debug_assert_eq!(timestamps.len(), closes.len());
    if timestamps.is_empty() {
        return None;
    }

    // Rightmost index with timestamp <= target, if any.
    let idx = timestamps.partition_point(|&ts| ts <= target);
    if idx > 0 {
        for i in (0..idx).rev() {
            if closes[i].is_finite() {
                return Some(closes[i]);
            }
        }
    }

    // Target predates the series, or every close at/before it is NaN:
    // the earliest finite close is the nearest usable stand-in, the
    // latest finite close the last resort.
    closes
        .iter()
        .copied()
        .find(|c| c.is_finite())
        .or_else(|| closes.iter().rev().copied().find(|c| c.is_finite()))
}

/// [`select_baseline_from`] over a [`ChartSeries`].
pub fn select_baseline(series: &ChartSeries, target: i64) -> Option<f64> {
    select_baseline_from(&series.timestamps, &series.closes, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        let timestamps = [100, 200, 300];
        let closes = [10.0, 20.0, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 200), Some(20.0));
    }

    #[test]
    fn test_between_points_picks_earlier() {
        let timestamps = [100, 200, 300];
        let closes = [10.0, 20.0, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 250), Some(20.0));
        assert_eq!(select_baseline_from(&timestamps, &closes, 199), Some(10.0));
    }

    #[test]
    fn test_after_series_picks_last() {
        let timestamps = [100, 200, 300];
        let closes = [10.0, 20.0, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 1000), Some(30.0));
    }

    #[test]
    fn test_nan_skipped_backward() {
        let timestamps = [100, 200, 300];
        let closes = [10.0, f64::NAN, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 200), Some(10.0));
    }

    #[test]
    fn test_target_before_series_falls_back_to_earliest_valid() {
        let timestamps = [100, 200, 300];
        let closes = [f64::NAN, f64::NAN, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 50), Some(30.0));
    }

    #[test]
    fn test_earliest_valid_preferred_over_latest() {
        let timestamps = [100, 200, 300];
        let closes = [f64::NAN, 20.0, 30.0];
        assert_eq!(select_baseline_from(&timestamps, &closes, 50), Some(20.0));
    }

    #[test]
    fn test_all_nan_yields_none() {
        let timestamps = [100, 200];
        let closes = [f64::NAN, f64::NAN];
        assert_eq!(select_baseline_from(&timestamps, &closes, 150), None);
    }

    #[test]
    fn test_empty_series_yields_none() {
        assert_eq!(select_baseline_from(&[], &[], 100), None);
    }

    #[test]
    fn test_single_point_series() {
        assert_eq!(select_baseline_from(&[100], &[10.0], 100), Some(10.0));
        assert_eq!(select_baseline_from(&[100], &[10.0], 50), Some(10.0));
        assert_eq!(select_baseline_from(&[100], &[10.0], 500), Some(10.0));
    }

    #[test]
    fn test_series_wrapper() {
        let series = ChartSeries::new(vec![100, 200, 300], vec![10.0, 20.0, 30.0]);
        assert_eq!(select_baseline(&series, 200), Some(20.0));
    }
}
