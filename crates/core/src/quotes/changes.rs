//! Guarded fractional change rates.

/// Signed fractional change from `baseline` to `current`.
///
/// Defined only when both values are finite and the baseline is
/// strictly positive; a zero or missing baseline yields `None` rather
/// than an infinity leaking into reports.
pub fn change_rate(current: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    let current = current.filter(|c| c.is_finite())?;
    let baseline = baseline.filter(|b| b.is_finite() && *b > 0.0)?;
    Some((current - baseline) / baseline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_change() {
        let change = change_rate(Some(110.0), Some(100.0)).unwrap();
        assert!((change - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_negative_change() {
        let change = change_rate(Some(95.0), Some(100.0)).unwrap();
        assert!((change + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_baseline_undefined() {
        assert_eq!(change_rate(Some(110.0), Some(0.0)), None);
        assert_eq!(change_rate(Some(110.0), Some(-5.0)), None);
    }

    #[test]
    fn test_missing_or_nan_inputs_undefined() {
        assert_eq!(change_rate(None, Some(100.0)), None);
        assert_eq!(change_rate(Some(110.0), None), None);
        assert_eq!(change_rate(Some(f64::NAN), Some(100.0)), None);
        assert_eq!(change_rate(Some(110.0), Some(f64::NAN)), None);
    }
}
