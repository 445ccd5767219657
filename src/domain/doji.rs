//! Doji detection on Heikin-Ashi candles.
//!
//! A Doji has a small body relative to its total range. A zero-range bar
//! has no defined body ratio and counts as a Doji.

use crate::domain::heikin_ashi::HaBar;

pub const DEFAULT_DOJI_THRESHOLD: f64 = 0.1;

/// |close - open| / (high - low), 0.0 when the bar has no range.
pub fn body_ratio(bar: &HaBar) -> f64 {
    let range = bar.range();
    if range == 0.0 {
        0.0
    } else {
        bar.body() / range
    }
}

pub fn is_doji(bar: &HaBar, threshold: f64) -> bool {
    body_ratio(bar) <= threshold
}

pub fn detect_doji(ha_bars: &[HaBar], threshold: f64) -> Vec<bool> {
    ha_bars.iter().map(|bar| is_doji(bar, threshold)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ha_bar(open: f64, high: f64, low: f64, close: f64) -> HaBar {
        HaBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn small_body_is_doji() {
        // body 0.1, range 4.0 → ratio 0.025
        let bar = ha_bar(100.0, 102.0, 98.0, 100.1);
        assert!(is_doji(&bar, DEFAULT_DOJI_THRESHOLD));
    }

    #[test]
    fn large_body_is_not_doji() {
        let bar = ha_bar(100.0, 104.0, 99.0, 103.5);
        assert!(!is_doji(&bar, DEFAULT_DOJI_THRESHOLD));
    }

    #[test]
    fn ratio_not_absolute_size() {
        // Tiny absolute body but tinier range: 0.05/0.02 = 2.5 → not a Doji.
        let bar = ha_bar(100.0, 100.06, 100.04, 100.05);
        assert!((body_ratio(&bar) - 2.5).abs() < 1e-9);
        assert!(!is_doji(&bar, 0.1));
    }

    #[test]
    fn zero_range_is_doji() {
        let bar = ha_bar(100.0, 100.0, 100.0, 100.0);
        assert!((body_ratio(&bar) - 0.0).abs() < f64::EPSILON);
        assert!(is_doji(&bar, 0.1));
    }

    #[test]
    fn ratio_exactly_at_threshold_is_doji() {
        // body 0.4, range 4.0 → ratio 0.1 == threshold
        let bar = ha_bar(100.0, 102.0, 98.0, 100.4);
        assert!(is_doji(&bar, 0.1));
    }

    #[test]
    fn detect_doji_maps_sequence() {
        let bars = vec![
            ha_bar(100.0, 102.0, 98.0, 100.1),
            ha_bar(100.0, 104.0, 99.0, 103.5),
        ];
        assert_eq!(detect_doji(&bars, 0.1), vec![true, false]);
    }
}
