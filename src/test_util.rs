// src/test_util.rs

use crate::{BarDate, PriceBar};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Day `n` of 2024, counting from 1 = 2024-01-01.
pub fn day(n: u32) -> BarDate {
    BarDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(n) - 1)))
        .expect("valid test date")
}

/// Bar with OHLC all equal to `close`.
pub fn bar(close: f64, n: u32) -> PriceBar {
    PriceBar::new(day(n), close, close, close, close)
}

pub fn ohlc(open: f64, high: f64, low: f64, close: f64, n: u32) -> PriceBar {
    PriceBar::new(day(n), open, high, low, close)
}

/// Consecutive daily bars with the given closes, starting at day 1.
pub fn series(closes: &[f64]) -> Vec<PriceBar> {
    (1..)
        .zip(closes)
        .map(|(n, &close)| bar(close, n))
        .collect()
}
