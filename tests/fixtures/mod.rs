#![allow(dead_code)]

use econ_ta::{BandPoint, BarDate, IndicatorPoint, MacdPoint, PriceBar};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Reference value with date.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub time: BarDate,
    pub expected: f64,
}

/// Reference band value (BB, regression channel) with date.
#[derive(Debug, Deserialize)]
pub struct RefBandValue {
    pub time: BarDate,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference MACD value with date.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub time: BarDate,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// 400 daily NZD/USD bars.
const OHLC_PATH: &str = "tests/fixtures/data/nzdusd-1d.csv";

fn load_records<T: DeserializeOwned>(path: &str, context: &str) -> Vec<T> {
    let mut reader = csv::Reader::from_path(path)
        .unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    reader
        .deserialize()
        .map(|row| row.unwrap_or_else(|e| panic!("{context} in {path}: {e}")))
        .collect()
}

/// Load the reference daily bars. `PriceBar` deserialises directly from
/// the `time,open,high,low,close` columns.
pub fn load_reference_bars() -> Vec<PriceBar> {
    load_records(OHLC_PATH, "invalid OHLC record")
}

/// Load single-value reference data (SMA, EMA, RSI, %B).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load band reference data (upper, middle, lower).
pub fn load_band_ref(path: &str) -> Vec<RefBandValue> {
    load_records(path, "invalid band reference record")
}

/// Load MACD reference data (macd, signal, histogram).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.12}, got {actual:.12}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert a point series lines up with reference values date by date.
pub fn assert_points_match(
    points: &[IndicatorPoint],
    reference: &[RefValue],
    tolerance: f64,
    label: &str,
) {
    assert_eq!(
        points.len(),
        reference.len(),
        "{label}: {} points, {} reference values",
        points.len(),
        reference.len()
    );

    for (i, (point, expected)) in points.iter().zip(reference).enumerate() {
        assert_eq!(point.time(), expected.time, "{label} date at point {i}");
        assert_near(
            point.value(),
            expected.expected,
            tolerance,
            &format!("{label} at point {i} ({})", expected.time),
        );
    }
}

/// Band counterpart of [`assert_points_match`].
pub fn assert_bands_match(
    points: &[BandPoint],
    reference: &[RefBandValue],
    tolerance: f64,
    label: &str,
) {
    assert_eq!(points.len(), reference.len(), "{label}: length mismatch");

    for (i, (point, expected)) in points.iter().zip(reference).enumerate() {
        assert_eq!(point.time(), expected.time, "{label} date at point {i}");
        let ctx = format!("{label} at point {i} ({})", expected.time);

        assert_near(point.upper(), expected.upper, tolerance, &format!("{ctx} upper"));
        assert_near(point.middle(), expected.middle, tolerance, &format!("{ctx} middle"));
        assert_near(point.lower(), expected.lower, tolerance, &format!("{ctx} lower"));
    }
}

/// MACD counterpart of [`assert_points_match`].
pub fn assert_macd_match(
    points: &[MacdPoint],
    reference: &[RefMacdValue],
    tolerance: f64,
    label: &str,
) {
    assert_eq!(points.len(), reference.len(), "{label}: length mismatch");

    for (i, (point, expected)) in points.iter().zip(reference).enumerate() {
        assert_eq!(point.time(), expected.time, "{label} date at point {i}");
        let ctx = format!("{label} at point {i} ({})", expected.time);

        assert_near(point.macd(), expected.macd, tolerance, &format!("{ctx} macd"));
        assert_near(point.signal(), expected.signal, tolerance, &format!("{ctx} signal"));
        assert_near(
            point.histogram(),
            expected.histogram,
            tolerance,
            &format!("{ctx} histogram"),
        );
    }
}
