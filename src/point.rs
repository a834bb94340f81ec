use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{BarDate, Price};

/// Single-valued indicator output (moving averages, RSI, %B).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    time: BarDate,
    value: f64,
}

/// Oscillator output. Same shape as [`IndicatorPoint`]; RSI is bounded to
/// `0..=100`, %B is unbounded but usually lands there.
pub type OscillatorPoint = IndicatorPoint;

impl IndicatorPoint {
    #[inline]
    pub(crate) fn new(time: BarDate, value: f64) -> Self {
        Self { time, value }
    }

    /// Date of the input bar this point is aligned to.
    #[inline]
    #[must_use]
    pub fn time(&self) -> BarDate {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Display for IndicatorPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.time, self.value)
    }
}

/// Three-valued envelope output (Bollinger Bands, regression channel).
///
/// ```text
/// upper  = middle + k × σ
/// middle
/// lower  = middle − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    time: BarDate,
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BandPoint {
    /// Builds a symmetric band around `middle` with half-width `offset`.
    #[inline]
    pub(crate) fn around(time: BarDate, middle: Price, offset: f64) -> Self {
        Self {
            time,
            upper: middle + offset,
            middle,
            lower: middle - offset,
        }
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> BarDate {
        self.time
    }

    /// Upper band: `middle + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `middle − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BandPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: (u: {}, m: {}, l: {})",
            self.time, self.upper, self.middle, self.lower
        )
    }
}

/// MACD output: MACD line, signal line, and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    time: BarDate,
    macd: f64,
    signal: f64,
    histogram: f64,
}

impl MacdPoint {
    #[inline]
    pub(crate) fn new(time: BarDate, macd: f64, signal: f64) -> Self {
        Self {
            time,
            macd,
            signal,
            histogram: macd - signal,
        }
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> BarDate {
        self.time
    }

    /// Fast EMA minus slow EMA.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> f64 {
        self.macd
    }

    /// EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> f64 {
        self.signal
    }

    /// `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> f64 {
        self.histogram
    }
}

impl Display for MacdPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: (macd: {}, signal: {}, hist: {})",
            self.time, self.macd, self.signal, self.histogram
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::day;

    #[test]
    fn band_is_symmetric_around_middle() {
        let b = BandPoint::around(day(1), 10.0, 2.5);
        assert_eq!(b.upper(), 12.5);
        assert_eq!(b.lower(), 7.5);
        assert_eq!(b.width(), 5.0);
    }

    #[test]
    fn macd_histogram_is_difference() {
        let p = MacdPoint::new(day(1), 1.5, 0.25);
        assert_eq!(p.histogram(), 1.25);
    }

    mod display {
        use super::*;

        #[test]
        fn indicator_point() {
            assert_eq!(IndicatorPoint::new(day(2), 1.5).to_string(), "2024-01-02: 1.5");
        }

        #[test]
        fn band_point() {
            let b = BandPoint::around(day(1), 10.0, 1.0);
            assert_eq!(b.to_string(), "2024-01-01: (u: 11, m: 10, l: 9)");
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn band_point_field_names() {
            let b = BandPoint::around(day(1), 10.0, 1.0);
            let json = serde_json::to_string(&b).unwrap();
            assert_eq!(
                json,
                r#"{"time":"2024-01-01","upper":11.0,"middle":10.0,"lower":9.0}"#
            );
        }
    }
}
