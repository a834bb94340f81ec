use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, MacdPoint, Ohlcv, PriceSource,
    ema::ema_values,
};

/// Configuration for the [`Macd`] indicator.
///
/// Holds three lengths: fast EMA, slow EMA, and the signal EMA over the
/// MACD line. The fast length is conventionally the shorter one, but any
/// pair is accepted: equal lengths give a flat zero line and swapped
/// lengths give the mirrored line.
///
/// # Example
///
/// ```
/// use econ_ta::MacdConfig;
///
/// let config = MacdConfig::default();
/// assert_eq!(config.fast_length(), 12);
/// assert_eq!(config.slow_length(), 26);
/// assert_eq!(config.signal_length(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast_length: usize,
    slow_length: usize,
    signal_length: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl MacdConfig {
    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast_length
    }

    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow_length
    }

    #[inline]
    #[must_use]
    pub fn signal_length(&self) -> usize {
        self.signal_length
    }

    /// MACD(12, 26, 9) on closing price.
    #[must_use]
    pub fn default_12_26_9() -> Self {
        Self::builder().build()
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::default_12_26_9()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast_length, self.slow_length, self.signal_length, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: 12 / 26 / 9 on [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    fast_length: usize,
    slow_length: usize,
    signal_length: usize,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast_length: 12,
            slow_length: 26,
            signal_length: 9,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast_length(mut self, length: NonZero<usize>) -> Self {
        self.fast_length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn slow_length(mut self, length: NonZero<usize>) -> Self {
        self.slow_length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn signal_length(mut self, length: NonZero<usize>) -> Self {
        self.signal_length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            fast_length: self.fast_length,
            slow_length: self.slow_length,
            signal_length: self.signal_length,
            source: self.source,
        }
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(signal) of the macd line
/// histogram = macd − signal
/// ```
///
/// The longer EMA starts later; the two are aligned on their trailing bars
/// before subtracting. The signal EMA runs over the raw MACD values with the
/// same SMA-seeded recurrence as [`Ema`](crate::Ema).
///
/// With `longer = max(fast, slow)`, output is empty unless the series has at
/// least `longer + signal` bars; otherwise it holds
/// `n − longer − signal + 2` points, the first aligned to bar
/// `longer + signal − 2`.
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdPoint;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.config.fast_length.max(self.config.slow_length) + self.config.signal_length
    }

    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<MacdPoint> {
        if bars.len() < self.min_bars() {
            return Vec::new();
        }

        let MacdConfig {
            fast_length,
            slow_length,
            signal_length,
            source,
        } = self.config;

        let prices = source.prices(bars);
        let fast = ema_values(&prices, fast_length);
        let slow = ema_values(&prices, slow_length);
        let shared = fast.len().min(slow.len());

        let macd_line: Vec<f64> = fast[fast.len() - shared..]
            .iter()
            .zip(&slow[slow.len() - shared..])
            .map(|(fast, slow)| fast - slow)
            .collect();
        let signal_line = ema_values(&macd_line, signal_length);

        // macd_line[i] belongs to bar longer - 1 + i
        let longer = fast_length.max(slow_length);
        let first_bar = longer - 1 + signal_length - 1;

        macd_line[signal_length - 1..]
            .iter()
            .zip(&signal_line)
            .zip(&bars[first_bar..])
            .map(|((&macd, &signal), bar)| MacdPoint::new(bar.time(), macd, signal))
            .collect()
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast_length,
            self.config.slow_length,
            self.config.signal_length,
            self.config.source
        )
    }
}

/// MACD of closing prices. Conventional arguments are `12, 26, 9`.
#[must_use]
pub fn calculate_macd<B: Ohlcv>(
    bars: &[B],
    fast_period: NonZero<usize>,
    slow_period: NonZero<usize>,
    signal_period: NonZero<usize>,
) -> Vec<MacdPoint> {
    let config = MacdConfig::builder()
        .fast_length(fast_period)
        .slow_length(slow_period)
        .signal_length(signal_period)
        .build();

    Macd::new(config).calculate(bars)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        Ema, EmaConfig, IndicatorPoint,
        test_util::{day, series},
    };

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn macd(fast: usize, slow: usize, signal: usize) -> Macd {
        Macd::new(
            MacdConfig::builder()
                .fast_length(nz(fast))
                .slow_length(nz(slow))
                .signal_length(nz(signal))
                .build(),
        )
    }

    fn wave(len: u32) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 5.0 + f64::from(i) * 0.1)
            .collect()
    }

    mod warm_up {
        use super::*;

        #[test]
        fn empty_below_slow_plus_signal() {
            let bars = series(&wave(34));
            assert!(macd(12, 26, 9).calculate(&bars).is_empty());
        }

        #[test]
        fn output_length() {
            let bars = series(&wave(35));
            // 35 − 26 − 9 + 2
            assert_eq!(macd(12, 26, 9).calculate(&bars).len(), 2);

            let bars = series(&wave(100));
            assert_eq!(macd(12, 26, 9).calculate(&bars).len(), 67);
        }

        #[test]
        fn first_point_alignment() {
            let bars = series(&wave(40));
            let points = macd(12, 26, 9).calculate(&bars);
            // first bar index 26 − 1 + 9 − 1 = 33 → day 34
            assert_eq!(points[0].time(), day(34));
            assert_eq!(points.last().unwrap().time(), day(40));
        }
    }

    mod values {
        use super::*;

        #[test]
        fn histogram_is_macd_minus_signal() {
            let points = macd(12, 26, 9).calculate(&series(&wave(120)));
            assert!(points
                .iter()
                .all(|p| p.histogram() == p.macd() - p.signal()));
        }

        #[test]
        fn macd_line_is_aligned_ema_difference() {
            let bars = series(&wave(60));
            let fast = Ema::new(EmaConfig::close(nz(5))).calculate(&bars);
            let slow = Ema::new(EmaConfig::close(nz(10))).calculate(&bars);
            let points = macd(5, 10, 3).calculate(&bars);

            for point in &points {
                let at = |line: &[IndicatorPoint]| {
                    line.iter()
                        .find(|p| p.time() == point.time())
                        .map(IndicatorPoint::value)
                        .unwrap()
                };
                assert!((point.macd() - (at(&fast) - at(&slow))).abs() < 1e-12);
            }
        }

        #[test]
        fn constant_prices_give_zero_lines() {
            let points = macd(3, 6, 2).calculate(&series(&[50.0; 20]));
            assert!(points
                .iter()
                .all(|p| p.macd() == 0.0 && p.signal() == 0.0 && p.histogram() == 0.0));
        }

        #[test]
        fn small_hand_computed_case() {
            // fast EMA(1) = price, slow EMA(2) α = 2/3, signal EMA(1) = macd
            // prices 1, 2, 4:
            // slow: seed 1.5 at bar 1, then (4 − 1.5) × 2/3 + 1.5 = 10/3
            // macd: 2 − 1.5 = 0.5, 4 − 10/3 = 2/3
            let points = macd(1, 2, 1).calculate(&series(&[1.0, 2.0, 4.0]));
            assert_eq!(points.len(), 2);
            assert_eq!(points[0].time(), day(2));
            assert!((points[0].macd() - 0.5).abs() < 1e-12);
            assert!((points[1].macd() - 2.0 / 3.0).abs() < 1e-12);
            assert!(points.iter().all(|p| p.histogram() == 0.0));
        }
    }

    mod unusual_lengths {
        use super::*;

        #[test]
        fn equal_lengths_give_zero_lines() {
            let bars = series(&wave(60));
            let points = calculate_macd(&bars, nz(12), nz(12), nz(9));

            // 60 − 12 − 9 + 2
            assert_eq!(points.len(), 41);
            assert!(points
                .iter()
                .all(|p| p.macd() == 0.0 && p.signal() == 0.0 && p.histogram() == 0.0));
        }

        #[test]
        fn swapped_lengths_mirror_the_line() {
            let bars = series(&wave(60));
            let normal = macd(5, 10, 3).calculate(&bars);
            let swapped = macd(10, 5, 3).calculate(&bars);

            assert_eq!(normal.len(), swapped.len());
            for (n, s) in normal.iter().zip(&swapped) {
                assert_eq!(n.time(), s.time());
                assert_eq!(n.macd(), -s.macd());
                assert!((n.signal() + s.signal()).abs() < 1e-12);
            }
        }

        #[test]
        fn swapped_lengths_need_longer_plus_signal_bars() {
            let bars = series(&wave(12));
            assert!(calculate_macd(&bars, nz(10), nz(5), nz(3)).is_empty());

            // 13 − 10 − 3 + 2
            let bars = series(&wave(13));
            assert_eq!(calculate_macd(&bars, nz(10), nz(5), nz(3)).len(), 2);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn min_bars_uses_longer_length() {
            assert_eq!(macd(26, 12, 9).min_bars(), 35);
        }

        #[test]
        fn display() {
            assert_eq!(
                MacdConfig::default().to_string(),
                "MacdConfig(12, 26, 9, Close)"
            );
            assert_eq!(macd(12, 26, 9).to_string(), "MACD(12, 26, 9, Close)");
        }

        #[test]
        fn min_bars_is_slow_plus_signal() {
            assert_eq!(Macd::new(MacdConfig::default()).min_bars(), 35);
        }

        #[test]
        fn free_function_matches_indicator() {
            let bars = series(&wave(50));
            assert_eq!(
                calculate_macd(&bars, nz(12), nz(26), nz(9)),
                macd(12, 26, 9).calculate(&bars)
            );
        }
    }
}
