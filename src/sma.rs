use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorPoint, Ohlcv, PriceSource, stats,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use econ_ta::SmaConfig;
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple Moving Average (SMA).
///
/// The unweighted mean of each trailing window of *n* values, where *n* is
/// the configured length. Output point `k` is aligned to input bar
/// `k + n - 1`; a series shorter than *n* yields no points.
///
/// # Example
///
/// ```rust
/// use econ_ta::{Sma, SmaConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let bars: Vec<PriceBar> = (10..=20)
///     .zip(1..)
///     .map(|(c, d)| {
///         let c = f64::from(c);
///         PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), c, c, c, c)
///     })
///     .collect();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(5).unwrap()));
/// let points = sma.calculate(&bars);
///
/// assert_eq!(points.len(), 7);
/// assert_eq!(points[0].value(), 12.0);
/// assert_eq!(points[6].value(), 18.0);
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = IndicatorPoint;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.config.length
    }

    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<IndicatorPoint> {
        if bars.len() < self.config.length {
            return Vec::new();
        }

        let prices = self.config.source.prices(bars);
        let aligned = &bars[self.config.length - 1..];

        prices
            .windows(self.config.length)
            .zip(aligned)
            .map(|(window, bar)| IndicatorPoint::new(bar.time(), stats::mean(window)))
            .collect()
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

/// SMA of closing prices over `period` bars.
///
/// Shorthand for `Sma::new(SmaConfig::close(period)).calculate(bars)`.
#[must_use]
pub fn calculate_sma<B: Ohlcv>(bars: &[B], period: NonZero<usize>) -> Vec<IndicatorPoint> {
    Sma::new(SmaConfig::close(period)).calculate(bars)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, day, ohlc, series};
    use std::num::NonZero;

    fn sma(length: usize) -> Sma {
        Sma::new(SmaConfig::close(NonZero::new(length).unwrap()))
    }

    mod warm_up {
        use super::*;

        #[test]
        fn empty_when_shorter_than_window() {
            assert!(sma(3).calculate(&series(&[10.0, 20.0])).is_empty());
        }

        #[test]
        fn empty_series() {
            assert!(sma(1).calculate(&series(&[])).is_empty());
        }

        #[test]
        fn single_point_when_window_just_full() {
            let points = sma(3).calculate(&series(&[10.0, 20.0, 30.0]));
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].value(), 20.0);
            assert_eq!(points[0].time(), day(3));
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            let points = sma(2).calculate(&series(&[10.0, 20.0, 30.0]));
            // (10 + 20) / 2, (20 + 30) / 2
            assert_eq!(points[0].value(), 15.0);
            assert_eq!(points[1].value(), 25.0);
        }

        #[test]
        fn output_length_is_n_minus_period_plus_one() {
            let closes: Vec<f64> = (10..=20).map(f64::from).collect();
            let points = sma(5).calculate(&series(&closes));
            assert_eq!(points.len(), 7);
            assert_eq!(points[0].value(), 12.0);
            assert_eq!(points[0].time(), day(5));
            assert_eq!(points[6].value(), 18.0);
            assert_eq!(points[6].time(), day(11));
        }

        #[test]
        fn window_of_one_echoes_input() {
            let points = sma(1).calculate(&series(&[3.0, 1.0, 4.0]));
            let values: Vec<f64> = points.iter().map(IndicatorPoint::value).collect();
            assert_eq!(values, vec![3.0, 1.0, 4.0]);
        }

        #[test]
        fn non_integer_mean() {
            let points = sma(3).calculate(&series(&[15.0, 20.0, 30.0]));
            assert_approx!(points[0].value(), 65.0 / 3.0);
        }
    }

    mod price_source {
        use super::*;

        #[test]
        fn hl2_source() {
            let sma = Sma::new(SmaConfig::hl2(NonZero::new(2).unwrap()));
            let bars = [
                ohlc(0.0, 20.0, 10.0, 0.0, 1), // HL2 = 15
                ohlc(0.0, 30.0, 20.0, 0.0, 2), // HL2 = 25
            ];
            assert_eq!(sma.calculate(&bars)[0].value(), 20.0);
        }

        #[test]
        fn true_range_source() {
            let sma = Sma::new(
                SmaConfig::builder()
                    .length(NonZero::new(2).unwrap())
                    .source(PriceSource::TrueRange)
                    .build(),
            );
            let bars = [
                ohlc(10.0, 20.0, 5.0, 15.0, 1),  // TR = 15
                ohlc(16.0, 22.0, 12.0, 18.0, 2), // hl 10, |22-15| 7, |12-15| 3 → 10
            ];
            assert_eq!(sma.calculate(&bars)[0].value(), 12.5);
        }
    }

    mod purity {
        use super::*;

        #[test]
        fn repeated_calls_are_identical() {
            let bars = series(&[1.0, 5.0, 2.0, 8.0, 3.0]);
            let sma = sma(2);
            assert_eq!(sma.calculate(&bars), sma.calculate(&bars));
        }

        #[test]
        fn free_function_matches_indicator() {
            let bars = series(&[1.0, 5.0, 2.0, 8.0, 3.0]);
            assert_eq!(
                calculate_sma(&bars, NonZero::new(3).unwrap()),
                sma(3).calculate(&bars)
            );
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(sma(20).to_string(), "SMA(20, Close)");
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn close_helper_uses_close_source() {
            let config = SmaConfig::close(NonZero::new(10).unwrap());
            assert_eq!(*config.source(), PriceSource::Close);
        }

        #[test]
        fn hl2_helper_uses_hl2_source() {
            let config = SmaConfig::hl2(NonZero::new(10).unwrap());
            assert_eq!(*config.source(), PriceSource::HL2);
        }

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = SmaConfig::builder().build();
        }

        #[test]
        fn display_config() {
            let config = SmaConfig::close(NonZero::new(20).unwrap());
            assert_eq!(config.to_string(), "SmaConfig(20, Close)");
        }

        #[test]
        fn eq_and_hash() {
            let a = SmaConfig::close(NonZero::new(20).unwrap());
            let b = SmaConfig::close(NonZero::new(20).unwrap());
            let c = SmaConfig::close(NonZero::new(10).unwrap());

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }

        #[test]
        fn min_bars_is_length() {
            assert_eq!(sma(7).min_bars(), 7);
        }
    }
}
