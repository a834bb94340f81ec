use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use crate::{
    BandPoint, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource, stats,
};

/// Standard deviation multiplier for band indicators.
///
/// Wraps a positive, non-NaN `f64`. The constructor panics if the value is
/// zero, negative, or NaN.
///
/// Defaults to `2.0` (the standard Bollinger Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct StdDev(f64);

impl StdDev {
    /// Creates a new standard deviation multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, or NaN.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "std_dev must not be NaN");
        assert!(value > 0.0, "std_dev must be positive");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// Also drives [`PercentB`](crate::PercentB), which is derived from the
/// same bands.
///
/// # Example
///
/// ```
/// use econ_ta::{BbConfig, StdDev};
/// use std::num::NonZero;
///
/// // Default: length 20, close, 2.0 std devs
/// let config = BbConfig::default();
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.std_dev(), StdDev::new(2.0));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    std_dev: StdDev,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl BbConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// BB(20, Close, 2σ), the standard Bollinger Bands setting.
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().build()
    }

    /// BB with custom length, close price, 2σ.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for BbConfig {
    fn default() -> Self {
        Self::default_20()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value()
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: length = `20`, source = [`PriceSource::Close`],
/// `std_dev` = `2.0`.
pub struct BbConfigBuilder {
    length: usize,
    source: PriceSource,
    std_dev: StdDev,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: 20,
            source: PriceSource::Close,
            std_dev: StdDev::default(),
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> BbConfig {
        BbConfig {
            length: self.length,
            source: self.source,
            std_dev: self.std_dev,
        }
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// population standard deviations of the same window.
///
/// The middle band is computed exactly as [`Sma`](crate::Sma) computes its
/// value, so the two agree bit for bit at every date. A flat window collapses
/// all three bands onto the price.
///
/// # Example
///
/// ```
/// use econ_ta::{Bb, BbConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let bars: Vec<PriceBar> = (1..=20)
///     .map(|d| PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), 100.0, 100.0, 100.0, 100.0))
///     .collect();
///
/// let bands = Bb::new(BbConfig::default()).calculate(&bars);
///
/// assert_eq!(bands.len(), 1);
/// assert_eq!(bands[0].upper(), 100.0);
/// assert_eq!(bands[0].lower(), 100.0);
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BandPoint;

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

    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<BandPoint> {
        if bars.len() < self.config.length {
            return Vec::new();
        }

        let prices = self.config.source.prices(bars);
        let aligned = &bars[self.config.length - 1..];
        let multiplier = self.config.std_dev.value();

        prices
            .windows(self.config.length)
            .zip(aligned)
            .map(|(window, bar)| {
                let mean = stats::mean(window);
                let std_dev = stats::population_std_dev(window, mean);

                BandPoint::around(bar.time(), mean, multiplier * std_dev)
            })
            .collect()
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev.value(),
        )
    }
}

/// Bollinger Bands on closing prices.
///
/// The conventional arguments are `period = 20`, `num_std_dev = 2.0`
/// (see [`BbConfig::default`]).
#[must_use]
pub fn calculate_bollinger_bands<B: Ohlcv>(
    bars: &[B],
    period: NonZero<usize>,
    num_std_dev: StdDev,
) -> Vec<BandPoint> {
    let config = BbConfig::builder()
        .length(period)
        .std_dev(num_std_dev)
        .build();

    Bb::new(config).calculate(bars)
}
