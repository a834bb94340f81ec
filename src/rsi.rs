use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, OscillatorPoint, Price, PriceSource,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at bar `length + 1`.
///
/// # Example
///
/// ```
/// use econ_ta::RsiConfig;
///
/// let config = RsiConfig::default();
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl RsiConfig {
    /// Smoothing length (number of price changes).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// RSI(14) on closing price.
    #[must_use]
    pub fn default_14() -> Self {
        Self::builder().build()
    }
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self::default_14()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: length = `14`, source = [`PriceSource::Close`].
pub struct RsiConfigBuilder {
    length: usize,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: 14,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            length: self.length,
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed), which yields the first value at bar `length`.
/// After that, gains and losses are smoothed with Wilder's method:
///
/// ```text
/// avg_gain = (prev_avg_gain × (length − 1) + gain) / length
/// avg_loss = (prev_avg_loss × (length − 1) + loss) / length
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// When `avg_loss` is zero the ratio is unbounded and RSI is pinned
/// at 100, including for a perfectly flat series.
///
/// # Example
///
/// ```
/// use econ_ta::{Rsi, RsiConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let bars: Vec<PriceBar> = [10.0, 12.0, 11.0, 13.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, d)| PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), c, c, c, c))
///     .collect();
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
/// let points = rsi.calculate(&bars);
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// assert_eq!(points.len(), 1);
/// assert!((points[0].value() - 80.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = OscillatorPoint;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.config.length + 1
    }

    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<OscillatorPoint> {
        let length = self.config.length;
        if bars.len() < length + 1 {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)]
        let length_reciprocal = 1.0 / length as f64;
        #[allow(clippy::cast_precision_loss)]
        let length_minus_one = (length - 1) as f64;

        let prices = self.config.source.prices(bars);
        let mut changes = prices
            .windows(2)
            .map(|pair| Self::gain_and_loss(pair[0], pair[1]));

        let (mut sum_gain, mut sum_loss) = (0.0, 0.0);
        for (gain, loss) in changes.by_ref().take(length) {
            sum_gain += gain;
            sum_loss += loss;
        }

        let mut avg_gain = sum_gain * length_reciprocal;
        let mut avg_loss = sum_loss * length_reciprocal;

        let mut out = Vec::with_capacity(bars.len() - length);
        out.push(OscillatorPoint::new(
            bars[length].time(),
            Self::rsi_from_averages(avg_gain, avg_loss),
        ));

        for ((gain, loss), bar) in changes.zip(&bars[length + 1..]) {
            avg_gain = avg_gain.mul_add(length_minus_one, gain) * length_reciprocal;
            avg_loss = avg_loss.mul_add(length_minus_one, loss) * length_reciprocal;

            out.push(OscillatorPoint::new(
                bar.time(),
                Self::rsi_from_averages(avg_gain, avg_loss),
            ));
        }

        out
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

/// RSI of closing prices. The conventional `period` is 14.
#[must_use]
pub fn calculate_rsi<B: Ohlcv>(bars: &[B], period: NonZero<usize>) -> Vec<OscillatorPoint> {
    Rsi::new(RsiConfig::close(period)).calculate(bars)
}
