use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorPoint, Ohlcv, Price, PriceSource,
    stats,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use econ_ta::EmaConfig;
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(12).unwrap());
///
/// assert_eq!(config.length(), 12);
/// assert_eq!(config.alpha(), 2.0 / 13.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl EmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        alpha(self.length)
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// EMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the indicator window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = (price − prev_EMA) × α + prev_EMA
/// ```
///
/// The first value is seeded with the SMA of the first `length`
/// prices and aligned to bar `length − 1`; every later bar emits one
/// value, so the output has `n − length + 1` points.
///
/// # Example
///
/// ```
/// use econ_ta::{Ema, EmaConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let bars: Vec<PriceBar> = [2.0, 4.0, 6.0, 8.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, d)| PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), c, c, c, c))
///     .collect();
///
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
/// let points = ema.calculate(&bars);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(points[0].value(), 4.0);
///
/// // EMA(3) α = 0.5: (8 − 4) × 0.5 + 4 = 6.0
/// assert_eq!(points[1].value(), 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
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
        let prices = self.config.source.prices(bars);
        let aligned = bars.iter().skip(self.config.length - 1);

        ema_values(&prices, self.config.length)
            .into_iter()
            .zip(aligned)
            .map(|(value, bar)| IndicatorPoint::new(bar.time(), value))
            .collect()
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

#[inline]
fn alpha(length: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let alpha = 2.0 / (length + 1) as f64;
    alpha
}

/// EMA recurrence over a raw value series.
///
/// Returns `values.len() - length + 1` values (empty when shorter than
/// `length`). Also drives the MACD signal line.
pub(crate) fn ema_values(values: &[Price], length: usize) -> Vec<Price> {
    if length == 0 || values.len() < length {
        return Vec::new();
    }

    let alpha = alpha(length);
    let (seed, rest) = values.split_at(length);

    let mut ema = stats::mean(seed);
    let mut out = Vec::with_capacity(values.len() - length + 1);
    out.push(ema);

    for &value in rest {
        ema = alpha.mul_add(value - ema, ema);
        out.push(ema);
    }

    out
}

/// EMA of closing prices over `period` bars.
#[must_use]
pub fn calculate_ema<B: Ohlcv>(bars: &[B], period: NonZero<usize>) -> Vec<IndicatorPoint> {
    Ema::new(EmaConfig::close(period)).calculate(bars)
}
