use std::{fmt::Display, num::NonZero};

use crate::{
    BandPoint, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource, StdDev,
    stats::LinearFit,
};

/// Configuration for the [`StdDevChannel`] indicator.
///
/// Defaults: length 20, close, 2σ.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct ChannelConfig {
    length: usize,
    source: PriceSource,
    std_dev: StdDev,
}

impl IndicatorConfig for ChannelConfig {
    type Builder = ChannelConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        ChannelConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl ChannelConfig {
    /// Regression window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Residual standard deviation multiplier.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// Channel(20, Close, 2σ).
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().build()
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::default_20()
    }
}

impl Display for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChannelConfig({}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value()
        )
    }
}

/// Builder for [`ChannelConfig`].
pub struct ChannelConfigBuilder {
    length: usize,
    source: PriceSource,
    std_dev: StdDev,
}

impl ChannelConfigBuilder {
    fn new() -> Self {
        Self {
            length: 20,
            source: PriceSource::Close,
            std_dev: StdDev::default(),
        }
    }

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

impl IndicatorConfigBuilder<ChannelConfig> for ChannelConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> ChannelConfig {
        ChannelConfig {
            length: self.length,
            source: self.source,
            std_dev: self.std_dev,
        }
    }
}

/// Standard-deviation (linear regression) channel.
///
/// For each trailing window, fits `price = intercept + slope × x` by
/// ordinary least squares with `x = 0..length`. The middle line is the fit
/// evaluated at the newest bar (`x = length − 1`); the envelope is offset by
/// `k` population standard deviations of the residuals.
///
/// ```text
/// middle = intercept + slope × (length − 1)
/// upper  = middle + k × σ(residuals)
/// lower  = middle − k × σ(residuals)
/// ```
///
/// A window of length 1 has no x-variance; the fit falls back to a flat line
/// through the single price.
///
/// # Example
///
/// ```
/// use econ_ta::{ChannelConfig, PriceBar, StdDevChannel};
/// use chrono::NaiveDate;
///
/// // Perfect uptrend: residuals vanish and the channel hugs the price.
/// let bars: Vec<PriceBar> = (1..=20)
///     .map(|d| {
///         let c = f64::from(d);
///         PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), c, c, c, c)
///     })
///     .collect();
///
/// let channel = StdDevChannel::new(ChannelConfig::default()).calculate(&bars);
///
/// assert_eq!(channel.len(), 1);
/// assert!((channel[0].middle() - 20.0).abs() < 1e-9);
/// assert!(channel[0].width() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct StdDevChannel {
    config: ChannelConfig,
}

impl Indicator for StdDevChannel {
    type Config = ChannelConfig;
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
        #[allow(clippy::cast_precision_loss)]
        let last_x = (self.config.length - 1) as f64;

        prices
            .windows(self.config.length)
            .zip(aligned)
            .map(|(window, bar)| {
                let fit = LinearFit::of(window);
                let residual = fit.residual_std_dev(window);

                BandPoint::around(bar.time(), fit.at(last_x), multiplier * residual)
            })
            .collect()
    }
}

impl Display for StdDevChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StdDevChannel({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev.value(),
        )
    }
}

/// Regression channel on closing prices.
///
/// The conventional arguments are `period = 20`, `num_std_dev = 2.0`.
#[must_use]
pub fn calculate_std_dev_channels<B: Ohlcv>(
    bars: &[B],
    period: NonZero<usize>,
    num_std_dev: StdDev,
) -> Vec<BandPoint> {
    let config = ChannelConfig::builder()
        .length(period)
        .std_dev(num_std_dev)
        .build();

    StdDevChannel::new(config).calculate(bars)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{day, series};

    fn channel(length: usize) -> StdDevChannel {
        StdDevChannel::new(
            ChannelConfig::builder()
                .length(NonZero::new(length).unwrap())
                .build(),
        )
    }

    #[test]
    fn empty_when_shorter_than_window() {
        assert!(channel(5).calculate(&series(&[1.0, 2.0, 3.0])).is_empty());
    }

    #[test]
    fn output_length_and_alignment() {
        let bars = series(&[1.0, 3.0, 2.0, 5.0, 4.0, 6.0]);
        let points = channel(4).calculate(&bars);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].time(), day(4));
        assert_eq!(points[2].time(), day(6));
    }

    #[test]
    fn linear_trend_has_zero_width() {
        // y = 10 + 3x
        let points = channel(5).calculate(&series(&[10.0, 13.0, 16.0, 19.0, 22.0, 25.0]));
        assert!((points[0].middle() - 22.0).abs() < 1e-9);
        assert!((points[1].middle() - 25.0).abs() < 1e-9);
        assert!(points.iter().all(|p| p.width() < 1e-9));
    }

    #[test]
    fn zigzag_window() {
        // fit slope 0.4, intercept 0.4 → middle at x=3 is 1.6, σ = sqrt(0.8)
        let points = channel(4).calculate(&series(&[0.0, 2.0, 0.0, 2.0]));
        let sigma = 0.8_f64.sqrt();
        assert!((points[0].middle() - 1.6).abs() < 1e-12);
        assert!((points[0].upper() - (1.6 + 2.0 * sigma)).abs() < 1e-12);
        assert!((points[0].lower() - (1.6 - 2.0 * sigma)).abs() < 1e-12);
    }

    #[test]
    fn middle_differs_from_sma_on_trend() {
        // Regression endpoint leads the mean on a trending window.
        let points = channel(3).calculate(&series(&[1.0, 2.0, 3.0]));
        assert!((points[0].middle() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn length_one_guards_zero_variance() {
        let points = channel(1).calculate(&series(&[7.0, 9.0]));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].middle(), 7.0);
        assert_eq!(points[0].width(), 0.0);
        assert_eq!(points[1].middle(), 9.0);
    }

    #[test]
    fn constant_prices_collapse_channel() {
        let points = channel(20).calculate(&series(&[100.0; 25]));
        assert!(points
            .iter()
            .all(|p| (p.middle() - 100.0).abs() < 1e-9 && p.width() < 1e-9));
    }

    #[test]
    fn default_config() {
        let config = ChannelConfig::default();
        assert_eq!(config.length(), 20);
        assert_eq!(config.std_dev(), StdDev::default());
        assert_eq!(config.to_string(), "ChannelConfig(20, Close, 2)");
    }

    #[test]
    fn free_function_matches_indicator() {
        let bars = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        assert_eq!(
            calculate_std_dev_channels(&bars, NonZero::new(4).unwrap(), StdDev::default()),
            channel(4).calculate(&bars)
        );
    }
}
