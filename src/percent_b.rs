use std::{fmt::Display, num::NonZero};

use crate::{
    Bb, BbConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, OscillatorPoint,
    StdDev,
};

/// Bollinger %B: where the price sits inside its Bollinger Bands.
///
/// ```text
/// %B = (price − lower) / (upper − lower) × 100
/// ```
///
/// 0 is the lower band, 100 the upper band, 50 the middle. Prices outside the
/// envelope fall outside `0..=100`. A window with zero bandwidth (all prices
/// equal) emits exactly 50.
///
/// Configured with a [`BbConfig`]; the price compared against the bands is
/// that config's source.
///
/// # Example
///
/// ```
/// use econ_ta::{BbConfig, PercentB, PriceBar};
/// use chrono::NaiveDate;
///
/// let bars: Vec<PriceBar> = (1..=25)
///     .map(|d| PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), 100.0, 100.0, 100.0, 100.0))
///     .collect();
///
/// let percent_b = PercentB::new(BbConfig::default()).calculate(&bars);
///
/// assert_eq!(percent_b.len(), 6);
/// assert!(percent_b.iter().all(|p| p.value() == 50.0));
/// ```
#[derive(Clone, Debug)]
pub struct PercentB {
    bands: Bb,
}

impl Indicator for PercentB {
    type Config = BbConfig;
    type Output = OscillatorPoint;

    fn new(config: Self::Config) -> Self {
        Self {
            bands: Bb::new(config),
        }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        self.bands.config()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.bands.min_bars()
    }

    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<OscillatorPoint> {
        let bands = self.bands.calculate(bars);
        if bands.is_empty() {
            return Vec::new();
        }

        let prices = self.config().source().prices(bars);
        let start = prices.len() - bands.len();

        bands
            .iter()
            .zip(&prices[start..])
            .map(|(band, &price)| {
                let width = band.width();
                let value = if width > 0.0 {
                    (price - band.lower()) / width * 100.0
                } else {
                    50.0
                };

                OscillatorPoint::new(band.time(), value)
            })
            .collect()
    }
}

impl Display for PercentB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.config();
        write!(
            f,
            "%B({}, {}, {})",
            config.length(),
            config.source(),
            config.std_dev().value()
        )
    }
}

/// Bollinger %B of closing prices.
///
/// The conventional arguments are `period = 20`, `num_std_dev = 2.0`.
#[must_use]
pub fn calculate_bb_percentile<B: Ohlcv>(
    bars: &[B],
    period: NonZero<usize>,
    num_std_dev: StdDev,
) -> Vec<OscillatorPoint> {
    let config = BbConfig::builder()
        .length(period)
        .std_dev(num_std_dev)
        .build();

    PercentB::new(config).calculate(bars)
}
