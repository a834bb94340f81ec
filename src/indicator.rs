use crate::{Ohlcv, PriceSource};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (lengths, price source, band width). Configs are value types: cheap to
/// clone, compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source to extract from each bar.
    fn source(&self) -> &PriceSource;
}

/// Builder for an [`IndicatorConfig`].
///
/// Length setters are inherent on each builder since indicators differ in
/// how many windows they take.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config. Panics if required fields are missing or invalid.
    #[must_use]
    fn build(self) -> Config;
}

/// A technical indicator over a whole price series.
///
/// Indicators are stateless apart from their config: [`calculate`]
/// borrows the series, never mutates it, and returns a freshly allocated
/// vector aligned to a suffix of the input. Calling it twice on the same
/// input yields the same output.
///
/// Output is empty when the series is shorter than
/// [`min_bars`](Indicator::min_bars). Insufficient data is not an error.
///
/// [`calculate`]: Indicator::calculate
///
/// # Example
///
/// ```
/// use econ_ta::{Indicator, Sma, SmaConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let bars: Vec<PriceBar> = [10.0, 20.0, 30.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, d)| PriceBar::new(day(d), c, c, c, c))
///     .collect();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let points = sma.calculate(&bars);
///
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].value(), 20.0);
/// assert_eq!(points[0].time(), day(3));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Point type emitted per qualifying bar.
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The config this indicator was built with.
    fn config(&self) -> &Self::Config;

    /// Minimum number of bars needed for the first output point.
    fn min_bars(&self) -> usize;

    /// Computes the indicator over `bars`, oldest first.
    fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Self::Output>;
}
