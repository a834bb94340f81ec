//! Technical indicators and dashboard state for economic-indicator price
//! series: currency pairs, interest rates and commodity prices.
//!
//! The indicator engine is a set of pure functions over a borrowed,
//! time-ordered series of bars. Indicators accept any type implementing
//! [`Ohlcv`] and return freshly allocated point vectors aligned to a suffix
//! of the input. A series too short for an indicator yields an empty vector,
//! never an error.
//!
//! Each indicator type ([`Sma`], [`Ema`], [`Bb`], [`Rsi`], [`Macd`],
//! [`StdDevChannel`], [`PercentB`]) exposes [`new`](Sma::new),
//! [`config`](Sma::config) and [`calculate`](Sma::calculate) as inherent
//! methods, so no trait import is needed. Import [`Indicator`] only for generic
//! code. For one-off calls, the `calculate_*` functions take the periods
//! directly.
//!
//! Around the engine sit the collaborators a chart front end needs: the
//! [`Instrument`] model, the [`Dashboard`] state container with JSON
//! persistence and its [`Overlay`] presets, and the [`NewsFeed`] that
//! annotates charts with events.

mod bb;
mod channel;
mod dashboard;
mod ema;
mod error;
mod indicator;
mod instrument;
mod macd;
mod news;
mod ohlcv;
mod overlay;
mod percent_b;
mod point;
mod price_source;
mod rsi;
mod sma;
mod stats;

pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{BarDate, Ohlcv, Price, PriceBar, is_strictly_ascending};
pub use crate::point::{BandPoint, IndicatorPoint, MacdPoint, OscillatorPoint};
pub use crate::price_source::PriceSource;

pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, StdDev, calculate_bollinger_bands};
pub use crate::channel::{
    ChannelConfig, ChannelConfigBuilder, StdDevChannel, calculate_std_dev_channels,
};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, calculate_ema};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, calculate_macd};
pub use crate::percent_b::{PercentB, calculate_bb_percentile};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, calculate_rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, calculate_sma};

pub use crate::dashboard::{
    Alert, AlertDirection, AlertUpdate, Dashboard, DashboardSnapshot, TimeRange,
};
pub use crate::error::StoreError;
pub use crate::instrument::{
    Category, CommodityPrice, CommodityType, CurrencyPair, EconomicRate, Instrument,
    InstrumentInfo, InstrumentUpdate, RateKind,
};
pub use crate::overlay::{Overlay, OverlaySeries};
pub use crate::news::{
    ChartMarker, Impact, MarkerPosition, MarkerShape, NewsCategory, NewsEvent, NewsFeed,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::config`].
            #[must_use]
            #[inline]
            pub fn config(&self) -> &$config {
                <Self as Indicator>::config(self)
            }

            /// See [`Indicator::min_bars`].
            #[must_use]
            #[inline]
            pub fn min_bars(&self) -> usize {
                <Self as Indicator>::min_bars(self)
            }

            /// See [`Indicator::calculate`].
            #[must_use]
            pub fn calculate<B: Ohlcv>(&self, bars: &[B]) -> Vec<$output> {
                <Self as Indicator>::calculate(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, IndicatorPoint);
impl_indicator_methods!(Ema, EmaConfig, IndicatorPoint);
impl_indicator_methods!(Bb, BbConfig, BandPoint);
impl_indicator_methods!(Rsi, RsiConfig, OscillatorPoint);
impl_indicator_methods!(Macd, MacdConfig, MacdPoint);
impl_indicator_methods!(StdDevChannel, ChannelConfig, BandPoint);
impl_indicator_methods!(PercentB, BbConfig, OscillatorPoint);

#[cfg(test)]
mod test_util;
