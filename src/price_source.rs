use crate::{Ohlcv, Price};

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Which value of each bar an indicator runs on.
///
/// Most economic series publish one value per period, so their bars carry
/// the same open, high, low and close and every source reduces to that
/// value. The blended sources matter for quoted instruments such as
/// currency pairs.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize, Deserialize)]
pub enum PriceSource {
    Open,
    High,
    #[default]
    Close,
    Low,
    /// `(high + low) / 2`
    HL2,
    /// `(high + low + close) / 3`
    HLC3,
    /// `(open + high + low + close) / 4`
    OHLC4,
    /// `(high + low + 2 × close) / 4`
    HLCC4,
    /// `max(high − low, |high − prev close|, |low − prev close|)`, or
    /// `high − low` on the first bar of a series.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Value of this source for one bar. Only [`TrueRange`](Self::TrueRange)
    /// reads `prev_close`.
    #[inline]
    fn value_of(self, bar: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        let (open, high, low, close) = (bar.open(), bar.high(), bar.low(), bar.close());

        match self {
            Self::Open => open,
            Self::High => high,
            Self::Low => low,
            Self::Close => close,
            Self::HL2 => high.midpoint(low),
            Self::HLC3 => (high + low + close) / 3.0,
            Self::OHLC4 => (open + high + low + close) / 4.0,
            Self::HLCC4 => (high + low + close + close) / 4.0,
            Self::TrueRange => prev_close.map_or(high - low, |prev| {
                (high - low)
                    .max((high - prev).abs())
                    .max((low - prev).abs())
            }),
        }
    }

    /// Extracts this source from every bar of a series, in order.
    pub(crate) fn prices<B: Ohlcv>(self, bars: &[B]) -> Vec<Price> {
        let prev_closes = std::iter::once(None).chain(bars.iter().map(|bar| Some(bar.close())));

        bars.iter()
            .zip(prev_closes)
            .map(|(bar, prev_close)| self.value_of(bar, prev_close))
            .collect()
    }
}
