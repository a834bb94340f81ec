use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Calendar date a bar belongs to.
///
/// Serialised as an ISO 8601 `YYYY-MM-DD` string.
pub type BarDate = NaiveDate;

/// OHLC bar data used as input to all indicators.
///
/// Implement this on your own candle type to avoid per-series
/// conversion. Indicators accept `&[impl Ohlcv]` and extract the
/// configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Ordering
///
/// A series is expected to be strictly ascending by [`time`](Ohlcv::time)
/// with no duplicates. Indicators work purely on index position and never
/// check this; see [`is_strictly_ascending`] for an explicit check.
///
/// # Example
///
/// ```
/// use econ_ta::{BarDate, Ohlcv, Price};
///
/// struct MyCandle {
///     o: f64, h: f64, l: f64, c: f64,
///     day: BarDate,
/// }
///
/// impl Ohlcv for MyCandle {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn time(&self) -> BarDate { self.day }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Date of the bar. Copied verbatim onto derived points.
    fn time(&self) -> BarDate;

    /// Trade volume during the bar. Defaults to `0.0`.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// A daily price bar as stored on an [`Instrument`](crate::Instrument).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: BarDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PriceBar {
    /// Bar without volume.
    #[must_use]
    pub fn new(time: BarDate, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }
}

impl Ohlcv for PriceBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn time(&self) -> BarDate {
        self.time
    }

    fn volume(&self) -> f64 {
        self.volume.unwrap_or(0.0)
    }
}

/// Returns `true` when every bar is strictly later than the one before it.
///
/// Indicators assume this but never call it; validating input is the
/// caller's job.
#[must_use]
pub fn is_strictly_ascending(bars: &[impl Ohlcv]) -> bool {
    bars.windows(2).all(|pair| pair[0].time() < pair[1].time())
}
