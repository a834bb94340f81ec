//! The fixed indicator presets a chart can switch on.

use std::{fmt::Display, num::NonZero};

use serde::{Deserialize, Serialize};

use crate::{
    BandPoint, Bb, BbConfig, ChannelConfig, Ema, EmaConfig, IndicatorPoint, Ohlcv,
    OscillatorPoint, PercentB, Sma, SmaConfig, StdDevChannel,
};

/// Chart overlay with its parameters fixed.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Overlay {
    #[serde(rename = "sma20")]
    Sma20,
    #[serde(rename = "sma50")]
    Sma50,
    #[serde(rename = "ema12")]
    Ema12,
    #[serde(rename = "ema26")]
    Ema26,
    /// Bollinger Bands (20, 2σ).
    #[serde(rename = "bollinger")]
    Bollinger,
    /// Regression channel (20, 2σ).
    #[serde(rename = "stddev")]
    StdDevChannel,
    /// Bollinger %B (20, 2σ), drawn in its own pane.
    #[serde(rename = "bbpercent")]
    PercentB,
}

/// Output of one [`Overlay`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "lowercase")]
pub enum OverlaySeries {
    Line(Vec<IndicatorPoint>),
    Bands(Vec<BandPoint>),
    Oscillator(Vec<OscillatorPoint>),
}

impl OverlaySeries {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Line(points) => points.len(),
            Self::Bands(points) => points.len(),
            Self::Oscillator(points) => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn length(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap_or(NonZero::<usize>::MIN)
}

impl Overlay {
    pub const ALL: [Overlay; 7] = [
        Self::Sma20,
        Self::Sma50,
        Self::Ema12,
        Self::Ema26,
        Self::Bollinger,
        Self::StdDevChannel,
        Self::PercentB,
    ];

    /// Bars needed before the overlay draws anything.
    #[must_use]
    pub fn min_bars(self) -> usize {
        match self {
            Self::Sma20 | Self::Bollinger | Self::StdDevChannel | Self::PercentB => 20,
            Self::Sma50 => 50,
            Self::Ema12 => 12,
            Self::Ema26 => 26,
        }
    }

    /// Draws on the price pane rather than a separate one.
    #[must_use]
    pub fn is_price_overlay(self) -> bool {
        !matches!(self, Self::PercentB)
    }

    #[must_use]
    pub fn calculate<B: Ohlcv>(self, bars: &[B]) -> OverlaySeries {
        match self {
            Self::Sma20 | Self::Sma50 => {
                let sma = Sma::new(SmaConfig::close(length(self.min_bars())));
                OverlaySeries::Line(sma.calculate(bars))
            }
            Self::Ema12 | Self::Ema26 => {
                let ema = Ema::new(EmaConfig::close(length(self.min_bars())));
                OverlaySeries::Line(ema.calculate(bars))
            }
            Self::Bollinger => OverlaySeries::Bands(Bb::new(BbConfig::default_20()).calculate(bars)),
            Self::StdDevChannel => OverlaySeries::Bands(
                StdDevChannel::new(ChannelConfig::default_20()).calculate(bars),
            ),
            Self::PercentB => {
                OverlaySeries::Oscillator(PercentB::new(BbConfig::default_20()).calculate(bars))
            }
        }
    }
}

impl Display for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Sma20 => "SMA 20",
            Self::Sma50 => "SMA 50",
            Self::Ema12 => "EMA 12",
            Self::Ema26 => "EMA 26",
            Self::Bollinger => "Bollinger Bands",
            Self::StdDevChannel => "Std Dev Channel",
            Self::PercentB => "BB %B",
        };
        f.write_str(label)
    }
}
