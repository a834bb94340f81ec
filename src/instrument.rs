//! Instruments shown on the dashboard: currency pairs, economic rates and
//! commodity prices.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PriceBar;

/// Dashboard grouping of an instrument. Rates split into three categories
/// by [`RateKind`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Currency,
    Rate,
    Index,
    Percentage,
    Commodity,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Currency => "currency",
            Self::Rate => "rate",
            Self::Index => "index",
            Self::Percentage => "percentage",
            Self::Commodity => "commodity",
        };
        f.write_str(name)
    }
}

/// What an [`EconomicRate`] measures.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Interest rate, e.g. the official cash rate.
    #[default]
    Rate,
    /// Index level, e.g. a price index.
    Index,
    /// Percentage statistic, e.g. unemployment or CPI change.
    Percentage,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommodityType {
    Dairy,
    Meat,
    Produce,
    #[default]
    Other,
}

/// Fields shared by every instrument kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_value: f64,
    pub previous_value: f64,
    pub change: f64,
    pub change_percent: f64,
    /// Display unit, e.g. `"%"` or `""` for plain prices.
    pub unit: String,
    pub last_updated: DateTime<Utc>,
    /// Human-readable cadence, e.g. `"Monthly"`.
    pub update_frequency: String,
    /// Daily history, oldest first.
    #[serde(default)]
    pub data: Vec<PriceBar>,
}

impl InstrumentInfo {
    /// Creates an instrument header with `change` and `change_percent`
    /// derived from the two values. Unit and frequency start empty; history
    /// starts empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_value: f64,
        previous_value: f64,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let change = current_value - previous_value;

        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_value,
            previous_value,
            change,
            change_percent: percent_change(change, previous_value),
            unit: String::new(),
            last_updated,
            update_frequency: String::new(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_update_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.update_frequency = frequency.into();
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<PriceBar>) -> Self {
        self.data = data;
        self
    }
}

/// A currency pair such as NZD/USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub info: InstrumentInfo,
    pub base: String,
    pub quote: String,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

impl CurrencyPair {
    /// `ask − bid` when both sides are quoted.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        Some(self.ask? - self.bid?)
    }
}

/// An interest rate, index, or percentage statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicRate {
    pub info: InstrumentInfo,
    pub kind: RateKind,
    /// Publishing body.
    pub source: String,
    pub next_update: Option<DateTime<Utc>>,
}

/// A retail or export commodity price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPrice {
    pub info: InstrumentInfo,
    pub commodity_type: CommodityType,
    /// e.g. `"per kg"`, `"per 500g"`, `"per tonne"`.
    pub measure_unit: String,
    pub source: String,
    pub grade: Option<String>,
}

/// Any instrument the dashboard can chart.
///
/// Serialised internally tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instrument {
    Currency(CurrencyPair),
    Rate(EconomicRate),
    Commodity(CommodityPrice),
}

/// Partial update applied with [`Instrument::apply`]. Unset fields are kept
/// or derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentUpdate {
    pub current_value: Option<f64>,
    pub previous_value: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub data: Option<Vec<PriceBar>>,
}

impl InstrumentUpdate {
    /// A new quote with everything else derived.
    #[must_use]
    pub fn quote(current_value: f64) -> Self {
        Self {
            current_value: Some(current_value),
            ..Self::default()
        }
    }

    /// Replacement history with everything else derived.
    #[must_use]
    pub fn series(data: Vec<PriceBar>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

impl Instrument {
    #[must_use]
    pub fn info(&self) -> &InstrumentInfo {
        match self {
            Self::Currency(pair) => &pair.info,
            Self::Rate(rate) => &rate.info,
            Self::Commodity(commodity) => &commodity.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut InstrumentInfo {
        match self {
            Self::Currency(pair) => &mut pair.info,
            Self::Rate(rate) => &mut rate.info,
            Self::Commodity(commodity) => &mut commodity.info,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.info().id
    }

    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Currency(_) => Category::Currency,
            Self::Rate(rate) => match rate.kind {
                RateKind::Rate => Category::Rate,
                RateKind::Index => Category::Index,
                RateKind::Percentage => Category::Percentage,
            },
            Self::Commodity(_) => Category::Commodity,
        }
    }

    /// Price history, oldest first.
    #[must_use]
    pub fn series(&self) -> &[PriceBar] {
        &self.info().data
    }

    /// Applies a partial update stamped at `now`.
    ///
    /// `change` defaults to the move from the old current value to the new
    /// one (zero when no new value is given) and `change_percent` to that
    /// move relative to the old value (zero when the old value is zero).
    pub fn apply(&mut self, update: InstrumentUpdate, now: DateTime<Utc>) {
        let info = self.info_mut();
        let old_value = info.current_value;
        let new_value = update.current_value.unwrap_or(old_value);
        let change = new_value - old_value;

        info.current_value = new_value;
        if let Some(previous) = update.previous_value {
            info.previous_value = previous;
        }
        info.change = update.change.unwrap_or(change);
        info.change_percent = update
            .change_percent
            .unwrap_or_else(|| percent_change(change, old_value));
        if let Some(data) = update.data {
            info.data = data;
        }
        info.last_updated = now;
    }

    /// Copy of this instrument with its price history dropped.
    #[must_use]
    pub fn without_series(&self) -> Self {
        match self {
            Self::Currency(pair) => Self::Currency(CurrencyPair {
                info: header(&pair.info),
                base: pair.base.clone(),
                quote: pair.quote.clone(),
                bid: pair.bid,
                ask: pair.ask,
            }),
            Self::Rate(rate) => Self::Rate(EconomicRate {
                info: header(&rate.info),
                kind: rate.kind,
                source: rate.source.clone(),
                next_update: rate.next_update,
            }),
            Self::Commodity(commodity) => Self::Commodity(CommodityPrice {
                info: header(&commodity.info),
                commodity_type: commodity.commodity_type,
                measure_unit: commodity.measure_unit.clone(),
                source: commodity.source.clone(),
                grade: commodity.grade.clone(),
            }),
        }
    }
}

/// Copies every field except the price history.
fn header(info: &InstrumentInfo) -> InstrumentInfo {
    InstrumentInfo {
        id: info.id.clone(),
        symbol: info.symbol.clone(),
        name: info.name.clone(),
        current_value: info.current_value,
        previous_value: info.previous_value,
        change: info.change,
        change_percent: info.change_percent,
        unit: info.unit.clone(),
        last_updated: info.last_updated,
        update_frequency: info.update_frequency.clone(),
        data: Vec::new(),
    }
}

fn percent_change(change: f64, base: f64) -> f64 {
    if base == 0.0 { 0.0 } else { change / base * 100.0 }
}
