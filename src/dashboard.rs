//! Dashboard state: the instrument set, the selected chart, the visible time
//! range, the category filter and price alerts, with JSON persistence.

use std::{fmt::Display, path::Path};

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Category, Instrument, InstrumentUpdate, Overlay, OverlaySeries, PriceBar, StoreError};

/// Lookback window of the chart, counted back from today.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    #[default]
    TenYears,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::TenYears,
    ];

    /// First date inside the range.
    ///
    /// Month and year steps clamp to the end of a shorter month, so one month
    /// before 31 March is the last day of February.
    #[must_use]
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            Self::OneWeek => today.checked_sub_days(Days::new(7)),
            Self::OneMonth => today.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Self::OneYear => today.checked_sub_months(Months::new(12)),
            Self::FiveYears => today.checked_sub_months(Months::new(60)),
            Self::TenYears => today.checked_sub_months(Months::new(120)),
        };

        start.unwrap_or(NaiveDate::MIN)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::TenYears => "10Y",
        };
        f.write_str(label)
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

/// Threshold alert on an instrument's current value.
///
/// An alert fires once: after [`Dashboard::evaluate_alerts`] stamps
/// `triggered_at` it is skipped until re-armed with
/// [`AlertUpdate::rearm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub instrument_id: String,
    pub direction: AlertDirection,
    pub threshold: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// An enabled, untriggered alert.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        instrument_id: impl Into<String>,
        direction: AlertDirection,
        threshold: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            instrument_id: instrument_id.into(),
            direction,
            threshold,
            enabled: true,
            created_at,
            triggered_at: None,
        }
    }

    /// Strict comparison: a value equal to the threshold does not fire.
    #[must_use]
    pub fn is_met_by(&self, value: f64) -> bool {
        match self.direction {
            AlertDirection::Above => value > self.threshold,
            AlertDirection::Below => value < self.threshold,
        }
    }

    fn is_armed(&self) -> bool {
        self.enabled && self.triggered_at.is_none()
    }
}

/// Partial update for [`Dashboard::update_alert`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertUpdate {
    pub direction: Option<AlertDirection>,
    pub threshold: Option<f64>,
    pub enabled: Option<bool>,
    /// Clears `triggered_at` so the alert can fire again.
    pub rearm: bool,
}

impl AlertUpdate {
    #[must_use]
    pub fn threshold(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rearm() -> Self {
        Self {
            rearm: true,
            ..Self::default()
        }
    }

    fn apply_to(self, alert: &mut Alert) {
        if let Some(direction) = self.direction {
            alert.direction = direction;
        }
        if let Some(threshold) = self.threshold {
            alert.threshold = threshold;
        }
        if let Some(enabled) = self.enabled {
            alert.enabled = enabled;
        }
        if self.rearm {
            alert.triggered_at = None;
        }
    }
}

/// Persisted form of a [`Dashboard`].
///
/// Instruments are stored without price history; call
/// [`Dashboard::restore_series`] after loading to re-attach it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub instruments: Vec<Instrument>,
    pub selected_id: Option<String>,
    #[serde(default)]
    pub time_range: TimeRange,
    pub category_filter: Option<Category>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    /// Active overlays in the order they were switched on.
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

/// State container behind the dashboard view.
///
/// # Example
///
/// ```
/// use econ_ta::{Dashboard, TimeRange};
///
/// let mut dashboard = Dashboard::new();
/// dashboard.set_time_range(TimeRange::OneYear);
///
/// assert!(dashboard.selected().is_none());
/// assert_eq!(dashboard.time_range(), TimeRange::OneYear);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    instruments: Vec<Instrument>,
    selected_id: Option<String>,
    time_range: TimeRange,
    category_filter: Option<Category>,
    alerts: Vec<Alert>,
    overlays: Vec<Overlay>,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard holding `instruments`; later duplicates of an id are
    /// dropped.
    #[must_use]
    pub fn with_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let mut dashboard = Self::new();
        for instrument in instruments {
            dashboard.add_instrument(instrument);
        }
        dashboard
    }

    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    #[must_use]
    pub fn instrument(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id() == id)
    }

    /// Adds `instrument` unless one with the same id is already held.
    /// Returns whether it was added.
    pub fn add_instrument(&mut self, instrument: Instrument) -> bool {
        if self.instrument(instrument.id()).is_some() {
            warn!(id = instrument.id(), "instrument already present, ignored");
            return false;
        }

        debug!(id = instrument.id(), category = %instrument.category(), "instrument added");
        self.instruments.push(instrument);
        true
    }

    /// Removes and returns the instrument, clearing the selection if it
    /// pointed at it.
    pub fn remove_instrument(&mut self, id: &str) -> Option<Instrument> {
        let index = self.instruments.iter().position(|i| i.id() == id)?;
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }

        debug!(id, "instrument removed");
        Some(self.instruments.remove(index))
    }

    /// Applies `update` stamped with the current time.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownInstrument`] if no instrument has this id.
    pub fn update_instrument(
        &mut self,
        id: &str,
        update: InstrumentUpdate,
    ) -> Result<(), StoreError> {
        self.update_instrument_at(id, update, Utc::now())
    }

    /// Applies `update` stamped with `now`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownInstrument`] if no instrument has this id.
    pub fn update_instrument_at(
        &mut self,
        id: &str,
        update: InstrumentUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let instrument = self
            .instruments
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| StoreError::UnknownInstrument(id.to_owned()))?;

        instrument.apply(update, now);
        debug!(
            id,
            value = instrument.info().current_value,
            bars = instrument.series().len(),
            "instrument updated"
        );
        Ok(())
    }

    /// Selects the instrument to chart.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownInstrument`] if no instrument has this id; the
    /// previous selection is kept.
    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        if self.instrument(id).is_none() {
            return Err(StoreError::UnknownInstrument(id.to_owned()));
        }

        self.selected_id = Some(id.to_owned());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Instrument> {
        self.instrument(self.selected_id.as_deref()?)
    }

    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
    }

    #[must_use]
    pub fn category_filter(&self) -> Option<Category> {
        self.category_filter
    }

    /// `None` shows every category.
    pub fn set_category_filter(&mut self, category: Option<Category>) {
        self.category_filter = category;
    }

    /// Instruments passing the category filter, in insertion order.
    pub fn filtered_instruments(&self) -> impl Iterator<Item = &Instrument> {
        let filter = self.category_filter;
        self.instruments
            .iter()
            .filter(move |i| filter.is_none_or(|category| i.category() == category))
    }

    /// Bars of the selected instrument inside the time range ending at
    /// `today`. Empty when nothing is selected.
    ///
    /// The result is a suffix of the instrument's series, so it can be fed
    /// straight into any indicator.
    #[must_use]
    pub fn visible_series(&self, today: NaiveDate) -> &[PriceBar] {
        let Some(instrument) = self.selected() else {
            return &[];
        };

        let start = self.time_range.start_date(today);
        let series = instrument.series();
        let first = series.partition_point(|bar| bar.time < start);
        &series[first..]
    }

    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Switches `overlay` on or off. Returns whether it is now active.
    pub fn toggle_overlay(&mut self, overlay: Overlay) -> bool {
        if let Some(index) = self.overlays.iter().position(|&o| o == overlay) {
            self.overlays.remove(index);
            false
        } else {
            self.overlays.push(overlay);
            true
        }
    }

    /// Every active overlay computed over
    /// [`visible_series`](Self::visible_series).
    #[must_use]
    pub fn overlay_series(&self, today: NaiveDate) -> Vec<(Overlay, OverlaySeries)> {
        let bars = self.visible_series(today);
        self.overlays
            .iter()
            .map(|&overlay| (overlay, overlay.calculate(bars)))
            .collect()
    }

    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn add_alert(&mut self, alert: Alert) {
        if self.instrument(&alert.instrument_id).is_none() {
            warn!(
                id = %alert.id,
                instrument = %alert.instrument_id,
                "alert references an unknown instrument"
            );
        }

        debug!(id = %alert.id, threshold = alert.threshold, "alert added");
        self.alerts.push(alert);
    }

    pub fn remove_alert(&mut self, id: &str) -> Option<Alert> {
        let index = self.alerts.iter().position(|a| a.id == id)?;
        Some(self.alerts.remove(index))
    }

    /// # Errors
    ///
    /// [`StoreError::UnknownAlert`] if no alert has this id.
    pub fn update_alert(&mut self, id: &str, update: AlertUpdate) -> Result<(), StoreError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::UnknownAlert(id.to_owned()))?;

        update.apply_to(alert);
        Ok(())
    }

    /// Fires every armed alert whose instrument's current value crosses its
    /// threshold, stamping it with `now`. Returns the alerts fired by this
    /// call.
    pub fn evaluate_alerts(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        let mut fired = Vec::new();

        for alert in self.alerts.iter_mut().filter(|a| a.is_armed()) {
            let Some(instrument) = self
                .instruments
                .iter()
                .find(|i| i.id() == alert.instrument_id)
            else {
                continue;
            };

            let value = instrument.info().current_value;
            if alert.is_met_by(value) {
                alert.triggered_at = Some(now);
                info!(
                    id = %alert.id,
                    instrument = %alert.instrument_id,
                    value,
                    threshold = alert.threshold,
                    "alert triggered"
                );
                fired.push(alert.clone());
            }
        }

        fired
    }

    /// Current state with price history stripped.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            instruments: self
                .instruments
                .iter()
                .map(Instrument::without_series)
                .collect(),
            selected_id: self.selected_id.clone(),
            time_range: self.time_range,
            category_filter: self.category_filter,
            alerts: self.alerts.clone(),
            overlays: self.overlays.clone(),
        }
    }

    /// Writes [`snapshot`](Self::snapshot) to `path` as pretty JSON, through
    /// a temporary sibling file renamed into place. The temporary file is
    /// removed if either step fails.
    ///
    /// # Errors
    ///
    /// [`StoreError::Json`] if encoding fails, [`StoreError::Io`] if the
    /// file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.snapshot())?;

        let tmp_path = path.with_extension("json.tmp");
        let written = std::fs::write(&tmp_path, content)
            .map_err(|e| StoreError::io(&tmp_path, e))
            .and_then(|()| std::fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e)));

        if let Err(err) = written {
            if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
                debug!(path = %tmp_path.display(), error = %cleanup, "temporary snapshot not removed");
            }
            return Err(err);
        }

        info!(
            path = %path.display(),
            instruments = self.instruments.len(),
            alerts = self.alerts.len(),
            "dashboard saved"
        );
        Ok(())
    }

    /// Reads a snapshot written by [`save`](Self::save). Instruments come
    /// back without price history.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be read, [`StoreError::Json`]
    /// if it is not a valid snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let snapshot: DashboardSnapshot = serde_json::from_str(&content)?;

        info!(
            path = %path.display(),
            instruments = snapshot.instruments.len(),
            alerts = snapshot.alerts.len(),
            "dashboard loaded"
        );
        Ok(Self::from(snapshot))
    }

    /// Copies price history onto held instruments from `reference`, matched
    /// by id. Instruments absent from `reference` keep their series. Returns
    /// how many instruments were hydrated.
    pub fn restore_series(&mut self, reference: &[Instrument]) -> usize {
        let mut restored = 0;

        for instrument in &mut self.instruments {
            match reference.iter().find(|r| r.id() == instrument.id()) {
                Some(source) => {
                    instrument.info_mut().data = source.series().to_vec();
                    restored += 1;
                }
                None => debug!(id = instrument.id(), "no reference series"),
            }
        }

        restored
    }
}

impl From<DashboardSnapshot> for Dashboard {
    fn from(snapshot: DashboardSnapshot) -> Self {
        let mut dashboard = Self::with_instruments(snapshot.instruments);
        dashboard.time_range = snapshot.time_range;
        dashboard.category_filter = snapshot.category_filter;
        dashboard.alerts = snapshot.alerts;
        dashboard.overlays = snapshot.overlays;

        match snapshot.selected_id {
            Some(id) if dashboard.instrument(&id).is_some() => dashboard.selected_id = Some(id),
            Some(id) => warn!(%id, "selected instrument missing from snapshot"),
            None => {}
        }

        dashboard
    }
}
