//! Dated news events and their rendering as chart markers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{BarDate, Ohlcv};

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Economic,
    Commodity,
    Regulatory,
    Market,
    General,
}

impl NewsCategory {
    #[must_use]
    pub fn marker_shape(self) -> MarkerShape {
        match self {
            Self::Economic | Self::General => MarkerShape::Circle,
            Self::Commodity => MarkerShape::Square,
            Self::Regulatory => MarkerShape::ArrowUp,
            Self::Market => MarkerShape::ArrowDown,
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Marker colour as a CSS hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "#f45171",
            Self::Medium => "#ff9800",
            Self::Low => "#3ecf8e",
        }
    }

    #[must_use]
    pub fn marker_size(self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium | Self::Low => 1,
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

/// A market-moving event pinned to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEvent {
    pub id: String,
    pub time: BarDate,
    pub title: String,
    pub description: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub category: NewsCategory,
    pub impact: Impact,
    /// Ids of the instruments this event concerns.
    #[serde(default)]
    pub related_instruments: Vec<String>,
}

impl NewsEvent {
    #[must_use]
    pub fn relates_to(&self, instrument_id: &str) -> bool {
        self.related_instruments.iter().any(|id| id == instrument_id)
    }

    /// `needle` must already be lowercase.
    fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .source
                .as_deref()
                .is_some_and(|source| source.to_lowercase().contains(needle))
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    BelowBar,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    Circle,
    Square,
    ArrowUp,
    ArrowDown,
}

/// Chart annotation for one [`NewsEvent`], serialised in the shape chart
/// libraries expect (`belowBar`, `arrowUp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartMarker {
    pub time: BarDate,
    pub position: MarkerPosition,
    pub color: &'static str,
    pub shape: MarkerShape,
    pub id: String,
    pub size: u8,
}

impl From<&NewsEvent> for ChartMarker {
    fn from(event: &NewsEvent) -> Self {
        Self {
            time: event.time,
            position: MarkerPosition::BelowBar,
            color: event.impact.color(),
            shape: event.category.marker_shape(),
            id: event.id.clone(),
            size: event.impact.marker_size(),
        }
    }
}

/// In-memory collection of news events, kept in insertion order.
///
/// # Example
///
/// ```
/// use econ_ta::{Impact, NewsCategory, NewsEvent, NewsFeed};
/// use chrono::NaiveDate;
///
/// let feed = NewsFeed::new(vec![NewsEvent {
///     id: "ocr-hike".into(),
///     time: NaiveDate::from_ymd_opt(2023, 5, 24).unwrap(),
///     title: "RBNZ lifts OCR to 5.5%".into(),
///     description: "Final hike of the cycle".into(),
///     source: Some("RBNZ".into()),
///     url: None,
///     category: NewsCategory::Economic,
///     impact: Impact::High,
///     related_instruments: vec!["ocr".into()],
/// }]);
///
/// assert_eq!(feed.search("rbnz").len(), 1);
/// assert_eq!(feed.markers_for_instrument("ocr")[0].size, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsFeed {
    events: Vec<NewsEvent>,
}

impl NewsFeed {
    #[must_use]
    pub fn new(events: Vec<NewsEvent>) -> Self {
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &[NewsEvent] {
        &self.events
    }

    pub fn push(&mut self, event: NewsEvent) {
        self.events.push(event);
    }

    /// Events dated within `start..=end`.
    #[must_use]
    pub fn in_range(&self, start: BarDate, end: BarDate) -> Vec<&NewsEvent> {
        self.events
            .iter()
            .filter(|e| (start..=end).contains(&e.time))
            .collect()
    }

    #[must_use]
    pub fn for_instrument(&self, instrument_id: &str) -> Vec<&NewsEvent> {
        self.events
            .iter()
            .filter(|e| e.relates_to(instrument_id))
            .collect()
    }

    #[must_use]
    pub fn by_impact(&self, impact: Impact) -> Vec<&NewsEvent> {
        self.events.iter().filter(|e| e.impact == impact).collect()
    }

    /// The first `limit` high-impact events.
    #[must_use]
    pub fn high_impact(&self, limit: usize) -> Vec<&NewsEvent> {
        self.events
            .iter()
            .filter(|e| e.impact == Impact::High)
            .take(limit)
            .collect()
    }

    /// Case-insensitive substring match over title, description and source.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&NewsEvent> {
        let needle = keyword.to_lowercase();
        self.events.iter().filter(|e| e.mentions(&needle)).collect()
    }

    /// One-line summary of a day: the title of its only event, or a count.
    #[must_use]
    pub fn summary_for_date(&self, date: BarDate) -> Option<String> {
        let mut on_day = self.events.iter().filter(|e| e.time == date);
        let first = on_day.next()?;

        match on_day.count() {
            0 => Some(first.title.clone()),
            more => Some(format!("{} news events", more + 1)),
        }
    }

    /// Markers for `events`, sorted by date. Events on the same day keep
    /// their input order.
    #[must_use]
    pub fn markers<'a>(events: impl IntoIterator<Item = &'a NewsEvent>) -> Vec<ChartMarker> {
        let mut markers: Vec<ChartMarker> = events.into_iter().map(ChartMarker::from).collect();
        markers.sort_by_key(|m| m.time);
        markers
    }

    #[must_use]
    pub fn markers_for_instrument(&self, instrument_id: &str) -> Vec<ChartMarker> {
        Self::markers(self.for_instrument(instrument_id))
    }

    /// Markers for events related to `instrument_id` that fall inside the
    /// date span of `bars`. Empty for an empty series.
    #[must_use]
    pub fn markers_for_series<B: Ohlcv>(&self, bars: &[B], instrument_id: &str) -> Vec<ChartMarker> {
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return Vec::new();
        };

        Self::markers(
            self.in_range(first.time(), last.time())
                .into_iter()
                .filter(|e| e.relates_to(instrument_id)),
        )
    }
}

impl FromIterator<NewsEvent> for NewsFeed {
    fn from_iter<I: IntoIterator<Item = NewsEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
