use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// One validated OHLC price summary. The timestamp has no timezone attached;
/// it is read as local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Milliseconds on the naive time axis, used as the chart x coordinate.
    pub fn time_ms(&self) -> i64 {
        self.timestamp.and_utc().timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown granularity '{0}'")]
pub struct UnknownGranularity(pub String);

/// Sampling width of the candles in a feed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Granularity {
    #[serde(rename = "1s")]
    Second1,
    #[default]
    #[serde(rename = "1m")]
    Minute1,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Second1, Granularity::Minute1];

    pub fn key(&self) -> &'static str {
        match self {
            Granularity::Second1 => "1s",
            Granularity::Minute1 => "1m",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Second1 => "1 Second",
            Granularity::Minute1 => "1 Minute",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.key() == s.trim())
            .ok_or_else(|| UnknownGranularity(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

static NEXT_SERIES_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(u64);

/// Candles loaded for one granularity, in feed order.
///
/// A series is never patched in place. Every load produces a new one with a
/// fresh [`SeriesId`], so identity tells a reload apart from the previous
/// data even when the values are equal.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    id: SeriesId,
    granularity: Granularity,
    candles: Arc<[Candle]>,
}

impl CandleSeries {
    pub fn new(granularity: Granularity, candles: Vec<Candle>) -> Self {
        Self {
            id: SeriesId(NEXT_SERIES_ID.fetch_add(1, Ordering::Relaxed)),
            granularity,
            candles: candles.into(),
        }
    }

    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// First and last timestamps in milliseconds.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        Some((self.first()?.time_ms(), self.last()?.time_ms()))
    }

    /// Lowest low and highest high over `range` (clamped to the series).
    pub fn price_range(&self, range: Range<usize>) -> Option<(f64, f64)> {
        let end = range.end.min(self.candles.len());
        let start = range.start.min(end);
        self.candles[start..end].iter().fold(None, |acc, c| match acc {
            None => Some((c.low, c.high)),
            Some((lo, hi)) => Some((lo.min(c.low), hi.max(c.high))),
        })
    }
}

impl PartialEq for CandleSeries {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CandleSeries {}
