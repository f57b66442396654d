use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;

// Field-level parsing for the feed's text format.
pub mod feed_format {
    use chrono::{NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    // Parses a finite price; empty text, NaN and infinities are rejected.
    pub fn parse_price(s: &str) -> Option<f64> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        f64::from_str(s).ok().filter(|v| v.is_finite())
    }

    // Parses "DD-MM-YYYY HH:MM" (seconds optional) into a naive instant.
    // Day, month, hour and minute may be written without zero padding,
    // so "1-7-2025 9:05" and "01-07-2025 09:05" are the same instant.
    pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
        let mut halves = s.trim().split(' ');
        let (date, time) = (halves.next()?, halves.next()?);
        if halves.next().is_some() {
            return None;
        }

        let date_fields: Vec<&str> = date.split('-').collect();
        let [day, month, year] = date_fields.as_slice() else {
            return None;
        };
        if year.len() != 4 || day.len() > 2 || month.len() > 2 {
            return None;
        }

        let time_fields: Vec<&str> = time.split(':').collect();
        let (hour, minute, second) = match time_fields.as_slice() {
            [h, m] => (*h, *m, "0"),
            [h, m, s] => (*h, *m, *s),
            _ => return None,
        };
        if [hour, minute, second].iter().any(|f| f.len() > 2) {
            return None;
        }

        NaiveDate::from_ymd_opt(number(year)?, number(month)?, number(day)?)?
            .and_hms_opt(number(hour)?, number(minute)?, number(second)?)
    }

    fn number<T: FromStr>(s: &str) -> Option<T> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }

}

const REQUIRED_COLUMNS: [&str; 5] = ["datetime", "open", "high", "low", "close"];
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

// Picks the candidate that occurs most often in the first non-blank line.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    DELIMITER_CANDIDATES
        .iter()
        .copied()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(d, _)| d)
}

// Positions of the required columns, in REQUIRED_COLUMNS order.
struct ColumnMap([Option<usize>; 5]);

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        ColumnMap(REQUIRED_COLUMNS.map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name))))
    }

    fn missing(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS.iter().zip(self.0.iter()).filter(|(_, pos)| pos.is_none()).map(|(name, _)| *name).collect()
    }

    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> Option<&'r str> {
        self.0[column].and_then(|pos| record.get(pos)).filter(|f| !f.is_empty())
    }
}

/// Parses feed text into candles, keeping source row order.
///
/// Rows with a missing or non-numeric price, or a malformed timestamp, are
/// dropped without error. Only a feed whose rows do not line up with its
/// header fails as a whole.
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    delimiter: Option<u8>,
}

impl FeedParser {
    pub fn new(delimiter: Option<char>) -> Self {
        // Settings validation only lets ASCII delimiters through.
        Self { delimiter: delimiter.and_then(|d| u8::try_from(d).ok()) }
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Candle>, EngineError> {
        let delimiter = self.delimiter.unwrap_or_else(|| detect_delimiter(text));
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let columns = ColumnMap::from_headers(rdr.headers()?);
        let missing = columns.missing();
        if !missing.is_empty() && !rdr.headers()?.is_empty() {
            tracing::warn!(?missing, "Feed header lacks required columns; every row will be rejected");
        }

        let mut candles = Vec::new();
        let mut rows = 0usize;
        for result in rdr.records() {
            let record = result?;
            rows += 1;
            if let Some(candle) = Self::validate_row(&record, &columns) {
                candles.push(candle);
            }
        }

        tracing::debug!(rows, accepted = candles.len(), rejected = rows - candles.len(), "Parsed feed");
        Ok(candles)
    }

    fn validate_row(record: &StringRecord, columns: &ColumnMap) -> Option<Candle> {
        let datetime = columns.field(record, 0)?;
        let open = feed_format::parse_price(columns.field(record, 1)?)?;
        let high = feed_format::parse_price(columns.field(record, 2)?)?;
        let low = feed_format::parse_price(columns.field(record, 3)?)?;
        let close = feed_format::parse_price(columns.field(record, 4)?)?;
        let timestamp = feed_format::parse_datetime(datetime)?;
        Some(Candle { timestamp, open, high, low, close })
    }
}
