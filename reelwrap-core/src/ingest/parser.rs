//! Row parsing for the viewing log
//!
//! The header row is resolved once into a [`ColumnMap`]; each data row is then
//! decoded cell by cell. Three outcomes are possible for a bad cell:
//!
//! 1. **Timestamp** that matches no known format: the row is kept with
//!    `timestamp = None` and the caller is told via [`ParsedRow::bad_timestamp`].
//! 2. **Informational number** (`season`, `episode`, stored `hour`) that is not
//!    a whole number in range: the field is set to `None` with a warning.
//! 3. **Anything else** (non-numeric duration, unknown boolean): the whole
//!    load fails with [`Error::MalformedRow`].

use crate::error::{Error, Result};
use crate::types::ViewingRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

/// Formats tried when the config does not override them.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Column positions for every recognized header.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pub timestamp: Option<usize>,
    pub show_name: Option<usize>,
    pub season: Option<usize>,
    pub episode: Option<usize>,
    pub genre: Option<usize>,
    pub duration_minutes: Option<usize>,
    pub completed: Option<usize>,
    pub is_rewatch: Option<usize>,
    pub session_id: Option<usize>,
    pub day_of_week: Option<usize>,
    pub hour: Option<usize>,
}

impl ColumnMap {
    /// Resolve header names (case-insensitive, trimmed). Unknown headers are ignored;
    /// the first occurrence wins when a name repeats.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut map = ColumnMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            let slot = match raw.trim().to_ascii_lowercase().as_str() {
                "timestamp" | "date" => &mut map.timestamp,
                "show_name" => &mut map.show_name,
                "season" => &mut map.season,
                "episode" => &mut map.episode,
                "genre" => &mut map.genre,
                "duration_minutes" => &mut map.duration_minutes,
                "completed" => &mut map.completed,
                "is_rewatch" => &mut map.is_rewatch,
                "session_id" => &mut map.session_id,
                "day_of_week" => &mut map.day_of_week,
                "hour" => &mut map.hour,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    /// Whether the log carries any timestamp column.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// A decoded row plus what went wrong softly.
#[derive(Debug)]
pub struct ParsedRow {
    pub record: ViewingRecord,
    /// Raw timestamp text that could not be parsed
    pub bad_timestamp: Option<String>,
}

/// Decodes data rows against a [`ColumnMap`].
pub struct RowParser<'a> {
    columns: &'a ColumnMap,
    headers: &'a StringRecord,
    formats: &'a [String],
}

impl<'a> RowParser<'a> {
    pub fn new(columns: &'a ColumnMap, headers: &'a StringRecord, formats: &'a [String]) -> Self {
        Self {
            columns,
            headers,
            formats,
        }
    }

    /// Decode one data row. `line` is the 1-based line in the source file.
    pub fn parse(&self, row: &StringRecord, line: u64) -> Result<ParsedRow> {
        let cols = self.columns;
        let mut bad_timestamp = None;

        let timestamp = match self.cell(row, cols.timestamp) {
            Some(raw) => {
                let parsed = parse_timestamp(raw, self.formats);
                if parsed.is_none() {
                    bad_timestamp = Some(raw.to_string());
                }
                parsed
            }
            None => None,
        };

        let duration_minutes = match self.cell(row, cols.duration_minutes) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
                _ => return Err(self.malformed(line, cols.duration_minutes, raw)),
            },
            None => None,
        };

        let hour = match self.cell(row, cols.hour) {
            Some(raw) => {
                let hour = parse_whole::<u8>(raw).filter(|&h| h < 24);
                if hour.is_none() {
                    self.warn_dropped(line, cols.hour);
                }
                hour
            }
            None => None,
        };

        let record = ViewingRecord {
            timestamp,
            show_name: self.cell(row, cols.show_name).map(str::to_string),
            season: self.informational_cell(row, cols.season, line),
            episode: self.informational_cell(row, cols.episode, line),
            genre: self.cell(row, cols.genre).map(str::to_string),
            duration_minutes,
            completed: self.bool_cell(row, cols.completed, line)?,
            is_rewatch: self.bool_cell(row, cols.is_rewatch, line)?,
            session_id: self.cell(row, cols.session_id).map(str::to_string),
            day_of_week: self.cell(row, cols.day_of_week).map(str::to_string),
            hour,
        };

        Ok(ParsedRow {
            record,
            bad_timestamp,
        })
    }

    /// Non-empty trimmed cell for a column, if the column exists.
    fn cell<'r>(&self, row: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
        idx.and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn bool_cell(&self, row: &StringRecord, idx: Option<usize>, line: u64) -> Result<Option<bool>> {
        match self.cell(row, idx) {
            Some(raw) => parse_bool(raw)
                .map(Some)
                .ok_or_else(|| self.malformed(line, idx, raw)),
            None => Ok(None),
        }
    }

    /// Whole-number cell that feeds no statistic; unreadable values become `None`.
    fn informational_cell<T: TryFrom<u64>>(
        &self,
        row: &StringRecord,
        idx: Option<usize>,
        line: u64,
    ) -> Option<T> {
        let raw = self.cell(row, idx)?;
        let value = parse_whole::<T>(raw);
        if value.is_none() {
            self.warn_dropped(line, idx);
        }
        value
    }

    fn warn_dropped(&self, line: u64, idx: Option<usize>) {
        tracing::warn!(
            line,
            column = self.column_name(idx),
            "Unreadable informational value, keeping row without it"
        );
    }

    fn column_name(&self, idx: Option<usize>) -> &str {
        idx.and_then(|i| self.headers.get(i))
            .unwrap_or("?")
            .trim()
    }

    fn malformed(&self, line: u64, idx: Option<usize>, value: &str) -> Error {
        Error::MalformedRow {
            line,
            column: self.column_name(idx).to_string(),
            value: value.to_string(),
        }
    }
}

/// Parse a timestamp against `formats`, then RFC 3339, then a bare date.
///
/// Each format may describe a full date-time or just a date. RFC 3339
/// offsets are dropped; the wall-clock time is kept.
pub fn parse_timestamp(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in formats {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
        // Date-only formats land at midnight
        if let Some(ts) = NaiveDate::parse_from_str(raw, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Lenient boolean: true/false, 1/0, yes/no, t/f, y/n.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "f" | "n" => Some(false),
        _ => None,
    }
}

/// Whole number, also accepting a float spelling with no fraction ("3.0").
fn parse_whole<T: TryFrom<u64>>(raw: &str) -> Option<T> {
    if let Ok(v) = raw.parse::<u64>() {
        return T::try_from(v).ok();
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        T::try_from(f as u64).ok()
    } else {
        None
    }
}
