//! Ingestion layer for the viewing log
//!
//! Reads a delimited table with a header row into [`ViewingRecord`]s and
//! computes the light summary metadata the calling layer shows before any
//! analytics run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reelwrap_core::ingest::{load_viewing_history, LoaderOptions};
//!
//! let history = load_viewing_history("history.csv", &LoaderOptions::default())?;
//! println!(
//!     "{} rows, {} hours",
//!     history.summary.total_rows, history.summary.total_hours
//! );
//! # Ok::<(), reelwrap_core::Error>(())
//! ```
//!
//! Every column is optional. Rows whose timestamp cannot be parsed are kept
//! with `timestamp = None` and counted in [`HistorySummary::unparsed_timestamps`].

mod parser;

pub use parser::{parse_bool, parse_timestamp, ColumnMap, DEFAULT_TIMESTAMP_FORMATS};

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::types::{rank_by_count, round_to, CountEntry, ViewingRecord};
use chrono::NaiveDateTime;
use parser::RowParser;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Shows kept in the by-duration breakdown.
const TOP_SHOWS_BY_DURATION: usize = 20;
/// Shows kept in the by-count breakdown.
const TOP_SHOWS_BY_COUNT: usize = 10;

/// Options controlling how the table is read.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub delimiter: u8,
    pub sample_size: usize,
    pub timestamp_formats: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            sample_size: 10,
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LoaderOptions {
    /// Build options from the `[loader]` config section.
    ///
    /// Non-ASCII delimiters are rejected by `Config::validate`; here they fall back to `,`.
    pub fn from_config(config: &LoaderConfig) -> Self {
        let defaults = Self::default();
        let delimiter = if config.delimiter.is_ascii() {
            config.delimiter as u8
        } else {
            defaults.delimiter
        };
        Self {
            delimiter,
            sample_size: config.sample_size,
            timestamp_formats: config
                .timestamp_formats
                .clone()
                .unwrap_or(defaults.timestamp_formats),
        }
    }
}

/// Parsed records plus their summary.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedHistory {
    pub records: Vec<ViewingRecord>,
    pub summary: HistorySummary,
}

/// Light metadata about the loaded table.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySummary {
    pub total_rows: usize,
    /// Header names as they appear in the file
    pub columns: Vec<String>,
    pub date_range: DateRange,
    pub total_hours: f64,
    pub unique_shows: usize,
    /// Rows kept without a timestamp because theirs did not parse
    pub unparsed_timestamps: usize,
    /// First few records, for inspection only
    pub sample: Vec<ViewingRecord>,
    pub breakdowns: Breakdowns,
}

/// Earliest and latest timestamp seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Minutes watched, grouped several ways.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Breakdowns {
    /// Total minutes per genre, keyed alphabetically
    pub by_genre: BTreeMap<String, f64>,
    /// Top shows by total minutes
    pub by_show_duration: Vec<DurationEntry>,
    /// Top shows by number of records
    pub top_shows_by_count: Vec<CountEntry>,
    /// Total minutes per `YYYY-MM`
    pub by_month: BTreeMap<String, f64>,
}

/// A named total of minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationEntry {
    pub name: String,
    pub minutes: f64,
}

/// Load a viewing log from disk.
pub fn load_viewing_history(path: impl AsRef<Path>, options: &LoaderOptions) -> Result<LoadedHistory> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Opening viewing history");
    let file = std::fs::File::open(path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to open viewing history");
        e
    })?;
    let history = load_from_reader(file, options)?;
    tracing::info!(
        path = %path.display(),
        rows = history.summary.total_rows,
        unparsed_timestamps = history.summary.unparsed_timestamps,
        "Loaded viewing history"
    );
    Ok(history)
}

/// Load a viewing log from any reader (file, in-memory buffer).
pub fn load_from_reader<R: Read>(reader: R, options: &LoaderOptions) -> Result<LoadedHistory> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);
    if !columns.has_timestamp() {
        tracing::debug!("No timestamp column; time-based statistics will be empty");
    }
    let parser = RowParser::new(&columns, &headers, &options.timestamp_formats);

    let mut records = Vec::new();
    let mut unparsed_timestamps = 0usize;
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let parsed = parser.parse(&row, line)?;
        if let Some(raw) = parsed.bad_timestamp {
            tracing::warn!(line, value = %raw, "Unparsable timestamp, keeping row without it");
            unparsed_timestamps += 1;
        }
        records.push(parsed.record);
    }

    let summary = summarize(
        &records,
        headers.iter().map(|h| h.trim().to_string()).collect(),
        unparsed_timestamps,
        options.sample_size,
    );

    Ok(LoadedHistory { records, summary })
}

/// Compute summary metadata for a record set.
pub fn summarize(
    records: &[ViewingRecord],
    columns: Vec<String>,
    unparsed_timestamps: usize,
    sample_size: usize,
) -> HistorySummary {
    let mut date_range = DateRange::default();
    let mut total_minutes = 0.0;
    let mut shows = HashSet::new();
    let mut by_genre: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    // show -> (minutes, first seen position)
    let mut show_minutes: HashMap<&str, (f64, usize)> = HashMap::new();

    for (pos, record) in records.iter().enumerate() {
        let minutes = record.minutes();
        total_minutes += minutes;

        if let Some(ts) = record.timestamp {
            date_range.start = Some(date_range.start.map_or(ts, |s| s.min(ts)));
            date_range.end = Some(date_range.end.map_or(ts, |e| e.max(ts)));
            *by_month.entry(ts.format("%Y-%m").to_string()).or_default() += minutes;
        }
        if let Some(genre) = &record.genre {
            *by_genre.entry(genre.clone()).or_default() += minutes;
        }
        if let Some(show) = &record.show_name {
            shows.insert(show.as_str());
            show_minutes.entry(show.as_str()).or_insert((0.0, pos)).0 += minutes;
        }
    }

    let mut by_show_duration: Vec<(&str, f64, usize)> = show_minutes
        .into_iter()
        .map(|(name, (minutes, first))| (name, minutes, first))
        .collect();
    by_show_duration.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });

    let breakdowns = Breakdowns {
        by_genre,
        by_show_duration: by_show_duration
            .into_iter()
            .take(TOP_SHOWS_BY_DURATION)
            .map(|(name, minutes, _)| DurationEntry {
                name: name.to_string(),
                minutes,
            })
            .collect(),
        top_shows_by_count: rank_by_count(
            records.iter().filter_map(|r| r.show_name.as_deref()),
            TOP_SHOWS_BY_COUNT,
        ),
        by_month,
    };

    HistorySummary {
        total_rows: records.len(),
        columns,
        date_range,
        total_hours: round_to(total_minutes / 60.0, 2),
        unique_shows: shows.len(),
        unparsed_timestamps,
        sample: records.iter().take(sample_size).cloned().collect(),
        breakdowns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;

    const LOG: &str = "\
date,show_name,season,episode,genre,duration_minutes,completed,is_rewatch,session_id
2024-01-05 20:00:00,Show A,1,1,Comedy,30,true,false,s1
2024-01-05 20:30:00,Show A,1,2,Comedy,30,true,false,s1
2024-06-10 22:15:00,Show B,2,4,Thriller,45,false,true,s2
";

    #[test]
    fn test_load_from_reader() {
        let history = load_from_reader(LOG.as_bytes(), &LoaderOptions::default()).unwrap();
        let summary = &history.summary;

        assert_eq!(history.records.len(), 3);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.total_hours, 1.75);
        assert_eq!(summary.unique_shows, 2);
        assert_eq!(summary.unparsed_timestamps, 0);
        assert_eq!(summary.columns.len(), 9);
        assert_eq!(
            summary.date_range.start.map(|d| d.to_string()).as_deref(),
            Some("2024-01-05 20:00:00")
        );
        assert_eq!(
            summary.date_range.end.map(|d| d.to_string()).as_deref(),
            Some("2024-06-10 22:15:00")
        );
    }

    #[test]
    fn test_breakdowns() {
        let history = load_from_reader(LOG.as_bytes(), &LoaderOptions::default()).unwrap();
        let b = &history.summary.breakdowns;

        assert_eq!(b.by_genre.get("Comedy"), Some(&60.0));
        assert_eq!(b.by_genre.get("Thriller"), Some(&45.0));
        assert_eq!(b.by_month.get("2024-01"), Some(&60.0));
        assert_eq!(b.by_month.get("2024-06"), Some(&45.0));
        assert_eq!(b.by_show_duration[0].name, "Show A");
        assert_eq!(b.by_show_duration[0].minutes, 60.0);
        assert_eq!(b.top_shows_by_count[0].name, "Show A");
        assert_eq!(b.top_shows_by_count[0].count, 2);
    }

    #[test]
    fn test_sample_is_truncated() {
        let options = LoaderOptions {
            sample_size: 2,
            ..Default::default()
        };
        let history = load_from_reader(LOG.as_bytes(), &options).unwrap();
        assert_eq!(history.summary.sample.len(), 2);
        assert_eq!(history.summary.sample[0], history.records[0]);
    }

    #[test]
    fn test_missing_columns_degrade() {
        let log = "show_name,genre\nDark,Thriller\nDark,Thriller\n";
        let history = load_from_reader(log.as_bytes(), &LoaderOptions::default()).unwrap();
        let summary = &history.summary;

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.total_hours, 0.0);
        assert_eq!(summary.date_range, DateRange::default());
        assert!(summary.breakdowns.by_month.is_empty());
        assert_eq!(summary.unique_shows, 1);
    }

    #[test]
    fn test_options_from_config() {
        let config = LoaderConfig {
            delimiter: ';',
            sample_size: 4,
            timestamp_formats: Some(vec!["%d/%m/%Y".to_string()]),
        };
        let options = LoaderOptions::from_config(&config);
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.sample_size, 4);
        assert_eq!(options.timestamp_formats, vec!["%d/%m/%Y".to_string()]);

        let options = LoaderOptions::from_config(&LoaderConfig::default());
        assert_eq!(options.timestamp_formats.len(), DEFAULT_TIMESTAMP_FORMATS.len());
    }

    #[test]
    fn test_configured_date_only_format() {
        let config = LoaderConfig {
            timestamp_formats: Some(vec!["%d/%m/%Y".to_string()]),
            ..LoaderConfig::default()
        };
        let log = "date,show_name\n15/03/2024,Dark\n";
        let history = load_from_reader(log.as_bytes(), &LoaderOptions::from_config(&config)).unwrap();
        assert_eq!(history.summary.unparsed_timestamps, 0);
        assert_eq!(
            history.records[0].date(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_unreadable_season_keeps_row() {
        let log = "\
date,show_name,season,episode,duration_minutes
2024-12-25 20:00:00,Doctor Who,Special,1,60
2024-12-26 20:00:00,Doctor Who,14,2,45
";
        let history = load_from_reader(log.as_bytes(), &LoaderOptions::default()).unwrap();
        assert_eq!(history.records.len(), 2);
        assert!(history.records[0].season.is_none());
        assert_eq!(history.records[0].episode, Some(1));
        assert_eq!(history.records[1].season, Some(14));
        assert_eq!(history.summary.total_hours, 1.75);
    }

    #[test]
    fn test_unequal_row_is_csv_error() {
        let log = "show_name,genre\nDark,Thriller,extra\n";
        let err = load_from_reader(log.as_bytes(), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, crate::Error::Csv(_)));
    }
}
