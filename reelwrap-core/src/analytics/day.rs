//! Single-day lookup ("what did I watch on March 15th?").

use crate::error::{Error, Result};
use crate::types::{mode, validate_records, ViewingRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// What was watched on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub has_viewing: bool,
    pub most_watched_show: Option<String>,
    pub episodes_watched: usize,
    /// Whole minutes, truncated
    pub total_minutes: u64,
    /// Show of every record that day, in log order
    pub shows: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Parse a `YYYY-MM-DD` query date.
pub fn parse_query_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Report on the records whose timestamp falls on `date`.
///
/// A day with no viewing is a normal result with `has_viewing == false`.
pub fn viewing_on(records: &[ViewingRecord], date: NaiveDate) -> Result<DayReport> {
    validate_records(records)?;

    let day: Vec<&ViewingRecord> = records
        .iter()
        .filter(|r| r.date() == Some(date))
        .collect();

    if day.is_empty() {
        tracing::debug!(%date, "No viewing on requested date");
        return Ok(DayReport {
            date,
            has_viewing: false,
            most_watched_show: None,
            episodes_watched: 0,
            total_minutes: 0,
            shows: Vec::new(),
            message: Some(format!("No viewing activity on {}", date.format("%Y-%m-%d"))),
        });
    }

    let shows: Vec<String> = day
        .iter()
        .filter_map(|r| r.show_name.clone())
        .collect();
    let total_minutes: f64 = day.iter().map(|r| r.minutes()).sum();

    Ok(DayReport {
        date,
        has_viewing: true,
        most_watched_show: mode(shows.iter().map(String::as_str)),
        episodes_watched: day.len(),
        total_minutes: total_minutes as u64,
        shows,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(ts: &str, show: &str, minutes: f64) -> ViewingRecord {
        ViewingRecord {
            timestamp: Some(NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()),
            show_name: Some(show.to_string()),
            duration_minutes: Some(minutes),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_query_date(s).unwrap()
    }

    #[test]
    fn test_day_with_viewing() {
        let records = vec![
            record("2024-01-05 20:00:00", "Show A", 30.0),
            record("2024-01-05 20:30:00", "Show B", 20.5),
            record("2024-01-05 21:00:00", "Show A", 30.0),
            record("2024-01-06 21:00:00", "Show C", 30.0),
        ];
        let report = viewing_on(&records, date("2024-01-05")).unwrap();
        assert!(report.has_viewing);
        assert_eq!(report.most_watched_show.as_deref(), Some("Show A"));
        assert_eq!(report.episodes_watched, 3);
        assert_eq!(report.total_minutes, 80);
        assert_eq!(report.shows, vec!["Show A", "Show B", "Show A"]);
        assert!(report.message.is_none());
    }

    #[test]
    fn test_day_without_viewing() {
        let records = vec![record("2024-01-05 20:00:00", "Show A", 30.0)];
        let report = viewing_on(&records, date("2024-02-01")).unwrap();
        assert!(!report.has_viewing);
        assert_eq!(report.episodes_watched, 0);
        assert!(report.most_watched_show.is_none());
        assert_eq!(
            report.message.as_deref(),
            Some("No viewing activity on 2024-02-01")
        );
    }

    #[test]
    fn test_untimed_records_never_match() {
        let records = vec![ViewingRecord {
            show_name: Some("Dark".to_string()),
            ..Default::default()
        }];
        let report = viewing_on(&records, date("2024-01-05")).unwrap();
        assert!(!report.has_viewing);
    }

    #[test]
    fn test_parse_query_date() {
        assert!(parse_query_date(" 2024-12-31 ").is_ok());
        assert!(matches!(
            parse_query_date("12/31/2024"),
            Err(Error::InvalidDate(_))
        ));
    }
}
