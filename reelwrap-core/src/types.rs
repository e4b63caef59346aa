//! Core domain types for reelwrap
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Viewing record** | One logged episode-watch event (one row of the log) |
//! | **Session** | Records sharing a `session_id`: one sitting of viewing |
//! | **Quarter** | One of four fixed 3-month calendar buckets |
//!
//! Every column of the log is optional. A record without a `timestamp` is
//! still counted toward show, genre and duration totals but never toward
//! anything bucketed by time (hour, weekday, month, quarter, date).

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::collections::HashMap;

// ============================================
// Viewing Record
// ============================================

/// One row of the viewing log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewingRecord {
    /// When the episode was watched (naive wall-clock time)
    pub timestamp: Option<NaiveDateTime>,
    pub show_name: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub genre: Option<String>,
    /// Minutes watched; finite and non-negative
    pub duration_minutes: Option<f64>,
    pub completed: Option<bool>,
    pub is_rewatch: Option<bool>,
    /// Opaque grouping key for a sitting
    pub session_id: Option<String>,
    /// Stored `day_of_week` column, kept verbatim; analytics use [`Self::weekday`]
    pub day_of_week: Option<String>,
    /// Stored `hour` column, kept verbatim; analytics use [`Self::viewing_hour`]
    pub hour: Option<u8>,
}

impl ViewingRecord {
    /// Hour of day (0-23) derived from the timestamp.
    pub fn viewing_hour(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.hour())
    }

    /// Day of week derived from the timestamp.
    pub fn weekday(&self) -> Option<Weekday> {
        self.timestamp.map(|ts| ts.weekday())
    }

    /// Calendar date derived from the timestamp.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Calendar quarter derived from the timestamp.
    pub fn quarter(&self) -> Option<Quarter> {
        self.timestamp.and_then(|ts| Quarter::from_month(ts.month()))
    }

    /// Minutes watched, zero when unknown.
    pub fn minutes(&self) -> f64 {
        self.duration_minutes.unwrap_or(0.0)
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    pub fn rewatched(&self) -> bool {
        self.is_rewatch.unwrap_or(false)
    }
}

/// Full English weekday name ("Monday", ...).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Check the invariants the loader guarantees, for hand-built record sets.
pub fn validate_records(records: &[ViewingRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if let Some(minutes) = record.duration_minutes {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(Error::InvalidRecord {
                    index,
                    message: format!("duration_minutes must be finite and >= 0, got {}", minutes),
                });
            }
        }
        if let Some(hour) = record.hour {
            if hour > 23 {
                return Err(Error::InvalidRecord {
                    index,
                    message: format!("hour must be 0-23, got {}", hour),
                });
            }
        }
    }
    Ok(())
}

// ============================================
// Quarter
// ============================================

/// Calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Quarter {
    /// January - March
    Q1,
    /// April - June
    Q2,
    /// July - September
    Q3,
    /// October - December
    Q4,
}

impl Quarter {
    /// Map a month (1-12) to its quarter.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }

    /// Quarter number (1-4).
    pub fn number(&self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    /// Display label, e.g. "Q1 (Jan-Mar)".
    pub fn label(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1 (Jan-Mar)",
            Quarter::Q2 => "Q2 (Apr-Jun)",
            Quarter::Q3 => "Q3 (Jul-Sep)",
            Quarter::Q4 => "Q4 (Oct-Dec)",
        }
    }
}

// ============================================
// Rankings
// ============================================

/// A named value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

/// Rank values by occurrence, keeping at most `limit` entries.
///
/// Ordered by count descending; equal counts keep first-encountered order.
pub fn rank_by_count<'a, I>(values: I, limit: usize) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    // name -> (count, first seen position)
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (pos, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(name, (count, first))| (name, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, count, _)| CountEntry {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// Most frequent value; ties go to the first encountered.
pub fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    rank_by_count(values, 1).into_iter().next().map(|e| e.name)
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> ViewingRecord {
        ViewingRecord {
            timestamp: Some(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_time_fields() {
        let record = at("2024-06-15 21:30:00");
        assert_eq!(record.viewing_hour(), Some(21));
        assert_eq!(record.weekday(), Some(Weekday::Sat));
        assert_eq!(record.quarter(), Some(Quarter::Q2));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 6, 15));

        let untimed = ViewingRecord::default();
        assert_eq!(untimed.viewing_hour(), None);
        assert_eq!(untimed.quarter(), None);
        assert_eq!(untimed.minutes(), 0.0);
        assert!(!untimed.is_completed());
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(Quarter::from_month(3), Some(Quarter::Q1));
        assert_eq!(Quarter::from_month(4), Some(Quarter::Q2));
        assert_eq!(Quarter::from_month(9), Some(Quarter::Q3));
        assert_eq!(Quarter::from_month(10), Some(Quarter::Q4));
        assert_eq!(Quarter::from_month(13), None);
        assert_eq!(Quarter::Q3.label(), "Q3 (Jul-Sep)");
        assert_eq!(Quarter::Q4.number(), 4);
    }

    #[test]
    fn test_rank_by_count_tie_break() {
        let values = ["b", "a", "c", "a", "b", "d"];
        let ranked = rank_by_count(values, 3);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        // b and a both appear twice; b was seen first
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[2].count, 1);
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(["x", "y", "y"]), Some("y".to_string()));
        assert_eq!(mode(["x", "y"]), Some("x".to_string()));
        assert_eq!(mode(std::iter::empty::<&str>()), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.756, 2), 1.76);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
    }
}
