//! Stats engine
//!
//! Turns the record sequence into the fixed [`StatsBundle`] that feeds the
//! personality classifier and the external presentation layer.

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::types::{
    rank_by_count, round_to, validate_records, weekday_name, CountEntry, ViewingRecord,
};
use serde::Serialize;
use std::collections::HashSet;

/// Ranking sizes for the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    pub top_genres: usize,
    pub top_shows: usize,
    pub top_days: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            top_genres: 5,
            top_shows: 5,
            top_days: 3,
        }
    }
}

impl From<&AnalyticsConfig> for StatsOptions {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            top_genres: config.top_genres,
            top_shows: config.top_shows,
            top_days: config.top_days,
        }
    }
}

/// Aggregate viewing statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsBundle {
    pub total_views: usize,
    pub total_hours: f64,
    pub top_genres: Vec<CountEntry>,
    pub top_shows: Vec<CountEntry>,
    /// Weekday names ("Saturday") by number of records
    pub top_viewing_days: Vec<CountEntry>,
    /// Mean hour of day, truncated; 0 without timestamps
    pub avg_viewing_hour: u32,
    /// Fraction of records marked completed, in [0, 1]
    pub completion_rate: f64,
    /// Records per distinct session id; 0 without session ids
    pub avg_episodes_per_session: f64,
    pub rewatch_count: usize,
    pub unique_shows: usize,
}

impl StatsBundle {
    /// Occurrences of a weekday among the top viewing days (0 if not ranked).
    pub fn day_count(&self, day: &str) -> usize {
        self.top_viewing_days
            .iter()
            .find(|e| e.name == day)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Number of genres in the top-genre ranking.
    pub fn genre_diversity(&self) -> usize {
        self.top_genres.len()
    }
}

/// Compute the stats bundle.
///
/// Fails only when a record breaks the record invariants (negative or
/// non-finite duration, stored hour above 23).
pub fn calculate_stats(records: &[ViewingRecord], options: &StatsOptions) -> Result<StatsBundle> {
    validate_records(records)?;

    let total_views = records.len();
    let total_minutes: f64 = records.iter().map(ViewingRecord::minutes).sum();

    let hours: Vec<u32> = records.iter().filter_map(ViewingRecord::viewing_hour).collect();
    let avg_viewing_hour = if hours.is_empty() {
        0
    } else {
        let sum: u64 = hours.iter().map(|&h| u64::from(h)).sum();
        (sum / hours.len() as u64) as u32
    };

    let completed = records.iter().filter(|r| r.is_completed()).count();
    let completion_rate = if total_views == 0 {
        0.0
    } else {
        round_to(completed as f64 / total_views as f64, 3)
    };

    let sessions: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.session_id.as_deref())
        .collect();
    let avg_episodes_per_session = if sessions.is_empty() {
        0.0
    } else {
        round_to(total_views as f64 / sessions.len() as f64, 2)
    };

    let unique_shows = records
        .iter()
        .filter_map(|r| r.show_name.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let bundle = StatsBundle {
        total_views,
        total_hours: round_to(total_minutes / 60.0, 2),
        top_genres: rank_by_count(
            records.iter().filter_map(|r| r.genre.as_deref()),
            options.top_genres,
        ),
        top_shows: rank_by_count(
            records.iter().filter_map(|r| r.show_name.as_deref()),
            options.top_shows,
        ),
        top_viewing_days: rank_by_count(
            records.iter().filter_map(|r| r.weekday().map(weekday_name)),
            options.top_days,
        ),
        avg_viewing_hour,
        completion_rate,
        avg_episodes_per_session,
        rewatch_count: records.iter().filter(|r| r.rewatched()).count(),
        unique_shows,
    };

    tracing::debug!(
        total_views = bundle.total_views,
        unique_shows = bundle.unique_shows,
        completion_rate = bundle.completion_rate,
        "Calculated viewing stats"
    );

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::NaiveDateTime;

    fn record(ts: &str, show: &str, genre: &str, minutes: f64, completed: bool) -> ViewingRecord {
        ViewingRecord {
            timestamp: Some(NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()),
            show_name: Some(show.to_string()),
            genre: Some(genre.to_string()),
            duration_minutes: Some(minutes),
            completed: Some(completed),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<ViewingRecord> {
        vec![
            record("2024-01-05 20:00:00", "Show A", "Comedy", 30.0, true),
            record("2024-01-05 21:00:00", "Show A", "Comedy", 30.0, true),
            record("2024-06-10 22:00:00", "Show B", "Thriller", 45.0, false),
        ]
    }

    #[test]
    fn test_scenario_totals() {
        let stats = calculate_stats(&scenario(), &StatsOptions::default()).unwrap();
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.total_hours, 1.75);
        assert_eq!(stats.unique_shows, 2);
        assert!((stats.completion_rate - 0.667).abs() < 1e-9);
        assert_eq!(stats.top_genres[0].name, "Comedy");
        assert_eq!(stats.top_genres[0].count, 2);
        assert_eq!(stats.top_shows[0].name, "Show A");
        // (20 + 21 + 22) / 3 = 21
        assert_eq!(stats.avg_viewing_hour, 21);
        // 2024-01-05 is a Friday
        assert_eq!(stats.top_viewing_days[0].name, "Friday");
        assert_eq!(stats.day_count("Friday"), 2);
        assert_eq!(stats.day_count("Sunday"), 0);
    }

    #[test]
    fn test_avg_hour_truncates() {
        let records = vec![
            record("2024-01-01 22:00:00", "A", "X", 10.0, true),
            record("2024-01-01 23:00:00", "A", "X", 10.0, true),
        ];
        let stats = calculate_stats(&records, &StatsOptions::default()).unwrap();
        // 22.5 -> 22
        assert_eq!(stats.avg_viewing_hour, 22);
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let records = vec![
            ViewingRecord {
                show_name: Some("Dark".to_string()),
                ..Default::default()
            };
            4
        ];
        let stats = calculate_stats(&records, &StatsOptions::default()).unwrap();
        assert_eq!(stats.total_views, 4);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.avg_episodes_per_session, 0.0);
        assert_eq!(stats.avg_viewing_hour, 0);
        assert_eq!(stats.rewatch_count, 0);
        assert!(stats.top_genres.is_empty());
        assert!(stats.top_viewing_days.is_empty());
        assert_eq!(stats.unique_shows, 1);
    }

    #[test]
    fn test_episodes_per_session() {
        let mut records = scenario();
        records[0].session_id = Some("s1".to_string());
        records[1].session_id = Some("s1".to_string());
        records[2].session_id = Some("s2".to_string());
        let stats = calculate_stats(&records, &StatsOptions::default()).unwrap();
        assert_eq!(stats.avg_episodes_per_session, 1.5);
    }

    #[test]
    fn test_empty_input() {
        let stats = calculate_stats(&[], &StatsOptions::default()).unwrap();
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.unique_shows, 0);
    }

    #[test]
    fn test_invalid_record_is_error() {
        let mut records = scenario();
        records[1].duration_minutes = Some(f64::NAN);
        match calculate_stats(&records, &StatsOptions::default()) {
            Err(Error::InvalidRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_top_k_respects_limit() {
        let records: Vec<_> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|g| record("2024-01-01 10:00:00", "S", g, 1.0, true))
            .collect();
        let options = StatsOptions {
            top_genres: 5,
            ..Default::default()
        };
        let stats = calculate_stats(&records, &options).unwrap();
        assert_eq!(stats.genre_diversity(), 5);
        assert_eq!(stats.top_genres[0].name, "A");
    }
}
