//! Quarter-by-quarter evolution of viewing taste.

use crate::error::Result;
use crate::types::{mode, validate_records, Quarter, ViewingRecord};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

const UNKNOWN: &str = "Unknown";

/// Dominant genre and show for one quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterReport {
    pub quarter: u8,
    pub label: &'static str,
    pub top_genre: String,
    pub top_show: String,
    pub total_views: usize,
}

/// How the dominant genre moved between the first and last quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    /// Fewer than two quarters with data
    InsufficientData,
    /// Same dominant genre at both ends
    Consistent { genre: String },
    /// Dominant genre changed
    Shift { from: String, to: String },
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::InsufficientData => {
                write!(f, "Not enough data for evolution analysis")
            }
            Transformation::Consistent { genre } => write!(f, "Consistent {} fan all year", genre),
            Transformation::Shift { from, to } => write!(f, "From {} to {}", from, to),
        }
    }
}

impl Serialize for Transformation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Chronological quarter reports plus the transformation tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionReport {
    pub quarters: Vec<QuarterReport>,
    pub transformation: Transformation,
}

/// Group records by calendar quarter and find the dominant genre and show in each.
///
/// Records without a timestamp are ignored. Quarters from different years share a bucket.
pub fn analyze_evolution(records: &[ViewingRecord]) -> Result<EvolutionReport> {
    validate_records(records)?;

    let mut by_quarter: BTreeMap<Quarter, Vec<&ViewingRecord>> = BTreeMap::new();
    for record in records {
        if let Some(quarter) = record.quarter() {
            by_quarter.entry(quarter).or_default().push(record);
        }
    }

    let quarters: Vec<QuarterReport> = by_quarter
        .into_iter()
        .map(|(quarter, group)| QuarterReport {
            quarter: quarter.number(),
            label: quarter.label(),
            top_genre: mode(group.iter().filter_map(|r| r.genre.as_deref()))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            top_show: mode(group.iter().filter_map(|r| r.show_name.as_deref()))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            total_views: group.len(),
        })
        .collect();

    let transformation = match (quarters.first(), quarters.last()) {
        (Some(first), Some(last)) if quarters.len() >= 2 => {
            if first.top_genre == last.top_genre {
                Transformation::Consistent {
                    genre: first.top_genre.clone(),
                }
            } else {
                Transformation::Shift {
                    from: first.top_genre.clone(),
                    to: last.top_genre.clone(),
                }
            }
        }
        _ => Transformation::InsufficientData,
    };

    tracing::debug!(
        quarters = quarters.len(),
        transformation = %transformation,
        "Analyzed viewing evolution"
    );

    Ok(EvolutionReport {
        quarters,
        transformation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(ts: &str, show: &str, genre: &str) -> ViewingRecord {
        ViewingRecord {
            timestamp: Some(NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()),
            show_name: Some(show.to_string()),
            genre: Some(genre.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_consistent_across_q1_and_q3() {
        let records = vec![
            record("2024-08-01 20:00:00", "Dark", "Thriller"),
            record("2024-02-01 20:00:00", "Ozark", "Thriller"),
            record("2024-02-02 20:00:00", "Friends", "Comedy"),
            record("2024-02-03 20:00:00", "Ozark", "Thriller"),
        ];
        let report = analyze_evolution(&records).unwrap();

        assert_eq!(report.quarters.len(), 2);
        assert_eq!(report.quarters[0].label, "Q1 (Jan-Mar)");
        assert_eq!(report.quarters[0].top_show, "Ozark");
        assert_eq!(report.quarters[0].total_views, 3);
        assert_eq!(report.quarters[1].label, "Q3 (Jul-Sep)");
        assert_eq!(
            report.transformation,
            Transformation::Consistent {
                genre: "Thriller".to_string()
            }
        );
        assert_eq!(
            report.transformation.to_string(),
            "Consistent Thriller fan all year"
        );
    }

    #[test]
    fn test_shift_between_quarters() {
        let records = vec![
            record("2024-01-10 20:00:00", "Friends", "Comedy"),
            record("2024-05-10 20:00:00", "Dark", "Thriller"),
            record("2024-11-10 20:00:00", "Narcos", "Crime"),
        ];
        let report = analyze_evolution(&records).unwrap();
        assert_eq!(report.quarters.len(), 3);
        assert_eq!(report.transformation.to_string(), "From Comedy to Crime");
    }

    #[test]
    fn test_single_quarter_is_insufficient() {
        let records = vec![
            record("2024-01-10 20:00:00", "Friends", "Comedy"),
            record("2024-03-10 20:00:00", "Friends", "Comedy"),
        ];
        let report = analyze_evolution(&records).unwrap();
        assert_eq!(report.quarters.len(), 1);
        assert_eq!(report.transformation, Transformation::InsufficientData);
    }

    #[test]
    fn test_untimed_records_are_ignored() {
        let records = vec![ViewingRecord {
            show_name: Some("Dark".to_string()),
            ..Default::default()
        }];
        let report = analyze_evolution(&records).unwrap();
        assert!(report.quarters.is_empty());
        assert_eq!(report.transformation, Transformation::InsufficientData);
    }

    #[test]
    fn test_missing_genre_is_unknown() {
        let mut a = record("2024-01-10 20:00:00", "Friends", "Comedy");
        a.genre = None;
        let report = analyze_evolution(&[a]).unwrap();
        assert_eq!(report.quarters[0].top_genre, "Unknown");
        assert_eq!(report.quarters[0].top_show, "Friends");
    }

    #[test]
    fn test_serializes_transformation_as_text() {
        let report = analyze_evolution(&[]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["transformation"],
            "Not enough data for evolution analysis"
        );
    }
}
