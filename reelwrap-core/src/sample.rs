//! Synthetic viewing logs for demos and tests
//!
//! Generates one calendar year of viewing whose genre mix drifts by quarter:
//! comfort comedy early in the year, a thriller and crime phase in summer,
//! settled favorites at year end. Viewing leans toward evenings, and weekends
//! start earlier in the day.
//!
//! ```rust,no_run
//! use reelwrap_core::sample::{generate_sample, save_sample, DEFAULT_SAMPLE_SIZE};
//!
//! let records = generate_sample(DEFAULT_SAMPLE_SIZE, &mut rand::thread_rng())?;
//! save_sample("history.csv", &records)?;
//! # Ok::<(), reelwrap_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{weekday_name, ViewingRecord};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Records written when no size is given.
pub const DEFAULT_SAMPLE_SIZE: usize = 500;

/// Calendar year the sample covers.
pub const SAMPLE_YEAR: i32 = 2024;

/// Column order of written logs; matches what the loader reads.
pub const CSV_HEADER: [&str; 11] = [
    "date",
    "show_name",
    "season",
    "episode",
    "genre",
    "duration_minutes",
    "completed",
    "is_rewatch",
    "session_id",
    "day_of_week",
    "hour",
];

struct Genre {
    name: &'static str,
    shows: &'static [&'static str],
}

const THRILLER: Genre = Genre {
    name: "Thriller",
    shows: &["Stranger Things", "True Detective", "Mindhunter", "Dark", "Ozark"],
};
const COMEDY: Genre = Genre {
    name: "Comedy",
    shows: &["The Office", "Friends", "Brooklyn Nine-Nine", "Ted Lasso", "The Good Place"],
};
const DRAMA: Genre = Genre {
    name: "Drama",
    shows: &["The Crown", "Breaking Bad", "Mad Men", "Succession", "The Bear"],
};
const SCI_FI: Genre = Genre {
    name: "Sci-Fi",
    shows: &["Black Mirror", "The Expanse", "Westworld", "Severance", "Foundation"],
};
const DOCUMENTARY: Genre = Genre {
    name: "Documentary",
    shows: &["Making a Murderer", "Planet Earth", "Chef's Table", "The Last Dance", "Drive to Survive"],
};
const ROMANCE: Genre = Genre {
    name: "Romance",
    shows: &["Bridgerton", "Emily in Paris", "Love is Blind", "Virgin River", "Heartstopper"],
};
const CRIME: Genre = Genre {
    name: "Crime",
    shows: &["Narcos", "True Crime", "Only Murders in the Building", "Mare of Easttown", "The Sinner"],
};

/// Genre weights (percent) per quarter, Q1 first.
const QUARTER_MIX: [&[(Genre, u32)]; 4] = [
    &[(COMEDY, 40), (ROMANCE, 30), (DRAMA, 30)],
    &[(COMEDY, 20), (DRAMA, 20), (THRILLER, 20), (SCI_FI, 20), (DOCUMENTARY, 20)],
    &[(THRILLER, 40), (CRIME, 30), (SCI_FI, 20), (DRAMA, 10)],
    &[(THRILLER, 30), (DRAMA, 20), (COMEDY, 20), (CRIME, 20), (SCI_FI, 10)],
];

/// (hour, weight) peaking in the evening
const WEEKEND_HOURS: &[(u8, u32)] = &[
    (10, 1),
    (11, 1),
    (12, 1),
    (13, 2),
    (14, 2),
    (15, 3),
    (16, 3),
    (17, 4),
    (18, 5),
    (19, 6),
    (20, 7),
    (21, 7),
    (22, 6),
    (23, 5),
];

/// (hour, weight) after work only
const WEEKDAY_HOURS: &[(u8, u32)] = &[(18, 1), (19, 2), (20, 3), (21, 4), (22, 5), (23, 6)];

/// Generate `count` records spread over [`SAMPLE_YEAR`], sorted by timestamp.
///
/// Shows become favorites at random and stay favorites; favorites are
/// completed more often and are the only rewatches. Sessions run 1-6
/// episodes but may break early.
pub fn generate_sample<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<ViewingRecord>> {
    let start = year_day(1, 1)?;
    let days = (year_day(12, 31)? - start).num_days();

    let mut records = Vec::with_capacity(count);
    let mut favorites: HashSet<&str> = HashSet::new();
    let mut session = 1u32;
    let mut left_in_session = 0u32;

    for _ in 0..count {
        let date = start + Duration::days(rng.gen_range(0..=days));

        let mix = QUARTER_MIX[date.month0() as usize / 3];
        let (genre, _) = mix.choose_weighted(rng, |(_, weight)| *weight)?;
        let show = genre.shows[rng.gen_range(0..genre.shows.len())];

        if favorites.contains(show) || rng.gen_bool(0.3) {
            favorites.insert(show);
        }
        let favorite = favorites.contains(show);

        let hours = match date.weekday() {
            Weekday::Sat | Weekday::Sun => WEEKEND_HOURS,
            _ => WEEKDAY_HOURS,
        };
        let (hour, _) = hours.choose_weighted(rng, |(_, weight)| *weight)?;

        if left_in_session == 0 || rng.gen_bool(0.4) {
            session += 1;
            left_in_session = rng.gen_range(1..=6);
        }
        left_in_session -= 1;

        records.push(ViewingRecord {
            timestamp: date.and_hms_opt(u32::from(*hour), rng.gen_range(0..60), 0),
            show_name: Some(show.to_string()),
            season: Some(rng.gen_range(1..=5)),
            episode: Some(rng.gen_range(1..=12)),
            genre: Some(genre.name.to_string()),
            duration_minutes: Some(f64::from(rng.gen_range(35..=65u32))),
            completed: Some(rng.gen_bool(if favorite { 0.8 } else { 0.6 })),
            is_rewatch: Some(favorite && rng.gen_bool(0.05)),
            session_id: Some(format!("session_{}", session)),
            day_of_week: Some(weekday_name(date.weekday()).to_string()),
            hour: Some(*hour),
        });
    }

    records.sort_by_key(|r| r.timestamp);
    tracing::debug!(count = records.len(), favorites = favorites.len(), "Generated sample log");
    Ok(records)
}

fn year_day(month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, day)
        .ok_or_else(|| Error::InvalidDate(format!("{}-{:02}-{:02}", SAMPLE_YEAR, month, day)))
}

/// Write records as a log the loader can read back.
pub fn write_csv<W: Write>(records: &[ViewingRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for r in records {
        wtr.write_record([
            r.timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            text(&r.show_name),
            text(&r.season),
            text(&r.episode),
            text(&r.genre),
            text(&r.duration_minutes),
            text(&r.completed),
            text(&r.is_rewatch),
            text(&r.session_id),
            text(&r.day_of_week),
            text(&r.hour),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records to a CSV file at `path`, replacing it.
pub fn save_sample(path: impl AsRef<Path>, records: &[ViewingRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_csv(records, file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Wrote sample log");
    Ok(())
}

fn text<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
