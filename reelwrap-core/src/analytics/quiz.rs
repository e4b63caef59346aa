//! Memory quiz helpers: pick a day to ask about and judge the guess.

use super::day::{viewing_on, DayReport};
use crate::error::{Error, Result};
use crate::types::ViewingRecord;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;

const CORRECT_FEEDBACK: &[&str] = &[
    "🎯 Nailed it! Your memory is impressive!",
    "✨ Correct! You know yourself well!",
    "🎉 Yes! You remember perfectly!",
    "👏 That's right! Great memory!",
];

const INCORRECT_FEEDBACK: &[&str] = &[
    "😅 Not quite, but close guess!",
    "🤔 Interesting guess, but not this time!",
    "💭 Good try! Want to know the real answer?",
    "🎲 Nope, but that would've been cool!",
];

/// A date to quiz on, with the answer attached.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub date: NaiveDate,
    /// e.g. "March 15, 2024"
    pub date_formatted: String,
    pub viewing: DayReport,
}

/// Result of comparing a guess to what was actually watched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessVerdict {
    pub is_correct: bool,
    pub feedback: &'static str,
    pub user_guess: String,
    pub actual_show: String,
}

/// Distinct viewing dates, ascending.
pub fn viewing_dates(records: &[ViewingRecord]) -> Vec<NaiveDate> {
    records
        .iter()
        .filter_map(ViewingRecord::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pick a random viewing date and look up what was watched.
///
/// Only dates with at least one named show are eligible, so the answer is
/// never blank.
pub fn random_quiz_date<R: Rng + ?Sized>(
    records: &[ViewingRecord],
    rng: &mut R,
) -> Result<QuizQuestion> {
    let dates: Vec<NaiveDate> = records
        .iter()
        .filter(|r| r.show_name.is_some())
        .filter_map(ViewingRecord::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let date = *dates.choose(rng).ok_or(Error::NoViewingData)?;
    let viewing = viewing_on(records, date)?;

    tracing::debug!(%date, episodes = viewing.episodes_watched, "Picked quiz date");

    Ok(QuizQuestion {
        date,
        date_formatted: date.format("%B %d, %Y").to_string(),
        viewing,
    })
}

/// Judge a guess: case-insensitive containment in either direction.
///
/// An empty guess is never correct.
pub fn compare_guess<R: Rng + ?Sized>(guess: &str, actual: &str, rng: &mut R) -> GuessVerdict {
    let guess_norm = guess.trim().to_lowercase();
    let actual_norm = actual.trim().to_lowercase();

    let is_correct = !guess_norm.is_empty()
        && !actual_norm.is_empty()
        && (actual_norm.contains(&guess_norm) || guess_norm.contains(&actual_norm));

    let pool = if is_correct {
        CORRECT_FEEDBACK
    } else {
        INCORRECT_FEEDBACK
    };

    GuessVerdict {
        is_correct,
        feedback: pool.choose(rng).copied().unwrap_or_default(),
        user_guess: guess.to_string(),
        actual_show: actual.to_string(),
    }
}
