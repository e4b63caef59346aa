//! Analytics module for reelwrap
//!
//! Pure functions over the loaded record sequence:
//! - [`stats`]: the aggregate stats bundle
//! - [`personality`]: first-match rule cascade over the bundle
//! - [`evolution`]: dominant genre/show per calendar quarter
//! - [`day`]: what was watched on a given date
//! - [`quiz`]: random-date memory quiz helpers
//! - [`wrapped`]: the full pipeline in one report
//!
//! None of them share state; each call returns a freshly owned result.

pub mod day;
pub mod evolution;
pub mod personality;
pub mod quiz;
pub mod stats;
pub mod wrapped;

pub use day::{parse_query_date, viewing_on, DayReport};
pub use evolution::{analyze_evolution, EvolutionReport, QuarterReport, Transformation};
pub use personality::{
    classify, Classification, Personality, PersonalityMetrics, PersonalityProfile, ViewingProfile,
};
pub use quiz::{compare_guess, random_quiz_date, viewing_dates, GuessVerdict, QuizQuestion};
pub use stats::{calculate_stats, StatsBundle, StatsOptions};
pub use wrapped::{build_wrapped, generate_wrapped, WrappedReport};
