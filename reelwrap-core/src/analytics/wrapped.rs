//! Wrapped - Year in Review
//!
//! Runs the whole pipeline (load, stats, personality, evolution) and bundles
//! the results into the structure handed to the presentation layer.

use std::path::Path;

use serde::Serialize;

use super::evolution::{analyze_evolution, EvolutionReport};
use super::personality::{classify, Classification};
use super::stats::{calculate_stats, StatsBundle, StatsOptions};
use crate::config::Config;
use crate::ingest::{load_viewing_history, HistorySummary, LoadedHistory, LoaderOptions};

/// Everything the wrapped presentation needs.
#[derive(Debug, Clone, Serialize)]
pub struct WrappedReport {
    pub summary: HistorySummary,
    pub stats: StatsBundle,
    pub personality: Classification,
    pub evolution: EvolutionReport,
}

impl WrappedReport {
    /// Pretty JSON, as forwarded to the narrative layer.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the report for an already-loaded history.
pub fn build_wrapped(history: LoadedHistory, options: &StatsOptions) -> crate::Result<WrappedReport> {
    let LoadedHistory { records, summary } = history;

    let stats = calculate_stats(&records, options)?;
    let personality = classify(&stats);
    if let Some(error) = &personality.error {
        tracing::warn!(error = %error, "Personality classification used the fallback");
    }
    let evolution = analyze_evolution(&records)?;

    tracing::info!(
        views = stats.total_views,
        personality = personality.profile.type_name,
        transformation = %evolution.transformation,
        "Generated wrapped report"
    );

    Ok(WrappedReport {
        summary,
        stats,
        personality,
        evolution,
    })
}

/// Load the log at `path` and build the report using `config`.
pub fn generate_wrapped(path: impl AsRef<Path>, config: &Config) -> crate::Result<WrappedReport> {
    let history = load_viewing_history(path, &LoaderOptions::from_config(&config.loader))?;
    build_wrapped(history, &StatsOptions::from(&config.analytics))
}
