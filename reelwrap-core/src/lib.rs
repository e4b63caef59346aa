//! # reelwrap-core
//!
//! Core library for reelwrap - a "wrapped"-style year in review for a
//! personal TV viewing log.
//!
//! This library provides:
//! - A tolerant CSV loader for the viewing log
//! - The stats engine, personality classifier, quarterly evolution and
//!   single-day lookup
//! - A synthetic sample-log generator for demos
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Data flow
//!
//! ```text
//! CSV ──► ingest ──► records ──┬─► stats ──► personality
//!                              ├─► evolution
//!                              └─► day / quiz
//! ```
//!
//! Every analytic step is a pure function of the loaded records.
//!
//! ## Example
//!
//! ```rust,no_run
//! use reelwrap_core::analytics::generate_wrapped;
//! use reelwrap_core::Config;
//!
//! let config = Config::load().expect("failed to load config");
//! let report = generate_wrapped("history.csv", &config).expect("failed to build report");
//! println!("{}", report.personality.profile.type_name);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{load_viewing_history, LoadedHistory, LoaderOptions};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod sample;
pub mod types;
