//! reelwrap-wrapped - TV Year in Review CLI
//!
//! Generate Spotify Wrapped-style summaries of a personal viewing log.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use reelwrap_core::analytics::{
    build_wrapped, compare_guess, parse_query_date, random_quiz_date, viewing_on, DayReport,
    StatsOptions, WrappedReport,
};
use reelwrap_core::format::{hour_display, minutes_display, percent_display};
use reelwrap_core::sample::{generate_sample, save_sample, DEFAULT_SAMPLE_SIZE};
use reelwrap_core::{load_viewing_history, Config, LoadedHistory, LoaderOptions};

#[derive(Parser, Debug)]
#[command(name = "reelwrap-wrapped")]
#[command(about = "TV Wrapped - Your Year in Review")]
#[command(version)]
struct Args {
    /// Viewing log (CSV with a header row)
    #[arg(required_unless_present = "sample_out")]
    file: Option<PathBuf>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Show what was watched on a date (format: YYYY-MM-DD)
    #[arg(long, conflicts_with = "quiz")]
    date: Option<String>,

    /// Ask what you watched on a random day
    #[arg(long)]
    quiz: bool,

    /// Config file (default: $XDG_CONFIG_HOME/reelwrap/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a synthetic viewing log to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["file", "date", "quiz", "export"])]
    sample_out: Option<PathBuf>,

    /// Records in the synthetic log
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE, requires = "sample_out")]
    sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Export {
    Terminal,
    Markdown,
    Json,
}

impl Export {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None => Ok(Export::Terminal),
            Some("md") => Ok(Export::Markdown),
            Some("json") => Ok(Export::Json),
            Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let export = Export::parse(args.export.as_deref())?;

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = reelwrap_core::logging::init(&config.logging).ok();

    if let Some(path) = &args.sample_out {
        return write_sample(path, args.sample_size);
    }

    let file = args.file.context("a viewing log file is required")?;
    let history = load_viewing_history(&file, &LoaderOptions::from_config(&config.loader))
        .with_context(|| format!("failed to load viewing log {}", file.display()))?;

    if let Some(raw) = &args.date {
        let date = parse_query_date(raw).context("Invalid date format. Use YYYY-MM-DD")?;
        return print_day(&history, date, export);
    }

    if args.quiz {
        return run_quiz(&history);
    }

    let report = build_wrapped(history, &StatsOptions::from(&config.analytics))
        .context("failed to generate wrapped report")?;

    match export {
        Export::Json => println!("{}", report.to_json_pretty()?),
        Export::Markdown => print_markdown(&report),
        Export::Terminal => print_terminal(&report),
    }

    Ok(())
}

fn print_terminal(report: &WrappedReport) {
    let stats = &report.stats;
    let summary = &report.summary;

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "🎬 YOUR TV WRAPPED 🎬");
    println!("╰{}╯", "─".repeat(60));
    println!();

    if stats.total_views == 0 {
        println!("  No viewing found in this log.");
        println!();
        return;
    }

    println!("📊 THE NUMBERS");
    println!(
        "   Views:    {:<12} Total Time: {:.1}h",
        stats.total_views, stats.total_hours
    );
    println!(
        "   Shows:    {:<12} Completed: {}",
        stats.unique_shows,
        percent_display(stats.completion_rate)
    );
    println!(
        "   Rewatches: {:<11} Per session: {:.1} episodes",
        stats.rewatch_count, stats.avg_episodes_per_session
    );
    if let (Some(start), Some(end)) = (summary.date_range.start, summary.date_range.end) {
        println!(
            "   Range:    {} - {}",
            start.format("%b %d, %Y"),
            end.format("%b %d, %Y")
        );
    }
    if summary.unparsed_timestamps > 0 {
        println!(
            "   ({} row{} with unreadable dates)",
            summary.unparsed_timestamps,
            if summary.unparsed_timestamps == 1 { "" } else { "s" }
        );
    }
    println!();

    if !stats.top_shows.is_empty() {
        println!("🏆 TOP SHOWS");
        for (i, entry) in stats.top_shows.iter().enumerate() {
            println!("   {} {:<30} {:>6}", medal(i), entry.name, entry.count);
        }
        println!();
    }

    if !stats.top_genres.is_empty() {
        println!("🎭 TOP GENRES");
        for (i, entry) in stats.top_genres.iter().enumerate() {
            println!("   {} {:<30} {:>6}", medal(i), entry.name, entry.count);
        }
        println!();
    }

    println!("⏰ TIME PATTERNS");
    println!("   Typical hour: {}", hour_display(stats.avg_viewing_hour));
    if let Some(day) = stats.top_viewing_days.first() {
        println!("   Busiest day:  {} ({} views)", day.name, day.count);
    }
    println!();

    if !report.evolution.quarters.is_empty() {
        println!("📈 YOUR YEAR");
        for quarter in &report.evolution.quarters {
            println!(
                "   {:<13} {} / {} ({} views)",
                quarter.label, quarter.top_genre, quarter.top_show, quarter.total_views
            );
        }
        println!("   {}", report.evolution.transformation);
        println!();
    }

    let profile = &report.personality.profile;
    println!("{} YOUR PERSONALITY: {}", profile.emoji, profile.type_name);
    println!("   \"{}\"", profile.tagline);
    if let Some(famous) = profile.famous_match {
        println!("   Famous match: {}", famous);
    }
    println!();
}

fn print_markdown(report: &WrappedReport) {
    let stats = &report.stats;

    println!("# 🎬 TV Wrapped 🎬");
    println!();

    if stats.total_views == 0 {
        println!("*No viewing found in this log.*");
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Views | {} |", stats.total_views);
    println!("| Total Time | {:.1}h |", stats.total_hours);
    println!("| Unique Shows | {} |", stats.unique_shows);
    println!("| Completion | {} |", percent_display(stats.completion_rate));
    println!("| Episodes per Session | {:.2} |", stats.avg_episodes_per_session);
    println!("| Rewatches | {} |", stats.rewatch_count);
    println!();

    if !stats.top_shows.is_empty() {
        println!("## Top Shows");
        println!();
        for (i, entry) in stats.top_shows.iter().enumerate() {
            println!("{} **{}** - {} views", medal(i), entry.name, entry.count);
        }
        println!();
    }

    if !stats.top_genres.is_empty() {
        println!("## Top Genres");
        println!();
        for (i, entry) in stats.top_genres.iter().enumerate() {
            println!("{}. **{}** - {} views", i + 1, entry.name, entry.count);
        }
        println!();
    }

    println!("## Time Patterns");
    println!();
    println!("- **Typical hour:** {}", hour_display(stats.avg_viewing_hour));
    for day in &stats.top_viewing_days {
        println!("- **{}:** {} views", day.name, day.count);
    }
    println!();

    if !report.evolution.quarters.is_empty() {
        println!("## Quarter by Quarter");
        println!();
        println!("| Quarter | Top Genre | Top Show | Views |");
        println!("|---------|-----------|----------|-------|");
        for quarter in &report.evolution.quarters {
            println!(
                "| {} | {} | {} | {} |",
                quarter.label, quarter.top_genre, quarter.top_show, quarter.total_views
            );
        }
        println!();
        println!("*{}*", report.evolution.transformation);
        println!();
    }

    let profile = &report.personality.profile;
    println!("## Your Viewing Personality");
    println!();
    println!("{} **{}**", profile.emoji, profile.type_name);
    println!();
    println!("{}", profile.description);
    println!();
    for item in profile.traits {
        println!("- {}", item);
    }
    if !profile.traits.is_empty() {
        println!();
    }
    println!("*\"{}\"*", profile.tagline);
    println!();
}

fn print_day(history: &LoadedHistory, date: NaiveDate, export: Export) -> Result<()> {
    let day = viewing_on(&history.records, date).context("failed to look up date")?;

    match export {
        Export::Json => println!("{}", serde_json::to_string_pretty(&day)?),
        Export::Markdown => {
            println!("# {}", date.format("%B %d, %Y"));
            println!();
            print_day_lines(&day, "- ");
        }
        Export::Terminal => {
            println!();
            println!("📅 {}", date.format("%A, %B %d, %Y"));
            print_day_lines(&day, "   ");
            println!();
        }
    }

    Ok(())
}

fn print_day_lines(day: &DayReport, indent: &str) {
    if !day.has_viewing {
        if let Some(message) = &day.message {
            println!("{}{}", indent, message);
        }
        return;
    }
    if let Some(show) = &day.most_watched_show {
        println!("{}Most watched: {}", indent, show);
    }
    println!(
        "{}Episodes: {} ({})",
        indent,
        day.episodes_watched,
        minutes_display(day.total_minutes)
    );
}

fn run_quiz(history: &LoadedHistory) -> Result<()> {
    let mut rng = rand::thread_rng();
    let question =
        random_quiz_date(&history.records, &mut rng).context("no dated viewing to quiz on")?;
    let actual = question
        .viewing
        .most_watched_show
        .clone()
        .context("quiz day has no named show")?;

    print!("🤔 What did you watch on {}? ", question.date_formatted);
    io::stdout().flush()?;

    let mut guess = String::new();
    io::stdin()
        .lock()
        .read_line(&mut guess)
        .context("failed to read guess")?;

    let verdict = compare_guess(&guess, &actual, &mut rng);
    println!("{}", verdict.feedback);
    if !verdict.is_correct {
        println!("   It was: {}", verdict.actual_show);
    }
    println!(
        "   {} episode{} that day",
        question.viewing.episodes_watched,
        if question.viewing.episodes_watched == 1 { "" } else { "s" }
    );

    Ok(())
}

fn write_sample(path: &Path, count: usize) -> Result<()> {
    let records =
        generate_sample(count, &mut rand::thread_rng()).context("failed to generate sample log")?;
    save_sample(path, &records)
        .with_context(|| format!("failed to write sample log {}", path.display()))?;

    let shows: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.show_name.as_deref())
        .collect();
    let minutes: f64 = records.iter().map(|r| r.minutes()).sum();

    println!("📊 Created: {}", path.display());
    println!("   - {} viewing records", records.len());
    println!("   - {} unique shows", shows.len());
    if let (Some(first), Some(last)) = (
        records.first().and_then(|r| r.timestamp),
        records.last().and_then(|r| r.timestamp),
    ) {
        println!("   - {} to {}", first, last);
    }
    println!("   - {:.1} total hours", minutes / 60.0);
    println!();
    println!("Next: reelwrap-wrapped {}", path.display());

    Ok(())
}

fn medal(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        _ => format!("{}.", rank + 1),
    }
}
