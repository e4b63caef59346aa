//! Personality classification for Wrapped
//!
//! Assigns a fun "viewing personality" archetype from the stats bundle.
//! Rules are evaluated top to bottom and the first match wins, so a viewer
//! who both binges and rewatches is a Dedicated Binger, never a Comfort Seeker.

use super::stats::StatsBundle;
use crate::types::round_to;
use serde::Serialize;

/// Viewing personality archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Personality {
    /// Long sessions, finishes what they start
    DedicatedBinger,
    /// Wide genre spread across many shows
    GenreExplorer,
    /// Rewatches favorites
    ComfortSeeker,
    /// Heavy Saturday/Sunday viewing
    WeekendWarrior,
    /// Watches late at night
    NightOwl,
    /// Samples many shows, drops most
    SelectiveCurator,
    /// Nothing stands out
    CasualViewer,
    /// Stats could not be classified
    MysteryViewer,
}

impl Personality {
    /// Get the display name for this personality.
    pub fn name(&self) -> &'static str {
        match self {
            Personality::DedicatedBinger => "The Dedicated Binger",
            Personality::GenreExplorer => "The Genre Explorer",
            Personality::ComfortSeeker => "The Comfort Seeker",
            Personality::WeekendWarrior => "The Weekend Warrior",
            Personality::NightOwl => "The Night Owl",
            Personality::SelectiveCurator => "The Selective Curator",
            Personality::CasualViewer => "The Casual Viewer",
            Personality::MysteryViewer => "The Mystery Viewer",
        }
    }

    /// Get an emoji for this personality.
    pub fn emoji(&self) -> &'static str {
        match self {
            Personality::DedicatedBinger => "🎬",
            Personality::GenreExplorer => "🗺️",
            Personality::ComfortSeeker => "☕",
            Personality::WeekendWarrior => "🏋️",
            Personality::NightOwl => "🦉",
            Personality::SelectiveCurator => "🎯",
            Personality::CasualViewer => "😎",
            Personality::MysteryViewer => "❓",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Personality::DedicatedBinger => {
                "You commit to shows and see them through. When you start, you FINISH."
            }
            Personality::GenreExplorer => "You're all over the map! Variety is your spice of life.",
            Personality::ComfortSeeker => "You know what you love and you love it again and again.",
            Personality::WeekendWarrior => {
                "You save your binging for the weekend. Work hard, watch harder."
            }
            Personality::NightOwl => "Your prime time is when everyone else is sleeping.",
            Personality::SelectiveCurator => {
                "You're not afraid to quit. Life's too short for bad TV."
            }
            Personality::CasualViewer => "You watch for fun, not commitment. Chill vibes only.",
            Personality::MysteryViewer => "Your viewing habits are enigmatic!",
        }
    }

    pub fn traits(&self) -> &'static [&'static str] {
        match self {
            Personality::DedicatedBinger => {
                &["loyal", "focused", "completion-driven", "marathon-ready"]
            }
            Personality::GenreExplorer => &["curious", "open-minded", "adventurous", "diverse"],
            Personality::ComfortSeeker => {
                &["nostalgic", "loyal", "comfort-focused", "sentimental"]
            }
            Personality::WeekendWarrior => &["disciplined", "balanced", "ritualistic", "strategic"],
            Personality::NightOwl => &["nocturnal", "independent", "peaceful", "introspective"],
            Personality::SelectiveCurator => {
                &["discerning", "efficient", "decisive", "quality-focused"]
            }
            Personality::CasualViewer => &["relaxed", "spontaneous", "low-pressure", "flexible"],
            Personality::MysteryViewer => &["mysterious"],
        }
    }

    /// How common this personality is, as a blurb.
    pub fn rarity(&self) -> Option<&'static str> {
        match self {
            Personality::DedicatedBinger => Some("Top 15% of viewers"),
            Personality::GenreExplorer => Some("Top 25% in diversity"),
            Personality::ComfortSeeker => Some("Top 20% in rewatches"),
            Personality::WeekendWarrior => Some("Classic weekend lifestyle"),
            Personality::NightOwl => Some("Top 30% latest viewers"),
            Personality::SelectiveCurator => Some("Top 10% most selective"),
            Personality::CasualViewer => Some("Perfectly balanced"),
            Personality::MysteryViewer => None,
        }
    }

    /// An illustrative example of the archetype.
    pub fn famous_match(&self) -> Option<&'static str> {
        match self {
            Personality::DedicatedBinger => Some("Like binging Breaking Bad in a weekend"),
            Personality::GenreExplorer => Some("Your watchlist looks like a streaming buffet"),
            Personality::ComfortSeeker => Some("The Office is basically your roommate"),
            Personality::WeekendWarrior => Some("Saturday night is sacred screen time"),
            Personality::NightOwl => Some("3am and one more episode"),
            Personality::SelectiveCurator => Some("Three episode rule enforcer"),
            Personality::CasualViewer => Some("Whatever's on, you're down"),
            Personality::MysteryViewer => None,
        }
    }

    /// Get the tagline for this personality.
    pub fn tagline(&self) -> &'static str {
        match self {
            Personality::DedicatedBinger => "I don't quit what I start",
            Personality::GenreExplorer => "Why choose when you can try everything?",
            Personality::ComfortSeeker => "If it ain't broke, watch it again",
            Personality::WeekendWarrior => "Weekends are for watching",
            Personality::NightOwl => "The night is young and full of episodes",
            Personality::SelectiveCurator => "I know what I like",
            Personality::CasualViewer => "Just here for a good time",
            Personality::MysteryViewer => "Too complex to categorize",
        }
    }
}

/// Metrics the rules look at, extracted from a [`StatsBundle`].
#[derive(Debug, Clone, Default)]
pub struct ViewingProfile {
    /// Mean episodes per session
    pub binge_score: f64,
    /// Fraction completed, 0-1
    pub completion_rate: f64,
    pub rewatch_count: usize,
    pub unique_shows: usize,
    /// Entries in the top-genre ranking
    pub genre_diversity: usize,
    /// Saturday records, if Saturday is a top viewing day
    pub saturday_views: usize,
    /// Sunday records, if Sunday is a top viewing day
    pub sunday_views: usize,
    pub avg_viewing_hour: u32,
}

impl From<&StatsBundle> for ViewingProfile {
    fn from(stats: &StatsBundle) -> Self {
        Self {
            binge_score: stats.avg_episodes_per_session,
            completion_rate: stats.completion_rate,
            rewatch_count: stats.rewatch_count,
            unique_shows: stats.unique_shows,
            genre_diversity: stats.genre_diversity(),
            saturday_views: stats.day_count("Saturday"),
            sunday_views: stats.day_count("Sunday"),
            avg_viewing_hour: stats.avg_viewing_hour,
        }
    }
}

type Rule = fn(&ViewingProfile) -> bool;

/// Ordered rule table; the first predicate that holds decides.
const RULES: &[(Personality, Rule)] = &[
    (Personality::DedicatedBinger, |p: &ViewingProfile| {
        p.binge_score > 3.5 && p.completion_rate > 0.7
    }),
    (Personality::GenreExplorer, |p: &ViewingProfile| {
        p.genre_diversity >= 4 && p.unique_shows > 10
    }),
    (Personality::ComfortSeeker, |p: &ViewingProfile| p.rewatch_count > 5),
    (Personality::WeekendWarrior, |p: &ViewingProfile| {
        p.saturday_views > 20 || p.sunday_views > 20
    }),
    (Personality::NightOwl, |p: &ViewingProfile| p.avg_viewing_hour >= 22),
    (Personality::SelectiveCurator, |p: &ViewingProfile| {
        p.completion_rate < 0.5 && p.unique_shows > 15
    }),
];

impl ViewingProfile {
    /// Classify the profile. Falls through to [`Personality::CasualViewer`].
    pub fn classify(&self) -> Personality {
        RULES
            .iter()
            .find(|(_, rule)| rule(self))
            .map(|(personality, _)| *personality)
            .unwrap_or(Personality::CasualViewer)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if !self.binge_score.is_finite() || self.binge_score < 0.0 {
            return Err(format!("invalid episodes per session: {}", self.binge_score));
        }
        if !(0.0..=1.0).contains(&self.completion_rate) {
            return Err(format!("completion rate out of range: {}", self.completion_rate));
        }
        if self.avg_viewing_hour > 23 {
            return Err(format!("average hour out of range: {}", self.avg_viewing_hour));
        }
        Ok(())
    }
}

/// Metrics echoed alongside the personality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalityMetrics {
    pub binge_score: f64,
    /// Completion rate as a percentage
    pub completion_rate: f64,
    pub rewatch_count: usize,
    pub genre_diversity: usize,
}

/// Serializable view of a personality and the numbers behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalityProfile {
    pub personality: Personality,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub traits: &'static [&'static str],
    pub rarity: Option<&'static str>,
    pub famous_match: Option<&'static str>,
    pub tagline: &'static str,
    pub metrics: Option<PersonalityMetrics>,
}

impl PersonalityProfile {
    fn new(personality: Personality, metrics: Option<PersonalityMetrics>) -> Self {
        Self {
            personality,
            type_name: personality.name(),
            emoji: personality.emoji(),
            description: personality.description(),
            traits: personality.traits(),
            rarity: personality.rarity(),
            famous_match: personality.famous_match(),
            tagline: personality.tagline(),
            metrics,
        }
    }
}

/// Outcome of classification. `error` is set when the fallback was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub profile: PersonalityProfile,
    pub error: Option<String>,
}

impl Classification {
    pub fn personality(&self) -> Personality {
        self.profile.personality
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Classify the viewing personality for a stats bundle.
///
/// Never fails: inconsistent stats yield [`Personality::MysteryViewer`] with
/// the reason in [`Classification::error`].
pub fn classify(stats: &StatsBundle) -> Classification {
    let profile = ViewingProfile::from(stats);

    if let Err(reason) = profile.check() {
        tracing::warn!(error = %reason, "Falling back to unclassifiable personality");
        return Classification {
            profile: PersonalityProfile::new(Personality::MysteryViewer, None),
            error: Some(reason),
        };
    }

    let personality = profile.classify();
    tracing::debug!(personality = personality.name(), "Classified viewing personality");

    let metrics = PersonalityMetrics {
        binge_score: round_to(profile.binge_score, 2),
        completion_rate: round_to(profile.completion_rate * 100.0, 1),
        rewatch_count: profile.rewatch_count,
        genre_diversity: profile.genre_diversity,
    };

    Classification {
        profile: PersonalityProfile::new(personality, Some(metrics)),
        error: None,
    }
}
