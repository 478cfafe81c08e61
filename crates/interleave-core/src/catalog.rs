//! Static reference data describing the interleaving patterns.

use serde::Serialize;

use crate::model::{Pattern, SamplingPolicy};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
    pub best_for: &'static str,
    #[serde(skip_serializing_if = "no_aliases")]
    pub aliases: &'static [&'static str],
}

fn no_aliases(aliases: &&'static [&'static str]) -> bool {
    aliases.is_empty()
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyInfo {
    pub id: &'static str,
    pub description: &'static str,
}

/// Everything `get_interleaving_patterns` returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCatalog {
    pub patterns: Vec<PatternInfo>,
    pub flashcard_policies: Vec<PolicyInfo>,
    pub benefits: &'static [&'static str],
    pub tips: &'static [&'static str],
}

pub fn pattern_info(pattern: Pattern) -> PatternInfo {
    let (name, description, difficulty, best_for) = match pattern {
        Pattern::Random => (
            "Random Draw",
            "Each slot is drawn independently from all topics",
            "advanced",
            "Exam preparation once every topic is familiar",
        ),
        Pattern::SystematicShort => (
            "Triple Rotation",
            "Rotate through every topic in order (A→B→C→A→B→C)",
            "intermediate",
            "Everyday practice with a fixed set of related topics",
        ),
        Pattern::SystematicExtended => (
            "Paired Blocks",
            "Two items per topic before switching (A→A→B→B→C→C)",
            "beginner",
            "Newcomers who need a little warm-up on each topic",
        ),
        Pattern::FrontLoaded => (
            "Front-Loaded Deep Study",
            "Runs of three per topic for the first 70% of the session, then rapid rotation",
            "beginner",
            "Learning new material that still needs focused exposure",
        ),
        Pattern::Spaced => (
            "Weighted Spacing",
            "Random draws that favour topics listed first",
            "intermediate",
            "Prioritising weaker topics by listing them first",
        ),
        Pattern::PairwiseMixing => (
            "Spaced Mixing",
            "Mix every pair of topics in turn (A→B→A→C→B→C)",
            "intermediate",
            "Contrasting similar concepts that are easy to confuse",
        ),
        Pattern::ShuffledRounds => (
            "Random Shuffle",
            "Shuffle whole rounds of all topics for maximum interleaving",
            "advanced",
            "Balanced review where every topic gets equal time",
        ),
        Pattern::BlockedToInterleaved => (
            "Gradual Transition",
            "Start with one blocked round, then shuffle every following round",
            "beginner",
            "Easing into interleaving after blocked study",
        ),
    };
    PatternInfo {
        id: pattern.id(),
        name,
        description,
        difficulty,
        best_for,
        aliases: pattern.aliases(),
    }
}

fn policy_info(policy: SamplingPolicy) -> PolicyInfo {
    let (id, description) = match policy {
        SamplingPolicy::Random => ("random", "Shuffle the whole pool"),
        SamplingPolicy::Balanced => (
            "balanced",
            "Take turns between topics so none is starved",
        ),
        SamplingPolicy::Systematic => ("systematic", "Group cards topic by topic"),
    };
    PolicyInfo { id, description }
}

pub const BENEFITS: &[&str] = &[
    "Improves long-term retention by up to 43%",
    "Enhances ability to distinguish between concepts",
    "Builds flexible problem-solving skills",
    "Better prepares for real-world application of knowledge",
];

pub const TIPS: &[&str] = &[
    "Start with simpler patterns (systematic_short) if new to interleaving",
    "Gradually increase complexity as you get comfortable",
    "Interleave related but distinct topics for best results",
    "Combine with spaced repetition for maximum retention",
];

/// The full catalog, always in the same order.
pub fn pattern_catalog() -> PatternCatalog {
    PatternCatalog {
        patterns: Pattern::ALL.into_iter().map(pattern_info).collect(),
        flashcard_policies: SamplingPolicy::ALL.into_iter().map(policy_info).collect(),
        benefits: BENEFITS,
        tips: TIPS,
    }
}
