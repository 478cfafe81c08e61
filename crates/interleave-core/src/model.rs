//! Core data model types for interleave.
//!
//! Subjects, flashcards, decks, quiz questions and the study-session log,
//! plus the named interleaving patterns and flashcard sampling policies.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single flashcard. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    pub topic: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            topic: topic.into(),
        }
    }
}

/// A quiz question. Multiple-choice when `options` is non-empty, otherwise
/// free response with the expected `answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_index: Option<usize>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl Question {
    /// Text of the correct answer, resolved through `correct_index` when the
    /// question has options.
    pub fn correct_text(&self) -> Option<&str> {
        match self.correct_index {
            Some(i) => self.options.get(i).map(String::as_str),
            None => self.answer.as_deref(),
        }
    }
}

/// A topic with its question bank, as supplied to the quiz assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizTopic {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// One entry in a user's chronological study log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub topic: String,
    pub duration_minutes: u32,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A quiz score recorded against a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub date: DateTime<Utc>,
    pub score: f64,
    pub topic: String,
}

/// A subject the user studies. The subject name doubles as the topic label
/// used by the session log and by flashcards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz_results: Vec<QuizResult>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Merge sub-topic labels, keeping first-seen order.
    pub fn add_topics<'a>(&mut self, topics: impl IntoIterator<Item = &'a String>) {
        for topic in topics {
            if !self.topics.contains(topic) {
                self.topics.push(topic.clone());
            }
        }
    }

    /// Add a card unless an identical one is already held. Returns `true` if added.
    pub fn add_card(&mut self, card: Flashcard) -> bool {
        if self.cards.contains(&card) {
            return false;
        }
        self.cards.push(card);
        true
    }
}

/// Everything stored for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub user_id: String,
    #[serde(default)]
    pub subjects: BTreeMap<String, Subject>,
    /// Append-only, insertion order is chronological order.
    #[serde(default)]
    pub sessions: Vec<StudySession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserState {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            subjects: BTreeMap::new(),
            sessions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get a subject, creating it on first reference.
    pub fn subject_mut(&mut self, name: &str) -> &mut Subject {
        self.subjects
            .entry(name.to_string())
            .or_insert_with(|| Subject::new(name))
    }

    /// Number of flashcards held per subject.
    pub fn card_counts(&self) -> HashMap<String, usize> {
        self.subjects
            .iter()
            .map(|(name, s)| (name.clone(), s.cards.len()))
            .collect()
    }
}

/// A named flashcard deck. Deck names are unique across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    pub cards: Vec<Flashcard>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: impl Into<String>, owner: Option<String>, cards: Vec<Flashcard>) -> Self {
        Self {
            name: name.into(),
            owner,
            cards,
            created_at: Utc::now(),
        }
    }

    /// Card count per topic label.
    pub fn topic_breakdown(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for card in &self.cards {
            *counts.entry(card.topic.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Named interleaving patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pattern {
    #[serde(rename = "random")]
    Random,
    #[default]
    #[serde(rename = "systematic_short", alias = "ABCABC", alias = "ABAB")]
    SystematicShort,
    #[serde(rename = "systematic_extended", alias = "AABBCC")]
    SystematicExtended,
    #[serde(rename = "front_loaded")]
    FrontLoaded,
    #[serde(rename = "spaced")]
    Spaced,
    #[serde(rename = "pairwise_mixing", alias = "ABACBC")]
    PairwiseMixing,
    #[serde(rename = "shuffled_rounds", alias = "Random")]
    ShuffledRounds,
    #[serde(rename = "blocked_to_interleaved", alias = "Blocked-to-Interleaved")]
    BlockedToInterleaved,
}

impl Pattern {
    pub const ALL: [Pattern; 8] = [
        Pattern::Random,
        Pattern::SystematicShort,
        Pattern::SystematicExtended,
        Pattern::FrontLoaded,
        Pattern::Spaced,
        Pattern::PairwiseMixing,
        Pattern::ShuffledRounds,
        Pattern::BlockedToInterleaved,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Pattern::Random => "random",
            Pattern::SystematicShort => "systematic_short",
            Pattern::SystematicExtended => "systematic_extended",
            Pattern::FrontLoaded => "front_loaded",
            Pattern::Spaced => "spaced",
            Pattern::PairwiseMixing => "pairwise_mixing",
            Pattern::ShuffledRounds => "shuffled_rounds",
            Pattern::BlockedToInterleaved => "blocked_to_interleaved",
        }
    }

    /// Legacy identifiers accepted for this pattern.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Pattern::SystematicShort => &["ABCABC", "ABAB"],
            Pattern::SystematicExtended => &["AABBCC"],
            Pattern::PairwiseMixing => &["ABACBC"],
            Pattern::ShuffledRounds => &["Random"],
            Pattern::BlockedToInterleaved => &["Blocked-to-Interleaved"],
            _ => &[],
        }
    }

    /// Resolve an identifier, falling back to `systematic_short` for
    /// anything unrecognised.
    pub fn resolve(id: &str) -> Pattern {
        match id.parse() {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!("{e}, falling back to systematic_short");
                Pattern::SystematicShort
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Pattern {
    type Err = String;

    // Case-sensitive: "random" and the legacy "Random" are different policies.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s || p.aliases().contains(&s))
            .ok_or_else(|| format!("unknown pattern: {s}"))
    }
}

/// How flashcards are mixed when drawn from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingPolicy {
    #[default]
    Random,
    Balanced,
    Systematic,
}

impl SamplingPolicy {
    pub const ALL: [SamplingPolicy; 3] = [
        SamplingPolicy::Random,
        SamplingPolicy::Balanced,
        SamplingPolicy::Systematic,
    ];
}

impl fmt::Display for SamplingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingPolicy::Random => write!(f, "random"),
            SamplingPolicy::Balanced => write!(f, "balanced"),
            SamplingPolicy::Systematic => write!(f, "systematic"),
        }
    }
}

impl FromStr for SamplingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(SamplingPolicy::Random),
            "balanced" => Ok(SamplingPolicy::Balanced),
            "systematic" => Ok(SamplingPolicy::Systematic),
            other => Err(format!("unknown sampling policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_display_and_parse() {
        assert_eq!(Pattern::FrontLoaded.to_string(), "front_loaded");
        assert_eq!("spaced".parse::<Pattern>().unwrap(), Pattern::Spaced);
        assert_eq!("ABAB".parse::<Pattern>().unwrap(), Pattern::SystematicShort);
        assert_eq!("ABACBC".parse::<Pattern>().unwrap(), Pattern::PairwiseMixing);
        assert!("zigzag".parse::<Pattern>().is_err());
    }

    #[test]
    fn legacy_random_is_distinct_from_random() {
        assert_eq!("random".parse::<Pattern>().unwrap(), Pattern::Random);
        assert_eq!("Random".parse::<Pattern>().unwrap(), Pattern::ShuffledRounds);
    }

    #[test]
    fn unknown_pattern_resolves_to_systematic_short() {
        assert_eq!(Pattern::resolve("zigzag"), Pattern::SystematicShort);
        assert_eq!(
            Pattern::resolve("Blocked-to-Interleaved"),
            Pattern::BlockedToInterleaved
        );
    }

    #[test]
    fn pattern_serde_accepts_aliases() {
        let p: Pattern = serde_json::from_str("\"AABBCC\"").unwrap();
        assert_eq!(p, Pattern::SystematicExtended);
        assert_eq!(
            serde_json::to_string(&Pattern::SystematicExtended).unwrap(),
            "\"systematic_extended\""
        );
    }

    #[test]
    fn sampling_policy_parse() {
        assert_eq!(
            "Balanced".parse::<SamplingPolicy>().unwrap(),
            SamplingPolicy::Balanced
        );
        assert!("weighted".parse::<SamplingPolicy>().is_err());
    }

    #[test]
    fn question_correct_text() {
        let mc = Question {
            question: "2+2?".into(),
            options: vec!["3".into(), "4".into()],
            correct_index: Some(1),
            answer: None,
        };
        assert_eq!(mc.correct_text(), Some("4"));

        let free = Question {
            question: "Capital of France?".into(),
            options: vec![],
            correct_index: None,
            answer: Some("Paris".into()),
        };
        assert_eq!(free.correct_text(), Some("Paris"));
    }

    #[test]
    fn subject_dedupes_cards_and_topics() {
        let mut subject = Subject::new("Math");
        assert!(subject.add_card(Flashcard::new("1+1", "2", "Math")));
        assert!(!subject.add_card(Flashcard::new("1+1", "2", "Math")));
        subject.add_topics(&["algebra".to_string(), "geometry".to_string()]);
        subject.add_topics(&["algebra".to_string()]);
        assert_eq!(subject.cards.len(), 1);
        assert_eq!(subject.topics, vec!["algebra", "geometry"]);
    }

    #[test]
    fn deck_topic_breakdown() {
        let deck = Deck::new(
            "mixed",
            None,
            vec![
                Flashcard::new("a", "1", "A"),
                Flashcard::new("b", "2", "B"),
                Flashcard::new("c", "3", "A"),
            ],
        );
        let breakdown = deck.topic_breakdown();
        assert_eq!(breakdown.get("A"), Some(&2));
        assert_eq!(breakdown.get("B"), Some(&1));
    }
}
