//! Typed, validated tool arguments.
//!
//! Arguments arrive as JSON with camelCase keys. Each input struct checks its
//! own bounds in `validate()`, so the service only ever sees well-formed
//! requests.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use interleave_core::error::ToolError;
use interleave_core::model::{Flashcard, QuizTopic};
use interleave_core::schedule::StudyUnit;

pub const MIN_PLAN_MINUTES: u32 = 30;
pub const MAX_PLAN_MINUTES: u32 = 600;
pub const MAX_QUESTIONS_PER_TOPIC: usize = 10;
pub const MAX_QUIZ_LENGTH: usize = 100;
pub const MAX_SESSION_MINUTES: u32 = 1440;

/// Deserialize tool arguments, reporting malformed JSON as invalid input.
pub fn parse<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::invalid(e.to_string()))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ToolError> {
    if value < min || value > max {
        return Err(ToolError::invalid(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudyPlanInput {
    pub user_id: String,
    pub subjects: Vec<SubjectInput>,
    #[serde(alias = "totalMinutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "yes")]
    pub breaks_enabled: bool,
}

impl CreateStudyPlanInput {
    /// One unit per listed topic; a subject without topics is a unit by itself.
    pub fn study_units(&self) -> Vec<StudyUnit> {
        self.subjects
            .iter()
            .flat_map(|s| {
                if s.topics.is_empty() {
                    vec![StudyUnit {
                        subject: s.name.clone(),
                        topic: None,
                    }]
                } else {
                    s.topics
                        .iter()
                        .map(|t| StudyUnit {
                            subject: s.name.clone(),
                            topic: Some(t.clone()),
                        })
                        .collect()
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("userId", &self.user_id)?;
        for subject in &self.subjects {
            require_non_empty("subject name", &subject.name)?;
            for topic in &subject.topics {
                require_non_empty("topic", topic)?;
            }
        }
        let units = self.study_units().len();
        if units < 2 {
            return Err(ToolError::invalid(format!(
                "a study plan needs at least 2 subjects or topics to interleave, got {units}"
            )));
        }
        require_range(
            "durationMinutes",
            self.duration_minutes,
            MIN_PLAN_MINUTES,
            MAX_PLAN_MINUTES,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizInput {
    pub topics: Vec<QuizTopic>,
    #[serde(default)]
    pub quiz_length: Option<usize>,
    #[serde(default)]
    pub questions_per_topic: Option<usize>,
    #[serde(default)]
    pub shuffle_options: bool,
    #[serde(default = "yes")]
    pub include_topic_hints: bool,
}

impl GenerateQuizInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.topics.is_empty() {
            return Err(ToolError::invalid("topics must not be empty"));
        }
        if self.quiz_length.is_some() && self.questions_per_topic.is_some() {
            return Err(ToolError::invalid(
                "give either quizLength or questionsPerTopic, not both",
            ));
        }
        if let Some(n) = self.quiz_length {
            require_range("quizLength", n, 1, MAX_QUIZ_LENGTH)?;
        }
        if let Some(n) = self.questions_per_topic {
            require_range("questionsPerTopic", n, 1, MAX_QUESTIONS_PER_TOPIC)?;
        }

        for topic in &self.topics {
            require_non_empty("topic name", &topic.name)?;
            for q in &topic.questions {
                require_non_empty("question", &q.question)?;
                match (q.options.is_empty(), q.correct_index) {
                    (false, Some(i)) if i >= q.options.len() => {
                        return Err(ToolError::invalid(format!(
                            "correctIndex {i} is out of range for \"{}\" ({} options)",
                            q.question,
                            q.options.len()
                        )));
                    }
                    (false, None) => {
                        return Err(ToolError::invalid(format!(
                            "\"{}\" has options but no correctIndex",
                            q.question
                        )));
                    }
                    (true, Some(_)) => {
                        return Err(ToolError::invalid(format!(
                            "\"{}\" has a correctIndex but no options",
                            q.question
                        )));
                    }
                    (true, None) if q.answer.is_none() => {
                        return Err(ToolError::invalid(format!(
                            "\"{}\" needs options with a correctIndex, or an answer",
                            q.question
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckInput {
    pub user_id: String,
    pub deck_name: String,
    pub cards: Vec<Flashcard>,
}

impl CreateDeckInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("userId", &self.user_id)?;
        require_non_empty("deckName", &self.deck_name)?;
        if self.cards.is_empty() {
            return Err(ToolError::invalid("a deck needs at least one card"));
        }
        for card in &self.cards {
            require_non_empty("card front", &card.front)?;
            require_non_empty("card back", &card.back)?;
            require_non_empty("card topic", &card.topic)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffledFlashcardsInput {
    pub user_id: String,
    /// Read this deck instead of the user's own subjects.
    #[serde(default)]
    pub deck_name: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    /// Defaults to every card in the filtered pool.
    #[serde(default)]
    pub count: Option<usize>,
    /// Sampling policy name.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ShuffledFlashcardsInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("userId", &self.user_id)?;
        if let Some(deck) = &self.deck_name {
            require_non_empty("deckName", deck)?;
        }
        if self.count == Some(0) {
            return Err(ToolError::invalid("count must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSessionInput {
    pub user_id: String,
    pub topics_studied: Vec<String>,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub quiz_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LogSessionInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("userId", &self.user_id)?;
        if self.topics_studied.is_empty() {
            return Err(ToolError::invalid("topicsStudied must not be empty"));
        }
        for topic in &self.topics_studied {
            require_non_empty("topic", topic)?;
        }
        require_range(
            "durationMinutes",
            self.duration_minutes,
            1,
            MAX_SESSION_MINUTES,
        )?;
        if let Some(score) = self.quiz_score {
            if !score.is_finite() {
                return Err(ToolError::invalid("quizScore must be a number"));
            }
            require_range("quizScore", score, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    pub user_id: String,
    #[serde(default = "yes")]
    pub include_recommendations: bool,
}

impl ProgressInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("userId", &self.user_id)
    }
}
