//! The seven study tools, backed by a [`StudyStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use interleave_core::catalog::{pattern_catalog, pattern_info, PatternCatalog};
use interleave_core::error::ToolError;
use interleave_core::model::{
    Deck, Flashcard, Pattern, QuizResult, SamplingPolicy, StudySession, UserState,
};
use interleave_core::pattern::PatternEngine;
use interleave_core::progress::{aggregate_progress, ProgressSummary, ProgressThresholds};
use interleave_core::quiz::{assemble_quiz, InterleavedQuiz, QuestionSelection, QuizOptions};
use interleave_core::sampler::sample_flashcards;
use interleave_core::schedule::{build_schedule, Schedule, ScheduleOptions};
use interleave_core::sequencer::RandomSequencer;
use interleave_core::traits::StudyStore;

use crate::input::{
    CreateDeckInput, CreateStudyPlanInput, GenerateQuizInput, LogSessionInput, ProgressInput,
    ShuffledFlashcardsInput,
};

pub const PLAN_TIP: &str =
    "Take a 2-minute break between blocks. Review previous topic briefly before switching.";
pub const QUIZ_INSTRUCTIONS: &str = "Questions are interleaved from different topics. This challenges your brain to identify which concept applies to each question.";
pub const FLASHCARD_TIP: &str =
    "Cards are shuffled across topics. Try to recall the answer before flipping!";
pub const NO_PROGRESS_MESSAGE: &str =
    "No study sessions found. Start studying to track your progress!";

/// Blocks scheduled per study unit.
const BLOCKS_PER_UNIT: usize = 2;

/// Fallbacks for arguments a request leaves out.
#[derive(Debug, Clone)]
pub struct ServiceDefaults {
    pub pattern: Pattern,
    pub questions_per_topic: usize,
}

impl Default for ServiceDefaults {
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            questions_per_topic: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub user_id: String,
    pub pattern: Pattern,
    pub pattern_name: &'static str,
    pub description: &'static str,
    pub total_minutes: u32,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub tip: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSheet {
    #[serde(flatten)]
    pub quiz: InterleavedQuiz,
    pub instructions: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub name: String,
    pub owner: String,
    pub total_cards: usize,
    pub topic_breakdown: BTreeMap<String, usize>,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub number: usize,
    pub topic: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDraw {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    pub policy: SamplingPolicy,
    pub available: usize,
    pub cards: Vec<DrawnCard>,
    pub study_tip: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
    pub logged: Vec<StudySession>,
    pub message: String,
}

/// `progress` is `None` when the user has no sessions yet, with `message`
/// explaining why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub progress: Option<ProgressSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Runs the study tools against a store.
///
/// Pure components (pattern engine, quiz assembler, sampler, aggregator) are
/// called synchronously; only store access awaits. The random sequencer is
/// shared behind a mutex so a seeded service is reproducible call by call.
pub struct StudyService {
    store: Arc<dyn StudyStore>,
    engine: PatternEngine,
    rng: Mutex<RandomSequencer>,
    defaults: ServiceDefaults,
    thresholds: ProgressThresholds,
}

impl StudyService {
    pub fn new(store: Arc<dyn StudyStore>) -> Self {
        Self {
            store,
            engine: PatternEngine::default(),
            rng: Mutex::new(RandomSequencer::new()),
            defaults: ServiceDefaults::default(),
            thresholds: ProgressThresholds::default(),
        }
    }

    /// Use a deterministic random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(RandomSequencer::seeded(seed));
        self
    }

    pub fn with_defaults(mut self, defaults: ServiceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn store(&self) -> &Arc<dyn StudyStore> {
        &self.store
    }

    /// Build an interleaved, timed schedule and remember the subjects.
    pub async fn create_study_plan(
        &self,
        input: CreateStudyPlanInput,
    ) -> Result<StudyPlan, ToolError> {
        input.validate()?;

        let pattern = input
            .pattern
            .as_deref()
            .map(Pattern::resolve)
            .unwrap_or(self.defaults.pattern);
        let units = input.study_units();
        let block_count = (units.len() * BLOCKS_PER_UNIT).min(input.duration_minutes as usize);

        let sequence = {
            let mut rng = self.rng.lock().await;
            self.engine.generate(&units, pattern, block_count, &mut rng)
        };
        let schedule = build_schedule(
            &sequence,
            &ScheduleOptions::new(input.duration_minutes, input.breaks_enabled),
        );

        let subjects = input.subjects.clone();
        self.store
            .upsert(
                &input.user_id,
                Box::new(move |state: &mut UserState| {
                    for subject in &subjects {
                        state.subject_mut(&subject.name).add_topics(&subject.topics);
                    }
                }),
            )
            .await?;

        tracing::info!(
            user = %input.user_id,
            %pattern,
            blocks = schedule.block_count,
            "created study plan"
        );

        let info = pattern_info(pattern);
        Ok(StudyPlan {
            user_id: input.user_id,
            pattern,
            pattern_name: info.name,
            description: info.description,
            total_minutes: input.duration_minutes,
            schedule,
            tip: PLAN_TIP,
        })
    }

    /// Assemble an interleaved quiz. Stateless.
    pub async fn generate_interleaved_quiz(
        &self,
        input: GenerateQuizInput,
    ) -> Result<QuizSheet, ToolError> {
        input.validate()?;

        let selection = match (input.quiz_length, input.questions_per_topic) {
            (Some(total), _) => QuestionSelection::Total(total),
            (None, Some(per_topic)) => QuestionSelection::PerTopic(per_topic),
            (None, None) => QuestionSelection::PerTopic(self.defaults.questions_per_topic),
        };
        let options = QuizOptions {
            selection,
            shuffle_options: input.shuffle_options,
            include_topic_hints: input.include_topic_hints,
        };

        let quiz = {
            let mut rng = self.rng.lock().await;
            assemble_quiz(&input.topics, &options, &mut rng)
        };

        tracing::info!(
            questions = quiz.total_questions,
            topics = quiz.topic_distribution.len(),
            "generated interleaved quiz"
        );
        Ok(QuizSheet {
            quiz,
            instructions: QUIZ_INSTRUCTIONS,
        })
    }

    /// Store a deck under its global name and file every card under the
    /// creator's subjects.
    pub async fn create_flashcard_deck(
        &self,
        input: CreateDeckInput,
    ) -> Result<DeckSummary, ToolError> {
        input.validate()?;

        let deck = Deck::new(
            input.deck_name.clone(),
            Some(input.user_id.clone()),
            input.cards.clone(),
        );
        let breakdown = deck.topic_breakdown();
        let created_at = deck.created_at;

        let cards = input.cards;
        let total_cards = cards.len();
        let mut previous: Option<UserState> = None;
        self.store
            .upsert(
                &input.user_id,
                Box::new(|state: &mut UserState| {
                    previous = Some(state.clone());
                    for card in cards {
                        let topic = card.topic.clone();
                        state.subject_mut(&topic).add_card(card);
                    }
                }),
            )
            .await?;

        if let Err(err) = self.store.put_deck(deck).await {
            // Undo the subject filing so a failed call leaves no trace.
            if let Some(previous) = previous {
                let restored = self
                    .store
                    .upsert(
                        &input.user_id,
                        Box::new(move |state: &mut UserState| *state = previous),
                    )
                    .await;
                if let Err(restore_err) = restored {
                    tracing::warn!(
                        user = %input.user_id,
                        error = %restore_err,
                        "could not roll back subject cards after deck write failed"
                    );
                }
            }
            return Err(err.into());
        }

        tracing::info!(
            user = %input.user_id,
            deck = %input.deck_name,
            cards = total_cards,
            "created flashcard deck"
        );

        Ok(DeckSummary {
            message: format!(
                "Created deck \"{}\" with {} cards from {} topics.",
                input.deck_name,
                total_cards,
                breakdown.len()
            ),
            name: input.deck_name,
            owner: input.user_id,
            total_cards,
            topic_breakdown: breakdown,
            created_at,
        })
    }

    /// Draw cards from a deck or from the user's subjects.
    pub async fn get_shuffled_flashcards(
        &self,
        input: ShuffledFlashcardsInput,
    ) -> Result<FlashcardDraw, ToolError> {
        input.validate()?;

        let policy = match input.pattern.as_deref() {
            Some(name) => name.parse::<SamplingPolicy>().map_err(ToolError::invalid)?,
            None => SamplingPolicy::default(),
        };

        let mut pool = match &input.deck_name {
            Some(name) => self.deck_cards(name).await?,
            None => self.user_cards(&input.user_id).await?,
        };

        if let Some(topics) = input.topics.as_ref().filter(|t| !t.is_empty()) {
            pool.retain(|card| topics.contains(&card.topic));
            if pool.is_empty() {
                return Err(ToolError::EmptyResult(format!(
                    "No flashcards found for topics: {}.",
                    topics.join(", ")
                )));
            }
        }

        let available = pool.len();
        let count = input.count.unwrap_or(available);
        let drawn = {
            let mut rng = self.rng.lock().await;
            sample_flashcards(&pool, count, policy, &mut rng)?
        };

        tracing::info!(
            user = %input.user_id,
            %policy,
            available,
            drawn = drawn.len(),
            "drew flashcards"
        );

        Ok(FlashcardDraw {
            deck_name: input.deck_name,
            policy,
            available,
            cards: drawn
                .into_iter()
                .enumerate()
                .map(|(i, card)| DrawnCard {
                    number: i + 1,
                    topic: card.topic,
                    front: card.front,
                    back: card.back,
                })
                .collect(),
            study_tip: FLASHCARD_TIP,
        })
    }

    async fn deck_cards(&self, name: &str) -> Result<Vec<Flashcard>, ToolError> {
        match self.store.get_deck(name).await? {
            Some(deck) => Ok(deck.cards),
            None => {
                let names = self.store.deck_names().await?;
                let available = if names.is_empty() {
                    "none".to_string()
                } else {
                    names.join(", ")
                };
                Err(ToolError::NotFound(format!(
                    "Deck \"{name}\" not found. Available decks: {available}"
                )))
            }
        }
    }

    async fn user_cards(&self, user_id: &str) -> Result<Vec<Flashcard>, ToolError> {
        let state = self.store.get(user_id).await?.ok_or_else(|| {
            ToolError::NotFound(format!("No study data found for user \"{user_id}\"."))
        })?;
        let cards: Vec<Flashcard> = state
            .subjects
            .into_values()
            .flat_map(|s| s.cards)
            .collect();
        if cards.is_empty() {
            return Err(ToolError::EmptyResult(format!(
                "User \"{user_id}\" has no flashcards yet. Create a deck first."
            )));
        }
        Ok(cards)
    }

    /// Append one session per studied topic, each credited the full duration.
    pub async fn log_study_session(&self, input: LogSessionInput) -> Result<SessionLog, ToolError> {
        input.validate()?;

        let now = Utc::now();
        let sessions: Vec<StudySession> = input
            .topics_studied
            .iter()
            .map(|topic| StudySession {
                id: Uuid::new_v4(),
                topic: topic.clone(),
                duration_minutes: input.duration_minutes,
                date: now,
                quiz_score: input.quiz_score,
                notes: input.notes.clone(),
            })
            .collect();

        let logged = sessions.clone();
        self.store
            .upsert(
                &input.user_id,
                Box::new(move |state: &mut UserState| {
                    for session in logged {
                        let subject = state.subject_mut(&session.topic);
                        if let Some(score) = session.quiz_score {
                            subject.quiz_results.push(QuizResult {
                                date: session.date,
                                score,
                                topic: session.topic.clone(),
                            });
                        }
                        state.sessions.push(session);
                    }
                }),
            )
            .await?;

        let studied = input.topics_studied.join(", ");
        let message = match input.quiz_score {
            Some(score) => format!(
                "Logged {} minutes of {} study with {}% quiz score.",
                input.duration_minutes, studied, score
            ),
            None => format!("Logged {} minutes of {} study.", input.duration_minutes, studied),
        };

        tracing::info!(
            user = %input.user_id,
            topics = sessions.len(),
            minutes = input.duration_minutes,
            "logged study session"
        );
        Ok(SessionLog {
            logged: sessions,
            message,
        })
    }

    /// Per-topic statistics and recommendations, or the no-data message.
    pub async fn get_learning_progress(
        &self,
        input: ProgressInput,
    ) -> Result<ProgressReport, ToolError> {
        input.validate()?;

        let state = match self.store.get(&input.user_id).await? {
            Some(state) if !state.sessions.is_empty() => state,
            _ => {
                tracing::info!(user = %input.user_id, "no study sessions logged yet");
                return Ok(ProgressReport {
                    progress: None,
                    message: Some(NO_PROGRESS_MESSAGE.to_string()),
                });
            }
        };

        let known: Vec<String> = state.subjects.keys().cloned().collect();
        let mut summary = aggregate_progress(
            &state.sessions,
            &known,
            &state.card_counts(),
            Utc::now(),
            &self.thresholds,
        );
        if !input.include_recommendations {
            summary.recommendations.clear();
        }

        tracing::info!(
            user = %input.user_id,
            sessions = summary.total_sessions,
            topics = summary.topics.len(),
            "computed learning progress"
        );
        Ok(ProgressReport {
            progress: Some(summary),
            message: None,
        })
    }

    /// The static pattern catalog.
    pub fn get_interleaving_patterns(&self) -> PatternCatalog {
        pattern_catalog()
    }
}
