//! Interleaved quiz assembly.
//!
//! Selects questions across topics, mixes them into a single presentation
//! order and produces an answer key aligned with that order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuizTopic};
use crate::sequencer::RandomSequencer;

/// How many questions make it into the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSelection {
    /// The first `n` questions of every topic, then a global shuffle.
    PerTopic(usize),
    /// Pool every question, shuffle, keep the first `n`.
    Total(usize),
}

#[derive(Debug, Clone)]
pub struct QuizOptions {
    pub selection: QuestionSelection,
    pub shuffle_options: bool,
    pub include_topic_hints: bool,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            selection: QuestionSelection::PerTopic(3),
            shuffle_options: false,
            include_topic_hints: true,
        }
    }
}

/// A question as presented to the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKeyEntry {
    pub number: usize,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterleavedQuiz {
    pub total_questions: usize,
    pub questions: Vec<QuizItem>,
    pub answer_key: Vec<AnswerKeyEntry>,
    pub topic_distribution: BTreeMap<String, usize>,
}

/// Assemble an interleaved quiz. Asking for more questions than exist is
/// not an error: every available question is used.
pub fn assemble_quiz(
    topics: &[QuizTopic],
    options: &QuizOptions,
    rng: &mut RandomSequencer,
) -> InterleavedQuiz {
    let mut selected: Vec<(&str, &Question)> = match options.selection {
        QuestionSelection::PerTopic(per_topic) => topics
            .iter()
            .flat_map(|t| t.questions.iter().take(per_topic).map(move |q| (t.name.as_str(), q)))
            .collect(),
        QuestionSelection::Total(_) => topics
            .iter()
            .flat_map(|t| t.questions.iter().map(move |q| (t.name.as_str(), q)))
            .collect(),
    };

    rng.shuffle(&mut selected);
    if let QuestionSelection::Total(limit) = options.selection {
        selected.truncate(limit);
    }

    let mut questions = Vec::with_capacity(selected.len());
    let mut answer_key = Vec::with_capacity(selected.len());
    let mut topic_distribution = BTreeMap::new();

    for (i, (topic, question)) in selected.into_iter().enumerate() {
        let number = i + 1;
        *topic_distribution.entry(topic.to_string()).or_insert(0) += 1;

        let answer = question.correct_text().map(str::to_string);
        let (presented, correct_index) = if options.shuffle_options && question.options.len() > 1 {
            shuffle_options(question, rng)
        } else {
            (question.options.clone(), question.correct_index)
        };

        questions.push(QuizItem {
            number,
            topic: options.include_topic_hints.then(|| topic.to_string()),
            question: question.question.clone(),
            options: presented,
        });
        answer_key.push(AnswerKeyEntry {
            number,
            topic: topic.to_string(),
            correct_index,
            answer,
        });
    }

    tracing::debug!(
        questions = questions.len(),
        topics = topic_distribution.len(),
        "assembled interleaved quiz"
    );

    InterleavedQuiz {
        total_questions: questions.len(),
        questions,
        answer_key,
        topic_distribution,
    }
}

/// Permute the options and carry the correct index through the permutation.
fn shuffle_options(question: &Question, rng: &mut RandomSequencer) -> (Vec<String>, Option<usize>) {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    rng.shuffle(&mut order);

    let options = order.iter().map(|&i| question.options[i].clone()).collect();
    let correct_index = question
        .correct_index
        .and_then(|correct| order.iter().position(|&i| i == correct));
    (options, correct_index)
}
