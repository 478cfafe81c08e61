//! Per-topic study statistics and recommendation triggers.
//!
//! Folds a user's chronological session log into per-topic totals, then runs
//! a fixed checklist of heuristics over those totals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::StudySession;

/// Thresholds used by the recommendation checklist.
#[derive(Debug, Clone)]
pub struct ProgressThresholds {
    /// Least-studied topic below this many minutes needs more time.
    pub min_minutes: u64,
    /// Average quiz score below this is flagged for review.
    pub review_score: f64,
    /// Topics untouched for more than this many days need a spaced review.
    pub stale_after_days: i64,
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self {
            min_minutes: 60,
            review_score: 70.0,
            stale_after_days: 3,
        }
    }
}

/// Statistics for a single topic across the session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub topic: String,
    pub total_minutes: u64,
    pub session_count: usize,
    /// Mean of every quiz score logged for the topic.
    pub average_score: Option<f64>,
    pub last_studied: Option<DateTime<Utc>>,
    pub flashcard_count: usize,
}

/// Aggregated progress for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_sessions: usize,
    pub total_minutes: u64,
    pub topics: Vec<TopicStats>,
    pub recommendations: Vec<String>,
}

/// Aggregate `sessions` into per-topic statistics.
///
/// Topics appear in order of first session; `known_topics` that were never
/// studied are appended with zero totals. `card_counts` maps topic to the
/// number of flashcards the user holds for it.
pub fn aggregate_progress(
    sessions: &[StudySession],
    known_topics: &[String],
    card_counts: &HashMap<String, usize>,
    now: DateTime<Utc>,
    thresholds: &ProgressThresholds,
) -> ProgressSummary {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<&str, (u64, usize, Vec<f64>, Option<DateTime<Utc>>)> = HashMap::new();

    for session in sessions {
        let entry = totals.entry(session.topic.as_str()).or_insert_with(|| {
            order.push(session.topic.clone());
            (0, 0, Vec::new(), None)
        });
        entry.0 += u64::from(session.duration_minutes);
        entry.1 += 1;
        if let Some(score) = session.quiz_score {
            entry.2.push(score);
        }
        entry.3 = Some(match entry.3 {
            Some(last) if last >= session.date => last,
            _ => session.date,
        });
    }

    for topic in known_topics {
        if !totals.contains_key(topic.as_str()) && !order.contains(topic) {
            order.push(topic.clone());
        }
    }

    let topics: Vec<TopicStats> = order
        .into_iter()
        .map(|topic| {
            let (total_minutes, session_count, scores, last_studied) = totals
                .get(topic.as_str())
                .cloned()
                .unwrap_or((0, 0, Vec::new(), None));
            let average_score = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            TopicStats {
                flashcard_count: card_counts.get(&topic).copied().unwrap_or(0),
                topic,
                total_minutes,
                session_count,
                average_score,
                last_studied,
            }
        })
        .collect();

    let recommendations = recommend(&topics, now, thresholds);

    ProgressSummary {
        total_sessions: sessions.len(),
        total_minutes: topics.iter().map(|t| t.total_minutes).sum(),
        topics,
        recommendations,
    }
}

/// Run the recommendation checklist. Every rule that triggers contributes,
/// in rule order.
pub fn recommend(
    topics: &[TopicStats],
    now: DateTime<Utc>,
    thresholds: &ProgressThresholds,
) -> Vec<String> {
    let mut out = Vec::new();

    // Stable sort: ties keep log order, first wins.
    let mut by_minutes: Vec<&TopicStats> = topics.iter().collect();
    by_minutes.sort_by_key(|t| t.total_minutes);
    if let Some(least) = by_minutes.first() {
        if least.total_minutes < thresholds.min_minutes {
            out.push(format!(
                "Spend more time on {}: only {} minutes studied so far (aim for at least {}).",
                least.topic, least.total_minutes, thresholds.min_minutes
            ));
        }
    }

    for t in topics {
        if let Some(avg) = t.average_score {
            if avg < thresholds.review_score {
                out.push(format!(
                    "Review {}: average quiz score is {:.0}%, below the {:.0}% target.",
                    t.topic, avg, thresholds.review_score
                ));
            }
        }
    }

    if topics.len() >= 2 {
        out.push(format!(
            "Keep interleaving your {} topics: mixing them strengthens your ability to tell concepts apart.",
            topics.len()
        ));
    }

    for t in topics.iter().filter(|t| t.flashcard_count == 0) {
        out.push(format!(
            "Create flashcards for {} to add retrieval practice.",
            t.topic
        ));
    }

    for t in topics {
        // Never-studied topics have no meaningful elapsed time.
        let Some(last) = t.last_studied else {
            continue;
        };
        let days = (now - last).num_days();
        if days > thresholds.stale_after_days {
            out.push(format!(
                "Time for a spaced review of {}: last studied {} days ago.",
                t.topic, days
            ));
        }
    }

    out
}
