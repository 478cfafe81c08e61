//! Flashcard sampling across a topic-partitioned pool.

use crate::error::ToolError;
use crate::model::{Flashcard, SamplingPolicy};
use crate::sequencer::RandomSequencer;

/// Draw up to `count` cards from `pool` without replacement.
///
/// Returns [`ToolError::EmptyResult`] when the pool is empty, so callers can
/// tell "nothing to show" apart from a legitimate short draw.
pub fn sample_flashcards(
    pool: &[Flashcard],
    count: usize,
    policy: SamplingPolicy,
    rng: &mut RandomSequencer,
) -> Result<Vec<Flashcard>, ToolError> {
    if pool.is_empty() {
        return Err(ToolError::EmptyResult("No flashcards found.".into()));
    }

    let target = count.min(pool.len());
    let cards = match policy {
        SamplingPolicy::Random => {
            let mut cards = pool.to_vec();
            rng.shuffle(&mut cards);
            cards.truncate(target);
            cards
        }
        SamplingPolicy::Systematic => {
            let mut cards = pool.to_vec();
            cards.sort_by(|a, b| a.topic.cmp(&b.topic));
            cards.truncate(target);
            cards
        }
        SamplingPolicy::Balanced => balanced(pool, target, rng),
    };

    tracing::debug!(%policy, pool = pool.len(), drawn = cards.len(), "sampled flashcards");
    Ok(cards)
}

/// Round-robin over topics in order of first appearance, taking one random
/// remaining card from each topic per turn.
fn balanced(pool: &[Flashcard], target: usize, rng: &mut RandomSequencer) -> Vec<Flashcard> {
    let mut groups: Vec<(&str, Vec<&Flashcard>)> = Vec::new();
    for card in pool {
        match groups.iter_mut().find(|(topic, _)| *topic == card.topic) {
            Some((_, cards)) => cards.push(card),
            None => groups.push((card.topic.as_str(), vec![card])),
        }
    }

    let mut out = Vec::with_capacity(target);
    let mut turn = 0;
    while out.len() < target {
        let slot = turn % groups.len();
        let (_, remaining) = &mut groups[slot];
        turn += 1;
        if remaining.is_empty() {
            continue;
        }
        let pick = rng.draw(remaining.len());
        out.push(remaining.swap_remove(pick).clone());
    }
    out
}
