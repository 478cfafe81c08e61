//! Interleaving sequence generation.
//!
//! Turns an ordered list of topics and a [`Pattern`] into a sequence of
//! exactly the requested length. Topics are drawn with replacement, so any
//! length can be produced from any non-empty topic list.

use crate::model::Pattern;
use crate::sequencer::RandomSequencer;

/// Tunable constants for the block-based patterns.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    /// Repeats of each topic per round in `systematic_extended`.
    pub block_size: usize,
    /// Run length of each topic during the `front_loaded` deep-study phase.
    pub deep_study_size: usize,
    /// Share of the sequence (in percent) covered by the deep-study phase.
    pub front_load_percent: usize,
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self {
            block_size: 2,
            deep_study_size: 3,
            front_load_percent: 70,
        }
    }
}

impl PatternEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a sequence of `total` items drawn from `topics`.
    ///
    /// An empty `topics` slice yields an empty sequence.
    pub fn generate<T: Clone>(
        &self,
        topics: &[T],
        pattern: Pattern,
        total: usize,
        rng: &mut RandomSequencer,
    ) -> Vec<T> {
        self.generate_indices(topics.len(), pattern, total, rng)
            .into_iter()
            .map(|i| topics[i].clone())
            .collect()
    }

    /// Same as [`generate`](Self::generate) but returns positions into a
    /// topic list of length `n`.
    pub fn generate_indices(
        &self,
        n: usize,
        pattern: Pattern,
        total: usize,
        rng: &mut RandomSequencer,
    ) -> Vec<usize> {
        if n == 0 {
            return Vec::new();
        }

        let indices = match pattern {
            Pattern::Random => (0..total).map(|_| rng.draw(n)).collect(),
            Pattern::SystematicShort => (0..total).map(|i| i % n).collect(),
            Pattern::SystematicExtended => {
                let block = self.block_size.max(1);
                (0..total).map(|i| (i / block) % n).collect()
            }
            Pattern::FrontLoaded => self.front_loaded(n, total),
            Pattern::Spaced => {
                // Topic at position idx has weight n - idx.
                let weight_sum = n * (n + 1) / 2;
                (0..total)
                    .map(|_| spaced_index(n, rng.draw(weight_sum)))
                    .collect()
            }
            Pattern::PairwiseMixing => (0..total).map(|i| pairwise_index(n, i)).collect(),
            Pattern::ShuffledRounds => {
                let rounds = total.div_ceil(n);
                let mut pool: Vec<usize> = (0..rounds * n).map(|i| i % n).collect();
                rng.shuffle(&mut pool);
                pool.truncate(total);
                pool
            }
            Pattern::BlockedToInterleaved => {
                let mut out: Vec<usize> = (0..n).collect();
                while out.len() < total {
                    let mut round: Vec<usize> = (0..n).collect();
                    rng.shuffle(&mut round);
                    out.extend(round);
                }
                out.truncate(total);
                out
            }
        };

        tracing::debug!(%pattern, topics = n, total, "generated interleaving sequence");
        indices
    }

    fn front_loaded(&self, n: usize, total: usize) -> Vec<usize> {
        let run = self.deep_study_size.max(1);
        let mut out = Vec::with_capacity(total);

        let mut topic = 0;
        while out.len() * 100 < total * self.front_load_percent {
            out.extend(std::iter::repeat(topic % n).take(run));
            topic += 1;
        }
        out.truncate(total);

        let mut filler = 0;
        while out.len() < total {
            out.push(filler % n);
            filler += 1;
        }
        out
    }
}

/// Topic whose weight band contains `ticket`, where topic `idx` covers
/// `n - idx` consecutive tickets.
fn spaced_index(n: usize, ticket: usize) -> usize {
    // Tickets owned by topics before `k`.
    let before = |k: usize| k * n - k * (k.saturating_sub(1)) / 2;
    let (mut lo, mut hi) = (0, n - 1);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if before(mid) <= ticket {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Position `i` of the flattened sequence of every unordered pair:
/// A B A C B C for three topics, repeating.
fn pairwise_index(n: usize, i: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let step = i % (n * (n - 1));
    let mut pair = step / 2;
    for first in 0..n {
        let row = n - 1 - first;
        if pair < row {
            return if step % 2 == 0 { first } else { first + 1 + pair };
        }
        pair -= row;
    }
    0
}
