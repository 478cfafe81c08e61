use criterion::{black_box, criterion_group, criterion_main, Criterion};

use interleave_core::model::{Flashcard, Pattern, SamplingPolicy};
use interleave_core::pattern::PatternEngine;
use interleave_core::sampler::sample_flashcards;
use interleave_core::sequencer::RandomSequencer;

fn topics(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("topic-{i}")).collect()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let engine = PatternEngine::default();
    let five = topics(5);
    let twenty = topics(20);

    for pattern in Pattern::ALL {
        group.bench_function(format!("{pattern}/5x100"), |b| {
            let mut rng = RandomSequencer::seeded(42);
            b.iter(|| engine.generate(black_box(&five), pattern, black_box(100), &mut rng))
        });
    }

    group.bench_function("pairwise_mixing/20x1000", |b| {
        let mut rng = RandomSequencer::seeded(42);
        b.iter(|| {
            engine.generate(
                black_box(&twenty),
                Pattern::PairwiseMixing,
                black_box(1000),
                &mut rng,
            )
        })
    });

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_flashcards");

    let pool: Vec<Flashcard> = (0..500)
        .map(|i| Flashcard::new(format!("q{i}"), format!("a{i}"), format!("topic-{}", i % 7)))
        .collect();

    for policy in SamplingPolicy::ALL {
        group.bench_function(format!("{policy}/500->50"), |b| {
            let mut rng = RandomSequencer::seeded(7);
            b.iter(|| sample_flashcards(black_box(&pool), black_box(50), policy, &mut rng))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_sampling);
criterion_main!(benches);
