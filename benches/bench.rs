// Criterion benchmarks for the JobDeck review engine

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jobdeck::core::{GestureCommitter, MatchDeck, SearchDebouncer};
use jobdeck::models::{CandidateKind, CardAttributes, MatchCandidate};
use tokio::time::Instant;

fn create_candidate(id: usize) -> MatchCandidate {
    MatchCandidate {
        id: format!("j-{:04}", id),
        kind: CandidateKind::Job,
        score: (id % 101) as u8,
        attributes: CardAttributes {
            title: format!("Job {}", id),
            subtitle: "Acme Corp".to_string(),
            tags: vec!["Rust".to_string(), "Tokio".to_string()],
            description: None,
            avatar_url: None,
        },
    }
}

fn bench_deck_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck_replace");
    for size in [10, 100, 1000] {
        let cards: Vec<MatchCandidate> = (0..size).map(create_candidate).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &cards, |b, cards| {
            b.iter(|| {
                let mut deck = MatchDeck::new();
                deck.replace(black_box(cards.clone()));
                deck.len()
            });
        });
    }
    group.finish();
}

fn bench_deck_drain(c: &mut Criterion) {
    let cards: Vec<MatchCandidate> = (0..100).map(create_candidate).collect();
    c.bench_function("deck_drain_100", |b| {
        b.iter(|| {
            let mut deck = MatchDeck::new();
            deck.replace(cards.clone());
            while deck.peek_top().is_some() {
                deck.pop_top();
            }
            deck.len()
        });
    });
}

fn bench_gesture_cycle(c: &mut Criterion) {
    c.bench_function("gesture_commit_cycle", |b| {
        let mut committer = GestureCommitter::new(100.0);
        b.iter(|| {
            committer.drag_start();
            for step in 0..16 {
                committer.drag_move(black_box(step as f64 * 10.0));
            }
            let decision = committer.drag_end();
            committer.reset();
            decision
        });
    });
}

fn bench_debounce_burst(c: &mut Criterion) {
    c.bench_function("debounce_burst_32_keys", |b| {
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(250));
        let t0 = Instant::now();
        b.iter(|| {
            let mut now = t0;
            for _ in 0..32 {
                now += Duration::from_millis(10);
                debouncer.on_input(black_box("rust engineer"), now);
            }
            debouncer.fire(now + Duration::from_millis(250))
        });
    });
}

criterion_group!(
    benches,
    bench_deck_replace,
    bench_deck_drain,
    bench_gesture_cycle,
    bench_debounce_burst
);
criterion_main!(benches);
