use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fixture_engine::draw::{
    generate_double_elimination, generate_round_robin, generate_single_elimination,
};
use fixture_engine::participants::{Participant, SeedingMethod, UserId};
use fixture_engine::standings::calculate_standings;
use fixture_engine::tournament::{MatchIdSequence, MatchScore, MatchStatus, ScoringWeights};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn field(n: usize) -> Vec<Participant> {
    (1..=n as i64)
        .map(|i| Participant::new(i, format!("player{i}")).with_seed(i as u32))
        .collect()
}

/// Benchmark single elimination brackets across field sizes
fn bench_single_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_elimination");

    for size in [8, 33, 128, 1000] {
        let participants = field(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &participants, |b, participants| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| generate_single_elimination(black_box(participants), SeedingMethod::Random, &mut rng))
        });
    }

    group.finish();
}

/// Benchmark double elimination brackets, including starved lower nodes
fn bench_double_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_elimination");

    for size in [8, 33, 128] {
        let participants = field(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &participants, |b, participants| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| generate_double_elimination(black_box(participants), SeedingMethod::Seeded, &mut rng))
        });
    }

    group.finish();
}

/// Benchmark round robin fixture generation
fn bench_round_robin(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_robin");

    for size in [4, 20, 64] {
        let entrants: Vec<UserId> = (1..=size as i64).map(UserId).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &entrants, |b, entrants| {
            b.iter(|| {
                let mut seq = MatchIdSequence::default();
                generate_round_robin(black_box(entrants), 2, None, &mut seq)
            })
        });
    }

    group.finish();
}

/// Benchmark a full league table recomputation
fn bench_standings(c: &mut Criterion) {
    let participants = field(20);
    let ids: Vec<UserId> = participants.iter().map(|p| p.id).collect();
    let mut seq = MatchIdSequence::default();
    let mut matches = generate_round_robin(&ids, 2, None, &mut seq);
    for (i, game) in matches.iter_mut().enumerate() {
        let goals = (i % 5) as u32;
        game.score = Some(MatchScore::new(goals, 4 - goals));
        game.winner = match goals.cmp(&2) {
            std::cmp::Ordering::Less => game.participant2,
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => game.participant1,
        };
        game.status = MatchStatus::Completed;
    }
    let weights = ScoringWeights::default();

    c.bench_function("standings_20_players_double_leg", |b| {
        b.iter(|| calculate_standings(black_box(&matches), black_box(&participants), &weights))
    });
}

criterion_group!(
    benches,
    bench_single_elimination,
    bench_double_elimination,
    bench_round_robin,
    bench_standings,
);
criterion_main!(benches);
