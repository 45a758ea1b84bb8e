//! Criterion benchmarks for postlist intersection and top-k matching.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use postlist::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const COLLECTION_SIZE: DocId = 100_000;

/// Generate a weighted posting list covering roughly `density` of the collection.
fn generate_postings(rng: &mut StdRng, density: f64) -> Vec<(DocId, Weight)> {
    (1..=COLLECTION_SIZE)
        .filter_map(|did| {
            rng.random_bool(density)
                .then(|| (did, rng.random_range(0.0..5.0)))
        })
        .collect()
}

fn build_and(
    left: &[(DocId, Weight)],
    right: &[(DocId, Weight)],
    observer: Option<std::sync::Arc<dyn PruneObserver>>,
) -> BoxedPostList {
    Box::new(AndPostList::new(
        Box::new(VecPostList::from_weighted("left", left).unwrap()),
        Box::new(VecPostList::from_weighted("right", right).unwrap()),
        observer,
        COLLECTION_SIZE,
        true,
    ))
}

fn bench_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("and_intersection");
    let mut rng = StdRng::seed_from_u64(42);

    for (left_density, right_density) in [(0.01, 0.5), (0.1, 0.1), (0.5, 0.5)] {
        let left = generate_postings(&mut rng, left_density);
        let right = generate_postings(&mut rng, right_density);
        group.throughput(Throughput::Elements((left.len() + right.len()) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{left_density}x{right_density}")),
            &(left, right),
            |b, (left, right)| {
                b.iter(|| {
                    let mut and = build_and(left, right, None);
                    let mut matched = 0usize;
                    loop {
                        and.advance(0.0).unwrap();
                        if and.current_id().is_none() {
                            break;
                        }
                        matched += 1;
                    }
                    black_box(matched)
                });
            },
        );
    }

    group.finish();
}

fn bench_skip_to(c: &mut Criterion) {
    let mut group = c.benchmark_group("and_skip_to");
    let mut rng = StdRng::seed_from_u64(7);
    let left = generate_postings(&mut rng, 0.3);
    let right = generate_postings(&mut rng, 0.3);

    group.bench_function("stride_1000", |b| {
        b.iter(|| {
            let mut and = build_and(&left, &right, None);
            let mut target = 1;
            while !and.is_exhausted() {
                and.skip_to(target, 0.0).unwrap();
                target += 1000;
            }
            black_box(target)
        });
    });

    group.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher_top_k");
    group.sample_size(20);
    let mut rng = StdRng::seed_from_u64(1234);
    let left = generate_postings(&mut rng, 0.4);
    let right = generate_postings(&mut rng, 0.4);

    for limit in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(limit), &limit, |b, &limit| {
            b.iter(|| {
                let matcher = Matcher::new(MatchConfig::new(limit));
                let mut root = build_and(&left, &right, Some(matcher.observer()));
                black_box(matcher.run(&mut root).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_intersection, bench_skip_to, bench_top_k);
criterion_main!(benches);
