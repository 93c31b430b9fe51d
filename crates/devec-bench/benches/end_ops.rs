//! Criterion micro-benchmarks for push/pop at both ends.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use devec::Devector;
use devec_bench::{alternating_fill, PROFILE_LEN};
use devec_test_utils::PinnedAlloc;

fn bench_push_back_10k(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back_10k");
    group.bench_function("devector", |b| {
        b.iter(|| {
            let mut v = Devector::new();
            for i in 0..PROFILE_LEN as u64 {
                v.push_back(black_box(i)).unwrap();
            }
            black_box(v.len());
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut v = Vec::new();
            for i in 0..PROFILE_LEN as u64 {
                v.push(black_box(i));
            }
            black_box(v.len());
        });
    });
    group.finish();
}

fn bench_push_front_10k(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_front_10k");
    group.bench_function("devector", |b| {
        b.iter(|| {
            let mut v = Devector::new();
            for i in 0..PROFILE_LEN as u64 {
                v.push_front(black_box(i)).unwrap();
            }
            black_box(v.len());
        });
    });
    group.bench_function("vecdeque", |b| {
        b.iter(|| {
            let mut v = VecDeque::new();
            for i in 0..PROFILE_LEN as u64 {
                v.push_front(black_box(i));
            }
            black_box(v.len());
        });
    });
    group.finish();
}

fn bench_alternating_with_tracking_alloc(c: &mut Criterion) {
    c.bench_function("alternating_tracking_10k", |b| {
        b.iter(|| {
            let alloc = PinnedAlloc::new(0);
            let mut v = Devector::new_in(alloc);
            for i in 0..PROFILE_LEN as u64 {
                if i % 2 == 0 {
                    v.push_back(black_box(i)).unwrap();
                } else {
                    v.push_front(black_box(i)).unwrap();
                }
            }
            black_box(v.len());
        });
    });
}

fn bench_drain_both_ends_10k(c: &mut Criterion) {
    c.bench_function("drain_both_ends_10k", |b| {
        b.iter_batched(
            || alternating_fill(PROFILE_LEN),
            |mut v| {
                let mut sum = 0u64;
                while let Some(x) = v.pop_front() {
                    sum = sum.wrapping_add(x);
                    if let Some(y) = v.pop_back() {
                        sum = sum.wrapping_add(y);
                    }
                }
                black_box(sum);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_push_back_10k,
    bench_push_front_10k,
    bench_alternating_with_tracking_alloc,
    bench_drain_both_ends_10k,
);
criterion_main!(benches);
