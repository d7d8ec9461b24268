// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for gallery state transitions.
//!
//! Measures the performance of:
//! - Loading (stable sort by position)
//! - Navigation operations (next/previous)
//! - Reordering (drag-and-drop move with position renumbering)

use bucket_roster::domain::gallery::{GalleryItem, GalleryState, ItemMetadata, Position};
use bucket_roster::domain::storage::ObjectSummary;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn items(count: usize) -> Vec<GalleryItem> {
    (0..count)
        .map(|index| {
            // Reverse positions so loading has real sorting to do.
            let position = u32::try_from(count - index).unwrap_or(u32::MAX);
            GalleryItem::from_summary(
                ObjectSummary::new(format!("roster/{index:05}.jpg"), 1024),
                "https://tabs.example.com",
                ItemMetadata::new(format!("Member {index}"), Position::new(position)),
            )
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("gallery_navigation");
    let loaded = items(1000);

    group.bench_function("finish_loading_1k", |b| {
        b.iter(|| {
            let mut state = GalleryState::new();
            state.finish_loading(loaded.clone());
            black_box(&state);
        });
    });

    group.finish();
}

fn bench_navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("gallery_navigation");
    let state = GalleryState::with_items(items(1000));

    group.bench_function("next_wrapping", |b| {
        let mut state = state.clone();
        b.iter(|| {
            state.next();
            black_box(state.current_index());
        });
    });

    group.bench_function("previous_wrapping", |b| {
        let mut state = state.clone();
        b.iter(|| {
            state.previous();
            black_box(state.current_index());
        });
    });

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("gallery_navigation");
    let state = GalleryState::with_items(items(1000));

    group.bench_function("reorder_first_to_last_1k", |b| {
        let mut state = state.clone();
        b.iter(|| {
            let changed = state.reorder(0, 999).expect("indices in range");
            black_box(changed);
        });
    });

    group.bench_function("swap_neighbours_1k", |b| {
        let mut state = state.clone();
        b.iter(|| {
            let changed = state.swap(500, 501).expect("indices in range");
            black_box(changed);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_navigate, bench_reorder);
criterion_main!(benches);
