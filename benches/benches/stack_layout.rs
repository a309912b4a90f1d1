// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_stack::{
    AlgorithmScratch, AmbientState, Edge, ItemId, ItemList, LiveProperties, NotificationStack,
    StackConfig, StackScrollAlgorithm, ViewStateStore,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // xorshift64*
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }

    fn height(&mut self) -> f64 {
        64.0 + f64::from(self.next_u32() % 192)
    }
}

fn gen_items(n: usize, seed: u64) -> (ItemList<f64>, Vec<ItemId>) {
    let mut rng = Rng::new(seed);
    let mut items = ItemList::new();
    let ids = (0..n)
        .map(|_| {
            let h = rng.height();
            items.push(h, LiveProperties::with_height(h))
        })
        .collect();
    (items, ids)
}

fn algorithm() -> StackScrollAlgorithm {
    StackScrollAlgorithm {
        padding_between_elements: 8.0,
        corner_radius: 2.0,
        layout_height: 1920.0,
        ..StackScrollAlgorithm::default()
    }
}

fn bench_compute_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_state");
    for &n in &[16_usize, 128, 1024] {
        let (items, ids) = gen_items(n, 0x5eed);
        let algo = algorithm();
        let mut ambient = AmbientState::new();
        ambient.set_scroll_y(400);
        ambient.set_overscroll_amount(Edge::Top, 12.0);
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| {
                algo.compute_state(black_box(&ambient), &items, &mut store, &mut scratch);
                black_box(store.len())
            });
        });

        ambient.set_dragged_items(ids.iter().step_by(7).copied());
        group.bench_function(format!("n={n}/dragged"), |b| {
            b.iter(|| {
                algo.compute_state(black_box(&ambient), &items, &mut store, &mut scratch);
                black_box(store.len())
            });
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    for &n in &[16_usize, 128, 1024] {
        let (items, _) = gen_items(n, 0xa991);
        let algo = algorithm();
        let mut ambient = AmbientState::new();
        ambient.set_scroll_y(250);
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        algo.compute_state(&ambient, &items, &mut store, &mut scratch);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("n={n}/fresh"), |b| {
            b.iter_batched(
                || items.clone(),
                |mut items| black_box(store.apply(&mut items)),
                BatchSize::SmallInput,
            );
        });

        let mut applied = items.clone();
        store.apply(&mut applied);
        group.bench_function(format!("n={n}/unchanged"), |b| {
            b.iter(|| black_box(store.apply(&mut applied)));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    for &n in &[16_usize, 128] {
        let mut rng = Rng::new(0xf00d);
        let mut stack: NotificationStack<f64> = NotificationStack::new(StackConfig::default());
        stack.set_viewport(1080.0, 1920.0);
        for _ in 0..n {
            stack.add_item(rng.height());
        }
        stack.frame(0);
        let mut now = 0_u64;
        group.bench_function(format!("n={n}/scroll"), |b| {
            b.iter(|| {
                now += 16;
                stack.on_scroll_delta(black_box(3.0));
                black_box(stack.frame(now))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_state, bench_apply, bench_frame);
criterion_main!(benches);
