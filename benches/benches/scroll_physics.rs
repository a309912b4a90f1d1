// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_scroll::{FlingCalculator, ScrollConfig, ScrollPhysics};

fn bench_fling_info(c: &mut Criterion) {
    let calc = FlingCalculator::new(FlingCalculator::DEFAULT_FRICTION, 2.625);
    c.bench_function("fling_info", |b| {
        b.iter(|| black_box(calc.fling_info(black_box(4200.0))));
    });
}

fn bench_fling_to_rest(c: &mut Criterion) {
    c.bench_function("fling_to_rest", |b| {
        b.iter(|| {
            let mut physics = ScrollPhysics::new(ScrollConfig::default());
            physics.set_viewport_height(1920.0);
            physics.set_content(12_000.0, 60);
            physics.fling(black_box(6000.0), 0);
            let mut now = 0;
            while physics.compute_scroll(now) {
                now += 16;
                physics.drain_effects().for_each(drop);
            }
            black_box(physics.scroll_y())
        });
    });
}

fn bench_drag(c: &mut Criterion) {
    c.bench_function("drag_past_edges", |b| {
        b.iter(|| {
            let mut physics = ScrollPhysics::new(ScrollConfig::default());
            physics.set_viewport_height(1920.0);
            physics.set_content(4000.0, 20);
            for _ in 0..200 {
                physics.scroll_by(black_box(25.0));
            }
            for _ in 0..200 {
                physics.scroll_by(black_box(-25.0));
            }
            physics.end_drag();
            black_box(physics.drain_effects().count())
        });
    });
}

criterion_group!(benches, bench_fling_info, bench_fling_to_rest, bench_drag);
criterion_main!(benches);
