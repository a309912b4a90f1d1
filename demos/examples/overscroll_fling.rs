// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overscroll and fling.
//!
//! Pull past the top with the pointer, release upward, and watch the fling fold
//! the overscroll into the scroll position and settle inside the range.
//!
//! Run:
//! - `cargo run -p understory_demos --example overscroll_fling`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use understory_stack::{Edge, NotificationStack, StackConfig, StackHost};

#[derive(Default)]
struct Log {
    lines: Vec<String>,
}

struct PrintingHost(Rc<RefCell<Log>>);

impl StackHost for PrintingHost {
    fn on_overscroll_changed(&mut self, amount: f64, rubberbanded: bool) {
        self.0
            .borrow_mut()
            .lines
            .push(format!("top overscroll {amount:.1} (rubberbanded: {rubberbanded})"));
    }

    fn on_overscroll_fling(&mut self, velocity: f64, wants_open: bool) {
        self.0
            .borrow_mut()
            .lines
            .push(format!("overscroll fling {velocity:.0} px/s (open: {wants_open})"));
    }
}

fn main() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut stack: NotificationStack<f64> = NotificationStack::new(StackConfig::default());
    stack.set_host(Box::new(PrintingHost(log.clone())));
    stack.set_viewport(400.0, 600.0);
    for i in 0..12 {
        stack.add_item(80.0 + f64::from(i % 3) * 24.0);
    }
    let mut now = 0;
    stack.frame(now);

    // Press, then drag down past the top edge.
    stack.on_pointer_down(Point::new(200.0, 100.0));
    for step in 1..=10 {
        now += 16;
        stack.on_pointer_move(Point::new(200.0, 100.0 + f64::from(step) * 15.0));
        stack.frame(now);
    }
    println!(
        "after pull: scroll={} top overscroll={:.1}",
        stack.physics().scroll_y(),
        stack.physics().overscroll_amount(Edge::Top)
    );

    // Release with the finger moving up: scrolls forward.
    stack.on_pointer_up(-3000.0);
    loop {
        now += 16;
        let report = stack.frame(now);
        if !report.flinging {
            break;
        }
    }
    println!(
        "after fling: scroll={} of {} top={:.1} bottom={:.1}",
        stack.physics().scroll_y(),
        stack.physics().scroll_range(),
        stack.physics().overscroll_amount(Edge::Top),
        stack.physics().overscroll_amount(Edge::Bottom)
    );

    for line in &log.borrow().lines {
        println!("  host: {line}");
    }
}
