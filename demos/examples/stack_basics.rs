// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack basics.
//!
//! Add a few items, scroll, drag one aside, and dismiss it.
//!
//! Run:
//! - `cargo run -p understory_demos --example stack_basics`

use kurbo::Point;
use understory_stack::{HeightProvider, NotificationStack, StackConfig};

/// A card whose height depends on how many lines it shows.
struct Card {
    title: &'static str,
    lines: u32,
}

impl HeightProvider for Card {
    fn intrinsic_height(&self) -> f64 {
        48.0 + 20.0 * f64::from(self.lines)
    }
}

fn dump(stack: &NotificationStack<Card>, label: &str) {
    println!("== {label} ==");
    for (_, item) in stack.items().iter() {
        let live = &item.live;
        println!(
            "  {:<10} y={:>7.1} h={:>5.1} alpha={:.2} clip={:.1}{}",
            item.content.title,
            live.translation_y,
            live.height,
            live.alpha,
            live.clip_top_amount,
            if item.gone { " (gone)" } else { "" },
        );
    }
    println!(
        "  scroll={} range={}",
        stack.physics().scroll_y(),
        stack.physics().scroll_range()
    );
}

fn main() {
    let mut stack = NotificationStack::new(StackConfig::default());
    stack.set_viewport(400.0, 320.0);

    let mail = stack.add_item(Card {
        title: "mail",
        lines: 2,
    });
    let chat = stack.add_item(Card {
        title: "chat",
        lines: 1,
    });
    let build = stack.add_item(Card {
        title: "build",
        lines: 4,
    });
    stack.add_item(Card {
        title: "calendar",
        lines: 3,
    });
    let mut now = 0;
    stack.frame(now);
    dump(&stack, "initial");

    // Scroll forward by 60 px.
    stack.on_scroll_delta(60.0);
    now += 16;
    stack.frame(now);
    dump(&stack, "scrolled");

    // Grow one card and take another out of layout.
    if let Some(card) = stack.content_mut(build) {
        card.lines = 6;
    }
    let _ = stack.on_height_changed(build);
    let _ = stack.set_gone(chat, true);
    now += 16;
    stack.frame(now);
    dump(&stack, "resized");

    // Drag the first card sideways and commit the swipe.
    let _ = stack.on_drag_begin(mail);
    let _ = stack.on_swipe_progress(mail, 120.0);
    now += 16;
    stack.frame(now);
    dump(&stack, "dragging mail");
    if let Ok(Some(card)) = stack.on_drag_end(mail, true) {
        println!("dismissed {}", card.title);
    }
    now += 16;
    stack.frame(now);
    dump(&stack, "after dismiss");

    let hit = stack.item_at(Point::new(100.0, 10.0));
    println!(
        "item at (100, 10): {:?}",
        hit.and_then(|id| stack.item(id)).map(|item| item.content.title)
    );
}
