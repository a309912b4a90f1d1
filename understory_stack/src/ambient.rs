// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The snapshot of scroll and drag state that layout reads.

use understory_scroll::Edge;

use crate::ItemId;

/// What is true right now: scroll position, overscroll per edge, and the items
/// under an active drag.
///
/// Pure data. The container refreshes scroll and overscroll from its
/// [`ScrollPhysics`](understory_scroll::ScrollPhysics) before every layout pass;
/// gesture callbacks maintain the dragged set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbientState {
    scroll_y: i32,
    top_overscroll: f64,
    bottom_overscroll: f64,
    dragged: Vec<ItemId>,
}

impl AmbientState {
    /// Empty state: scrolled to the top, no overscroll, nothing dragged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll position.
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    /// Set the scroll position.
    pub fn set_scroll_y(&mut self, scroll_y: i32) {
        self.scroll_y = scroll_y;
    }

    /// Overscroll amount on `edge`. Never negative.
    pub fn overscroll_amount(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top_overscroll,
            Edge::Bottom => self.bottom_overscroll,
        }
    }

    /// Set the overscroll amount on `edge`; negative and non-finite values become zero.
    pub fn set_overscroll_amount(&mut self, edge: Edge, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        match edge {
            Edge::Top => self.top_overscroll = amount,
            Edge::Bottom => self.bottom_overscroll = amount,
        }
    }

    /// Record a drag start.
    pub fn on_begin_drag(&mut self, id: ItemId) {
        if !self.dragged.contains(&id) {
            self.dragged.push(id);
        }
    }

    /// Record a drag end (snap back, dismissal, or removal).
    pub fn on_drag_finished(&mut self, id: ItemId) {
        self.dragged.retain(|&other| other != id);
    }

    /// Replace the dragged set.
    pub fn set_dragged_items(&mut self, items: impl IntoIterator<Item = ItemId>) {
        self.dragged.clear();
        for id in items {
            self.on_begin_drag(id);
        }
    }

    /// Items under an active drag, in the order the drags began.
    pub fn dragged_items(&self) -> &[ItemId] {
        &self.dragged
    }

    /// Returns true if `id` is being dragged.
    pub fn is_dragged(&self, id: ItemId) -> bool {
        self.dragged.contains(&id)
    }

    /// Returns true if any drag is active.
    pub fn has_dragged_items(&self) -> bool {
        !self.dragged.is_empty()
    }
}
