// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack layout pass.

use understory_scroll::Edge;

use crate::ambient::AmbientState;
use crate::item::{HeightProvider, ItemId, ItemList};
use crate::view_state::ViewStateStore;

/// Which end of the viewport the stack grows from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StackDirection {
    /// The first child sits at the top; later children follow downward.
    #[default]
    Normal,
    /// The first child sits at the bottom; later children follow upward.
    Reversed,
}

/// Reusable buffers for [`StackScrollAlgorithm::compute_state`].
///
/// Owned by the caller so a layout pass allocates nothing in the steady state.
#[derive(Clone, Debug, Default)]
pub struct AlgorithmScratch {
    visible: Vec<ItemId>,
}

impl AlgorithmScratch {
    /// Create empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-gone children from the last pass, in child order.
    pub fn visible(&self) -> &[ItemId] {
        &self.visible
    }
}

/// Layout parameters. The pass itself is a pure function of these, the
/// [`AmbientState`], and the items.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackScrollAlgorithm {
    /// Gap between consecutive items.
    pub padding_between_elements: f64,
    /// Corner radius of items; an item may reach this far into the next one
    /// before it clips it.
    pub corner_radius: f64,
    /// Growth direction.
    pub direction: StackDirection,
    /// Viewport height, used to anchor a reversed stack.
    pub layout_height: f64,
    /// Offset of the anchor item from its edge.
    pub top_padding: f64,
    /// Alpha for items that are not dragged while a drag is active.
    pub drag_dim_alpha: f64,
}

impl Default for StackScrollAlgorithm {
    fn default() -> Self {
        Self {
            padding_between_elements: 0.0,
            corner_radius: 0.0,
            direction: StackDirection::Normal,
            layout_height: 0.0,
            top_padding: 0.0,
            drag_dim_alpha: 0.6,
        }
    }
}

impl StackScrollAlgorithm {
    /// Scroll offset the anchor is displaced by.
    ///
    /// Overscroll past the bottom pushes content further forward and
    /// overscroll past the top pulls it back; a reversed stack flips both.
    /// Negative scroll positions are ignored here because they are already
    /// reported as top overscroll.
    pub fn effective_scroll(&self, ambient: &AmbientState) -> f64 {
        let scroll = f64::from(ambient.scroll_y().max(0));
        let top = ambient.overscroll_amount(Edge::Top);
        let bottom = ambient.overscroll_amount(Edge::Bottom);
        match self.direction {
            StackDirection::Normal => scroll + bottom - top,
            StackDirection::Reversed => scroll - bottom + top,
        }
    }

    /// Recompute every child's [`ViewState`](crate::ViewState) into `store`.
    ///
    /// Every live child gets exactly one entry; non-gone children get a dense
    /// `not_gone_index` in child order.
    pub fn compute_state<T: HeightProvider>(
        &self,
        ambient: &AmbientState,
        items: &ItemList<T>,
        store: &mut ViewStateStore,
        scratch: &mut AlgorithmScratch,
    ) {
        store.reset(items);
        let effective_scroll = self.effective_scroll(ambient);
        self.update_visible_children(items, store, scratch);
        self.update_positions(effective_scroll, store, scratch);
        if self.direction == StackDirection::Normal {
            self.update_clipping(items, store, scratch);
        }
        self.handle_dragged_items(ambient, items, store, scratch);
    }

    fn update_visible_children<T: HeightProvider>(
        &self,
        items: &ItemList<T>,
        store: &mut ViewStateStore,
        scratch: &mut AlgorithmScratch,
    ) {
        scratch.visible.clear();
        scratch.visible.reserve(items.len());
        for (id, item) in items.iter() {
            if item.gone {
                continue;
            }
            let Some(state) = store.get_mut(id) else {
                continue;
            };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Child counts are far below i32::MAX."
            )]
            let index = scratch.visible.len() as i32;
            state.not_gone_index = index;
            state.height = item.content.intrinsic_height().max(0.0);
            scratch.visible.push(id);
        }
    }

    /// The first visible child is the anchor and carries the whole scroll
    /// offset; every other child is placed relative to its predecessor.
    fn update_positions(
        &self,
        effective_scroll: f64,
        store: &mut ViewStateStore,
        scratch: &AlgorithmScratch,
    ) {
        let padding = self.padding_between_elements;
        let mut previous: Option<(f64, f64)> = None;
        for &id in &scratch.visible {
            let Some(state) = store.get_mut(id) else {
                continue;
            };
            let height = state.height;
            let y = match (self.direction, previous) {
                (StackDirection::Normal, None) => self.top_padding - effective_scroll,
                (StackDirection::Normal, Some((prev_y, prev_h))) => prev_y + prev_h + padding,
                (StackDirection::Reversed, None) => {
                    self.layout_height - self.top_padding - height + effective_scroll
                }
                (StackDirection::Reversed, Some((prev_y, _))) => prev_y - padding - height,
            };
            state.y_translation = y;
            previous = Some((y, height));
        }
    }

    /// Clip each child where the previous one reaches into it, unless the
    /// previous one is mid-swipe or fully transparent.
    fn update_clipping<T>(
        &self,
        items: &ItemList<T>,
        store: &mut ViewStateStore,
        scratch: &AlgorithmScratch,
    ) {
        let mut previous_end: Option<f64> = None;
        let mut previous_is_swiped = false;
        for &id in &scratch.visible {
            let (Some(item), Some(state)) = (items.get(id), store.get_mut(id)) else {
                continue;
            };
            let overlap = match previous_end {
                Some(end) if !previous_is_swiped => (end - state.y_translation).max(0.0),
                _ => 0.0,
            };
            state.top_overlap = overlap;
            state.clip_top_amount = overlap.min(state.height);

            if item.live.alpha != 0.0 {
                previous_end = Some(
                    state.y_translation + state.height * state.scale - self.corner_radius,
                );
                previous_is_swiped = item.live.translation_x != 0.0;
            }
        }
    }

    fn handle_dragged_items<T>(
        &self,
        ambient: &AmbientState,
        items: &ItemList<T>,
        store: &mut ViewStateStore,
        scratch: &AlgorithmScratch,
    ) {
        if !ambient.has_dragged_items() {
            return;
        }
        for &id in &scratch.visible {
            let (Some(item), Some(state)) = (items.get(id), store.get_mut(id)) else {
                continue;
            };
            state.alpha = if ambient.is_dragged(id) {
                item.live.alpha
            } else {
                self.drag_dim_alpha
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::LiveProperties;

    fn stack(heights: &[f64]) -> (ItemList<f64>, Vec<ItemId>) {
        let mut items = ItemList::new();
        let ids = heights
            .iter()
            .map(|&h| items.push(h, LiveProperties::with_height(h)))
            .collect();
        (items, ids)
    }

    fn algorithm() -> StackScrollAlgorithm {
        StackScrollAlgorithm {
            padding_between_elements: 10.0,
            layout_height: 300.0,
            ..StackScrollAlgorithm::default()
        }
    }

    fn ys(store: &ViewStateStore, ids: &[ItemId]) -> Vec<f64> {
        ids.iter()
            .map(|id| store.get(*id).unwrap().y_translation)
            .collect()
    }

    #[test]
    fn positions_follow_the_anchor() {
        let (items, ids) = stack(&[100.0; 5]);
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        let mut ambient = AmbientState::new();
        algorithm().compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(ys(&store, &ids), [0.0, 110.0, 220.0, 330.0, 440.0]);

        ambient.set_scroll_y(40);
        ambient.set_overscroll_amount(Edge::Bottom, 5.0);
        algorithm().compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(
            ys(&store, &ids),
            [-45.0, 65.0, 175.0, 285.0, 395.0],
            "anchor sits at -effective_scroll"
        );
    }

    #[test]
    fn top_overscroll_pulls_the_stack_down() {
        let (items, ids) = stack(&[100.0; 2]);
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        let mut ambient = AmbientState::new();
        ambient.set_overscroll_amount(Edge::Top, 30.0);
        algorithm().compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(ys(&store, &ids), [30.0, 140.0]);
    }

    #[test]
    fn gone_items_are_skipped_and_indices_dense() {
        let (mut items, ids) = stack(&[100.0, 50.0, 80.0]);
        items.get_mut(ids[1]).unwrap().gone = true;
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        algorithm().compute_state(&AmbientState::new(), &items, &mut store, &mut scratch);
        assert_eq!(scratch.visible(), &[ids[0], ids[2]]);
        assert_eq!(store.get(ids[0]).unwrap().not_gone_index, 0);
        assert_eq!(store.get(ids[1]).unwrap().not_gone_index, -1);
        assert_eq!(store.get(ids[2]).unwrap().not_gone_index, 1);
        assert_eq!(store.get(ids[2]).unwrap().y_translation, 110.0);
    }

    #[test]
    fn reversed_stack_grows_upward_from_the_bottom() {
        let (items, ids) = stack(&[100.0, 50.0]);
        let alg = StackScrollAlgorithm {
            direction: StackDirection::Reversed,
            ..algorithm()
        };
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        let mut ambient = AmbientState::new();
        alg.compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(ys(&store, &ids), [200.0, 140.0]);

        ambient.set_scroll_y(20);
        alg.compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(ys(&store, &ids), [220.0, 160.0]);
    }

    #[test]
    fn overlap_is_clipped_unless_previous_is_swiped() {
        let (mut items, ids) = stack(&[100.0, 100.0]);
        // Negative padding forces the second item under the first.
        let alg = StackScrollAlgorithm {
            padding_between_elements: -20.0,
            corner_radius: 4.0,
            ..algorithm()
        };
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        let ambient = AmbientState::new();
        alg.compute_state(&ambient, &items, &mut store, &mut scratch);
        let second = store.get(ids[1]).unwrap();
        assert_eq!(second.top_overlap, 16.0);
        assert_eq!(second.clip_top_amount, 16.0);
        assert_eq!(store.get(ids[0]).unwrap().clip_top_amount, 0.0);

        items.get_mut(ids[0]).unwrap().live.translation_x = 25.0;
        alg.compute_state(&ambient, &items, &mut store, &mut scratch);
        assert_eq!(store.get(ids[1]).unwrap().clip_top_amount, 0.0);
    }

    #[test]
    fn drag_dims_everything_else() {
        let (mut items, ids) = stack(&[100.0; 4]);
        items.get_mut(ids[2]).unwrap().live.alpha = 0.9;
        let mut ambient = AmbientState::new();
        ambient.on_begin_drag(ids[2]);
        let mut store = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        algorithm().compute_state(&ambient, &items, &mut store, &mut scratch);
        let alphas: Vec<f64> = ids.iter().map(|id| store.get(*id).unwrap().alpha).collect();
        assert_eq!(alphas, [0.6, 0.6, 0.9, 0.6]);
    }

    #[test]
    fn layout_is_deterministic() {
        let (items, _) = stack(&[80.0, 120.0, 40.0]);
        let mut ambient = AmbientState::new();
        ambient.set_scroll_y(25);
        ambient.set_overscroll_amount(Edge::Bottom, 7.5);
        let mut a = ViewStateStore::new();
        let mut b = ViewStateStore::new();
        let mut scratch = AlgorithmScratch::new();
        algorithm().compute_state(&ambient, &items, &mut a, &mut scratch);
        algorithm().compute_state(&ambient, &items, &mut b, &mut scratch);
        assert_eq!(a, b);
    }
}
