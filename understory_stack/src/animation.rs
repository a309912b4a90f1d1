// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batching of structural mutations into typed animation events.
//!
//! Mutations arriving within one frame are recorded by an [`AnimationPipeline`]
//! and turned into a single batch of [`AnimationEvent`]s on the next layout pass.
//! Every mutation is kept; only the flush is coalesced.

use crate::error::{Result, StackError};
use crate::item::ItemId;

bitflags::bitflags! {
    /// Properties an animation is allowed to tween.
    ///
    /// Anything not listed is set immediately to its target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AnimationFilter: u16 {
        /// Opacity.
        const ALPHA = 1 << 0;
        /// Height.
        const HEIGHT = 1 << 1;
        /// Clip and overlap at the top edge.
        const TOP_INSET = 1 << 2;
        /// Vertical translation.
        const Y = 1 << 3;
        /// Elevation.
        const Z = 1 << 4;
        /// Dimming.
        const DIMMED = 1 << 5;
        /// Scale.
        const SCALE = 1 << 6;
        /// Dark treatment.
        const DARK = 1 << 7;
        /// Sensitive-content hiding.
        const HIDE_SENSITIVE = 1 << 8;
        /// Per-item start delays are honored.
        const HAS_DELAYS = 1 << 9;
    }
}

/// Kind of structural change an event describes.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimationType {
    /// An item was added.
    Add,
    /// An item was removed.
    Remove,
    /// An item was removed after being swiped out; it leaves along its swipe.
    RemoveSwipedOut,
    /// The stack's top padding changed.
    TopPaddingChanged,
    /// A drag started on an item.
    StartDrag,
    /// A swiped item returned to rest.
    SnapBack,
    /// An item moved to another child position.
    ChangePosition,
    /// An item's height changed.
    ViewResize,
    /// Animate every property of every item.
    Everything,
}

impl AnimationType {
    /// Default duration in ms.
    pub const STANDARD_DURATION_MS: u64 = 360;
    /// Duration for appearing and disappearing items.
    pub const APPEAR_DISAPPEAR_DURATION_MS: u64 = 464;
    /// Duration for additions that come in through a secondary entry path.
    pub const SECONDARY_ENTRY_DURATION_MS: u64 = 560;

    const ALL: [Self; 9] = [
        Self::Add,
        Self::Remove,
        Self::RemoveSwipedOut,
        Self::TopPaddingChanged,
        Self::StartDrag,
        Self::SnapBack,
        Self::ChangePosition,
        Self::ViewResize,
        Self::Everything,
    ];

    fn ordinal(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    /// Properties this kind of event may tween.
    pub fn filter(self) -> AnimationFilter {
        use AnimationFilter as F;
        let layout = F::ALPHA | F::HEIGHT | F::TOP_INSET | F::Y | F::Z;
        match self {
            Self::Add | Self::Remove | Self::RemoveSwipedOut => layout | F::HAS_DELAYS,
            Self::TopPaddingChanged => layout | F::DIMMED | F::SCALE,
            Self::StartDrag => F::ALPHA,
            Self::SnapBack => F::ALPHA | F::HEIGHT,
            Self::ChangePosition | Self::ViewResize => layout,
            Self::Everything => F::all(),
        }
    }

    /// Duration used unless overridden.
    pub fn default_duration_ms(self) -> u64 {
        match self {
            Self::Add | Self::Remove => Self::APPEAR_DISAPPEAR_DURATION_MS,
            _ => Self::STANDARD_DURATION_MS,
        }
    }
}

/// One entry of a batch handed to the animator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnimationEvent {
    /// Affected item; `None` for whole-stack events.
    pub item: Option<ItemId>,
    /// What happened.
    pub kind: AnimationType,
    /// Properties allowed to tween.
    pub filter: AnimationFilter,
    /// Duration in ms.
    pub duration_ms: u64,
    /// For removals, the first remaining item at or below the removed one; the
    /// gap closes toward it.
    pub item_after: Option<ItemId>,
    /// The addition came in through a secondary entry path.
    pub from_secondary_entry: bool,
}

impl AnimationEvent {
    fn new(item: Option<ItemId>, kind: AnimationType, duration_ms: u64) -> Self {
        Self {
            item,
            kind,
            filter: kind.filter(),
            duration_ms,
            item_after: None,
            from_secondary_entry: false,
        }
    }

    /// The longest duration in a batch, or zero for an empty batch.
    pub fn combined_duration(events: &[Self]) -> u64 {
        events.iter().map(|e| e.duration_ms).max().unwrap_or(0)
    }
}

/// Where a pipeline is in its per-frame cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing recorded since the last flush.
    #[default]
    Idle,
    /// Mutations recorded; a flush is pending.
    Accumulating,
    /// A batch was handed out this frame.
    Flushed,
}

/// Records structural mutations and flushes them as one batch per frame.
#[derive(Clone, Debug)]
pub struct AnimationPipeline {
    enabled: bool,
    state: PipelineState,
    to_add: Vec<ItemId>,
    from_secondary: Vec<ItemId>,
    to_remove: Vec<(ItemId, Option<ItemId>)>,
    swiped_out: Vec<ItemId>,
    changing_positions: Vec<ItemId>,
    snapped_back: Vec<ItemId>,
    drag_pending: Vec<ItemId>,
    top_padding_changed: bool,
    view_resize: bool,
    everything: bool,
    overrides: [Option<u64>; 9],
}

impl Default for AnimationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPipeline {
    /// Create an enabled, idle pipeline.
    pub fn new() -> Self {
        Self {
            enabled: true,
            state: PipelineState::Idle,
            to_add: Vec::new(),
            from_secondary: Vec::new(),
            to_remove: Vec::new(),
            swiped_out: Vec::new(),
            changing_positions: Vec::new(),
            snapped_back: Vec::new(),
            drag_pending: Vec::new(),
            top_padding_changed: false,
            view_resize: false,
            everything: false,
            overrides: [None; 9],
        }
    }

    /// Returns true if mutations are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable recording. Disabling drops anything pending.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
            self.state = PipelineState::Idle;
        }
    }

    /// Current cycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns true if a flush is due.
    pub fn has_pending(&self) -> bool {
        self.state == PipelineState::Accumulating
    }

    fn mark_pending(&mut self) {
        if self.state != PipelineState::Accumulating {
            log::trace!("animation pipeline: accumulating");
        }
        self.state = PipelineState::Accumulating;
    }

    /// Override the duration for every event of `kind`.
    pub fn set_duration_override(&mut self, kind: AnimationType, duration_ms: i64) -> Result<()> {
        let Ok(duration) = u64::try_from(duration_ms) else {
            log::warn!("rejecting negative duration {duration_ms} ms for {kind:?}");
            return Err(StackError::InvalidDuration(duration_ms));
        };
        self.overrides[kind.ordinal()] = Some(duration);
        Ok(())
    }

    /// Drop a duration override.
    pub fn clear_duration_override(&mut self, kind: AnimationType) {
        self.overrides[kind.ordinal()] = None;
    }

    fn duration_for(&self, kind: AnimationType) -> u64 {
        self.overrides[kind.ordinal()].unwrap_or_else(|| kind.default_duration_ms())
    }

    /// An item was added.
    pub fn on_child_added(&mut self, id: ItemId, from_secondary_entry: bool) {
        if !self.enabled {
            return;
        }
        self.to_add.push(id);
        if from_secondary_entry {
            self.from_secondary.push(id);
        }
        self.mark_pending();
    }

    /// An item was removed; `item_after` is the item the gap closes toward.
    ///
    /// Returns false if no removal will be animated, either because recording
    /// is disabled or because the item was added in this same frame (the two
    /// cancel out).
    pub fn on_child_removed(&mut self, id: ItemId, item_after: Option<ItemId>) -> bool {
        self.forget(id, item_after);
        if !self.enabled {
            return false;
        }
        if let Some(pos) = self.to_add.iter().position(|&other| other == id) {
            self.to_add.remove(pos);
            self.from_secondary.retain(|&other| other != id);
            self.swiped_out.retain(|&other| other != id);
            log::trace!("add and remove of {id:?} cancel out");
            return false;
        }
        self.to_remove.push((id, item_after));
        self.mark_pending();
        true
    }

    /// A gone item was removed. Nothing is drawn for it, so no removal is
    /// recorded; any pending event for it is dropped.
    pub fn on_gone_child_removed(&mut self, id: ItemId, item_after: Option<ItemId>) {
        self.forget(id, item_after);
        self.to_add.retain(|&other| other != id);
        self.from_secondary.retain(|&other| other != id);
        self.swiped_out.retain(|&other| other != id);
    }

    // Drop per-item events for `id` and retarget removals that closed toward it.
    fn forget(&mut self, id: ItemId, item_after: Option<ItemId>) {
        self.changing_positions.retain(|&other| other != id);
        self.snapped_back.retain(|&other| other != id);
        self.drag_pending.retain(|&other| other != id);
        for (_, after) in &mut self.to_remove {
            if *after == Some(id) {
                *after = item_after;
            }
        }
    }

    /// An item moved to another child position.
    pub fn on_child_moved(&mut self, id: ItemId) {
        if !self.enabled {
            return;
        }
        if !self.changing_positions.contains(&id) {
            self.changing_positions.push(id);
        }
        self.mark_pending();
    }

    /// A drag started on an item.
    pub fn on_drag_started(&mut self, id: ItemId) {
        if !self.enabled {
            return;
        }
        self.drag_pending.push(id);
        self.mark_pending();
    }

    /// A dragged item snapped back. If its drag start has not been flushed yet
    /// the two cancel and nothing is emitted.
    ///
    /// Returns true if a snap-back event was recorded.
    pub fn on_snapped_back(&mut self, id: ItemId) -> bool {
        if let Some(pos) = self.drag_pending.iter().position(|&other| other == id) {
            self.drag_pending.remove(pos);
            return false;
        }
        if !self.enabled {
            return false;
        }
        self.snapped_back.push(id);
        self.mark_pending();
        true
    }

    /// An item was swiped out; its upcoming removal leaves horizontally.
    pub fn on_swiped_out(&mut self, id: ItemId) {
        if !self.swiped_out.contains(&id) {
            self.swiped_out.push(id);
        }
    }

    /// An item's height changed.
    pub fn request_view_resize(&mut self) {
        if self.enabled {
            self.view_resize = true;
            self.mark_pending();
        }
    }

    /// The top padding changed.
    pub fn request_top_padding_changed(&mut self) {
        if self.enabled {
            self.top_padding_changed = true;
            self.mark_pending();
        }
    }

    /// Animate everything on the next flush.
    pub fn request_everything(&mut self) {
        if self.enabled {
            self.everything = true;
            self.mark_pending();
        }
    }

    /// Build the batch for this frame and clear all accumulated mutations.
    ///
    /// Order: removals, additions, position changes, snap-backs, drag starts,
    /// top padding, resize, everything.
    pub fn flush(&mut self) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        for &(id, item_after) in &self.to_remove {
            let kind = if self.swiped_out.contains(&id) {
                AnimationType::RemoveSwipedOut
            } else {
                AnimationType::Remove
            };
            let mut event = AnimationEvent::new(Some(id), kind, self.duration_for(kind));
            event.item_after = item_after;
            events.push(event);
        }
        for &id in &self.to_add {
            let secondary = self.from_secondary.contains(&id);
            let duration = if secondary {
                AnimationType::SECONDARY_ENTRY_DURATION_MS
            } else {
                self.duration_for(AnimationType::Add)
            };
            let mut event = AnimationEvent::new(Some(id), AnimationType::Add, duration);
            event.from_secondary_entry = secondary;
            events.push(event);
        }
        let per_item = [
            (&self.changing_positions, AnimationType::ChangePosition),
            (&self.snapped_back, AnimationType::SnapBack),
            (&self.drag_pending, AnimationType::StartDrag),
        ];
        for (ids, kind) in per_item {
            for &id in ids {
                events.push(AnimationEvent::new(Some(id), kind, self.duration_for(kind)));
            }
        }
        let whole_stack = [
            (self.top_padding_changed, AnimationType::TopPaddingChanged),
            (self.view_resize, AnimationType::ViewResize),
            (self.everything, AnimationType::Everything),
        ];
        for (requested, kind) in whole_stack {
            if requested {
                events.push(AnimationEvent::new(None, kind, self.duration_for(kind)));
            }
        }
        self.clear();
        self.state = PipelineState::Flushed;
        log::debug!(
            "animation pipeline: flushed {} events over {} ms",
            events.len(),
            AnimationEvent::combined_duration(&events)
        );
        events
    }

    /// Return to idle after the batch was handed out (or dropped).
    pub fn finish_flush(&mut self) {
        if self.state == PipelineState::Flushed {
            self.state = PipelineState::Idle;
        }
    }

    fn clear(&mut self) {
        self.to_add.clear();
        self.from_secondary.clear();
        self.to_remove.clear();
        self.swiped_out.clear();
        self.changing_positions.clear();
        self.snapped_back.clear();
        self.drag_pending.clear();
        self.top_padding_changed = false;
        self.view_resize = false;
        self.everything = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ItemId {
        ItemId::new(n, 1)
    }

    fn kinds(events: &[AnimationEvent]) -> Vec<AnimationType> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn state_cycle() {
        let mut p = AnimationPipeline::new();
        assert_eq!(p.state(), PipelineState::Idle);
        p.on_child_added(id(0), false);
        assert_eq!(p.state(), PipelineState::Accumulating);
        assert!(p.has_pending());
        let events = p.flush();
        assert_eq!(events.len(), 1);
        assert_eq!(p.state(), PipelineState::Flushed);
        p.finish_flush();
        assert_eq!(p.state(), PipelineState::Idle);
        assert!(p.flush().is_empty(), "nothing carried over");
    }

    #[test]
    fn add_then_remove_cancels() {
        let mut p = AnimationPipeline::new();
        p.on_child_added(id(0), true);
        assert!(!p.on_child_removed(id(0), None));
        let events = p.flush();
        assert!(
            events.iter().all(|e| e.item != Some(id(0))),
            "no event may mention the cancelled item"
        );
    }

    #[test]
    fn batch_order_is_fixed() {
        let mut p = AnimationPipeline::new();
        p.request_everything();
        p.request_view_resize();
        p.request_top_padding_changed();
        p.on_drag_started(id(4));
        p.on_snapped_back(id(3));
        p.on_child_moved(id(2));
        p.on_child_added(id(1), false);
        p.on_child_removed(id(0), Some(id(2)));
        assert_eq!(
            kinds(&p.flush()),
            [
                AnimationType::Remove,
                AnimationType::Add,
                AnimationType::ChangePosition,
                AnimationType::SnapBack,
                AnimationType::StartDrag,
                AnimationType::TopPaddingChanged,
                AnimationType::ViewResize,
                AnimationType::Everything,
            ]
        );
    }

    #[test]
    fn swiped_out_removal_is_distinct() {
        let mut p = AnimationPipeline::new();
        p.on_swiped_out(id(0));
        p.on_child_removed(id(0), Some(id(1)));
        p.on_child_removed(id(2), None);
        let events = p.flush();
        assert_eq!(events[0].kind, AnimationType::RemoveSwipedOut);
        assert_eq!(events[0].item_after, Some(id(1)));
        assert_eq!(events[1].kind, AnimationType::Remove);
        assert_eq!(events[0].filter, events[1].filter);
    }

    #[test]
    fn item_after_skips_later_removals() {
        let mut p = AnimationPipeline::new();
        p.on_child_removed(id(0), Some(id(1)));
        p.on_child_removed(id(1), Some(id(2)));
        let events = p.flush();
        assert_eq!(events[0].item_after, Some(id(2)));
    }

    #[test]
    fn snap_back_before_flush_cancels_drag() {
        let mut p = AnimationPipeline::new();
        p.on_drag_started(id(0));
        assert!(!p.on_snapped_back(id(0)));
        assert!(
            p.flush().is_empty(),
            "pending drag start and snap back cancel out"
        );

        p.finish_flush();
        p.on_drag_started(id(0));
        p.flush();
        p.finish_flush();
        assert!(p.on_snapped_back(id(0)));
        assert_eq!(kinds(&p.flush()), [AnimationType::SnapBack]);
    }

    #[test]
    fn durations_and_filters() {
        let mut p = AnimationPipeline::new();
        p.on_child_added(id(0), false);
        p.on_child_added(id(1), true);
        p.on_drag_started(id(2));
        let events = p.flush();
        assert_eq!(events[0].duration_ms, 464);
        assert_eq!(events[1].duration_ms, 560);
        assert!(events[1].from_secondary_entry);
        assert_eq!(events[2].filter, AnimationFilter::ALPHA);
        assert_eq!(AnimationEvent::combined_duration(&events), 560);
        assert_eq!(AnimationEvent::combined_duration(&[]), 0);
        assert!(AnimationType::Everything.filter().contains(AnimationFilter::DARK));
        assert!(
            !AnimationType::SnapBack
                .filter()
                .contains(AnimationFilter::Y)
        );
    }

    #[test]
    fn duration_overrides() {
        let mut p = AnimationPipeline::new();
        assert_eq!(
            p.set_duration_override(AnimationType::ViewResize, -5),
            Err(StackError::InvalidDuration(-5))
        );
        p.set_duration_override(AnimationType::ViewResize, 120).unwrap();
        p.request_view_resize();
        assert_eq!(p.flush()[0].duration_ms, 120);
        p.clear_duration_override(AnimationType::ViewResize);
        p.request_view_resize();
        assert_eq!(p.flush()[0].duration_ms, 360);
    }

    #[test]
    fn disabled_pipeline_records_nothing() {
        let mut p = AnimationPipeline::new();
        p.on_child_added(id(0), false);
        p.set_enabled(false);
        assert!(!p.has_pending(), "disabling drops pending work");
        p.on_child_added(id(1), false);
        p.request_everything();
        assert!(!p.on_child_removed(id(2), None));
        assert!(!p.has_pending());
    }

    #[test]
    fn removal_drops_stale_references() {
        let mut p = AnimationPipeline::new();
        p.on_child_moved(id(0));
        p.on_drag_started(id(0));
        p.on_child_removed(id(0), None);
        assert_eq!(kinds(&p.flush()), [AnimationType::Remove]);
    }

    #[test]
    fn gone_removal_drops_pending_events() {
        let mut p = AnimationPipeline::new();
        let (a, b) = (ItemId::new(0, 1), ItemId::new(1, 1));
        p.on_child_added(a, true);
        p.on_child_moved(b);
        p.on_gone_child_removed(a, Some(b));
        p.on_gone_child_removed(b, None);
        assert!(p.flush().is_empty(), "no events for items that were never drawn");
    }
}
