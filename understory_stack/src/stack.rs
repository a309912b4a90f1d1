// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The container that wires input, physics, layout, and animation together.

use kurbo::{Point, Rect};
use understory_scroll::{Edge, ScrollConfig, ScrollEffect, ScrollPhysics};

use crate::algorithm::{AlgorithmScratch, StackDirection, StackScrollAlgorithm};
use crate::ambient::AmbientState;
use crate::animation::{AnimationEvent, AnimationPipeline};
use crate::error::{Result, StackError};
use crate::host::{ItemLifecycleSink, StackAnimator, StackHost};
use crate::item::{HeightProvider, Item, ItemId, ItemList, LiveProperties};
use crate::swipe::SwipeReveal;
use crate::view_state::{ApplyReport, ViewStateStore};

/// Configuration for a [`NotificationStack`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackConfig {
    /// Gap between consecutive items.
    pub padding_between_elements: f64,
    /// Item corner radius.
    pub corner_radius: f64,
    /// Growth direction.
    pub direction: StackDirection,
    /// Alpha of non-dragged items while a drag is active.
    pub drag_dim_alpha: f64,
    /// Record structural mutations for animation.
    pub animations_enabled: bool,
    /// Scroll physics tunables.
    pub scroll: ScrollConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            padding_between_elements: 8.0,
            corner_radius: 2.0,
            direction: StackDirection::Normal,
            drag_dim_alpha: 0.6,
            animations_enabled: true,
            scroll: ScrollConfig::default(),
        }
    }
}

/// What one [`NotificationStack::frame`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// A layout pass ran.
    pub laid_out: bool,
    /// The layout was applied directly; carries the write counts.
    pub applied: Option<ApplyReport>,
    /// Events handed to the animator.
    pub dispatched_events: usize,
    /// A fling is still in flight; keep producing frames.
    pub flinging: bool,
}

/// A scrollable stack of dismissible items.
///
/// Mutations and input only record what happened and request an update; the
/// layout pass runs once per [`frame`](Self::frame). At that point the pass is
/// either applied directly or, when animations are pending or running, handed to
/// the attached [`StackAnimator`] together with the batch of events.
pub struct NotificationStack<T> {
    items: ItemList<T>,
    ambient: AmbientState,
    physics: ScrollPhysics,
    algorithm: StackScrollAlgorithm,
    scratch: AlgorithmScratch,
    store: ViewStateStore,
    pipeline: AnimationPipeline,
    animator: Option<Box<dyn StackAnimator>>,
    host: Option<Box<dyn StackHost>>,
    lifecycle: Option<Box<dyn ItemLifecycleSink>>,
    children_update_requested: bool,
    scrolling_enabled: bool,
    swiping_in_progress: bool,
    dismiss_all_in_progress: bool,
    width: f64,
    now_ms: u64,
}

impl<T> core::fmt::Debug for NotificationStack<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationStack")
            .field("items", &self.items)
            .field("ambient", &self.ambient)
            .field("physics", &self.physics)
            .field("algorithm", &self.algorithm)
            .field("pipeline", &self.pipeline.state())
            .field("has_animator", &self.animator.is_some())
            .field("has_host", &self.host.is_some())
            .field("update_requested", &self.children_update_requested)
            .finish_non_exhaustive()
    }
}

impl<T: HeightProvider> Default for NotificationStack<T> {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

impl<T: HeightProvider> NotificationStack<T> {
    /// Create an empty stack with a zero-sized viewport.
    pub fn new(config: StackConfig) -> Self {
        let mut pipeline = AnimationPipeline::new();
        pipeline.set_enabled(config.animations_enabled);
        Self {
            items: ItemList::new(),
            ambient: AmbientState::new(),
            physics: ScrollPhysics::new(config.scroll),
            algorithm: StackScrollAlgorithm {
                padding_between_elements: config.padding_between_elements,
                corner_radius: config.corner_radius,
                direction: config.direction,
                layout_height: 0.0,
                top_padding: 0.0,
                drag_dim_alpha: config.drag_dim_alpha,
            },
            scratch: AlgorithmScratch::new(),
            store: ViewStateStore::new(),
            pipeline,
            animator: None,
            host: None,
            lifecycle: None,
            children_update_requested: false,
            scrolling_enabled: true,
            swiping_in_progress: false,
            dismiss_all_in_progress: false,
            width: 0.0,
            now_ms: 0,
        }
    }

    /// Attach the animator.
    pub fn set_animator(&mut self, animator: Box<dyn StackAnimator>) {
        self.animator = Some(animator);
    }

    /// Attach the host.
    pub fn set_host(&mut self, host: Box<dyn StackHost>) {
        self.host = Some(host);
    }

    /// Attach the sink for dismissed items.
    pub fn set_lifecycle_sink(&mut self, sink: Box<dyn ItemLifecycleSink>) {
        self.lifecycle = Some(sink);
    }

    // --- Accessors ---

    /// The child collection.
    pub fn items(&self) -> &ItemList<T> {
        &self.items
    }

    /// Item for `id`.
    pub fn item(&self, id: ItemId) -> Option<&Item<T>> {
        self.items.get(id)
    }

    /// Mutable content for `id`. Height changes are detected on the next
    /// layout pass and animated as a resize.
    pub fn content_mut(&mut self, id: ItemId) -> Option<&mut T> {
        self.items.get_mut(id).map(|item| &mut item.content)
    }

    /// Mutable live properties, for the animator.
    pub fn live_mut(&mut self, id: ItemId) -> Option<&mut LiveProperties> {
        self.items.get_mut(id).map(|item| &mut item.live)
    }

    /// The ambient snapshot used by the last layout pass.
    pub fn ambient(&self) -> &AmbientState {
        &self.ambient
    }

    /// Scroll physics.
    pub fn physics(&self) -> &ScrollPhysics {
        &self.physics
    }

    /// Targets from the last layout pass.
    pub fn view_states(&self) -> &ViewStateStore {
        &self.store
    }

    /// The animation pipeline.
    pub fn pipeline(&self) -> &AnimationPipeline {
        &self.pipeline
    }

    /// Mutable access to the pipeline, e.g. for duration overrides.
    pub fn pipeline_mut(&mut self) -> &mut AnimationPipeline {
        &mut self.pipeline
    }

    /// Layout parameters.
    pub fn algorithm(&self) -> &StackScrollAlgorithm {
        &self.algorithm
    }

    /// Content height: intrinsic heights of non-gone items plus the gaps between them.
    pub fn content_height(&self) -> f64 {
        let mut height = 0.0;
        let mut count = 0_usize;
        for (_, item) in self.items.iter().filter(|(_, item)| !item.gone) {
            height += item.content.intrinsic_height().max(0.0);
            count += 1;
        }
        if count > 1 {
            let gaps = (count - 1) as f64;
            height += gaps * self.algorithm.padding_between_elements;
        }
        height
    }

    /// Returns true once an update has been requested and not yet run.
    pub fn is_update_requested(&self) -> bool {
        self.children_update_requested
    }

    // --- Structural API ---

    /// Append an item.
    pub fn add_item(&mut self, content: T) -> ItemId {
        self.add_at(self.items.len(), content, false)
    }

    /// Append an item that arrives through a secondary entry path; its
    /// appearance animates for longer.
    pub fn add_item_from_secondary(&mut self, content: T) -> ItemId {
        self.add_at(self.items.len(), content, true)
    }

    /// Insert an item at child position `index`.
    pub fn insert_item(&mut self, index: usize, content: T) -> Result<ItemId> {
        let len = self.items.len();
        if index > len {
            log::warn!("insert_item: index {index} out of range for {len} items");
            return Err(StackError::IndexOutOfRange { index, len });
        }
        Ok(self.add_at(index, content, false))
    }

    fn add_at(&mut self, index: usize, content: T, from_secondary: bool) -> ItemId {
        let live = LiveProperties::with_height(content.intrinsic_height().max(0.0));
        let id = self.items.insert(index, content, live);
        self.update_content_height();
        self.pipeline.on_child_added(id, from_secondary);
        self.request_children_update();
        id
    }

    /// Remove an item and return its content.
    pub fn remove_item(&mut self, id: ItemId) -> Result<T> {
        let Some(item) = self.items.get(id) else {
            log::warn!("remove_item: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        };
        let removed_y = item.live.translation_y;
        let removed_gone = item.gone;
        let removed_height = item.content.intrinsic_height().max(0.0);

        let item_after = self
            .items
            .iter()
            .find(|(other, item)| {
                *other != id && !item.gone && item.live.translation_y >= removed_y
            })
            .map(|(other, _)| other);

        if !removed_gone {
            let start = self.position_in_linear_layout(id);
            let span = removed_height + self.algorithm.padding_between_elements;
            self.physics.adjust_for_removed_span(start, span);
        }
        self.store.remove(id);
        if self.ambient.is_dragged(id) {
            self.ambient.on_drag_finished(id);
            self.swiping_in_progress = false;
        }
        if removed_gone {
            self.pipeline.on_gone_child_removed(id, item_after);
        } else {
            self.pipeline.on_child_removed(id, item_after);
        }

        let Some(item) = self.items.remove(id) else {
            return Err(StackError::StaleItem(id));
        };
        self.update_content_height();
        self.process_scroll_effects();
        self.request_children_update();
        Ok(item.content)
    }

    /// Offset of `id` from the top of the content.
    fn position_in_linear_layout(&self, id: ItemId) -> f64 {
        let padding = self.algorithm.padding_between_elements;
        let mut position = 0.0;
        for (other, item) in self.items.iter() {
            if other == id {
                return position;
            }
            if !item.gone {
                position += item.content.intrinsic_height().max(0.0) + padding;
            }
        }
        0.0
    }

    /// Move an item to child position `new_index`.
    pub fn move_item(&mut self, id: ItemId, new_index: usize) -> Result<()> {
        let Some(current) = self.items.index_of(id) else {
            log::warn!("move_item: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        };
        let len = self.items.len();
        if new_index >= len {
            log::warn!("move_item: index {new_index} out of range for {len} items");
            return Err(StackError::IndexOutOfRange {
                index: new_index,
                len,
            });
        }
        if current == new_index {
            return Ok(());
        }
        self.items.move_to(id, new_index);
        if self.items.get(id).is_some_and(|item| !item.gone) {
            self.pipeline.on_child_moved(id);
        }
        self.request_children_update();
        Ok(())
    }

    /// Take an item out of layout (or bring it back) without removing it.
    pub fn set_gone(&mut self, id: ItemId, gone: bool) -> Result<()> {
        let Some(item) = self.items.get_mut(id) else {
            log::warn!("set_gone: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        };
        if item.gone == gone {
            return Ok(());
        }
        item.gone = gone;
        if !gone {
            item.measured_height = item.content.intrinsic_height().max(0.0);
        }
        self.update_content_height();
        self.notify_height_changed(None);
        self.request_children_update();
        Ok(())
    }

    /// The intrinsic height of `id` changed; animate the resize.
    ///
    /// Changes are also picked up on the next frame without this call.
    pub fn on_height_changed(&mut self, id: ItemId) -> Result<()> {
        let Some(item) = self.items.get_mut(id) else {
            log::warn!("on_height_changed: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        };
        item.measured_height = item.content.intrinsic_height().max(0.0);
        self.update_content_height();
        self.pipeline.request_view_resize();
        self.notify_height_changed(Some(id));
        self.request_children_update();
        Ok(())
    }

    /// Offset of the anchor item from its edge.
    pub fn set_top_padding(&mut self, padding: f64, animate: bool) {
        if self.algorithm.top_padding == padding {
            return;
        }
        self.algorithm.top_padding = padding;
        if animate {
            self.pipeline.request_top_padding_changed();
        }
        self.request_children_update();
    }

    /// Animate every property of every item on the next frame.
    pub fn request_animate_everything(&mut self) {
        self.pipeline.request_everything();
        self.request_children_update();
    }

    /// Replace the set of dragged items. Stale handles are ignored.
    pub fn set_dragged_items(&mut self, items: impl IntoIterator<Item = ItemId>) {
        let alive: Vec<ItemId> = items
            .into_iter()
            .filter(|&id| self.items.is_alive(id))
            .collect();
        self.ambient.set_dragged_items(alive);
        self.request_children_update();
    }

    /// Enable or disable scroll input.
    pub fn set_scrolling_enabled(&mut self, enabled: bool) {
        self.scrolling_enabled = enabled;
    }

    /// Enable or disable animation of structural changes.
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.pipeline.set_enabled(enabled);
    }

    /// While set, swipe commits are ignored.
    pub fn set_dismiss_all_in_progress(&mut self, in_progress: bool) {
        self.dismiss_all_in_progress = in_progress;
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.algorithm.layout_height = height.max(0.0);
        self.physics.set_viewport_height(height);
        self.update_content_height();
        self.process_scroll_effects();
        self.request_children_update();
    }

    fn update_content_height(&mut self) {
        let height = self.content_height();
        self.physics.set_content(height, self.items.len());
    }

    fn notify_height_changed(&mut self, id: Option<ItemId>) {
        if let Some(host) = self.host.as_mut() {
            host.on_height_changed(id);
        }
    }

    // --- Gesture signals ---

    /// A scroll delta from the gesture collaborator (positive scrolls forward).
    pub fn on_scroll_delta(&mut self, delta: f64) {
        if !self.scrolling_enabled {
            return;
        }
        self.physics.scroll_by(delta);
        self.process_scroll_effects();
    }

    /// A release velocity in scroll space (px/s, positive scrolls forward).
    pub fn on_fling_velocity(&mut self, velocity: f64) {
        if !self.scrolling_enabled {
            return;
        }
        self.physics.fling(velocity, self.now_ms);
        self.process_scroll_effects();
    }

    /// A horizontal drag started on `id`.
    pub fn on_drag_begin(&mut self, id: ItemId) -> Result<()> {
        if !self.items.is_alive(id) {
            log::warn!("on_drag_begin: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        }
        self.swiping_in_progress = true;
        self.ambient.on_begin_drag(id);
        self.pipeline.on_drag_started(id);
        self.request_children_update();
        Ok(())
    }

    /// A horizontal drag ended. A committed drag dismisses the item and returns
    /// its content; otherwise the item snaps back.
    pub fn on_drag_end(&mut self, id: ItemId, committed: bool) -> Result<Option<T>> {
        self.swiping_in_progress = false;
        if !self.items.is_alive(id) {
            log::warn!("on_drag_end: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        }
        if committed {
            return self.on_swipe_commit(id);
        }
        self.snap_back(id);
        Ok(None)
    }

    fn snap_back(&mut self, id: ItemId) {
        self.ambient.on_drag_finished(id);
        self.pipeline.on_snapped_back(id);
        if let Some(live) = self.live_mut(id) {
            live.swipe = SwipeReveal::NONE;
            live.translation_x = 0.0;
        }
        self.request_children_update();
    }

    /// Horizontal swipe progress: `offset` is the raw signed drag distance.
    pub fn on_swipe_progress(&mut self, id: ItemId, offset: f64) -> Result<()> {
        let action_offset = SwipeReveal::action_offset_for_width(self.width);
        let Some(live) = self.live_mut(id) else {
            log::warn!("on_swipe_progress: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        };
        let reveal = SwipeReveal::from_drag(offset, action_offset);
        live.swipe = reveal;
        live.translation_x = reveal.translation_x;
        self.request_children_update();
        Ok(())
    }

    /// The swipe collaborator committed a dismissal of `id`.
    ///
    /// While a dismiss-all is in progress the commit is ignored: the item snaps
    /// back and `Ok(None)` is returned.
    pub fn on_swipe_commit(&mut self, id: ItemId) -> Result<Option<T>> {
        self.swiping_in_progress = false;
        if !self.items.is_alive(id) {
            log::warn!("on_swipe_commit: {id:?} is not in the stack");
            return Err(StackError::StaleItem(id));
        }
        if self.dismiss_all_in_progress {
            log::debug!("swipe commit of {id:?} ignored during dismiss-all");
            self.snap_back(id);
            return Ok(None);
        }
        self.pipeline.on_swiped_out(id);
        if let Some(sink) = self.lifecycle.as_mut() {
            sink.on_item_dismissed(id);
        }
        self.remove_item(id).map(Some)
    }

    // --- Pointer input ---

    /// Pointer down in viewport coordinates. Returns true if the stack will
    /// track the motion for scrolling.
    pub fn on_pointer_down(&mut self, at: Point) -> bool {
        if !self.scrolling_enabled || self.items.is_empty() {
            return false;
        }
        let bounds = Rect::new(0.0, 0.0, self.width, self.algorithm.layout_height);
        if !bounds.contains(at) {
            return false;
        }
        let tracked = self.physics.on_pointer_down(at);
        self.process_scroll_effects();
        tracked
    }

    /// Pointer move. Returns true once the motion scrolls; before that (or
    /// during a swipe) the motion belongs to the swipe collaborator.
    pub fn on_pointer_move(&mut self, at: Point) -> bool {
        if !self.scrolling_enabled || self.swiping_in_progress {
            return false;
        }
        let claimed = self.physics.on_pointer_move(at);
        self.process_scroll_effects();
        claimed
    }

    /// Pointer up with the finger's vertical velocity (px/s, positive downward).
    pub fn on_pointer_up(&mut self, finger_velocity_y: f64) {
        self.physics.on_pointer_up(-finger_velocity_y, self.now_ms);
        self.process_scroll_effects();
    }

    /// Pointer cancelled.
    pub fn on_pointer_cancel(&mut self) {
        self.physics.on_pointer_cancel();
        self.process_scroll_effects();
    }

    /// The non-gone item under `at`, in viewport coordinates.
    pub fn item_at(&self, at: Point) -> Option<ItemId> {
        self.items
            .iter()
            .filter(|(_, item)| !item.gone)
            .find(|(_, item)| {
                let live = &item.live;
                let top = live.translation_y + live.clip_top_amount;
                let bottom = live.translation_y + live.height;
                top < bottom && Rect::new(0.0, top, self.width, bottom).contains(at)
            })
            .map(|(id, _)| id)
    }

    // --- Frame driver ---

    /// Coalesce into one layout pass on the next frame.
    pub fn request_children_update(&mut self) {
        self.children_update_requested = true;
    }

    /// Produce a frame: advance any fling, then run the pending layout pass.
    pub fn frame(&mut self, now_ms: u64) -> FrameReport {
        self.now_ms = now_ms;
        let flinging = self.physics.compute_scroll(now_ms);
        self.process_scroll_effects();
        let mut report = FrameReport {
            flinging,
            ..FrameReport::default()
        };
        if self.children_update_requested {
            self.children_update_requested = false;
            self.update_children(&mut report);
        }
        report
    }

    fn update_children(&mut self, report: &mut FrameReport) {
        self.detect_height_changes();
        self.sync_ambient();
        self.algorithm
            .compute_state(&self.ambient, &self.items, &mut self.store, &mut self.scratch);
        report.laid_out = true;
        let animating = self.animator.as_ref().is_some_and(|a| a.is_running());
        if !animating && !self.pipeline.has_pending() {
            report.applied = Some(self.apply_current_state());
        } else {
            self.start_animation_to_state(report);
        }
    }

    /// Compare intrinsic heights against what was last accounted for. Any
    /// change refreshes the scroll extent and records a resize.
    fn detect_height_changes(&mut self) {
        let mut changed = Vec::new();
        for &id in self.items.children() {
            let Some(item) = self.items.get(id) else {
                continue;
            };
            if item.gone {
                continue;
            }
            if item.content.intrinsic_height().max(0.0) != item.measured_height {
                changed.push(id);
            }
        }
        if changed.is_empty() {
            return;
        }
        for &id in &changed {
            if let Some(item) = self.items.get_mut(id) {
                item.measured_height = item.content.intrinsic_height().max(0.0);
            }
        }
        log::debug!("intrinsic height changed for {} items", changed.len());
        self.update_content_height();
        self.process_scroll_effects();
        // This pass already covers whatever the extent change requested.
        self.children_update_requested = false;
        self.pipeline.request_view_resize();
        for id in changed {
            self.notify_height_changed(Some(id));
        }
    }

    fn sync_ambient(&mut self) {
        self.ambient.set_scroll_y(self.physics.clamped_scroll_y());
        for edge in [Edge::Top, Edge::Bottom] {
            self.ambient
                .set_overscroll_amount(edge, self.physics.visible_overscroll(edge));
        }
    }

    fn start_animation_to_state(&mut self, report: &mut FrameReport) {
        let events = if self.pipeline.has_pending() {
            self.pipeline.flush()
        } else {
            Vec::new()
        };
        let dispatch = self
            .animator
            .as_ref()
            .is_some_and(|animator| !events.is_empty() || animator.is_running());
        if let Some(animator) = self.animator.as_mut().filter(|_| dispatch) {
            log::debug!(
                "dispatching {} events ({} ms)",
                events.len(),
                AnimationEvent::combined_duration(&events)
            );
            animator.animate(&events, &self.store, 0);
            report.dispatched_events = events.len();
        } else {
            if !events.is_empty() {
                log::trace!("no animator attached; applying {} events directly", events.len());
            }
            report.applied = Some(self.apply_current_state());
        }
        self.pipeline.finish_flush();
    }

    fn apply_current_state(&mut self) -> ApplyReport {
        let report = self.store.apply(&mut self.items);
        if let Some(host) = self.host.as_mut() {
            host.on_child_locations_changed();
        }
        report
    }

    fn process_scroll_effects(&mut self) {
        loop {
            let effects: Vec<ScrollEffect> = self.physics.drain_effects().collect();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.handle_scroll_effect(effect);
            }
        }
    }

    fn handle_scroll_effect(&mut self, effect: ScrollEffect) {
        match effect {
            ScrollEffect::LayoutNeeded => self.request_children_update(),
            ScrollEffect::CancelOverscrollAnimation { edge } => {
                if let Some(animator) = self.animator.as_mut() {
                    animator.cancel_overscroll(edge);
                }
            }
            ScrollEffect::AnimateOverscroll {
                edge,
                target,
                rubberbanded,
            } => match self.animator.as_mut() {
                Some(animator) => animator.animate_overscroll(edge, target, rubberbanded),
                None => {
                    self.physics
                        .set_overscroll_amount_with(target, edge, false, false, rubberbanded);
                }
            },
            ScrollEffect::OverscrollChanged {
                amount,
                rubberbanded,
            } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_overscroll_changed(amount, rubberbanded);
                }
            }
            ScrollEffect::OverscrollFling {
                velocity,
                wants_open,
            } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_overscroll_fling(velocity, wants_open);
                }
            }
        }
    }

    // --- Animator callbacks ---

    /// An item animation finished; lay out again on the next frame.
    pub fn on_item_animation_finished(&mut self) {
        self.request_children_update();
    }

    /// Overscroll progress reported by the animator.
    pub fn set_overscroll_amount(&mut self, edge: Edge, amount: f64) {
        self.physics.set_overscroll_amount(amount, edge, false, false);
        self.process_scroll_effects();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(n: usize) -> (NotificationStack<f64>, Vec<ItemId>) {
        let mut s = NotificationStack::new(StackConfig {
            padding_between_elements: 10.0,
            ..StackConfig::default()
        });
        s.set_viewport(360.0, 300.0);
        let ids = (0..n).map(|_| s.add_item(100.0)).collect();
        s.frame(0);
        (s, ids)
    }

    fn ys(s: &NotificationStack<f64>, ids: &[ItemId]) -> Vec<f64> {
        ids.iter()
            .map(|id| s.item(*id).unwrap().live.translation_y)
            .collect()
    }

    #[test]
    fn frame_without_animator_applies() {
        let (s, ids) = stack(3);
        assert_eq!(ys(&s, &ids), [0.0, 110.0, 220.0]);
        assert_eq!(s.content_height(), 320.0);
        assert_eq!(s.physics().scroll_range(), 20);
    }

    #[test]
    fn updates_are_coalesced() {
        let (mut s, _) = stack(2);
        assert!(!s.frame(16).laid_out, "nothing requested");
        s.on_scroll_delta(-5.0);
        s.on_scroll_delta(-5.0);
        let report = s.frame(32);
        assert!(report.laid_out);
        assert!(!s.frame(48).laid_out, "one pass per request");
    }

    #[test]
    fn structural_errors_are_rejected() {
        let (mut s, ids) = stack(2);
        assert_eq!(
            s.move_item(ids[0], 5),
            Err(StackError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            s.insert_item(3, 1.0),
            Err(StackError::IndexOutOfRange { index: 3, len: 2 })
        );
        s.remove_item(ids[1]).unwrap();
        assert_eq!(s.remove_item(ids[1]), Err(StackError::StaleItem(ids[1])));
        assert_eq!(s.set_gone(ids[1], true), Err(StackError::StaleItem(ids[1])));
        assert_eq!(s.items().len(), 1);
    }

    #[test]
    fn move_reorders_layout() {
        let (mut s, ids) = stack(3);
        s.move_item(ids[2], 0).unwrap();
        s.frame(16);
        assert_eq!(ys(&s, &ids), [110.0, 220.0, 0.0]);
    }

    #[test]
    fn gone_items_leave_layout() {
        let (mut s, ids) = stack(3);
        s.set_gone(ids[0], true).unwrap();
        s.frame(16);
        assert_eq!(s.item(ids[1]).unwrap().live.translation_y, 0.0);
        assert_eq!(s.content_height(), 210.0);
    }

    #[test]
    fn removal_above_scroll_shifts_it() {
        let (mut s, ids) = stack(5);
        s.on_scroll_delta(200.0);
        assert_eq!(s.physics().scroll_y(), 200);
        s.remove_item(ids[0]).unwrap();
        assert_eq!(s.physics().scroll_y(), 90);
    }

    #[test]
    fn removing_gone_item_records_nothing() {
        let (mut s, ids) = stack(3);
        s.set_gone(ids[0], true).unwrap();
        s.frame(16);
        s.remove_item(ids[0]).unwrap();
        assert!(!s.pipeline().has_pending(), "gone items are not drawn, so nothing animates");
        assert_eq!(s.physics().scroll_y(), 0);
    }

    #[test]
    fn gone_item_added_this_frame_leaves_no_event() {
        let (mut s, _) = stack(2);
        let fresh = s.add_item(50.0);
        s.set_gone(fresh, true).unwrap();
        s.remove_item(fresh).unwrap();
        let events = s.pipeline_mut().flush();
        assert!(events.is_empty(), "pending add was dropped: {events:?}");
    }

    #[test]
    fn swipe_progress_translates_item() {
        let (mut s, ids) = stack(2);
        s.on_drag_begin(ids[0]).unwrap();
        s.on_swipe_progress(ids[0], 30.0).unwrap();
        let live = s.item(ids[0]).unwrap().live;
        assert_eq!(live.translation_x, 30.0);
        assert!((live.swipe.label_alpha - 0.5).abs() < 1e-9);
        assert!(!s.on_pointer_move(Point::new(10.0, 10.0)), "swipe owns the motion");
    }

    #[test]
    fn dismiss_all_ignores_commits() {
        let (mut s, ids) = stack(2);
        s.set_dismiss_all_in_progress(true);
        assert_eq!(s.on_swipe_commit(ids[0]), Ok(None));
        assert!(s.items().is_alive(ids[0]));
        s.set_dismiss_all_in_progress(false);
        assert_eq!(s.on_swipe_commit(ids[0]), Ok(Some(100.0)));
        assert!(!s.items().is_alive(ids[0]));
    }

    #[test]
    fn item_at_hits_live_bounds() {
        let (s, ids) = stack(3);
        assert_eq!(s.item_at(Point::new(50.0, 50.0)), Some(ids[0]));
        assert_eq!(s.item_at(Point::new(50.0, 115.0)), Some(ids[1]));
        assert_eq!(s.item_at(Point::new(50.0, 105.0)), None, "gap between items");
    }

    #[test]
    fn pointer_outside_viewport_is_ignored() {
        let (mut s, _) = stack(3);
        assert!(!s.on_pointer_down(Point::new(50.0, 400.0)));
        assert!(s.on_pointer_down(Point::new(50.0, 100.0)));
        s.set_scrolling_enabled(false);
        assert!(!s.on_pointer_down(Point::new(50.0, 100.0)));
    }
}
