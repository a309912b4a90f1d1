// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll and overscroll state machine.

use kurbo::Point;

use crate::{Edge, FlingCalculator, Overscroll, Scroller, SlopDetector};

/// Tunables for [`ScrollPhysics`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Multiplier (< 1) from raw overscroll pixels to the displayed amount.
    pub rubber_band_factor: f64,
    /// Vertical travel in px before a pointer motion becomes a scroll.
    pub touch_slop: f64,
    /// Release velocities at or below this (px/s) do not fling.
    pub min_fling_velocity: f64,
    /// Release velocities are clamped to this magnitude (px/s).
    pub max_fling_velocity: f64,
    /// Over-fling distance per 1000 px/s of velocity when a fling crosses an edge.
    pub overfling_distance: f64,
    /// Screen density (1.0 = 160 dpi), scales the fling deceleration.
    pub density: f64,
    /// Fling friction.
    pub friction: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            rubber_band_factor: 0.35,
            touch_slop: 8.0,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8000.0,
            overfling_distance: 6.0,
            density: 1.0,
            friction: FlingCalculator::DEFAULT_FRICTION,
        }
    }
}

/// Something the owner of a [`ScrollPhysics`] must act on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollEffect {
    /// Scroll position or overscroll changed; a layout pass is due.
    LayoutNeeded,
    /// Stop any running overscroll animation on `edge`.
    CancelOverscrollAnimation {
        /// Affected edge.
        edge: Edge,
    },
    /// Animate the overscroll amount on `edge` from its current value to `target`.
    ///
    /// The animator reports progress through
    /// [`ScrollPhysics::set_overscroll_amount`] with `animate == false`.
    AnimateOverscroll {
        /// Affected edge.
        edge: Edge,
        /// Final amount.
        target: f64,
        /// Whether the motion reads as rubber-banding.
        rubberbanded: bool,
    },
    /// The top overscroll changed.
    OverscrollChanged {
        /// New top amount, including any over-fling past the top.
        amount: f64,
        /// Whether the motion reads as rubber-banding.
        rubberbanded: bool,
    },
    /// A release pushed deeper into an existing top overscroll; the host takes over.
    OverscrollFling {
        /// Release velocity in scroll space.
        velocity: f64,
        /// The host should treat the motion as an open gesture.
        wants_open: bool,
    },
}

/// Scroll position, overscroll accumulators, and fling integration for one list.
///
/// Positions grow forward: `0` shows the start of the content and
/// [`scroll_range`](Self::scroll_range) shows its end. Positive deltas and
/// velocities move forward.
///
/// The scroll position stays inside `[0, scroll_range]` except while a fling is
/// in flight, where it may briefly over-fling. Whatever lands outside the range
/// is folded into the matching overscroll edge by
/// [`spring_back`](Self::spring_back) and animated home.
#[derive(Clone, Debug)]
pub struct ScrollPhysics {
    config: ScrollConfig,
    scroll_y: i32,
    content_height: f64,
    viewport_height: f64,
    item_count: usize,
    overscroll: Overscroll,
    scroller: Scroller,
    max_overscroll: f64,
    is_being_dragged: bool,
    scrolled_to_top_on_first_down: bool,
    dont_report_next_overscroll: bool,
    slop: SlopDetector,
    effects: Vec<ScrollEffect>,
}

impl ScrollPhysics {
    /// Create a model with no content.
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            scroll_y: 0,
            content_height: 0.0,
            viewport_height: 0.0,
            item_count: 0,
            overscroll: Overscroll::ZERO,
            scroller: Scroller::new(FlingCalculator::new(config.friction, config.density)),
            max_overscroll: 0.0,
            is_being_dragged: false,
            scrolled_to_top_on_first_down: false,
            dont_report_next_overscroll: false,
            slop: SlopDetector::new(config.touch_slop),
            effects: Vec::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Update the content extent. Clamps the scroll position if the range shrank.
    pub fn set_content(&mut self, content_height: f64, item_count: usize) {
        self.content_height = content_height.max(0.0);
        self.item_count = item_count;
        self.clamp_scroll_position();
    }

    /// Update the viewport height. Clamps the scroll position if the range shrank.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll_position();
    }

    /// Viewport height.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Content height.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// `max(0, content_height - viewport_height)`, in whole pixels.
    pub fn scroll_range(&self) -> i32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Heights are layout pixels well inside i32."
        )]
        let range = (self.content_height - self.viewport_height) as i32;
        range.max(0)
    }

    /// Current scroll position. Negative or past the range only during a fling.
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    /// Overscroll accumulators.
    pub fn overscroll(&self) -> &Overscroll {
        &self.overscroll
    }

    /// Displayed overscroll amount for `edge`.
    pub fn overscroll_amount(&self, edge: Edge) -> f64 {
        self.overscroll.amount(edge)
    }

    /// Overscroll as it should be drawn: the accumulator plus any part of the
    /// scroll position currently outside `[0, scroll_range]`.
    pub fn visible_overscroll(&self, edge: Edge) -> f64 {
        let outside = match edge {
            Edge::Top => -self.scroll_y,
            Edge::Bottom => self.scroll_y - self.scroll_range(),
        };
        self.overscroll.amount(edge) + f64::from(outside.max(0))
    }

    /// Scroll position clamped into `[0, scroll_range]`.
    pub fn clamped_scroll_y(&self) -> i32 {
        self.scroll_y.clamp(0, self.scroll_range())
    }

    /// Returns true while a pointer gesture is scrolling.
    pub fn is_being_dragged(&self) -> bool {
        self.is_being_dragged
    }

    /// Returns true while a fling is in flight.
    pub fn is_flinging(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// Rubber-banding applies to the bottom edge always, and to the top edge
    /// unless the gesture started at the very top.
    pub fn is_rubberbanded(&self, edge: Edge) -> bool {
        edge == Edge::Bottom || !self.scrolled_to_top_on_first_down
    }

    /// Take the queued effects.
    pub fn drain_effects(&mut self) -> impl Iterator<Item = ScrollEffect> + '_ {
        self.effects.drain(..)
    }

    /// Returns true if effects are queued.
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Apply a drag delta in px. Motion that cannot scroll is rubber-banded into
    /// the overscroll of the edge it pushes against.
    pub fn scroll_by(&mut self, delta: f64) {
        if self.item_count == 0 {
            return;
        }
        if !delta.is_finite() {
            log::warn!("ignoring non-finite scroll delta {delta}");
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Drag deltas are whole pixels well inside i32."
        )]
        let delta = delta.round() as i32;
        let range = self.scroll_range();
        let scroll_amount = if delta < 0 {
            self.overscroll_down(delta)
        } else {
            self.overscroll_up(delta, range)
        };
        if scroll_amount != 0.0 {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Bounded by the drag delta."
            )]
            let scroll_amount = scroll_amount as i32;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Viewport heights are well inside i32."
            )]
            let max_overscroll = (self.viewport_height / 2.0) as i32;
            self.over_scroll_by(scroll_amount, self.scroll_y, range, max_overscroll);
        }
    }

    /// Forward motion: first relieve top overscroll, then scroll, then
    /// overscroll the bottom. Returns the part left for scrolling.
    fn overscroll_up(&mut self, delta: i32, range: i32) -> f64 {
        let delta = f64::from(delta.max(0));
        let current_top = self.overscroll.amount(Edge::Top);
        let new_top = current_top - delta;
        if current_top > 0.0 {
            self.set_overscroll_amount(new_top, Edge::Top, false, true);
        }
        let mut scroll_amount = if new_top < 0.0 { -new_top } else { 0.0 };
        let new_scroll = f64::from(self.scroll_y) + scroll_amount;
        if new_scroll > f64::from(range) {
            let pixels = self.overscroll.pixels(Edge::Bottom);
            self.set_overscrolled_pixels(
                pixels + new_scroll - f64::from(range),
                Edge::Bottom,
                false,
            );
            self.scroll_y = range;
            scroll_amount = 0.0;
        }
        scroll_amount
    }

    /// Backward motion, mirroring [`Self::overscroll_up`].
    fn overscroll_down(&mut self, delta: i32) -> f64 {
        let delta = f64::from(delta.min(0));
        let current_bottom = self.overscroll.amount(Edge::Bottom);
        let new_bottom = current_bottom + delta;
        if current_bottom > 0.0 {
            self.set_overscroll_amount(new_bottom, Edge::Bottom, false, true);
        }
        let mut scroll_amount = if new_bottom < 0.0 { new_bottom } else { 0.0 };
        let new_scroll = f64::from(self.scroll_y) + scroll_amount;
        if new_scroll < 0.0 {
            let pixels = self.overscroll.pixels(Edge::Top);
            self.set_overscrolled_pixels(pixels - new_scroll, Edge::Top, false);
            self.scroll_y = 0;
            scroll_amount = 0.0;
        }
        scroll_amount
    }

    /// Move by `delta` from `scroll_y`, clamped to `[-max, range + max]`.
    /// Returns true if clamped.
    fn over_scroll_by(&mut self, delta: i32, scroll_y: i32, range: i32, max: i32) -> bool {
        let mut new_scroll = scroll_y.saturating_add(delta);
        let top = -max;
        let bottom = range.saturating_add(max);
        let mut clamped = false;
        if new_scroll > bottom {
            new_scroll = bottom;
            clamped = true;
        } else if new_scroll < top {
            new_scroll = top;
            clamped = true;
        }
        self.on_over_scrolled(new_scroll, clamped);
        clamped
    }

    fn on_over_scrolled(&mut self, scroll_y: i32, clamped: bool) {
        self.scroll_y = scroll_y;
        if self.scroller.is_finished() {
            self.effects.push(ScrollEffect::LayoutNeeded);
            return;
        }
        if clamped {
            self.spring_back();
            return;
        }
        self.effects.push(ScrollEffect::LayoutNeeded);
        let top = if self.scroll_y < 0 {
            f64::from(-self.scroll_y)
        } else {
            self.overscroll.amount(Edge::Top)
        };
        self.notify_top_overscroll(top, self.is_rubberbanded(Edge::Top));
    }

    /// Clamp an out-of-range scroll position, folding the excess into the
    /// matching edge's overscroll. Returns the edge that received it.
    fn fold_out_of_range(&mut self) -> Option<Edge> {
        let range = self.scroll_range();
        let (edge, excess) = if self.scroll_y < 0 {
            (Edge::Top, -self.scroll_y)
        } else if self.scroll_y > range {
            (Edge::Bottom, self.scroll_y - range)
        } else {
            return None;
        };
        self.scroll_y = self.scroll_y.clamp(0, range);
        if edge == Edge::Top {
            self.dont_report_next_overscroll = true;
        }
        let amount = self.overscroll.amount(edge) + f64::from(excess);
        log::debug!("spring back: {excess} px folded into {edge:?} overscroll");
        self.set_overscroll_amount(amount, edge, false, true);
        Some(edge)
    }

    fn animate_edges_home(&mut self) {
        for edge in [Edge::Top, Edge::Bottom] {
            if self.overscroll.amount(edge) > 0.0 {
                self.set_overscroll_amount(0.0, edge, true, true);
            }
        }
    }

    /// Restore the scroll invariant: clamp into `[0, scroll_range]`, fold the
    /// excess into overscroll, and animate every non-zero edge back to zero.
    ///
    /// Stops any running fling.
    pub fn spring_back(&mut self) {
        self.fold_out_of_range();
        self.animate_edges_home();
        self.scroller.force_finished();
    }

    /// Release with a velocity in px/s (scroll space). Ends the drag.
    ///
    /// - Slow releases only spring back.
    /// - With a zero scroll range there is nothing to fling; it springs back.
    /// - A release that relieves an existing overscroll folds that overscroll
    ///   into the fling's start position, so motion stays continuous.
    /// - A release pushing deeper into the top overscroll is handed to the host
    ///   as [`ScrollEffect::OverscrollFling`].
    pub fn fling(&mut self, velocity: f64, now_ms: u64) {
        if self.item_count == 0 {
            self.end_drag();
            return;
        }
        if !velocity.is_finite() {
            log::warn!("ignoring non-finite fling velocity {velocity}");
            self.fold_out_of_range();
            self.end_drag();
            return;
        }
        let max = self.config.max_fling_velocity;
        let velocity = velocity.clamp(-max, max);
        let range = self.scroll_range();
        if velocity.abs() <= self.config.min_fling_velocity || range == 0 {
            self.fold_out_of_range();
            self.end_drag();
            return;
        }

        let top = self.overscroll.amount(Edge::Top);
        let bottom = self.overscroll.amount(Edge::Bottom);
        let overfling = velocity.abs() / 1000.0
            * self.config.rubber_band_factor
            * self.config.overfling_distance;
        if top > 0.0 {
            if velocity < 0.0 {
                log::debug!("overscroll fling at {velocity} px/s");
                self.effects.push(ScrollEffect::OverscrollFling {
                    velocity,
                    wants_open: true,
                });
                self.dont_report_next_overscroll = true;
                self.set_overscroll_amount(0.0, Edge::Top, false, true);
                self.end_drag();
                return;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Overscroll amounts are bounded by the viewport."
            )]
            let folded = top as i32;
            self.scroll_y -= folded;
            self.dont_report_next_overscroll = true;
            self.set_overscroll_amount(0.0, Edge::Top, false, true);
            self.max_overscroll = overfling + top;
        } else if bottom > 0.0 {
            if velocity > 0.0 {
                self.end_drag();
                return;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Overscroll amounts are bounded by the viewport."
            )]
            let folded = bottom as i32;
            self.scroll_y += folded;
            self.set_overscroll_amount(0.0, Edge::Bottom, false, true);
            self.max_overscroll = overfling + bottom;
        } else {
            // Set once the trajectory crosses an edge.
            self.max_overscroll = 0.0;
        }
        self.scroller.fling(self.scroll_y, velocity, now_ms);
        self.effects.push(ScrollEffect::LayoutNeeded);
        self.end_drag();
    }

    /// Advance a running fling to `now_ms`. Returns true while motion continues.
    pub fn compute_scroll(&mut self, now_ms: u64) -> bool {
        if !self.scroller.compute_scroll_offset(now_ms) {
            return false;
        }
        let old_y = self.scroll_y;
        let y = self.scroller.curr_y();
        if y != old_y {
            let range = self.scroll_range();
            if (y < 0 && old_y >= 0) || (y > range && old_y <= range) {
                let velocity = self.scroller.curr_velocity().abs();
                if velocity >= self.config.min_fling_velocity {
                    self.max_overscroll = velocity / 1000.0 * self.config.overfling_distance;
                }
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Over-fling distance is a handful of pixels."
            )]
            let max = self.max_overscroll as i32;
            self.over_scroll_by(y - old_y, old_y, range, max);
        }
        if self.scroller.is_finished() {
            let range = self.scroll_range();
            if self.scroll_y < 0 || self.scroll_y > range {
                self.spring_back();
            }
        }
        !self.scroller.is_finished()
    }

    /// Stop dragging and animate any overscroll back to zero.
    pub fn end_drag(&mut self) {
        self.is_being_dragged = false;
        self.slop.reset();
        self.animate_edges_home();
    }

    /// Set the displayed overscroll on `edge`.
    ///
    /// With `animate`, an [`ScrollEffect::AnimateOverscroll`] is queued and the
    /// accumulator is left for the animator to drive. Otherwise the value is
    /// stored immediately and a layout is requested. `cancel_animators` first
    /// stops any running animation on the same edge.
    pub fn set_overscroll_amount(
        &mut self,
        amount: f64,
        edge: Edge,
        animate: bool,
        cancel_animators: bool,
    ) {
        let rubberbanded = self.is_rubberbanded(edge);
        self.set_overscroll_amount_with(amount, edge, animate, cancel_animators, rubberbanded);
    }

    /// [`set_overscroll_amount`](Self::set_overscroll_amount) with an explicit
    /// rubber-band flag for the host notification.
    pub fn set_overscroll_amount_with(
        &mut self,
        amount: f64,
        edge: Edge,
        animate: bool,
        cancel_animators: bool,
        rubberbanded: bool,
    ) {
        if cancel_animators {
            self.effects
                .push(ScrollEffect::CancelOverscrollAnimation { edge });
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        if animate {
            self.effects.push(ScrollEffect::AnimateOverscroll {
                edge,
                target: amount,
                rubberbanded,
            });
            return;
        }
        self.overscroll
            .set_amount(edge, amount, self.config.rubber_band_factor);
        if edge == Edge::Top {
            self.notify_top_overscroll(amount, rubberbanded);
        }
        self.effects.push(ScrollEffect::LayoutNeeded);
    }

    /// Set raw overscroll pixels on `edge`; the displayed amount is rubber-banded.
    pub fn set_overscrolled_pixels(&mut self, pixels: f64, edge: Edge, animate: bool) {
        self.set_overscroll_amount(
            pixels * self.config.rubber_band_factor,
            edge,
            animate,
            true,
        );
    }

    fn notify_top_overscroll(&mut self, amount: f64, rubberbanded: bool) {
        if self.dont_report_next_overscroll {
            self.dont_report_next_overscroll = false;
            return;
        }
        self.effects.push(ScrollEffect::OverscrollChanged {
            amount,
            rubberbanded,
        });
    }

    /// Pull the scroll position back to `scroll_range` if it exceeds it.
    pub fn clamp_scroll_position(&mut self) {
        let range = self.scroll_range();
        if self.scroll_y > range && self.scroller.is_finished() {
            self.scroll_y = range;
            self.effects.push(ScrollEffect::LayoutNeeded);
        }
    }

    /// Correct the scroll position for a removed span `[start, start + span)`
    /// of content, measured from the top of the content.
    ///
    /// A span entirely above the viewport shifts the scroll back by its size.
    /// A span straddling the top of the viewport pins the scroll to its start.
    pub fn adjust_for_removed_span(&mut self, start: f64, span: f64) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Content offsets are layout pixels well inside i32."
        )]
        let (start, span) = (start as i32, span as i32);
        let end = start + span;
        if end <= self.scroll_y {
            self.scroll_y -= span;
        } else if start < self.scroll_y {
            self.scroll_y = start;
        } else {
            return;
        }
        self.effects.push(ScrollEffect::LayoutNeeded);
    }

    /// Pointer down inside the content. Catching a running fling stops it and
    /// makes this motion a scroll from the start.
    ///
    /// Returns false if there is nothing to scroll.
    pub fn on_pointer_down(&mut self, at: Point) -> bool {
        if self.item_count == 0 {
            return false;
        }
        let was_flinging = !self.scroller.is_finished();
        self.is_being_dragged = was_flinging;
        self.scroller.force_finished();
        self.scrolled_to_top_on_first_down = self.scroll_y == 0;
        self.slop.down(at, was_flinging);
        true
    }

    /// Pointer move. Returns true once the motion is claimed as a scroll.
    pub fn on_pointer_move(&mut self, at: Point) -> bool {
        let Some(delta) = self.slop.motion(at) else {
            return false;
        };
        self.is_being_dragged = true;
        self.scroll_by(delta);
        true
    }

    /// Pointer up with the release velocity in scroll space.
    pub fn on_pointer_up(&mut self, velocity: f64, now_ms: u64) {
        if self.is_being_dragged {
            self.fling(velocity, now_ms);
        } else {
            self.slop.reset();
        }
    }

    /// Pointer cancelled: spring back without flinging.
    pub fn on_pointer_cancel(&mut self) {
        if self.is_being_dragged {
            self.fold_out_of_range();
            self.end_drag();
        } else {
            self.slop.reset();
        }
    }
}

impl Default for ScrollPhysics {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}
