// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ports between a [`NotificationStack`](crate::NotificationStack) and its surroundings.

use understory_scroll::Edge;

use crate::animation::AnimationEvent;
use crate::item::ItemId;
use crate::view_state::ViewStateStore;

/// Notifications for the application hosting the stack. All methods default to no-ops.
pub trait StackHost {
    /// A layout was applied directly to the items.
    fn on_child_locations_changed(&mut self) {}

    /// Content height changed, either because of `item` or for the whole stack.
    fn on_height_changed(&mut self, item: Option<ItemId>) {
        let _ = item;
    }

    /// The top overscroll changed.
    fn on_overscroll_changed(&mut self, amount: f64, rubberbanded: bool) {
        let _ = (amount, rubberbanded);
    }

    /// A release pushed into the top overscroll; the host takes over the motion.
    fn on_overscroll_fling(&mut self, velocity: f64, wants_open: bool) {
        let _ = (velocity, wants_open);
    }
}

/// Receives items the user dismissed, so the owner can drop its own records.
pub trait ItemLifecycleSink {
    /// `item` was swiped away and is about to be removed from the stack.
    fn on_item_dismissed(&mut self, item: ItemId);
}

/// The external engine that tweens item properties.
///
/// The stack hands over a batch of events and the freshly computed targets.
/// For each event the animator tweens only the properties its
/// [filter](crate::AnimationFilter) allows, from the item's live value to its
/// target, writing through
/// [`NotificationStack::live_mut`](crate::NotificationStack::live_mut). When an
/// item finishes it calls
/// [`NotificationStack::on_item_animation_finished`](crate::NotificationStack::on_item_animation_finished).
pub trait StackAnimator {
    /// Start (or retarget) animations for a batch.
    fn animate(&mut self, events: &[AnimationEvent], targets: &ViewStateStore, start_delay_ms: u64);

    /// Returns true while any item animation is running.
    fn is_running(&self) -> bool;

    /// Tween the overscroll on `edge` to `target`, reporting progress through
    /// [`NotificationStack::set_overscroll_amount`](crate::NotificationStack::set_overscroll_amount).
    fn animate_overscroll(&mut self, edge: Edge, target: f64, rubberbanded: bool);

    /// Stop any overscroll animation on `edge`.
    fn cancel_overscroll(&mut self, edge: Edge);
}
