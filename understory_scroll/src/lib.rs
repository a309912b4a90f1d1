// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scroll: scroll physics for vertically stacked lists.
//!
//! This crate owns the one-dimensional scroll model behind a stacked list such as a
//! notification shade:
//!
//! - An integer scroll position clamped to `[0, scroll_range]` while a gesture is active.
//! - Two independent, non-negative overscroll accumulators (top and bottom) fed by
//!   rubber-banded drag motion past either edge.
//! - A spline-based fling trajectory and a spring-back step that converts any
//!   out-of-range position into overscroll, which is then animated back to zero.
//! - A touch-slop policy that decides when a pointer motion becomes a scroll.
//!
//! It does not know about items, layout, or animation engines.
//! Everything that must leave the physics model (a layout request, an overscroll
//! animation, a host notification) is queued as a [`ScrollEffect`] and drained by
//! the owner with [`ScrollPhysics::drain_effects`].
//!
//! ## Time
//!
//! Nothing here reads a clock. Flings are started and sampled with explicit
//! millisecond timestamps, so the whole model is deterministic under test.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_scroll::{Edge, ScrollConfig, ScrollEffect, ScrollPhysics};
//!
//! let mut physics = ScrollPhysics::new(ScrollConfig::default());
//! physics.set_viewport_height(300.0);
//! physics.set_content(540.0, 5);
//! assert_eq!(physics.scroll_range(), 240);
//!
//! // Scroll forward, then keep pulling past the end.
//! physics.scroll_by(200.0);
//! physics.scroll_by(100.0);
//! assert_eq!(physics.scroll_y(), 240);
//! assert!(physics.overscroll_amount(Edge::Bottom) > 0.0);
//!
//! // Releasing asks for the bottom overscroll to be animated back to zero.
//! physics.end_drag();
//! let effects: Vec<_> = physics.drain_effects().collect();
//! assert!(effects.iter().any(|e| matches!(
//!     e,
//!     ScrollEffect::AnimateOverscroll { edge: Edge::Bottom, .. }
//! )));
//! ```

mod overscroll;
mod physics;
mod scroller;
mod slop;
mod spline;

pub use overscroll::Overscroll;
pub use physics::{ScrollConfig, ScrollEffect, ScrollPhysics};
pub use scroller::Scroller;
pub use slop::SlopDetector;
pub use spline::{FlingCalculator, FlingInfo, FlingSpline};

/// One of the two scrollable edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The start of the content (scroll position `0`).
    Top,
    /// The end of the content (scroll position `scroll_range`).
    Bottom,
}

impl Edge {
    /// The opposite edge.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}
