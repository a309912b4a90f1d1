// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Stack: layout and animation reconciliation for a stack of dismissible items.
//!
//! A [`NotificationStack`] owns an ordered collection of items (anything that can
//! report an intrinsic height through [`HeightProvider`]) and turns structural
//! mutations, scroll input, and swipe gestures into per-item targets.
//!
//! The pipeline for one frame is:
//!
//! 1. Mutations and input record what happened. Structural changes become pending
//!    [`AnimationEvent`]s in the [`AnimationPipeline`]; scroll input moves the
//!    [`ScrollPhysics`](understory_scroll::ScrollPhysics) model. Both only request an
//!    update.
//! 2. [`NotificationStack::frame`] snapshots scroll and overscroll into an
//!    [`AmbientState`] and runs the [`StackScrollAlgorithm`], writing one
//!    [`ViewState`] per item into the [`ViewStateStore`].
//! 3. If nothing is animating and nothing is pending, the targets are applied to the
//!    items' [`LiveProperties`] directly, writing only what changed. Otherwise the
//!    batch of events and the targets go to the attached [`StackAnimator`].
//!
//! The algorithm is a pure function of the ambient snapshot and the items, so the
//! same inputs always produce the same targets.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_stack::{NotificationStack, StackConfig};
//!
//! let mut stack: NotificationStack<f64> = NotificationStack::new(StackConfig {
//!     padding_between_elements: 10.0,
//!     ..StackConfig::default()
//! });
//! stack.set_viewport(360.0, 300.0);
//! let ids: Vec<_> = (0..5).map(|_| stack.add_item(100.0)).collect();
//!
//! // Without an animator the first frame applies the layout directly.
//! let report = stack.frame(0);
//! assert!(report.applied.is_some());
//! let ys: Vec<f64> = ids
//!     .iter()
//!     .map(|id| stack.item(*id).unwrap().live.translation_y)
//!     .collect();
//! assert_eq!(ys, [0.0, 110.0, 220.0, 330.0, 440.0]);
//! assert_eq!(stack.physics().scroll_range(), 240);
//! ```

mod algorithm;
mod ambient;
mod animation;
mod error;
mod host;
mod item;
mod stack;
mod swipe;
mod view_state;

pub use algorithm::{AlgorithmScratch, StackDirection, StackScrollAlgorithm};
pub use ambient::AmbientState;
pub use animation::{
    AnimationEvent, AnimationFilter, AnimationPipeline, AnimationType, PipelineState,
};
pub use error::{Result, StackError};
pub use host::{ItemLifecycleSink, StackAnimator, StackHost};
pub use item::{HeightProvider, Item, ItemId, ItemList, LayerHint, LiveProperties, Visibility};
pub use stack::{FrameReport, NotificationStack, StackConfig};
pub use swipe::{SwipeReveal, SwipeSide};
pub use view_state::{ApplyReport, ViewState, ViewStateStore};

pub use understory_scroll::Edge;
