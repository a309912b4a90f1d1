// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe-action reveal: what shows behind an item while it is swiped sideways.

/// The side whose action is revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwipeSide {
    /// Swiping right reveals the leading "open" action.
    Left,
    /// Swiping left reveals the trailing "dismiss" action.
    Right,
}

/// Resolved swipe geometry for one item.
///
/// Past the action offset the drag meets resistance: only a third of the excess
/// motion is applied. The action label fades in over the first `action_offset`
/// pixels and then travels with the item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeReveal {
    /// Horizontal offset to apply to the item.
    pub translation_x: f64,
    /// Revealed side, `None` at rest.
    pub side: Option<SwipeSide>,
    /// Opacity of the action label in `[0, 1]`.
    pub label_alpha: f64,
    /// Extra label offset once the item has moved past the action offset.
    pub label_translation: f64,
}

impl SwipeReveal {
    /// At rest.
    pub const NONE: Self = Self {
        translation_x: 0.0,
        side: None,
        label_alpha: 0.0,
        label_translation: 0.0,
    };

    /// Action offset for an item of the given width.
    pub fn action_offset_for_width(width: f64) -> f64 {
        width / 6.0
    }

    /// Resolve a raw horizontal drag.
    pub fn from_drag(drag_x: f64, action_offset: f64) -> Self {
        if !drag_x.is_finite() || drag_x == 0.0 {
            return Self::NONE;
        }
        let offset = action_offset.max(0.0);
        let x = if drag_x.abs() > offset {
            let edge = offset.copysign(drag_x);
            edge + (drag_x - edge) / 3.0
        } else {
            drag_x
        };
        let side = if x > 0.0 {
            SwipeSide::Left
        } else {
            SwipeSide::Right
        };
        let (label_alpha, label_translation) = if x.abs() > offset {
            let label = match side {
                SwipeSide::Right => x + offset,
                SwipeSide::Left => x - offset,
            };
            (1.0, label)
        } else {
            (x.abs() / offset, 0.0)
        };
        Self {
            translation_x: x,
            side: Some(side),
            label_alpha,
            label_translation,
        }
    }
}

impl Default for SwipeReveal {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_reveals_nothing() {
        assert_eq!(SwipeReveal::from_drag(0.0, 60.0), SwipeReveal::NONE);
        assert_eq!(SwipeReveal::from_drag(f64::NAN, 60.0), SwipeReveal::NONE);
    }

    #[test]
    fn label_fades_in_before_the_offset() {
        let r = SwipeReveal::from_drag(30.0, 60.0);
        assert_eq!(r.side, Some(SwipeSide::Left));
        assert_eq!(r.translation_x, 30.0);
        assert!((r.label_alpha - 0.5).abs() < 1e-9);
        assert_eq!(r.label_translation, 0.0);
    }

    #[test]
    fn resistance_past_the_offset() {
        let r = SwipeReveal::from_drag(-150.0, 60.0);
        assert_eq!(r.side, Some(SwipeSide::Right));
        assert!((r.translation_x - -90.0).abs() < 1e-9, "60 + 90 / 3");
        assert_eq!(r.label_alpha, 1.0);
        assert!((r.label_translation - -30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_offset_reveals_fully() {
        let r = SwipeReveal::from_drag(9.0, 0.0);
        assert_eq!(r.label_alpha, 1.0);
        assert!((r.translation_x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn offset_follows_width() {
        assert_eq!(SwipeReveal::action_offset_for_width(360.0), 60.0);
    }
}
