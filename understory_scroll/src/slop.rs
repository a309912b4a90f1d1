// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-slop arbitration between vertical scrolling and horizontal swipes.

use kurbo::{Point, Vec2};

/// Decides when a pointer motion becomes a vertical scroll.
///
/// A motion is claimed once its cumulative vertical travel exceeds the slop and
/// dominates horizontal travel (`|dy| > slop && |dy| > |dx|`). Until then the
/// motion stays available to a horizontal swipe recognizer.
///
/// On the claiming move the slop itself is subtracted from the delta, so the
/// content does not jump by the slop distance.
///
/// Deltas use scroll orientation: a finger moving up yields a positive delta.
#[derive(Copy, Clone, Debug)]
pub struct SlopDetector {
    slop: f64,
    down: Option<Point>,
    last_y: f64,
    claimed: bool,
}

impl SlopDetector {
    /// Create a detector with the given slop in px.
    pub fn new(slop: f64) -> Self {
        Self {
            slop: slop.max(0.0),
            down: None,
            last_y: 0.0,
            claimed: false,
        }
    }

    /// Record a pointer down. With `already_claimed` the motion is treated as a
    /// scroll from the start (used when catching a running fling).
    pub fn down(&mut self, at: Point, already_claimed: bool) {
        self.down = Some(at);
        self.last_y = at.y;
        self.claimed = already_claimed;
    }

    /// Feed a pointer move. Returns the scroll delta once the motion is claimed.
    pub fn motion(&mut self, at: Point) -> Option<f64> {
        let down = self.down?;
        let mut delta_y = self.last_y - at.y;
        if !self.claimed {
            let travel: Vec2 = at - down;
            let dy = delta_y.abs();
            let dx = travel.x.abs();
            if dy > self.slop && dy > dx {
                self.claimed = true;
                delta_y -= self.slop.copysign(delta_y);
            }
        }
        if !self.claimed {
            return None;
        }
        self.last_y = at.y;
        Some(delta_y)
    }

    /// Returns true once the current motion is a scroll.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Forget the current motion.
    pub fn reset(&mut self) {
        self.down = None;
        self.claimed = false;
    }
}
