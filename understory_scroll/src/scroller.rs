// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven fling trajectory.

use crate::spline::{FlingCalculator, FlingInfo};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Mode {
    Idle,
    Fling {
        start_y: i32,
        start_ms: u64,
        info: FlingInfo,
    },
}

/// A ballistic scroller sampled with explicit timestamps.
///
/// The trajectory itself is unbounded; callers enforce scroll bounds and any
/// permitted over-fling distance when they consume [`Scroller::curr_y`].
#[derive(Clone, Debug)]
pub struct Scroller {
    calculator: FlingCalculator,
    mode: Mode,
    curr_y: i32,
    curr_velocity: f64,
}

impl Scroller {
    /// Create an idle scroller.
    pub fn new(calculator: FlingCalculator) -> Self {
        Self {
            calculator,
            mode: Mode::Idle,
            curr_y: 0,
            curr_velocity: 0.0,
        }
    }

    /// Start a fling at `start_y` with `velocity` px/s (positive scrolls forward).
    pub fn fling(&mut self, start_y: i32, velocity: f64, now_ms: u64) {
        let info = self.calculator.fling_info(velocity);
        self.curr_y = start_y;
        self.curr_velocity = velocity;
        if info.duration_ms == 0 {
            self.mode = Mode::Idle;
            return;
        }
        log::trace!(
            "fling from {start_y} at {velocity} px/s: {:.1} px over {} ms",
            info.final_offset(),
            info.duration_ms
        );
        self.mode = Mode::Fling {
            start_y,
            start_ms: now_ms,
            info,
        };
    }

    /// Advance to `now_ms`.
    ///
    /// Returns `false` if the scroller was already idle. On the sample that
    /// reaches the end of the trajectory it returns `true` and becomes idle.
    pub fn compute_scroll_offset(&mut self, now_ms: u64) -> bool {
        let Mode::Fling {
            start_y,
            start_ms,
            info,
        } = self.mode
        else {
            return false;
        };
        let elapsed = now_ms.saturating_sub(start_ms);
        let offset = if elapsed >= info.duration_ms {
            self.mode = Mode::Idle;
            self.curr_velocity = 0.0;
            info.final_offset()
        } else {
            self.curr_velocity = info.velocity(elapsed);
            info.offset(elapsed)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Scroll positions are integral pixels well inside i32."
        )]
        let offset = offset.round() as i32;
        self.curr_y = start_y.saturating_add(offset);
        true
    }

    /// Stop immediately, keeping the current position.
    pub fn force_finished(&mut self) {
        self.mode = Mode::Idle;
        self.curr_velocity = 0.0;
    }

    /// Returns true if no fling is in progress.
    pub fn is_finished(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    /// Most recently sampled position.
    pub fn curr_y(&self) -> i32 {
        self.curr_y
    }

    /// Most recently sampled velocity in px/s.
    pub fn curr_velocity(&self) -> f64 {
        self.curr_velocity
    }

    /// Final position of the running fling, if any.
    pub fn final_y(&self) -> Option<i32> {
        match self.mode {
            Mode::Idle => None,
            Mode::Fling { start_y, info, .. } => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Scroll positions are integral pixels well inside i32."
                )]
                let offset = info.final_offset().round() as i32;
                Some(start_y.saturating_add(offset))
            }
        }
    }
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(FlingCalculator::default())
    }
}
