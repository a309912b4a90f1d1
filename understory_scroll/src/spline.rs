// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spline-based fling deceleration.
//!
//! The curve and its constants match the classic mobile scroller: a fling of
//! initial velocity `v` travels a distance and lasts a duration derived from a
//! tension spline, decelerating smoothly to zero.

use std::sync::LazyLock;

const INFLECTION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLECTION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
// (ln(0.78) / ln(0.9)).abs()
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Sampled distance fractions along the spline, indexed by time fraction.
static SPLINE_POSITIONS: LazyLock<[f64; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0; NB_SAMPLES + 1];
    let mut x_min = 0.0_f64;
    for (i, slot) in positions.iter_mut().enumerate().take(NB_SAMPLES) {
        let alpha = i as f64 / NB_SAMPLES as f64;
        let mut x_max = 1.0_f64;
        // Bisect for x such that bezier(x) == alpha.
        loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < 1e-5 {
                *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
                break;
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        }
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Point samples of the fling spline.
#[derive(Copy, Clone, Debug)]
pub struct FlingSpline;

impl FlingSpline {
    /// Sample the spline at `time` in `[0, 1]`.
    ///
    /// Returns `(distance_fraction, velocity_coefficient)`.
    pub fn sample(time: f64) -> (f64, f64) {
        let t = if time.is_finite() {
            time.clamp(0.0, 1.0)
        } else {
            1.0
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "t is clamped to [0, 1], so the index is in [0, NB_SAMPLES]."
        )]
        let index = (NB_SAMPLES as f64 * t) as usize;
        if index >= NB_SAMPLES {
            return (1.0, 0.0);
        }
        let positions = &*SPLINE_POSITIONS;
        let (t_inf, t_sup) = (
            index as f64 / NB_SAMPLES as f64,
            (index + 1) as f64 / NB_SAMPLES as f64,
        );
        let (d_inf, d_sup) = (positions[index], positions[index + 1]);
        let velocity = (d_sup - d_inf) / (t_sup - t_inf);
        (d_inf + (t - t_inf) * velocity, velocity)
    }
}

/// A fully resolved fling: where it ends and how long it takes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlingInfo {
    /// Initial velocity in px/s. The sign gives the direction.
    pub initial_velocity: f64,
    /// Total unsigned distance in px.
    pub distance: f64,
    /// Total duration in ms.
    pub duration_ms: u64,
}

impl FlingInfo {
    /// A fling that does not move.
    pub const NONE: Self = Self {
        initial_velocity: 0.0,
        distance: 0.0,
        duration_ms: 0,
    };

    fn progress(&self, elapsed_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        elapsed_ms as f64 / self.duration_ms as f64
    }

    /// Signed offset from the fling start after `elapsed_ms`.
    pub fn offset(&self, elapsed_ms: u64) -> f64 {
        let (fraction, _) = FlingSpline::sample(self.progress(elapsed_ms));
        self.distance * self.initial_velocity.signum() * fraction
    }

    /// Signed velocity in px/s after `elapsed_ms`.
    pub fn velocity(&self, elapsed_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let (_, coefficient) = FlingSpline::sample(self.progress(elapsed_ms));
        coefficient * self.initial_velocity.signum() * self.distance / self.duration_ms as f64
            * 1000.0
    }

    /// Signed total offset at the end of the fling.
    pub fn final_offset(&self) -> f64 {
        self.distance * self.initial_velocity.signum()
    }
}

/// Turns an initial velocity into a [`FlingInfo`] using friction and screen density.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlingCalculator {
    friction: f64,
    physical_coefficient: f64,
}

impl FlingCalculator {
    /// Default scroll friction.
    pub const DEFAULT_FRICTION: f64 = 0.015;

    /// Create a calculator for a friction coefficient and a density (1.0 = 160 dpi).
    pub fn new(friction: f64, density: f64) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    fn spline_deceleration(&self, velocity: f64) -> f64 {
        (INFLECTION * velocity.abs() / (self.friction * self.physical_coefficient)).ln()
    }

    /// Resolve the fling for `velocity` px/s.
    pub fn fling_info(&self, velocity: f64) -> FlingInfo {
        if velocity == 0.0 || !velocity.is_finite() {
            return FlingInfo::NONE;
        }
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE - 1.0;
        let distance = self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE / decel_minus_one * l).exp();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "exp() is positive and fling durations stay far below u64::MAX ms."
        )]
        let duration_ms = (1000.0 * (l / decel_minus_one).exp()) as u64;
        FlingInfo {
            initial_velocity: velocity,
            distance,
            duration_ms,
        }
    }
}

impl Default for FlingCalculator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRICTION, 1.0)
    }
}
