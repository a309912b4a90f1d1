// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-edge overscroll accumulators.

use crate::Edge;

/// Overscroll state for both edges.
///
/// Each edge carries two views of the same quantity:
/// - the displayed *amount*, which is what layout consumes, and
/// - the raw *pixels* of finger travel that produced it.
///
/// They are related by the rubber-band factor: `pixels = amount / factor`.
/// Amounts are never negative.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Overscroll {
    top_amount: f64,
    bottom_amount: f64,
    top_pixels: f64,
    bottom_pixels: f64,
}

impl Overscroll {
    /// No overscroll on either edge.
    pub const ZERO: Self = Self {
        top_amount: 0.0,
        bottom_amount: 0.0,
        top_pixels: 0.0,
        bottom_pixels: 0.0,
    };

    /// Displayed overscroll amount for `edge`.
    pub fn amount(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top_amount,
            Edge::Bottom => self.bottom_amount,
        }
    }

    /// Raw, un-rubber-banded pixels for `edge`.
    pub fn pixels(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top_pixels,
            Edge::Bottom => self.bottom_pixels,
        }
    }

    /// Returns true if either edge has a non-zero amount.
    pub fn is_active(&self) -> bool {
        self.top_amount > 0.0 || self.bottom_amount > 0.0
    }

    /// Set the raw pixels for `edge` and derive its displayed amount.
    pub fn set_pixels(&mut self, edge: Edge, pixels: f64, rubber_band_factor: f64) {
        self.set_amount(edge, pixels * rubber_band_factor, rubber_band_factor);
    }

    /// Set the displayed amount for `edge` and derive its raw pixels.
    ///
    /// Negative and non-finite amounts collapse to zero.
    pub fn set_amount(&mut self, edge: Edge, amount: f64, rubber_band_factor: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let pixels = if rubber_band_factor > 0.0 {
            amount / rubber_band_factor
        } else {
            amount
        };
        match edge {
            Edge::Top => {
                self.top_amount = amount;
                self.top_pixels = pixels;
            }
            Edge::Bottom => {
                self.bottom_amount = amount;
                self.bottom_pixels = pixels;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_follow_rubber_band() {
        let mut o = Overscroll::ZERO;
        o.set_amount(Edge::Top, 35.0, 0.35);
        assert!((o.pixels(Edge::Top) - 100.0).abs() < 1e-9);
        assert_eq!(o.amount(Edge::Bottom), 0.0);
        assert!(o.is_active());

        o.set_pixels(Edge::Bottom, 20.0, 0.35);
        assert!((o.amount(Edge::Bottom) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn negative_and_nan_collapse_to_zero() {
        let mut o = Overscroll::ZERO;
        o.set_amount(Edge::Bottom, -4.0, 0.35);
        assert_eq!(o.amount(Edge::Bottom), 0.0);
        o.set_amount(Edge::Bottom, f64::NAN, 0.35);
        assert_eq!(o.amount(Edge::Bottom), 0.0);
        assert!(!o.is_active());
    }
}
