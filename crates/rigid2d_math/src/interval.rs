//! Closed interval on the real line
//!
//! Shape projections onto separating axes are intervals; the overlap
//! tests and minimum translations here are the scalar half of SAT.

use serde::{Deserialize, Serialize};

/// A closed interval `[min, max]` of f64 values. Always non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// Create an interval between two edges; order is unimportant.
    #[inline]
    pub fn new(edge1: f64, edge2: f64) -> Self {
        Self {
            min: edge1.min(edge2),
            max: edge1.max(edge2),
        }
    }

    /// Create an interval of the given width centered on `mid`.
    #[inline]
    pub fn about(mid: f64, width: f64) -> Self {
        Self::new(mid - width / 2.0, mid + width / 2.0)
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of this interval
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of this interval
    #[inline]
    pub fn center(&self) -> f64 {
        self.min + self.width() / 2.0
    }

    /// Smallest interval containing both intervals, including any gap
    /// between them.
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Smallest interval containing this interval and the given value.
    pub fn extended_to(&self, d: f64) -> Interval {
        if d >= self.max {
            Interval { min: self.min, max: d }
        } else if d <= self.min {
            Interval { min: d, max: self.max }
        } else {
            *self
        }
    }

    /// Whether the value lies within this interval, boundary included.
    #[inline]
    pub fn contains(&self, d: f64) -> bool {
        self.min <= d && d <= self.max
    }

    /// Whether some value is contained in both intervals. Touching
    /// endpoints count as intersecting.
    #[inline]
    pub fn intersects(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// The smallest-magnitude signed shift which, applied to this
    /// interval, leaves the two intervals sharing at most an endpoint.
    ///
    /// Negative means shift left. When both directions cost the same,
    /// the leftward (negative) shift is returned.
    pub fn minimum_translation(&self, other: &Interval) -> f64 {
        let shift_left = other.min - self.max;
        let shift_right = other.max - self.min;
        if shift_left.abs() <= shift_right.abs() {
            shift_left
        } else {
            shift_right
        }
    }

    /// Midpoint of the intersection of the two intervals, assuming they
    /// intersect.
    pub fn overlap_midpoint(&self, other: &Interval) -> f64 {
        let shift_left = other.min - self.max;
        let shift_right = other.max - self.min;
        if shift_left.abs() < shift_right.abs() {
            self.max + shift_left / 2.0
        } else {
            self.min + shift_right / 2.0
        }
    }

    /// This interval shifted by `delta`
    #[inline]
    pub fn translated(&self, delta: f64) -> Interval {
        Interval {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// An interval with the same center but the given width
    pub fn stretched(&self, width: f64) -> Interval {
        Interval::about(self.center(), width)
    }
}
