//! Rays for raycasting against shapes and bodies

use crate::error::PhysicsError;
use rigid2d_math::{Point2, Vec2};

/// A ray with an origin and a unit direction. Immutable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Point2,
    direction: Vec2,
}

impl Ray {
    /// Create a ray from an origin and a direction. The direction is
    /// normalized; a zero direction is rejected.
    pub fn new(origin: Point2, direction: Vec2) -> Result<Self, PhysicsError> {
        if direction.length_squared() == 0.0 {
            return Err(PhysicsError::DegenerateGeometry(
                "zero-length ray direction".into(),
            ));
        }
        Ok(Self {
            origin,
            direction: direction.normalized(),
        })
    }

    /// Create a ray from an origin and an angle off the positive x axis.
    pub fn from_angle(origin: Point2, angle: f64) -> Self {
        Self {
            origin,
            direction: Vec2::from_polar(1.0, angle),
        }
    }

    #[inline]
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// The point on the ray the given distance from its origin.
    #[inline]
    pub fn at_distance(&self, distance: f64) -> Point2 {
        self.origin + self.direction * distance
    }
}
