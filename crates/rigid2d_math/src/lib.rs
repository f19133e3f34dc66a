//! 2D math primitives for rigid2d
//!
//! Provides the plane vector type used throughout the engine and the
//! closed interval type that backs shape projections.

pub mod interval;
pub mod vec2;

pub use interval::Interval;
pub use vec2::{Point2, Vec2};
