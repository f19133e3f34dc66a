//! Physics error types

use std::error::Error;
use std::fmt;

/// The variant of a [`crate::shapes::Geometry`], used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Circle,
    Point,
    Polygon,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Box => write!(f, "box"),
            ShapeKind::Circle => write!(f, "circle"),
            ShapeKind::Point => write!(f, "point"),
            ShapeKind::Polygon => write!(f, "polygon"),
        }
    }
}

/// Errors raised while constructing geometry or bodies.
///
/// Collision and ray queries never produce errors for a legitimate
/// miss; they return `None` instead.
#[derive(Debug)]
pub enum PhysicsError {
    /// Geometry that cannot participate in collision detection: a
    /// zero-length ray direction, a polygon with fewer than three
    /// vertices or zero area, a negative radius or box extent.
    DegenerateGeometry(String),
    /// A pair routine was handed a combination of shapes it does not
    /// support. The built-in dispatch is total, so seeing this from
    /// library code is a programming error.
    ShapeMismatch { a: ShapeKind, b: ShapeKind },
    /// A body builder was finalized without one of its required
    /// properties.
    MissingProperty(&'static str),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::DegenerateGeometry(what) => {
                write!(f, "degenerate geometry: {}", what)
            }
            PhysicsError::ShapeMismatch { a, b } => {
                write!(f, "unsupported shape pair: {} vs {}", a, b)
            }
            PhysicsError::MissingProperty(name) => {
                write!(f, "missing required body property: {}", name)
            }
        }
    }
}

impl Error for PhysicsError {}
