//! Rigid2D - 2D rigid body physics
//!
//! The workspace splits into two library crates plus this binary:
//! - `rigid2d_math`: vectors and intervals
//! - `rigid2d_physics`: shapes, collision detection, rigid bodies and
//!   impulse response
//!
//! This crate re-exports both and adds the TOML/env configuration
//! layer used by the sandbox binary.

pub mod config;

pub use rigid2d_math as math;
pub use rigid2d_physics as physics;
