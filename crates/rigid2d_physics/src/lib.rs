//! 2D rigid body physics for rigid2d
//!
//! This crate provides the collision kernel and impulse response layer:
//! - Collision shapes (boxes, circles, points, convex polygons)
//! - SAT collision detection with minimum translation vectors
//! - Ray casting against all shapes
//! - Rigid body dynamics integrated in symplectic Euler order
//! - Impulse and Coulomb friction collision response

pub mod body;
pub mod collision;
pub mod derivative;
pub mod error;
pub mod ray;
pub mod response;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody, RigidBodyBuilder};
pub use collision::{collision_between, Collision, CollisionFilter, CollisionLayer};
pub use derivative::{Derivable, DerivativeList};
pub use error::{PhysicsError, ShapeKind};
pub use ray::Ray;
pub use response::{BodyState, PhysCollision, ReactionType};
pub use shapes::{BoxShape, CircleShape, Geometry, PointShape, PolygonShape, Shape};
pub use world::{PhysicsConfig, PhysicsWorld};
