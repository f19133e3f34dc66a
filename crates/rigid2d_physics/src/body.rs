//! Rigid bodies: a collision shape plus dynamic state
//!
//! A body owns a [`Shape`], a position/rotation derivative chain, and
//! per-tick force and impulse accumulators. Integration is symplectic
//! Euler: accumulated forces and impulses update velocity first, then
//! position integrates the updated velocity.
//!
//! Bodies with non-positive mass are static: they ignore forces,
//! impulses and location changes, but still collide.

use slotmap::new_key_type;

use crate::collision::{collision_between, CollisionFilter};
use crate::derivative::DerivativeList;
use crate::error::PhysicsError;
use crate::ray::Ray;
use crate::response::{BodyState, PhysCollision, ReactionType};
use crate::shapes::Shape;
use rigid2d_math::{Point2, Vec2};

new_key_type! {
    /// Key identifying a body inside a [`crate::world::PhysicsWorld`].
    pub struct BodyKey;
}

/// A rigid body with linear and angular dynamics.
#[derive(Clone, Debug)]
pub struct RigidBody {
    shape: Shape,
    filter: CollisionFilter,
    /// Index 0 is the center, index 1 the linear velocity.
    position: DerivativeList<Vec2>,
    /// Index 0 is the angle, index 1 the angular velocity.
    rotation: DerivativeList<f64>,
    mass: f64,
    restitution_sqrt: f64,
    static_friction_sqrt: f64,
    dynamic_friction_sqrt: f64,
    force: Vec2,
    torque: f64,
    impulse: Vec2,
    rotational_impulse: f64,
}

impl RigidBody {
    pub fn builder() -> RigidBodyBuilder {
        RigidBodyBuilder::default()
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.position.get(0)
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position.get(1)
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.position.set(1, velocity);
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.rotation.get(0)
    }

    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.rotation.get(1)
    }

    pub fn set_angular_velocity(&mut self, omega: f64) {
        self.rotation.set(1, omega);
    }

    /// The nth derivative of position (0 is the center itself).
    pub fn derivative(&self, index: usize) -> Vec2 {
        self.position.get(index)
    }

    pub fn set_derivative(&mut self, index: usize, value: Vec2) {
        self.position.set(index, value);
        if index == 0 {
            self.shape.set_center(value);
        }
    }

    /// The nth derivative of rotation (0 is the angle itself).
    pub fn rotational_derivative(&self, index: usize) -> f64 {
        self.rotation.get(index)
    }

    pub fn set_rotational_derivative(&mut self, index: usize, value: f64) {
        self.rotation.set(index, value);
        if index == 0 {
            self.shape.set_rotation(value);
        }
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    #[inline]
    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CollisionFilter) {
        self.filter = filter;
    }

    /// The mass moment of inertia: the shape's moment scaled by mass.
    pub fn moment_of_inertia(&self) -> f64 {
        if self.is_static() {
            return 0.0;
        }
        self.shape.moment_of_inertia() * self.mass
    }

    pub fn set_center(&mut self, center: Point2) {
        self.position.set(0, center);
        self.shape.set_center(center);
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.rotation.set(0, angle);
        self.shape.set_rotation(angle);
    }

    /// Translate the body. Static bodies do not move.
    pub fn apply_location_change(&mut self, change: Vec2) {
        if self.is_static() {
            return;
        }
        self.set_center(self.center() + change);
    }

    /// Accumulate a force at the body's center (no torque).
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_static() {
            return;
        }
        self.force += force;
    }

    /// Accumulate a force at a world position, including the torque
    /// from its lever arm.
    pub fn apply_force_at(&mut self, force: Vec2, position: Point2) {
        if self.is_static() {
            return;
        }
        self.force += force;
        self.torque += (position - self.center()).cross(force);
    }

    /// Accumulate an impulse at a world position, including the
    /// rotational impulse from its lever arm.
    pub fn apply_impulse_at(&mut self, impulse: Vec2, position: Point2) {
        if self.is_static() {
            return;
        }
        self.impulse += impulse;
        self.rotational_impulse += (position - self.center()).cross(impulse);
    }

    /// Zero the velocity and every higher derivative of position and
    /// rotation, leaving the pose itself alone.
    pub fn arrest_motion(&mut self) {
        self.position.arrest();
        self.rotation.arrest();
    }

    /// A snapshot of this body's dynamic state for collision response.
    pub fn state(&self) -> BodyState {
        BodyState {
            center: self.center(),
            velocity: self.velocity(),
            mass: self.mass,
            moment_of_inertia: self.moment_of_inertia(),
            restitution_sqrt: self.restitution_sqrt,
            static_friction_sqrt: self.static_friction_sqrt,
            dynamic_friction_sqrt: self.dynamic_friction_sqrt,
        }
    }

    /// Collision between this body and another, seen from this body's
    /// side. Respects both bodies' collision filters.
    pub fn collision_with(&self, other: &RigidBody) -> Option<PhysCollision> {
        if !self.filter.collides_with(&other.filter) {
            return None;
        }
        let collision = collision_between(&self.shape, &other.shape)?;
        Some(PhysCollision::new(self.state(), other.state(), collision))
    }

    /// Distance along the ray to this body's shape, if hit.
    pub fn collision_with_ray(&self, ray: &Ray) -> Option<f64> {
        self.shape.distance_along(ray)
    }

    /// Resolve a collision this body is the collider of: undo the
    /// overlap, then apply impulse and friction per the reaction type.
    pub fn react(&mut self, collision: &PhysCollision, reaction: ReactionType) {
        let mtv = collision.mtv();
        if mtv.length_squared() == 0.0 {
            return;
        }
        self.apply_location_change(mtv);

        if reaction.applies_impulse() {
            self.apply_impulse_at(collision.impulse(), collision.contact_point());
        }
        if reaction.applies_friction() {
            self.apply_impulse_at(collision.sliding_frictional_impulse(), self.center());
        }
    }

    /// Advance this body by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if self.mass > 0.0 {
            let velocity_change = self.force * (dt / self.mass) + self.impulse / self.mass;
            self.set_velocity(self.velocity() + velocity_change);

            let moment = self.moment_of_inertia();
            if moment > 0.0 {
                let omega_change = self.torque * dt / moment + self.rotational_impulse / moment;
                self.set_angular_velocity(self.angular_velocity() + omega_change);
            }
        }
        self.position.step(dt);
        self.rotation.step(dt);

        self.shape.set_center(self.position.get(0));
        self.shape.set_rotation(self.rotation.get(0));

        self.force = Vec2::ZERO;
        self.impulse = Vec2::ZERO;
        self.torque = 0.0;
        self.rotational_impulse = 0.0;
    }
}

/// Builder for [`RigidBody`]. The shape, mass, restitution and both
/// friction coefficients are required.
///
/// Restitution and friction are stored as square roots; a contact
/// multiplies the two bodies' stored values to get the pair
/// coefficient.
#[derive(Clone, Debug, Default)]
pub struct RigidBodyBuilder {
    shape: Option<Shape>,
    mass: Option<f64>,
    restitution_sqrt: Option<f64>,
    static_friction_sqrt: Option<f64>,
    dynamic_friction_sqrt: Option<f64>,
    velocity: Vec2,
    angular_velocity: f64,
    filter: Option<CollisionFilter>,
}

impl RigidBodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Non-positive mass makes the body static.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_restitution_sqrt(mut self, value: f64) -> Self {
        self.restitution_sqrt = Some(value);
        self
    }

    pub fn with_static_friction_sqrt(mut self, value: f64) -> Self {
        self.static_friction_sqrt = Some(value);
        self
    }

    pub fn with_dynamic_friction_sqrt(mut self, value: f64) -> Self {
        self.dynamic_friction_sqrt = Some(value);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, omega: f64) -> Self {
        self.angular_velocity = omega;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn build(self) -> Result<RigidBody, PhysicsError> {
        let shape = self.shape.ok_or(PhysicsError::MissingProperty("shape"))?;
        let mass = self.mass.ok_or(PhysicsError::MissingProperty("mass"))?;
        let restitution_sqrt = self
            .restitution_sqrt
            .ok_or(PhysicsError::MissingProperty("restitution_sqrt"))?;
        let static_friction_sqrt = self
            .static_friction_sqrt
            .ok_or(PhysicsError::MissingProperty("static_friction_sqrt"))?;
        let dynamic_friction_sqrt = self
            .dynamic_friction_sqrt
            .ok_or(PhysicsError::MissingProperty("dynamic_friction_sqrt"))?;

        let mut position = DerivativeList::from_value(shape.center());
        position.set(1, self.velocity);
        let mut rotation = DerivativeList::from_value(shape.rotation());
        rotation.set(1, self.angular_velocity);

        Ok(RigidBody {
            shape,
            filter: self.filter.unwrap_or_default(),
            position,
            rotation,
            mass,
            restitution_sqrt,
            static_friction_sqrt,
            dynamic_friction_sqrt,
            force: Vec2::ZERO,
            torque: 0.0,
            impulse: Vec2::ZERO,
            rotational_impulse: 0.0,
        })
    }
}
