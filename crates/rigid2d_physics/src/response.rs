//! Collision response: mass-weighted de-penetration, restitution
//! impulses and Coulomb friction
//!
//! A [`PhysCollision`] pairs a geometric [`Collision`] with snapshots
//! of the two bodies involved. The impulse and friction vectors are
//! computed lazily on first access and cached, since `react` may be
//! called with reaction modes that never need them.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::collision::Collision;
use rigid2d_math::{Point2, Vec2};

/// Relative tangential speeds at or below this use the static friction
/// coefficient instead of the dynamic one.
pub const MAX_STATIC_VELOCITY: f64 = 0.05;

/// How a collision affects the bodies involved. Both sides of a
/// collision must react with the same type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionType {
    /// Only undo the overlap; no momentum change of any kind.
    OverlapOnly,
    /// Undo the overlap and exchange restitution impulses.
    ImpulseOnly,
    /// Undo the overlap and apply friction, without the normal
    /// impulse. Rarely useful.
    FrictionOnly,
    /// Overlap resolution, impulse and friction together.
    #[default]
    FrictionAndImpulse,
}

impl ReactionType {
    pub fn applies_impulse(self) -> bool {
        matches!(self, Self::ImpulseOnly | Self::FrictionAndImpulse)
    }

    pub fn applies_friction(self) -> bool {
        matches!(self, Self::FrictionOnly | Self::FrictionAndImpulse)
    }
}

/// The dynamic state of one body at the moment of a collision.
///
/// A snapshot rather than a borrow, so both sides of a collision can
/// be resolved against the same pre-collision state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub center: Point2,
    pub velocity: Vec2,
    pub mass: f64,
    pub moment_of_inertia: f64,
    pub restitution_sqrt: f64,
    pub static_friction_sqrt: f64,
    pub dynamic_friction_sqrt: f64,
}

impl BodyState {
    /// Bodies with non-positive mass are immovable.
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

/// A collision between two bodies, seen from the collider's side.
///
/// The collider is the body reacting; the obstacle is the body it hit.
/// [`PhysCollision::inverse`] gives the obstacle's view of the same
/// contact.
#[derive(Debug)]
pub struct PhysCollision {
    collider: BodyState,
    obstacle: BodyState,
    collision: Collision,
    impulse: OnceCell<Vec2>,
    friction: OnceCell<Vec2>,
}

impl PhysCollision {
    pub fn new(collider: BodyState, obstacle: BodyState, collision: Collision) -> Self {
        Self {
            collider,
            obstacle,
            collision,
            impulse: OnceCell::new(),
            friction: OnceCell::new(),
        }
    }

    pub fn contact_point(&self) -> Point2 {
        self.collision.point
    }

    /// The full geometric translation that separates the pair.
    pub fn raw_mtv(&self) -> Vec2 {
        self.collision.mtv
    }

    /// The translation the collider should take, weighted by mass so
    /// the pair shares the separation. A static obstacle leaves the
    /// collider the whole translation; a static collider takes none.
    pub fn mtv(&self) -> Vec2 {
        if self.collider.is_static() {
            return Vec2::ZERO;
        }
        if self.obstacle.is_static() {
            return self.collision.mtv;
        }
        let mass_sum = self.collider.mass + self.obstacle.mass;
        self.collision.mtv * (self.obstacle.mass / mass_sum)
    }

    /// The same contact from the obstacle's point of view.
    pub fn inverse(&self) -> Self {
        Self::new(self.obstacle, self.collider, self.collision.inverse())
    }

    /// The restitution impulse to apply to the collider at the contact
    /// point. Cached after the first call.
    pub fn impulse(&self) -> Vec2 {
        *self.impulse.get_or_init(|| self.compute_impulse())
    }

    fn compute_impulse(&self) -> Vec2 {
        if self.collider.is_static() && self.obstacle.is_static() {
            return Vec2::ZERO;
        }

        // Relative approach velocity along the contact normal
        let projected_obstacle = self.obstacle.velocity.project_onto(self.collision.mtv);
        let projected_collider = self.collider.velocity.project_onto(self.collision.mtv);
        let unweighted = projected_obstacle - projected_collider;

        let restitution = 1.0 + self.collider.restitution_sqrt * self.obstacle.restitution_sqrt;

        let weight = if self.collider.is_static() {
            self.obstacle.mass * restitution
        } else if self.obstacle.is_static() {
            self.collider.mass * restitution
        } else {
            let normal = self.collision.mtv.normalized();
            let rotation_a = angular_term(&self.collider, self.collision.point, normal);
            let rotation_b = angular_term(&self.obstacle, self.collision.point, normal);
            let mass_sum = self.collider.mass + self.obstacle.mass;
            (self.collider.mass * self.obstacle.mass * restitution)
                / (mass_sum + rotation_a + rotation_b)
        };

        unweighted * weight
    }

    /// The sliding frictional impulse to apply to the collider at its
    /// center. Cached after the first call.
    pub fn sliding_frictional_impulse(&self) -> Vec2 {
        *self.friction.get_or_init(|| self.compute_friction())
    }

    fn compute_friction(&self) -> Vec2 {
        let impulse_magnitude = self.impulse().length();

        // Tangential axis, sign-fixed so both sides agree on it
        let mut axis = self.collision.mtv.normalized().perpendicular();
        if axis.x < 0.0 {
            axis = -axis;
        }

        let relative_velocity =
            self.obstacle.velocity.dot(axis) - self.collider.velocity.dot(axis);
        let direction = if relative_velocity > 0.0 {
            1.0
        } else if relative_velocity < 0.0 {
            -1.0
        } else {
            0.0
        };

        let coefficient = if relative_velocity <= MAX_STATIC_VELOCITY {
            self.collider.static_friction_sqrt * self.obstacle.static_friction_sqrt
        } else {
            self.collider.dynamic_friction_sqrt * self.obstacle.dynamic_friction_sqrt
        };

        axis * (coefficient * impulse_magnitude * direction)
    }
}

/// Contribution of a body's angular response to the impulse
/// denominator: the squared lever arm along the normal over the moment
/// of inertia.
fn angular_term(body: &BodyState, contact: Point2, normal: Vec2) -> f64 {
    if body.moment_of_inertia <= 0.0 {
        return 0.0;
    }
    let lever = (contact - body.center).perpendicular();
    let along = lever.dot(normal);
    along * along / body.moment_of_inertia
}
