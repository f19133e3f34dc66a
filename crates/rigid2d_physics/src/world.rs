//! Physics world: body storage, gravity, pairwise resolution
//!
//! The world owns every [`RigidBody`] in a slotmap keyed by
//! [`BodyKey`]. Each `step` applies gravity, resolves every colliding
//! pair with the configured [`ReactionType`], then integrates all
//! bodies by the timestep.

use log::debug;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::body::{BodyKey, RigidBody};
use crate::ray::Ray;
use crate::response::ReactionType;
use rigid2d_math::Vec2;

/// Tunable world parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravitational acceleration applied to every dynamic body.
    pub gravity: Vec2,
    /// How colliding pairs react.
    pub reaction: ReactionType,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -20.0),
            reaction: ReactionType::FrictionAndImpulse,
        }
    }
}

/// A simulation of rigid bodies under gravity.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: SlotMap<BodyKey, RigidBody>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: SlotMap::with_key(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        let key = self.bodies.insert(body);
        debug!("added body {:?}", key);
        key
    }

    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }

    /// Advance the simulation by `dt` seconds: gravity, integration,
    /// then collision resolution. Reaction impulses accumulate and
    /// take effect at the next tick's integration; overlap is undone
    /// immediately.
    pub fn step(&mut self, dt: f64) {
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            if !body.is_static() {
                body.apply_force(gravity * body.mass());
            }
            body.step(dt);
        }

        self.resolve_collisions();
    }

    /// Resolve every colliding pair once, both sides reacting with the
    /// configured reaction type against the same pre-reaction state.
    fn resolve_collisions(&mut self) {
        let reaction = self.config.reaction;
        let keys: Vec<BodyKey> = self.bodies.keys().collect();

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let Some([a, b]) = self.bodies.get_disjoint_mut([keys[i], keys[j]]) else {
                    continue;
                };
                if a.is_static() && b.is_static() {
                    continue;
                }
                let Some(collision) = a.collision_with(b) else {
                    continue;
                };
                debug!(
                    "resolving {:?} vs {:?} at {:?}",
                    keys[i],
                    keys[j],
                    collision.contact_point()
                );
                let inverse = collision.inverse();
                a.react(&collision, reaction);
                b.react(&inverse, reaction);
            }
        }
    }

    /// The nearest body hit by the ray, with its distance.
    pub fn cast_ray(&self, ray: &Ray) -> Option<(BodyKey, f64)> {
        let mut nearest: Option<(BodyKey, f64)> = None;
        for (key, body) in self.bodies.iter() {
            if let Some(distance) = body.collision_with_ray(ray) {
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((key, distance));
                }
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionFilter, CollisionLayer};
    use crate::shapes::Shape;
    use rigid2d_math::Point2;

    fn dynamic_ball(x: f64, y: f64) -> RigidBody {
        RigidBody::builder()
            .with_shape(Shape::new_circle(Point2::new(x, y), 1.0).unwrap())
            .with_mass(1.0)
            .with_restitution_sqrt(1.0)
            .with_static_friction_sqrt(0.5)
            .with_dynamic_friction_sqrt(0.3)
            .build()
            .unwrap()
    }

    fn static_floor() -> RigidBody {
        RigidBody::builder()
            .with_shape(Shape::new_box(Point2::new(0.0, -1.0), 100.0, 2.0).unwrap())
            .with_mass(0.0)
            .with_restitution_sqrt(0.5)
            .with_static_friction_sqrt(0.5)
            .with_dynamic_friction_sqrt(0.3)
            .with_filter(CollisionFilter::terrain())
            .build()
            .unwrap()
    }

    fn no_gravity() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec2::ZERO,
            reaction: ReactionType::FrictionAndImpulse,
        }
    }

    #[test]
    fn test_add_remove_bodies() {
        let mut world = PhysicsWorld::default();
        let key = world.add_body(dynamic_ball(0.0, 0.0));
        assert_eq!(world.len(), 1);
        assert!(world.body(key).is_some());

        let removed = world.remove_body(key).unwrap();
        assert_eq!(removed.center(), Point2::ZERO);
        assert!(world.is_empty());
        assert!(world.body(key).is_none());
    }

    #[test]
    fn test_gravity_accelerates_dynamic_bodies() {
        let mut world = PhysicsWorld::default();
        let key = world.add_body(dynamic_ball(0.0, 100.0));
        world.step(0.5);
        let body = world.body(key).unwrap();
        assert_eq!(body.velocity(), Vec2::new(0.0, -10.0));
        assert!(body.center().y < 100.0);
    }

    #[test]
    fn test_gravity_is_mass_independent() {
        let mut world = PhysicsWorld::default();
        let light = world.add_body(dynamic_ball(0.0, 100.0));
        let heavy = world.add_body(
            RigidBody::builder()
                .with_shape(Shape::new_circle(Point2::new(10.0, 100.0), 1.0).unwrap())
                .with_mass(10.0)
                .with_restitution_sqrt(1.0)
                .with_static_friction_sqrt(0.5)
                .with_dynamic_friction_sqrt(0.3)
                .build()
                .unwrap(),
        );
        world.step(0.25);
        let vy_light = world.body(light).unwrap().velocity().y;
        let vy_heavy = world.body(heavy).unwrap().velocity().y;
        assert!((vy_light - vy_heavy).abs() < 1e-12);
    }

    #[test]
    fn test_static_bodies_do_not_fall() {
        let mut world = PhysicsWorld::default();
        let key = world.add_body(static_floor());
        world.step(1.0);
        assert_eq!(world.body(key).unwrap().center(), Point2::new(0.0, -1.0));
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut world = PhysicsWorld::new(no_gravity());
        let mut left = dynamic_ball(0.0, 0.0);
        left.set_velocity(Vec2::new(1.0, 0.0));
        let mut right = dynamic_ball(1.5, 0.0);
        right.set_velocity(Vec2::new(-1.0, 0.0));
        let left = world.add_body(left);
        let right = world.add_body(right);

        // First tick detects and accumulates the impulses, second tick
        // integrates them
        world.step(1e-6);
        world.step(1e-6);

        assert!((world.body(left).unwrap().velocity().x + 1.0).abs() < 1e-9);
        assert!((world.body(right).unwrap().velocity().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ball_rests_on_floor() {
        let mut world = PhysicsWorld::new(PhysicsConfig {
            gravity: Vec2::new(0.0, -20.0),
            reaction: ReactionType::FrictionAndImpulse,
        });
        world.add_body(static_floor());
        // Lossy ball, so the bounces decay
        let ball = world.add_body(
            RigidBody::builder()
                .with_shape(Shape::new_circle(Point2::new(0.0, 3.0), 1.0).unwrap())
                .with_mass(1.0)
                .with_restitution_sqrt(0.5)
                .with_static_friction_sqrt(0.5)
                .with_dynamic_friction_sqrt(0.3)
                .build()
                .unwrap(),
        );

        let dt = 1.0 / 60.0;
        for _ in 0..600 {
            world.step(dt);
        }
        let y = world.body(ball).unwrap().center().y;
        // Settles on the floor top (y = 0) without sinking through
        assert!(y > 0.5, "ball sank to y = {}", y);
        assert!(y < 1.5, "ball still airborne at y = {}", y);
    }

    #[test]
    fn test_filtered_pair_does_not_resolve() {
        let mut world = PhysicsWorld::new(no_gravity());
        let ghost_filter =
            CollisionFilter::new(CollisionLayer::DEBRIS, CollisionLayer::TERRAIN);
        let mut a = dynamic_ball(0.0, 0.0);
        a.set_filter(ghost_filter);
        let mut b = dynamic_ball(1.0, 0.0);
        b.set_filter(ghost_filter);
        let a = world.add_body(a);
        let b = world.add_body(b);

        world.step(0.1);

        // Deep overlap persists: the filter blocked resolution
        assert_eq!(world.body(a).unwrap().center(), Point2::new(0.0, 0.0));
        assert_eq!(world.body(b).unwrap().center(), Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_cast_ray_finds_nearest() {
        let mut world = PhysicsWorld::new(no_gravity());
        let near = world.add_body(dynamic_ball(5.0, 0.0));
        world.add_body(dynamic_ball(12.0, 0.0));

        let ray = Ray::new(Point2::ZERO, Vec2::X).unwrap();
        let (hit, distance) = world.cast_ray(&ray).unwrap();
        assert_eq!(hit, near);
        assert!((distance - 4.0).abs() < 1e-9);

        let miss = Ray::new(Point2::ZERO, -Vec2::X).unwrap();
        assert!(world.cast_ray(&miss).is_none());
    }
}
