//! Rigid2D - 2D rigid body physics sandbox
//!
//! Runs a headless simulation of a small scene: a static floor, a
//! bouncing ball and a stack of crates, stepped at a fixed timestep.

use rigid2d_math::{Point2, Vec2};
use rigid2d_physics::{
    CollisionFilter, PhysicsWorld, Ray, RigidBody, Shape,
};

use rigid2d::config::SimConfig;

fn build_scene(world: &mut PhysicsWorld) {
    let floor = RigidBody::builder()
        .with_shape(
            Shape::new_box(Point2::new(0.0, -1.0), 200.0, 2.0)
                .unwrap_or_else(|e| panic!("Failed to build floor shape: {}", e)),
        )
        .with_mass(0.0)
        .with_restitution_sqrt(0.8)
        .with_static_friction_sqrt(0.6)
        .with_dynamic_friction_sqrt(0.4)
        .with_filter(CollisionFilter::terrain())
        .build()
        .unwrap_or_else(|e| panic!("Failed to build floor: {}", e));
    world.add_body(floor);

    let ball = RigidBody::builder()
        .with_shape(
            Shape::new_circle(Point2::new(-6.0, 8.0), 1.0)
                .unwrap_or_else(|e| panic!("Failed to build ball shape: {}", e)),
        )
        .with_mass(1.0)
        .with_restitution_sqrt(0.9)
        .with_static_friction_sqrt(0.5)
        .with_dynamic_friction_sqrt(0.3)
        .with_velocity(Vec2::new(2.0, 0.0))
        .build()
        .unwrap_or_else(|e| panic!("Failed to build ball: {}", e));
    world.add_body(ball);

    // A short stack of crates to settle under gravity
    for level in 0..3 {
        let crate_body = RigidBody::builder()
            .with_shape(
                Shape::new_box(Point2::new(4.0, 1.0 + 2.1 * level as f64), 2.0, 2.0)
                    .unwrap_or_else(|e| panic!("Failed to build crate shape: {}", e)),
            )
            .with_mass(2.0)
            .with_restitution_sqrt(0.2)
            .with_static_friction_sqrt(0.7)
            .with_dynamic_friction_sqrt(0.5)
            .build()
            .unwrap_or_else(|e| panic!("Failed to build crate: {}", e));
        world.add_body(crate_body);
    }
}

fn main() {
    // Load configuration first so it can set the log level
    let config = SimConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        SimConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.clone()),
    )
    .init();
    log::info!("Starting Rigid2D");

    let mut world = PhysicsWorld::new(config.physics.to_physics_config());
    build_scene(&mut world);
    log::info!(
        "Scene ready: {} bodies, timestep {:.4}s, {} ticks",
        world.len(),
        config.simulation.timestep,
        config.simulation.ticks
    );

    let dt = config.simulation.timestep;
    for tick in 0..config.simulation.ticks {
        world.step(dt);

        if config.debug.trace_bodies || tick % 60 == 0 {
            for (key, body) in world.iter() {
                log::debug!(
                    "tick {}: {:?} at {:?}, v = {:?}",
                    tick,
                    key,
                    body.center(),
                    body.velocity()
                );
            }
        }
    }

    // Probe the settled scene with a horizontal ray at crate height
    match Ray::new(Point2::new(-20.0, 1.0), Vec2::X) {
        Ok(ray) => match world.cast_ray(&ray) {
            Some((key, distance)) => {
                log::info!("Ray hit {:?} at distance {:.2}", key, distance)
            }
            None => log::info!("Ray hit nothing"),
        },
        Err(e) => log::error!("Bad probe ray: {}", e),
    }

    for (key, body) in world.iter() {
        log::info!(
            "Final: {:?} at ({:.2}, {:.2})",
            key,
            body.center().x,
            body.center().y
        );
    }
    log::info!("Done");
}
