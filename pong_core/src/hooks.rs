//! Per-kind entity behaviour: what an entity does when it is hit, when it
//! is moved, and once per tick.
//!
//! Dispatch is a plain match on [`EntityKind`]; kinds without a rule do
//! nothing.

use glam::Vec2;
use hecs::Entity;

use crate::components::{CollisionMesh, EntityKind, Paddle, PhysicsBody, Transform, Wall};
use crate::error::GeometryError;
use crate::game_state;
use crate::geometry::VectorExt;
use crate::world::Registry;

/// `this` was hit by `other`; `point` is `this`'s own contact point.
pub fn on_collision(registry: &mut Registry, this: Entity, other: Entity, point: Vec2) {
    let other_is_ball = registry.kind(other) == Some(EntityKind::Ball);

    match registry.kind(this) {
        Some(EntityKind::Ball) => bounce_ball(registry, this, point),
        Some(EntityKind::Paddle) if other_is_ball => spin_ball(registry, this, other, point),
        Some(EntityKind::Wall) if other_is_ball => wall_hit(registry, this),
        _ => {}
    }
}

/// Trigger contact. No entity kind reacts to triggers yet.
pub fn on_trigger(registry: &mut Registry, this: Entity, other: Entity, point: Vec2) {
    log::trace!(
        "trigger: {:?} touched by {:?} at {point}",
        registry.kind(this),
        registry.kind(other)
    );
}

/// Per-tick behaviour, run after all systems.
pub fn update(registry: &mut Registry, this: Entity) {
    if registry.kind(this) == Some(EntityKind::GameState) {
        game_state::update(registry, this);
    }
}

/// Move by `delta`. Paddles refuse moves that would leave the board.
pub fn translate(registry: &mut Registry, this: Entity, delta: Vec2) {
    if registry.kind(this) == Some(EntityKind::Paddle) {
        move_paddle(registry, this, delta);
    } else if let Ok(mut transform) = registry.ecs.get::<&mut Transform>(this) {
        transform.position += delta;
    }
}

/// Mirror `velocity` about `normal`, keeping its length.
pub fn reflect(velocity: Vec2, normal: Vec2) -> Result<Vec2, GeometryError> {
    let normal = normal.try_unit()?;
    let dir = velocity.try_unit()?;
    let reflected = dir - normal * (2.0 * normal.dot(dir));
    Ok(reflected * velocity.length())
}

/// Nudge the ball's direction by `impulse` scaled to `strength`, then restore
/// the ball's incoming speed.
pub fn apply_spin(ball_velocity: Vec2, impulse: Vec2, strength: f32) -> Vec2 {
    let speed = ball_velocity.length();
    let Ok(nudge) = impulse.try_unit() else {
        return ball_velocity;
    };
    match (ball_velocity + nudge * strength).try_unit() {
        Ok(dir) => dir * speed,
        Err(_) => ball_velocity,
    }
}

fn bounce_ball(registry: &mut Registry, ball: Entity, point: Vec2) {
    let Ok(position) = registry.transform(ball).map(|t| t.position) else {
        return;
    };
    let Ok(mut body) = registry.ecs.get::<&mut PhysicsBody>(ball) else {
        return;
    };
    match reflect(body.velocity, position - point) {
        Ok(velocity) => body.velocity = velocity,
        // A ball at rest, or touching at its own centre, keeps its velocity.
        Err(err) => log::trace!("ball bounce skipped: {err}"),
    }
}

fn spin_ball(registry: &mut Registry, paddle: Entity, ball: Entity, point: Vec2) {
    let (position, paddle_velocity, strength) = {
        let Ok(transform) = registry.transform(paddle) else {
            return;
        };
        let velocity = registry
            .physics(paddle)
            .map(|b| b.velocity)
            .unwrap_or(Vec2::ZERO);
        let Ok(settings) = registry.ecs.get::<&Paddle>(paddle) else {
            return;
        };
        (transform.position, velocity, settings.spin)
    };

    let impulse = point - position + paddle_velocity;
    if let Ok(mut body) = registry.ecs.get::<&mut PhysicsBody>(ball) {
        body.velocity = apply_spin(body.velocity, impulse, strength);
    }
    registry.events.ball_hit_paddle = true;
}

fn wall_hit(registry: &mut Registry, wall: Entity) {
    let awards = registry
        .ecs
        .get::<&Wall>(wall)
        .ok()
        .and_then(|w| w.awards);

    registry.events.ball_hit_wall = true;
    if let Some(side) = awards {
        game_state::award_point(registry, side);
    }
}

fn move_paddle(registry: &mut Registry, paddle: Entity, delta: Vec2) {
    let Ok(current) = registry.transform(paddle) else {
        return;
    };
    let mut proposed = current;
    proposed.position += delta;

    let fits = match registry.ecs.get::<&CollisionMesh>(paddle) {
        Ok(mesh) => {
            let board = registry.config.board();
            mesh.world_vertices(&proposed)
                .into_iter()
                .all(|v| board.contains(v))
        }
        Err(_) => true,
    };

    if !fits {
        log::trace!("paddle move to {} rejected: leaves the board", proposed.position);
        return;
    }
    if let Ok(mut transform) = registry.ecs.get::<&mut Transform>(paddle) {
        *transform = proposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reflect_off_vertical_wall() {
        let v = reflect(Vec2::new(15.0, 5.0), Vec2::new(-1.0, 0.0)).unwrap();
        assert!(v.abs_diff_eq(Vec2::new(-15.0, 5.0), 1e-4), "got {v:?}");
    }

    #[test]
    fn test_reflect_zero_velocity_is_degenerate() {
        assert_eq!(
            reflect(Vec2::ZERO, Vec2::X),
            Err(GeometryError::DegenerateVector)
        );
    }

    #[test]
    fn test_spin_keeps_speed_and_bends_direction() {
        let before = Vec2::new(-15.0, 0.0);
        let after = apply_spin(before, Vec2::new(0.0, -100.0), 10.0);
        assert!((after.length() - 15.0).abs() < 1e-4);
        assert!(after.y < 0.0, "spin should pull the ball upward, got {after:?}");
    }

    #[test]
    fn test_spin_with_zero_impulse_is_noop() {
        let before = Vec2::new(3.0, 4.0);
        assert_eq!(apply_spin(before, Vec2::ZERO, 10.0), before);
    }

    proptest! {
        #[test]
        fn prop_reflection_preserves_speed(
            vx in -50.0f32..50.0, vy in -50.0f32..50.0,
            nx in -1.0f32..1.0, ny in -1.0f32..1.0,
        ) {
            prop_assume!(vx.abs() > 1e-2 || vy.abs() > 1e-2);
            prop_assume!(nx.abs() > 1e-2 || ny.abs() > 1e-2);
            let velocity = Vec2::new(vx, vy);
            let reflected = reflect(velocity, Vec2::new(nx, ny)).unwrap();
            prop_assert!((reflected.length() - velocity.length()).abs() < 1e-3);
        }

        #[test]
        fn prop_spin_preserves_speed(
            vx in -50.0f32..50.0, vy in -50.0f32..50.0,
            ix in -200.0f32..200.0, iy in -200.0f32..200.0,
        ) {
            let velocity = Vec2::new(vx, vy);
            let spun = apply_spin(velocity, Vec2::new(ix, iy), 10.0);
            prop_assert!((spun.length() - velocity.length()).abs() < 1e-3);
        }
    }
}
