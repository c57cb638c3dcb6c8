use crate::components::PhysicsBody;
use crate::hooks;
use crate::systems::System;
use crate::world::Registry;

/// Integrates velocity into position once per tick.
///
/// Static bodies are integrated too: they stay put only because nothing
/// gives them a velocity except the paddle keys, and paddles move through
/// their own bounds-checked rule.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn execute(&mut self, registry: &mut Registry) {
        let gravity = registry.config.gravity;

        for entity in registry.entities().to_vec() {
            let delta = {
                let Ok(mut body) = registry.ecs.get::<&mut PhysicsBody>(entity) else {
                    continue;
                };
                if body.has_gravity {
                    body.velocity.y += gravity;
                }
                body.velocity
            };
            hooks::translate(registry, entity, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EntityKind, Transform};
    use crate::Config;
    use glam::Vec2;
    use hecs::EntityBuilder;

    fn body_at(registry: &mut Registry, pos: Vec2, body: PhysicsBody) -> hecs::Entity {
        let mut builder = EntityBuilder::new();
        builder
            .add(EntityKind::Ball)
            .add(Transform::at(pos))
            .add(body);
        registry.spawn(&mut builder)
    }

    #[test]
    fn test_velocity_moves_entity() {
        let mut registry = Registry::new(Config::new());
        let e = body_at(
            &mut registry,
            Vec2::new(100.0, 100.0),
            PhysicsBody::new(Vec2::new(15.0, -2.0), false, false),
        );

        MovementSystem.execute(&mut registry);
        MovementSystem.execute(&mut registry);

        let pos = registry.transform(e).unwrap().position;
        assert_eq!(pos, Vec2::new(130.0, 96.0));
    }

    #[test]
    fn test_gravity_accumulates_without_clamp() {
        let mut registry = Registry::new(Config::new());
        let e = body_at(
            &mut registry,
            Vec2::ZERO,
            PhysicsBody::new(Vec2::ZERO, false, true),
        );

        for _ in 0..1000 {
            MovementSystem.execute(&mut registry);
        }

        let vy = registry.physics(e).unwrap().velocity.y;
        assert!((vy - 98.1).abs() < 0.05, "vy = {vy}");
    }

    #[test]
    fn test_static_body_is_integrated_when_given_velocity() {
        let mut registry = Registry::new(Config::new());
        let e = body_at(
            &mut registry,
            Vec2::new(10.0, 10.0),
            PhysicsBody::new(Vec2::new(1.0, 0.0), true, false),
        );

        MovementSystem.execute(&mut registry);

        assert_eq!(registry.transform(e).unwrap().position, Vec2::new(11.0, 10.0));
    }

    #[test]
    fn test_entities_without_body_are_skipped() {
        let mut registry = Registry::new(Config::new());
        let mut builder = EntityBuilder::new();
        builder.add(EntityKind::Wall).add(Transform::at(Vec2::ONE));
        let wall = registry.spawn(&mut builder);

        MovementSystem.execute(&mut registry);

        assert_eq!(registry.transform(wall).unwrap().position, Vec2::ONE);
    }
}
