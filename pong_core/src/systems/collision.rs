use glam::Vec2;
use hecs::Entity;

use crate::components::{CollisionMesh, EntityKind, Transform};
use crate::error::GeometryError;
use crate::hooks;
use crate::systems::System;
use crate::world::Registry;

/// A ball overlapping another meshed entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the ball's boundary.
    pub ball_point: Vec2,
    /// Closest point on the other entity's boundary.
    pub other_point: Vec2,
    /// Move the ball by this to separate the pair.
    pub correction: Vec2,
    pub ball_trigger: bool,
    pub other_trigger: bool,
}

/// Ball-initiated collision detection and response.
///
/// Only balls start checks; every other meshed entity is tested against each
/// ball in tick order. The ball alone is pushed out, then both sides get
/// their hook.
#[derive(Debug, Default)]
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn execute(&mut self, registry: &mut Registry) {
        let order = registry.entities().to_vec();

        for &ball in &order {
            if registry.kind(ball) != Some(EntityKind::Ball) {
                continue;
            }
            for &other in &order {
                if other == ball {
                    continue;
                }
                match probe(registry, ball, other) {
                    Ok(Some(contact)) => resolve(registry, ball, other, &contact),
                    Ok(None) => {}
                    Err(err) => {
                        log::debug!("collision pair {ball:?}/{other:?} skipped: {err}");
                    }
                }
            }
        }
    }
}

/// Test one ball against one entity. `Ok(None)` when either lacks a mesh,
/// the broad phase rejects the pair, or the shapes do not overlap.
pub fn probe(
    registry: &Registry,
    ball: Entity,
    other: Entity,
) -> Result<Option<Contact>, GeometryError> {
    let (Ok(ball_ref), Ok(other_ref)) = (registry.ecs.entity(ball), registry.ecs.entity(other))
    else {
        return Ok(None);
    };
    let (Some(ball_mesh), Some(ball_tf)) = (
        ball_ref.get::<&CollisionMesh>(),
        ball_ref.get::<&Transform>(),
    ) else {
        return Ok(None);
    };
    let (Some(other_mesh), Some(other_tf)) = (
        other_ref.get::<&CollisionMesh>(),
        other_ref.get::<&Transform>(),
    ) else {
        return Ok(None);
    };

    // Broad phase
    let ab = other_tf.position - ball_tf.position;
    let threshold = ball_mesh.extent().max(other_mesh.extent());
    if ab.length() >= threshold {
        return Ok(None);
    }

    // Narrow phase: the closest points have crossed when the gap between
    // them points against the centre line.
    let other_point = other_mesh.closest_point(&other_tf, ball_tf.position)?;
    let ball_point = ball_mesh.closest_point(&ball_tf, other_point)?;
    let correction = other_point - ball_point;
    if correction.dot(ab) >= 0.0 {
        return Ok(None);
    }

    Ok(Some(Contact {
        ball_point,
        other_point,
        correction,
        ball_trigger: ball_mesh.is_trigger,
        other_trigger: other_mesh.is_trigger,
    }))
}

fn resolve(registry: &mut Registry, ball: Entity, other: Entity, contact: &Contact) {
    hooks::translate(registry, ball, contact.correction);

    if contact.ball_trigger {
        hooks::on_trigger(registry, ball, other, contact.ball_point);
    } else {
        hooks::on_collision(registry, ball, other, contact.ball_point);
    }

    if contact.other_trigger {
        hooks::on_trigger(registry, other, ball, contact.other_point);
    } else {
        hooks::on_collision(registry, other, ball, contact.other_point);
    }
}
