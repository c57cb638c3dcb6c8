//! Two-player Pong simulation core.
//!
//! An entity registry ticked by an ordered system pipeline
//! (render, collision, movement), followed by each entity's own update.
//! Hosts construct a match with [`new_match`], feed key events, and either
//! call [`GameWorld::tick`] themselves or hand the world to a [`TickDriver`].

pub mod board;
pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod game_state;
pub mod geometry;
pub mod hooks;
pub mod input;
pub mod mesh;
pub mod params;
pub mod render;
pub mod resources;
pub mod systems;
pub mod world;

pub use board::*;
pub use components::*;
pub use config::*;
pub use driver::*;
pub use error::*;
pub use game_state::*;
pub use geometry::*;
pub use input::{KeyEvent, PaddleCommand};
pub use params::*;
pub use render::*;
pub use resources::*;
pub use world::*;

use glam::Vec2;
use hecs::{Entity, EntityBuilder};
use systems::{CollisionSystem, MovementSystem};

/// Build a ready-to-play match: paddles, ball, four walls and the game
/// state, ticked by render, collision and movement in that order.
pub fn new_match(config: Config, renderer: Box<dyn Renderer>) -> GameWorld {
    let mut world = GameWorld::new(config);
    world.add_system(Box::new(RenderSystem::new(renderer)));
    world.add_system(Box::new(CollisionSystem));
    world.add_system(Box::new(MovementSystem));
    spawn_match(world.registry_mut());

    let config = world.config();
    log::info!(
        "match created on a {}x{} board, first to {}",
        config.board_width,
        config.board_height,
        config.win_score
    );
    world
}

/// Spawn every match entity; returns the game-state entity.
pub fn spawn_match(registry: &mut Registry) -> Entity {
    let left = create_paddle(registry, Side::Left);
    let right = create_paddle(registry, Side::Right);
    let spawn = registry.config.ball_spawn();
    let ball = create_ball(registry, spawn);

    let (w, h, t) = (
        registry.config.board_width,
        registry.config.board_height,
        registry.config.wall_thickness,
    );
    create_wall(registry, Vec2::new(w * 0.5, 0.0), Vec2::new(w, t), None);
    create_wall(registry, Vec2::new(w * 0.5, h), Vec2::new(w, t), None);
    // A ball reaching the left edge is a point for the right player.
    create_wall(registry, Vec2::new(0.0, h * 0.5), Vec2::new(t, h), Some(Side::Right));
    create_wall(registry, Vec2::new(w, h * 0.5), Vec2::new(t, h), Some(Side::Left));

    create_game_manager(registry, left, right, ball)
}

/// Helper to create a paddle entity
pub fn create_paddle(registry: &mut Registry, side: Side) -> Entity {
    let config = &registry.config;
    let paddle = Paddle {
        side,
        keys: config.keys(side).clone(),
        speed: config.paddle_speed,
        rotate_step: config.paddle_rotate_step,
        spin: config.paddle_spin,
    };
    let mut builder = EntityBuilder::new();
    builder
        .add(EntityKind::Paddle)
        .add(Transform::at(config.paddle_spawn(side)))
        .add(PhysicsBody::fixed())
        .add(CollisionMesh::rect(config.paddle_width, config.paddle_height))
        .add(paddle);
    registry.spawn(&mut builder)
}

/// Helper to create the ball entity, at rest
pub fn create_ball(registry: &mut Registry, position: Vec2) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(EntityKind::Ball)
        .add(Ball)
        .add(Transform::at(position))
        .add(PhysicsBody::kinematic())
        .add(CollisionMesh::circle(registry.config.ball_radius()));
    registry.spawn(&mut builder)
}

/// Helper to create a wall; walls have a mesh but no physics body.
pub fn create_wall(
    registry: &mut Registry,
    center: Vec2,
    size: Vec2,
    awards: Option<Side>,
) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(EntityKind::Wall)
        .add(Transform::at(center))
        .add(CollisionMesh::rect(size.x, size.y))
        .add(Wall { awards });
    registry.spawn(&mut builder)
}

pub fn create_game_manager(
    registry: &mut Registry,
    left_paddle: Entity,
    right_paddle: Entity,
    ball: Entity,
) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(EntityKind::GameState)
        .add(Transform::at(Vec2::ZERO))
        .add(PongGameManager::new(left_paddle, right_paddle, ball));
    registry.spawn(&mut builder)
}
