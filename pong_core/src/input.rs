//! Keyboard input handling

use crate::components::{EntityKind, Paddle, PhysicsBody, Transform};
use crate::config::KeyBinds;
use crate::game_state;
use crate::world::Registry;

/// A key going down or up. Key names follow `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Down(String),
    Up(String),
}

impl KeyEvent {
    pub fn down(key: &str) -> Self {
        KeyEvent::Down(key.to_string())
    }

    pub fn up(key: &str) -> Self {
        KeyEvent::Up(key.to_string())
    }

    pub fn key(&self) -> &str {
        match self {
            KeyEvent::Down(key) | KeyEvent::Up(key) => key,
        }
    }
}

/// What a key event asks of one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleCommand {
    MoveUp,
    MoveDown,
    Stop,
    Rotate,
}

/// Map a key event onto a paddle's bindings.
pub fn paddle_command(keys: &KeyBinds, event: &KeyEvent) -> Option<PaddleCommand> {
    match event {
        KeyEvent::Down(key) if *key == keys.up => Some(PaddleCommand::MoveUp),
        KeyEvent::Down(key) if *key == keys.down => Some(PaddleCommand::MoveDown),
        KeyEvent::Down(key) if keys.rotate.as_deref() == Some(key.as_str()) => {
            Some(PaddleCommand::Rotate)
        }
        KeyEvent::Up(key) if *key == keys.up || *key == keys.down => Some(PaddleCommand::Stop),
        _ => None,
    }
}

/// Route a key event to every paddle and to the game state.
pub fn apply_key(registry: &mut Registry, event: &KeyEvent) {
    for entity in registry.entities().to_vec() {
        if registry.kind(entity) != Some(EntityKind::Paddle) {
            continue;
        }
        let Ok(entity_ref) = registry.ecs.entity(entity) else {
            continue;
        };
        let (Some(paddle), Some(mut transform), Some(mut body)) = (
            entity_ref.get::<&Paddle>(),
            entity_ref.get::<&mut Transform>(),
            entity_ref.get::<&mut PhysicsBody>(),
        ) else {
            continue;
        };
        match paddle_command(&paddle.keys, event) {
            Some(PaddleCommand::MoveUp) => body.velocity = transform.up() * paddle.speed,
            Some(PaddleCommand::MoveDown) => body.velocity = -transform.up() * paddle.speed,
            Some(PaddleCommand::Stop) => body.velocity = glam::Vec2::ZERO,
            Some(PaddleCommand::Rotate) => {
                let rotation = transform.rotation() + paddle.rotate_step;
                transform.set_rotation(rotation);
            }
            None => {}
        }
    }

    if let KeyEvent::Down(key) = event {
        if *key == registry.config.start_key {
            if let Some(manager) = registry.game_manager() {
                game_state::start_round(registry, manager);
            }
        }
    }
}
