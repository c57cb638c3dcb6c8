use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::KeyBinds;
use crate::geometry::VectorExt;

pub use crate::mesh::{CollisionMesh, MeshShape};

/// One half of the board; also indexes the score tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Component kinds an entity can hold at most one of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    PhysicsBody,
    CollisionMesh,
}

/// Which behaviour table an entity uses for its hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Wall,
    GameState,
}

/// Position, rotation in degrees, and the cached `up` direction.
///
/// `up` is always `(0, -1)` rotated by `rotation`; only `set_rotation`
/// changes either.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    rotation: f32,
    up: Vec2,
}

impl Transform {
    pub const BASE_UP: Vec2 = Vec2::new(0.0, -1.0);

    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            up: Self::BASE_UP.rotated_deg(rotation),
        }
    }

    pub fn at(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn up(&self) -> Vec2 {
        self.up
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.up = Self::BASE_UP.rotated_deg(degrees);
    }

    /// Local-space point to world space: rotate, then translate.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        local.rotated_deg(self.rotation) + self.position
    }
}

/// Velocity plus the movement flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    pub is_static: bool,
    pub has_gravity: bool,
}

impl PhysicsBody {
    pub fn new(velocity: Vec2, is_static: bool, has_gravity: bool) -> Self {
        Self {
            velocity,
            is_static,
            has_gravity,
        }
    }

    /// A body that moves only when something sets its velocity.
    pub fn kinematic() -> Self {
        Self::new(Vec2::ZERO, false, false)
    }

    /// A body the integrator leaves in place while its velocity is zero.
    pub fn fixed() -> Self {
        Self::new(Vec2::ZERO, true, false)
    }
}

/// Ball marker
#[derive(Debug, Clone, Copy, Default)]
pub struct Ball;

/// A player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub side: Side,
    pub keys: KeyBinds,
    pub speed: f32,
    pub rotate_step: f32,
    pub spin: f32,
}

/// A board edge. Walls with `awards` set give that side a point when the
/// ball touches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wall {
    pub awards: Option<Side>,
}
