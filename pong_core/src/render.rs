//! The boundary to the external renderer.
//!
//! The core never issues draw calls. Each tick the render system snapshots
//! every meshed entity into a [`Frame`] of world-space shapes plus the score
//! overlay, and hands it to whatever [`Renderer`] the host installed.

use glam::Vec2;
use serde::Serialize;

use crate::components::{CollisionMesh, EntityKind, MeshShape, Transform};
use crate::game_state::{MatchPhase, PongGameManager};
use crate::systems::System;
use crate::world::Registry;

pub const START_PROMPT: &str = "Press space to start Round!";

/// A shape in world space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Closed loop; the last point connects back to the first.
    Polygon { points: Vec<Vec2> },
}

impl Shape {
    pub fn from_mesh(mesh: &CollisionMesh, transform: &Transform) -> Self {
        match &mesh.shape {
            MeshShape::Circle { radius } => Shape::Circle {
                center: transform.position,
                radius: *radius,
            },
            MeshShape::Polygon { .. } => Shape::Polygon {
                points: mesh.world_vertices(transform),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub kind: EntityKind,
    pub rotation: f32,
    pub shape: Shape,
}

/// Score and round text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub scores: [u32; 2],
    pub round_running: bool,
    /// Shown while waiting for the start key and nobody has won.
    pub prompt: Option<String>,
    /// "Player N won!", 1-based.
    pub banner: Option<String>,
}

impl Overlay {
    pub fn for_manager(manager: &PongGameManager) -> Self {
        let (prompt, banner) = match manager.phase() {
            MatchPhase::RoundRunning => (None, None),
            MatchPhase::MatchWon(side) => {
                (None, Some(format!("Player {} won!", side.index() + 1)))
            }
            MatchPhase::Idle | MatchPhase::RoundEnded => (Some(START_PROMPT.to_string()), None),
        };
        Self {
            scores: manager.score.as_array(),
            round_running: manager.round_running(),
            prompt,
            banner,
        }
    }
}

/// Everything a renderer needs for one picture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub board: Vec2,
    /// Dashed centre line, top to bottom.
    pub divider: [Vec2; 2],
    pub items: Vec<DrawItem>,
    pub overlay: Option<Overlay>,
}

/// The host's drawing surface.
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _frame: &Frame) {}
}

/// Snapshot the registry in tick order.
pub fn capture(registry: &Registry) -> Frame {
    let mut items = Vec::new();
    let mut overlay = None;

    for &entity in registry.entities() {
        let Ok(entity_ref) = registry.ecs.entity(entity) else {
            continue;
        };
        if let Some(manager) = entity_ref.get::<&PongGameManager>() {
            overlay = Some(manager.overlay().clone());
        }
        let (Some(mesh), Some(transform), Some(kind)) = (
            entity_ref.get::<&CollisionMesh>(),
            entity_ref.get::<&Transform>(),
            entity_ref.get::<&EntityKind>(),
        ) else {
            continue;
        };
        items.push(DrawItem {
            kind: *kind,
            rotation: transform.rotation(),
            shape: Shape::from_mesh(&mesh, &transform),
        });
    }

    let config = &registry.config;
    Frame {
        tick: registry.tick_count(),
        board: Vec2::new(config.board_width, config.board_height),
        divider: [
            Vec2::new(config.board_width * 0.5, 0.0),
            Vec2::new(config.board_width * 0.5, config.board_height),
        ],
        items,
        overlay,
    }
}

/// Runs first in the pipeline so the picture shows the state the previous
/// tick left behind.
pub struct RenderSystem {
    renderer: Box<dyn Renderer>,
}

impl RenderSystem {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self { renderer }
    }
}

impl System for RenderSystem {
    fn name(&self) -> &'static str {
        "render"
    }

    fn execute(&mut self, registry: &mut Registry) {
        let frame = capture(registry);
        self.renderer.present(&frame);
    }
}
