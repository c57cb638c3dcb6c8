//! Collision meshes: circles and closed polygons, queried for the closest
//! boundary point to a world-space point.

use glam::Vec2;

use crate::board::Aabb;
use crate::components::Transform;
use crate::error::GeometryError;
use crate::geometry::{Segment, VectorExt};

#[derive(Debug, Clone, PartialEq)]
pub enum MeshShape {
    Circle { radius: f32 },
    /// Local-space vertices, walked in order and closed back to the first.
    Polygon { vertices: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh {
    pub shape: MeshShape,
    /// Trigger meshes report contact through `on_trigger` instead of
    /// `on_collision`.
    pub is_trigger: bool,
}

impl CollisionMesh {
    pub fn circle(radius: f32) -> Self {
        Self {
            shape: MeshShape::Circle { radius },
            is_trigger: false,
        }
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Self {
        Self {
            shape: MeshShape::Polygon { vertices },
            is_trigger: false,
        }
    }

    /// Box centred on the origin.
    pub fn rect(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::polygon(vec![
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, -hh),
        ])
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Largest local bounding dimension; used as the broad-phase radius.
    pub fn extent(&self) -> f32 {
        match &self.shape {
            MeshShape::Circle { radius } => radius * 2.0,
            MeshShape::Polygon { vertices } => Aabb::from_points(vertices)
                .map(|aabb| aabb.size().max_element())
                .unwrap_or(0.0),
        }
    }

    /// Polygon vertices in world space; empty for circles.
    pub fn world_vertices(&self, transform: &Transform) -> Vec<Vec2> {
        match &self.shape {
            MeshShape::Circle { .. } => Vec::new(),
            MeshShape::Polygon { vertices } => {
                vertices.iter().map(|v| transform.apply(*v)).collect()
            }
        }
    }

    /// Closest point on the mesh boundary to `point`, in world space.
    pub fn closest_point(&self, transform: &Transform, point: Vec2) -> Result<Vec2, GeometryError> {
        match &self.shape {
            MeshShape::Circle { radius } => {
                let dir = (point - transform.position).try_unit()?;
                Ok(transform.position + dir * *radius)
            }
            MeshShape::Polygon { .. } => {
                closest_on_loop(&self.world_vertices(transform), point)
            }
        }
    }
}

/// Closest point over every edge of a closed vertex loop. The first edge
/// reaching the minimum wins; zero-length edges are skipped.
fn closest_on_loop(points: &[Vec2], target: Vec2) -> Result<Vec2, GeometryError> {
    let mut best: Option<(f32, Vec2)> = None;

    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let Ok(candidate) = Segment::between(*a, b).closest_point(target) else {
            continue;
        };
        let dist = candidate.distance_squared(target);
        if best.map_or(true, |(smallest, _)| dist < smallest) {
            best = Some((dist, candidate));
        }
    }

    best.map(|(_, p)| p).ok_or(GeometryError::EmptyMesh)
}
