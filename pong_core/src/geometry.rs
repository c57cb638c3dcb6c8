//! 2D vector helpers on top of `glam::Vec2` and the bounded segment used by
//! every closest-point query.

use glam::Vec2;

use crate::error::GeometryError;

/// Extra operations the simulation needs on [`Vec2`].
pub trait VectorExt: Sized {
    /// Rotate by `degrees` with the standard rotation matrix.
    fn rotated_deg(self, degrees: f32) -> Self;

    /// Unit vector in the same direction. Fails instead of producing NaN.
    fn try_unit(self) -> Result<Self, GeometryError>;
}

impl VectorExt for Vec2 {
    #[inline]
    fn rotated_deg(self, degrees: f32) -> Vec2 {
        Vec2::from_angle(degrees.to_radians()).rotate(self)
    }

    #[inline]
    fn try_unit(self) -> Result<Vec2, GeometryError> {
        self.try_normalize().ok_or(GeometryError::DegenerateVector)
    }
}

/// A bounded line: `start` plus a direction whose length is the extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub dir: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, dir: Vec2) -> Self {
        Self { start, dir }
    }

    /// Segment between two points.
    pub fn between(a: Vec2, b: Vec2) -> Self {
        Self::new(a, b - a)
    }

    pub fn end(&self) -> Vec2 {
        self.start + self.dir
    }

    /// Same start, direction turned by 90 degrees.
    pub fn tangent(&self) -> Segment {
        Segment::new(self.start, self.dir.rotated_deg(90.0))
    }

    /// Closest point on the segment to `point`.
    ///
    /// The scalar projection is clamped to `[0, |dir|]`, so the result never
    /// leaves the segment.
    pub fn closest_point(&self, point: Vec2) -> Result<Vec2, GeometryError> {
        let unit = self.dir.try_unit()?;
        let t = (point - self.start).dot(unit).clamp(0.0, self.dir.length());
        Ok(self.start + unit * t)
    }
}
