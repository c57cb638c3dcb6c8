use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box holding every point, `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |acc, p| {
            Self::new(acc.min.min(*p), acc.max.max(*p))
        }))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let board = Aabb::new(Vec2::ZERO, Vec2::new(1280.0, 720.0));
        assert!(board.contains(Vec2::ZERO));
        assert!(board.contains(Vec2::new(1280.0, 720.0)));
        assert!(!board.contains(Vec2::new(-0.01, 10.0)));
        assert!(!board.contains(Vec2::new(10.0, 720.01)));
    }

    #[test]
    fn test_from_points() {
        let points = [
            Vec2::new(-20.0, 125.0),
            Vec2::new(20.0, 125.0),
            Vec2::new(20.0, -125.0),
            Vec2::new(-20.0, -125.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.size(), Vec2::new(40.0, 250.0));
        assert_eq!(aabb.center(), Vec2::ZERO);
        assert_eq!(Aabb::from_points(&[]), None);
    }
}
