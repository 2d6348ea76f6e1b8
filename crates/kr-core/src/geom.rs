//! Grid geometry

use core::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Integer grid vector, used both for positions and directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev length (king moves)
    pub fn length8(self) -> i32 {
        self.x.abs().max(self.y.abs())
    }

    /// Chebyshev distance to another point
    pub fn dist8(self, other: Vec2) -> i32 {
        (other - self).length8()
    }

    /// The eight neighbouring directions
    pub fn directions8() -> [Vec2; 8] {
        [
            Vec2::new(-1, -1),
            Vec2::new(0, -1),
            Vec2::new(1, -1),
            Vec2::new(-1, 0),
            Vec2::new(1, 0),
            Vec2::new(-1, 1),
            Vec2::new(0, 1),
            Vec2::new(1, 1),
        ]
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl core::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square of the given radius centred on a point
    pub fn around(center: Vec2, radius: i32) -> Self {
        Self {
            min: Vec2::new(center.x - radius, center.y - radius),
            max: Vec2::new(center.x + radius + 1, center.y + radius + 1),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist8_is_chebyshev() {
        let a = Vec2::new(0, 0);
        assert_eq!(a.dist8(Vec2::new(1, 1)), 1);
        assert_eq!(a.dist8(Vec2::new(-1, 0)), 1);
        assert_eq!(a.dist8(Vec2::new(2, 1)), 2);
        assert_eq!(a.dist8(a), 0);
    }

    #[test]
    fn test_rect_around() {
        let r = Rect::around(Vec2::new(5, 5), 1);
        assert!(r.contains(Vec2::new(4, 4)));
        assert!(r.contains(Vec2::new(6, 6)));
        assert!(!r.contains(Vec2::new(7, 5)));
        assert_eq!(r.width(), 3);
    }
}
