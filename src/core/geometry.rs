//! Axis-aligned geometry.
//!
//! Entities store a float position as the single source of truth; every
//! `Rect` handed out is derived from it, so there is nothing to keep in sync.

use serde::{Deserialize, Serialize};

/// 2D vector for velocities and positions
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector, or zero when the length is too small to divide by.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::zero()
        }
    }

    /// Scales the vector down to `max` keeping its direction. Shorter vectors pass through.
    pub fn clamp_length(&self, max: f32) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            *self * (max / len)
        } else {
            *self
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Axis-aligned rectangle, y grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_position(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Half-open containment, matching how tiles own their top-left edges.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    pub fn set_left(&mut self, value: f32) {
        self.x = value;
    }

    pub fn set_right(&mut self, value: f32) {
        self.x = value - self.width;
    }

    pub fn set_top(&mut self, value: f32) {
        self.y = value;
    }

    pub fn set_bottom(&mut self, value: f32) {
        self.y = value - self.height;
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        let b = Rect::new(8.0, 0.0, 8.0, 8.0);
        let c = Rect::new(0.0, 8.0, 8.0, 8.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Rect::new(7.5, 7.5, 1.0, 1.0)));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut r = Rect::new(3.0, 4.0, 8.0, 16.0);
        r.set_right(20.0);
        assert_eq!(r.left(), 12.0);
        r.set_bottom(40.0);
        assert_eq!(r.top(), 24.0);
        assert_eq!(r.size(), Vec2::new(8.0, 16.0));
    }

    #[test]
    fn clamp_length_preserves_direction() {
        let v = Vec2::new(30.0, 40.0).clamp_length(10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        assert!((v.x - 6.0).abs() < 1e-4);
        assert!((v.y - 8.0).abs() < 1e-4);
        assert_eq!(Vec2::new(1.0, 1.0).clamp_length(10.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    }
}
