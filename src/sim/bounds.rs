//! Axis-aligned rectangles for active regions
//!
//! Each pattern owns its own copy of a `Bounds`. Bullets whose position
//! leaves it are culled; bounce regions use the same type.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangle in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Grow by `factor * reference` dimension on every side.
    ///
    /// Entering 1.0 triples the reference width and height. The reference is
    /// the playfield, not the current size, so repeated expansion is additive.
    pub fn expand(&mut self, factor: f32, reference: &Bounds) {
        let dx = reference.width * factor;
        let dy = reference.height * factor;
        self.left -= dx;
        self.top -= dy;
        self.width += dx * 2.0;
        self.height += dy * 2.0;
    }

    /// Copy of `self` expanded by `factor` of its own size
    pub fn expanded(&self, factor: f32) -> Self {
        let mut out = *self;
        out.expand(factor, self);
        out
    }

    /// Whether the point sits left or right of the rectangle
    pub fn outside_horizontally(&self, point: Vec2) -> bool {
        point.x < self.left || point.x >= self.right()
    }

    /// Whether the point sits on or below the bottom edge
    pub fn below(&self, point: Vec2) -> bool {
        point.y >= self.bottom()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        crate::consts::SCREEN_BOUNDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(b.contains(Vec2::new(9.99, 9.99)));
        assert!(!b.contains(Vec2::new(10.0, 5.0)));
        assert!(!b.contains(Vec2::new(5.0, -0.01)));
    }

    #[test]
    fn test_expand_is_symmetric() {
        let reference = Bounds::new(50.0, 40.0, 720.0, 840.0);
        let mut b = reference;
        b.expand(0.1, &reference);
        assert!((b.left - (50.0 - 72.0)).abs() < 1e-3);
        assert!((b.top - (40.0 - 84.0)).abs() < 1e-3);
        assert!((b.right() - (770.0 + 72.0)).abs() < 1e-3);
        assert!((b.bottom() - (880.0 + 84.0)).abs() < 1e-3);
        // Center does not move
        assert!((b.center() - reference.center()).length() < 1e-3);
    }

    #[test]
    fn test_expand_by_one_triples() {
        let b = Bounds::new(0.0, 0.0, 100.0, 50.0).expanded(1.0);
        assert!((b.width - 300.0).abs() < 1e-3);
        assert!((b.height - 150.0).abs() < 1e-3);
    }
}
