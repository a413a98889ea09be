//! Player hitbox overlap tests
//!
//! Only "does this bullet touch the hitbox" is answered here. There is no
//! collision response: a hit is a life-loss trigger and nothing more.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletKind};
use crate::consts::{LASER_LENGTH, PLAYER_HITBOX_RADIUS};
use crate::polar_deg;

/// Circular player hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub center: Vec2,
    pub radius: f32,
}

impl Hitbox {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Standard player hitbox at a position
    pub fn player(center: Vec2) -> Self {
        Self::new(center, PLAYER_HITBOX_RADIUS)
    }
}

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a thick line segment (capsule)
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2, half_width: f32) -> f32 {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();
    if line_len_sq < 0.0001 {
        // Degenerate segment
        return sd_circle(p, a, half_width);
    }
    let t = ((p - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let closest = a + line_vec * t;
    (p - closest).length() - half_width
}

/// Whether a bullet's shape overlaps the hitbox
pub fn bullet_overlaps_hitbox(bullet: &Bullet, hitbox: &Hitbox) -> bool {
    match bullet.kind {
        BulletKind::Spawner { .. } => false,
        BulletKind::Laser(laser) => {
            if !laser.is_active() {
                return false;
            }
            let start = bullet.position();
            let end = start + polar_deg(LASER_LENGTH, bullet.rotation());
            sd_segment(hitbox.center, start, end, laser.width / 2.0) < hitbox.radius
        }
        _ => sd_circle(hitbox.center, bullet.position(), bullet.radius) < hitbox.radius,
    }
}
