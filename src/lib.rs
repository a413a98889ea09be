//! Danmaku Sim - bullet-pattern simulation core for a bullet-hell shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped pattern simulation (bullets, waves, patterns, manager)
//! - `renderer`: Render sink contract and GPU instance packing
//! - `settings`: Data-driven scenario configuration

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{PatternSpec, Settings};
pub use sim::{Bullet, BulletFlag, BulletKind, Hitbox, Pattern, PatternManager};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use crate::sim::Bounds;

    /// Fixed simulation rate (frames per second)
    pub const FPS: f32 = 60.0;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 720.0;
    pub const SCREEN_HEIGHT: f32 = 840.0;
    pub const SCREEN_LEFT: f32 = 50.0;
    pub const SCREEN_TOP: f32 = 40.0;
    pub const SCREEN_BOUNDS: Bounds =
        Bounds::new(SCREEN_LEFT, SCREEN_TOP, SCREEN_WIDTH, SCREEN_HEIGHT);

    /// Every pattern grows its active region by this factor so bullets at the
    /// visible edge are not culled early
    pub const DEFAULT_BOUNDS_EXPANSION: f32 = 0.1;

    pub const PLAYER_HITBOX_RADIUS: f32 = 4.0;

    /// Default bullet radii per kind
    pub const CIRCLE_BULLET_RADIUS: f32 = 6.0;
    pub const RICE_BULLET_RADIUS: f32 = 4.0;
    pub const DOT_BULLET_RADIUS: f32 = 4.0;
    pub const TALISMAN_BULLET_RADIUS: f32 = 4.0;
    pub const BUBBLE_BULLET_RADIUS: f32 = 14.0;
    pub const ARROWHEAD_BULLET_RADIUS: f32 = 5.0;
    pub const SPAWNER_RADIUS: f32 = 6.0;

    /// Laser beams extend this far along their heading
    pub const LASER_LENGTH: f32 = 1000.0;
}

/// RGBA colors shared by patterns and the renderer
pub mod palette {
    pub type Rgba = [f32; 4];

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const GRAY: Rgba = [0.5, 0.5, 0.5, 1.0];
    pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.65, 0.0, 1.0];
    pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
    pub const GREEN: Rgba = [0.0, 1.0, 0.0, 1.0];
    pub const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
    pub const CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
    pub const VIOLET: Rgba = [0.58, 0.0, 0.83, 1.0];
    pub const MAGENTA: Rgba = [1.0, 0.0, 1.0, 1.0];
    pub const SEE_THROUGH: Rgba = [1.0, 1.0, 1.0, 0.39];

    /// Default colors per bullet kind
    pub const DEFAULT_CIRCLE: Rgba = RED;
    pub const DEFAULT_RICE: Rgba = MAGENTA;
    pub const DEFAULT_DOT: Rgba = SEE_THROUGH;
    pub const DEFAULT_TALISMAN: Rgba = MAGENTA;
    pub const DEFAULT_BUBBLE: Rgba = CYAN;
    pub const DEFAULT_ARROWHEAD: Rgba = ORANGE;
    pub const DEFAULT_LASER: Rgba = VIOLET;
    pub const DEFAULT_SPAWNER: Rgba = WHITE;
}

/// Normalized angle to [0, 360) degrees
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (speed, degrees) to a cartesian vector
#[inline]
pub fn polar_deg(length: f32, angle_degrees: f32) -> Vec2 {
    Vec2::from_angle(angle_degrees.to_radians()) * length
}

/// Rotate a vector by the given angle in degrees
#[inline]
pub fn rotate_deg(v: Vec2, angle_degrees: f32) -> Vec2 {
    Vec2::from_angle(angle_degrees.to_radians()).rotate(v)
}

/// Heading of a vector in degrees, normalized to [0, 360)
#[inline]
pub fn heading_deg(v: Vec2) -> f32 {
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_polar_round_trip_heading() {
        let v = polar_deg(5.0, 120.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert!((heading_deg(v) - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_deg_quarter_turn() {
        let v = rotate_deg(Vec2::X, 90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }
}
