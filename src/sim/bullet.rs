//! Bullet entities
//!
//! A bullet is owned by exactly one pattern. Patterns drive it through the
//! capability methods below; the bullet itself only knows how to take one
//! straight-line step and how to animate its own kind-specific state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, bullet_overlaps_hitbox};
use crate::consts::*;
use crate::palette::{self, Rgba};
use crate::{heading_deg, normalize_degrees, polar_deg, rotate_deg};

/// Tag used by patterns to mark subgroup behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletFlag {
    #[default]
    Neutral,
    /// Already reflected off a bounce edge
    Bounced,
    /// Rotates the opposite way from its neighbours
    ReverseRotation,
    /// Member of a SeamlessCeiling row
    IsCeiling,
}

/// Laser beam animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub max_width: f32,
    /// Width gained (or lost) per frame
    pub growth_speed: f32,
    /// Frames before the beam starts growing
    pub activation_delay: u32,
    /// Frames the beam stays up before shrinking; 0 keeps it up forever
    pub active_duration: u32,
    /// Current beam width
    pub width: f32,
}

impl Laser {
    pub fn new(
        max_width: f32,
        growth_speed: f32,
        activation_delay: u32,
        active_duration: u32,
    ) -> Self {
        Self {
            max_width,
            growth_speed,
            activation_delay,
            active_duration,
            width: 0.0,
        }
    }

    fn step(&mut self, age: u32) {
        if age <= self.activation_delay {
            return;
        }
        let expired =
            self.active_duration > 0 && age > self.activation_delay + self.active_duration;
        if expired {
            self.width = (self.width - self.growth_speed).max(0.0);
        } else {
            self.width = (self.width + self.growth_speed).min(self.max_width);
        }
    }

    /// A beam only hurts once it has visible width
    #[inline]
    pub fn is_active(&self) -> bool {
        self.width > 0.0
    }
}

/// Closed set of bullet kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletKind {
    Circle,
    Rice,
    Dot,
    Talisman,
    Bubble,
    Arrowhead,
    Laser(Laser),
    /// Emission reference point for other bullets
    Spawner { visible: bool },
}

impl BulletKind {
    pub fn default_radius(&self) -> f32 {
        match self {
            BulletKind::Circle => CIRCLE_BULLET_RADIUS,
            BulletKind::Rice => RICE_BULLET_RADIUS,
            BulletKind::Dot => DOT_BULLET_RADIUS,
            BulletKind::Talisman => TALISMAN_BULLET_RADIUS,
            BulletKind::Bubble => BUBBLE_BULLET_RADIUS,
            BulletKind::Arrowhead => ARROWHEAD_BULLET_RADIUS,
            BulletKind::Laser(laser) => laser.max_width / 2.0,
            BulletKind::Spawner { .. } => SPAWNER_RADIUS,
        }
    }

    pub fn default_color(&self) -> Rgba {
        match self {
            BulletKind::Circle => palette::DEFAULT_CIRCLE,
            BulletKind::Rice => palette::DEFAULT_RICE,
            BulletKind::Dot => palette::DEFAULT_DOT,
            BulletKind::Talisman => palette::DEFAULT_TALISMAN,
            BulletKind::Bubble => palette::DEFAULT_BUBBLE,
            BulletKind::Arrowhead => palette::DEFAULT_ARROWHEAD,
            BulletKind::Laser(_) => palette::DEFAULT_LASER,
            BulletKind::Spawner { .. } => palette::DEFAULT_SPAWNER,
        }
    }

    #[inline]
    pub fn is_spawner(&self) -> bool {
        matches!(self, BulletKind::Spawner { .. })
    }

    /// Stable numeric code for shaders
    pub fn code(&self) -> u32 {
        match self {
            BulletKind::Circle => 0,
            BulletKind::Rice => 1,
            BulletKind::Dot => 2,
            BulletKind::Talisman => 3,
            BulletKind::Bubble => 4,
            BulletKind::Arrowhead => 5,
            BulletKind::Laser(_) => 6,
            BulletKind::Spawner { .. } => 7,
        }
    }
}

/// A single projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub kind: BulletKind,
    pos: Vec2,
    vel: Vec2,
    /// Facing in degrees. Survives zero speed so a parked bullet can be
    /// relaunched along its original direction.
    heading: f32,
    flag: BulletFlag,
    pub color: Rgba,
    pub radius: f32,
    /// Frames since spawn (or since the last reset)
    age: u32,
}

impl Bullet {
    /// Create a bullet with the kind's default color and radius
    pub fn new(kind: BulletKind, position: Vec2, speed: f32, angle_degrees: f32) -> Self {
        Self {
            kind,
            pos: position,
            vel: polar_deg(speed, angle_degrees),
            heading: normalize_degrees(angle_degrees),
            flag: BulletFlag::Neutral,
            color: kind.default_color(),
            radius: kind.default_radius(),
            age: 0,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.pos = position;
    }

    pub fn adjust_position(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.vel = velocity;
        self.sync_heading();
    }

    pub fn adjust_velocity(&mut self, delta: Vec2) {
        self.vel += delta;
        self.sync_heading();
    }

    /// Set velocity from polar form (degrees)
    pub fn set_velocity_polar(&mut self, speed: f32, angle_degrees: f32) {
        self.vel = polar_deg(speed, angle_degrees);
        self.heading = normalize_degrees(angle_degrees);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Keep direction, replace magnitude
    pub fn set_speed(&mut self, speed: f32) {
        self.vel = polar_deg(speed, self.heading);
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.set_speed(self.speed() + delta);
    }

    /// Facing in degrees, [0, 360)
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.heading
    }

    /// Rotate the velocity vector in place
    pub fn rotate(&mut self, angle_degrees: f32) {
        self.vel = rotate_deg(self.vel, angle_degrees);
        self.heading = normalize_degrees(self.heading + angle_degrees);
    }

    /// Turn so that repeated steps trace a circle of `radius` at `arc_speed`
    /// pixels per frame. Negative speed turns the other way.
    pub fn rotate_arc(&mut self, radius: f32, arc_speed: f32) {
        if radius <= 0.0 {
            return;
        }
        self.rotate((arc_speed / radius).to_degrees());
    }

    pub fn flip_x(&mut self) {
        self.vel.x = -self.vel.x;
        self.sync_heading();
    }

    pub fn flip_y(&mut self) {
        self.vel.y = -self.vel.y;
        self.sync_heading();
    }

    #[inline]
    pub fn flag(&self) -> BulletFlag {
        self.flag
    }

    pub fn set_flag(&mut self, flag: BulletFlag) {
        self.flag = flag;
    }

    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Advance one frame along the current velocity
    pub fn process_movement(&mut self) {
        self.pos += self.vel;
        self.age = self.age.saturating_add(1);
        if let BulletKind::Laser(ref mut laser) = self.kind {
            laser.step(self.age);
        }
    }

    /// Restart kind-specific animation without moving the bullet
    pub fn reset_bullet(&mut self) {
        self.age = 0;
        if let BulletKind::Laser(ref mut laser) = self.kind {
            laser.width = 0.0;
        }
    }

    pub fn is_visible(&self) -> bool {
        match self.kind {
            BulletKind::Spawner { visible } => visible,
            BulletKind::Laser(laser) => laser.is_active(),
            _ => true,
        }
    }

    pub fn check_player_collision(&self, hitbox: &Hitbox) -> bool {
        bullet_overlaps_hitbox(self, hitbox)
    }

    fn sync_heading(&mut self) {
        if self.vel.length_squared() > f32::EPSILON {
            self.heading = heading_deg(self.vel);
        }
    }
}
