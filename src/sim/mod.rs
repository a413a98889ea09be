//! Deterministic simulation module
//!
//! All bullet logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only (one `update` per frame)
//! - Seeded RNG only, one generator per pattern
//! - Stable iteration order (insertion order of patterns and bullets)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod bullet;
pub mod collision;
pub mod manager;
pub mod pattern;
pub mod patterns;
pub mod wave;

pub use bounds::Bounds;
pub use bullet::{Bullet, BulletFlag, BulletKind, Laser};
pub use collision::{Hitbox, bullet_overlaps_hitbox, sd_circle, sd_segment};
pub use manager::PatternManager;
pub use pattern::{ManualPattern, Pattern, PatternCore, PatternParams, frames_per_shot};
pub use wave::WaveBook;
