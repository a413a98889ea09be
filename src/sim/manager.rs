//! Pattern manager
//!
//! Owns every pattern in insertion order and drives them once per frame.
//! Index 0 is the persistent test pattern: global deactivation resets it but
//! never clears its bullets.

use super::bullet::Bullet;
use super::collision::Hitbox;
use super::pattern::Pattern;

#[derive(Default)]
pub struct PatternManager {
    patterns: Vec<Box<dyn Pattern>>,
}

impl PatternManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a pattern; it updates and draws after existing ones
    pub fn add_pattern(&mut self, pattern: Box<dyn Pattern>) {
        log::debug!("Added pattern {} at index {}", pattern.name(), self.patterns.len());
        self.patterns.push(pattern);
    }

    /// Step every active pattern: cull, spawn, advance the frame, move
    pub fn update(&mut self) {
        for pattern in self.patterns.iter_mut().filter(|p| p.is_active()) {
            pattern.step();
        }
    }

    /// Pause and rewind every pattern; clear all bullets except the test pattern's
    pub fn deactivate_all_patterns(&mut self) {
        for (i, pattern) in self.patterns.iter_mut().enumerate() {
            pattern.set_active(false);
            pattern.reset_pattern();
            if i != 0 {
                pattern.delete_all_bullets();
            }
        }
        log::info!("Deactivated {} patterns", self.patterns.len());
    }

    pub fn activate_all_patterns(&mut self) {
        for pattern in &mut self.patterns {
            pattern.set_active(true);
        }
        log::info!("Activated {} patterns", self.patterns.len());
    }

    /// Rotate the velocity of every bullet in every pattern, active or not
    pub fn rotate_all_bullets(&mut self, angle_degrees: f32) {
        for pattern in &mut self.patterns {
            for bullet in &mut pattern.core_mut().bullets {
                bullet.rotate(angle_degrees);
            }
        }
    }

    /// True as soon as any bullet of an active pattern touches the hitbox
    pub fn check_player_collision(&self, hitbox: &Hitbox) -> bool {
        self.patterns
            .iter()
            .filter(|p| p.is_active())
            .flat_map(|p| p.bullets())
            .any(|b: &Bullet| b.check_player_collision(hitbox))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Pattern> {
        self.patterns.get(index).map(|p| p.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Pattern + 'static)> {
        self.patterns.get_mut(index).map(|p| p.as_mut())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &dyn Pattern> {
        self.patterns.iter().map(|p| p.as_ref())
    }

    /// Live bullets across all patterns, spawners included
    pub fn bullet_count(&self) -> usize {
        self.patterns.iter().map(|p| p.bullets().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::BulletKind;
    use crate::sim::pattern::{ManualPattern, PatternParams};
    use crate::sim::patterns::{Bowap, BowapConfig};
    use glam::Vec2;

    fn manual_with_bullet(pos: Vec2) -> Box<dyn Pattern> {
        let mut manual = ManualPattern::new(PatternParams::new(pos, 0, 0.0, 0.0));
        manual.core_mut().spawn(BulletKind::Circle, pos, 0.0, 0.0);
        Box::new(manual)
    }

    #[test]
    fn test_update_skips_inactive() {
        let mut manager = PatternManager::new();
        let params = PatternParams::new(Vec2::new(410.0, 460.0), 3, 1.0, 5.0);
        manager.add_pattern(Box::new(Bowap::new(params, BowapConfig::default())));
        manager.add_pattern(Box::new(Bowap::new(params, BowapConfig::default())));
        if let Some(p) = manager.get_mut(1) {
            p.set_active(false);
        }
        manager.update();
        assert_eq!(manager.get(0).map(|p| p.bullets().len()), Some(3));
        assert_eq!(manager.get(1).map(|p| p.bullets().len()), Some(0));
        assert_eq!(manager.bullet_count(), 3);
    }

    #[test]
    fn test_collision_only_with_active_patterns() {
        let hit = Vec2::new(300.0, 300.0);
        let mut manager = PatternManager::new();
        manager.add_pattern(manual_with_bullet(Vec2::new(600.0, 600.0)));
        manager.add_pattern(manual_with_bullet(hit));
        let hitbox = Hitbox::player(hit);
        assert!(manager.check_player_collision(&hitbox));

        if let Some(p) = manager.get_mut(1) {
            p.set_active(false);
        }
        assert!(!manager.check_player_collision(&hitbox));
    }

    #[test]
    fn test_rotate_ignores_active_flag() {
        let mut manager = PatternManager::new();
        let mut manual = ManualPattern::new(PatternParams::new(Vec2::ZERO, 0, 0.0, 0.0));
        manual.core_mut().spawn(BulletKind::Rice, Vec2::ZERO, 1.0, 0.0);
        manual.set_active(false);
        manager.add_pattern(Box::new(manual));

        manager.rotate_all_bullets(90.0);
        let rotation = manager.get(0).map(|p| p.bullets()[0].rotation());
        assert!((rotation.unwrap_or_default() - 90.0).abs() < 1e-3);
    }
}
