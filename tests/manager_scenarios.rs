//! Manager-level scenarios

use danmaku_sim::sim::patterns::{Bowap, BowapConfig};
use danmaku_sim::sim::{Bounds, BulletKind, Hitbox, ManualPattern, PatternManager, PatternParams};
use danmaku_sim::{Pattern, Settings, heading_deg};
use glam::Vec2;

fn bowap_at(source: Vec2) -> Box<dyn Pattern> {
    // Large playfield so nothing is culled
    let params = PatternParams::new(source, 3, 1.0, 5.0)
        .with_playfield(Bounds::new(-2_000.0, -2_000.0, 5_000.0, 5_000.0));
    Box::new(Bowap::new(params, BowapConfig::default()))
}

#[test]
fn bowap_fires_twice_in_sixty_one_updates() {
    let mut manager = PatternManager::new();
    manager.add_pattern(bowap_at(Vec2::new(100.0, 100.0)));

    for _ in 0..60 {
        manager.update();
    }
    assert_eq!(manager.bullet_count(), 3);

    // Frame 60's shot is spawned on the next update
    manager.update();
    assert_eq!(manager.bullet_count(), 6);

    let bullets = manager.get(0).map(|p| p.bullets().to_vec()).unwrap_or_default();
    for shot in bullets.chunks(3) {
        let base = heading_deg(shot[0].velocity());
        for (i, bullet) in shot.iter().enumerate() {
            let offset = (heading_deg(bullet.velocity()) - base).rem_euclid(360.0);
            assert!((offset - 120.0 * i as f32).abs() < 1e-2, "offset {offset}");
        }
    }
}

#[test]
fn deactivate_keeps_only_test_pattern_bullets() {
    let mut manager = PatternManager::new();
    let params = PatternParams::new(Vec2::new(400.0, 400.0), 0, 0.0, 0.0);
    let mut test_pattern = ManualPattern::new(params);
    test_pattern
        .core_mut()
        .spawn(BulletKind::Circle, Vec2::new(400.0, 400.0), 0.0, 0.0);
    manager.add_pattern(Box::new(test_pattern));
    manager.add_pattern(bowap_at(Vec2::new(400.0, 300.0)));
    manager.add_pattern(bowap_at(Vec2::new(300.0, 300.0)));
    for _ in 0..90 {
        manager.update();
    }
    assert!(manager.get(1).map(|p| p.bullets().len()).unwrap_or(0) > 0);

    manager.deactivate_all_patterns();

    let state: Vec<(bool, usize, u32)> = manager
        .patterns()
        .map(|p| (p.is_active(), p.bullets().len(), p.core().frame()))
        .collect();
    assert_eq!(state, vec![(false, 1, 0), (false, 0, 0), (false, 0, 0)]);

    // Paused patterns ignore updates
    manager.update();
    assert_eq!(manager.bullet_count(), 1);

    manager.activate_all_patterns();
    manager.update();
    assert_eq!(manager.bullet_count(), 7);
}

#[test]
fn demo_scenario_survives_global_reset_cycle() {
    let mut manager = Settings::default().build_manager();
    for _ in 0..300 {
        manager.update();
    }
    assert!(manager.bullet_count() > 0);
    manager.rotate_all_bullets(45.0);
    manager.deactivate_all_patterns();
    assert_eq!(manager.bullet_count(), 0);
    manager.activate_all_patterns();
    for _ in 0..300 {
        manager.update();
        for pattern in manager.patterns() {
            if let Some(waves) = pattern.waves() {
                assert_eq!(waves.tracked_count(), pattern.bullets().len(), "{}", pattern.name());
            }
        }
    }
}

#[test]
fn collision_checks_active_patterns_only() {
    let mut manager = PatternManager::new();
    manager.add_pattern(bowap_at(Vec2::new(400.0, 300.0)));
    manager.update();
    let hitbox = Hitbox::player(Vec2::new(405.0, 300.0));
    assert!(manager.check_player_collision(&hitbox));

    manager.deactivate_all_patterns();
    // Index 0 keeps its bullets but is no longer active
    assert!(!manager.check_player_collision(&hitbox));
}
