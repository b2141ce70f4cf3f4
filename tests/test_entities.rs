mod common;

use common::*;
use glitchborn::entities::*;
use glitchborn::error::GeometryError;
use glitchborn::geometry::*;

// ── Body ──────────────────────────────────────────────────────────────────────

#[test]
fn edges_and_center() {
    let b = Body::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(b.left(), 10.0);
    assert_eq!(b.right(), 40.0);
    assert_eq!(b.top(), 20.0);
    assert_eq!(b.bottom(), 60.0);
    assert_eq!(b.center(), (25.0, 40.0));
}

#[test]
fn setters_move_without_resizing() {
    let mut b = Body::new(0.0, 0.0, 30.0, 40.0);
    b.set_right(100.0);
    assert_eq!(b.x, 70.0);
    b.set_bottom(100.0);
    assert_eq!(b.y, 60.0);
    assert_eq!((b.width, b.height), (30.0, 40.0));
}

#[test]
fn touching_edges_do_not_overlap() {
    let a = Body::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.overlaps(&Body::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Body::new(0.0, 10.0, 10.0, 10.0)));
    assert!(a.overlaps(&Body::new(9.0, 9.0, 10.0, 10.0)));
}

#[test]
fn translated_leaves_the_original_alone() {
    let a = Body::new(0.0, 0.0, 10.0, 10.0);
    let moved = a.translated(5.0, -2.0);
    assert_eq!(moved, Body::new(5.0, -2.0, 10.0, 10.0));
    assert_eq!(a, Body::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn try_new_rejects_degenerate_sizes() {
    assert!(Body::try_new(0.0, 0.0, 1.0, 1.0).is_ok());
    assert_eq!(
        Body::try_new(0.0, 0.0, 0.0, 5.0),
        Err(GeometryError::DegenerateBody { width: 0.0, height: 5.0 })
    );
    assert!(Body::try_new(0.0, 0.0, 5.0, -1.0).is_err());
    assert!(Body::try_new(0.0, 0.0, f32::NAN, 5.0).is_err());
}

#[test]
fn contains_checks_full_inclusion() {
    let outer = Body::new(0.0, 0.0, 100.0, 100.0);
    assert!(outer.contains(&Body::new(0.0, 0.0, 100.0, 100.0)));
    assert!(outer.contains(&Body::new(10.0, 10.0, 10.0, 10.0)));
    assert!(!outer.contains(&Body::new(95.0, 10.0, 10.0, 10.0)));
}

// ── Collidable ────────────────────────────────────────────────────────────────

#[test]
fn entities_share_the_collision_check() {
    let p = standing_player(100.0);
    let e = enemy_at(0, 110.0);
    let platform = Platform::new(0.0, GROUND_TOP, 2000.0, 30.0);
    assert!(p.collides_with(&e));
    assert!(e.collides_with(&p));
    // Standing on the ground is contact, not overlap
    assert!(!p.collides_with(&platform));
}

#[test]
fn overlapping_filters_a_slice() {
    let platforms = vec![
        Platform::new(0.0, 0.0, 10.0, 10.0),
        Platform::new(50.0, 0.0, 10.0, 10.0),
        Platform::new(5.0, 5.0, 10.0, 10.0),
    ];
    let query = Body::new(0.0, 0.0, 12.0, 12.0);
    assert_eq!(overlapping(&query, &platforms).count(), 2);
}

// ── Player & enemies ──────────────────────────────────────────────────────────

#[test]
fn new_player_has_full_resources() {
    let p = standing_player(100.0);
    assert_eq!(p.health, 100);
    assert_eq!(p.stamina, 100.0);
    assert_eq!(p.progression.level, 1);
    assert_eq!(p.progression.xp_to_next_level, 100);
    assert_eq!(p.facing, Facing::Right);
    assert!(!p.is_attacking());
    assert!(!p.is_dashing());
    assert_eq!(p.inventory.capacity, 20);
}

#[test]
fn invincibility_window_is_half_open() {
    let mut p = standing_player(100.0);
    assert!(!p.is_invincible(ms(0), ms(1000)));
    p.last_hit = Some(ms(100));
    assert!(p.is_invincible(ms(100), ms(1000)));
    assert!(p.is_invincible(ms(1099), ms(1000)));
    assert!(!p.is_invincible(ms(1100), ms(1000)));
}

#[test]
fn enemy_spawns_on_its_floor_with_scaled_stats() {
    let cfg = config();
    let e = Enemy::spawn(EnemyId(3), 200.0, 450.0, 100.0, 1.5, &cfg.enemy);
    assert_eq!(e.body.bottom(), 450.0);
    assert_eq!(e.max_health, 45);
    assert_eq!(e.health, 45);
    assert_eq!(e.damage, 15);
    assert_eq!(e.xp_reward, (30, 45));
    assert_eq!(e.patrol.start, 200.0);
    assert_eq!(e.patrol.range, 100.0);
}

#[test]
fn difficulty_modifiers() {
    assert_eq!(Difficulty::Easy.base_modifier(), 0.75);
    assert_eq!(Difficulty::Medium.base_modifier(), 1.0);
    assert_eq!(Difficulty::Hard.base_modifier(), 1.5);
    assert_eq!(Facing::Left.sign(), -1.0);
}

#[test]
fn props_rest_on_their_floor() {
    for object in [
        WorldObject::chest(0.0, 450.0),
        WorldObject::campfire(0.0, 450.0),
        WorldObject::portal(0.0, 450.0),
    ] {
        assert_eq!(object.body.bottom(), 450.0);
    }
}

#[test]
fn game_state_clone_is_independent() {
    let original = state_on(flat_level());
    let mut cloned = original.clone();
    cloned.player.body.x = 999.0;
    cloned.level.enemies.push(enemy_at(7, 500.0));
    assert_eq!(original.player.body.x, 100.0);
    assert!(original.level.enemies.is_empty());
}
