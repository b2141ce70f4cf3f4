mod common;

use common::*;
use glitchborn::entities::{Enemy, EnemyId};
use glitchborn::patrol::*;

fn patroller(start: f32, range: f32, speed: f32) -> Enemy {
    let mut e = Enemy::spawn(EnemyId(0), start, GROUND_TOP, range, 1.0, &config().enemy);
    e.patrol.speed = speed;
    e
}

#[test]
fn walks_out_and_turns_at_both_ends() {
    let mut e = patroller(0.0, 10.0, 4.0);
    let mut xs = Vec::new();
    for _ in 0..7 {
        step(&mut e);
        xs.push(e.body.x);
    }
    assert_eq!(xs, vec![4.0, 8.0, 10.0, 6.0, 2.0, 0.0, 4.0]);
}

#[test]
fn direction_flips_at_the_far_end() {
    let mut e = patroller(0.0, 10.0, 4.0);
    step(&mut e);
    step(&mut e);
    assert_eq!(e.patrol.direction, 1.0);
    step(&mut e);
    assert_eq!(e.patrol.direction, -1.0);
}

#[test]
fn never_leaves_patrol_range() {
    let mut e = patroller(700.0, 250.0, 2.0);
    for _ in 0..1000 {
        step(&mut e);
        assert!(e.body.x >= 700.0 && e.body.x <= 950.0);
    }
}

#[test]
fn zero_range_stays_put() {
    let mut e = patroller(300.0, 0.0, 2.0);
    for _ in 0..20 {
        step(&mut e);
        assert_eq!(e.body.x, 300.0);
    }
}

#[test]
fn step_all_moves_every_enemy() {
    let mut enemies = vec![patroller(0.0, 100.0, 2.0), patroller(500.0, 100.0, 3.0)];
    step_all(&mut enemies);
    assert_eq!(enemies[0].body.x, 2.0);
    assert_eq!(enemies[1].body.x, 503.0);
}
