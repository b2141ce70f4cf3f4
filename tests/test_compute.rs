mod common;

use common::*;
use glitchborn::compute::*;
use glitchborn::config::GameConfig;
use glitchborn::entities::*;
use glitchborn::level::Level;
use glitchborn::loot::{Effect, Item, ItemKind, Quality, Slot, StatBonus};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ctx(now_ms: u64, config: &GameConfig) -> TickContext<'_> {
    TickContext { now: ms(now_ms), config }
}

fn potion(amount: i32) -> Item {
    Item {
        name: "Simple Health Potion".to_string(),
        description: String::new(),
        quality: Quality::Normal,
        kind: ItemKind::Consumable(Effect::Heal(amount)),
    }
}

fn weapon(name: &str, damage: i32) -> Item {
    Item {
        name: name.to_string(),
        description: String::new(),
        quality: Quality::Rare,
        kind: ItemKind::Equipment {
            slot: Slot::Weapon,
            bonus: StatBonus::Damage(damage),
        },
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_places_player_at_spawn() {
    let s = init_state(Difficulty::Medium, 800.0, 600.0, &config());
    assert_eq!(s.player.body.x, 400.0);
    assert_eq!(s.player.body.y, STANDING_Y);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.level.depth, 1);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.camera.offset_x, -16.0);
}

#[test]
fn init_generated_starts_on_a_valid_level() {
    let mut rng = seeded_rng();
    let s = init_generated(Difficulty::Hard, 800.0, 600.0, &config(), &mut rng);
    assert_eq!(s.level.validate(), Ok(()));
    assert_eq!(s.player.body.x, 50.0);
    assert_eq!(s.difficulty, Difficulty::Hard);
}

#[test]
fn init_generated_on_a_short_level_stays_in_bounds() {
    let mut cfg = config();
    cfg.level.height = 300.0;
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = init_generated(Difficulty::Medium, 800.0, 600.0, &cfg, &mut rng);
        assert_eq!(s.level.validate(), Ok(()), "seed {seed}");
    }
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_returns_a_new_state() {
    let cfg = config();
    let s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    let s2 = tick(&s, &TickInput::default(), &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s.frame, 0);
    assert_eq!(s2.frame, 1);
    assert_eq!(s2.last_tick, Some(ms(0)));
}

#[test]
fn standing_still_stays_on_the_ground() {
    let cfg = config();
    let mut rng = seeded_rng();
    let mut s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    for i in 0..60 {
        s = tick(&s, &TickInput::default(), &ctx(i * 16, &cfg), &mut rng);
    }
    assert_eq!(s.player.body.y, STANDING_Y);
    assert_eq!(s.player.body.x, 400.0);
}

#[test]
fn moving_right_from_spawn() {
    let cfg = config();
    let s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    let input = TickInput {
        right: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.player.body.x, 405.0);
    assert_eq!(s2.player.body.y, STANDING_Y);
    assert_eq!(s2.player.facing, Facing::Right);
}

#[test]
fn jumps_are_counted_across_ticks() {
    let cfg = config();
    let mut rng = seeded_rng();
    let jump = TickInput {
        jump: true,
        ..TickInput::default()
    };
    let mut s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);

    s = tick(&s, &jump, &ctx(0, &cfg), &mut rng);
    assert_eq!(s.player.jump_count, 1);
    assert!(s.player.body.y < STANDING_Y);

    s = tick(&s, &jump, &ctx(16, &cfg), &mut rng);
    assert_eq!(s.player.jump_count, 2);

    s = tick(&s, &jump, &ctx(32, &cfg), &mut rng);
    assert_eq!(s.player.jump_count, 2);
}

#[test]
fn game_over_freezes_the_state() {
    let cfg = config();
    let mut s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    s.status = GameStatus::GameOver;
    let input = TickInput {
        right: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.frame, s.frame);
    assert_eq!(s2.player, s.player);
}

#[test]
fn falling_out_of_the_level_ends_the_run() {
    let cfg = config();
    let level = Level::new(1, 2000.0, 600.0, (100.0, 100.0));
    let mut s = state_on(level);
    s.player.body.y = 599.0;
    s.player.change_y = 5.0;

    let s2 = tick(&s, &TickInput::default(), &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.player.health, 0);
    assert_eq!(s2.status, GameStatus::GameOver);
}

#[test]
fn contact_damage_can_kill() {
    let cfg = config();
    let mut level = flat_level();
    level.enemies.push(enemy_at(0, 100.0));
    let mut s = state_on(level);
    s.player.health = 5;

    let s2 = tick(&s, &TickInput::default(), &ctx(0, &cfg), &mut seeded_rng());
    assert!(s2.player.is_dead());
    assert_eq!(s2.status, GameStatus::GameOver);
}

#[test]
fn swing_while_moving_uses_the_pre_move_position() {
    let mut cfg = config();
    cfg.physics.player_speed = 20.0;
    let mut level = flat_level();
    let mut enemy = enemy_at(0, 120.0);
    enemy.health = 1000;
    level.enemies.push(enemy);
    let mut s = state_on(level);
    s.player.body.x = 190.0;

    let input = TickInput {
        left: true,
        attack: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.player.body.x, 170.0);
    assert_eq!(s2.player.facing, Facing::Left);
    assert_eq!(s2.level.enemies[0].health, 975);
    assert_eq!(s2.camera.offset_x, 0.0);
    assert_eq!(s2.player.health, 100);
}

#[test]
fn attack_pressed_after_a_swing_ends_starts_a_new_one() {
    let cfg = config();
    let mut rng = seeded_rng();
    let attack = TickInput {
        attack: true,
        ..TickInput::default()
    };
    let mut s = state_on(flat_level());

    s = tick(&s, &attack, &ctx(0, &cfg), &mut rng);
    assert!(s.player.is_attacking());

    s = tick(&s, &attack, &ctx(300, &cfg), &mut rng);
    assert_eq!(s.player.attack.as_ref().map(|a| a.created), Some(ms(300)));
}

#[test]
fn kills_are_counted_and_reported() {
    let mut cfg = config();
    cfg.loot.drop_chance = 0.0;
    let mut level = flat_level();
    let mut enemy = enemy_at(0, 140.0);
    enemy.health = 1;
    level.enemies.push(enemy);
    let s = state_on(level);

    let input = TickInput {
        attack: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.kills, 1);
    assert!(s2.level.enemies.is_empty());
    assert!(s2.messages.iter().any(|m| m.starts_with('+') && m.ends_with("XP")));
}

#[test]
fn stamina_regenerates_with_elapsed_time() {
    let cfg = config();
    let mut rng = seeded_rng();
    let mut s = state_on(flat_level());
    s.player.stamina = 50.0;

    s = tick(&s, &TickInput::default(), &ctx(0, &cfg), &mut rng);
    assert_eq!(s.player.stamina, 50.0);
    s = tick(&s, &TickInput::default(), &ctx(1000, &cfg), &mut rng);
    assert_eq!(s.player.stamina, 60.0);
}

#[test]
fn portal_leads_to_the_next_depth() {
    let cfg = config();
    let mut s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    s.player.body.x = 1920.0;
    s.player.body.y = STANDING_Y;

    let input = TickInput {
        interact: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert_eq!(s2.level.depth, 2);
    assert_eq!(s2.level.width, 2400.0);
    assert_eq!(s2.player.body.x, 50.0);
    assert_eq!(s2.player.body.y, STANDING_Y);
    assert_eq!(s2.camera.level_width, 2400.0);
}

#[test]
fn interacting_with_a_chest_fills_the_inventory() {
    let cfg = config();
    let mut s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    // Stand on the first floating platform, where the chest sits
    s.player.body.x = 330.0;
    s.player.body.y = 450.0 - 48.0;

    let input = TickInput {
        interact: true,
        ..TickInput::default()
    };
    let s2 = tick(&s, &input, &ctx(0, &cfg), &mut seeded_rng());
    assert!((3..=5).contains(&s2.player.inventory.items.len()));
    assert!(s2.level.objects.iter().any(|o| o.kind == ObjectKind::Chest { opened: true }));
}

// ── Items & stats ─────────────────────────────────────────────────────────────

#[test]
fn using_a_potion_heals_up_to_max() {
    let mut s = state_on(flat_level());
    s.player.health = 50;
    s.player.inventory.add(potion(20)).unwrap();
    s.player.inventory.add(potion(80)).unwrap();

    let s2 = use_item(&s, 0);
    assert_eq!(s2.player.health, 70);
    assert_eq!(s2.player.inventory.items.len(), 1);
    // Original untouched
    assert_eq!(s.player.health, 50);

    let s3 = use_item(&s2, 0);
    assert_eq!(s3.player.health, 100);
}

#[test]
fn using_gear_equips_it_and_returns_the_old_piece() {
    let mut s = state_on(flat_level());
    s.player.inventory.add(weapon("Fine Sword", 3)).unwrap();
    s.player.inventory.add(weapon("Ornate Axe", 6)).unwrap();

    let s2 = use_item(&s, 0);
    assert_eq!(s2.player.equipment.damage_bonus(), 3);
    assert_eq!(s2.player.inventory.items.len(), 1);

    let s3 = use_item(&s2, 0);
    assert_eq!(s3.player.equipment.damage_bonus(), 6);
    assert_eq!(s3.player.inventory.items[0].name, "Fine Sword");
}

#[test]
fn using_an_empty_slot_changes_nothing() {
    let s = state_on(flat_level());
    let s2 = use_item(&s, 3);
    assert_eq!(s2.player, s.player);
}

#[test]
fn spending_a_point_through_compute() {
    let cfg = config();
    let mut s = state_on(flat_level());
    s.player.progression.stat_points = 1;
    let s2 = spend_stat_point(&s, Stat::Vitality, &cfg);
    assert_eq!(s2.player.max_health, 110);
    assert_eq!(s2.player.progression.stat_points, 0);
    assert_eq!(s.player.max_health, 100);
}

#[test]
fn message_feed_keeps_the_newest() {
    let mut s = state_on(flat_level());
    for i in 0..6 {
        s.push_message(format!("m{i}"));
    }
    assert_eq!(s.messages, vec!["m2", "m3", "m4", "m5"]);
}

// ── visible_bodies ────────────────────────────────────────────────────────────

#[test]
fn player_is_drawn_last() {
    let cfg = config();
    let s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    let bodies = visible_bodies(&s, &ctx(0, &cfg));
    let last = bodies.last().unwrap();
    assert_eq!(last.body, s.player.body);
    assert!(matches!(last.sprite, SpriteId::Player { invincible: false, .. }));
}

#[test]
fn off_screen_bodies_are_culled() {
    let cfg = config();
    let s = init_state(Difficulty::Medium, 800.0, 600.0, &cfg);
    let view = s.camera.view();
    let bodies = visible_bodies(&s, &ctx(0, &cfg));
    assert!(bodies.iter().all(|r| r.body.overlaps(&view)));
    // The portal sits at the far end of the level
    assert!(!bodies.iter().any(|r| r.sprite == SpriteId::Portal));
}

#[test]
fn recently_hit_player_is_drawn_invincible() {
    let cfg = config();
    let mut s = state_on(flat_level());
    s.player.last_hit = Some(ms(0));
    let bodies = visible_bodies(&s, &ctx(500, &cfg));
    assert!(matches!(
        bodies.last().map(|r| r.sprite),
        Some(SpriteId::Player { invincible: true, .. })
    ));
}

#[test]
fn swing_is_drawn_facing_its_direction() {
    let cfg = config();
    let input = TickInput {
        left: true,
        attack: true,
        ..TickInput::default()
    };
    let s = tick(&state_on(flat_level()), &input, &ctx(0, &cfg), &mut seeded_rng());
    let bodies = visible_bodies(&s, &ctx(0, &cfg));
    assert!(bodies.iter().any(|r| r.sprite == SpriteId::Attack(Facing::Left)));
    assert!(!bodies.iter().any(|r| r.sprite == SpriteId::Attack(Facing::Right)));
}
