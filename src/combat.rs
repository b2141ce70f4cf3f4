//! Melee swings, enemy deaths and contact damage.
//!
//! Timers compare `Duration` timestamps taken from a monotonic clock, so a
//! swing or an invincibility window lasts the same wall-clock time at any
//! frame rate.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

use crate::config::{CombatConfig, GameConfig};
use crate::entities::{AttackHitbox, Enemy, EnemyId, Facing, ItemPickup, Player};
use crate::geometry::{Body, Collidable};
use crate::level::Level;
use crate::loot;
use crate::progression;

/// An enemy removed during this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Defeat {
    pub id: EnemyId,
    pub xp: u32,
    pub levels_gained: u32,
    /// Name of the item dropped in the world, if the roll succeeded.
    pub drop: Option<String>,
}

/// The hitbox a swing would create right now: attack-width wide, as tall
/// as the player, flush against the side the player faces.
pub fn hitbox_for(player: &Player, config: &CombatConfig) -> Body {
    let body = &player.body;
    let x = match player.facing {
        Facing::Right => body.right(),
        Facing::Left => body.left() - config.attack_width,
    };
    Body::new(x, body.top(), config.attack_width, body.height)
}

/// Start a swing unless one is still live.  A swing whose time is up no
/// longer counts, even if the tick has not cleared it yet.  Being airborne
/// does not matter.
pub fn start_attack(player: &mut Player, now: Duration, config: &CombatConfig) -> bool {
    expire_attack(player, now);
    if player.is_attacking() {
        return false;
    }
    player.attack = Some(AttackHitbox {
        body: hitbox_for(player, config),
        direction: player.facing,
        created: now,
        duration: config.attack_duration(),
        already_hit: HashSet::new(),
    });
    true
}

/// Drop the swing once its duration has elapsed.  The already-hit set goes
/// with it.
pub fn expire_attack(player: &mut Player, now: Duration) -> bool {
    if player.attack.as_ref().is_some_and(|a| a.is_expired(now)) {
        player.attack = None;
        return true;
    }
    false
}

/// Damage dealt by one hit: base, plus strength scaling, plus weapon.
pub fn player_damage(player: &Player, config: &CombatConfig) -> i32 {
    let from_strength = (player.stats.strength as f32 * config.strength_multiplier).round() as i32;
    config.base_damage + from_strength + player.equipment.damage_bonus()
}

/// Apply the live swing to every enemy it touches that it has not touched
/// before.  Returns the ids that took damage this tick.
pub fn apply_hits(player: &mut Player, enemies: &mut [Enemy], config: &CombatConfig) -> Vec<EnemyId> {
    let damage = player_damage(player, config);
    let Some(attack) = player.attack.as_mut() else {
        return Vec::new();
    };

    let mut hit = Vec::new();
    for enemy in enemies.iter_mut() {
        if enemy.is_dead() || attack.already_hit.contains(&enemy.id) {
            continue;
        }
        if attack.body.overlaps(enemy.body()) {
            enemy.health -= damage;
            attack.already_hit.insert(enemy.id);
            hit.push(enemy.id);
            tracing::debug!(enemy = enemy.id.0, damage, health = enemy.health, "enemy hit");
        }
    }
    hit
}

/// Remove dead enemies exactly once, paying out XP and rolling loot for each.
pub fn collect_defeats(
    player: &mut Player,
    level: &mut Level,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Defeat> {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut level.enemies).into_iter().partition(Enemy::is_dead);
    level.enemies = alive;

    dead.into_iter()
        .map(|enemy| {
            let (lo, hi) = enemy.xp_reward;
            let xp = rng.gen_range(lo.min(hi)..=hi.max(lo));
            let levels_gained = progression::add_xp(player, xp, &config.progression);

            let drop = loot::roll_drop(rng, enemy.difficulty, &config.loot).map(|item| {
                let name = item.to_string();
                let (cx, cy) = enemy.body.center();
                level.pickups.push(ItemPickup::at(cx, cy, item));
                name
            });

            tracing::info!(enemy = enemy.id.0, xp, dropped = drop.is_some(), "enemy defeated");
            Defeat {
                id: enemy.id,
                xp,
                levels_gained,
                drop,
            }
        })
        .collect()
}

/// One tick of the swing: expire it if its time is up, otherwise hit and
/// clear out the dead.
pub fn resolve_attack(
    player: &mut Player,
    level: &mut Level,
    now: Duration,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Defeat> {
    if expire_attack(player, now) || !player.is_attacking() {
        return Vec::new();
    }
    apply_hits(player, &mut level.enemies, &config.combat);
    collect_defeats(player, level, config, rng)
}

/// Touching an enemy hurts unless the player is mid-swing or still inside
/// the invincibility window.  Returns the damage taken.
pub fn resolve_contact(player: &mut Player, enemies: &[Enemy], now: Duration, config: &CombatConfig) -> Option<i32> {
    if player.is_attacking() || player.is_invincible(now, config.invincibility()) {
        return None;
    }
    let enemy = enemies.iter().find(|e| player.collides_with(*e))?;
    player.health -= enemy.damage;
    player.last_hit = Some(now);
    tracing::debug!(damage = enemy.damage, health = player.health, "player hit");
    Some(enemy.damage)
}
