//! Player movement against static platforms.
//!
//! Resolution is axis-separated: move on x, push out of platforms, then move
//! on y and push out again.  Never combine the two into one diagonal move;
//! corners would then tunnel or snag.

use std::time::Duration;

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::entities::{Facing, Platform, Player};
use crate::geometry::{overlapping, Body};

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn hits_any(body: &Body, platforms: &[Platform]) -> bool {
    overlapping(body, platforms).next().is_some()
}

/// Probe `depth` units below the body.  The body itself is not moved.
pub fn is_grounded(body: &Body, platforms: &[Platform], depth: f32) -> bool {
    hits_any(&body.translated(0.0, depth), platforms)
}

// ── Per-tick integration ─────────────────────────────────────────────────────

/// A resting body gets an immediate small fall speed; a moving one
/// accelerates.  The cap keeps one tick's fall shorter than a platform.
pub fn apply_gravity(player: &mut Player, config: &PhysicsConfig) {
    if player.change_y == 0.0 {
        player.change_y = config.base_fall_speed;
    } else {
        player.change_y += config.gravity;
    }
    player.change_y = player.change_y.min(config.terminal_velocity);
}

fn collect_hits(body: &Body, platforms: &[Platform]) -> Vec<Body> {
    overlapping(body, platforms).map(|p| p.body).collect()
}

/// Move by the current velocity, resolving x fully before y.
pub fn move_and_collide(player: &mut Player, platforms: &[Platform]) {
    player.body.x += player.change_x;
    for block in collect_hits(&player.body, platforms) {
        if player.change_x > 0.0 {
            player.body.set_right(block.left());
        } else if player.change_x < 0.0 {
            player.body.set_left(block.right());
        }
    }

    player.grounded = false;
    player.body.y += player.change_y;
    for block in collect_hits(&player.body, platforms) {
        if player.change_y > 0.0 {
            player.body.set_bottom(block.top());
            player.change_y = 0.0;
            player.jump_count = 0;
            player.grounded = true;
        } else if player.change_y < 0.0 {
            player.body.set_top(block.bottom());
            player.change_y = 0.0;
        }
    }
}

/// Gravity followed by movement: one full physics tick.
pub fn step(player: &mut Player, platforms: &[Platform], config: &PhysicsConfig) {
    apply_gravity(player, config);
    move_and_collide(player, platforms);
}

/// Keep the player between the level's left and right edges.
pub fn clamp_to_level(player: &mut Player, level_width: f32) {
    let max_x = (level_width - player.body.width).max(0.0);
    player.body.x = player.body.x.clamp(0.0, max_x);
}

// ── Input-driven actions ─────────────────────────────────────────────────────

/// Translate held direction keys into horizontal velocity.  Left wins when
/// both are held.  A dash in progress overrides the keys.
pub fn set_horizontal_intent(player: &mut Player, left: bool, right: bool, config: &PhysicsConfig) {
    if player.is_dashing() {
        player.change_x = player.facing.sign() * config.dash_speed;
        return;
    }

    let speed = if player.crouching {
        config.player_speed * config.crouch_speed_factor
    } else {
        config.player_speed
    };

    if left {
        player.change_x = -speed;
        player.facing = Facing::Left;
    } else if right {
        player.change_x = speed;
        player.facing = Facing::Right;
    } else {
        player.change_x = 0.0;
    }
}

/// Jump if standing on something or if jumps remain.  Returns whether the
/// jump happened.
pub fn jump(player: &mut Player, platforms: &[Platform], config: &PhysicsConfig) -> bool {
    if player.crouching {
        return false;
    }
    let on_ground = is_grounded(&player.body, platforms, config.ground_check);
    if !on_ground && player.jump_count >= config.max_jumps {
        return false;
    }
    player.change_y = config.jump_impulse;
    player.jump_count = player.jump_count.saturating_add(1);
    player.grounded = false;
    true
}

/// Halve the body height, keeping the feet in place.  Not allowed mid-dash.
pub fn crouch(player: &mut Player) -> bool {
    if player.crouching || player.is_dashing() {
        return false;
    }
    let bottom = player.body.bottom();
    player.body.height = player.standing_height / 2.0;
    player.body.set_bottom(bottom);
    player.crouching = true;
    true
}

/// Return to full height unless a ceiling is in the way.  A blocked attempt
/// leaves the player untouched.
pub fn stand_up(player: &mut Player, platforms: &[Platform]) -> bool {
    if !player.crouching {
        return false;
    }
    let mut standing = player.body;
    standing.height = player.standing_height;
    standing.set_bottom(player.body.bottom());
    if hits_any(&standing, platforms) {
        return false;
    }
    player.body = standing;
    player.crouching = false;
    true
}

/// Start a dash in the facing direction.  Needs stamina, an elapsed
/// cooldown, and the player not to be crouching or already dashing.
pub fn start_dash(player: &mut Player, now: Duration, config: &PhysicsConfig) -> bool {
    if player.crouching || player.is_dashing() {
        return false;
    }
    if player.stamina < config.dash_stamina_cost {
        return false;
    }
    if let Some(last) = player.last_dash {
        if now.saturating_sub(last) < config.dash_cooldown() {
            return false;
        }
    }
    player.stamina -= config.dash_stamina_cost;
    player.dash_started = Some(now);
    player.last_dash = Some(now);
    player.change_x = player.facing.sign() * config.dash_speed;
    true
}

/// End the dash once its duration has passed.
pub fn update_dash(player: &mut Player, now: Duration, config: &PhysicsConfig) {
    if let Some(started) = player.dash_started {
        if now.saturating_sub(started) >= config.dash_duration() {
            player.dash_started = None;
        }
    }
}

pub fn regen_stamina(player: &mut Player, elapsed: Duration, config: &PlayerConfig) {
    let regained = config.stamina_regen * elapsed.as_secs_f32();
    player.stamina = (player.stamina + regained).min(player.max_stamina);
}
