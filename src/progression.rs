//! XP, levelling and stat points.

use crate::config::ProgressionConfig;
use crate::entities::{Player, Stat};

/// Add XP and apply every level-up it pays for.  Returns the number of
/// levels gained.
pub fn add_xp(player: &mut Player, amount: u32, config: &ProgressionConfig) -> u32 {
    let progression = &mut player.progression;
    progression.xp = progression.xp.saturating_add(amount);
    tracing::info!(
        amount,
        xp = progression.xp,
        next = progression.xp_to_next_level,
        "player gained xp"
    );

    let mut gained = 0;
    // A zero threshold would loop forever; treat it as "cannot level".
    while progression.xp_to_next_level > 0 && progression.xp >= progression.xp_to_next_level {
        progression.xp -= progression.xp_to_next_level;
        progression.level += 1;
        progression.xp_to_next_level = config.xp_per_level.saturating_mul(progression.level);
        progression.stat_points += config.stat_points_per_level;
        gained += 1;
        tracing::info!(level = progression.level, "level up");
    }
    gained
}

/// Spend one unspent stat point.  Returns false when none are left.
pub fn spend_stat_point(player: &mut Player, stat: Stat, config: &ProgressionConfig) -> bool {
    if player.progression.stat_points == 0 {
        return false;
    }
    player.progression.stat_points -= 1;
    match stat {
        Stat::Strength => player.stats.strength += 1,
        Stat::Vitality => {
            player.stats.vitality += 1;
            player.max_health += config.health_per_vitality;
            player.health += config.health_per_vitality;
        }
        Stat::Endurance => {
            player.stats.endurance += 1;
            player.max_stamina += config.stamina_per_endurance;
            player.stamina += config.stamina_per_endurance;
        }
    }
    true
}

/// `value / max` in `[0, 1]`, or 0 when `max` is not positive.
pub fn fraction(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

pub fn health_fraction(player: &Player) -> f32 {
    fraction(player.health as f32, player.effective_max_health() as f32)
}

pub fn stamina_fraction(player: &Player) -> f32 {
    fraction(player.stamina, player.max_stamina)
}

pub fn xp_fraction(player: &Player) -> f32 {
    fraction(player.progression.xp as f32, player.progression.xp_to_next_level as f32)
}
