//! Tunable gameplay constants.
//!
//! Every section deserialises with `#[serde(default)]`, so a RON file only
//! has to name the values it overrides:
//!
//! ```ron
//! (
//!     physics: (gravity: 0.5),
//!     loot: (drop_chance: 0.25),
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Body;
use crate::level::{max_platform_lift, MIN_PLATFORM_LIFT};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GLITCHBORN_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "glitchborn.ron";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub enemy: EnemyConfig,
    pub progression: ProgressionConfig,
    pub loot: LootConfig,
    pub level: LevelConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Vertical speed assigned on the first tick of a fall.
    pub base_fall_speed: f32,
    pub terminal_velocity: f32,
    pub jump_impulse: f32,
    pub max_jumps: u8,
    /// How far below the feet the grounded check looks.
    pub ground_check: f32,
    pub player_speed: f32,
    pub crouch_speed_factor: f32,
    pub dash_speed: f32,
    pub dash_duration_ms: u64,
    pub dash_cooldown_ms: u64,
    pub dash_stamina_cost: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.35,
            base_fall_speed: 1.0,
            terminal_velocity: 15.0,
            jump_impulse: -10.0,
            max_jumps: 2,
            ground_check: 2.0,
            player_speed: 5.0,
            crouch_speed_factor: 0.5,
            dash_speed: 15.0,
            dash_duration_ms: 150,
            dash_cooldown_ms: 600,
            dash_stamina_cost: 20.0,
        }
    }
}

impl PhysicsConfig {
    pub fn dash_duration(&self) -> Duration {
        Duration::from_millis(self.dash_duration_ms)
    }

    pub fn dash_cooldown(&self) -> Duration {
        Duration::from_millis(self.dash_cooldown_ms)
    }

    /// Height one jump gains before falling, integrated the way
    /// `physics::step` does it: gravity first, then the move.
    pub fn jump_height(&self) -> f32 {
        if !(self.gravity > 0.0) || self.jump_impulse >= 0.0 {
            return 0.0;
        }
        let v0 = -self.jump_impulse;
        // Ticks that still move upward: v0 - k * gravity > 0
        let ticks = ((v0 / self.gravity).ceil() - 1.0).max(0.0);
        ticks * v0 - self.gravity * ticks * (ticks + 1.0) / 2.0
    }

    /// Highest the feet get with every jump spent at its apex.
    pub fn jump_reach(&self) -> f32 {
        self.jump_height() * f32::from(self.max_jumps)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    pub max_stamina: f32,
    /// Stamina regained per second of wall-clock time.
    pub stamina_regen: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            max_health: 100,
            max_stamina: 100.0,
            stamina_regen: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub attack_width: f32,
    pub attack_duration_ms: u64,
    pub base_damage: i32,
    /// Extra damage per point of strength.
    pub strength_multiplier: f32,
    pub invincibility_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_width: 60.0,
            attack_duration_ms: 250,
            base_damage: 25,
            strength_multiplier: 2.5,
            invincibility_ms: 1000,
        }
    }
}

impl CombatConfig {
    pub fn attack_duration(&self) -> Duration {
        Duration::from_millis(self.attack_duration_ms)
    }

    pub fn invincibility(&self) -> Duration {
        Duration::from_millis(self.invincibility_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub base_health: i32,
    pub base_damage: i32,
    pub speed: f32,
    pub xp_reward: (u32, u32),
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            base_health: 30,
            base_damage: 10,
            speed: 2.0,
            xp_reward: (20, 30),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP needed per level: `xp_per_level * level`.
    pub xp_per_level: u32,
    pub stat_points_per_level: u32,
    pub health_per_vitality: i32,
    pub stamina_per_endurance: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            stat_points_per_level: 3,
            health_per_vitality: 10,
            stamina_per_endurance: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub drop_chance: f64,
    pub equipment_chance: f64,
    pub chest_items: (u32, u32),
    pub inventory_capacity: usize,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            drop_chance: 0.5,
            equipment_chance: 0.7,
            chest_items: (3, 5),
            inventory_capacity: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub base_width: f32,
    /// Extra level width per depth beyond the first.
    pub width_per_depth: f32,
    pub height: f32,
    pub ground_height: f32,
    pub platform_height: f32,
    /// Growth of the enemy difficulty modifier per depth.
    pub depth_scaling: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            base_width: 2000.0,
            width_per_depth: 400.0,
            height: 600.0,
            ground_height: 30.0,
            platform_height: 30.0,
            depth_scaling: 0.25,
        }
    }
}

impl GameConfig {
    /// Resolve the config source: `$GLITCHBORN_CONFIG`, then `./glitchborn.ron`,
    /// then the built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(PathBuf::from(path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_path(local);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (what, width, height) in [
            ("player", self.player.width, self.player.height),
            ("enemy", self.enemy.width, self.enemy.height),
        ] {
            Body::try_new(0.0, 0.0, width, height).map_err(|source| ConfigError::Geometry { what, source })?;
        }

        let positive = [
            ("combat.attack_width", self.combat.attack_width),
            ("level.height", self.level.height),
            ("level.base_width", self.level.base_width),
            ("level.ground_height", self.level.ground_height),
            ("level.platform_height", self.level.platform_height),
            ("physics.terminal_velocity", self.physics.terminal_velocity),
            ("physics.gravity", self.physics.gravity),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(format!("{name} must be positive, got {value}")));
            }
        }

        for (name, p) in [
            ("loot.drop_chance", self.loot.drop_chance),
            ("loot.equipment_chance", self.loot.equipment_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(format!("{name} must be within 0..=1, got {p}")));
            }
        }

        let (lo, hi) = self.enemy.xp_reward;
        if lo > hi {
            return Err(ConfigError::invalid(format!("enemy.xp_reward range {lo}..={hi} is inverted")));
        }
        let (lo, hi) = self.loot.chest_items;
        if lo > hi {
            return Err(ConfigError::invalid(format!("loot.chest_items range {lo}..={hi} is inverted")));
        }

        // A fall faster than the thinnest platform could skip it in one tick.
        let thinnest = self.level.platform_height.min(self.level.ground_height);
        if self.physics.terminal_velocity >= thinnest {
            return Err(ConfigError::invalid(format!(
                "physics.terminal_velocity ({}) must stay below the thinnest platform ({thinnest})",
                self.physics.terminal_velocity
            )));
        }

        if self.physics.max_jumps == 0 {
            return Err(ConfigError::invalid("physics.max_jumps must be at least 1"));
        }

        let max_lift = max_platform_lift(self);
        if max_lift < MIN_PLATFORM_LIFT {
            return Err(ConfigError::invalid(format!(
                "level.height ({}) and jump reach leave room for platforms only {max_lift} above the ground, \
                 need at least {MIN_PLATFORM_LIFT}",
                self.level.height
            )));
        }

        if self.progression.xp_per_level == 0 {
            return Err(ConfigError::invalid("progression.xp_per_level must be non-zero"));
        }
        Ok(())
    }
}
