/// All game entity types: plain data plus the small accessors every
/// system needs.  Behaviour lives in `physics`, `combat`, `patrol` and
/// `compute`.

use std::collections::HashSet;
use std::time::Duration;

use crate::camera::Camera;
use crate::config::{EnemyConfig, GameConfig};
use crate::geometry::{Body, Collidable};
use crate::level::Level;
use crate::loot::{Equipment, Inventory, Item, Quality};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Menu-selected difficulty; sets the base enemy modifier for every level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn base_modifier(self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub strength: u32,
    pub vitality: u32,
    pub endurance: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Strength,
    Vitality,
    Endurance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub stat_points: u32,
}

/// The live melee swing.  Owns the set of enemies it has already damaged.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackHitbox {
    pub body: Body,
    pub direction: Facing,
    pub created: Duration,
    pub duration: Duration,
    pub already_hit: HashSet<EnemyId>,
}

impl AttackHitbox {
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.created) >= self.duration
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub change_x: f32,
    pub change_y: f32,
    pub jump_count: u8,
    /// Set on the tick a downward collision zeroes the vertical velocity.
    pub grounded: bool,
    pub facing: Facing,
    pub crouching: bool,
    /// Start of the dash in progress.
    pub dash_started: Option<Duration>,
    /// Start of the most recent dash, for the cooldown.
    pub last_dash: Option<Duration>,
    pub health: i32,
    pub max_health: i32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub stats: Stats,
    pub progression: Progression,
    pub attack: Option<AttackHitbox>,
    /// Time of the last contact hit; drives the invincibility window.
    pub last_hit: Option<Duration>,
    pub inventory: Inventory,
    pub equipment: Equipment,
    /// Full standing height, restored when leaving a crouch.
    pub standing_height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        Player {
            body: Body::new(x, y, config.player.width, config.player.height),
            change_x: 0.0,
            change_y: 0.0,
            jump_count: 0,
            grounded: false,
            facing: Facing::Right,
            crouching: false,
            dash_started: None,
            last_dash: None,
            health: config.player.max_health,
            max_health: config.player.max_health,
            stamina: config.player.max_stamina,
            max_stamina: config.player.max_stamina,
            stats: Stats::default(),
            progression: Progression {
                level: 1,
                xp: 0,
                xp_to_next_level: config.progression.xp_per_level,
                stat_points: 0,
            },
            attack: None,
            last_hit: None,
            inventory: Inventory::new(config.loot.inventory_capacity),
            equipment: Equipment::default(),
            standing_height: config.player.height,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn is_invincible(&self, now: Duration, window: Duration) -> bool {
        self.last_hit
            .is_some_and(|hit| now.saturating_sub(hit) < window)
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_started.is_some()
    }

    /// Base max health plus equipment bonuses.
    pub fn effective_max_health(&self) -> i32 {
        self.max_health + self.equipment.max_health_bonus()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Collidable for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patrol {
    pub start: f32,
    pub range: f32,
    /// +1.0 or -1.0.
    pub direction: f32,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub patrol: Patrol,
    /// Fixed at spawn.
    pub difficulty: f32,
    pub xp_reward: (u32, u32),
}

impl Enemy {
    /// Spawn an enemy standing on `floor_y`, patrolling `range` units to the
    /// right of `x`.  The difficulty modifier scales health, damage and XP.
    pub fn spawn(id: EnemyId, x: f32, floor_y: f32, range: f32, difficulty: f32, config: &EnemyConfig) -> Self {
        let scale = |v: i32| ((v as f32 * difficulty).round() as i32).max(1);
        let max_health = scale(config.base_health);
        let (lo, hi) = config.xp_reward;
        Enemy {
            id,
            body: Body::new(x, floor_y - config.height, config.width, config.height),
            health: max_health,
            max_health,
            damage: scale(config.base_damage),
            patrol: Patrol {
                start: x,
                range: range.max(0.0),
                direction: 1.0,
                speed: config.speed,
            },
            difficulty,
            xp_reward: (
                (lo as f32 * difficulty).round() as u32,
                (hi as f32 * difficulty).round() as u32,
            ),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Collidable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }
}

// ── Static geometry & props ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    pub body: Body,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Platform {
            body: Body::new(x, y, width, height),
        }
    }
}

impl Collidable for Platform {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// A dropped item waiting in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemPickup {
    pub body: Body,
    pub item: Item,
}

pub const PICKUP_SIZE: f32 = 16.0;

impl ItemPickup {
    /// Drop an item centred on `(x, y)`.
    pub fn at(x: f32, y: f32, item: Item) -> Self {
        ItemPickup {
            body: Body::new(x - PICKUP_SIZE / 2.0, y - PICKUP_SIZE / 2.0, PICKUP_SIZE, PICKUP_SIZE),
            item,
        }
    }
}

impl Collidable for ItemPickup {
    fn body(&self) -> &Body {
        &self.body
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Chest { opened: bool },
    Campfire { used: bool },
    Portal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldObject {
    pub body: Body,
    pub kind: ObjectKind,
}

pub const CHEST_HEIGHT: f32 = 40.0;

impl WorldObject {
    pub fn chest(x: f32, floor_y: f32) -> Self {
        WorldObject {
            body: Body::new(x, floor_y - CHEST_HEIGHT, 50.0, CHEST_HEIGHT),
            kind: ObjectKind::Chest { opened: false },
        }
    }

    pub fn campfire(x: f32, floor_y: f32) -> Self {
        WorldObject {
            body: Body::new(x, floor_y - 50.0, 50.0, 50.0),
            kind: ObjectKind::Campfire { used: false },
        }
    }

    pub fn portal(x: f32, floor_y: f32) -> Self {
        WorldObject {
            body: Body::new(x, floor_y - 60.0, 40.0, 60.0),
            kind: ObjectKind::Portal,
        }
    }
}

impl Collidable for WorldObject {
    fn body(&self) -> &Body {
        &self.body
    }
}

// ── Render hand-off ──────────────────────────────────────────────────────────

/// What the renderer should draw for a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteId {
    Player { facing: Facing, invincible: bool },
    Enemy,
    Platform,
    Attack(Facing),
    Pickup(Quality),
    Chest { opened: bool },
    Campfire { used: bool },
    Portal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    /// World-space body; translate with the camera before drawing.
    pub body: Body,
    pub sprite: SpriteId,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so the per-tick update can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub level: Level,
    pub camera: Camera,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    pub frame: u64,
    /// Timestamp handed to the previous tick.
    pub last_tick: Option<Duration>,
    pub kills: u32,
    /// Short feed of recent events for the HUD, newest last.
    pub messages: Vec<String>,
}

pub const MESSAGE_LOG_LEN: usize = 4;

impl GameState {
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > MESSAGE_LOG_LEN {
            let excess = self.messages.len() - MESSAGE_LOG_LEN;
            self.messages.drain(..excess);
        }
    }
}
