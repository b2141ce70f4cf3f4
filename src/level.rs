//! Level contents, bounds checking and procedural generation.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Difficulty, Enemy, EnemyId, ItemPickup, Platform, WorldObject, CHEST_HEIGHT};
use crate::error::LevelError;
use crate::geometry::Body;

/// Lowest a generated floating platform sits above the ground.
pub const MIN_PLATFORM_LIFT: f32 = 90.0;
const MAX_PLATFORM_LIFT: f32 = 300.0;

/// Highest a generated floating platform may sit above the ground: still
/// within jump reach, and low enough that the player, an enemy or a chest
/// standing on it stays inside the level.
pub fn max_platform_lift(config: &GameConfig) -> f32 {
    let lc = &config.level;
    let ground_top = lc.height - lc.ground_height;
    let tallest = config.player.height.max(config.enemy.height).max(CHEST_HEIGHT);
    let headroom = ground_top - tallest;
    let reach = config.physics.jump_reach().floor() - 1.0;
    MAX_PLATFORM_LIFT.min(reach).min(headroom)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    /// 1-based index of this level in the run.
    pub depth: u32,
    pub width: f32,
    pub height: f32,
    /// Top-left corner for the player on entry.
    pub spawn: (f32, f32),
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<ItemPickup>,
    pub objects: Vec<WorldObject>,
    next_enemy_id: u32,
}

impl Level {
    pub fn new(depth: u32, width: f32, height: f32, spawn: (f32, f32)) -> Self {
        Level {
            depth,
            width,
            height,
            spawn,
            platforms: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            objects: Vec::new(),
            next_enemy_id: 0,
        }
    }

    pub fn bounds(&self) -> Body {
        Body::new(0.0, 0.0, self.width, self.height)
    }

    pub fn add_platform(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.platforms.push(Platform::new(x, y, width, height));
        self
    }

    /// Place an enemy on `floor_y` and hand out the next id.
    pub fn spawn_enemy(&mut self, x: f32, floor_y: f32, range: f32, difficulty: f32, config: &GameConfig) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::spawn(id, x, floor_y, range, difficulty, &config.enemy));
        id
    }

    /// Enemy difficulty modifier for this depth.
    pub fn enemy_modifier(depth: u32, difficulty: Difficulty, config: &GameConfig) -> f32 {
        let depth_bonus = config.level.depth_scaling * depth.saturating_sub(1) as f32;
        difficulty.base_modifier() * (1.0 + depth_bonus)
    }

    /// The hand-built first level: a 2000-wide ground with six floating
    /// platforms.
    pub fn default_layout(difficulty: Difficulty, config: &GameConfig) -> Self {
        // [width, height, x, y]
        const LAYOUT: [[f32; 4]; 7] = [
            [2000.0, 30.0, 0.0, 570.0],
            [300.0, 30.0, 200.0, 450.0],
            [250.0, 30.0, 550.0, 350.0],
            [200.0, 30.0, 850.0, 250.0],
            [300.0, 30.0, 1100.0, 350.0],
            [150.0, 30.0, 1450.0, 450.0],
            [200.0, 30.0, 1700.0, 350.0],
        ];

        let width = LAYOUT.iter().map(|[w, _, x, _]| x + w).fold(0.0, f32::max);
        let height = LAYOUT.iter().map(|[_, h, _, y]| y + h).fold(0.0, f32::max);
        let mut level = Level::new(1, width, height, (400.0, 570.0 - config.player.height));

        for [w, h, x, y] in LAYOUT {
            level.add_platform(x, y, w, h);
        }

        let modifier = Level::enemy_modifier(1, difficulty, config);
        let enemy_w = config.enemy.width;
        for &[w, _, x, y] in &LAYOUT[2..] {
            level.spawn_enemy(x, y, w - enemy_w, modifier, config);
        }
        level.spawn_enemy(700.0, 570.0, 250.0, modifier, config);

        level.objects.push(WorldObject::chest(325.0, 450.0));
        level.objects.push(WorldObject::campfire(1000.0, 570.0));
        level.objects.push(WorldObject::portal(1920.0, 570.0));
        level
    }

    /// Build a random level.  Floating platforms are laid out left to right
    /// with a gap between each, so they can never overlap one another or
    /// the ground.
    pub fn generate(depth: u32, difficulty: Difficulty, rng: &mut impl Rng, config: &GameConfig) -> Self {
        let lc = &config.level;
        let depth = depth.max(1);
        let width = lc.base_width + lc.width_per_depth * (depth - 1) as f32;
        let ground_top = lc.height - lc.ground_height;
        let spawn = (50.0, ground_top - config.player.height);

        let mut level = Level::new(depth, width, lc.height, spawn);
        level.add_platform(0.0, ground_top, width, lc.ground_height);

        let modifier = Level::enemy_modifier(depth, difficulty, config);
        let enemy_w = config.enemy.width;

        // Floating platforms, one enemy each.  None when the level is too
        // short to fit one.
        let max_lift = max_platform_lift(config);
        let mut cursor = 200.0;
        let right_margin = 200.0;
        while max_lift >= MIN_PLATFORM_LIFT {
            let w = rng.gen_range(150..=300) as f32;
            if cursor + w > width - right_margin {
                break;
            }
            let lift = rng.gen_range(MIN_PLATFORM_LIFT as i32..=max_lift.floor() as i32) as f32;
            let y = ground_top - lift;
            level.add_platform(cursor, y, w, lc.platform_height);
            level.spawn_enemy(cursor, y, w - enemy_w, modifier, config);
            cursor += w + rng.gen_range(50..=150) as f32;
        }

        // Ground patrols, more of them deeper down.
        let ground_enemies = depth + 1;
        for _ in 0..ground_enemies {
            let range = rng.gen_range(150..=300) as f32;
            let max_start = width - right_margin - range - enemy_w;
            if max_start <= 400.0 {
                break;
            }
            let x = rng.gen_range(400.0..max_start);
            level.spawn_enemy(x, ground_top, range, modifier, config);
        }

        // Props: a chest on a random floating platform, a campfire mid-way,
        // the portal at the far end.
        let floating = &level.platforms[1..];
        if !floating.is_empty() {
            let p = floating[rng.gen_range(0..floating.len())].body;
            let chest = WorldObject::chest(p.x + (p.width - 50.0) / 2.0, p.top());
            level.objects.push(chest);
        }
        level.objects.push(WorldObject::campfire(width / 2.0, ground_top));
        level.objects.push(WorldObject::portal(width - 80.0, ground_top));

        tracing::info!(
            depth,
            width,
            platforms = level.platforms.len(),
            enemies = level.enemies.len(),
            "level generated"
        );
        level
    }

    /// Check that platforms are disjoint and everything sits inside the level.
    pub fn validate(&self) -> Result<(), LevelError> {
        for (i, a) in self.platforms.iter().enumerate() {
            for (j, b) in self.platforms.iter().enumerate().skip(i + 1) {
                if a.body.overlaps(&b.body) {
                    return Err(LevelError::Overlap { first: i, second: j });
                }
            }
        }

        let bounds = self.bounds();
        let out_of_bounds = |what: String| LevelError::OutOfBounds {
            what,
            width: self.width,
            height: self.height,
        };

        for (i, p) in self.platforms.iter().enumerate() {
            if !bounds.contains(&p.body) {
                return Err(out_of_bounds(format!("platform {i}")));
            }
        }
        for e in &self.enemies {
            // Whole patrol sweep, not just the current position.
            let sweep = Body::new(e.patrol.start, e.body.y, e.patrol.range + e.body.width, e.body.height);
            if !bounds.contains(&sweep) {
                return Err(out_of_bounds(format!("enemy {}", e.id.0)));
            }
        }
        for (i, o) in self.objects.iter().enumerate() {
            if !bounds.contains(&o.body) {
                return Err(out_of_bounds(format!("object {i}")));
            }
        }
        Ok(())
    }
}
