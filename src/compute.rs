/// Pure game-logic entry points.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new `GameState`.  Time, configuration and
/// randomness are passed in by the caller, so a seeded RNG and hand-picked
/// timestamps replay a session exactly.

use std::time::Duration;

use rand::Rng;

use crate::camera::Camera;
use crate::combat;
use crate::config::GameConfig;
use crate::entities::{Difficulty, GameState, GameStatus, ObjectKind, Player, Renderable, SpriteId, Stat};
use crate::level::Level;
use crate::loot::{Effect, ItemKind};
use crate::objects::{self, Interaction};
use crate::patrol;
use crate::physics;
use crate::progression;

/// Input for one tick: held keys plus one-shot presses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
    pub jump: bool,
    pub attack: bool,
    pub interact: bool,
    pub dash: bool,
    /// Inventory slot to use this tick.
    pub use_slot: Option<usize>,
    pub spend_point: Option<Stat>,
}

/// Everything a tick needs besides the state and the RNG.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// Monotonic time since the session started.
    pub now: Duration,
    pub config: &'a GameConfig,
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn state_for_level(level: Level, difficulty: Difficulty, screen: (f32, f32), config: &GameConfig) -> GameState {
    let (sx, sy) = level.spawn;
    let player = Player::new(sx, sy, config);
    let mut camera = Camera::new(level.width, level.height, screen.0, screen.1);
    camera.follow(&player.body);

    GameState {
        player,
        level,
        camera,
        difficulty,
        status: GameStatus::Playing,
        frame: 0,
        last_tick: None,
        kills: 0,
        messages: Vec::new(),
    }
}

/// Start a run on the hand-built first level.
pub fn init_state(difficulty: Difficulty, screen_width: f32, screen_height: f32, config: &GameConfig) -> GameState {
    let level = Level::default_layout(difficulty, config);
    state_for_level(level, difficulty, (screen_width, screen_height), config)
}

/// Generate the level at `depth`.  A valid config always yields a valid
/// level; a hand-edited one that slips through is reported, not fatal.
fn generated_level(depth: u32, difficulty: Difficulty, rng: &mut impl Rng, config: &GameConfig) -> Level {
    let level = Level::generate(depth, difficulty, rng, config);
    if let Err(err) = level.validate() {
        tracing::warn!(%err, depth, "generated level failed validation");
    }
    level
}

/// Start a run on a generated first level.
pub fn init_generated(
    difficulty: Difficulty,
    screen_width: f32,
    screen_height: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    let level = generated_level(1, difficulty, rng, config);
    state_for_level(level, difficulty, (screen_width, screen_height), config)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn apply_consumable(player: &mut Player, effect: Effect) {
    match effect {
        Effect::Heal(amount) => {
            player.health = (player.health + amount).min(player.effective_max_health());
        }
        Effect::RestoreStamina(amount) => {
            player.stamina = (player.stamina + amount as f32).min(player.max_stamina);
        }
    }
}

fn use_item_in_place(state: &mut GameState, index: usize) {
    let player = &mut state.player;
    let Some(item) = player.inventory.remove(index) else {
        return;
    };
    let label = item.to_string();

    match item.kind {
        ItemKind::Consumable(effect) => {
            apply_consumable(player, effect);
            state.push_message(format!("Used {label}"));
        }
        ItemKind::Equipment { .. } => {
            if let Some(previous) = player.equipment.equip(item) {
                // The slot we just emptied guarantees room.
                if let Err(lost) = player.inventory.add(previous) {
                    tracing::warn!(item = %lost, "no room for unequipped item");
                }
            }
            player.health = player.health.min(player.effective_max_health());
            state.push_message(format!("Equipped {label}"));
        }
    }
}

/// Use the inventory entry at `index`: drink a consumable or equip gear.
pub fn use_item(state: &GameState, index: usize) -> GameState {
    let mut next = state.clone();
    use_item_in_place(&mut next, index);
    next
}

/// Spend one stat point.
pub fn spend_stat_point(state: &GameState, stat: Stat, config: &GameConfig) -> GameState {
    let mut next = state.clone();
    progression::spend_stat_point(&mut next.player, stat, &config.progression);
    next
}

/// Replace the level with the next generated one and put the player at its
/// spawn point.
fn enter_next_level(state: &mut GameState, rng: &mut impl Rng, config: &GameConfig) {
    let depth = state.level.depth + 1;
    let level = generated_level(depth, state.difficulty, rng, config);

    let (sx, sy) = level.spawn;
    let player = &mut state.player;
    if player.crouching {
        player.body.height = player.standing_height;
        player.crouching = false;
    }
    player.body.x = sx;
    player.body.y = sy;
    player.change_x = 0.0;
    player.change_y = 0.0;
    player.attack = None;

    state.camera = Camera::new(level.width, level.height, state.camera.screen_width, state.camera.screen_height);
    state.level = level;
    state.push_message(format!("Entered depth {depth}"));
    tracing::info!(depth, "entered portal");
}

fn apply_input(state: &mut GameState, input: &TickInput, ctx: &TickContext<'_>, rng: &mut impl Rng) {
    let config = ctx.config;
    let now = ctx.now;

    if let Some(stat) = input.spend_point {
        progression::spend_stat_point(&mut state.player, stat, &config.progression);
    }
    if let Some(index) = input.use_slot {
        use_item_in_place(state, index);
    }

    let player = &mut state.player;
    let platforms = &state.level.platforms;

    physics::update_dash(player, now, &config.physics);
    if input.crouch {
        physics::crouch(player);
    } else if player.crouching {
        physics::stand_up(player, platforms);
    }
    if input.dash {
        physics::start_dash(player, now, &config.physics);
    }
    physics::set_horizontal_intent(player, input.left, input.right, &config.physics);
    if input.jump {
        physics::jump(player, platforms, &config.physics);
    }
    if input.attack {
        combat::start_attack(player, now, &config.combat);
    }

    if input.interact {
        match objects::interact(&mut state.player, &mut state.level, rng, config) {
            Interaction::ChestOpened(names) => {
                state.push_message(format!("Chest held {} items", names.len()));
            }
            Interaction::CampfireRested => state.push_message("Rested at the campfire"),
            Interaction::Portal => enter_next_level(state, rng, config),
            Interaction::Nothing | Interaction::ChestEmpty | Interaction::CampfireSpent => {}
        }
    }
}

// ── Per-frame tick (RNG is injected) ──────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Order: input → timers → physics → patrol → swing → contact → pickups →
/// camera.  Everything happens in world coordinates; the camera only
/// changes how the result is drawn.
pub fn tick(state: &GameState, input: &TickInput, ctx: &TickContext<'_>, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let config = ctx.config;
    let now = ctx.now;
    let mut s = state.clone();
    s.frame += 1;
    let elapsed = s.last_tick.map(|t| now.saturating_sub(t)).unwrap_or_default();
    s.last_tick = Some(now);

    // ── 1. Input ─────────────────────────────────────────────────────────────
    apply_input(&mut s, input, ctx, rng);

    // ── 2. Timers ────────────────────────────────────────────────────────────
    physics::regen_stamina(&mut s.player, elapsed, &config.player);

    // ── 3. Physics ───────────────────────────────────────────────────────────
    physics::step(&mut s.player, &s.level.platforms, &config.physics);
    physics::clamp_to_level(&mut s.player, s.level.width);
    if s.player.body.top() > s.level.height {
        tracing::info!(frame = s.frame, "player fell out of the level");
        s.player.health = 0;
    }

    // ── 4. Enemy patrol ──────────────────────────────────────────────────────
    patrol::step_all(&mut s.level.enemies);

    // ── 5. Swing vs. enemies ─────────────────────────────────────────────────
    let defeats = combat::resolve_attack(&mut s.player, &mut s.level, now, config, rng);
    for defeat in defeats {
        s.kills += 1;
        s.push_message(format!("+{} XP", defeat.xp));
        if defeat.levels_gained > 0 {
            s.push_message(format!("Ding! Level {}", s.player.progression.level));
        }
        if let Some(name) = defeat.drop {
            s.push_message(format!("Dropped {name}"));
        }
    }

    // ── 6. Enemy contact ─────────────────────────────────────────────────────
    combat::resolve_contact(&mut s.player, &s.level.enemies, now, &config.combat);

    // ── 7. Pickups ───────────────────────────────────────────────────────────
    for name in objects::collect_pickups(&mut s.player, &mut s.level) {
        s.push_message(format!("Picked up {name}"));
    }

    // ── 8. Camera & status ───────────────────────────────────────────────────
    s.camera.follow(&s.player.body);

    if s.player.is_dead() {
        tracing::info!(kills = s.kills, level = s.player.progression.level, "game over");
        s.status = GameStatus::GameOver;
    }
    s
}

// ── Render hand-off ──────────────────────────────────────────────────────────

/// Bodies inside the camera view, back to front.  Positions stay in world
/// space; the renderer applies the camera offset.
pub fn visible_bodies(state: &GameState, ctx: &TickContext<'_>) -> Vec<Renderable> {
    let view = state.camera.view();
    let level = &state.level;
    let player = &state.player;

    let mut out: Vec<Renderable> = Vec::new();
    out.extend(level.platforms.iter().map(|p| Renderable {
        body: p.body,
        sprite: SpriteId::Platform,
    }));
    out.extend(level.objects.iter().map(|o| Renderable {
        body: o.body,
        sprite: match o.kind {
            ObjectKind::Chest { opened } => SpriteId::Chest { opened },
            ObjectKind::Campfire { used } => SpriteId::Campfire { used },
            ObjectKind::Portal => SpriteId::Portal,
        },
    }));
    out.extend(level.pickups.iter().map(|p| Renderable {
        body: p.body,
        sprite: SpriteId::Pickup(p.item.quality),
    }));
    out.extend(level.enemies.iter().map(|e| Renderable {
        body: e.body,
        sprite: SpriteId::Enemy,
    }));
    if let Some(attack) = &player.attack {
        out.push(Renderable {
            body: attack.body,
            sprite: SpriteId::Attack(attack.direction),
        });
    }
    out.retain(|r| r.body.overlaps(&view));

    out.push(Renderable {
        body: player.body,
        sprite: SpriteId::Player {
            facing: player.facing,
            invincible: player.is_invincible(ctx.now, ctx.config.combat.invincibility()),
        },
    });
    out
}
