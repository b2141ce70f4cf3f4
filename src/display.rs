/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world bodies into character cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glitchborn::camera::Camera;
use glitchborn::entities::{Difficulty, Facing, GameState, GameStatus, Renderable, SpriteId};
use glitchborn::geometry::Body;
use glitchborn::progression;

/// World units per terminal column / row.
pub const CELL_W: f32 = 10.0;
pub const CELL_H: f32 = 20.0;

/// Rows taken by the HUD, the top border, the bottom border and the hint line.
const PLAY_TOP: u16 = 2;
const RESERVED_ROWS: u16 = 4;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_STAMINA: Color = Color::Green;
const C_HUD_XP: Color = Color::Blue;
const C_HUD_TEXT: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::DarkGrey;
const C_ENEMY: Color = Color::Red;
const C_PLATFORM: Color = Color::Green;
const C_ATTACK: Color = Color::Yellow;
const C_CHEST_CLOSED: Color = Color::Rgb { r: 139, g: 69, b: 19 };
const C_CHEST_OPEN: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const C_CAMPFIRE_LIT: Color = Color::Rgb { r: 255, g: 100, b: 0 };
const C_CAMPFIRE_UNLIT: Color = Color::Rgb { r: 100, g: 100, b: 100 };
const C_PORTAL: Color = Color::Rgb { r: 128, g: 0, b: 128 };
const C_HINT: Color = Color::DarkGrey;
const C_MESSAGE: Color = Color::Yellow;

/// Size of the play area in world units for a terminal of `cols` × `rows`.
pub fn screen_size(cols: u16, rows: u16) -> (f32, f32) {
    let w = cols.saturating_sub(2).max(1) as f32 * CELL_W;
    let h = rows.saturating_sub(RESERVED_ROWS).max(1) as f32 * CELL_H;
    (w, h)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    bodies: &[Renderable],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, state, cols)?;

    for renderable in bodies {
        draw_body(out, &state.camera, renderable, cols, rows)?;
    }

    draw_controls_hint(out, state, rows)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, cols, rows)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in PLAY_TOP..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn bar(fill: f32, width: usize) -> String {
    let filled = (fill * width as f32).round() as usize;
    format!("{}{}", "█".repeat(filled.min(width)), "░".repeat(width.saturating_sub(filled)))
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    let p = &state.player;
    out.queue(cursor::MoveTo(1, 0))?;

    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!(
        "HP {} {:>3}/{:<3} ",
        bar(progression::health_fraction(p), 10),
        p.health.max(0),
        p.effective_max_health()
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_STAMINA))?;
    out.queue(Print(format!("ST {} ", bar(progression::stamina_fraction(p), 8))))?;

    out.queue(style::SetForegroundColor(C_HUD_XP))?;
    out.queue(Print(format!("XP {} ", bar(progression::xp_fraction(p), 8))))?;

    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    let points = if p.progression.stat_points > 0 {
        format!(" +{}pts", p.progression.stat_points)
    } else {
        String::new()
    };
    out.queue(Print(format!(
        "Lv{}{}  Bag {}/{}",
        p.progression.level,
        points,
        p.inventory.items.len(),
        p.inventory.capacity
    )))?;

    // Depth and difficulty, right side
    let difficulty = match state.difficulty {
        Difficulty::Easy => "EASY",
        Difficulty::Medium => "MEDIUM",
        Difficulty::Hard => "HARD",
    };
    let right = format!("[ {} · depth {} ]", difficulty, state.level.depth);
    let rx = cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn sprite_style(sprite: SpriteId) -> (&'static str, Color) {
    match sprite {
        SpriteId::Player { invincible, .. } => ("@", if invincible { C_PLAYER_HURT } else { C_PLAYER }),
        SpriteId::Enemy => ("M", C_ENEMY),
        SpriteId::Platform => ("█", C_PLATFORM),
        SpriteId::Attack(Facing::Right) => ("»", C_ATTACK),
        SpriteId::Attack(Facing::Left) => ("«", C_ATTACK),
        SpriteId::Pickup(quality) => {
            let (r, g, b) = quality.info().color;
            ("*", Color::Rgb { r, g, b })
        }
        SpriteId::Chest { opened: false } => ("▣", C_CHEST_CLOSED),
        SpriteId::Chest { opened: true } => ("□", C_CHEST_OPEN),
        SpriteId::Campfire { used: false } => ("^", C_CAMPFIRE_LIT),
        SpriteId::Campfire { used: true } => ("_", C_CAMPFIRE_UNLIT),
        SpriteId::Portal => ("◊", C_PORTAL),
    }
}

/// Cell span `[first, last]` covered by `[lo, hi)` in world units, or
/// `None` when it falls outside `0..limit`.
fn cell_span(lo: f32, hi: f32, cell: f32, limit: u16) -> Option<(u16, u16)> {
    let first = (lo / cell).floor().max(0.0);
    let last = ((hi / cell).ceil() - 1.0).min(limit as f32 - 1.0);
    if last < first || limit == 0 {
        return None;
    }
    Some((first as u16, last as u16))
}

fn draw_body<W: Write>(
    out: &mut W,
    camera: &Camera,
    renderable: &Renderable,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let screen: Body = camera.apply(&renderable.body);
    let play_cols = cols.saturating_sub(2);
    let play_rows = rows.saturating_sub(RESERVED_ROWS);

    let Some((c0, c1)) = cell_span(screen.left(), screen.right(), CELL_W, play_cols) else {
        return Ok(());
    };
    let Some((r0, r1)) = cell_span(screen.top(), screen.bottom(), CELL_H, play_rows) else {
        return Ok(());
    };

    let (glyph, color) = sprite_style(renderable.sprite);
    out.queue(style::SetForegroundColor(color))?;
    let line = glyph.repeat((c1 - c0 + 1) as usize);
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(1 + c0, PLAY_TOP + row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint + message feed (last row) ──────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("A D:Move W:Jump S:Crouch J:Attack K:Dash E:Use 1-9:Item Q:Quit  "))?;
    if let Some(message) = state.messages.last() {
        out.queue(style::SetForegroundColor(C_MESSAGE))?;
        out.queue(Print(message))?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, cols: u16, rows: u16) -> std::io::Result<()> {
    let summary = format!(
        "Level {}  ·  Depth {}  ·  {} kills",
        state.player.progression.level, state.level.depth, state.kills
    );

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    YOU  DIED       ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let cx = cols / 2;
    let total_rows = lines.len() + 2;
    let start_row = (rows / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let summary_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(summary.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, summary_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&summary))?;

    let hint = "R - Play Again  Q - Quit";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, summary_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
