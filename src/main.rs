mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use glitchborn::compute::{init_state, tick, visible_bodies, TickContext, TickInput};
use glitchborn::config::GameConfig;
use glitchborn::entities::{Difficulty, GameState, GameStatus, Stat};

/// 60 Hz fixed step.
const FRAME: Duration = Duration::from_micros(16_667);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// 8 frames @ 60 FPS ≈ 133 ms, refreshed by the OS key-repeat.
const HOLD_WINDOW: u64 = 8;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to `logs/glitchborn.log` so tracing output never lands on the game
/// screen.  Keep the guard alive until exit or buffered lines are lost.
fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "glitchborn.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .init();

    guard
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Difficulty),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "▓▒░  GLITCHBORN  ░▒▓";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Magenta))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green,  "Weaker enemies"),
        ("2", "Medium", Color::Yellow, "As intended"),
        ("3", "Hard  ", Color::Red,    "Tougher enemies, better loot"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    let help: &[&str] = &[
        "A D : Move   W / SPACE : Jump (twice in the air)   S : Crouch",
        "J : Attack   K : Dash   E : Chest / Campfire / Portal",
        "1-9 : Use item   Z X C : Spend point on STR / VIT / END",
    ];
    for (i, line) in help.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 4 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*line))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Difficulty::Easy)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Difficulty::Medium)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Difficulty::Hard)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Map a one-shot key press onto the tick input.
fn press_into(input: &mut TickInput, code: &KeyCode) {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char(' ') | KeyCode::Up => input.jump = true,
        KeyCode::Char('j') | KeyCode::Char('J') => input.attack = true,
        KeyCode::Char('k') | KeyCode::Char('K') => input.dash = true,
        KeyCode::Char('e') | KeyCode::Char('E') => input.interact = true,
        KeyCode::Char('z') | KeyCode::Char('Z') => input.spend_point = Some(Stat::Strength),
        KeyCode::Char('x') | KeyCode::Char('X') => input.spend_point = Some(Stat::Vitality),
        KeyCode::Char('c') | KeyCode::Char('C') => input.spend_point = Some(Stat::Endurance),
        KeyCode::Char(d @ '1'..='9') => {
            input.use_slot = d.to_digit(10).map(|n| n as usize - 1);
        }
        _ => {}
    }
}

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Held keys (move, crouch) use the `key_frame` map: the frame of the last
/// press/repeat event per key, considered live for `HOLD_WINDOW` frames or
/// until a release event arrives.  One-shot actions fire on `Press` only.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let session_start = Instant::now();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut term_size = terminal::size()?;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = TickInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.status == GameStatus::GameOver =>
                            {
                                return Ok(false);
                            }
                            _ => press_into(&mut input, &code),
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => term_size = (cols, rows),
                _ => {}
            }
        }

        // ── Held keys ─────────────────────────────────────────────────────────
        input.left = is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        input.right = is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        input.crouch = is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);

        let (cols, rows) = term_size;
        let (screen_w, screen_h) = display::screen_size(cols, rows);
        if state.camera.screen_width != screen_w || state.camera.screen_height != screen_h {
            state.camera.resize(screen_w, screen_h);
        }

        let ctx = TickContext {
            now: session_start.elapsed(),
            config,
        };
        *state = tick(state, &input, &ctx, &mut rng);

        let bodies = visible_bodies(state, &ctx);
        display::render(out, state, &bodies, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let _log_guard = init_logging();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {}. Using defaults.", err);
            tracing::warn!(%err, "config rejected, using defaults");
            GameConfig::default()
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &GameConfig) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start(difficulty) => {
                let (cols, rows) = terminal::size()?;
                let (screen_w, screen_h) = display::screen_size(cols, rows);
                let mut state = init_state(difficulty, screen_w, screen_h, config);
                tracing::info!(?difficulty, "run started");

                if game_loop(out, &mut state, rx, config)? {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
