mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bridge_duel::controller::{Command, GameController};
use bridge_duel::surface::Canvas;
use bridge_duel::vector::Vector;
use bridge_duel::world::Phase;

const FRAME: Duration = Duration::from_millis(20);

const LOG_PATH_VAR: &str = "BRIDGE_DUEL_LOG";
const SEED_VAR: &str = "BRIDGE_DUEL_SEED";
const DEFAULT_LOG_PATH: &str = "game.log";

// ── Logging & seed ────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.
fn init_logging() -> anyhow::Result<()> {
    let path = std::env::var(LOG_PATH_VAR).unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    let file = File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn game_seed() -> u64 {
    std::env::var(SEED_VAR)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(rand::random)
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Take at most one pending key press and map it to a command.
fn poll_command(rx: &mpsc::Receiver<Event>) -> Option<Command> {
    match rx.try_recv() {
        Ok(Event::Key(KeyEvent {
            code, kind, modifiers, ..
        })) if kind != KeyEventKind::Release => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Char(c) => Command::from_key(c.to_ascii_lowercase()),
            _ => None,
        },
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> anyhow::Result<()> {
    let (width, height) = terminal::size()?;
    log::info!("Screen size is {width}, {height}");
    let screen = Vector::new(width as i32, height as i32);

    let seed = game_seed();
    log::info!("Seed is {seed}");
    let mut game = GameController::new(screen, StdRng::seed_from_u64(seed));
    let mut canvas = Canvas::new(screen);

    while game.phase() != Phase::Exit {
        let frame_start = Instant::now();

        game.tick()?;

        canvas.clear();
        game.draw(&mut canvas);
        display::render(out, &canvas)?;

        if let Some(command) = poll_command(rx) {
            game.handle_command(command)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }

    log::info!("Exiting after {} turns", game.turn());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("game aborted: {err:#}");
    }
    result
}
