//! Terminal 2048 runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for input and a custom framebuffer-based renderer
//! (no widget/layout library).

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use tui_2048::cli::GameArgs;
use tui_2048::core::{GameSnapshot, GameState};
use tui_2048::input::{handle_key_event, is_start_key, should_quit, SwipeTracker};
use tui_2048::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_2048::types::{GameAction, Phase, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "tui-2048")]
#[command(version, about = "Play 2048 in the terminal")]
struct Cli {
    #[command(flatten)]
    game: GameArgs,

    /// Log to stderr (filter with RUST_LOG)
    #[arg(long)]
    log: bool,

    /// Disable mouse capture (no swipe gestures)
    #[arg(long)]
    no_mouse: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let game_state = GameState::with_config(cli.game.to_config()?)?;
    info!("seed {}", game_state.config().seed);

    let mut term = TerminalRenderer::new();
    if cli.no_mouse {
        term = term.without_mouse();
    }
    term.enter()?;

    let result = run(&mut term, game_state);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut game_state: GameState) -> Result<()> {
    let view = GameView::default();
    let mut swipe = SwipeTracker::for_terminal();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game_state.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }

                    if is_start_key(key) {
                        match game_state.phase() {
                            Phase::Idle => {
                                game_state.start();
                            }
                            Phase::Over => game_state.restart(),
                            Phase::Active => {}
                        }
                    } else if let Some(action) = handle_key_event(key) {
                        game_state.apply_action(action);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(dir) = swipe.handle_mouse_event(mouse) {
                        game_state.apply_action(GameAction::Slide(dir));
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game_state.tick(TICK_MS);
        }
    }
}
