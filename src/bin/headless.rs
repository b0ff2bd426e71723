//! Headless 2048 runner.
//!
//! Reads JSON-lines commands on stdin and answers on stdout; see
//! [`tui_2048::adapter`] for the protocol. Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use log::info;

use tui_2048::adapter::{Adapter, AdapterConfig, OutboundMessage, Session};
use tui_2048::cli::GameArgs;
use tui_2048::core::GameState;

#[derive(Parser, Debug)]
#[command(name = "tui-2048-headless")]
#[command(version, about = "Drive 2048 over a JSON-lines pipe")]
struct Cli {
    #[command(flatten)]
    game: GameArgs,

    /// Follow every ack with an observation
    #[arg(long)]
    observe_every_move: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AdapterConfig::from_env();
    config.observe_every_move |= cli.observe_every_move;

    let game_state = GameState::with_config(cli.game.to_config()?)?;
    info!(
        "headless session, seed {}, max {} pending commands",
        game_state.config().seed,
        config.max_pending
    );

    let mut adapter = Adapter::start(config)?;
    let mut session = Session::new(game_state, config);
    adapter.send(OutboundMessage::Observation(session.observe(0)));

    let mut replies = Vec::new();
    while let Some(cmd) = adapter.recv_blocking() {
        session.handle(cmd, &mut replies);
        for msg in replies.drain(..) {
            adapter.send(msg);
        }
    }

    info!(
        "input closed after {} moves, score {}",
        session.game().moves(),
        session.game().score()
    );
    adapter.shutdown()
}
