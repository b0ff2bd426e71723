//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with async line I/O. A reader task turns
//! input lines into [`InboundCommand`]s (answering malformed ones directly),
//! the game loop applies them through a [`Session`], and a writer task
//! serializes every [`OutboundMessage`] as one line.

use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;
use log::{debug, warn};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{Board, GameSnapshot, GameState};
use crate::protocol::*;
use crate::types::{Direction, MAX_TILE};

/// Headless adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Commands buffered between the reader and the game loop.
    pub max_pending: usize,
    /// Follow every ack with an observation.
    pub observe_every_move: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_pending: 32,
            observe_every_move: false,
        }
    }
}

impl AdapterConfig {
    /// Read `TUI2048_MAX_PENDING` and `TUI2048_OBSERVE_EVERY_MOVE`.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let max_pending = env::var("TUI2048_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending);
        let observe_every_move = env::var("TUI2048_OBSERVE_EVERY_MOVE")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.observe_every_move);

        Self {
            max_pending: max_pending.max(1),
            observe_every_move,
        }
    }
}

fn parse_flag(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
}

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub seq: u64,
    pub command: ClientCommand,
}

/// Command payload.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    Slides(ArrayVec<Direction, MAX_ACTIONS>),
    Restart,
    Observe,
    Load { board: Board, score: u32 },
}

impl InboundCommand {
    /// Map a parsed message. Unknown messages have no command.
    pub fn from_message(msg: ParsedMessage) -> Option<Self> {
        let seq = msg.seq();
        let command = match msg {
            ParsedMessage::Command(m) => ClientCommand::Slides(m.actions.0),
            ParsedMessage::Restart(_) => ClientCommand::Restart,
            ParsedMessage::Observe(_) => ClientCommand::Observe,
            ParsedMessage::Load(m) => ClientCommand::Load {
                board: m.to_board(),
                score: m.score,
            },
            ParsedMessage::Unknown(_) => return None,
        };
        Some(Self { seq, command })
    }
}

/// Outbound message, written as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Ack(AckMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    /// Append the message and a trailing newline to `buf`.
    pub fn write_line(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            OutboundMessage::Ack(m) => serde_json::to_writer(&mut *buf, m)?,
            OutboundMessage::Observation(m) => serde_json::to_writer(&mut *buf, m)?,
            OutboundMessage::Error(m) => serde_json::to_writer(&mut *buf, m)?,
        }
        buf.push(b'\n');
        Ok(())
    }
}

/// Game-loop side of the adapter: applies commands to one session.
pub struct Session {
    game: GameState,
    config: AdapterConfig,
    snap: GameSnapshot,
}

impl Session {
    /// Wrap `game`, starting it if it is still idle.
    pub fn new(mut game: GameState, config: AdapterConfig) -> Self {
        game.start();
        Self {
            game,
            config,
            snap: GameSnapshot::default(),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Current observation, tagged with `seq`.
    pub fn observe(&mut self, seq: u64) -> ObservationMessage {
        self.game.snapshot_into(&mut self.snap);
        build_observation(seq, &self.snap)
    }

    /// Apply one command, pushing its replies onto `out`.
    pub fn handle(&mut self, cmd: InboundCommand, out: &mut Vec<OutboundMessage>) {
        let seq = cmd.seq;
        match cmd.command {
            ClientCommand::Slides(dirs) => {
                let mut changed = false;
                let mut points = 0u32;
                for dir in dirs {
                    if let Some(outcome) = self.game.slide(dir) {
                        changed |= outcome.changed;
                        points = points.saturating_add(outcome.points);
                    }
                    self.game.settle();
                }
                debug!("command {seq}: changed={changed} points={points}");
                out.push(OutboundMessage::Ack(create_ack(seq, changed, points)));
            }
            ClientCommand::Restart => {
                self.game.restart();
                out.push(OutboundMessage::Ack(create_ack(seq, true, 0)));
            }
            ClientCommand::Observe => {
                out.push(OutboundMessage::Observation(self.observe(seq)));
                return;
            }
            ClientCommand::Load { board, score } => {
                if !self.game.load(board, score) {
                    warn!("load {seq} rejected: malformed board");
                    let msg =
                        format!("board values must be 0 or a power of two up to {MAX_TILE}");
                    out.push(OutboundMessage::Error(create_error(
                        seq,
                        ErrorCode::InvalidCommand,
                        &msg,
                    )));
                    return;
                }
                out.push(OutboundMessage::Ack(create_ack(seq, true, 0)));
            }
        }

        if self.config.observe_every_move {
            out.push(OutboundMessage::Observation(self.observe(seq)));
        }
    }
}

/// Longest accepted input line, newline excluded.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Read lines from `reader` until EOF or until the game loop goes away.
///
/// Lines that are not UTF-8 or exceed [`MAX_LINE_BYTES`] are answered with
/// `invalid_json` and skipped; only I/O failures end the reader.
pub async fn read_commands<R>(
    reader: R,
    cmd_tx: mpsc::Sender<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    loop {
        buf.clear();
        let n = (&mut reader)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            break;
        }

        if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_BYTES {
            discard_line(&mut reader).await?;
            warn!("rejected input: line longer than {MAX_LINE_BYTES} bytes");
            let msg = format!("line exceeds {MAX_LINE_BYTES} bytes");
            let _ = out_tx.send(OutboundMessage::Error(create_error(
                0,
                ErrorCode::InvalidJson,
                &msg,
            )));
            continue;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!("rejected input: not valid UTF-8");
            let _ = out_tx.send(OutboundMessage::Error(create_error(
                0,
                ErrorCode::InvalidJson,
                "line is not valid UTF-8",
            )));
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = match parse_message(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("rejected input ({:?}): {}", err.code, err.message);
                let _ = out_tx.send(OutboundMessage::Error(err));
                continue;
            }
        };

        let seq = parsed.seq();
        match parsed {
            ParsedMessage::Unknown(u) => {
                warn!("unknown message type {:?}", u.msg_type);
                let msg = format!("unknown message type {:?}", u.msg_type);
                let _ = out_tx.send(OutboundMessage::Error(create_error(
                    seq,
                    ErrorCode::UnknownMessage,
                    &msg,
                )));
            }
            other => {
                let Some(cmd) = InboundCommand::from_message(other) else {
                    continue;
                };
                if cmd_tx.send(cmd).await.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Skip input up to and including the next newline (or EOF).
async fn discard_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (found, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Write every outbound message as one line until the channel closes.
pub async fn write_messages<W>(
    mut writer: W,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    while let Some(msg) = out_rx.recv().await {
        buf.clear();
        if let Err(e) = msg.write_line(&mut buf) {
            warn!("dropping unserializable message: {e}");
            continue;
        }
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Serve a session over an async reader/writer pair until the input ends.
///
/// The session's current observation is written first, with `seq` 0.
pub async fn serve<R, W>(
    reader: R,
    writer: W,
    session: &mut Session,
    config: AdapterConfig,
) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(config.max_pending.max(1));
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

    let reader_task = tokio::spawn(read_commands(reader, cmd_tx, out_tx.clone()));
    let writer_task = tokio::spawn(write_messages(writer, out_rx));

    let _ = out_tx.send(OutboundMessage::Observation(session.observe(0)));
    let mut replies = Vec::new();
    while let Some(cmd) = cmd_rx.recv().await {
        session.handle(cmd, &mut replies);
        for msg in replies.drain(..) {
            let _ = out_tx.send(msg);
        }
    }

    reader_task.await??;
    drop(out_tx);
    writer_task.await??;
    Ok(())
}

/// Running adapter instance bound to stdin/stdout.
pub struct Adapter {
    rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    writer: JoinHandle<Result<()>>,
}

impl Adapter {
    /// Start the reader and writer tasks on a fresh runtime.
    pub fn start(config: AdapterConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(config.max_pending.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new()?;
        let reader_out = out_tx.clone();
        rt.spawn(async move {
            if let Err(e) = read_commands(tokio::io::stdin(), cmd_tx, reader_out).await {
                warn!("stdin reader stopped: {e}");
            }
        });
        let writer = rt.spawn(async move { write_messages(tokio::io::stdout(), out_rx).await });

        Ok(Self {
            rt,
            cmd_rx,
            out_tx,
            writer,
        })
    }

    /// Block until the next command; `None` once input has ended.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Flush pending output and stop the runtime.
    pub fn shutdown(self) -> Result<()> {
        let Self {
            rt,
            cmd_rx,
            out_tx,
            writer,
        } = self;
        drop(cmd_rx);
        drop(out_tx);
        let flushed = rt.block_on(writer);
        rt.shutdown_timeout(Duration::from_millis(100));
        flushed??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::types::Phase;

    fn new_session(config: AdapterConfig) -> Session {
        let game = GameState::with_config(GameConfig {
            seed: 7,
            spawn_delay_ms: 200,
            ..GameConfig::default()
        })
        .unwrap();
        Session::new(game, config)
    }

    fn slides(seq: u64, dirs: &[Direction]) -> InboundCommand {
        InboundCommand {
            seq,
            command: ClientCommand::Slides(dirs.iter().copied().collect()),
        }
    }

    #[test]
    fn session_starts_the_game() {
        let session = new_session(AdapterConfig::default());
        assert_eq!(session.game().phase(), Phase::Active);
        assert_eq!(session.game().board().tile_count(), 2);
    }

    #[test]
    fn every_slide_in_a_command_is_applied_and_settled() {
        let mut session = new_session(AdapterConfig::default());
        let mut out = Vec::new();
        session.handle(
            slides(1, &[Direction::Left, Direction::Up, Direction::Right]),
            &mut out,
        );

        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], OutboundMessage::Ack(AckMessage { seq: 1, .. })));
        assert_eq!(session.game().moves(), 3);
        assert!(!session.game().spawn_pending());
    }

    #[test]
    fn ack_reports_points() {
        let mut session = new_session(AdapterConfig::default());
        let mut out = Vec::new();
        let board = Board::from_rows([[2, 2, 0, 0], [4, 4, 0, 0], [0; 4], [0; 4]]);
        session.handle(
            InboundCommand {
                seq: 1,
                command: ClientCommand::Load { board, score: 100 },
            },
            &mut out,
        );
        session.handle(slides(2, &[Direction::Left]), &mut out);

        assert_eq!(out[0], OutboundMessage::Ack(create_ack(1, true, 0)));
        assert_eq!(out[1], OutboundMessage::Ack(create_ack(2, true, 12)));
        assert_eq!(session.game().score(), 112);
    }

    #[test]
    fn malformed_load_is_rejected() {
        let mut session = new_session(AdapterConfig::default());
        let before = *session.game().board();
        let mut out = Vec::new();
        let board = Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.handle(
            InboundCommand {
                seq: 4,
                command: ClientCommand::Load { board, score: 0 },
            },
            &mut out,
        );
        match &out[0] {
            OutboundMessage::Error(e) => {
                assert_eq!(e.seq, 4);
                assert_eq!(e.code, ErrorCode::InvalidCommand);
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(*session.game().board(), before);
    }

    #[test]
    fn oversized_load_is_rejected() {
        let mut session = new_session(AdapterConfig::default());
        let mut out = Vec::new();
        let big = MAX_TILE << 1;
        let board = Board::from_rows([[big, big, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.handle(
            InboundCommand {
                seq: 6,
                command: ClientCommand::Load { board, score: 0 },
            },
            &mut out,
        );
        assert!(matches!(
            &out[0],
            OutboundMessage::Error(e) if e.seq == 6 && e.code == ErrorCode::InvalidCommand
        ));
        session.handle(slides(7, &[Direction::Left]), &mut out);
        assert!(matches!(out[1], OutboundMessage::Ack(AckMessage { seq: 7, .. })));
    }

    #[test]
    fn extreme_positions_keep_the_session_alive() {
        let mut session = new_session(AdapterConfig::default());
        let mut out = Vec::new();
        let board = Board::from_rows([[MAX_TILE, MAX_TILE, 2, 2], [0; 4], [0; 4], [0; 4]]);
        session.handle(
            InboundCommand {
                seq: 1,
                command: ClientCommand::Load {
                    board,
                    score: u32::MAX,
                },
            },
            &mut out,
        );
        session.handle(slides(2, &[Direction::Left, Direction::Right]), &mut out);

        assert_eq!(out[0], OutboundMessage::Ack(create_ack(1, true, 0)));
        assert!(matches!(
            out[1],
            OutboundMessage::Ack(AckMessage {
                seq: 2,
                changed: true,
                ..
            })
        ));
        assert_eq!(session.game().score(), u32::MAX);
        assert!(session.game().board().is_well_formed());
        assert_eq!(session.game().board().max_tile(), MAX_TILE);
    }

    #[test]
    fn restart_and_observe() {
        let mut session = new_session(AdapterConfig::default());
        let mut out = Vec::new();
        session.handle(slides(1, &[Direction::Down]), &mut out);
        session.handle(
            InboundCommand {
                seq: 2,
                command: ClientCommand::Restart,
            },
            &mut out,
        );
        session.handle(
            InboundCommand {
                seq: 3,
                command: ClientCommand::Observe,
            },
            &mut out,
        );

        assert_eq!(out.len(), 3);
        match &out[2] {
            OutboundMessage::Observation(obs) => {
                assert_eq!(obs.seq, 3);
                assert_eq!(obs.episode_id, 1);
                assert_eq!(obs.moves, 0);
                assert_eq!(obs.score, 0);
                assert_eq!(obs.phase, PhaseLower::Active);
            }
            other => panic!("expected observation, got {other:?}"),
        }
    }

    #[test]
    fn observe_every_move_follows_acks() {
        let mut session = new_session(AdapterConfig {
            observe_every_move: true,
            ..AdapterConfig::default()
        });
        let mut out = Vec::new();
        session.handle(slides(5, &[Direction::Left]), &mut out);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1], OutboundMessage::Observation(ref o) if o.seq == 5));
    }

    #[test]
    fn outbound_lines_end_with_newline() {
        let mut buf = Vec::new();
        OutboundMessage::Ack(create_ack(1, false, 0))
            .write_line(&mut buf)
            .unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn from_env_defaults() {
        std::env::remove_var("TUI2048_MAX_PENDING");
        std::env::remove_var("TUI2048_OBSERVE_EVERY_MOVE");
        assert_eq!(AdapterConfig::from_env(), AdapterConfig::default());
    }

    #[tokio::test]
    async fn reader_answers_bad_lines_and_forwards_commands() {
        let input = b"{\"type\":\"observe\",\"seq\":1}\n\nnot json\n{\"type\":\"hello\",\"seq\":2}\n{\"type\":\"restart\",\"seq\":3}\n";
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        read_commands(&input[..], cmd_tx, out_tx).await.unwrap();

        let first = cmd_rx.recv().await.unwrap();
        assert_eq!(first.seq, 1);
        assert!(matches!(first.command, ClientCommand::Observe));
        let second = cmd_rx.recv().await.unwrap();
        assert_eq!(second.seq, 3);
        assert!(matches!(second.command, ClientCommand::Restart));
        assert!(cmd_rx.recv().await.is_none());

        match out_rx.recv().await.unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::InvalidJson),
            other => panic!("expected error, got {other:?}"),
        }
        match out_rx.recv().await.unwrap() {
            OutboundMessage::Error(e) => {
                assert_eq!(e.code, ErrorCode::UnknownMessage);
                assert_eq!(e.seq, 2);
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reader_survives_invalid_utf8() {
        let input = b"\xff\xfe\n{\"type\":\"observe\",\"seq\":2}\n";
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        read_commands(&input[..], cmd_tx, out_tx).await.unwrap();

        let cmd = cmd_rx.recv().await.unwrap();
        assert_eq!(cmd.seq, 2);
        assert!(matches!(cmd.command, ClientCommand::Observe));
        match out_rx.recv().await.unwrap() {
            OutboundMessage::Error(e) => {
                assert_eq!(e.code, ErrorCode::InvalidJson);
                assert_eq!(e.seq, 0);
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(out_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reader_skips_oversized_lines() {
        let mut input = vec![b'x'; MAX_LINE_BYTES * 2];
        input.extend_from_slice(b"\n{\"type\":\"restart\",\"seq\":9}\n");
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        read_commands(&input[..], cmd_tx, out_tx).await.unwrap();

        let cmd = cmd_rx.recv().await.unwrap();
        assert_eq!(cmd.seq, 9);
        assert!(matches!(cmd.command, ClientCommand::Restart));
        assert!(cmd_rx.recv().await.is_none());
        match out_rx.recv().await.unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::InvalidJson),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(out_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reader_accepts_line_at_the_limit() {
        let body = b"{\"type\":\"observe\",\"seq\":4}";
        let mut input = body.to_vec();
        input.resize(MAX_LINE_BYTES, b' ');
        input.push(b'\n');
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        read_commands(&input[..], cmd_tx, out_tx).await.unwrap();

        assert_eq!(cmd_rx.recv().await.unwrap().seq, 4);
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn writer_emits_one_line_per_message() {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        out_tx
            .send(OutboundMessage::Ack(create_ack(1, true, 4)))
            .unwrap();
        out_tx
            .send(OutboundMessage::Error(create_error(
                2,
                ErrorCode::InvalidCommand,
                "bad",
            )))
            .unwrap();
        drop(out_tx);

        let mut sink = Vec::new();
        tokio_test::block_on(write_messages(&mut sink, out_rx)).unwrap();
        let text = String::from_utf8(sink).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"ack\""));
        assert!(lines[1].contains("\"invalid_command\""));
    }
}
