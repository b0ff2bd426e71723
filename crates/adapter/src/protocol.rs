//! Protocol module - JSON message types for the headless adapter
//!
//! One JSON object per line. Every message carries `type` and `seq`; replies
//! echo the `seq` of the request they answer.

use serde::{Deserialize, Serialize};

use crate::core::{Board, GameSnapshot, RenderAdapter};
use crate::types::{Direction, Line, Phase, BOARD_SIZE};

use arrayvec::ArrayVec;

/// Most slides accepted in a single command.
pub const MAX_ACTIONS: usize = 32;

// ============== Client -> Game Messages ==============

/// Slide the board once per listed direction, in order.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub actions: ActionList,
}

/// Bare request carrying only a sequence number (`restart`, `observe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SeqMessage {
    pub seq: u64,
}

/// Replace the position with a given board and score.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadMessage {
    pub seq: u64,
    pub board: [Line; BOARD_SIZE],
    #[serde(default)]
    pub score: u32,
}

impl LoadMessage {
    pub fn to_board(&self) -> Board {
        Board::from_rows(self.board)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionList(pub ArrayVec<Direction, MAX_ACTIONS>);

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ActionList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of direction strings")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<Direction, MAX_ACTIONS>::new();
                while let Some(name) = seq.next_element::<std::borrow::Cow<'de, str>>()? {
                    let dir = Direction::from_str(&name).ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown action {name:?}"))
                    })?;
                    out.try_push(dir)
                        .map_err(|_| serde::de::Error::custom("too many actions"))?;
                }
                Ok(ActionList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_json")]
    InvalidJson,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "unknown_message")]
    UnknownMessage,
}

/// Result of a command, restart or load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    /// Whether any slide moved a tile.
    pub changed: bool,
    /// Points scored by the command's merges.
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseLower {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "over")]
    Over,
}

impl From<Phase> for PhaseLower {
    fn from(value: Phase) -> Self {
        match value {
            Phase::Idle => Self::Idle,
            Phase::Active => Self::Active,
            Phase::Over => Self::Over,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionLower {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
}

impl From<Direction> for DirectionLower {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnInfo {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Full view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub episode_id: u32,
    pub seed: u64,
    pub board: [Line; BOARD_SIZE],
    pub score: u32,
    pub best_score: u32,
    pub moves: u32,
    pub max_tile: u32,
    pub phase: PhaseLower,
    pub legal_moves: ArrayVec<DirectionLower, 4>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_spawn: Option<SpawnInfo>,
}

/// Collects a presented snapshot into wire form.
struct GridCollector {
    board: [Line; BOARD_SIZE],
    score: u32,
    phase: Phase,
}

impl RenderAdapter for GridCollector {
    fn set_cell(&mut self, row: usize, col: usize, value: u32) {
        self.board[row][col] = value;
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

/// Build an observation from a snapshot.
pub fn build_observation(seq: u64, snap: &GameSnapshot) -> ObservationMessage {
    let mut grid = GridCollector {
        board: [[0; BOARD_SIZE]; BOARD_SIZE],
        score: 0,
        phase: Phase::Idle,
    };
    snap.present(&mut grid);

    let legal_moves = Direction::ALL
        .into_iter()
        .filter(|&d| snap.is_legal(d))
        .map(DirectionLower::from)
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        episode_id: snap.episode_id,
        seed: snap.seed,
        board: grid.board,
        score: grid.score,
        best_score: snap.best_score,
        moves: snap.moves,
        max_tile: snap.max_tile,
        phase: grid.phase.into(),
        legal_moves,
        last_spawn: snap.last_spawn.map(|s| SpawnInfo {
            row: s.row,
            col: s.col,
            value: s.value,
        }),
    }
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Command(CommandMessage),
    Restart(SeqMessage),
    Observe(SeqMessage),
    Load(LoadMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Command(m) => m.seq,
            ParsedMessage::Restart(m) | ParsedMessage::Observe(m) => m.seq,
            ParsedMessage::Load(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

const KNOWN_TYPES: [&str; 4] = ["command", "restart", "observe", "load"];

/// Parse one inbound line.
///
/// A line that is not a JSON object fails with `invalid_json`; a known
/// `type` with a malformed body fails with `invalid_command`. An unknown
/// `type` is not a parse error.
pub fn parse_message(json: &str) -> Result<ParsedMessage, ErrorMessage> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "restart")]
        Restart(SeqMessage),
        #[serde(rename = "observe")]
        Observe(SeqMessage),
        #[serde(rename = "load")]
        Load(LoadMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Restart(m)) => Ok(ParsedMessage::Restart(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Ok(InboundMessage::Load(m)) => Ok(ParsedMessage::Load(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let env = serde_json::from_str::<Envelope>(json)
                .map_err(|e| create_error(0, ErrorCode::InvalidJson, &e.to_string()))?;
            let seq = env.seq.unwrap_or(0);
            match env.msg_type {
                Some(t) if !KNOWN_TYPES.contains(&t.as_str()) => {
                    Ok(ParsedMessage::Unknown(UnknownMessage { seq, msg_type: t }))
                }
                _ => Err(create_error(seq, ErrorCode::InvalidCommand, &e.to_string())),
            }
        }
    }
}

// ============== Utility Functions ==============

pub fn create_ack(seq: u64, changed: bool, points: u32) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        changed,
        points,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}
