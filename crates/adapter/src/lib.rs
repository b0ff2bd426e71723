//! Adapter module - headless control with a line-delimited JSON protocol
//!
//! Drives a session from another program (a solver, a bot, a test harness)
//! over stdin/stdout. Each line is one JSON object with a `type` and a `seq`;
//! every reply echoes the `seq` it answers.
//!
//! # Message Types
//!
//! ## Client → Game
//!
//! - **command**: slide once per listed direction (`up`, `down`, `left`, `right`)
//! - **restart**: discard the session and begin a fresh one
//! - **observe**: request the full session state
//! - **load**: replace the position with a given board and score
//!
//! ## Game → Client
//!
//! - **ack**: whether the command moved anything, and the points it scored
//! - **observation**: board, score, best score, phase, legal moves
//! - **error**: `invalid_json`, `invalid_command` or `unknown_message`
//!
//! Slides in a command are applied with their spawn settled immediately, so
//! an ack always describes a settled board. Errors never end the session.
//!
//! Match replies to requests by `seq`, not by arrival order: an error for a
//! malformed line can overtake the ack of an earlier command still in the queue.
//! Lines must be UTF-8 and at most [`MAX_LINE_BYTES`] long.
//!
//! # Environment Variables
//!
//! - `TUI2048_MAX_PENDING`: commands buffered ahead of the game loop (default 32)
//! - `TUI2048_OBSERVE_EVERY_MOVE`: set to "1" or "true" to follow each ack with an observation
//!
//! # Example
//!
//! ```text
//! Game -> Client: {"type":"observation","seq":0,"episode_id":0,"board":[[0,2,0,0],...],"score":0,...}
//! Client -> Game: {"type":"command","seq":1,"actions":["left","up"]}
//! Game -> Client: {"type":"ack","seq":1,"changed":true,"points":4}
//! Client -> Game: {"type":"fly","seq":2}
//! Game -> Client: {"type":"error","seq":2,"code":"unknown_message","message":"unknown message type \"fly\""}
//! ```

pub mod protocol;
pub mod runtime;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use protocol::*;
pub use runtime::{
    read_commands, serve, write_messages, Adapter, AdapterConfig, ClientCommand, InboundCommand,
    OutboundMessage, Session, MAX_LINE_BYTES,
};
