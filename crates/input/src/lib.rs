//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] and classifies
//! pointer drags into slide directions, the way a touch screen swipe would.

pub mod gesture;
pub mod map;

pub use tui_2048_types as types;

pub use gesture::{classify_swipe, SwipeTracker};
pub use map::{handle_key_event, is_start_key, should_quit};
