//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids
//! widget/layout libraries and renders into a framebuffer that is flushed to
//! the terminal with crossterm.
//!
//! Board cells reach the framebuffer through [`TilePainter`], the terminal
//! implementation of [`core::RenderAdapter`]; tile colors come from the
//! value's [`types::TileTier`].

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{cell_style, tier_style, AnchorY, GameView, TilePainter, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
