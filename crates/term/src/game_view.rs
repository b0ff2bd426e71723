//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, RenderAdapter};
use crate::fb::{digit_count, CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, TileTier, BOARD_SIZE};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const BOARD_BG: Rgb = Rgb::hex(0xbbada0);
const EMPTY_BG: Rgb = Rgb::hex(0xcdc1b5);
const DARK_TEXT: Rgb = Rgb::hex(0x727371);
const LIGHT_TEXT: Rgb = Rgb::new(255, 255, 255);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Style for a tile tier; `TileTier::Plain` is used for values past 2048.
pub fn tier_style(tier: TileTier) -> CellStyle {
    let (bg, fg) = match tier {
        TileTier::V2 => (0xeee4da, DARK_TEXT),
        TileTier::V4 => (0xeee1c9, DARK_TEXT),
        TileTier::V8 => (0xf3b27a, LIGHT_TEXT),
        TileTier::V16 => (0xf69664, LIGHT_TEXT),
        TileTier::V32 => (0xf77c5f, LIGHT_TEXT),
        TileTier::V64 => (0xf75f3b, LIGHT_TEXT),
        TileTier::V128 => (0xedd073, LIGHT_TEXT),
        TileTier::V256 => (0xedcc63, LIGHT_TEXT),
        TileTier::V512 => (0xedc651, LIGHT_TEXT),
        TileTier::V1024 => (0xeec744, LIGHT_TEXT),
        TileTier::V2048 => (0xecc230, LIGHT_TEXT),
        TileTier::Plain => (0x3c3a32, LIGHT_TEXT),
    };
    CellStyle::new(fg, Rgb::hex(bg)).bold()
}

/// Style for a cell value, including empty cells.
pub fn cell_style(value: u32) -> CellStyle {
    if value == 0 {
        CellStyle::new(EMPTY_BG, EMPTY_BG)
    } else {
        tier_style(TileTier::for_value(value))
    }
}

/// Paints board cells into a framebuffer region.
///
/// The origin is the top-left of the board interior. Each cell is a
/// `cell_w - 1` by `cell_h - 1` block preceded by a one column and one row
/// gutter showing the board background.
pub struct TilePainter<'a> {
    fb: &'a mut FrameBuffer,
    origin_x: u16,
    origin_y: u16,
    cell_w: u16,
    cell_h: u16,
}

impl<'a> TilePainter<'a> {
    pub fn new(
        fb: &'a mut FrameBuffer,
        origin_x: u16,
        origin_y: u16,
        cell_w: u16,
        cell_h: u16,
    ) -> Self {
        Self {
            fb,
            origin_x,
            origin_y,
            cell_w,
            cell_h,
        }
    }
}

impl RenderAdapter for TilePainter<'_> {
    fn set_cell(&mut self, row: usize, col: usize, value: u32) {
        let tile_w = self.cell_w.saturating_sub(1).max(1);
        let tile_h = self.cell_h.saturating_sub(1).max(1);
        let x = self.origin_x + 1 + (col as u16) * self.cell_w;
        let y = self.origin_y + 1 + (row as u16) * self.cell_h;

        let style = cell_style(value);
        self.fb.fill_rect(x, y, tile_w, tile_h, ' ', style);
        if value == 0 {
            return;
        }

        let len = digit_count(value);
        let tx = x + tile_w.saturating_sub(len) / 2;
        let ty = y + (tile_h - 1) / 2;
        if len <= tile_w {
            self.fb.put_u32(tx, ty, value, style);
        } else {
            // Too wide for the tile; show the exponent instead.
            self.fb.put_char(x, ty, '^', style);
            self.fb.put_u32(x + 1, ty, value.trailing_zeros(), style);
        }
    }
}

/// A lightweight terminal renderer for the 2048 board.
pub struct GameView {
    /// Board cell width in terminal columns, gutter included.
    cell_w: u16,
    /// Board cell height in terminal rows, gutter included.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 8x4 keeps tiles close to square for typical glyph aspect ratios.
        Self {
            cell_w: 8,
            cell_h: 4,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(2),
            cell_h: cell_h.max(2),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Outer size of the bordered board.
    pub fn frame_size(&self) -> (u16, u16) {
        let n = BOARD_SIZE as u16;
        (n * self.cell_w + 3, n * self.cell_h + 3)
    }

    /// Top-left corner of the board frame in `viewport`.
    pub fn board_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Render into an existing framebuffer, reusing its allocation.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(LIGHT_TEXT, PANEL_BG).cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let (start_x, start_y) = self.board_origin(viewport);

        let gutter = CellStyle::new(BOARD_BG, BOARD_BG);
        fb.fill_rect(start_x + 1, start_y + 1, frame_w - 2, frame_h - 2, ' ', gutter);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        {
            let mut painter =
                TilePainter::new(fb, start_x + 1, start_y + 1, self.cell_w, self.cell_h);
            snap.present(&mut painter);
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);

        match snap.phase {
            Phase::Idle => self.draw_overlay(
                fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                &["2048", "press Enter to start"],
                None,
            ),
            Phase::Over => self.draw_overlay(
                fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                &["GAME OVER", "r to restart"],
                Some(snap.score),
            ),
            Phase::Active => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = CellStyle { dim: true, ..value };

        let mut y = start_y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("BEST", snap.best_score),
            ("MOVES", snap.moves),
            ("MAX", snap.max_tile),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        for help in ["arrows/wasd", "r restart", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        lines: &[&str],
        score: Option<u32>,
    ) {
        let style = CellStyle::new(LIGHT_TEXT, PANEL_BG).bold();
        let rows = lines.len() as u16 + u16::from(score.is_some());
        let mut y = start_y.saturating_add(frame_h.saturating_sub(rows) / 2);

        let centered = |width: u16| start_x.saturating_add(frame_w.saturating_sub(width) / 2);

        for (i, text) in lines.iter().enumerate() {
            let x = centered(text.chars().count() as u16);
            fb.put_str(x, y, text, style);
            y = y.saturating_add(1);

            if i == 0 {
                if let Some(score) = score {
                    let x = centered(6 + digit_count(score));
                    fb.put_str(x, y, "score ", style);
                    fb.put_u32(x + 6, y, score, style);
                    y = y.saturating_add(1);
                }
            }
        }
    }
}
