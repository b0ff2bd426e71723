use tui_2048::core::{Board, GameState};
use tui_2048::term::{cell_style, AnchorY, FrameBuffer, GameView, Rgb, Viewport};
use tui_2048::types::Phase;

fn find(fb: &FrameBuffer, text: &str) -> Option<(u16, u16)> {
    (0..fb.height()).find_map(|y| {
        let row = fb.row_text(y);
        row.find(text)
            .map(|byte_x| (row[..byte_x].chars().count() as u16, y))
    })
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);

    // 4 cells of 8x4 plus a trailing gutter and the border => 35x19
    let (w, h) = view.frame_size();
    assert_eq!((w, h), (35, 19));
    let fb = view.render(&snap, Viewport::new(w, h));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(34, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 18).unwrap().ch, '└');
    assert_eq!(fb.get(34, 18).unwrap().ch, '┘');
}

#[test]
fn term_view_idle_game_shows_start_prompt() {
    let snap = GameState::new(1).snapshot();
    assert_eq!(snap.phase, Phase::Idle);
    let fb = GameView::default().render(&snap, Viewport::new(80, 24));
    assert!(find(&fb, "press Enter to start").is_some());
}

#[test]
fn term_view_paints_started_game_tiles() {
    let mut gs = GameState::new(1);
    gs.start();
    let snap = gs.snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(80, 24));

    let (ox, _) = view.board_origin(Viewport::new(80, 24));
    let mut painted = 0;
    for (row, values) in snap.board.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            // Top-left corner of the tile block.
            let x = ox + 2 + col as u16 * 8;
            let y = 2 + row as u16 * 4;
            let cell = fb.get(x, y).unwrap();
            assert_eq!(cell.style.bg, cell_style(value).bg);
            if value != 0 {
                painted += 1;
            }
        }
    }
    assert_eq!(painted, 2);
}

#[test]
fn term_view_game_over_overlay() {
    let mut gs = GameState::new(1);
    gs.start();
    gs.load(
        Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 8]]),
        500,
    );
    // Any slide on a locked board attempts a spawn into a full board.
    gs.slide(tui_2048::types::Direction::Left);
    gs.settle();
    let snap = gs.snapshot();
    assert_eq!(snap.phase, Phase::Over);

    let fb = GameView::default().render(&snap, Viewport::new(80, 24));
    assert!(find(&fb, "GAME OVER").is_some());
    assert!(find(&fb, "score 500").is_some());
    assert!(find(&fb, "BEST").is_some());
}

#[test]
fn term_view_tile_colors_follow_value() {
    let mut gs = GameState::new(1);
    gs.start();
    gs.load(
        Board::from_rows([[128, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
        0,
    );
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&gs.snapshot(), Viewport::new(60, 20));
    let (x, y) = find(&fb, "128").unwrap();
    let cell = fb.get(x, y).unwrap();
    assert_eq!(cell.style.bg, Rgb::hex(0xedd073));
    assert_eq!(cell.style.fg, Rgb::new(255, 255, 255));
}
