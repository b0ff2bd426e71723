//! Integration tests for the terminal game loop pieces

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use tui_2048::core::{Board, GameConfig, GameState};
use tui_2048::input::{handle_key_event, is_start_key, should_quit, SwipeTracker};
use tui_2048::types::{Direction, GameAction, Phase};

fn instant_game(seed: u64) -> GameState {
    GameState::with_config(GameConfig {
        seed,
        spawn_delay_ms: 0,
        ..GameConfig::default()
    })
    .unwrap()
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_game_lifecycle() {
    let mut state = instant_game(12345);
    assert_eq!(state.phase(), Phase::Idle);

    // Slides before the start key are ignored.
    assert!(!state.apply_action(GameAction::Slide(Direction::Left)));

    assert!(is_start_key(KeyEvent::from(KeyCode::Enter)));
    assert!(state.start());
    assert!(!state.start());
    assert_eq!(state.phase(), Phase::Active);

    let action = handle_key_event(KeyEvent::from(KeyCode::Char('r'))).unwrap();
    assert!(state.apply_action(action));
    assert_eq!(state.episode_id(), 1);
    assert_eq!(state.phase(), Phase::Active);

    assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
}

#[test]
fn test_keys_drive_slides() {
    let mut state = instant_game(7);
    state.start();
    state.load(Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]), 0);

    let action = handle_key_event(KeyEvent::from(KeyCode::Char('d'))).unwrap();
    assert_eq!(action, GameAction::Slide(Direction::Right));
    assert!(state.apply_action(action));
    assert_eq!(state.board().get(0, 3), Some(4));
    assert_eq!(state.score(), 4);
    assert_eq!(state.board().tile_count(), 2);
}

#[test]
fn test_mouse_swipe_drives_slides() {
    let mut state = instant_game(7);
    state.start();
    state.load(Board::from_rows([[0; 4], [0; 4], [0; 4], [0, 8, 0, 0]]), 0);

    let mut swipe = SwipeTracker::for_terminal();
    let mut dir = None;
    for ev in [
        mouse(MouseEventKind::Down(MouseButton::Left), 40, 20),
        mouse(MouseEventKind::Drag(MouseButton::Left), 41, 15),
        mouse(MouseEventKind::Up(MouseButton::Left), 42, 8),
    ] {
        dir = dir.or(swipe.handle_mouse_event(ev));
    }
    assert_eq!(dir, Some(Direction::Up));

    state.apply_action(GameAction::Slide(Direction::Up));
    assert_eq!(state.board().get(0, 1), Some(8));
}
