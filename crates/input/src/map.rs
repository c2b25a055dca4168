//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Aim
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameAction::AimUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::AimDown),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::AimLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::AimRight),

        // Place
        KeyCode::Enter | KeyCode::Char('x') | KeyCode::Char('X') => Some(GameAction::Place),

        // Rotation
        KeyCode::Char('q')
        | KeyCode::Char('Q')
        | KeyCode::Char('z')
        | KeyCode::Char('Z')
        | KeyCode::Char('[') => Some(GameAction::RotateLeft),
        KeyCode::Char('e')
        | KeyCode::Char('E')
        | KeyCode::Char('c')
        | KeyCode::Char('C')
        | KeyCode::Char(']') => Some(GameAction::RotateRight),

        // Actions
        KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Swap),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(GameAction::OpenChat),
        KeyCode::Esc => Some(GameAction::Quit),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
