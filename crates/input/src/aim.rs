//! Keyboard aim cursor
//!
//! The keyboard has no pointer, so placement goes through a cursor that the
//! aim keys move around the grid. Resolving an action against the cursor
//! yields the same [`GameCommand`] a click on that cell would.

use crate::types::{GameAction, GameCommand, GRID_COLS, GRID_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AimCursor {
    x: i32,
    y: i32,
    cols: i32,
    rows: i32,
}

impl AimCursor {
    /// Cursor centred on a `cols x rows` grid
    pub fn new(cols: u8, rows: u8) -> Self {
        let (cols, rows) = (cols.max(1) as i32, rows.max(1) as i32);
        Self {
            x: cols / 2,
            y: rows / 2,
            cols,
            rows,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move by `(dx, dy)`, clamped to the grid
    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x = (self.x + dx).clamp(0, self.cols - 1);
        self.y = (self.y + dy).clamp(0, self.rows - 1);
    }

    /// Resolve an action: aim moves stay local, everything the engine cares
    /// about becomes a command.
    pub fn resolve(&mut self, action: GameAction) -> Option<GameCommand> {
        match action {
            GameAction::AimUp => self.shift(0, -1),
            GameAction::AimDown => self.shift(0, 1),
            GameAction::AimLeft => self.shift(-1, 0),
            GameAction::AimRight => self.shift(1, 0),
            GameAction::Place => {
                return Some(GameCommand::Place {
                    x: self.x,
                    y: self.y,
                })
            }
            GameAction::RotateLeft => return Some(GameCommand::Rotate { steps: 3 }),
            GameAction::RotateRight => return Some(GameCommand::Rotate { steps: 1 }),
            GameAction::Swap => return Some(GameCommand::Swap),
            GameAction::Quit => return Some(GameCommand::Leave),
            GameAction::OpenChat => {}
        }
        None
    }
}

impl Default for AimCursor {
    fn default() -> Self {
        Self::new(GRID_COLS, GRID_ROWS)
    }
}
