use crate::multiplayer::{LeaderboardEntry, RemoteBoard};
use crate::pieces::GamePiece;
use crate::scoring::timer_delay_ms;
use crate::types::{Phase, GRID_COLS, GRID_ROWS, INVALID_CELL, STARTING_LIVES, STARTING_MULTIPLIER};

/// Everything a front-end needs to draw the local game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub cols: u8,
    pub rows: u8,
    /// Column-major cell values
    pub cells: Vec<i32>,
    pub revision: u32,
    pub current: Option<GamePiece>,
    pub following: Option<GamePiece>,
    /// Displayed score; trails `pending_score` while it animates
    pub score: u32,
    pub pending_score: u32,
    pub level: u32,
    pub lives: i32,
    pub multiplier: u32,
    pub timer_delay_ms: u32,
    pub timer_generation: u64,
    pub phase: Phase,
}

impl GameSnapshot {
    /// Cell at `(x, y)`, `INVALID_CELL` outside the grid
    pub fn cell(&self, x: i32, y: i32) -> i32 {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return INVALID_CELL;
        }
        self.cells
            .get(x as usize * self.rows as usize + y as usize)
            .copied()
            .unwrap_or(INVALID_CELL)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.cells.resize(self.cols as usize * self.rows as usize, 0);
        self.revision = 0;
        self.current = None;
        self.following = None;
        self.score = 0;
        self.pending_score = 0;
        self.level = 0;
        self.lives = STARTING_LIVES;
        self.multiplier = STARTING_MULTIPLIER;
        self.timer_delay_ms = timer_delay_ms(0);
        self.timer_generation = 0;
        self.phase = Phase::Uninitialized;
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            cells: Vec::new(),
            revision: 0,
            current: None,
            following: None,
            score: 0,
            pending_score: 0,
            level: 0,
            lives: STARTING_LIVES,
            multiplier: STARTING_MULTIPLIER,
            timer_delay_ms: 0,
            timer_generation: 0,
            phase: Phase::Uninitialized,
        };
        s.clear();
        s
    }
}

/// Shared-session state layered on top of [`GameSnapshot`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiplayerSnapshot {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub remote_boards: Vec<RemoteBoard>,
    /// Latest chat line, `"name: text"`
    pub chat: Option<String>,
    pub chat_history: Vec<String>,
    /// Pieces still missing before the match can start
    pub pieces_awaited: usize,
}
