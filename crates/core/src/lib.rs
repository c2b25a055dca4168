//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the TetrECS rules and state. It has **no I/O**: no
//! sockets, no clocks, no files. Time enters as countdown generations and the
//! network enters as [`InboundMessage`](types::InboundMessage) values, which
//! makes every rule reproducible in a unit test.
//!
//! # Module Structure
//!
//! - [`grid`]: `cols x rows` cell store with placement checks and line scans
//! - [`pieces`]: the 15 block shapes and quarter-turn rotation
//! - [`rng`]: piece sources (seeded random, server-fed queue)
//! - [`scoring`]: points, levels and the countdown curve
//! - [`game_state`]: the single-player state machine
//! - [`multiplayer`]: leaderboard, remote boards, chat and the protocol relay
//! - [`scores`]: high-score table
//! - [`mode`]: the [`GameMode`] trait the runtime drives
//!
//! # Game Rules
//!
//! - Pieces are placed anywhere they fit, centred on the chosen cell
//! - Full rows **and** full columns clear together
//! - Each clear scores `lines * blocks * 10 * multiplier`; the multiplier
//!   grows with consecutive clears and resets otherwise
//! - Every 1000 points is a level; higher levels shorten the countdown
//! - When the countdown runs out a life is lost and the current piece is
//!   discarded; the game ends below zero lives
//!
//! # Example
//!
//! ```
//! use tetrecs_core::{GameState, Placement, RandomPieces};
//!
//! let mut game = GameState::new(5, 5, RandomPieces::new(12345));
//! assert!(game.start());
//!
//! // Every piece fits on an empty grid when centred in the middle
//! assert!(matches!(game.attempt_placement(2, 2), Placement::Placed { .. }));
//! assert_eq!(game.lives(), 3);
//! ```

pub mod events;
pub mod game_state;
pub mod grid;
pub mod mode;
pub mod multiplayer;
pub mod pieces;
pub mod rng;
pub mod scores;
pub mod scoring;
pub mod snapshot;

pub use tetrecs_types as types;

// Re-export commonly used types for convenience
pub use events::{GameEvent, LineClear};
pub use game_state::{GameState, PieceSlot, Placement};
pub use grid::{FullLines, Grid};
pub use mode::GameMode;
pub use multiplayer::{
    ChatLog, Leaderboard, LeaderboardEntry, MultiplayerGame, RemoteBoard, RemoteBoards,
};
pub use pieces::{rotate_clockwise, GamePiece, Pattern};
pub use rng::{NetworkPieceQueue, PieceSource, RandomPieces, SimpleRng};
pub use scores::ScoreTable;
pub use scoring::{level_for_score, line_clear_score, timer_delay_ms};
pub use snapshot::{GameSnapshot, MultiplayerSnapshot};
