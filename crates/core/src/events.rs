//! Game events drained by the runtime after every mutation

use std::collections::BTreeSet;

use crate::pieces::GamePiece;
use crate::types::{BlockCoordinate, MusicCue, ScoreRecord, SoundCue};

/// Result of a clearing placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Full rows plus full columns
    pub lines: u32,
    /// Distinct cells emptied; a shared row/column cell appears once
    pub blocks: BTreeSet<BlockCoordinate>,
    pub points: u32,
    /// Multiplier the points were computed with
    pub multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Current or following piece changed (spawn, advance, rotate, swap)
    NextPiece {
        current: Option<GamePiece>,
        following: Option<GamePiece>,
    },
    /// A piece left the source; multiplayer requests a replacement
    PieceDrawn { id: u8 },
    PiecePlaced { piece: GamePiece, x: i32, y: i32 },
    PlacementRejected { x: i32, y: i32 },
    /// Line resolution after a successful placement finished
    PlacementResolved { lines: u32 },
    LinesCleared(LineClear),
    /// Authoritative (pending) score changed
    ScoreChanged { score: u32 },
    LevelChanged { level: u32 },
    MultiplierChanged { multiplier: u32 },
    LivesChanged { lives: i32 },
    /// A new countdown of `delay_ms` was started; older generations are stale
    TimerReset { generation: u64, delay_ms: u32 },
    GameOver,
    Sound(SoundCue),
    Music(MusicCue),
    ChatReceived { name: String, text: String },
    LeaderboardChanged,
    RemoteBoardsChanged,
    OnlineScores(Vec<ScoreRecord>),
}
