//! Core types module - shared data structures and constants
//!
//! This module defines the plain data shared by every TetrECS crate: grid and
//! timer constants, coordinates, player actions and commands, media cues and the
//! line-protocol message enums. Nothing here has behaviour beyond parsing and
//! naming, so the types can be used from the pure game core, the network
//! adapter and the terminal front-end alike.
//!
//! # Grid
//!
//! The playfield is a 5x5 grid of integer cell values:
//!
//! - `0` is an empty cell
//! - `1..COLOR_COUNT` is the colour index of the piece that filled the cell
//!
//! # Countdown
//!
//! Every placement (and every timeout) restarts the countdown:
//!
//! | Level | Delay |
//! |-------|-------|
//! | 0 | 12000ms |
//! | 1 | 11500ms |
//! | 10 | 7000ms |
//! | 19+ | 2500ms (floor) |
//!
//! # Examples
//!
//! ```
//! use tetrecs_types::{LifeStatus, GRID_COLS, GRID_ROWS};
//!
//! assert_eq!(GRID_COLS, 5);
//! assert_eq!(GRID_ROWS, 5);
//!
//! assert_eq!(LifeStatus::from_str("dead"), Some(LifeStatus::Dead));
//! ```

use std::fmt;

/// Grid width in cells
pub const GRID_COLS: u8 = 5;

/// Grid height in cells
pub const GRID_ROWS: u8 = 5;

/// Side length of a piece pattern (3x3)
pub const PIECE_SIZE: usize = 3;

/// Number of distinct pieces; ids are `0..PIECE_COUNT`
pub const PIECE_COUNT: u8 = 15;

/// Exclusive upper bound for cell values (empty plus one colour per piece)
pub const COLOR_COUNT: i32 = 16;

/// Value of an empty cell
pub const EMPTY_CELL: i32 = 0;

/// Sentinel returned for out-of-bounds reads
pub const INVALID_CELL: i32 = -1;

pub const STARTING_LIVES: i32 = 3;

/// Life count at which a player is eliminated
pub const ELIMINATED_LIVES: i32 = -1;

pub const STARTING_MULTIPLIER: u32 = 1;

/// Points per cleared block, before the line count and multiplier
pub const POINTS_PER_BLOCK: u32 = 10;

/// Pending score needed per level
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Countdown at level 0
pub const BASE_TIMER_MS: u32 = 12_000;

/// Countdown reduction per level
pub const TIMER_STEP_MS: u32 = 500;

/// Countdown floor
pub const MIN_TIMER_MS: u32 = 2_500;

/// Delay between a score change and the displayed score settling on it
pub const SCORE_ANIMATION_MS: u32 = 1_000;

/// Server-fed pieces required before a multiplayer match can start
/// (current, following and one lookahead)
pub const INITIAL_PIECE_FILL: usize = 3;

/// Entries kept on the multiplayer leaderboard
pub const LEADERBOARD_SIZE: usize = 5;

/// Remote boards mirrored for the top of the leaderboard
pub const REMOTE_BOARD_SLOTS: usize = 3;

/// Cells in a remote board snapshot (always 5x5)
pub const REMOTE_BOARD_CELLS: usize = GRID_COLS as usize * GRID_ROWS as usize;

/// Entries kept in a high-score table
pub const SCORE_TABLE_SIZE: usize = 10;

/// Chat lines kept in history
pub const CHAT_HISTORY: usize = 8;


/// A cell position on a grid; `x` is the column, `y` the row.
///
/// Ordering is column-major (`x` first), matching the wire layout of boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockCoordinate {
    pub x: u8,
    pub y: u8,
}

impl BlockCoordinate {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for BlockCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Lifecycle phase of a game engine
///
/// `Uninitialized -> Running -> Ended`; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Running,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "waiting",
            Phase::Running => "running",
            Phase::Ended => "ended",
        }
    }
}

/// Alive/dead flag carried by leaderboard entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifeStatus {
    #[default]
    Alive,
    Dead,
}

impl LifeStatus {
    /// Parse the protocol spelling (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrecs_types::LifeStatus;
    ///
    /// assert_eq!(LifeStatus::from_str("ALIVE"), Some(LifeStatus::Alive));
    /// assert_eq!(LifeStatus::from_str("Dead"), Some(LifeStatus::Dead));
    /// assert_eq!(LifeStatus::from_str("?"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALIVE" => Some(LifeStatus::Alive),
            "DEAD" => Some(LifeStatus::Dead),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStatus::Alive => "ALIVE",
            LifeStatus::Dead => "DEAD",
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, LifeStatus::Alive)
    }
}

/// Keyboard-level actions, before they are resolved against the aim cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    AimUp,
    AimDown,
    AimLeft,
    AimRight,
    /// Place the current piece centred on the aim cursor
    Place,
    /// Rotate the current piece 90 degrees anticlockwise (three clockwise steps)
    RotateLeft,
    /// Rotate the current piece 90 degrees clockwise
    RotateRight,
    /// Exchange current and following piece
    Swap,
    OpenChat,
    Quit,
}

/// A fully resolved request to the game engine
///
/// Commands carry absolute coordinates, so a mouse click and a keyboard
/// placement at the aim cursor look the same to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Place the current piece centred on `(x, y)`
    Place { x: i32, y: i32 },
    /// Rotate the current piece by `steps` clockwise quarter turns
    Rotate { steps: i32 },
    Swap,
    /// Send a chat line (multiplayer only)
    Chat(String),
    /// Leave the match
    Leave,
}

impl fmt::Display for GameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameCommand::Place { x, y } => write!(f, "place({x},{y})"),
            GameCommand::Rotate { steps } => write!(f, "rotate({steps})"),
            GameCommand::Swap => f.write_str("swap"),
            GameCommand::Chat(_) => f.write_str("chat"),
            GameCommand::Leave => f.write_str("leave"),
        }
    }
}

/// Named sound effects requested by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Place,
    Fail,
    Clear,
    LevelUp,
    Rotate,
    LifeLost,
    Message,
    GameOver,
}

impl SoundCue {
    /// Asset-style name of the cue
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Place => "place",
            SoundCue::Fail => "fail",
            SoundCue::Clear => "clear",
            SoundCue::LevelUp => "level",
            SoundCue::Rotate => "rotate",
            SoundCue::LifeLost => "lifelose",
            SoundCue::Message => "message",
            SoundCue::GameOver => "explode",
        }
    }
}

/// Named background tracks requested by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicCue {
    Menu,
    Game,
    End,
}

impl MusicCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicCue::Menu => "menu",
            MusicCue::Game => "game",
            MusicCue::End => "end",
        }
    }
}

/// One leaderboard line as received from the server (`name:score:STATUS`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub name: String,
    pub score: u32,
    pub status: LifeStatus,
}

impl ScoreLine {
    pub fn new(name: impl Into<String>, score: u32, status: LifeStatus) -> Self {
        Self {
            name: name.into(),
            score,
            status,
        }
    }
}

/// One high-score record (`name:score`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.score)
    }
}

/// Messages received from the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// `PIECE <id>`: one piece for the local queue
    Piece(u8),
    /// `SCORES <name:score:STATUS\n...>`: full leaderboard batch
    Scores(Vec<ScoreLine>),
    /// `BOARD <name>:<25 ints>`: a remote player's grid, column-major
    Board { name: String, cells: Vec<i32> },
    /// `MSG <name>:<text>`
    Msg { name: String, text: String },
    /// `HISCORES <name:score\n...>`: online high-score table
    HiScores(Vec<ScoreRecord>),
    /// `NEWSCORE`: an online high score was accepted
    NewScore,
    /// `START`: the channel's match has begun
    Start,
    /// `HOST`: this client hosts the channel
    Host,
    /// `JOIN <channel>`: this client joined a channel
    Joined(String),
    /// `NICK <name>`: the server confirmed a nickname
    Nick(String),
    /// `PARTED`: this client left the channel
    Parted,
    /// `ERROR <text>`
    Error(String),
}

impl InboundMessage {
    /// Protocol verb of the message
    pub fn verb(&self) -> &'static str {
        match self {
            InboundMessage::Piece(_) => "PIECE",
            InboundMessage::Scores(_) => "SCORES",
            InboundMessage::Board { .. } => "BOARD",
            InboundMessage::Msg { .. } => "MSG",
            InboundMessage::HiScores(_) => "HISCORES",
            InboundMessage::NewScore => "NEWSCORE",
            InboundMessage::Start => "START",
            InboundMessage::Host => "HOST",
            InboundMessage::Joined(_) => "JOIN",
            InboundMessage::Nick(_) => "NICK",
            InboundMessage::Parted => "PARTED",
            InboundMessage::Error(_) => "ERROR",
        }
    }
}

/// Messages sent to the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// `PIECE`: request one more piece
    PieceRequest,
    /// `BOARD <ints>`: the local grid, column-major
    Board(Vec<i32>),
    /// `SCORE <n>`: authoritative (pending) score
    Score(u32),
    /// `LIVES <n>`
    Lives(i32),
    /// `DIE`: the local player is eliminated
    Die,
    /// `MSG <text>`
    Msg(String),
    /// `SCORES`: request a leaderboard refresh
    ScoresRequest,
    /// `HISCORES`: request the online high-score table
    HiScoresRequest,
    /// `HISCORE <name>:<score>`: submit an online high score
    HiScore(ScoreRecord),
    Nick(String),
    Create(String),
    Join(String),
    Start,
    Part,
}

impl OutboundMessage {
    pub fn verb(&self) -> &'static str {
        match self {
            OutboundMessage::PieceRequest => "PIECE",
            OutboundMessage::Board(_) => "BOARD",
            OutboundMessage::Score(_) => "SCORE",
            OutboundMessage::Lives(_) => "LIVES",
            OutboundMessage::Die => "DIE",
            OutboundMessage::Msg(_) => "MSG",
            OutboundMessage::ScoresRequest => "SCORES",
            OutboundMessage::HiScoresRequest => "HISCORES",
            OutboundMessage::HiScore(_) => "HISCORE",
            OutboundMessage::Nick(_) => "NICK",
            OutboundMessage::Create(_) => "CREATE",
            OutboundMessage::Join(_) => "JOIN",
            OutboundMessage::Start => "START",
            OutboundMessage::Part => "PART",
        }
    }
}
