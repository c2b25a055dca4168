//! Multiplayer module - a shared match on top of [`GameState`]
//!
//! [`MultiplayerGame`] wraps a `GameState<NetworkPieceQueue>` instead of
//! overriding it: the engine stays the same, pieces come from the server
//! queue, and the engine's events are relayed into outbound protocol
//! messages:
//!
//! | Engine event | Outbound |
//! |--------------|----------|
//! | `PieceDrawn` | `PIECE` |
//! | `PlacementResolved` | `BOARD <cells>` |
//! | `ScoreChanged` | `SCORE <pending score>` |
//! | `LivesChanged` (still alive) | `LIVES <n>` |
//! | `GameOver` | `DIE` |
//!
//! Inbound leaderboard, board and chat updates are applied through the same
//! `&mut self`, so they never interleave with a local placement. Once the
//! player is eliminated or leaves, the match is closed and every later
//! update is dropped.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::events::GameEvent;
use crate::game_state::{GameState, Placement};
use crate::grid::Grid;
use crate::rng::NetworkPieceQueue;
use crate::snapshot::{GameSnapshot, MultiplayerSnapshot};
use crate::types::{
    InboundMessage, LifeStatus, OutboundMessage, Phase, ScoreLine, SoundCue, CHAT_HISTORY,
    ELIMINATED_LIVES, GRID_COLS, GRID_ROWS, INITIAL_PIECE_FILL, LEADERBOARD_SIZE,
    REMOTE_BOARD_SLOTS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub status: LifeStatus,
}

impl From<ScoreLine> for LeaderboardEntry {
    fn from(line: ScoreLine) -> Self {
        Self {
            name: line.name,
            score: line.score,
            status: line.status,
        }
    }
}

/// Top-5 leaderboard, highest score first
///
/// Name, score and life status live in one entry, so statuses always follow
/// the name order.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: ArrayVec<LeaderboardEntry, LEADERBOARD_SIZE>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the board with a new batch: sorted by score descending, ties
    /// kept in received order, truncated to the top 5
    pub fn update(&mut self, lines: Vec<ScoreLine>) {
        let mut entries: Vec<LeaderboardEntry> = lines.into_iter().map(Into::into).collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries = entries.into_iter().take(LEADERBOARD_SIZE).collect();
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn statuses(&self) -> impl Iterator<Item = LifeStatus> + '_ {
        self.entries.iter().map(|e| e.status)
    }

    /// Rank of `name`, 0 = leader
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mirrored grid of another player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBoard {
    pub name: String,
    pub grid: Grid,
}

/// Remote boards for the current top 3 of the leaderboard
#[derive(Debug, Clone, Default)]
pub struct RemoteBoards {
    slots: ArrayVec<RemoteBoard, REMOTE_BOARD_SLOTS>,
}

impl RemoteBoards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[RemoteBoard] {
        &self.slots
    }

    pub fn get(&self, name: &str) -> Option<&RemoteBoard> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Re-seat the slots on the leaderboard's top 3, keeping boards of
    /// players that stay and giving newcomers a blank grid.
    ///
    /// Returns whether the slot order or membership changed.
    pub fn align(&mut self, leaderboard: &Leaderboard) -> bool {
        let wanted: Vec<&str> = leaderboard.names().take(REMOTE_BOARD_SLOTS).collect();
        let current: Vec<&str> = self.slots.iter().map(|s| s.name.as_str()).collect();
        if wanted == current {
            return false;
        }

        let mut previous = std::mem::take(&mut self.slots);
        for name in wanted {
            let board = match previous.iter().position(|slot| slot.name == name) {
                Some(idx) => previous.remove(idx),
                None => RemoteBoard {
                    name: name.to_string(),
                    grid: Grid::new(GRID_COLS, GRID_ROWS),
                },
            };
            self.slots.push(board);
        }
        true
    }

    /// Store a board snapshot for `name`.
    ///
    /// Slots are re-aligned to the leaderboard first. A player outside the
    /// top 3, or a snapshot that is not a valid 5x5 board, changes nothing.
    pub fn apply(&mut self, leaderboard: &Leaderboard, name: &str, cells: &[i32]) -> bool {
        self.align(leaderboard);
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.name == name) else {
            trace!(name, "board for player outside the top slots ignored");
            return false;
        };
        match Grid::from_column_major(GRID_COLS, GRID_ROWS, cells) {
            Some(grid) => {
                slot.grid = grid;
                true
            }
            None => {
                debug!(name, len = cells.len(), "malformed remote board ignored");
                false
            }
        }
    }
}

/// Chat history with the newest line kept for the HUD
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    history: VecDeque<String>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, text: &str) {
        if self.history.len() == CHAT_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(format!("{name}: {text}"));
    }

    /// Newest line, `"name: text"`
    pub fn latest(&self) -> Option<&str> {
        self.history.back().map(String::as_str)
    }

    /// Oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Client side of a shared multiplayer match
#[derive(Debug)]
pub struct MultiplayerGame {
    game: GameState<NetworkPieceQueue>,
    leaderboard: Leaderboard,
    remote_boards: RemoteBoards,
    chat: ChatLog,
    outbox: VecDeque<OutboundMessage>,
    events: VecDeque<GameEvent>,
    /// Set on elimination or leave; later updates are dropped
    closed: bool,
}

impl MultiplayerGame {
    pub fn new() -> Self {
        Self {
            game: GameState::new(GRID_COLS, GRID_ROWS, NetworkPieceQueue::new()),
            leaderboard: Leaderboard::new(),
            remote_boards: RemoteBoards::new(),
            chat: ChatLog::new(),
            outbox: VecDeque::new(),
            events: VecDeque::new(),
            closed: false,
        }
    }

    /// Ask for the initial pieces and a leaderboard, and announce an empty
    /// board. The engine starts once the pieces arrive.
    pub fn begin(&mut self) {
        if self.closed {
            return;
        }
        for _ in 0..INITIAL_PIECE_FILL {
            self.outbox.push_back(OutboundMessage::PieceRequest);
        }
        self.outbox.push_back(OutboundMessage::ScoresRequest);
        self.outbox
            .push_back(OutboundMessage::Board(self.game.grid().to_column_major()));
    }

    pub fn game(&self) -> &GameState<NetworkPieceQueue> {
        &self.game
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn remote_boards(&self) -> &RemoteBoards {
        &self.remote_boards
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply one server message. Returns whether visible state changed.
    pub fn handle_inbound(&mut self, message: InboundMessage) -> bool {
        if self.closed {
            trace!(verb = message.verb(), "match closed, inbound dropped");
            return false;
        }
        let changed = match message {
            InboundMessage::Piece(id) => self.receive_piece(id),
            InboundMessage::Scores(lines) => self.update_leaderboard(lines),
            InboundMessage::Board { name, cells } => self.update_remote_board(&name, &cells),
            InboundMessage::Msg { name, text } => {
                self.chat.push(&name, &text);
                self.events.push_back(GameEvent::ChatReceived { name, text });
                self.events.push_back(GameEvent::Sound(SoundCue::Message));
                true
            }
            InboundMessage::HiScores(records) => {
                self.events.push_back(GameEvent::OnlineScores(records));
                false
            }
            other => {
                trace!(verb = other.verb(), "not a match message");
                false
            }
        };
        self.relay();
        changed
    }

    fn receive_piece(&mut self, id: u8) -> bool {
        if !self.game.source_mut().push(id) {
            debug!(id, "piece id out of range ignored");
            return false;
        }
        match self.game.phase() {
            Phase::Uninitialized => self.game.start(),
            Phase::Running => self.game.refill(),
            Phase::Ended => false,
        }
    }

    /// Replace the leaderboard and re-seat the remote boards. An empty batch
    /// is ignored; the local player is always listed.
    pub fn update_leaderboard(&mut self, lines: Vec<ScoreLine>) -> bool {
        if self.closed {
            return false;
        }
        if lines.is_empty() {
            debug!("empty leaderboard batch ignored");
            return false;
        }
        self.leaderboard.update(lines);
        self.events.push_back(GameEvent::LeaderboardChanged);
        if self.remote_boards.align(&self.leaderboard) {
            self.events.push_back(GameEvent::RemoteBoardsChanged);
        }
        true
    }

    /// Mirror a remote player's board if they are in the top 3
    pub fn update_remote_board(&mut self, name: &str, cells: &[i32]) -> bool {
        if self.closed {
            return false;
        }
        let applied = self.remote_boards.apply(&self.leaderboard, name, cells);
        if applied {
            self.events.push_back(GameEvent::RemoteBoardsChanged);
        }
        applied
    }

    pub fn place(&mut self, x: i32, y: i32) -> Placement {
        if self.closed {
            return Placement::Inactive;
        }
        let placement = self.game.attempt_placement(x, y);
        self.relay();
        placement
    }

    pub fn rotate(&mut self, steps: i32) -> bool {
        let rotated = !self.closed && self.game.rotate_current_piece(steps);
        self.relay();
        rotated
    }

    pub fn swap(&mut self) -> bool {
        let swapped = !self.closed && self.game.swap_current_and_next();
        self.relay();
        swapped
    }

    /// Queue a chat line; blank lines are not sent
    pub fn send_chat(&mut self, text: &str) -> bool {
        let text = text.trim();
        if self.closed || text.is_empty() {
            return false;
        }
        self.outbox.push_back(OutboundMessage::Msg(text.to_string()));
        true
    }

    pub fn timer_expired(&mut self, generation: u64) -> bool {
        if self.closed {
            return false;
        }
        let applied = self.game.on_timer_expired(generation);
        self.relay();
        applied
    }

    /// Runs after close too: teardown settles the final score.
    pub fn settle_score(&mut self) -> bool {
        self.game.settle_score()
    }

    /// Leave the match: the local player counts as eliminated
    pub fn leave(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.game.end();
        self.relay();
        self.closed = true;
        self.outbox.push_back(OutboundMessage::Die);
        true
    }

    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn poll_outbound(&mut self) -> Option<OutboundMessage> {
        self.outbox.pop_front()
    }

    pub fn drain_outbound(&mut self) -> Vec<OutboundMessage> {
        self.outbox.drain(..).collect()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    pub fn multiplayer_snapshot(&self) -> MultiplayerSnapshot {
        let pieces_awaited = match self.game.phase() {
            Phase::Uninitialized => {
                INITIAL_PIECE_FILL.saturating_sub(self.game.source().received())
            }
            _ => 0,
        };
        MultiplayerSnapshot {
            leaderboard: self.leaderboard.entries().to_vec(),
            remote_boards: self.remote_boards.slots().to_vec(),
            chat: self.chat.latest().map(str::to_string),
            chat_history: self.chat.history().map(str::to_string).collect(),
            pieces_awaited,
        }
    }

    /// Move engine events to our queue, turning the relevant ones into
    /// protocol messages
    fn relay(&mut self) {
        while let Some(event) = self.game.poll_event() {
            match &event {
                GameEvent::PieceDrawn { .. } => {
                    self.outbox.push_back(OutboundMessage::PieceRequest);
                }
                GameEvent::PlacementResolved { .. } => {
                    self.outbox
                        .push_back(OutboundMessage::Board(self.game.grid().to_column_major()));
                }
                GameEvent::ScoreChanged { score } => {
                    self.outbox.push_back(OutboundMessage::Score(*score));
                }
                GameEvent::LivesChanged { lives } if *lives > ELIMINATED_LIVES => {
                    self.outbox.push_back(OutboundMessage::Lives(*lives));
                }
                GameEvent::GameOver => {
                    self.outbox.push_back(OutboundMessage::Die);
                    self.closed = true;
                }
                _ => {}
            }
            self.events.push_back(event);
        }
    }
}

impl Default for MultiplayerGame {
    fn default() -> Self {
        Self::new()
    }
}
