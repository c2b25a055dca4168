//! Game state module - the single-player state machine
//!
//! `Uninitialized -> Running -> Ended`. The engine owns the grid, the current
//! and following pieces, and the score/level/lives/multiplier counters. It
//! never sleeps or does I/O: the countdown is represented by a generation
//! number, and callers report an expired countdown through
//! [`GameState::on_timer_expired`]. Every observable change is queued as a
//! [`GameEvent`] for the runtime to drain.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::events::{GameEvent, LineClear};
use crate::grid::Grid;
use crate::pieces::GamePiece;
use crate::rng::PieceSource;
use crate::scoring::{level_for_score, line_clear_score, timer_delay_ms};
use crate::snapshot::GameSnapshot;
use crate::types::{
    MusicCue, Phase, SoundCue, ELIMINATED_LIVES, STARTING_LIVES, STARTING_MULTIPLIER,
};

/// Outcome of [`GameState::attempt_placement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The piece was committed; `clear` is set when lines were cleared
    Placed {
        piece: GamePiece,
        clear: Option<LineClear>,
    },
    /// The piece does not fit there; nothing changed
    Rejected,
    /// The game is not running
    Inactive,
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }
}

/// Which of the two visible pieces an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceSlot {
    Current,
    Following,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<S> {
    grid: Grid,
    source: S,
    current: Option<GamePiece>,
    following: Option<GamePiece>,
    /// Draws the source could not serve yet; filled by [`GameState::refill`]
    pending_draws: u32,
    phase: Phase,
    score: u32,
    pending_score: u32,
    level: u32,
    lives: i32,
    multiplier: u32,
    /// Identifies the live countdown; bumped on every restart and on end
    timer_generation: u64,
    events: VecDeque<GameEvent>,
}

impl<S: PieceSource> GameState<S> {
    /// Create a game on an empty `cols x rows` grid
    pub fn new(cols: u8, rows: u8, source: S) -> Self {
        Self {
            grid: Grid::new(cols, rows),
            source,
            current: None,
            following: None,
            pending_draws: 0,
            phase: Phase::Uninitialized,
            score: 0,
            pending_score: 0,
            level: 0,
            lives: STARTING_LIVES,
            multiplier: STARTING_MULTIPLIER,
            timer_generation: 0,
            events: VecDeque::new(),
        }
    }

    /// Start the game: spawn current and following piece and start the
    /// countdown.
    ///
    /// Returns false if the game already started or the piece source is not
    /// ready yet.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Uninitialized {
            return false;
        }
        if !self.source.is_ready() {
            debug!("piece source not ready, start deferred");
            return false;
        }
        self.phase = Phase::Running;
        self.push_event(GameEvent::Music(MusicCue::Game));
        for _ in 0..2 {
            if let Some(piece) = self.draw_piece() {
                self.accept_piece(piece);
            }
        }
        self.emit_next_piece();
        self.restart_timer();
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scenario setup; bypasses events and rules
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn current(&self) -> Option<&GamePiece> {
        self.current.as_ref()
    }

    pub fn following(&self) -> Option<&GamePiece> {
        self.following.as_ref()
    }

    /// Displayed score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Authoritative score, ahead of `score()` while the increment animates
    pub fn pending_score(&self) -> u32 {
        self.pending_score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    /// Countdown length at the current level
    pub fn timer_delay_ms(&self) -> u32 {
        timer_delay_ms(self.level)
    }

    /// Draws still owed by the piece source
    pub fn pending_draws(&self) -> u32 {
        self.pending_draws
    }

    /// Try to place the current piece centred on `(x, y)`.
    ///
    /// On success the piece is committed, lines are resolved and the
    /// following piece is promoted. A piece that does not fit only produces
    /// feedback events.
    pub fn attempt_placement(&mut self, x: i32, y: i32) -> Placement {
        if self.phase != Phase::Running {
            return Placement::Inactive;
        }
        let piece = match self.current {
            Some(piece) if self.grid.can_play_piece(&piece, x, y) => piece,
            _ => {
                trace!(x, y, "placement rejected");
                self.push_event(GameEvent::PlacementRejected { x, y });
                self.push_event(GameEvent::Sound(SoundCue::Fail));
                return Placement::Rejected;
            }
        };

        self.grid.play_piece(&piece, x, y);
        self.push_event(GameEvent::PiecePlaced { piece, x, y });
        self.push_event(GameEvent::Sound(SoundCue::Place));

        let clear = self.resolve_lines();
        self.push_event(GameEvent::PlacementResolved {
            lines: clear.as_ref().map_or(0, |c| c.lines),
        });
        self.advance_piece();
        Placement::Placed { piece, clear }
    }

    /// Clear every full row and column.
    ///
    /// Rows and columns are scanned independently and counted separately,
    /// while their cells are cleared as one deduplicated set. Points use the
    /// multiplier as it was before this clear increments it. Without a clear
    /// the multiplier drops back to 1. The countdown restarts either way.
    pub fn resolve_lines(&mut self) -> Option<LineClear> {
        let lines = self.grid.full_lines();
        let result = if lines.is_empty() {
            self.set_multiplier(STARTING_MULTIPLIER);
            None
        } else {
            let blocks = self.grid.cells_in(&lines);
            self.grid.clear_cells(&blocks);
            let count = lines.count() as u32;
            let multiplier = self.multiplier;
            let points = line_clear_score(count, blocks.len() as u32, multiplier);
            debug!(
                lines = count,
                blocks = blocks.len(),
                multiplier,
                points,
                "lines cleared"
            );
            let clear = LineClear {
                lines: count,
                blocks,
                points,
                multiplier,
            };
            self.push_event(GameEvent::LinesCleared(clear.clone()));
            self.push_event(GameEvent::Sound(SoundCue::Clear));
            self.add_score(points);
            self.set_multiplier(multiplier.saturating_add(1));
            Some(clear)
        };
        self.restart_timer();
        result
    }

    /// Handle an expired countdown.
    ///
    /// Ticks from an older generation (or after the game ended) are ignored
    /// and return false. Otherwise a life is lost; at `ELIMINATED_LIVES` the
    /// game ends, else the current piece is discarded, the multiplier resets
    /// and the countdown restarts.
    pub fn on_timer_expired(&mut self, generation: u64) -> bool {
        if self.phase != Phase::Running || generation != self.timer_generation {
            trace!(
                generation,
                live = self.timer_generation,
                "stale countdown tick ignored"
            );
            return false;
        }

        self.lives -= 1;
        self.push_event(GameEvent::LivesChanged { lives: self.lives });
        self.push_event(GameEvent::Sound(SoundCue::LifeLost));

        if self.lives <= ELIMINATED_LIVES {
            debug!("out of lives");
            self.finish();
            self.push_event(GameEvent::Sound(SoundCue::GameOver));
            self.push_event(GameEvent::Music(MusicCue::End));
            self.push_event(GameEvent::GameOver);
            return true;
        }

        self.advance_piece();
        self.set_multiplier(STARTING_MULTIPLIER);
        self.restart_timer();
        true
    }

    /// Rotate a visible piece by `steps` clockwise quarter turns.
    ///
    /// Does not consume a turn or touch the countdown.
    pub fn rotate_piece(&mut self, slot: PieceSlot, steps: i32) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let piece = match slot {
            PieceSlot::Current => self.current.as_mut(),
            PieceSlot::Following => self.following.as_mut(),
        };
        let Some(piece) = piece else {
            return false;
        };
        piece.rotate(steps);
        self.push_event(GameEvent::Sound(SoundCue::Rotate));
        self.emit_next_piece();
        true
    }

    pub fn rotate_current_piece(&mut self, steps: i32) -> bool {
        self.rotate_piece(PieceSlot::Current, steps)
    }

    /// Exchange current and following piece; no countdown effect
    pub fn swap_current_and_next(&mut self) -> bool {
        if self.phase != Phase::Running || self.current.is_none() || self.following.is_none() {
            return false;
        }
        std::mem::swap(&mut self.current, &mut self.following);
        self.push_event(GameEvent::Sound(SoundCue::Rotate));
        self.emit_next_piece();
        true
    }

    /// Serve draws the source could not satisfy earlier.
    ///
    /// Called after the source received new pieces.
    pub fn refill(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let mut changed = false;
        while self.pending_draws > 0 {
            let Some(piece) = self.source.draw() else {
                break;
            };
            self.pending_draws -= 1;
            self.push_event(GameEvent::PieceDrawn { id: piece.id() });
            self.accept_piece(piece);
            changed = true;
        }
        if changed {
            self.emit_next_piece();
        }
        changed
    }

    /// Let the displayed score catch up with the authoritative one
    pub fn settle_score(&mut self) -> bool {
        if self.score == self.pending_score {
            return false;
        }
        self.score = self.pending_score;
        true
    }

    /// Tear the game down; later ticks and commands are no-ops
    pub fn end(&mut self) -> bool {
        if self.phase == Phase::Ended {
            return false;
        }
        self.finish();
        true
    }

    /// Take the oldest queued event
    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cols = self.grid.cols();
        out.rows = self.grid.rows();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.revision = self.grid.revision();
        out.current = self.current;
        out.following = self.following;
        out.score = self.score;
        out.pending_score = self.pending_score;
        out.level = self.level;
        out.lives = self.lives;
        out.multiplier = self.multiplier;
        out.timer_delay_ms = self.timer_delay_ms();
        out.timer_generation = self.timer_generation;
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    fn emit_next_piece(&mut self) {
        self.push_event(GameEvent::NextPiece {
            current: self.current,
            following: self.following,
        });
    }

    fn draw_piece(&mut self) -> Option<GamePiece> {
        match self.source.draw() {
            Some(piece) => {
                self.push_event(GameEvent::PieceDrawn { id: piece.id() });
                Some(piece)
            }
            None => {
                self.pending_draws += 1;
                debug!(pending = self.pending_draws, "piece source ran dry");
                None
            }
        }
    }

    /// Put a freshly drawn piece into the first free slot, promoting the
    /// following piece if the current slot is empty
    fn accept_piece(&mut self, piece: GamePiece) {
        if self.current.is_none() {
            self.current = self.following.take();
        }
        if self.current.is_none() {
            self.current = Some(piece);
        } else {
            self.following = Some(piece);
        }
    }

    /// Promote following to current and draw a new following piece
    fn advance_piece(&mut self) {
        self.current = self.following.take();
        if let Some(piece) = self.draw_piece() {
            self.accept_piece(piece);
        }
        self.emit_next_piece();
    }

    fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.pending_score = self.pending_score.saturating_add(points);
        self.push_event(GameEvent::ScoreChanged {
            score: self.pending_score,
        });
        let level = level_for_score(self.pending_score);
        if level != self.level {
            self.level = level;
            self.push_event(GameEvent::LevelChanged { level });
            self.push_event(GameEvent::Sound(SoundCue::LevelUp));
        }
    }

    fn set_multiplier(&mut self, multiplier: u32) {
        if self.multiplier != multiplier {
            self.multiplier = multiplier;
            self.push_event(GameEvent::MultiplierChanged { multiplier });
        }
    }

    fn restart_timer(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.timer_generation += 1;
        self.push_event(GameEvent::TimerReset {
            generation: self.timer_generation,
            delay_ms: self.timer_delay_ms(),
        });
    }

    fn finish(&mut self) {
        self.phase = Phase::Ended;
        // Invalidate any countdown still in flight
        self.timer_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::NetworkPieceQueue;
    use crate::types::{GRID_COLS, GRID_ROWS};

    const DOT: u8 = 3;
    const LINE: u8 = 0;

    fn game_with(ids: &[u8]) -> GameState<NetworkPieceQueue> {
        let mut game = GameState::new(
            GRID_COLS,
            GRID_ROWS,
            NetworkPieceQueue::with_pieces(ids.iter().copied()),
        );
        assert!(game.start());
        game.drain_events();
        game
    }

    fn dots(n: usize) -> Vec<u8> {
        vec![DOT; n]
    }

    #[test]
    fn test_start_spawns_two_pieces_and_countdown() {
        let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces([1, 2, 3]));
        assert!(game.start());
        assert!(!game.start());
        assert_eq!(game.current().map(|p| p.id()), Some(1));
        assert_eq!(game.following().map(|p| p.id()), Some(2));
        assert_eq!(game.timer_generation(), 1);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::TimerReset {
            generation: 1,
            delay_ms: 12_000
        }));
        let drawn = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PieceDrawn { .. }))
            .count();
        assert_eq!(drawn, 2);
    }

    #[test]
    fn test_start_waits_for_source() {
        let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces([1, 2]));
        assert!(!game.start());
        assert_eq!(game.phase(), Phase::Uninitialized);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_rejected_placement_changes_nothing() {
        let mut game = game_with(&[LINE, DOT, DOT]);
        // Vertical line centred on the top row pokes out of the grid
        assert_eq!(game.attempt_placement(0, 0), Placement::Rejected);
        assert_eq!(game.grid().occupied_count(), 0);
        assert_eq!(game.current().map(|p| p.id()), Some(LINE));
        assert_eq!(game.timer_generation(), 1);
        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlacementRejected { x: 0, y: 0 },
                GameEvent::Sound(SoundCue::Fail)
            ]
        );
    }

    #[test]
    fn test_placement_advances_and_restarts_timer() {
        let mut game = game_with(&[LINE, DOT, 4, 5]);
        assert!(game.attempt_placement(2, 2).is_placed());
        assert_eq!(game.grid().get(2, 1), 1);
        assert_eq!(game.grid().get(2, 3), 1);
        assert_eq!(game.current().map(|p| p.id()), Some(DOT));
        assert_eq!(game.following().map(|p| p.id()), Some(4));
        assert_eq!(game.timer_generation(), 2);
    }

    #[test]
    fn test_single_row_clear_uses_pre_increment_multiplier() {
        let mut game = game_with(&dots(8));
        for x in 0..4 {
            assert!(game.attempt_placement(x, 0).is_placed());
        }
        let Placement::Placed { clear, .. } = game.attempt_placement(4, 0) else {
            panic!("dot fits");
        };
        let clear = clear.expect("row 0 is full");
        assert_eq!(clear.lines, 1);
        assert_eq!(clear.blocks.len(), 5);
        assert_eq!(clear.points, 50);
        assert_eq!(game.pending_score(), 50);
        assert_eq!(game.multiplier(), 2);
        assert_eq!(game.grid().occupied_count(), 0);
    }

    #[test]
    fn test_row_and_column_share_one_cell() {
        let mut game = game_with(&dots(12));
        for x in 0..4 {
            assert!(game.attempt_placement(x, 0).is_placed());
        }
        for y in 1..5 {
            assert!(game.attempt_placement(4, y).is_placed());
        }
        let Placement::Placed { clear, .. } = game.attempt_placement(4, 0) else {
            panic!("dot fits");
        };
        let clear = clear.expect("row and column full");
        assert_eq!(clear.lines, 2);
        assert_eq!(clear.blocks.len(), 9);
        assert_eq!(clear.points, 2 * 9 * 10);
        assert_eq!(game.grid().occupied_count(), 0);
    }

    #[test]
    fn test_consecutive_clears_grow_multiplier() {
        let mut game = game_with(&dots(6));
        for y in 0..2u8 {
            for x in 0..4u8 {
                game.grid_mut().set(x as i32, y as i32, 1);
            }
        }
        game.attempt_placement(4, 0);
        assert_eq!(game.multiplier(), 2);
        game.attempt_placement(4, 1);
        assert_eq!(game.multiplier(), 3);
        // 1*5*10*1 + 1*5*10*2
        assert_eq!(game.pending_score(), 150);

        game.attempt_placement(2, 2);
        assert_eq!(game.multiplier(), 1);
    }

    #[test]
    fn test_level_tracks_pending_score() {
        let mut game = game_with(&dots(4));
        for y in 0..5u8 {
            for x in 0..5u8 {
                if (x, y) != (2, 2) {
                    game.grid_mut().set(x as i32, y as i32, 1);
                }
            }
        }
        // Completes all 5 rows and 5 columns: 10 lines * 25 blocks * 10
        game.attempt_placement(2, 2);
        assert_eq!(game.pending_score(), 2500);
        assert_eq!(game.level(), 2);
        assert_eq!(game.timer_delay_ms(), 11_000);
        assert!(game
            .drain_events()
            .contains(&GameEvent::LevelChanged { level: 2 }));

        assert_eq!(game.score(), 0);
        assert!(game.settle_score());
        assert_eq!(game.score(), 2500);
        assert!(!game.settle_score());
    }

    #[test]
    fn test_timer_expiry_costs_a_life() {
        let mut game = game_with(&[1, 2, 3, 4]);
        game.attempt_placement(2, 2);
        game.drain_events();

        let generation = game.timer_generation();
        assert!(game.on_timer_expired(generation));
        assert_eq!(game.lives(), 2);
        assert_eq!(game.multiplier(), 1);
        assert_eq!(game.current().map(|p| p.id()), Some(3));
        assert_eq!(game.timer_generation(), generation + 1);

        // A tick from the replaced countdown is harmless
        assert!(!game.on_timer_expired(generation));
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn test_out_of_lives_ends_once() {
        let mut game = game_with(&dots(10));
        for _ in 0..3 {
            let generation = game.timer_generation();
            assert!(game.on_timer_expired(generation));
        }
        assert_eq!(game.lives(), 0);
        game.drain_events();

        let generation = game.timer_generation();
        assert!(game.on_timer_expired(generation));
        assert_eq!(game.lives(), -1);
        assert!(game.is_ended());

        let events = game.drain_events();
        let game_overs = events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(game_overs, 1);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::TimerReset { .. })));

        assert!(!game.on_timer_expired(game.timer_generation()));
        assert_eq!(game.attempt_placement(2, 2), Placement::Inactive);
    }

    #[test]
    fn test_rotate_and_swap_leave_timer_alone() {
        let mut game = game_with(&[LINE, DOT, DOT]);
        let generation = game.timer_generation();
        assert!(game.rotate_current_piece(1));
        // Horizontal now, so it fits on the top row
        assert!(game.attempt_placement(2, 0).is_placed());
        assert_eq!(game.grid().get(1, 0), 1);

        let generation = generation + 1;
        assert_eq!(game.timer_generation(), generation);
        assert!(game.swap_current_and_next());
        assert_eq!(game.timer_generation(), generation);
    }

    #[test]
    fn test_underrun_is_refilled() {
        let mut game = game_with(&[1, 2, 3]);
        assert!(game.attempt_placement(1, 1).is_placed());
        assert!(game.attempt_placement(3, 3).is_placed());
        assert_eq!(game.current().map(|p| p.id()), Some(3));
        assert!(game.following().is_none());
        assert_eq!(game.pending_draws(), 1);

        game.source_mut().push(9);
        assert!(game.refill());
        assert_eq!(game.following().map(|p| p.id()), Some(9));
        assert_eq!(game.pending_draws(), 0);
    }

    #[test]
    fn test_end_is_tombstone() {
        let mut game = game_with(&dots(3));
        let generation = game.timer_generation();
        assert!(game.end());
        assert!(!game.end());
        assert!(!game.on_timer_expired(generation));
        assert!(!game.rotate_current_piece(1));
        assert!(!game.swap_current_and_next());
        assert_eq!(game.attempt_placement(2, 2), Placement::Inactive);
    }
}
