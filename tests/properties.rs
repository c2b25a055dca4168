//! Property tests for grid, rotation and scoring invariants

use proptest::prelude::*;

use tetrecs::core::{
    line_clear_score, timer_delay_ms, GameEvent, GamePiece, GameState, Grid, NetworkPieceQueue,
};
use tetrecs::types::{MIN_TIMER_MS, PIECE_COUNT};

fn piece_id() -> impl Strategy<Value = u8> {
    0..PIECE_COUNT
}

proptest! {
    #[test]
    fn rotation_has_period_four(id in piece_id(), steps in -20i32..20) {
        let piece = GamePiece::create(id).unwrap();
        prop_assert_eq!(piece.rotated(steps), piece.rotated(steps + 4));
        prop_assert_eq!(piece.rotated(steps).block_count(), piece.block_count());
    }

    #[test]
    fn fitting_piece_stays_inside(id in piece_id(), x in -2i32..7, y in -2i32..7) {
        let grid = Grid::new(5, 5);
        let piece = GamePiece::create(id).unwrap();
        if grid.can_play_piece(&piece, x, y) {
            for (dx, dy) in piece.occupied_offsets() {
                prop_assert!((0..5).contains(&(x + dx)));
                prop_assert!((0..5).contains(&(y + dy)));
            }
        }
    }

    #[test]
    fn play_writes_only_piece_cells(
        id in piece_id(),
        x in 0i32..5,
        y in 0i32..5,
        filled in prop::collection::vec((0i32..5, 0i32..5), 0..10),
    ) {
        let mut grid = Grid::new(5, 5);
        for (fx, fy) in filled {
            grid.set(fx, fy, 1);
        }
        let before = grid.clone();
        let piece = GamePiece::create(id).unwrap();
        if !grid.can_play_piece(&piece, x, y) {
            return Ok(());
        }

        grid.play_piece(&piece, x, y);
        for cx in 0..5 {
            for cy in 0..5 {
                if piece.is_occupied(cx - x, cy - y) {
                    prop_assert_eq!(grid.get(cx, cy), piece.value());
                } else {
                    prop_assert_eq!(grid.get(cx, cy), before.get(cx, cy));
                }
            }
        }
    }

    #[test]
    fn countdown_never_below_floor(level in 0u32..10_000) {
        let delay = timer_delay_ms(level);
        prop_assert!(delay >= MIN_TIMER_MS);
        prop_assert!(timer_delay_ms(level + 1) <= delay);
    }

    #[test]
    fn clear_score_formula(lines in 1u32..11, blocks in 1u32..26, multiplier in 1u32..50) {
        prop_assert_eq!(
            line_clear_score(lines, blocks, multiplier),
            lines * blocks * 10 * multiplier
        );
    }

    /// After any sequence of placements no full line survives, and the score
    /// is exactly the sum of the clears.
    #[test]
    fn placements_resolve_every_full_line(
        pieces in prop::collection::vec(piece_id(), 3..40),
        moves in prop::collection::vec((0i32..5, 0i32..5), 1..60),
    ) {
        let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces(pieces));
        prop_assert!(game.start());
        let mut points = 0;
        for (x, y) in moves {
            game.attempt_placement(x, y);
            for event in game.drain_events() {
                if let GameEvent::LinesCleared(clear) = event {
                    points += clear.points;
                }
            }
            prop_assert!(game.grid().full_lines().is_empty());
        }
        prop_assert_eq!(game.pending_score(), points);
        prop_assert_eq!(game.lives(), 3);
    }
}
