//! Single-player engine scenarios with scripted pieces

use tetrecs::core::{GameEvent, GameState, NetworkPieceQueue, PieceSlot, Placement};
use tetrecs::types::{MusicCue, Phase, SoundCue};

const LINE: u8 = 0;
const DOT: u8 = 3;

/// Engine fed only from `ids`, started
fn scripted(ids: &[u8]) -> GameState<NetworkPieceQueue> {
    let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces(ids.iter().copied()));
    assert!(game.start());
    game.drain_events();
    game
}

fn dots(n: usize) -> Vec<u8> {
    vec![DOT; n]
}

fn position(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().position(|e| pred(e)).unwrap()
}

#[test]
fn test_start_emits_music_pieces_and_timer() {
    let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces([LINE, DOT, DOT]));
    assert!(game.start());
    let events = game.drain_events();

    assert_eq!(events.first(), Some(&GameEvent::Music(MusicCue::Game)));
    assert!(events.contains(&GameEvent::PieceDrawn { id: LINE }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TimerReset { delay_ms: 12_000, .. })));
    assert_eq!(game.current().map(|p| p.id()), Some(LINE));
    assert_eq!(game.following().map(|p| p.id()), Some(DOT));
    assert_eq!(game.phase(), Phase::Running);

    // A second start is refused.
    assert!(!game.start());
}

#[test]
fn test_row_clear_scores_and_bumps_multiplier() {
    let mut game = scripted(&dots(8));
    for x in 0..4 {
        assert!(game.attempt_placement(x, 0).is_placed());
    }
    assert_eq!(game.pending_score(), 0);

    let Placement::Placed { clear, .. } = game.attempt_placement(4, 0) else {
        panic!("dot should fit");
    };
    let clear = clear.unwrap();
    assert_eq!(clear.lines, 1);
    assert_eq!(clear.blocks.len(), 5);
    assert_eq!(clear.points, 50);
    assert_eq!(clear.multiplier, 1);

    assert_eq!(game.pending_score(), 50);
    assert_eq!(game.score(), 0, "displayed score trails until settled");
    assert_eq!(game.multiplier(), 2);
    assert_eq!(game.grid().occupied_count(), 0);

    assert!(game.settle_score());
    assert_eq!(game.score(), 50);
}

#[test]
fn test_clear_events_in_order() {
    let mut game = scripted(&dots(8));
    for x in 0..4 {
        game.attempt_placement(x, 2);
    }
    game.drain_events();
    game.attempt_placement(4, 2);

    let events = game.drain_events();
    let placed = position(&events, |e| matches!(e, GameEvent::PiecePlaced { .. }));
    let cleared = position(&events, |e| matches!(e, GameEvent::LinesCleared(_)));
    let score = position(&events, |e| matches!(e, GameEvent::ScoreChanged { score: 50 }));
    let multiplier = position(&events, |e| {
        matches!(e, GameEvent::MultiplierChanged { multiplier: 2 })
    });
    let resolved = position(&events, |e| {
        matches!(e, GameEvent::PlacementResolved { lines: 1 })
    });
    assert!(placed < cleared);
    assert!(cleared < score);
    assert!(score < multiplier);
    assert!(multiplier < resolved);
    assert!(events.contains(&GameEvent::Sound(SoundCue::Clear)));
}

#[test]
fn test_missing_clear_resets_multiplier() {
    let mut game = scripted(&dots(10));
    for x in 0..5 {
        game.attempt_placement(x, 0);
    }
    assert_eq!(game.multiplier(), 2);

    game.attempt_placement(2, 2);
    assert_eq!(game.multiplier(), 1);
    assert_eq!(game.pending_score(), 50);
}

#[test]
fn test_column_clear_with_line_pieces() {
    // A vertical line and two dots fill column 1.
    let mut game = scripted(&[LINE, DOT, DOT, DOT]);
    assert!(game.attempt_placement(1, 1).is_placed());
    assert!(game.attempt_placement(1, 3).is_placed());
    assert!(!game.grid().is_column_full(1));
    assert!(game.attempt_placement(1, 4).is_placed());
    assert_eq!(game.pending_score(), 50);
    assert_eq!(game.grid().occupied_count(), 0);
}

#[test]
fn test_rejected_placement_changes_nothing() {
    let mut game = scripted(&dots(6));
    game.attempt_placement(2, 2);
    let before = game.snapshot();
    game.drain_events();

    assert_eq!(game.attempt_placement(2, 2), Placement::Rejected);
    assert_eq!(game.attempt_placement(-1, 0), Placement::Rejected);

    let after = game.snapshot();
    assert_eq!(before, after);
    let events = game.drain_events();
    assert_eq!(
        events,
        vec![
            GameEvent::PlacementRejected { x: 2, y: 2 },
            GameEvent::Sound(SoundCue::Fail),
            GameEvent::PlacementRejected { x: -1, y: 0 },
            GameEvent::Sound(SoundCue::Fail),
        ]
    );
}

#[test]
fn test_stale_timer_ticks_are_ignored() {
    let mut game = scripted(&dots(6));
    let stale = game.timer_generation();
    game.attempt_placement(0, 0);
    assert_ne!(game.timer_generation(), stale);

    assert!(!game.on_timer_expired(stale));
    assert_eq!(game.lives(), 3);
    assert!(game.on_timer_expired(game.timer_generation()));
    assert_eq!(game.lives(), 2);
}

#[test]
fn test_timer_expiry_discards_current_piece() {
    let mut game = scripted(&[LINE, DOT, DOT, DOT]);
    assert_eq!(game.current().map(|p| p.id()), Some(LINE));
    assert!(game.on_timer_expired(game.timer_generation()));
    assert_eq!(game.current().map(|p| p.id()), Some(DOT));
    assert_eq!(game.grid().occupied_count(), 0);
}

#[test]
fn test_losing_every_life_ends_the_game() {
    let mut game = scripted(&dots(10));
    for expected in [2, 1, 0] {
        assert!(game.on_timer_expired(game.timer_generation()));
        assert_eq!(game.lives(), expected);
        assert!(game.is_running());
    }
    game.drain_events();

    assert!(game.on_timer_expired(game.timer_generation()));
    assert_eq!(game.lives(), -1);
    assert_eq!(game.phase(), Phase::Ended);
    let events = game.drain_events();
    assert_eq!(events.last(), Some(&GameEvent::GameOver));
    assert!(events.contains(&GameEvent::Music(MusicCue::End)));

    assert_eq!(game.attempt_placement(2, 2), Placement::Inactive);
    assert!(!game.on_timer_expired(game.timer_generation()));
    assert!(!game.rotate_current_piece(1));
}

#[test]
fn test_rotate_and_swap() {
    let mut game = scripted(&[LINE, DOT, DOT]);
    assert!(game.rotate_current_piece(1));
    // A horizontal line no longer fits on the left edge.
    assert_eq!(game.attempt_placement(0, 2), Placement::Rejected);

    assert!(game.rotate_piece(PieceSlot::Following, 2));
    assert!(game.swap_current_and_next());
    assert_eq!(game.current().map(|p| p.id()), Some(DOT));
    assert_eq!(game.following().map(|p| p.id()), Some(LINE));
}

#[test]
fn test_level_shortens_countdown() {
    let mut game = scripted(&dots(4));
    // Every cell but the centre is filled; the dot clears everything.
    for x in 0..5 {
        for y in 0..5 {
            if (x, y) != (2, 2) {
                game.grid_mut().set(x, y, 1);
            }
        }
    }
    game.drain_events();
    game.attempt_placement(2, 2);
    assert_eq!(game.pending_score(), 2_500);
    assert_eq!(game.level(), 2);
    assert_eq!(game.timer_delay_ms(), 11_000);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::LevelChanged { level: 2 }));
    assert!(events.contains(&GameEvent::Sound(SoundCue::LevelUp)));
    assert!(events.contains(&GameEvent::TimerReset {
        generation: game.timer_generation(),
        delay_ms: 11_000
    }));
}

#[test]
fn test_end_is_a_tombstone() {
    let mut game = scripted(&dots(4));
    assert!(game.end());
    assert!(!game.end());
    assert!(game.is_ended());
    assert_eq!(game.attempt_placement(0, 0), Placement::Inactive);
}
