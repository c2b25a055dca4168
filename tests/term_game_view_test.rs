use tetrecs::core::{
    GameSnapshot, GameState, Grid, LeaderboardEntry, MultiplayerSnapshot, NetworkPieceQueue,
    RemoteBoard,
};
use tetrecs::term::{block_color, changed_runs, Canvas, GameView, Overlay, Viewport};
use tetrecs::types::LifeStatus;

fn render(
    view: &GameView,
    snap: &GameSnapshot,
    multi: Option<&MultiplayerSnapshot>,
    overlay: &Overlay<'_>,
) -> Canvas {
    let mut canvas = Canvas::new(0, 0);
    view.render_into(snap, multi, overlay, Viewport::new(100, 30), &mut canvas);
    canvas
}

fn screen_text(canvas: &Canvas) -> String {
    (0..canvas.height())
        .map(|y| canvas.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn term_view_frames_the_grid() {
    let snap = GameSnapshot::default();
    let view = GameView::new(2, 1);
    let canvas = render(&view, &snap, None, &Overlay::default());

    // 5 cells * 2 wide + border, placed at (1, 2).
    assert_eq!(view.board_extent(&snap), (12, 7));
    assert_eq!(canvas.get(1, 2).unwrap().ch, '┌');
    assert_eq!(canvas.get(12, 2).unwrap().ch, '┐');
    assert_eq!(canvas.get(1, 8).unwrap().ch, '└');
    assert_eq!(canvas.get(12, 8).unwrap().ch, '┘');
}

#[test]
fn term_view_marks_aim_cell() {
    let mut game = GameState::new(5, 5, NetworkPieceQueue::with_pieces([3, 3, 3]));
    game.start();
    let snap = game.snapshot();
    let view = GameView::new(2, 1);
    let overlay = Overlay {
        aim: Some((4, 0)),
        ..Overlay::default()
    };
    let canvas = render(&view, &snap, None, &overlay);
    // Cell (4, 0): x = 1 + 1 + 4 * 2, y = 2 + 1.
    assert_eq!(canvas.get(10, 3).unwrap().ch, '▒');
    assert_eq!(canvas.get(11, 3).unwrap().ch, '▒');
}

#[test]
fn term_view_shows_multiplayer_panel() {
    let mut remote = Grid::new(5, 5);
    remote.set(0, 0, 7);
    let multi = MultiplayerSnapshot {
        leaderboard: vec![
            LeaderboardEntry {
                name: "ann".into(),
                score: 120,
                status: LifeStatus::Alive,
            },
            LeaderboardEntry {
                name: "bob".into(),
                score: 40,
                status: LifeStatus::Dead,
            },
        ],
        remote_boards: vec![RemoteBoard {
            name: "ann".into(),
            grid: remote,
        }],
        chat: Some("bob: gg".into()),
        chat_history: vec!["bob: gg".into()],
        pieces_awaited: 2,
    };
    let snap = GameSnapshot::default();
    let canvas = render(&GameView::default(), &snap, Some(&multi), &Overlay::default());
    let text = screen_text(&canvas);

    assert!(text.contains("Leaderboard"));
    assert!(text.contains("1. ann"));
    assert!(text.contains("2. bob"));
    assert!(text.contains("bob: gg"));
    assert!(text.contains("Waiting for 2 piece(s)"));

    let coloured = (0..canvas.height()).any(|y| {
        (0..canvas.width()).any(|x| canvas.get(x, y).unwrap().style.bg == block_color(7).unwrap())
    });
    assert!(coloured);
}

#[test]
fn term_view_shows_open_chat_prompt() {
    let multi = MultiplayerSnapshot::default();
    let snap = GameSnapshot::default();
    let overlay = Overlay {
        chat_prompt: Some("hello"),
        ..Overlay::default()
    };
    let canvas = render(&GameView::default(), &snap, Some(&multi), &overlay);
    assert!(screen_text(&canvas).contains("> hello"));
}

#[test]
fn unchanged_frames_produce_no_runs() {
    let snap = GameSnapshot::default();
    let view = GameView::default();
    let a = render(&view, &snap, None, &Overlay::default());
    let b = render(&view, &snap, None, &Overlay::default());
    assert!(changed_runs(&a, &b).is_empty());

    let mut moved = snap.clone();
    moved.score = 10;
    moved.pending_score = 10;
    let c = render(&view, &moved, None, &Overlay::default());
    let runs = changed_runs(&a, &c);
    assert!(!runs.is_empty());
    assert!(runs.iter().all(|&(_, y, _)| y == 0), "only the HUD row changes");
}
