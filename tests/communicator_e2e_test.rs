//! Communicator against a loopback WebSocket server

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use tetrecs::adapter::{ClientConfig, Communicator};
use tetrecs::core::MultiplayerGame;
use tetrecs::engine::{MuteMedia, Session};
use tetrecs::types::{InboundMessage, LifeStatus, OutboundMessage, ScoreLine};

/// Accept one client; frames it sends come out of the returned receiver and
/// frames pushed into the returned sender go to it.
async fn spawn_server() -> (
    String,
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedSender<String>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (mut write, mut read) = ws.split();
        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let _ = seen_tx.send(text.to_string());
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                },
                push = push_rx.recv() => match push {
                    Some(text) => {
                        if write.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    });

    (url, seen_rx, push_tx)
}

async fn next_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("server gone")
}

async fn next_message(comm: &mut Communicator) -> InboundMessage {
    timeout(Duration::from_secs(5), comm.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("connection gone")
}

#[tokio::test]
async fn test_round_trip_and_malformed_frames() {
    let (url, mut seen, push) = spawn_server().await;
    let mut comm = Communicator::connect(ClientConfig::default().with_url(url))
        .await
        .unwrap();
    assert!(comm.is_connected());

    assert!(comm.send(OutboundMessage::Nick("ann".into())));
    assert_eq!(next_frame(&mut seen).await, "NICK ann");

    // Multi-line payloads travel in one frame.
    push.send("SCORES ann:10:alive\nbob:5:dead".into()).unwrap();
    assert_eq!(
        next_message(&mut comm).await,
        InboundMessage::Scores(vec![
            ScoreLine::new("ann", 10, LifeStatus::Alive),
            ScoreLine::new("bob", 5, LifeStatus::Dead),
        ])
    );

    // Garbage is dropped; the connection survives.
    push.send("BOARD nobody:1 2 3".into()).unwrap();
    push.send("WHAT".into()).unwrap();
    push.send("PIECE 4".into()).unwrap();
    assert_eq!(next_message(&mut comm).await, InboundMessage::Piece(4));
    assert!(comm.is_connected());
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = Communicator::connect(ClientConfig::default().with_url(url)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_session_drives_a_match_over_the_wire() {
    let (url, mut seen, push) = spawn_server().await;
    let mut comm = Communicator::connect(ClientConfig::default().with_url(url))
        .await
        .unwrap();
    let session = Session::spawn_connected(MultiplayerGame::new(), MuteMedia, comm.sender());

    let opening = [
        next_frame(&mut seen).await,
        next_frame(&mut seen).await,
        next_frame(&mut seen).await,
        next_frame(&mut seen).await,
    ];
    assert_eq!(opening, ["PIECE", "PIECE", "PIECE", "SCORES"]);
    let board = next_frame(&mut seen).await;
    assert!(board.starts_with("BOARD 0 "));

    for _ in 0..3 {
        push.send("PIECE 3".into()).unwrap();
    }
    for _ in 0..3 {
        let message = next_message(&mut comm).await;
        session.deliver(message);
    }
    // Start draws two pieces and asks for two more.
    assert_eq!(next_frame(&mut seen).await, "PIECE");
    assert_eq!(next_frame(&mut seen).await, "PIECE");

    session.command(tetrecs::types::GameCommand::Place { x: 0, y: 0 });
    assert_eq!(next_frame(&mut seen).await.split(' ').nth(1), Some("4"));
    assert_eq!(next_frame(&mut seen).await, "PIECE");
}
