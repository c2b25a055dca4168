//! Session actor - the single mutation point of a running game
//!
//! A session owns one [`GameMode`] inside a tokio task. Commands from the
//! keyboard, messages from the server, countdown ticks and score settling
//! all arrive on one input channel and are applied one at a time, so a
//! leaderboard update can never interleave with a local placement.
//!
//! After every input the actor drains the mode:
//!
//! - `TimerReset` re-arms the [`Countdown`]
//! - `ScoreChanged` schedules a `SettleScore` input `SCORE_ANIMATION_MS` later
//! - sound and music cues go to the [`MediaSink`]
//! - outbound protocol messages go to the server connection, if any
//! - every event is forwarded to the front-end
//!
//! and publishes a fresh [`SessionSnapshot`] on a watch channel.
//!
//! Shutdown (or the mode ending) is a tombstone: the countdown is aborted,
//! the final snapshot is published and the task exits without applying
//! anything queued behind it.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, trace, warn};

use crate::core::{GameEvent, GameMode, GameSnapshot, MultiplayerSnapshot};
use crate::countdown::Countdown;
use crate::media::MediaSink;
use crate::types::{GameCommand, InboundMessage, OutboundMessage, SCORE_ANIMATION_MS};

/// Everything that can drive a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Command(GameCommand),
    Inbound(InboundMessage),
    TimerFired { generation: u64 },
    SettleScore,
    Shutdown,
}

/// Latest published state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub game: GameSnapshot,
    pub multiplayer: Option<MultiplayerSnapshot>,
    /// Set on the final snapshot
    pub closed: bool,
}

pub struct Session<M, K> {
    mode: M,
    media: K,
    countdown: Countdown,
    settle_task: Option<JoinHandle<()>>,
    /// Weak so that dropping every handle ends the actor
    self_tx: mpsc::WeakUnboundedSender<SessionInput>,
    input_rx: mpsc::UnboundedReceiver<SessionInput>,
    outbound: Option<mpsc::UnboundedSender<OutboundMessage>>,
    events_tx: mpsc::UnboundedSender<GameEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    closed: bool,
}

impl<M: GameMode + 'static, K: MediaSink> Session<M, K> {
    /// Start a session without a server connection.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(mode: M, media: K) -> SessionHandle {
        Self::spawn_inner(mode, media, None)
    }

    /// Start a session whose outbound messages go to `outbound`.
    pub fn spawn_connected(
        mode: M,
        media: K,
        outbound: mpsc::UnboundedSender<OutboundMessage>,
    ) -> SessionHandle {
        Self::spawn_inner(mode, media, Some(outbound))
    }

    fn spawn_inner(
        mode: M,
        media: K,
        outbound: Option<mpsc::UnboundedSender<OutboundMessage>>,
    ) -> SessionHandle {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let initial = SessionSnapshot {
            game: mode.snapshot(),
            multiplayer: mode.multiplayer_snapshot(),
            closed: false,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let session = Session {
            mode,
            media,
            countdown: Countdown::new(),
            settle_task: None,
            self_tx: input_tx.downgrade(),
            input_rx,
            outbound,
            events_tx,
            snapshot_tx,
            closed: false,
        };
        let task = tokio::spawn(session.run());

        SessionHandle {
            input_tx,
            snapshot_rx,
            events_rx,
            task,
        }
    }

    async fn run(mut self) {
        self.mode.start();
        self.pump();
        self.check_ended();
        self.publish();

        while !self.closed {
            let Some(input) = self.input_rx.recv().await else {
                debug!("all session handles dropped");
                break;
            };
            self.apply(input);
        }
        self.teardown();
    }

    fn apply(&mut self, input: SessionInput) {
        trace!(?input, "session input");
        let changed = match input {
            SessionInput::Command(command) => {
                debug!(%command, "command");
                self.mode.apply_command(command)
            }
            SessionInput::Inbound(message) => self.mode.handle_inbound(message),
            SessionInput::TimerFired { generation } => self.mode.timer_expired(generation),
            SessionInput::SettleScore => self.mode.settle_score(),
            SessionInput::Shutdown => {
                info!("session shutdown requested");
                self.mode.shutdown();
                self.closed = true;
                true
            }
        };
        let events = self.pump();
        self.check_ended();
        if changed || events > 0 {
            self.publish();
        }
    }

    /// Route queued events and outbound messages; returns the event count
    fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.mode.poll_event() {
            count += 1;
            match &event {
                GameEvent::TimerReset {
                    generation,
                    delay_ms,
                } => self.arm_countdown(*generation, *delay_ms),
                GameEvent::ScoreChanged { .. } => self.schedule_settle(),
                GameEvent::GameOver => {
                    self.countdown.cancel();
                }
                GameEvent::Sound(cue) => self.media.play_sound(*cue),
                GameEvent::Music(cue) => self.media.play_music(*cue),
                _ => {}
            }
            let _ = self.events_tx.send(event);
        }

        while let Some(message) = self.mode.poll_outbound() {
            match &self.outbound {
                Some(tx) => {
                    if tx.send(message).is_err() {
                        warn!("server connection gone, outbound dropped");
                    }
                }
                None => trace!(verb = message.verb(), "offline, outbound dropped"),
            }
        }
        count
    }

    fn arm_countdown(&mut self, generation: u64, delay_ms: u32) {
        if self.closed {
            return;
        }
        let tx = self.self_tx.clone();
        self.countdown.restart(
            generation,
            Duration::from_millis(delay_ms as u64),
            move |generation| {
                if let Some(tx) = tx.upgrade() {
                    let _ = tx.send(SessionInput::TimerFired { generation });
                }
            },
        );
    }

    fn schedule_settle(&mut self) {
        if self.closed {
            return;
        }
        if let Some(task) = self.settle_task.take() {
            task.abort();
        }
        let tx = self.self_tx.clone();
        self.settle_task = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(SCORE_ANIMATION_MS as u64)).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(SessionInput::SettleScore);
            }
        }));
    }

    fn check_ended(&mut self) {
        if self.mode.is_ended() && !self.closed {
            info!("game ended");
            self.closed = true;
        }
    }

    fn publish(&mut self) {
        let snapshot = SessionSnapshot {
            game: self.mode.snapshot(),
            multiplayer: self.mode.multiplayer_snapshot(),
            closed: self.closed,
        };
        self.snapshot_tx.send_replace(snapshot);
    }

    fn teardown(&mut self) {
        self.closed = true;
        self.countdown.cancel();
        if let Some(task) = self.settle_task.take() {
            task.abort();
        }
        // The final score is shown as it stands, without animation
        self.mode.settle_score();
        self.pump();
        self.publish();
        info!("session closed");
    }
}

/// Caller side of a running session
pub struct SessionHandle {
    input_tx: mpsc::UnboundedSender<SessionInput>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    events_rx: mpsc::UnboundedReceiver<GameEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue an input; false once the session has exited
    pub fn send(&self, input: SessionInput) -> bool {
        self.input_tx.send(input).is_ok()
    }

    pub fn command(&self, command: GameCommand) -> bool {
        self.send(SessionInput::Command(command))
    }

    pub fn deliver(&self, message: InboundMessage) -> bool {
        self.send(SessionInput::Inbound(message))
    }

    pub fn shutdown(&self) -> bool {
        self.send(SessionInput::Shutdown)
    }

    /// Extra sender, e.g. for a task forwarding server messages
    pub fn input(&self) -> mpsc::UnboundedSender<SessionInput> {
        self.input_tx.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn try_event(&mut self) -> Option<GameEvent> {
        self.events_rx.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<GameEvent> {
        self.events_rx.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }
}
