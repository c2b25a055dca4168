//! The seam between the runtime and a game flavour
//!
//! The session actor drives any [`GameMode`] the same way: apply an input,
//! then drain events and outbound messages until both queues are empty.

use crate::events::GameEvent;
use crate::game_state::GameState;
use crate::multiplayer::MultiplayerGame;
use crate::rng::PieceSource;
use crate::snapshot::{GameSnapshot, MultiplayerSnapshot};
use crate::types::{GameCommand, InboundMessage, OutboundMessage};

pub trait GameMode: Send {
    /// Kick the mode off; single player starts immediately, multiplayer
    /// requests its initial pieces
    fn start(&mut self) -> bool;

    fn apply_command(&mut self, command: GameCommand) -> bool;

    fn timer_expired(&mut self, generation: u64) -> bool;

    fn settle_score(&mut self) -> bool;

    fn handle_inbound(&mut self, message: InboundMessage) -> bool {
        let _ = message;
        false
    }

    fn poll_event(&mut self) -> Option<GameEvent>;

    fn poll_outbound(&mut self) -> Option<OutboundMessage> {
        None
    }

    fn snapshot(&self) -> GameSnapshot;

    fn multiplayer_snapshot(&self) -> Option<MultiplayerSnapshot> {
        None
    }

    /// Tombstone the mode; nothing applies afterwards
    fn shutdown(&mut self);

    fn is_ended(&self) -> bool;
}

impl<S: PieceSource + Send> GameMode for GameState<S> {
    fn start(&mut self) -> bool {
        GameState::start(self)
    }

    fn apply_command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Place { x, y } => self.attempt_placement(x, y).is_placed(),
            GameCommand::Rotate { steps } => self.rotate_current_piece(steps),
            GameCommand::Swap => self.swap_current_and_next(),
            GameCommand::Chat(_) => false,
            GameCommand::Leave => self.end(),
        }
    }

    fn timer_expired(&mut self, generation: u64) -> bool {
        self.on_timer_expired(generation)
    }

    fn settle_score(&mut self) -> bool {
        GameState::settle_score(self)
    }

    fn poll_event(&mut self) -> Option<GameEvent> {
        GameState::poll_event(self)
    }

    fn snapshot(&self) -> GameSnapshot {
        GameState::snapshot(self)
    }

    fn shutdown(&mut self) {
        self.end();
    }

    fn is_ended(&self) -> bool {
        GameState::is_ended(self)
    }
}

impl GameMode for MultiplayerGame {
    fn start(&mut self) -> bool {
        self.begin();
        true
    }

    fn apply_command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Place { x, y } => self.place(x, y).is_placed(),
            GameCommand::Rotate { steps } => self.rotate(steps),
            GameCommand::Swap => self.swap(),
            GameCommand::Chat(text) => self.send_chat(&text),
            GameCommand::Leave => self.leave(),
        }
    }

    fn timer_expired(&mut self, generation: u64) -> bool {
        MultiplayerGame::timer_expired(self, generation)
    }

    fn settle_score(&mut self) -> bool {
        MultiplayerGame::settle_score(self)
    }

    fn handle_inbound(&mut self, message: InboundMessage) -> bool {
        MultiplayerGame::handle_inbound(self, message)
    }

    fn poll_event(&mut self) -> Option<GameEvent> {
        MultiplayerGame::poll_event(self)
    }

    fn poll_outbound(&mut self) -> Option<OutboundMessage> {
        MultiplayerGame::poll_outbound(self)
    }

    fn snapshot(&self) -> GameSnapshot {
        MultiplayerGame::snapshot(self)
    }

    fn multiplayer_snapshot(&self) -> Option<MultiplayerSnapshot> {
        Some(MultiplayerGame::multiplayer_snapshot(self))
    }

    fn shutdown(&mut self) {
        self.leave();
    }

    fn is_ended(&self) -> bool {
        self.is_closed()
    }
}
