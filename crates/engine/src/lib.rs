//! Engine module - running a game in real time
//!
//! [`tetrecs_core`] decides *what* happens; this crate decides *when*:
//!
//! - [`session`]: the actor that owns a [`GameMode`](crate::core::GameMode)
//!   and serialises every input into it
//! - [`countdown`]: the per-game countdown task with generation counting
//! - [`media`]: the sound/music sink interface
//! - [`score_store`]: the high-score file
//!
//! # Example
//!
//! ```no_run
//! use tetrecs_engine::core::{GameState, RandomPieces};
//! use tetrecs_engine::{LogMedia, Session};
//! use tetrecs_engine::types::GameCommand;
//!
//! # async fn demo() {
//! let game = GameState::new(5, 5, RandomPieces::new(1));
//! let handle = Session::spawn(game, LogMedia);
//! handle.command(GameCommand::Place { x: 2, y: 2 });
//! handle.shutdown();
//! let _ = handle.join().await;
//! # }
//! ```

pub mod countdown;
pub mod media;
pub mod score_store;
pub mod session;

pub use tetrecs_core as core;
pub use tetrecs_types as types;

pub use countdown::Countdown;
pub use media::{LogMedia, MediaCue, MediaSink, MuteMedia, RecordingMedia};
pub use score_store::{ScoreStore, ScoreStoreError};
pub use session::{Session, SessionHandle, SessionInput, SessionSnapshot};
