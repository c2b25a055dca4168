//! Adapter module - the game-server connection
//!
//! TetrECS multiplayer talks to a channel server over a WebSocket. Every
//! text frame is one message of the form `VERB[ payload]`.
//!
//! # Message Types
//!
//! ## Client -> Server
//!
//! | Verb | Payload | Meaning |
//! |------|---------|---------|
//! | `PIECE` | | request one more piece |
//! | `BOARD` | 25 ints | local grid, column-major |
//! | `SCORE` | int | authoritative score |
//! | `LIVES` | int | remaining lives |
//! | `DIE` | | eliminated |
//! | `MSG` | text | chat |
//! | `SCORES` | | request leaderboard |
//! | `HISCORES` / `HISCORE` | `name:score` | online high scores |
//! | `NICK` / `CREATE` / `JOIN` / `START` / `PART` | | channel handshake |
//!
//! ## Server -> Client
//!
//! | Verb | Payload |
//! |------|---------|
//! | `PIECE` | id `0..15` |
//! | `SCORES` | `name:score:ALIVE\|DEAD` per line |
//! | `BOARD` | `name:` then 25 ints |
//! | `MSG` | `name:text` (missing `:` gives an empty text) |
//! | `HISCORES` | `name:score` per line |
//! | `NEWSCORE`, `START`, `HOST`, `PARTED` | |
//! | `JOIN`, `NICK`, `ERROR` | text |
//!
//! Malformed or unknown messages are logged and dropped; they never reach
//! the game.
//!
//! # Environment Variables
//!
//! - `TETRECS_SERVER_URL`: server URL (default: `ws://127.0.0.1:9700`)
//! - `TETRECS_MAX_PENDING`: inbound queue capacity (default: 64)
//!
//! # Implementation
//!
//! - See [`protocol`] for the codec
//! - See [`client`] for the connection task
//! - See [`runtime`] for the sync-friendly [`Communicator`] handle

pub mod client;
pub mod protocol;
pub mod runtime;

pub use tetrecs_types as types;

pub use client::{run_client, ClientConfig};
pub use protocol::{encode_outbound, parse_inbound, write_outbound_into, ProtocolError};
pub use runtime::Communicator;
