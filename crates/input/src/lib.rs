//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s, resolves
//! them against the keyboard [`AimCursor`] into engine commands, and edits
//! the chat line. Nothing here knows about the game state.
//!
//! | Keys | Action |
//! |------|--------|
//! | arrows, WASD | move aim |
//! | Enter, X | place |
//! | Space, R | swap current/next |
//! | Q, Z, `[` | rotate left |
//! | E, C, `]` | rotate right |
//! | T | chat |
//! | Esc | quit |

pub mod aim;
pub mod chat;
pub mod map;

pub use tetrecs_types as types;

pub use aim::AimCursor;
pub use chat::{ChatOutcome, ChatPrompt, CHAT_MAX_LEN};
pub use map::{handle_key_event, should_quit};
