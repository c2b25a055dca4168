//! TetrECS (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, tests and
//! benches can write `tetrecs::core::GameState` and friends.

pub use tetrecs_adapter as adapter;
pub use tetrecs_core as core;
pub use tetrecs_engine as engine;
pub use tetrecs_input as input;
pub use tetrecs_term as term;
pub use tetrecs_types as types;
