//! Terminal front-end: a canvas, a layout for the game screen and a diffing
//! crossterm renderer.

pub mod canvas;
pub mod game_view;
pub mod renderer;

pub use tetrecs_core as core;
pub use tetrecs_types as types;

pub use canvas::{block_color, Canvas, Glyph, Rgb, Style, BLOCK_PALETTE};
pub use game_view::{GameView, Overlay, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
