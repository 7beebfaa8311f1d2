pub mod board;
pub mod game;
pub mod term_render;

pub use board::{Board, BoardError, Cell};
pub use game::{GameStatus, OxoGame};
pub use term_render::{AnsiTermStyle, PlainTermStyle, TermStyle};
