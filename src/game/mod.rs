//! Core Connect Four rules: board representation, player seats, and the
//! per-room game state machine.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError, Placement};

#[cfg(test)]
pub(crate) mod fixtures {
    /// A 42-move game that fills the board without ever lining up four.
    pub(crate) const DRAW_SEQUENCE: [usize; 42] = [
        4, 3, 6, 0, 1, 4, 5, 5, 1, 1, 5, 0, 1, 6, 0, 1, 5, 5, 1, 0, 4, 6, 3, 2, 6, 6, 0, 4, 6,
        5, 2, 0, 4, 2, 4, 2, 2, 2, 3, 3, 3, 3,
    ];
}
