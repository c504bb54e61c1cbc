//! Board representation, move generation and evaluation.

pub mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod state;
mod types;

pub use eval::evaluate;
pub use movegen::{generate_moves, is_square_attacked};
pub use state::{Board, PositionView, UnmakeInfo};
pub use types::{CastlingRights, Color, Move, MoveList, Piece, PieceKind, Square};

pub use fen::STARTING_FEN;
