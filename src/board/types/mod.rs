//! Plain value types shared across the board modules.

mod castling;
mod moves;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use moves::{Move, MoveList};
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;

pub(crate) use piece::PROMOTION_KINDS;
