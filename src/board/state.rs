//! The board: full mutable game state.

use std::fmt;
use std::sync::Arc;

use crate::zobrist::{self, ZobristKeys};

use super::types::{CastlingRights, Color, Move, Piece, PieceKind, Square};

/// Read-only capability view of a position.
///
/// The move generator and evaluator depend on this narrow contract rather
/// than on [`Board`] internals.
pub trait PositionView {
    /// The piece occupying a square (possibly [`Piece::EMPTY`])
    fn piece_at(&self, square: Square) -> Piece;

    /// Whether White is to move
    fn white_to_move(&self) -> bool;

    /// The four castling-right flags
    fn castling_rights(&self) -> CastlingRights;

    /// The en passant target square, if the previous move was a double
    /// pawn push
    fn en_passant_target(&self) -> Option<Square>;

    /// The color to move
    fn side_to_move(&self) -> Color {
        if self.white_to_move() {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// Everything needed to exactly revert one applied move.
///
/// Captured immediately before the move is applied and consumed exactly
/// once by the matching [`Board::unmake_move`] call, in LIFO order.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) mv: Move,
    pub(crate) captured: Piece,
    pub(crate) previous_castling_rights: CastlingRights,
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_halfmove_clock: u32,
}

impl UnmakeInfo {
    /// The move this record reverts
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// The full mutable game state.
///
/// Mutated exclusively through [`Board::make_move`] / [`Board::unmake_move`]
/// pairs; the running Zobrist hash is maintained incrementally by those
/// mutators and never recomputed during play.
#[derive(Clone)]
pub struct Board {
    pub(crate) pieces: [Piece; 64],
    pub(crate) white_to_move: bool,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) keys: Arc<ZobristKeys>,
}

impl Board {
    /// The standard starting position, hashed with the shared default
    /// key table.
    #[must_use]
    pub fn new() -> Self {
        Board::with_keys(zobrist::default_keys())
    }

    /// The standard starting position, hashed with an injected key table.
    #[must_use]
    pub fn with_keys(keys: Arc<ZobristKeys>) -> Self {
        let mut board = Board::empty(keys);

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            board.put_piece(Square::at(0, file), Piece::new(kind, Color::White));
            board.put_piece(Square::at(1, file), Piece::new(PieceKind::Pawn, Color::White));
            board.put_piece(Square::at(6, file), Piece::new(PieceKind::Pawn, Color::Black));
            board.put_piece(Square::at(7, file), Piece::new(kind, Color::Black));
        }

        board.castling_rights = CastlingRights::all();
        board.fullmove_number = 1;
        board.hash = board.keys.full_hash(&board);
        board
    }

    pub(crate) fn empty(keys: Arc<ZobristKeys>) -> Self {
        Board {
            pieces: [Piece::EMPTY; 64],
            white_to_move: true,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            keys,
        }
    }

    /// Place a piece during board setup, without touching the hash.
    /// Callers recompute the hash afterwards.
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        self.pieces[square.as_index()] = piece;
    }

    /// The current Zobrist hash
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Moves since the last pawn move or capture
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The full-move counter (starts at 1, incremented after Black moves)
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The key table hashing this board
    #[must_use]
    pub fn keys(&self) -> &ZobristKeys {
        &self.keys
    }
}

impl PositionView for Board {
    #[inline]
    fn piece_at(&self, square: Square) -> Piece {
        self.pieces[square.as_index()]
    }

    #[inline]
    fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    #[inline]
    fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

/// ASCII diagram, rank 8 at the top. Feeds external renderers and debug
/// output.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let piece = self.piece_at(Square::at(rank, file));
                write!(f, " {}", piece.to_char().unwrap_or('.'))?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
