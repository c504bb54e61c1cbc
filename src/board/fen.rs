//! FEN parsing and serialization.

use std::str::FromStr;

use crate::zobrist;

use super::error::FenError;
use super::state::{Board, PositionView};
use super::types::{CastlingRights, Color, Piece, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from Forsyth-Edwards Notation.
    ///
    /// The first four fields are required; the halfmove clock and fullmove
    /// number default to 0 and 1 when absent.
    pub fn try_from_fen(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::TooFewFields {
                found: fields.len(),
            });
        }

        let mut board = Board::empty(zobrist::default_keys());

        let mut rank = 7usize;
        let mut file = 0usize;
        let mut squares = 0usize;
        for c in fields[0].chars() {
            match c {
                '/' => {
                    rank = rank.wrapping_sub(1);
                    file = 0;
                }
                '1'..='8' => {
                    let run = c as usize - '0' as usize;
                    file += run;
                    squares += run;
                }
                _ => {
                    let piece =
                        Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if rank < 8 && file < 8 {
                        board.put_piece(Square::at(rank, file), piece);
                    }
                    file += 1;
                    squares += 1;
                }
            }
            if squares > 64 {
                return Err(FenError::NotSixtyFourSquares { found: squares });
            }
        }
        if squares != 64 {
            return Err(FenError::NotSixtyFourSquares { found: squares });
        }

        board.white_to_move = match fields[1] {
            "w" => true,
            "b" => false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut rights = CastlingRights::none();
        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => rights.set(Color::White, true),
                    'Q' => rights.set(Color::White, false),
                    'k' => rights.set(Color::Black, true),
                    'q' => rights.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }
        board.castling_rights = rights;

        board.en_passant_target = match fields[3] {
            "-" => None,
            notation => Some(Square::from_str(notation).map_err(|_| {
                FenError::InvalidEnPassant {
                    found: notation.to_string(),
                }
            })?),
        };

        board.halfmove_clock = fields
            .get(4)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        board.fullmove_number = fields
            .get(5)
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        board.hash = board.keys.full_hash(&board);
        Ok(board)
    }

    /// Serialize the position to Forsyth-Edwards Notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.piece_at(Square::at(rank, file)).to_char() {
                    Some(c) => {
                        if empty_run > 0 {
                            fen.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        fen.push(c);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move() { 'w' } else { 'b' });

        fen.push(' ');
        let rights = self.castling_rights();
        if rights == CastlingRights::none() {
            fen.push('-');
        } else {
            if rights.has(Color::White, true) {
                fen.push('K');
            }
            if rights.has(Color::White, false) {
                fen.push('Q');
            }
            if rights.has(Color::Black, true) {
                fen.push('k');
            }
            if rights.has(Color::Black, false) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_target() {
            Some(target) => fen.push_str(&target.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock(), self.fullmove_number()));
        fen
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
