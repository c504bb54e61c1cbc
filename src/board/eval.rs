//! Static evaluation.
//!
//! Scores are centipawns from the perspective of the side to move.
//! Material and piece-square terms dominate; pawn-structure terms
//! (doubled, isolated, backward, passed), rook file/rank bonuses and
//! king cover adjust around them.
//!
//! Piece-square tables are written rank 8 first, the way a diagram
//! reads. Black pieces index them directly; White pieces index through
//! a vertical flip.

use super::state::PositionView;
use super::types::{Color, PieceKind, Square};

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 300;
const BISHOP_VALUE: i32 = 325;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

const DOUBLED_PAWN_PENALTY: i32 = 10;
const ISOLATED_PAWN_PENALTY: i32 = 20;
const BACKWARD_PAWN_PENALTY: i32 = 10;
const PASSED_PAWN_BONUS: i32 = 20;

const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 10;
const ROOK_OPEN_FILE_BONUS: i32 = 15;
const ROOK_ON_SEVENTH_BONUS: i32 = 20;

// A side is in the endgame once the opponent's non-pawn material falls
// to this level or below.
const ENDGAME_MATERIAL: i32 = 1200;

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  15,  20,  20,  15,  10,   5,
     4,   8,  12,  16,  16,  12,   8,   4,
     3,   6,   9,  12,  12,   9,   6,   3,
     2,   4,   6,   8,   8,   6,   4,   2,
     1,   2,   3, -10, -10,   3,   2,   1,
     0,   0,   0, -40, -40,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -10, -10, -10, -10, -10, -10, -10, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10, -30, -10, -10, -10, -10, -30, -10,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -10, -10, -10, -10, -10, -10, -10, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10, -10, -20, -10, -10, -20, -10, -10,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -20, -20, -20, -20, -20, -20, -20, -20,
      0,  20,  40, -20,   0, -20,  40,  20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; 64] = [
     0,  10,  20,  30,  30,  20,  10,   0,
    10,  20,  30,  40,  40,  30,  20,  10,
    20,  30,  40,  50,  50,  40,  30,  20,
    30,  40,  50,  60,  60,  50,  40,  30,
    30,  40,  50,  60,  60,  50,  40,  30,
    20,  30,  40,  50,  50,  40,  30,  20,
    10,  20,  30,  40,  40,  30,  20,  10,
     0,  10,  20,  30,  30,  20,  10,   0,
];

#[inline]
fn table_value(table: &[i32; 64], square: Square, color: Color) -> i32 {
    match color {
        Color::White => table[square.flip_vertical().as_index()],
        Color::Black => table[square.as_index()],
    }
}

const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => 0,
    }
}

/// Evaluate a position, in centipawns relative to the side to move.
#[must_use]
pub fn evaluate<P: PositionView>(pos: &P) -> i32 {
    Scorer::build(pos).score(pos)
}

/// Per-file foremost-pawn ranks, padded with a sentinel entry on either
/// side so file-neighbor lookups never branch. Index is file + 1.
///
/// For White the foremost pawn is the highest rank on the file and 0
/// means the file has no white pawn; for Black it is the lowest rank
/// and 7 means no black pawn.
struct Scorer {
    white_foremost: [i32; 10],
    black_foremost: [i32; 10],
    white_piece_material: i32,
    black_piece_material: i32,
    white_material: i32,
    black_material: i32,
}

impl Scorer {
    fn build<P: PositionView>(pos: &P) -> Scorer {
        let mut scorer = Scorer {
            white_foremost: [0; 10],
            black_foremost: [7; 10],
            white_piece_material: 0,
            black_piece_material: 0,
            white_material: 0,
            black_material: 0,
        };

        for square in Square::all() {
            let piece = pos.piece_at(square);
            let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
                continue;
            };
            let value = piece_value(kind);
            let rank = square.rank() as i32;
            let index = square.file() + 1;

            match color {
                Color::White => {
                    scorer.white_material += value;
                    if kind == PieceKind::Pawn {
                        if rank > scorer.white_foremost[index] {
                            scorer.white_foremost[index] = rank;
                        }
                    } else {
                        scorer.white_piece_material += value;
                    }
                }
                Color::Black => {
                    scorer.black_material += value;
                    if kind == PieceKind::Pawn {
                        if rank < scorer.black_foremost[index] {
                            scorer.black_foremost[index] = rank;
                        }
                    } else {
                        scorer.black_piece_material += value;
                    }
                }
            }
        }

        scorer
    }

    fn score<P: PositionView>(&self, pos: &P) -> i32 {
        let mut white = self.white_material;
        let mut black = self.black_material;

        for square in Square::all() {
            let piece = pos.piece_at(square);
            let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
                continue;
            };
            let term = match kind {
                PieceKind::Pawn => self.pawn_term(square, color),
                PieceKind::Knight => table_value(&KNIGHT_TABLE, square, color),
                PieceKind::Bishop => table_value(&BISHOP_TABLE, square, color),
                PieceKind::Rook => self.rook_term(square, color),
                PieceKind::Queen => 0,
                PieceKind::King => self.king_term(square, color),
            };
            match color {
                Color::White => white += term,
                Color::Black => black += term,
            }
        }

        if pos.white_to_move() {
            white - black
        } else {
            black - white
        }
    }

    fn pawn_term(&self, square: Square, color: Color) -> i32 {
        let rank = square.rank() as i32;
        let index = square.file() + 1;
        let mut term = table_value(&PAWN_TABLE, square, color);

        match color {
            Color::White => {
                if rank < self.white_foremost[index] {
                    term -= DOUBLED_PAWN_PENALTY;
                }
                if self.white_foremost[index - 1] == 0 && self.white_foremost[index + 1] == 0 {
                    term -= ISOLATED_PAWN_PENALTY;
                } else if rank < self.white_foremost[index - 1]
                    && rank < self.white_foremost[index + 1]
                {
                    term -= BACKWARD_PAWN_PENALTY;
                }
                if rank >= self.black_foremost[index - 1]
                    && rank >= self.black_foremost[index]
                    && rank >= self.black_foremost[index + 1]
                {
                    term += rank * PASSED_PAWN_BONUS;
                }
            }
            Color::Black => {
                if rank > self.black_foremost[index] {
                    term -= DOUBLED_PAWN_PENALTY;
                }
                if self.black_foremost[index - 1] == 7 && self.black_foremost[index + 1] == 7 {
                    term -= ISOLATED_PAWN_PENALTY;
                } else if rank > self.black_foremost[index - 1]
                    && rank > self.black_foremost[index + 1]
                {
                    term -= BACKWARD_PAWN_PENALTY;
                }
                if rank <= self.white_foremost[index - 1]
                    && rank <= self.white_foremost[index]
                    && rank <= self.white_foremost[index + 1]
                {
                    term += (7 - rank) * PASSED_PAWN_BONUS;
                }
            }
        }

        term
    }

    fn rook_term(&self, square: Square, color: Color) -> i32 {
        let index = square.file() + 1;
        let mut term = 0;

        let (own_empty, enemy_empty, seventh) = match color {
            Color::White => (
                self.white_foremost[index] == 0,
                self.black_foremost[index] == 7,
                square.rank() == 6,
            ),
            Color::Black => (
                self.black_foremost[index] == 7,
                self.white_foremost[index] == 0,
                square.rank() == 1,
            ),
        };

        if own_empty {
            term += if enemy_empty {
                ROOK_OPEN_FILE_BONUS
            } else {
                ROOK_SEMI_OPEN_FILE_BONUS
            };
        }
        if seventh {
            term += ROOK_ON_SEVENTH_BONUS;
        }

        term
    }

    fn king_term(&self, square: Square, color: Color) -> i32 {
        let enemy_material = match color {
            Color::White => self.black_piece_material,
            Color::Black => self.white_piece_material,
        };
        if enemy_material <= ENDGAME_MATERIAL {
            return table_value(&KING_ENDGAME_TABLE, square, color);
        }

        let mut term = table_value(&KING_TABLE, square, color);
        let file = square.file();

        if file > 4 {
            for cover_file in 5..=7 {
                term += self.cover_term(cover_file, color);
            }
        } else if file < 3 {
            for cover_file in 1..=3 {
                term += self.cover_term(cover_file, color);
            }
        } else {
            // Uncastled central king: penalize each fully open file around it.
            for index in file..=file + 2 {
                if self.white_foremost[index] == 0 && self.black_foremost[index] == 7 {
                    term -= 10;
                }
            }
        }

        term
    }

    /// Shelter quality of one file in front of a castled king: full
    /// credit for an unmoved pawn, growing penalties as it advances or
    /// disappears, plus penalties for enemy pawns storming the file.
    fn cover_term(&self, file: usize, color: Color) -> i32 {
        let index = file + 1;
        let mut term = 0;

        match color {
            Color::White => {
                match self.white_foremost[index] {
                    1 => {}
                    2 => term -= 10,
                    0 => term -= 25,
                    _ => term -= 20,
                }
                match self.black_foremost[index] {
                    7 => term -= 15,
                    2 => term -= 10,
                    3 => term -= 5,
                    _ => {}
                }
            }
            Color::Black => {
                match self.black_foremost[index] {
                    6 => {}
                    5 => term -= 10,
                    7 => term -= 25,
                    _ => term -= 20,
                }
                match self.white_foremost[index] {
                    0 => term -= 15,
                    5 => term -= 10,
                    4 => term -= 5,
                    _ => {}
                }
            }
        }

        term
    }
}
