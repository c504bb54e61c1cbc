//! Pseudo-legal move generation over a 10x12 mailbox.
//!
//! The 8x8 board is embedded in a 10x12 array whose border cells hold -1,
//! so a single table lookup answers "did this offset step off the board".
//! Moves are pseudo-legal: castling transit squares are checked for
//! attacks, but moving into check is left for the caller to detect by
//! searching the resulting position.

use super::state::PositionView;
use super::types::{Color, Move, MoveList, PieceKind, Square, PROMOTION_KINDS};

#[rustfmt::skip]
const MAILBOX_120: [i8; 120] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7, -1,
    -1,  8,  9, 10, 11, 12, 13, 14, 15, -1,
    -1, 16, 17, 18, 19, 20, 21, 22, 23, -1,
    -1, 24, 25, 26, 27, 28, 29, 30, 31, -1,
    -1, 32, 33, 34, 35, 36, 37, 38, 39, -1,
    -1, 40, 41, 42, 43, 44, 45, 46, 47, -1,
    -1, 48, 49, 50, 51, 52, 53, 54, 55, -1,
    -1, 56, 57, 58, 59, 60, 61, 62, 63, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

#[rustfmt::skip]
const MAILBOX_64: [usize; 64] = [
    21, 22, 23, 24, 25, 26, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38,
    41, 42, 43, 44, 45, 46, 47, 48,
    51, 52, 53, 54, 55, 56, 57, 58,
    61, 62, 63, 64, 65, 66, 67, 68,
    71, 72, 73, 74, 75, 76, 77, 78,
    81, 82, 83, 84, 85, 86, 87, 88,
    91, 92, 93, 94, 95, 96, 97, 98,
];

const KNIGHT_OFFSETS: [i32; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];
const BISHOP_OFFSETS: [i32; 4] = [-11, -9, 9, 11];
const ROOK_OFFSETS: [i32; 4] = [-10, -1, 1, 10];
const KING_OFFSETS: [i32; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

/// Step from a square by a mailbox offset, `None` if it leaves the board.
#[inline]
fn offset_square(square: Square, offset: i32) -> Option<Square> {
    let target = MAILBOX_120[(MAILBOX_64[square.as_index()] as i32 + offset) as usize];
    if target < 0 {
        None
    } else {
        Some(Square::from_index(target as usize))
    }
}

/// Generate all pseudo-legal moves for the side to move.
#[must_use]
pub fn generate_moves<P: PositionView>(pos: &P) -> MoveList {
    let mut moves = MoveList::new();
    let us = pos.side_to_move();

    for from in Square::all() {
        let piece = pos.piece_at(from);
        if !piece.is_color(us) {
            continue;
        }
        match piece.kind() {
            Some(PieceKind::Pawn) => pawn_moves(pos, from, us, &mut moves),
            Some(PieceKind::Knight) => {
                leaper_moves(pos, from, us, &KNIGHT_OFFSETS, &mut moves)
            }
            Some(PieceKind::Bishop) => {
                slider_moves(pos, from, us, &BISHOP_OFFSETS, &mut moves)
            }
            Some(PieceKind::Rook) => slider_moves(pos, from, us, &ROOK_OFFSETS, &mut moves),
            Some(PieceKind::Queen) => slider_moves(pos, from, us, &KING_OFFSETS, &mut moves),
            Some(PieceKind::King) => {
                leaper_moves(pos, from, us, &KING_OFFSETS, &mut moves);
                castle_moves(pos, from, us, &mut moves);
            }
            None => {}
        }
    }

    moves
}

fn pawn_moves<P: PositionView>(pos: &P, from: Square, us: Color, moves: &mut MoveList) {
    let dir = us.pawn_direction();
    let promoting = from.rank() == us.pawn_promotion_from_rank();

    // Pushes stay on the board for any non-promotion-rank pawn, so plain
    // rank arithmetic is enough here.
    let ahead = Square::at((from.rank() as isize + dir) as usize, from.file());
    if pos.piece_at(ahead).is_empty() {
        if promoting {
            for kind in PROMOTION_KINDS {
                moves.push(Move::promotion(from, ahead, kind, false));
            }
        } else {
            moves.push(Move::quiet(from, ahead));
            if from.rank() == us.pawn_start_rank() {
                let two_ahead =
                    Square::at((from.rank() as isize + 2 * dir) as usize, from.file());
                if pos.piece_at(two_ahead).is_empty() {
                    moves.push(Move::double_pawn_push(from, two_ahead));
                }
            }
        }
    }

    for side in [-1, 1] {
        let Some(target) = offset_square(from, dir as i32 * 10 + side) else {
            continue;
        };
        if pos.piece_at(target).is_color(us.opponent()) {
            if promoting {
                for kind in PROMOTION_KINDS {
                    moves.push(Move::promotion(from, target, kind, true));
                }
            } else {
                moves.push(Move::capture(from, target));
            }
        } else if pos.en_passant_target() == Some(target) {
            moves.push(Move::en_passant(from, target));
        }
    }
}

fn leaper_moves<P: PositionView>(
    pos: &P,
    from: Square,
    us: Color,
    offsets: &[i32],
    moves: &mut MoveList,
) {
    for &offset in offsets {
        let Some(target) = offset_square(from, offset) else {
            continue;
        };
        let occupant = pos.piece_at(target);
        if occupant.is_empty() {
            moves.push(Move::quiet(from, target));
        } else if occupant.is_color(us.opponent()) {
            moves.push(Move::capture(from, target));
        }
    }
}

fn slider_moves<P: PositionView>(
    pos: &P,
    from: Square,
    us: Color,
    offsets: &[i32],
    moves: &mut MoveList,
) {
    for &offset in offsets {
        let mut current = from;
        while let Some(target) = offset_square(current, offset) {
            let occupant = pos.piece_at(target);
            if occupant.is_empty() {
                moves.push(Move::quiet(from, target));
                current = target;
            } else {
                if occupant.is_color(us.opponent()) {
                    moves.push(Move::capture(from, target));
                }
                break;
            }
        }
    }
}

/// Castle moves: rights held, path squares empty, and neither the king's
/// square nor its transit squares attacked. The queenside b-file square
/// only needs to be empty.
fn castle_moves<P: PositionView>(pos: &P, from: Square, us: Color, moves: &mut MoveList) {
    let rank = us.back_rank();
    if from != Square::at(rank, 4) {
        return;
    }
    let them = us.opponent();

    if pos.castling_rights().has(us, true)
        && pos.piece_at(Square::at(rank, 5)).is_empty()
        && pos.piece_at(Square::at(rank, 6)).is_empty()
        && !is_square_attacked(pos, from, them)
        && !is_square_attacked(pos, Square::at(rank, 5), them)
        && !is_square_attacked(pos, Square::at(rank, 6), them)
    {
        moves.push(Move::castle_kingside(from, Square::at(rank, 6)));
    }

    if pos.castling_rights().has(us, false)
        && pos.piece_at(Square::at(rank, 1)).is_empty()
        && pos.piece_at(Square::at(rank, 2)).is_empty()
        && pos.piece_at(Square::at(rank, 3)).is_empty()
        && !is_square_attacked(pos, from, them)
        && !is_square_attacked(pos, Square::at(rank, 3), them)
        && !is_square_attacked(pos, Square::at(rank, 2), them)
    {
        moves.push(Move::castle_queenside(from, Square::at(rank, 2)));
    }
}

/// Whether any piece of `by` attacks `square`.
#[must_use]
pub fn is_square_attacked<P: PositionView>(pos: &P, square: Square, by: Color) -> bool {
    // Pawn attacks come from the direction the attacker advances, so look
    // backwards along it from the target square.
    let pawn_dir = by.pawn_direction() as i32;
    for side in [-1, 1] {
        if let Some(origin) = offset_square(square, -pawn_dir * 10 + side) {
            let piece = pos.piece_at(origin);
            if piece.is_color(by) && piece.is_kind(PieceKind::Pawn) {
                return true;
            }
        }
    }

    for &offset in &KNIGHT_OFFSETS {
        if let Some(origin) = offset_square(square, offset) {
            let piece = pos.piece_at(origin);
            if piece.is_color(by) && piece.is_kind(PieceKind::Knight) {
                return true;
            }
        }
    }

    for &offset in &KING_OFFSETS {
        if let Some(origin) = offset_square(square, offset) {
            let piece = pos.piece_at(origin);
            if piece.is_color(by) && piece.is_kind(PieceKind::King) {
                return true;
            }
        }
    }

    if slider_attacks(pos, square, by, &BISHOP_OFFSETS, PieceKind::Bishop) {
        return true;
    }
    slider_attacks(pos, square, by, &ROOK_OFFSETS, PieceKind::Rook)
}

fn slider_attacks<P: PositionView>(
    pos: &P,
    square: Square,
    by: Color,
    offsets: &[i32],
    kind: PieceKind,
) -> bool {
    for &offset in offsets {
        let mut current = square;
        while let Some(origin) = offset_square(current, offset) {
            let piece = pos.piece_at(origin);
            if piece.is_empty() {
                current = origin;
                continue;
            }
            if piece.is_color(by) && (piece.is_kind(kind) || piece.is_kind(PieceKind::Queen)) {
                return true;
            }
            break;
        }
    }
    false
}

impl super::state::Board {
    /// Count pseudo-legal move sequences of the given depth.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = generate_moves(self);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in &moves {
            let info = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move(info);
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use std::collections::HashSet;

    fn board(fen: &str) -> Board {
        Board::try_from_fen(fen).unwrap()
    }

    fn targets_from(moves: &MoveList, from: Square) -> HashSet<Square> {
        moves
            .iter()
            .filter(|mv| mv.from() == from)
            .map(|mv| mv.to())
            .collect()
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let board = Board::new();
        let moves = generate_moves(&board);
        assert_eq!(moves.len(), 20);

        let doubles = moves.iter().filter(|mv| mv.is_double_pawn_push()).count();
        assert_eq!(doubles, 8);
        let knight_moves = moves
            .iter()
            .filter(|mv| board.piece_at(mv.from()).is_kind(PieceKind::Knight))
            .count();
        assert_eq!(knight_moves, 4);

        let unique: HashSet<Move> = moves.iter().copied().collect();
        assert_eq!(unique.len(), moves.len());
    }

    #[test]
    fn test_bishop_rays_stop_at_blockers() {
        let board = board("8/8/8/3p4/8/1B6/8/K6k w - - 0 1");
        let moves = generate_moves(&board);
        let targets = targets_from(&moves, Square::at(2, 1));
        // Up-right ray ends by capturing the d5 pawn.
        assert!(targets.contains(&Square::at(3, 2)));
        assert!(targets.contains(&Square::at(4, 3)));
        assert!(!targets.contains(&Square::at(5, 4)));
        // Other diagonals run to the board edge.
        assert!(targets.contains(&Square::at(0, 3)));
        assert!(targets.contains(&Square::at(3, 0)));
        assert!(targets.contains(&Square::at(1, 0)));
    }

    #[test]
    fn test_knight_on_rim_stays_on_board() {
        let board = board("8/8/8/8/8/8/8/N6k w - - 0 1"); // knight a1
        let moves = generate_moves(&board);
        let targets = targets_from(&moves, Square::at(0, 0));
        assert_eq!(
            targets,
            HashSet::from([Square::at(2, 1), Square::at(1, 2)])
        );
    }

    #[test]
    fn test_pawn_blocked_generates_nothing() {
        let board = board("k7/8/8/8/3p4/3P4/8/K7 w - - 0 1");
        let moves = generate_moves(&board);
        assert!(targets_from(&moves, Square::at(2, 3)).is_empty());
    }

    #[test]
    fn test_promotions_expand_four_ways() {
        let board = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let moves = generate_moves(&board);
        let promos: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|mv| mv.is_promotion())
            .collect();
        assert_eq!(promos.len(), 4);
        let kinds: HashSet<PieceKind> =
            promos.iter().filter_map(|mv| mv.promotion_kind()).collect();
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_en_passant_is_generated() {
        let board = board("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3");
        let moves = generate_moves(&board);
        assert!(moves
            .iter()
            .any(|mv| mv.is_en_passant() && mv.to() == Square::at(2, 4)));
    }

    #[test]
    fn test_castles_generated_when_path_clear() {
        let board = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = generate_moves(&board);
        assert!(moves.iter().any(|mv| mv.is_castle_kingside()));
        assert!(moves.iter().any(|mv| mv.is_castle_queenside()));
    }

    #[test]
    fn test_castle_blocked_by_attacked_transit_square() {
        // Black rook on f8 covers f1, forbidding the kingside castle.
        let board = board("5r2/k7/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = generate_moves(&board);
        assert!(!moves.iter().any(|mv| mv.is_castle_kingside()));
        assert!(moves.iter().any(|mv| mv.is_castle_queenside()));
    }

    #[test]
    fn test_castle_requires_rights() {
        let board = board("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        let moves = generate_moves(&board);
        assert!(!moves.iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_no_castle_while_in_check() {
        let board = board("4r3/k7/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = generate_moves(&board);
        assert!(!moves.iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_is_square_attacked() {
        let board = board("8/8/8/3p4/8/1B6/8/K6k w - - 0 1");
        // The b3 bishop sees d5.
        assert!(is_square_attacked(&board, Square::at(4, 3), Color::White));
        // The d5 pawn attacks c4 and e4.
        assert!(is_square_attacked(&board, Square::at(3, 2), Color::Black));
        assert!(is_square_attacked(&board, Square::at(3, 4), Color::Black));
        assert!(!is_square_attacked(&board, Square::at(7, 0), Color::White));
    }

    #[test]
    fn test_perft_shallow() {
        let mut board = Board::new();
        assert_eq!(board.perft(1), 20);
        assert_eq!(board.perft(2), 400);
    }
}
