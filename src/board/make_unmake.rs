//! Applying and reverting moves.
//!
//! `make_move` / `unmake_move` are exact inverses: reverting restores the
//! piece array, side to move, castling rights, en passant target, clocks
//! and Zobrist hash bit-for-bit. Unmake records must be consumed in LIFO
//! order relative to their makes.

use super::state::{Board, PositionView, UnmakeInfo};
use super::types::{CastlingRights, Color, Move, Piece, PieceKind, Square};

impl Board {
    /// Apply a move and return the record needed to revert it.
    ///
    /// The move must be one produced by the move generator for this
    /// position; applying an arbitrary move is not defended against.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let mover = self.side_to_move();
        let from = mv.from();
        let to = mv.to();
        let moving = self.piece_at(from);

        let captured = if mv.is_en_passant() {
            self.piece_at(Square::at(from.rank(), to.file()))
        } else if mv.is_capture() {
            self.piece_at(to)
        } else {
            Piece::EMPTY
        };

        let info = UnmakeInfo {
            mv,
            captured,
            previous_castling_rights: self.castling_rights,
            previous_en_passant_target: self.en_passant_target,
            previous_halfmove_clock: self.halfmove_clock,
        };

        if moving.is_kind(PieceKind::Pawn) || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.revoke_rights(mover, moving, from, captured, to);

        let new_ep = if mv.is_double_pawn_push() {
            let rank = (from.rank() as isize + mover.pawn_direction()) as usize;
            Some(Square::at(rank, from.file()))
        } else {
            None
        };
        self.set_en_passant(new_ep);

        if mv.is_en_passant() {
            self.set_square(from, Piece::EMPTY);
            self.set_square(Square::at(from.rank(), to.file()), Piece::EMPTY);
            self.set_square(to, moving);
        } else if let Some(kind) = mv.promotion_kind() {
            self.set_square(from, Piece::EMPTY);
            self.set_square(to, Piece::new(kind, mover));
        } else {
            self.set_square(from, Piece::EMPTY);
            self.set_square(to, moving);

            if mv.is_castle() {
                let rank = mover.back_rank();
                let (rook_from, rook_to) = if mv.is_castle_kingside() {
                    (Square::at(rank, 7), Square::at(rank, 5))
                } else {
                    (Square::at(rank, 0), Square::at(rank, 3))
                };
                let rook = self.piece_at(rook_from);
                self.set_square(rook_from, Piece::EMPTY);
                self.set_square(rook_to, rook);
            }
        }

        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.white_to_move = !self.white_to_move;
        self.hash = self.keys.side_update(self.hash);

        info
    }

    /// Revert the most recently applied move.
    pub fn unmake_move(&mut self, info: UnmakeInfo) {
        self.white_to_move = !self.white_to_move;
        self.hash = self.keys.side_update(self.hash);
        let mover = self.side_to_move();
        if mover == Color::Black {
            self.fullmove_number -= 1;
        }

        let mv = info.mv;
        let from = mv.from();
        let to = mv.to();

        if mv.is_en_passant() {
            let pawn = self.piece_at(to);
            self.set_square(to, Piece::EMPTY);
            self.set_square(Square::at(from.rank(), to.file()), info.captured);
            self.set_square(from, pawn);
        } else if mv.is_promotion() {
            self.set_square(to, info.captured);
            self.set_square(from, Piece::new(PieceKind::Pawn, mover));
        } else {
            let moving = self.piece_at(to);
            self.set_square(to, info.captured);
            self.set_square(from, moving);

            if mv.is_castle() {
                let rank = mover.back_rank();
                let (rook_from, rook_to) = if mv.is_castle_kingside() {
                    (Square::at(rank, 7), Square::at(rank, 5))
                } else {
                    (Square::at(rank, 0), Square::at(rank, 3))
                };
                let rook = self.piece_at(rook_to);
                self.set_square(rook_to, Piece::EMPTY);
                self.set_square(rook_from, rook);
            }
        }

        self.set_castling_rights(info.previous_castling_rights);
        self.set_en_passant(info.previous_en_passant_target);
        self.halfmove_clock = info.previous_halfmove_clock;
    }

    /// Write a piece to a square, keeping the hash in sync.
    #[inline]
    pub(crate) fn set_square(&mut self, square: Square, piece: Piece) {
        let old = self.pieces[square.as_index()];
        self.hash = self.keys.piece_update(self.hash, square, old, piece);
        self.pieces[square.as_index()] = piece;
    }

    #[inline]
    pub(crate) fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.hash = self.keys.rights_update(self.hash, self.castling_rights, rights);
        self.castling_rights = rights;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        self.hash = self
            .keys
            .en_passant_update(self.hash, self.en_passant_target, target);
        self.en_passant_target = target;
    }

    /// Revoke castling rights lost by this move: king moves lose both of
    /// the mover's rights, a rook leaving its home corner loses that flank,
    /// and a rook captured on its home corner loses the victim's flank.
    fn revoke_rights(
        &mut self,
        mover: Color,
        moving: Piece,
        from: Square,
        captured: Piece,
        to: Square,
    ) {
        let mut rights = self.castling_rights;

        if moving.is_kind(PieceKind::King) {
            rights.remove_both(mover);
        } else if moving.is_kind(PieceKind::Rook) && from.rank() == mover.back_rank() {
            if from.file() == 7 {
                rights.remove(mover, true);
            } else if from.file() == 0 {
                rights.remove(mover, false);
            }
        }

        if captured.is_kind(PieceKind::Rook) {
            let victim = mover.opponent();
            if to.rank() == victim.back_rank() {
                if to.file() == 7 {
                    rights.remove(victim, true);
                } else if to.file() == 0 {
                    rights.remove(victim, false);
                }
            }
        }

        self.set_castling_rights(rights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::try_from_fen(fen).unwrap()
    }

    fn assert_hash_consistent(board: &Board) {
        assert_eq!(board.hash(), board.keys().full_hash(board));
    }

    #[test]
    fn test_quiet_move_and_revert() {
        let mut board = Board::new();
        let start_fen = board.to_fen();
        let start_hash = board.hash();

        let mv = Move::quiet(Square::at(0, 6), Square::at(2, 5)); // Ng1-f3
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(2, 5)).is_kind(PieceKind::Knight));
        assert!(board.piece_at(Square::at(0, 6)).is_empty());
        assert!(!board.white_to_move());
        assert_eq!(board.halfmove_clock(), 1);
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), start_fen);
        assert_eq!(board.hash(), start_hash);
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let mut board = Board::new();
        let mv = Move::double_pawn_push(Square::at(1, 4), Square::at(3, 4)); // e2-e4
        let info = board.make_move(mv);
        assert_eq!(board.en_passant_target(), Some(Square::at(2, 4)));
        assert_eq!(board.halfmove_clock(), 0);
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn test_capture_and_revert() {
        let mut board = board("rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2");
        let before = board.to_fen();
        let mv = Move::capture(Square::at(3, 3), Square::at(4, 4)); // dxe5
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(4, 4)).is_kind(PieceKind::Pawn));
        assert!(board.piece_at(Square::at(4, 4)).is_white());
        assert_eq!(board.halfmove_clock(), 0);
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_en_passant_removes_the_pushed_pawn() {
        let mut board = board("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3");
        let before = board.to_fen();
        let mv = Move::en_passant(Square::at(3, 3), Square::at(2, 4)); // dxe3 e.p.
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(2, 4)).is_kind(PieceKind::Pawn));
        assert!(board.piece_at(Square::at(3, 4)).is_empty()); // e4 pawn gone
        assert!(board.piece_at(Square::at(3, 3)).is_empty());
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_kingside_castle_moves_rook() {
        let mut board = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let before = board.to_fen();
        let mv = Move::castle_kingside(Square::at(0, 4), Square::at(0, 6));
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(0, 6)).is_kind(PieceKind::King));
        assert!(board.piece_at(Square::at(0, 5)).is_kind(PieceKind::Rook));
        assert!(board.piece_at(Square::at(0, 7)).is_empty());
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::White, false));
        assert!(board.castling_rights().has(Color::Black, true));
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_queenside_castle_moves_rook() {
        let mut board = board("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        let before = board.to_fen();
        let mv = Move::castle_queenside(Square::at(7, 4), Square::at(7, 2));
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(7, 2)).is_kind(PieceKind::King));
        assert!(board.piece_at(Square::at(7, 3)).is_kind(PieceKind::Rook));
        assert!(board.piece_at(Square::at(7, 0)).is_empty());
        assert!(!board.castling_rights().has(Color::Black, false));
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_promotion_and_revert() {
        let mut board = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let before = board.to_fen();
        let mv = Move::promotion(Square::at(6, 0), Square::at(7, 0), PieceKind::Queen, false);
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(7, 0)).is_kind(PieceKind::Queen));
        assert!(board.piece_at(Square::at(6, 0)).is_empty());
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_promotion_capture_and_revert() {
        let mut board = board("1n5k/P7/8/8/8/8/8/K7 w - - 0 1");
        let before = board.to_fen();
        let mv = Move::promotion(Square::at(6, 0), Square::at(7, 1), PieceKind::Knight, true);
        let info = board.make_move(mv);
        assert!(board.piece_at(Square::at(7, 1)).is_kind(PieceKind::Knight));
        assert!(board.piece_at(Square::at(7, 1)).is_white());
        assert_hash_consistent(&board);

        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_rook_move_revokes_one_flank() {
        let mut board = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let info = board.make_move(Move::quiet(Square::at(0, 0), Square::at(0, 1)));
        assert!(board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::White, false));
        assert_hash_consistent(&board);
        board.unmake_move(info);
        assert_eq!(board.castling_rights(), CastlingRights::all());
    }

    #[test]
    fn test_rook_captured_on_home_square_revokes_rights() {
        let mut board = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        // Ra1xa8: both queenside rights fall
        let info = board.make_move(Move::capture(Square::at(0, 0), Square::at(7, 0)));
        assert!(!board.castling_rights().has(Color::White, false));
        assert!(!board.castling_rights().has(Color::Black, false));
        assert!(board.castling_rights().has(Color::White, true));
        assert!(board.castling_rights().has(Color::Black, true));
        assert_hash_consistent(&board);
        board.unmake_move(info);
        assert_eq!(board.castling_rights(), CastlingRights::all());
    }

    #[test]
    fn test_fullmove_counter() {
        let mut board = Board::new();
        assert_eq!(board.fullmove_number(), 1);
        let white = board.make_move(Move::double_pawn_push(Square::at(1, 4), Square::at(3, 4)));
        assert_eq!(board.fullmove_number(), 1);
        let black = board.make_move(Move::double_pawn_push(Square::at(6, 4), Square::at(4, 4)));
        assert_eq!(board.fullmove_number(), 2);
        board.unmake_move(black);
        assert_eq!(board.fullmove_number(), 1);
        board.unmake_move(white);
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn test_hash_transposes() {
        // Same position reached through different move orders hashes equal.
        let mut a = Board::new();
        a.make_move(Move::quiet(Square::at(0, 6), Square::at(2, 5))); // Nf3
        a.make_move(Move::quiet(Square::at(7, 6), Square::at(5, 5))); // Nf6
        a.make_move(Move::quiet(Square::at(0, 1), Square::at(2, 2))); // Nc3

        let mut b = Board::new();
        b.make_move(Move::quiet(Square::at(0, 1), Square::at(2, 2))); // Nc3
        b.make_move(Move::quiet(Square::at(7, 6), Square::at(5, 5))); // Nf6
        b.make_move(Move::quiet(Square::at(0, 6), Square::at(2, 5))); // Nf3

        assert_eq!(a.hash(), b.hash());
    }
}
