//! Move type and move list.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::PieceKind;
use super::square::Square;

// Move flags (4 bits, values 0-15)
const FLAG_QUIET: u16 = 0;
const FLAG_DOUBLE_PAWN: u16 = 1;
const FLAG_CASTLE_KINGSIDE: u16 = 2;
const FLAG_CASTLE_QUEENSIDE: u16 = 3;
const FLAG_CAPTURE: u16 = 4;
const FLAG_EN_PASSANT: u16 = 5;
// 6-7 reserved
const FLAG_PROMO_KNIGHT: u16 = 8;
const FLAG_PROMO_BISHOP: u16 = 9;
const FLAG_PROMO_ROOK: u16 = 10;
const FLAG_PROMO_QUEEN: u16 = 11;
const FLAG_PROMO_CAPTURE_KNIGHT: u16 = 12;

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-5:   origin square (0-63)
/// - bits 6-11:  destination square (0-63)
/// - bits 12-15: category flag
///
/// Equality is full-value equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// Create a null/empty move (used for initialization)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    /// Create a quiet move (no capture, no special category)
    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_QUIET)
    }

    /// Create a capture move
    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_CAPTURE)
    }

    /// Create a double pawn push
    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_DOUBLE_PAWN)
    }

    /// Create an en passant capture
    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_EN_PASSANT)
    }

    /// Create a kingside castle move
    #[inline]
    #[must_use]
    pub const fn castle_kingside(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_CASTLE_KINGSIDE)
    }

    /// Create a queenside castle move
    #[inline]
    #[must_use]
    pub const fn castle_queenside(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_CASTLE_QUEENSIDE)
    }

    /// Create a promotion move, capturing or not.
    ///
    /// Pawn and king promotion targets are not representable; they map to
    /// a queen promotion.
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, kind: PieceKind, is_capture: bool) -> Self {
        let base = match kind {
            PieceKind::Knight => FLAG_PROMO_KNIGHT,
            PieceKind::Bishop => FLAG_PROMO_BISHOP,
            PieceKind::Rook => FLAG_PROMO_ROOK,
            _ => FLAG_PROMO_QUEEN,
        };
        let flag = if is_capture { base + 4 } else { base };
        Move::with_flag(from, to, flag)
    }

    #[inline]
    const fn with_flag(from: Square, to: Square, flag: u16) -> Self {
        let from_idx = from.as_index() as u16;
        let to_idx = to.as_index() as u16;
        Move(from_idx | (to_idx << 6) | (flag << 12))
    }

    /// Get the origin square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & 0x3F) as usize)
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    const fn flag(self) -> u16 {
        self.0 >> 12
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        let f = self.flag();
        f == FLAG_CAPTURE || f == FLAG_EN_PASSANT || f >= FLAG_PROMO_CAPTURE_KNIGHT
    }

    /// Returns true if this move is an en passant capture
    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    /// Returns true if this move is a castle (either side)
    #[inline]
    #[must_use]
    pub const fn is_castle(self) -> bool {
        let f = self.flag();
        f == FLAG_CASTLE_KINGSIDE || f == FLAG_CASTLE_QUEENSIDE
    }

    /// Returns true if this is a kingside castle (O-O)
    #[inline]
    #[must_use]
    pub const fn is_castle_kingside(self) -> bool {
        self.flag() == FLAG_CASTLE_KINGSIDE
    }

    /// Returns true if this is a queenside castle (O-O-O)
    #[inline]
    #[must_use]
    pub const fn is_castle_queenside(self) -> bool {
        self.flag() == FLAG_CASTLE_QUEENSIDE
    }

    /// Returns true if this move is a double pawn push
    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flag() == FLAG_DOUBLE_PAWN
    }

    /// Returns true if this move is a pawn promotion
    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.flag() >= FLAG_PROMO_KNIGHT
    }

    /// The promotion target kind, or `None` for non-promotion moves
    #[inline]
    #[must_use]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self.flag() & !4 {
            FLAG_PROMO_KNIGHT => Some(PieceKind::Knight),
            FLAG_PROMO_BISHOP => Some(PieceKind::Bishop),
            FLAG_PROMO_ROOK => Some(PieceKind::Rook),
            FLAG_PROMO_QUEEN => Some(PieceKind::Queen),
            _ => None,
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "={}", kind.to_char().to_ascii_uppercase())?;
        }
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if self.is_castle() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// List of moves with a fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [Move::null(); MAX_MOVES],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Reorder so promotions come first, then captures, then castles, then
    /// the rest. Membership is unchanged.
    pub(crate) fn sort_for_search(&mut self) {
        self.as_mut_slice().sort_by_key(|mv| {
            if mv.is_promotion() {
                0
            } else if mv.is_capture() {
                1
            } else if mv.is_castle() {
                2
            } else {
                3
            }
        });
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}
