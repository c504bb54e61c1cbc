//! Piece and color types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piece types, excluding the empty square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in index order
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Parse a piece kind from a character (case-insensitive)
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Convert to a lowercase character
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// Promotion piece choices in generation order (queen first)
pub(crate) const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Chess colors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors in index order (White=0, Black=1)
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Scoring sign for evaluation (+1 for White, -1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Back rank for this color (0 for White, 7 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Pawn forward direction in ranks (+1 for White, -1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_direction(self) -> isize {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Pawn starting rank (1 for White, 6 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_start_rank(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn promotes from (6 for White, 1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_promotion_from_rank(self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Contents of one board square, packed into a byte.
///
/// Encoding:
/// - 0 means the square is empty
/// - otherwise bit 0 is the color (1 = White) and bits 1-3 hold
///   the piece kind index plus one
///
/// Kind and color are independently testable; an empty square carries no
/// color bit at all, so round-tripping an empty piece is always consistent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece(u8);

const WHITE_BIT: u8 = 0b0001;

impl Piece {
    /// The empty square
    pub const EMPTY: Piece = Piece(0);

    /// Create a piece of the given kind and color
    #[inline]
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        let kind_bits = ((kind.index() as u8) + 1) << 1;
        let color_bit = match color {
            Color::White => WHITE_BIT,
            Color::Black => 0,
        };
        Piece(kind_bits | color_bit)
    }

    /// Whether this square is empty
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The piece kind, or `None` for an empty square
    #[inline]
    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self.0 >> 1 {
            0 => None,
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            _ => Some(PieceKind::King),
        }
    }

    /// The piece color, or `None` for an empty square
    #[inline]
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        if self.is_empty() {
            None
        } else if self.0 & WHITE_BIT != 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// Whether this is a white piece (false for empty squares)
    #[inline]
    #[must_use]
    pub const fn is_white(self) -> bool {
        !self.is_empty() && self.0 & WHITE_BIT != 0
    }

    /// Whether this piece belongs to the given color
    #[inline]
    #[must_use]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Whether this piece is of the given kind
    #[inline]
    #[must_use]
    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Parse a piece from its FEN character (case denotes color)
    #[must_use]
    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    /// The FEN character for this piece (uppercase for White), or `None`
    /// for an empty square
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        let c = self.kind()?.to_char();
        if self.is_white() {
            Some(c.to_ascii_uppercase())
        } else {
            Some(c)
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::EMPTY
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "Piece({c})"),
            None => write!(f, "Piece(.)"),
        }
    }
}
