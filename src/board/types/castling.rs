//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

const ALL_CASTLING_RIGHTS: u8 = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Four independent castling-right flags represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle kingside and queenside)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is held
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Grant a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Revoke a specific castling right
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    /// Revoke both of a color's castling rights
    #[inline]
    pub fn remove_both(&mut self, color: Color) {
        self.0 &= !(Self::bit_for(color, true) | Self::bit_for(color, false));
    }

    /// Get the raw bitmask (used for Zobrist hashing)
    #[inline]
    #[must_use]
    pub(crate) const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}
