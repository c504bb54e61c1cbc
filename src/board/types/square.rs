//! Square type and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

pub(crate) fn file_to_index(file: char) -> usize {
    file as usize - ('a' as usize)
}

pub(crate) fn rank_to_index(rank: char) -> usize {
    (rank as usize) - ('0' as usize) - 1
}

/// A square on the board, numbered 0-63 with a1=0, b1=1, ..., h8=63.
///
/// Rank 0 corresponds to rank "1" in algebraic notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a new square with bounds checking
    #[must_use]
    pub fn new(rank: usize, file: usize) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Create a square from known-valid rank and file
    #[inline]
    #[must_use]
    pub(crate) const fn at(rank: usize, file: usize) -> Self {
        debug_assert!(rank < 8 && file < 8);
        Square((rank * 8 + file) as u8)
    }

    /// Create a square from an index (0-63)
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 64);
        Square(idx as u8)
    }

    /// Get the rank (0-7, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 / 8) as usize
    }

    /// Get the file (0-7, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Get the square's index (0-63)
    #[inline]
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Flip the square vertically (e.g., a1 <-> a8)
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Iterate over all 64 squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (self.file() as u8 + b'a') as char, self.rank() + 1)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_c, rank_c) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file_c), Some(rank_c), None) => (file_c, rank_c),
            _ => {
                return Err(SquareError::InvalidNotation {
                    notation: s.to_string(),
                })
            }
        };

        if !('a'..='h').contains(&file_c) || !('1'..='8').contains(&rank_c) {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }

        Ok(Square::at(rank_to_index(rank_c), file_to_index(file_c)))
    }
}
