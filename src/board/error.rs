//! Error types for board operations.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewFields { found: usize },
    /// Piece placement field did not decode to exactly 64 squares
    NotSixtyFourSquares { found: usize },
    /// Invalid piece character in the placement field
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewFields { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::NotSixtyFourSquares { found } => {
                write!(f, "FEN placement decoded to {found} squares, expected 64")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_square_count() {
        let err = FenError::NotSixtyFourSquares { found: 63 };
        assert!(err.to_string().contains("63"));
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_fen_error_invalid_side() {
        let err = FenError::InvalidSideToMove {
            found: "x".to_string(),
        };
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_fen_error_invalid_castling() {
        let err = FenError::InvalidCastling { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_fen_error_equality() {
        let err1 = FenError::TooFewFields { found: 2 };
        let err2 = FenError::TooFewFields { found: 2 };
        assert_eq!(err1, err2);
    }

    #[test]
    fn test_square_error_notation() {
        let err = SquareError::InvalidNotation {
            notation: "z9".to_string(),
        };
        assert!(err.to_string().contains("z9"));
    }
}
