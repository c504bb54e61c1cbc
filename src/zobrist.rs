//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes used as
//! transposition-table keys. XOR is self-inverse, so removing and
//! re-inserting the same state feature are the identical operation.
//!
//! Keys live in an explicit [`ZobristKeys`] value owned by the board
//! (via `Arc`) rather than a hidden module global, so tests can inject a
//! differently-seeded table. A process-wide default table built from
//! [`DEFAULT_SEED`] is shared by `Board::new` and friends.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Piece, PositionView, Square};

/// Seed for the shared default key table.
pub const DEFAULT_SEED: u64 = 0x9E3779B97F4A7C15;

static DEFAULT_KEYS: Lazy<Arc<ZobristKeys>> =
    Lazy::new(|| Arc::new(ZobristKeys::new(DEFAULT_SEED)));

/// Return the shared default key table.
#[must_use]
pub fn default_keys() -> Arc<ZobristKeys> {
    Arc::clone(&DEFAULT_KEYS)
}

/// Random key tables for every hashable state feature.
pub struct ZobristKeys {
    // piece_keys[kind][color][square]
    piece_keys: [[[u64; 64]; 2]; 6],
    white_to_move_key: u64,
    // castling_keys[i] pairs with bit i of the CastlingRights bitmask
    castling_keys: [u64; 4],
    // en_passant_keys[file]: only the file of the target matters
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    /// Generate a key table from a deterministic seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        let mut castling_keys = [0u64; 4];
        let mut en_passant_keys = [0u64; 8];

        for kind in &mut piece_keys {
            for color in kind.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let white_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            white_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    fn piece_key(&self, piece: Piece, square: Square) -> u64 {
        match (piece.kind(), piece.color()) {
            (Some(kind), Some(color)) => {
                self.piece_keys[kind.index()][color.index()][square.as_index()]
            }
            // Empty squares contribute nothing to the hash
            _ => 0,
        }
    }

    /// Compute the hash of a full position from scratch.
    #[must_use]
    pub fn full_hash<P: PositionView>(&self, pos: &P) -> u64 {
        let mut hash = 0u64;

        for square in Square::all() {
            hash ^= self.piece_key(pos.piece_at(square), square);
        }

        if pos.white_to_move() {
            hash ^= self.white_to_move_key;
        }

        hash ^= self.rights_keys(pos.castling_rights());

        if let Some(target) = pos.en_passant_target() {
            hash ^= self.en_passant_keys[target.file()];
        }

        hash
    }

    /// Update a hash for a square changing from `old` to `new`.
    #[inline]
    #[must_use]
    pub(crate) fn piece_update(&self, hash: u64, square: Square, old: Piece, new: Piece) -> u64 {
        hash ^ self.piece_key(old, square) ^ self.piece_key(new, square)
    }

    /// Update a hash for castling rights changing from `old` to `new`.
    #[inline]
    #[must_use]
    pub(crate) fn rights_update(
        &self,
        hash: u64,
        old: CastlingRights,
        new: CastlingRights,
    ) -> u64 {
        let mut hash = hash;
        let changed = old.as_u8() ^ new.as_u8();
        for (i, key) in self.castling_keys.iter().enumerate() {
            if changed & (1 << i) != 0 {
                hash ^= key;
            }
        }
        hash
    }

    /// Update a hash for the en passant target changing from `old` to `new`.
    #[inline]
    #[must_use]
    pub(crate) fn en_passant_update(
        &self,
        hash: u64,
        old: Option<Square>,
        new: Option<Square>,
    ) -> u64 {
        let mut hash = hash;
        if let Some(target) = old {
            hash ^= self.en_passant_keys[target.file()];
        }
        if let Some(target) = new {
            hash ^= self.en_passant_keys[target.file()];
        }
        hash
    }

    /// Update a hash for the side to move flipping.
    #[inline]
    #[must_use]
    pub(crate) fn side_update(&self, hash: u64) -> u64 {
        hash ^ self.white_to_move_key
    }

    fn rights_keys(&self, rights: CastlingRights) -> u64 {
        let mut hash = 0u64;
        for (i, key) in self.castling_keys.iter().enumerate() {
            if rights.as_u8() & (1 << i) != 0 {
                hash ^= key;
            }
        }
        hash
    }
}
