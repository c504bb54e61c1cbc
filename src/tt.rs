//! Fixed-capacity transposition table.
//!
//! Search results are cached by Zobrist hash. Slots are assigned by
//! `hash % capacity`, so distinct positions can collide; every probe
//! therefore verifies the stored full hash before trusting an entry.

use crate::board::Move;

/// Default number of slots, roughly 24 MB of entries.
pub const DEFAULT_TT_CAPACITY: usize = 1 << 20;

/// One cached search result.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    hash: u64,
    depth: u32,
    eval: i32,
    best_move: Move,
}

impl TtEntry {
    /// Remaining search depth the entry was computed at
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Cached evaluation, relative to the side to move
    #[must_use]
    pub fn eval(&self) -> i32 {
        self.eval
    }

    /// Best move found for the position
    #[must_use]
    pub fn best_move(&self) -> Move {
        self.best_move
    }
}

/// Hash-indexed cache of search results.
pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
}

impl TranspositionTable {
    /// Create a table with a fixed number of slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "transposition table needs at least one slot");
        TranspositionTable {
            entries: vec![None; capacity],
        }
    }

    /// Look up an entry usable at the given remaining depth.
    ///
    /// Returns `None` on an empty slot, a full-hash mismatch (slot
    /// collision), or an entry computed at a shallower depth.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: u32) -> Option<TtEntry> {
        let entry = self.entries[self.slot(hash)]?;
        if entry.hash == hash && entry.depth >= depth {
            Some(entry)
        } else {
            None
        }
    }

    /// Store a search result, keeping whichever of the old and new
    /// entries was searched deeper.
    pub fn insert(&mut self, hash: u64, depth: u32, eval: i32, best_move: Move) {
        let slot = self.slot(hash);
        if let Some(existing) = self.entries[slot] {
            if existing.depth > depth {
                return;
            }
        }
        self.entries[slot] = Some(TtEntry {
            hash,
            depth,
            eval,
            best_move,
        });
    }

    /// Drop all cached entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv(from: usize, to: usize) -> Move {
        Move::quiet(Square::from_index(from), Square::from_index(to))
    }

    #[test]
    fn test_insert_then_probe() {
        let mut tt = TranspositionTable::new(16);
        tt.insert(0xABCD, 3, 42, mv(12, 28));
        let entry = tt.probe(0xABCD, 3).unwrap();
        assert_eq!(entry.depth(), 3);
        assert_eq!(entry.eval(), 42);
        assert_eq!(entry.best_move(), mv(12, 28));
    }

    #[test]
    fn test_probe_misses_on_empty_slot() {
        let tt = TranspositionTable::new(16);
        assert!(tt.probe(0xABCD, 1).is_none());
    }

    #[test]
    fn test_probe_rejects_shallower_entry() {
        let mut tt = TranspositionTable::new(16);
        tt.insert(0xABCD, 2, 42, mv(12, 28));
        assert!(tt.probe(0xABCD, 3).is_none());
        assert!(tt.probe(0xABCD, 2).is_some());
        assert!(tt.probe(0xABCD, 1).is_some());
    }

    #[test]
    fn test_colliding_hash_is_not_returned() {
        let mut tt = TranspositionTable::new(16);
        // Same slot (mod 16), different full hash.
        tt.insert(0x10, 3, 42, mv(12, 28));
        assert!(tt.probe(0x20, 1).is_none());
    }

    #[test]
    fn test_deeper_entry_survives_collision() {
        let mut tt = TranspositionTable::new(16);
        tt.insert(0x10, 5, 42, mv(12, 28));
        tt.insert(0x20, 2, 7, mv(0, 8));
        // The shallow entry was refused; the deep one still probes.
        assert!(tt.probe(0x20, 2).is_none());
        assert_eq!(tt.probe(0x10, 5).unwrap().eval(), 42);
    }

    #[test]
    fn test_deeper_result_replaces_shallower() {
        let mut tt = TranspositionTable::new(16);
        tt.insert(0x10, 2, 7, mv(0, 8));
        tt.insert(0x10, 5, 42, mv(12, 28));
        assert_eq!(tt.probe(0x10, 5).unwrap().eval(), 42);
    }

    #[test]
    fn test_clear_drops_entries() {
        let mut tt = TranspositionTable::new(16);
        tt.insert(0x10, 3, 42, mv(12, 28));
        tt.clear();
        assert!(tt.probe(0x10, 1).is_none());
        assert_eq!(tt.capacity(), 16);
    }
}
