//! Alpha-beta game tree search.
//!
//! Scores inside the search are absolute: positive favors White,
//! negative favors Black. White nodes maximize and Black nodes
//! minimize, so pruning never changes the value the root would get
//! from a full-window minimax; move ordering and the transposition
//! table only change how fast it is found.

use log::debug;

use crate::board::{evaluate, generate_moves, Board, Move, PositionView};
use crate::tt::TranspositionTable;

/// Counters describing the work one search performed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    nodes: u64,
    evaluations: u64,
    generated_moves: u64,
    tt_hits: u64,
}

impl SearchStats {
    /// Nodes entered, including leaves
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Leaf positions statically evaluated
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Moves produced by the generator
    #[must_use]
    pub fn generated_moves(&self) -> u64 {
        self.generated_moves
    }

    /// Interior nodes answered from the transposition table
    #[must_use]
    pub fn tt_hits(&self) -> u64 {
        self.tt_hits
    }
}

/// A search engine holding its transposition table and statistics
/// across calls.
pub struct Search {
    tt: TranspositionTable,
    stats: SearchStats,
}

impl Search {
    /// Create a search with a default-sized transposition table.
    #[must_use]
    pub fn new() -> Self {
        Search::with_table(TranspositionTable::default())
    }

    /// Create a search around an existing transposition table.
    #[must_use]
    pub fn with_table(tt: TranspositionTable) -> Self {
        Search {
            tt,
            stats: SearchStats::default(),
        }
    }

    /// Find the best move from this position, looking `max_depth` plies
    /// ahead.
    ///
    /// Returns the move and its score (positive favors White). The board
    /// is mutated during the search but restored before returning. With
    /// `max_depth` of 0, or when the side to move has no pseudo-legal
    /// moves, the returned move is [`Move::null`].
    pub fn search_position(&mut self, board: &mut Board, max_depth: u32) -> (Move, i32) {
        self.stats = SearchStats::default();

        let (best_move, eval) = self.search_pruned(board, max_depth, i32::MIN, i32::MAX);

        debug!(
            "search depth {}: {} eval {} ({} nodes, {} evals, {} tt hits)",
            max_depth, best_move, eval, self.stats.nodes, self.stats.evaluations, self.stats.tt_hits
        );

        (best_move, eval)
    }

    /// Statistics from the most recent `search_position` call.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Drop all cached transposition-table entries.
    pub fn clear_table(&mut self) {
        self.tt.clear();
    }

    fn search_pruned(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Move, i32) {
        self.stats.nodes += 1;

        if depth == 0 {
            self.stats.evaluations += 1;
            // The evaluator scores for the side to move; flip to absolute.
            return (Move::null(), evaluate(board) * board.side_to_move().sign());
        }

        if let Some(entry) = self.tt.probe(board.hash(), depth) {
            self.stats.tt_hits += 1;
            return (entry.best_move(), entry.eval());
        }

        let (alpha_in, beta_in) = (alpha, beta);

        let mut moves = generate_moves(board);
        moves.sort_for_search();
        self.stats.generated_moves += moves.len() as u64;

        let mut best_move = Move::null();
        let mut best_eval;

        if board.white_to_move() {
            best_eval = i32::MIN;

            for &mv in &moves {
                let info = board.make_move(mv);
                let (_, eval) = self.search_pruned(board, depth - 1, alpha, beta);
                board.unmake_move(info);

                if eval > best_eval {
                    best_move = mv;
                    best_eval = eval;
                }
                if best_eval >= beta {
                    break;
                }
                alpha = alpha.max(best_eval);
            }
        } else {
            best_eval = i32::MAX;

            for &mv in &moves {
                let info = board.make_move(mv);
                let (_, eval) = self.search_pruned(board, depth - 1, alpha, beta);
                board.unmake_move(info);

                if eval < best_eval {
                    best_move = mv;
                    best_eval = eval;
                }
                if best_eval <= alpha {
                    break;
                }
                beta = beta.min(best_eval);
            }
        }

        // Only exact in-window results are cached: a value clamped by a
        // cutoff is just a bound, and reusing it under a different window
        // could change the root value.
        if best_eval > alpha_in && best_eval < beta_in {
            self.tt.insert(board.hash(), depth, best_eval, best_move);
        }

        (best_move, best_eval)
    }
}

impl Default for Search {
    fn default() -> Self {
        Search::new()
    }
}
