//! A compact chess engine core.
//!
//! The crate provides the decision-making pieces of a chess program:
//! a mailbox [`board::Board`] with make/unmake move application and
//! incremental Zobrist hashing, a pseudo-legal move generator, a
//! hand-tuned static evaluator, and an alpha-beta [`search::Search`]
//! backed by a [`tt::TranspositionTable`].
//!
//! ```
//! use mailbox_chess::board::Board;
//! use mailbox_chess::search::Search;
//!
//! let mut board = Board::new();
//! let mut search = Search::new();
//! let (best_move, eval) = search.search_position(&mut board, 3);
//! println!("{best_move} scores {eval}");
//! ```

pub mod board;
pub mod search;
pub mod tt;
pub mod zobrist;

pub use board::{Board, Move, PositionView};
pub use search::Search;
