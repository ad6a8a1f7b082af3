//! Boxes Core - Search engine and game plumbing
//!
//! This crate provides the core pieces for playing extra-turn games such as dots-and-boxes:
//! - The `Board` contract consumed by the search (place/undo, scoring, terminal test)
//! - A dots-and-boxes board implementing that contract
//! - Depth-limited minimax with alpha-beta pruning
//! - Players, a game runner and match configuration

pub mod board;
pub mod dots;
pub mod ai;
pub mod player;
pub mod game;
pub mod config;

// Re-exports for convenient access
pub use board::{Board, BoardError, Move, Side};
pub use dots::DotsBoard;
pub use ai::{utility, MinimaxAI, MoveValue, SearchClock, SearchError, SearchOutcome, SearchReport};
pub use player::{Player, RandomPlayer};
pub use game::{play_game, GameRecord};
pub use config::{ConfigError, MatchConfig, PlayerConfig};
