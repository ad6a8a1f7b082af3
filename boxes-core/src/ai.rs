//! Minimax AI with alpha-beta pruning
//!
//! The search works on a private copy of the board, applying and undoing moves in
//! place. A move that keeps the turn (a completed box) recurses into the same kind
//! of node instead of handing over to the opponent.

use crate::board::{Board, BoardError, Move, Side};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// VALUE TYPES
// ============================================================================

/// Best move found at a node together with its backed-up value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveValue {
    pub value: i32,
    pub mv: Option<Move>,
}

impl MoveValue {
    pub fn new(value: i32) -> Self {
        Self { value, mv: None }
    }
}

/// Why a search had to fall back to the no-move result
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("board rejected search move: {0}")]
    Board(#[from] BoardError),

    #[error("board panicked during search: {0}")]
    Panicked(String),
}

/// Result of a top-level search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search ran to completion
    Completed(MoveValue),
    /// The search failed internally; carries the zero-valued, no-move fallback
    Failed(MoveValue),
}

impl SearchOutcome {
    pub fn best(&self) -> MoveValue {
        match *self {
            SearchOutcome::Completed(best) | SearchOutcome::Failed(best) => best,
        }
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best().mv
    }

    pub fn value(&self) -> i32 {
        self.best().value
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Failed(_))
    }
}

/// Outcome plus the bookkeeping of one `search` call
#[derive(Clone, Copy, Debug)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub elapsed: Duration,
    /// Nodes visited, leaves included
    pub nodes: u64,
}

// ============================================================================
// SEARCH CLOCK
// ============================================================================

/// Accumulated wall-clock time spent searching.
///
/// Starts at zero and only grows. Shared through `Arc` so several engines, possibly
/// on different threads, can add to one total.
#[derive(Debug, Default)]
pub struct SearchClock {
    total_nanos: AtomicU64,
}

impl SearchClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn total_nanos(&self) -> u64 {
        self.total_nanos.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_nanos())
    }
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Depth-limited alpha-beta player for one side
#[derive(Clone, Debug)]
pub struct MinimaxAI {
    side: Side,
    ply: u32,
    clock: Arc<SearchClock>,
}

impl MinimaxAI {
    pub fn new(side: Side, ply: u32) -> Self {
        Self::with_clock(side, ply, Arc::new(SearchClock::new()))
    }

    pub fn with_clock(side: Side, ply: u32, clock: Arc<SearchClock>) -> Self {
        Self { side, ply, clock }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn clock(&self) -> &Arc<SearchClock> {
        &self.clock
    }

    /// Best move for this side, or `None` when there is nothing to play
    pub fn play<B: Board>(&self, board: &B) -> Option<Move> {
        self.search(board).outcome.best_move()
    }

    /// Run a full search on a copy of `board`.
    ///
    /// Never fails: board errors and panics raised during the search are logged and
    /// turned into a zero-valued result without a move.
    pub fn search<B: Board>(&self, board: &B) -> SearchReport {
        let start = Instant::now();

        let mut search = Search {
            side: self.side,
            ply: self.ply,
            nodes: 0,
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut board = board.clone();
            search.max_value(&mut board, i32::MIN, i32::MAX, 0)
        }));

        let outcome = match result {
            Ok(Ok(best)) => SearchOutcome::Completed(best),
            Ok(Err(e)) => self.fail(SearchError::from(e)),
            Err(payload) => self.fail(SearchError::Panicked(panic_message(payload))),
        };

        let elapsed = start.elapsed();
        self.clock.record(elapsed);

        tracing::debug!(
            side = %self.side,
            ply = self.ply,
            nodes = search.nodes,
            value = outcome.value(),
            elapsed_us = elapsed.as_micros() as u64,
            "search finished"
        );

        SearchReport {
            outcome,
            elapsed,
            nodes: search.nodes,
        }
    }

    fn fail(&self, error: SearchError) -> SearchOutcome {
        tracing::error!(side = %self.side, ply = self.ply, "{}", error);
        SearchOutcome::Failed(MoveValue::new(0))
    }
}

/// Score difference from `side`'s point of view
pub fn utility<B: Board>(board: &B, side: Side) -> i32 {
    board.score(side) - board.score(side.opponent())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// State of one top-level search
struct Search {
    side: Side,
    ply: u32,
    nodes: u64,
}

impl Search {
    fn is_leaf<B: Board>(&self, board: &B, depth: u32) -> bool {
        depth >= self.ply || board.is_game_over()
    }

    fn leaf<B: Board>(&self, board: &B) -> MoveValue {
        MoveValue::new(utility(board, self.side))
    }

    /// Node where this side moves
    fn max_value<B: Board>(
        &mut self,
        board: &mut B,
        mut alpha: i32,
        beta: i32,
        depth: u32,
    ) -> Result<MoveValue, BoardError> {
        self.nodes += 1;

        if self.is_leaf(board, depth) {
            return Ok(self.leaf(board));
        }

        let moves = board.ordered_moves();
        if moves.is_empty() {
            return Ok(self.leaf(board));
        }

        let mut best = MoveValue::new(i32::MIN);

        for mv in moves {
            let extra_turn = board.place(self.side, mv)?;

            let branch = if extra_turn {
                self.max_value(board, alpha, beta, depth + 1)?
            } else {
                self.min_value(board, alpha, beta, depth + 1)?
            };

            board.undo(mv)?;

            // Ties keep the earlier move, but a node with moves always names one
            if branch.value > best.value {
                best = MoveValue { value: branch.value, mv: Some(mv) };
            } else if best.mv.is_none() {
                best.mv = Some(mv);
            }

            if best.value >= beta {
                return Ok(best);
            }

            alpha = alpha.max(best.value);
        }

        Ok(best)
    }

    /// Node where the opponent moves
    fn min_value<B: Board>(
        &mut self,
        board: &mut B,
        alpha: i32,
        mut beta: i32,
        depth: u32,
    ) -> Result<MoveValue, BoardError> {
        self.nodes += 1;

        if self.is_leaf(board, depth) {
            return Ok(self.leaf(board));
        }

        let moves = board.ordered_moves();
        if moves.is_empty() {
            return Ok(self.leaf(board));
        }

        let mut best = MoveValue::new(i32::MAX);
        let opponent = self.side.opponent();

        for mv in moves {
            let extra_turn = board.place(opponent, mv)?;

            let branch = if extra_turn {
                self.min_value(board, alpha, beta, depth + 1)?
            } else {
                self.max_value(board, alpha, beta, depth + 1)?
            };

            board.undo(mv)?;

            if branch.value < best.value {
                best = MoveValue { value: branch.value, mv: Some(mv) };
            } else if best.mv.is_none() {
                best.mv = Some(mv);
            }

            if best.value <= alpha {
                return Ok(best);
            }

            beta = beta.min(best.value);
        }

        Ok(best)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dots::DotsBoard;

    #[test]
    fn test_ai_returns_move() {
        let board = DotsBoard::new(2, 2).unwrap();
        let ai = MinimaxAI::new(Side::Red, 3);
        let mv = ai.play(&board);
        assert!(mv.is_some());
    }

    #[test]
    fn test_ai_takes_free_box() {
        let board = DotsBoard::from_moves(
            2,
            2,
            &[
                (Side::Red, Move::new(0, 1)),
                (Side::Blue, Move::new(1, 0)),
                (Side::Red, Move::new(2, 1)),
            ],
        )
        .unwrap();

        let ai = MinimaxAI::new(Side::Blue, 1);
        let report = ai.search(&board);
        assert_eq!(report.outcome, SearchOutcome::Completed(MoveValue {
            value: 1,
            mv: Some(Move::new(1, 2)),
        }));
    }

    #[test]
    fn test_search_leaves_caller_board_untouched() {
        let board = DotsBoard::from_moves(2, 2, &[(Side::Red, Move::new(0, 1))]).unwrap();
        let before = board.clone();
        MinimaxAI::new(Side::Red, 4).play(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clock_accumulates() {
        let clock = Arc::new(SearchClock::new());
        let red = MinimaxAI::with_clock(Side::Red, 2, Arc::clone(&clock));
        let blue = MinimaxAI::with_clock(Side::Blue, 2, Arc::clone(&clock));
        let board = DotsBoard::new(2, 2).unwrap();

        assert_eq!(clock.total_nanos(), 0);
        let a = red.search(&board);
        let after_first = clock.total_nanos();
        let b = blue.search(&board);

        assert!(clock.total_nanos() >= after_first);
        assert_eq!(clock.total(), a.elapsed + b.elapsed);
    }

    #[test]
    fn test_clock_record() {
        let clock = SearchClock::new();
        clock.record(Duration::from_nanos(1500));
        clock.record(Duration::from_micros(2));
        assert_eq!(clock.total_nanos(), 3500);
    }

    #[test]
    fn test_utility_symmetry() {
        let board = DotsBoard::from_moves(
            1,
            1,
            &[
                (Side::Red, Move::new(0, 1)),
                (Side::Red, Move::new(1, 0)),
                (Side::Red, Move::new(2, 1)),
                (Side::Blue, Move::new(1, 2)),
            ],
        )
        .unwrap();
        assert_eq!(utility(&board, Side::Blue), 1);
        assert_eq!(utility(&board, Side::Red), -1);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(7u8)), "unknown panic");
    }
}
