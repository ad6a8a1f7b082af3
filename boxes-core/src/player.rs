//! Players that can take part in a game

use crate::ai::MinimaxAI;
use crate::board::{Board, Move, Side};
use crate::dots::DotsBoard;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Something that picks moves for one side
pub trait Player {
    fn side(&self) -> Side;

    /// Short label for reports
    fn name(&self) -> String;

    /// Choose a move, or `None` to pass
    fn play(&mut self, board: &DotsBoard) -> Option<Move>;
}

impl Player for MinimaxAI {
    fn side(&self) -> Side {
        MinimaxAI::side(self)
    }

    fn name(&self) -> String {
        format!("minimax(ply={})", self.ply())
    }

    fn play(&mut self, board: &DotsBoard) -> Option<Move> {
        MinimaxAI::play(self, board)
    }
}

/// Uniformly random legal moves, reproducible from a seed
pub struct RandomPlayer {
    side: Side,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> String {
        "random".to_string()
    }

    fn play(&mut self, board: &DotsBoard) -> Option<Move> {
        board.ordered_moves().choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_player_is_legal() {
        let board = DotsBoard::new(3, 3).unwrap();
        let mut player = RandomPlayer::with_seed(Side::Red, 7);
        for _ in 0..20 {
            let mv = player.play(&board).unwrap();
            assert!(board.is_line(mv));
            assert!(!board.is_claimed(mv));
        }
    }

    #[test]
    fn test_random_player_is_reproducible() {
        let board = DotsBoard::new(3, 3).unwrap();
        let mut a = RandomPlayer::with_seed(Side::Red, 99);
        let mut b = RandomPlayer::with_seed(Side::Red, 99);
        for _ in 0..10 {
            assert_eq!(a.play(&board), b.play(&board));
        }
    }

    #[test]
    fn test_players_pass_on_full_board() {
        let mut board = DotsBoard::new(1, 1).unwrap();
        for mv in board.ordered_moves() {
            board.place(Side::Red, mv).unwrap();
        }
        assert_eq!(RandomPlayer::with_seed(Side::Blue, 1).play(&board), None);

        let mut ai = MinimaxAI::new(Side::Blue, 3);
        assert_eq!(Player::play(&mut ai, &board), None);
        assert_eq!(Player::name(&ai), "minimax(ply=3)");
    }
}
