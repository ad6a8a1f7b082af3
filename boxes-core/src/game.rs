//! Game runner - plays one game between two players

use crate::board::{Board, BoardError, Move, Side};
use crate::dots::DotsBoard;
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// Outcome of a single game
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRecord {
    /// Every placement in order, with the side that made it
    pub moves: Vec<(Side, Move)>,
    pub red_score: i32,
    pub blue_score: i32,
    /// Turns a player gave up by returning no move
    pub passes: u32,
    /// Whether the board was filled (false when both sides passed)
    pub completed: bool,
}

impl GameRecord {
    /// Winner, or `None` for a draw
    pub fn winner(&self) -> Option<Side> {
        match self.red_score.cmp(&self.blue_score) {
            std::cmp::Ordering::Greater => Some(Side::Red),
            std::cmp::Ordering::Less => Some(Side::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Red => self.red_score,
            Side::Blue => self.blue_score,
        }
    }
}

/// Play `board` to the end, red moving first.
///
/// A box-completing move keeps the turn. A player returning `None` passes; two
/// passes in a row end the game early. The final position is left in `board`.
pub fn play_game(
    board: &mut DotsBoard,
    red: &mut dyn Player,
    blue: &mut dyn Player,
) -> Result<GameRecord, BoardError> {
    let mut moves = Vec::with_capacity(board.total_lines());
    let mut passes = 0;
    let mut consecutive_passes = 0;
    let mut to_move = Side::Red;

    while !board.is_game_over() {
        let player: &mut dyn Player = match to_move {
            Side::Red => &mut *red,
            Side::Blue => &mut *blue,
        };

        match player.play(board) {
            Some(mv) => {
                let extra_turn = board.place(to_move, mv)?;
                tracing::debug!(side = %to_move, %mv, extra_turn, "move played");
                moves.push((to_move, mv));
                consecutive_passes = 0;
                if !extra_turn {
                    to_move = to_move.opponent();
                }
            }
            None => {
                tracing::debug!(side = %to_move, "pass");
                passes += 1;
                consecutive_passes += 1;
                if consecutive_passes >= 2 {
                    break;
                }
                to_move = to_move.opponent();
            }
        }
    }

    Ok(GameRecord {
        moves,
        red_score: board.score(Side::Red),
        blue_score: board.score(Side::Blue),
        passes,
        completed: board.is_game_over(),
    })
}
