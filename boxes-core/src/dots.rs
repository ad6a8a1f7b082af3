//! Dots-and-boxes board
//!
//! The board lives on a `(2h+1) x (2w+1)` lattice: dots sit on even/even cells,
//! boxes on odd/odd cells and lines on every cell whose coordinates sum to an odd
//! number. Claiming the fourth side of a box scores it and keeps the turn.

use crate::board::{Board, BoardError, Move, Side};
use std::fmt;

// ============================================================================
// BOARD STATE
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotsBoard {
    width: usize,
    height: usize,
    lines: Vec<bool>,
    owners: Vec<Option<Side>>,
    scores: [i32; 2],
    history: Vec<Move>,
}

impl DotsBoard {
    /// Create an empty board `width` boxes wide and `height` boxes tall
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidSize { width, height });
        }

        Ok(Self {
            width,
            height,
            lines: vec![false; (2 * height + 1) * (2 * width + 1)],
            owners: vec![None; width * height],
            scores: [0, 0],
            history: Vec::new(),
        })
    }

    /// Replay a sequence of placements onto an empty board
    pub fn from_moves(width: usize, height: usize, moves: &[(Side, Move)]) -> Result<Self, BoardError> {
        let mut board = Self::new(width, height)?;
        for &(side, mv) in moves {
            board.place(side, mv)?;
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> usize {
        2 * self.height + 1
    }

    pub fn cols(&self) -> usize {
        2 * self.width + 1
    }

    /// Number of lines on a full board
    pub fn total_lines(&self) -> usize {
        self.width * (self.height + 1) + self.height * (self.width + 1)
    }

    /// Lines placed so far, oldest first
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn is_line(&self, mv: Move) -> bool {
        mv.row < self.rows() && mv.col < self.cols() && (mv.row + mv.col) % 2 == 1
    }

    pub fn is_claimed(&self, mv: Move) -> bool {
        self.is_line(mv) && self.lines[self.cell(mv.row, mv.col)]
    }

    /// Owner of the box in column `x`, row `y` (box coordinates, not lattice)
    pub fn owner(&self, x: usize, y: usize) -> Option<Side> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.owners[y * self.width + x]
    }

    /// Every unclaimed line in lattice scan order
    pub fn free_lines(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.cols()).map(move |col| Move::new(row, col)))
            .filter(move |&mv| self.is_line(mv) && !self.lines[self.cell(mv.row, mv.col)])
    }

    // ========================================================================
    // LATTICE HELPERS
    // ========================================================================

    fn cell(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    fn box_index(&self, row: usize, col: usize) -> usize {
        (row / 2) * self.width + col / 2
    }

    /// Boxes (lattice coordinates) bordered by a line
    fn adjacent_boxes(&self, mv: Move) -> [Option<(usize, usize)>; 2] {
        if mv.row % 2 == 0 {
            // Horizontal line: boxes above and below
            [
                (mv.row > 0).then(|| (mv.row - 1, mv.col)),
                (mv.row + 1 < self.rows()).then(|| (mv.row + 1, mv.col)),
            ]
        } else {
            // Vertical line: boxes left and right
            [
                (mv.col > 0).then(|| (mv.row, mv.col - 1)),
                (mv.col + 1 < self.cols()).then(|| (mv.row, mv.col + 1)),
            ]
        }
    }

    fn sides_claimed(&self, (row, col): (usize, usize)) -> usize {
        [
            (row - 1, col),
            (row + 1, col),
            (row, col - 1),
            (row, col + 1),
        ]
        .iter()
        .filter(|&&(r, c)| self.lines[self.cell(r, c)])
        .count()
    }

    /// Most sides already claimed on any box this line borders
    fn max_adjacent_sides(&self, mv: Move) -> usize {
        self.adjacent_boxes(mv)
            .into_iter()
            .flatten()
            .map(|b| self.sides_claimed(b))
            .max()
            .unwrap_or(0)
    }
}

// ============================================================================
// BOARD CONTRACT
// ============================================================================

impl Board for DotsBoard {
    /// Box-completing lines first, then quiet lines, then lines that hand the
    /// opponent a box. Scan order within each group.
    fn ordered_moves(&self) -> Vec<Move> {
        let mut captures = Vec::new();
        let mut quiet = Vec::new();
        let mut sacrifices = Vec::new();

        for mv in self.free_lines() {
            match self.max_adjacent_sides(mv) {
                3 => captures.push(mv),
                2 => sacrifices.push(mv),
                _ => quiet.push(mv),
            }
        }

        captures.extend(quiet);
        captures.extend(sacrifices);
        captures
    }

    fn place(&mut self, side: Side, mv: Move) -> Result<bool, BoardError> {
        if !self.is_line(mv) {
            return Err(BoardError::OffBoard(mv));
        }
        let cell = self.cell(mv.row, mv.col);
        if self.lines[cell] {
            return Err(BoardError::Occupied(mv));
        }

        self.lines[cell] = true;

        let mut completed = false;
        for b in self.adjacent_boxes(mv).into_iter().flatten() {
            if self.sides_claimed(b) == 4 {
                let idx = self.box_index(b.0, b.1);
                self.owners[idx] = Some(side);
                self.scores[side.index()] += 1;
                completed = true;
            }
        }

        self.history.push(mv);
        Ok(completed)
    }

    fn undo(&mut self, mv: Move) -> Result<(), BoardError> {
        match self.history.last() {
            Some(&last) if last == mv => {}
            last => {
                return Err(BoardError::UndoOutOfOrder {
                    requested: mv,
                    last: last.copied(),
                })
            }
        }
        self.history.pop();

        // Any owned neighbour was completed by this line, since it was placed last
        for b in self.adjacent_boxes(mv).into_iter().flatten() {
            let idx = self.box_index(b.0, b.1);
            if let Some(owner) = self.owners[idx].take() {
                self.scores[owner.index()] -= 1;
            }
        }

        let cell = self.cell(mv.row, mv.col);
        self.lines[cell] = false;
        Ok(())
    }

    fn is_game_over(&self) -> bool {
        self.history.len() == self.total_lines()
    }

    fn score(&self, side: Side) -> i32 {
        self.scores[side.index()]
    }
}

impl fmt::Display for DotsBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let claimed = self.lines[self.cell(row, col)];
                let glyph = match (row % 2, col % 2) {
                    (0, 0) => "+",
                    (0, _) if claimed => "---",
                    (0, _) => "   ",
                    (_, 0) if claimed => "|",
                    (_, 0) => " ",
                    _ => match self.owners[self.box_index(row, col)] {
                        Some(Side::Red) => " R ",
                        Some(Side::Blue) => " B ",
                        None => "   ",
                    },
                };
                f.write_str(glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three sides of the top-left box on a 2x1 board
    fn three_sided() -> DotsBoard {
        DotsBoard::from_moves(
            2,
            1,
            &[
                (Side::Red, Move::new(0, 1)),
                (Side::Blue, Move::new(2, 1)),
                (Side::Red, Move::new(1, 0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_board() {
        assert_eq!(
            DotsBoard::new(0, 3),
            Err(BoardError::InvalidSize { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_line_count() {
        let board = DotsBoard::new(3, 2).unwrap();
        assert_eq!(board.total_lines(), 17);
        assert_eq!(board.ordered_moves().len(), 17);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_completing_box_grants_extra_turn() {
        let mut board = three_sided();
        let extra = board.place(Side::Blue, Move::new(1, 2)).unwrap();
        assert!(extra);
        assert_eq!(board.owner(0, 0), Some(Side::Blue));
        assert_eq!(board.score(Side::Blue), 1);
        assert_eq!(board.score(Side::Red), 0);
    }

    #[test]
    fn test_shared_line_completes_two_boxes() {
        let mut board = DotsBoard::from_moves(
            2,
            1,
            &[
                (Side::Red, Move::new(0, 1)),
                (Side::Red, Move::new(2, 1)),
                (Side::Red, Move::new(1, 0)),
                (Side::Red, Move::new(0, 3)),
                (Side::Red, Move::new(2, 3)),
                (Side::Red, Move::new(1, 4)),
            ],
        )
        .unwrap();
        assert!(board.place(Side::Blue, Move::new(1, 2)).unwrap());
        assert_eq!(board.score(Side::Blue), 2);
        assert!(board.is_game_over());
    }

    #[test]
    fn test_undo_restores_state() {
        let mut board = three_sided();
        let before = board.clone();
        board.place(Side::Blue, Move::new(1, 2)).unwrap();
        board.undo(Move::new(1, 2)).unwrap();
        assert_eq!(board, before);
        assert_eq!(board.owner(0, 0), None);
    }

    #[test]
    fn test_undo_out_of_order() {
        let mut board = three_sided();
        let err = board.undo(Move::new(0, 1)).unwrap_err();
        assert_eq!(
            err,
            BoardError::UndoOutOfOrder {
                requested: Move::new(0, 1),
                last: Some(Move::new(1, 0)),
            }
        );
    }

    #[test]
    fn test_illegal_placements() {
        let mut board = three_sided();
        assert_eq!(board.place(Side::Red, Move::new(0, 0)), Err(BoardError::OffBoard(Move::new(0, 0))));
        assert_eq!(board.place(Side::Red, Move::new(9, 1)), Err(BoardError::OffBoard(Move::new(9, 1))));
        assert_eq!(board.place(Side::Red, Move::new(0, 1)), Err(BoardError::Occupied(Move::new(0, 1))));
    }

    #[test]
    fn test_move_ordering() {
        let board = three_sided();
        let moves = board.ordered_moves();

        // Closing the three-sided box comes first
        assert_eq!(moves[0], Move::new(1, 2));

        // Lines giving the right box a third side are never searched before quiet ones
        let first_sacrifice = moves
            .iter()
            .position(|&mv| board.max_adjacent_sides(mv) == 2);
        let last_quiet = moves
            .iter()
            .rposition(|&mv| board.max_adjacent_sides(mv) < 2);
        if let (Some(s), Some(q)) = (first_sacrifice, last_quiet) {
            assert!(q < s);
        }
    }

    #[test]
    fn test_display() {
        let mut board = three_sided();
        board.place(Side::Red, Move::new(1, 2)).unwrap();
        let text = board.to_string();
        assert!(text.contains("+---+"));
        assert!(text.contains("| R |"));
        assert_eq!(text.lines().count(), 3);
    }
}
