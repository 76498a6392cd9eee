//! Win detection.
//!
//! An N×N board has 2N+2 lines: N rows, N columns and the two main diagonals.
//! A full line owned by a single side is a plain [`Pattern::Line`] win. On
//! hybrid boards a full line whose values are exactly 1..=N is a
//! [`Pattern::Sequence`] win, credited to whoever completed it.

use super::{Board, Ruleset, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl Line {
    /// All 2N+2 lines of an N×N board: rows, then columns, then diagonals.
    pub fn all(size: usize) -> impl Iterator<Item = Line> {
        (0..size)
            .map(Line::Row)
            .chain((0..size).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    pub fn cells(self, size: usize) -> impl Iterator<Item = usize> {
        (0..size).map(move |i| match self {
            Line::Row(r) => r * size + i,
            Line::Column(c) => i * size + c,
            Line::Diagonal => i * size + i,
            Line::AntiDiagonal => i * size + (size - 1 - i),
        })
    }

    pub fn contains(self, size: usize, cell: usize) -> bool {
        self.cells(size).any(|c| c == cell)
    }
}

/// How a line was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Every cell owned by the winner
    Line,
    /// Mixed owners, values form the complete run 1..=N
    Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Win {
    pub side: Side,
    pub pattern: Pattern,
    pub line: Line,
}

/// Who, if anyone, has won `line`.
///
/// Sequence credit goes to the side of the board's last placement when that
/// placement lies on the line. Otherwise (a position built by hand rather than
/// by play) the side owning more of the line's cells is credited, ties going to
/// the side that moved last, then to `X`.
pub fn line_owner(board: &Board, line: Line) -> Option<(Side, Pattern)> {
    let size = board.size();
    let mut owners = [0usize; 2];
    let mut seen: u32 = 0;
    let mut distinct = true;

    for cell in line.cells(size) {
        let c = board.cells()[cell];
        let (side, value) = match (c.side(), c.value()) {
            (Some(side), Some(value)) => (side, value),
            _ => return None,
        };
        owners[side.index()] += 1;
        let bit = 1u32 << value.min(31);
        if seen & bit != 0 {
            distinct = false;
        }
        seen |= bit;
    }

    for side in Side::BOTH {
        if owners[side.index()] == size {
            return Some((side, Pattern::Line));
        }
    }

    if board.ruleset() != Ruleset::Hybrid || !distinct {
        return None;
    }
    // values 1..=N exactly: bits 1..=N set, bit 0 clear
    let run = ((1u32 << (size + 1)) - 1) & !1;
    if seen != run {
        return None;
    }

    let last_side = board
        .last_placed()
        .and_then(|cell| board.cells()[cell].side());
    let side = match board.last_placed() {
        Some(cell) if line.contains(size, cell) => last_side,
        _ => None,
    }
    .unwrap_or_else(|| match owners[0].cmp(&owners[1]) {
        std::cmp::Ordering::Greater => Side::X,
        std::cmp::Ordering::Less => Side::O,
        std::cmp::Ordering::Equal => last_side.unwrap_or(Side::X),
    });
    Some((side, Pattern::Sequence))
}

/// Report the first winning line, if any.
///
/// Plain line wins take precedence over sequence wins anywhere on the board.
pub fn detect(board: &Board) -> Option<Win> {
    let size = board.size();
    let mut sequence = None;
    for line in Line::all(size) {
        match line_owner(board, line) {
            Some((side, Pattern::Line)) => {
                return Some(Win {
                    side,
                    pattern: Pattern::Line,
                    line,
                })
            }
            Some((side, Pattern::Sequence)) if sequence.is_none() => {
                sequence = Some(Win {
                    side,
                    pattern: Pattern::Sequence,
                    line,
                });
            }
            _ => {}
        }
    }
    sequence
}

/// Number of lines currently won by `side`, by either pattern.
pub fn completed_lines(board: &Board, side: Side) -> i32 {
    Line::all(board.size())
        .filter(|&line| matches!(line_owner(board, line), Some((s, _)) if s == side))
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Placement};

    fn line_board(layout: &str) -> Board {
        let cells = layout
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .map(|c| match c {
                'X' => Cell::Occupied {
                    side: Side::X,
                    value: 0,
                },
                'O' => Cell::Occupied {
                    side: Side::O,
                    value: 0,
                },
                _ => Cell::Empty,
            })
            .collect();
        Board::from_cells(3, Ruleset::Line, cells, None).unwrap()
    }

    #[test]
    fn test_line_count() {
        assert_eq!(Line::all(3).count(), 8);
        assert_eq!(Line::all(4).count(), 10);
    }

    #[test]
    fn test_line_cells() {
        assert_eq!(Line::Row(1).cells(3).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(Line::Column(2).cells(3).collect::<Vec<_>>(), vec![2, 5, 8]);
        assert_eq!(Line::Diagonal.cells(4).collect::<Vec<_>>(), vec![0, 5, 10, 15]);
        assert_eq!(
            Line::AntiDiagonal.cells(4).collect::<Vec<_>>(),
            vec![3, 6, 9, 12]
        );
    }

    #[test]
    fn test_empty_board_no_win() {
        assert_eq!(detect(&Board::new(3, Ruleset::Line).unwrap()), None);
    }

    #[test]
    fn test_row_win() {
        let board = line_board("XXX/OO./...");
        assert_eq!(
            detect(&board),
            Some(Win {
                side: Side::X,
                pattern: Pattern::Line,
                line: Line::Row(0)
            })
        );
    }

    #[test]
    fn test_column_and_diagonal_wins() {
        let board = line_board("OX./OX./.X.");
        assert_eq!(detect(&board).map(|w| w.line), Some(Line::Column(1)));

        let board = line_board("..O/XO./OX.");
        let win = detect(&board).unwrap();
        assert_eq!(win.side, Side::O);
        assert_eq!(win.line, Line::AntiDiagonal);
    }

    #[test]
    fn test_full_board_without_line_is_no_win() {
        let board = line_board("XOX/OXO/OXO");
        assert_eq!(detect(&board), None);
        assert!(board.is_full());
    }

    #[test]
    fn test_line_game_has_no_sequences() {
        let board = line_board("XOX/.../...");
        assert_eq!(line_owner(&board, Line::Row(0)), None);
    }

    fn hybrid(placements: &[(usize, u8, Side)]) -> Board {
        let mut board = Board::new(4, Ruleset::Hybrid).unwrap();
        for &(cell, value, side) in placements {
            board = board.place(Placement { cell, value, side }).unwrap();
        }
        board
    }

    #[test]
    fn test_sequence_credited_to_completing_side() {
        let board = hybrid(&[
            (0, 1, Side::X),
            (1, 2, Side::O),
            (2, 3, Side::X),
            (3, 4, Side::O),
        ]);
        assert_eq!(
            detect(&board),
            Some(Win {
                side: Side::O,
                pattern: Pattern::Sequence,
                line: Line::Row(0)
            })
        );
    }

    #[test]
    fn test_descending_run_is_sequence() {
        let board = hybrid(&[
            (0, 4, Side::O),
            (4, 3, Side::X),
            (8, 2, Side::O),
            (12, 1, Side::X),
        ]);
        let win = detect(&board).unwrap();
        assert_eq!(win.pattern, Pattern::Sequence);
        assert_eq!(win.line, Line::Column(0));
        assert_eq!(win.side, Side::X);
    }

    #[test]
    fn test_single_owner_full_line_is_plain() {
        let board = hybrid(&[
            (0, 1, Side::X),
            (1, 2, Side::X),
            (2, 3, Side::X),
            (3, 4, Side::X),
        ]);
        assert_eq!(detect(&board).map(|w| w.pattern), Some(Pattern::Line));
    }

    #[test]
    fn test_plain_win_preferred_over_earlier_sequence() {
        // Row 0 is a mixed sequence, column 3 is all O.
        let mut cells = vec![Cell::Empty; 16];
        cells[0] = Cell::Occupied { side: Side::X, value: 1 };
        cells[1] = Cell::Occupied { side: Side::X, value: 2 };
        cells[2] = Cell::Occupied { side: Side::X, value: 3 };
        cells[3] = Cell::Occupied { side: Side::O, value: 4 };
        cells[7] = Cell::Occupied { side: Side::O, value: 1 };
        cells[11] = Cell::Occupied { side: Side::O, value: 2 };
        cells[15] = Cell::Occupied { side: Side::O, value: 3 };
        let board = Board::from_cells(4, Ruleset::Hybrid, cells, Some(15)).unwrap();
        let win = detect(&board).unwrap();
        assert_eq!(win.pattern, Pattern::Line);
        assert_eq!(win.line, Line::Column(3));
        assert_eq!(win.side, Side::O);
    }

    #[test]
    fn test_sequence_majority_when_last_move_elsewhere() {
        let mut cells = vec![Cell::Empty; 16];
        cells[0] = Cell::Occupied { side: Side::O, value: 3 };
        cells[1] = Cell::Occupied { side: Side::O, value: 1 };
        cells[2] = Cell::Occupied { side: Side::X, value: 4 };
        cells[3] = Cell::Occupied { side: Side::O, value: 2 };
        cells[10] = Cell::Occupied { side: Side::X, value: 1 };
        let board = Board::from_cells(4, Ruleset::Hybrid, cells, Some(10)).unwrap();
        assert_eq!(
            line_owner(&board, Line::Row(0)),
            Some((Side::O, Pattern::Sequence))
        );
    }

    #[test]
    fn test_repeated_values_are_not_a_sequence() {
        // Diagonals are not covered by the uniqueness rule.
        let mut cells = vec![Cell::Empty; 16];
        for (i, cell) in [0, 5, 10, 15].into_iter().enumerate() {
            let side = if i % 2 == 0 { Side::X } else { Side::O };
            cells[cell] = Cell::Occupied {
                side,
                value: if i < 2 { 1 + i as u8 } else { 2 },
            };
        }
        let board = Board::from_cells(4, Ruleset::Hybrid, cells, Some(15)).unwrap();
        assert_eq!(line_owner(&board, Line::Diagonal), None);
    }

    #[test]
    fn test_equal_values_need_a_single_owner() {
        // The 3×3 hybrid has no blocks, so a repeated value on a diagonal is legal.
        let mut board = Board::new(3, Ruleset::Hybrid).unwrap();
        for (cell, side) in [(0, Side::X), (4, Side::O), (8, Side::X)] {
            board = board.place(Placement { cell, value: 1, side }).unwrap();
        }
        assert_eq!(line_owner(&board, Line::Diagonal), None);
        assert_eq!(detect(&board), None);

        // A single owner wins plainly even when the values also form a run.
        let mut board = Board::new(3, Ruleset::Hybrid).unwrap();
        for (cell, value) in [(0, 1), (1, 2), (2, 3)] {
            board = board
                .place(Placement {
                    cell,
                    value,
                    side: Side::O,
                })
                .unwrap();
        }
        assert_eq!(
            line_owner(&board, Line::Row(0)),
            Some((Side::O, Pattern::Line))
        );
    }

    #[test]
    fn test_completed_lines_counts_per_side() {
        let board = hybrid(&[
            (0, 1, Side::X),
            (1, 2, Side::O),
            (2, 3, Side::X),
            (3, 4, Side::X),
        ]);
        assert_eq!(completed_lines(&board, Side::X), 1);
        assert_eq!(completed_lines(&board, Side::O), 0);
    }
}
