//! The 3x3 playing field and the win check

use thiserror::Error;

/// Width and height of the board
pub const BOARD_SIZE: u8 = 3;

/// Number of same-valued cells in a line that wins the game
pub const WIN_LENGTH: usize = 3;

/// Content of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn symbol(self) -> Option<char> {
        match self {
            Cell::Empty => None,
            Cell::X => Some('X'),
            Cell::O => Some('O'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: u8, y: u8 },

    #[error("Cell ({x}, {y}) is already taken")]
    Occupied { x: u8, y: u8 },
}

// Line directions through a cell; each is checked together with its opposite
const DIRECTIONS: [(i8, i8); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    // Indexed as cells[y][x]
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_board(x: i16, y: i16) -> bool {
        (0..BOARD_SIZE as i16).contains(&x) && (0..BOARD_SIZE as i16).contains(&y)
    }

    pub fn get(&self, x: u8, y: u8) -> Option<Cell> {
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Put `cell` at (x, y), which must be empty
    pub fn place(&mut self, x: u8, y: u8, cell: Cell) -> Result<(), BoardError> {
        match self.get(x, y) {
            None => Err(BoardError::OutOfBounds { x, y }),
            Some(Cell::Empty) => {
                self.cells[y as usize][x as usize] = cell;
                Ok(())
            }
            Some(_) => Err(BoardError::Occupied { x, y }),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE as usize]> {
        self.cells.iter()
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| *cell != Cell::Empty))
    }

    /// Longest line of cells equal to the one at (x, y) that passes through it
    pub fn longest_line(&self, x: u8, y: u8) -> usize {
        let Some(center) = self.get(x, y) else {
            return 0;
        };
        if center == Cell::Empty {
            return 0;
        }

        DIRECTIONS
            .iter()
            .map(|&(dx, dy)| {
                1 + self.run_length(x, y, dx, dy, center) + self.run_length(x, y, -dx, -dy, center)
            })
            .max()
            .unwrap_or(1)
    }

    /// Whether the cell at (x, y) completes a winning line
    pub fn is_winning_move(&self, x: u8, y: u8) -> bool {
        self.longest_line(x, y) >= WIN_LENGTH
    }

    fn run_length(&self, x: u8, y: u8, dx: i8, dy: i8, value: Cell) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x as i16 + dx as i16, y as i16 + dy as i16);
        while Self::is_on_board(cx, cy) && self.cells[cy as usize][cx as usize] == value {
            count += 1;
            cx += dx as i16;
            cy += dy as i16;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(moves: &[(u8, u8, Cell)]) -> Board {
        let mut board = Board::new();
        for &(x, y, cell) in moves {
            board.place(x, y, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_place_rejects_taken_and_outside_cells() {
        let mut board = Board::new();
        board.place(1, 1, Cell::X).unwrap();
        assert_eq!(board.get(1, 1), Some(Cell::X));
        assert_eq!(
            board.place(1, 1, Cell::O),
            Err(BoardError::Occupied { x: 1, y: 1 })
        );
        assert_eq!(
            board.place(3, 0, Cell::O),
            Err(BoardError::OutOfBounds { x: 3, y: 0 })
        );
        assert_eq!(board.get(1, 1), Some(Cell::X));
    }

    #[test]
    fn test_row_column_and_diagonals_win() {
        let row = board_with(&[(0, 2, Cell::X), (1, 2, Cell::X), (2, 2, Cell::X)]);
        assert!(row.is_winning_move(1, 2));

        // Lines through the first row and column count too
        let column = board_with(&[(0, 0, Cell::O), (0, 1, Cell::O), (0, 2, Cell::O)]);
        assert!(column.is_winning_move(0, 0));

        let diagonal = board_with(&[(0, 0, Cell::X), (1, 1, Cell::X), (2, 2, Cell::X)]);
        assert!(diagonal.is_winning_move(2, 2));

        let anti = board_with(&[(2, 0, Cell::O), (1, 1, Cell::O), (0, 2, Cell::O)]);
        assert!(anti.is_winning_move(2, 0));
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let board = board_with(&[(0, 0, Cell::X), (1, 0, Cell::O), (2, 0, Cell::X)]);
        assert!(!board.is_winning_move(0, 0));
        assert_eq!(board.longest_line(0, 0), 1);
        assert_eq!(board.longest_line(2, 2), 0);
    }

    #[test]
    fn test_full_board() {
        use Cell::{O, X};
        let board = board_with(&[
            (0, 0, X), (1, 0, O), (2, 0, X),
            (0, 1, X), (1, 1, O), (2, 1, O),
            (0, 2, O), (1, 2, X), (2, 2, X),
        ]);
        assert!(board.is_full());
        assert!((0..3).all(|y| (0..3).all(|x| !board.is_winning_move(x, y))));
        assert!(!Board::new().is_full());
    }
}
