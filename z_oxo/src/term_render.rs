use crate::board::{Board, Cell, BOARD_SIZE};
use crate::game::OxoGame;

pub trait TermStyle {
    fn display(&self, cell: Cell, key: char) -> String;
}

/// Empty cells show the key that selects them
pub struct PlainTermStyle;

impl TermStyle for PlainTermStyle {
    fn display(&self, cell: Cell, key: char) -> String {
        cell.symbol().unwrap_or(key).to_string()
    }
}

pub struct AnsiTermStyle;

impl TermStyle for AnsiTermStyle {
    fn display(&self, cell: Cell, key: char) -> String {
        match cell {
            Cell::Empty => format!("\x1b[2m{}\x1b[0m", key),
            Cell::X => "\x1b[1;34mX\x1b[0m".to_string(),
            Cell::O => "\x1b[1;31mO\x1b[0m".to_string(),
        }
    }
}

/// Key selecting the cell at (x, y), numbered 1-9 row by row
pub fn key_for_cell(x: u8, y: u8) -> char {
    char::from(b'1' + y * BOARD_SIZE + x)
}

/// Cell selected by a key, if it is one of 1-9
pub fn cell_for_key(key: char) -> Option<(u8, u8)> {
    let index = key.to_digit(10)?.checked_sub(1)? as u8;
    if index >= BOARD_SIZE * BOARD_SIZE {
        return None;
    }
    Some((index % BOARD_SIZE, index / BOARD_SIZE))
}

pub fn render_board(board: &Board, style: &impl TermStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for (y, row) in board.rows().enumerate() {
        if y > 0 {
            lines.push(vec!["---"; row.len()].join("+"));
        }
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(x, cell)| format!(" {} ", style.display(*cell, key_for_cell(x as u8, y as u8))))
            .collect();
        lines.push(cells.join("|"));
    }
    lines
}

pub fn render_game(game: &OxoGame, style: &impl TermStyle) -> Vec<String> {
    let mut lines = render_board(game.board(), style);
    lines.push(String::new());
    if let Some(cell) = game.my_cell().and_then(Cell::symbol) {
        lines.push(format!("You play {}", cell));
    }
    lines.push(game.status().to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(cell_for_key('1'), Some((0, 0)));
        assert_eq!(cell_for_key('3'), Some((2, 0)));
        assert_eq!(cell_for_key('5'), Some((1, 1)));
        assert_eq!(cell_for_key('9'), Some((2, 2)));
        assert_eq!(cell_for_key('0'), None);
        assert_eq!(cell_for_key('q'), None);

        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                assert_eq!(cell_for_key(key_for_cell(x, y)), Some((x, y)));
            }
        }
    }

    #[test]
    fn test_plain_render() {
        let mut game = OxoGame::new();
        game.game_start(true);
        game.click_cell(1, 1).unwrap();
        game.move_made(0, 2);

        let lines = render_game(&game, &PlainTermStyle);
        assert_eq!(
            lines,
            vec![
                " 1 | 2 | 3 ",
                "---+---+---",
                " 4 | X | 6 ",
                "---+---+---",
                " O | 8 | 9 ",
                "",
                "You play X",
                "Your move!",
            ]
        );
    }

    #[test]
    fn test_render_while_waiting() {
        let lines = render_game(&OxoGame::new(), &PlainTermStyle);
        assert_eq!(lines.last().map(String::as_str), Some("Waiting for player two..."));
        assert_eq!(lines.len(), 7);
    }
}
