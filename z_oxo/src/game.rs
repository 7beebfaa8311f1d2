//! Turn discipline and game outcome for one player

use crate::board::{Board, Cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    WaitingForOpponent,
    MyTurn,
    OpponentTurn,
    Won,
    Lost,
    Draw,
    Rejected,
    Closed,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(
            self,
            GameStatus::Won | GameStatus::Lost | GameStatus::Draw | GameStatus::Rejected | GameStatus::Closed
        )
    }

    /// Whether the program should leave the room without waiting for a key
    pub fn ends_session(self) -> bool {
        matches!(self, GameStatus::Rejected | GameStatus::Closed)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            GameStatus::WaitingForOpponent => "Waiting for player two...",
            GameStatus::MyTurn => "Your move!",
            GameStatus::OpponentTurn => "Opponent's move",
            GameStatus::Won => "You won!",
            GameStatus::Lost => "Opponent won!",
            GameStatus::Draw => "Draw!",
            GameStatus::Rejected => "A game is already in progress in this room",
            GameStatus::Closed => "Exiting...",
        };
        write!(f, "{}", text)
    }
}

/// One player's view of a game: the board plus whose turn it is
///
/// Player one plays X and moves first. The network layer does not check
/// turns, so moves arriving out of turn are dropped here.
#[derive(Debug, Clone)]
pub struct OxoGame {
    board: Board,
    is_player_one: Option<bool>,
    is_my_turn: bool,
    status: GameStatus,
}

impl Default for OxoGame {
    fn default() -> Self {
        Self::new()
    }
}

impl OxoGame {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            is_player_one: None,
            is_my_turn: false,
            status: GameStatus::WaitingForOpponent,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_player_one(&self) -> Option<bool> {
        self.is_player_one
    }

    pub fn is_my_turn(&self) -> bool {
        self.is_my_turn
    }

    /// Cell this player marks, once the game has started
    pub fn my_cell(&self) -> Option<Cell> {
        self.is_player_one
            .map(|one| if one { Cell::X } else { Cell::O })
    }

    fn opponent_cell(&self) -> Option<Cell> {
        self.is_player_one
            .map(|one| if one { Cell::O } else { Cell::X })
    }

    pub fn game_start(&mut self, is_player_one: bool) {
        if self.status.is_over() {
            return;
        }
        self.is_player_one = Some(is_player_one);
        self.is_my_turn = is_player_one;
        self.status = if is_player_one {
            GameStatus::MyTurn
        } else {
            GameStatus::OpponentTurn
        };
    }

    pub fn game_already_started(&mut self) {
        self.is_my_turn = false;
        self.status = GameStatus::Rejected;
    }

    /// Apply the opponent's move; returns whether it was accepted
    pub fn move_made(&mut self, x: u8, y: u8) -> bool {
        if self.status.is_over() || self.is_my_turn {
            return false;
        }
        let Some(cell) = self.opponent_cell() else {
            return false;
        };
        if let Err(e) = self.board.place(x, y, cell) {
            tracing::debug!("Ignoring opponent move: {}", e);
            return false;
        }

        self.is_my_turn = true;
        self.status = if self.board.is_winning_move(x, y) {
            GameStatus::Lost
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::MyTurn
        };
        true
    }

    /// Play at (x, y); returns the move to relay to the opponent
    pub fn click_cell(&mut self, x: u8, y: u8) -> Option<(u8, u8)> {
        if self.status.is_over() || !self.is_my_turn {
            return None;
        }
        let cell = self.my_cell()?;
        self.board.place(x, y, cell).ok()?;

        self.is_my_turn = false;
        self.status = if self.board.is_winning_move(x, y) {
            GameStatus::Won
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::OpponentTurn
        };
        Some((x, y))
    }

    pub fn window_closed(&mut self) {
        self.is_my_turn = false;
        self.status = GameStatus::Closed;
    }
}
