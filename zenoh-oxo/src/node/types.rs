/// Node-level types
use crate::types::{GameEvent, RoomName};

/// Commands that can be sent to the node from any thread
#[derive(Debug, Clone)]
pub enum NodeCommand {
    /// Leave the current room, if any, and join this one
    Join(RoomName),
    /// Relay a move to the opponent
    MakeMove {
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
    /// Stop the node
    Stop,
}

/// Result of a single step() call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Something the orchestrator must react to
    Event(GameEvent),
    /// Step timeout elapsed without any event
    Timeout,
    /// Node has stopped
    Stop,
}

impl std::fmt::Display for StepResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepResult::Event(event) => write!(f, "{}", event),
            StepResult::Timeout => write!(f, "Timeout"),
            StepResult::Stop => write!(f, "Node stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_result_display() {
        assert_eq!(
            StepResult::Event(GameEvent::GameStart { is_player_one: true }).to_string(),
            "Game started as player one"
        );
        assert_eq!(
            StepResult::Event(GameEvent::MoveMade { x: 1, y: 2 }).to_string(),
            "Opponent moved at (1, 2)"
        );
        assert_eq!(StepResult::Stop.to_string(), "Node stopped");
    }
}
