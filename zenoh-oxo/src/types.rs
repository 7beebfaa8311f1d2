/// Core types for the zenoh-oxo library
use crate::error::{OxoError, Result};
use crate::node::name_generator;

/// Random per-process token used to recognize our own broadcasts
///
/// The bus delivers every publish back to the publisher, so each node
/// stamps its messages with this value and drops inbound messages that
/// carry it. Collisions between two processes are possible in principle
/// and are not handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Generate a new identity, uniformly random over the 64-bit space
    pub fn generate() -> Self {
        SessionId(rand::random::<u64>())
    }

    /// Get the raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SessionId {
    fn from(value: u64) -> Self {
        SessionId(value)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// One of the two player identities in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Player one, moves first
    Zero,
    /// Player two
    One,
}

impl Slot {
    /// Read a slot from its wire value, normalized modulo 2
    pub fn from_wire(value: u8) -> Self {
        if value % 2 == 0 {
            Slot::Zero
        } else {
            Slot::One
        }
    }

    /// Wire value of the slot
    pub fn to_wire(self) -> u8 {
        match self {
            Slot::Zero => 0,
            Slot::One => 1,
        }
    }

    /// Whether this slot is player one
    pub fn is_player_one(self) -> bool {
        self == Slot::Zero
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Zero => write!(f, "slot 0"),
            Slot::One => write!(f, "slot 1"),
        }
    }
}

/// Name of a game room
///
/// RoomName must be a valid single-chunk keyexpr since it becomes the last
/// chunk of the room topic:
/// - Non-empty UTF-8 string
/// - Cannot contain: / * $ ? # @
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Generate a random, pronounceable room name like "Theron_42"
    pub fn generate() -> Self {
        RoomName(name_generator::generate_unique_name())
    }

    /// Create from an operator-supplied name
    /// Returns error if name contains invalid characters
    pub fn from_name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(RoomName(name))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(OxoError::InvalidRoomName(
                "Room name cannot be empty".to_string(),
            ));
        }

        for ch in s.chars() {
            if matches!(ch, '/' | '*' | '$' | '?' | '#' | '@') {
                return Err(OxoError::InvalidRoomName(format!(
                    "Room name '{}' contains invalid character '{}'",
                    s, ch
                )));
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for RoomName {
    type Err = OxoError;

    fn from_str(s: &str) -> Result<Self> {
        RoomName::from_name(s)
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notifications delivered to the game orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Slot negotiation is (likely) complete
    ///
    /// A node that became player two may still receive
    /// [`GameEvent::GameAlreadyStarted`] shortly after.
    GameStart {
        /// true when we hold slot 0 and move first
        is_player_one: bool,
    },
    /// Both slots of the room are already taken
    GameAlreadyStarted,
    /// The opponent played a move
    MoveMade {
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStart { is_player_one: true } => write!(f, "Game started as player one"),
            GameEvent::GameStart { is_player_one: false } => write!(f, "Game started as player two"),
            GameEvent::GameAlreadyStarted => write!(f, "Game already started"),
            GameEvent::MoveMade { x, y } => write!(f, "Opponent moved at ({}, {})", x, y),
        }
    }
}
