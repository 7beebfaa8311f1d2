/// Error types for the zenoh-oxo library
use thiserror::Error;

/// Result type alias for oxo operations
pub type Result<T> = std::result::Result<T, OxoError>;

/// Errors that can occur in zenoh-oxo operations
#[derive(Debug, Error)]
pub enum OxoError {
    /// Zenoh-related errors
    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    /// The transport session could not be established
    #[error("Failed to connect to {endpoint}: {reason}")]
    Connect {
        /// Endpoint we tried to reach
        endpoint: String,
        /// Underlying failure
        reason: String,
    },

    /// Transport configuration could not be built
    #[error("Invalid transport configuration: {0}")]
    Config(String),

    /// Invalid room name provided
    #[error("Invalid room name: {0}. Must be a valid single-chunk keyexpr (no /, *, $, ?, #, @)")]
    InvalidRoomName(String),

    /// Invalid keyexpr pattern
    #[error("Invalid keyexpr: {0}")]
    InvalidKeyexpr(String),

    /// Operation requires an active game
    #[error("No active game (state: {state})")]
    NotActive {
        /// Protocol state at the time of the call
        state: String,
    },

    /// Operation requires room membership
    #[error("Not a member of any room")]
    NotJoined,

    /// Node has been stopped
    #[error("Node stopped")]
    Stopped,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reasons a received payload could not be decoded
///
/// Both variants are non-fatal: the node discards the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The type tag is not one we know
    #[error("Unknown message type tag {0}")]
    UnknownType(u8),

    /// Fewer bytes than the message type requires
    #[error("Truncated message")]
    Truncated,
}
