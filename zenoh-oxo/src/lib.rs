//! # zenoh-oxo
//!
//! Two-player matchmaking and move relay for turn-based board games over Zenoh pub/sub.
//!
//! ## Overview
//!
//! Every player in a room publishes to and subscribes from one shared topic,
//! `<prefix>/<room>`. There is no coordinator: the players agree on who is
//! player one and who is player two through a small claim protocol, then relay
//! moves to each other. Game rules live entirely in the application.
//!
//! ## Example
//!
//! ```rust,no_run
//! use zenoh_oxo::{GameEvent, RoomName, SessionExt, StepResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = zenoh_oxo::connect("localhost", 7447).await?;
//!     let mut node = session.declare_oxo_node().await?;
//!     node.join(RoomName::from_name("fortnite")?).await?;
//!
//!     loop {
//!         match node.step().await? {
//!             StepResult::Event(GameEvent::GameStart { is_player_one }) => {
//!                 println!("Playing as player {}", if is_player_one { 1 } else { 2 });
//!             }
//!             StepResult::Event(event) => println!("{}", event),
//!             StepResult::Timeout => continue,
//!             StepResult::Stop => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod network;
pub mod node;
pub mod types;

// Re-exports for convenience
pub use codec::{Message, MessageType, Payload};
pub use config::{TransportConfig, DEFAULT_PORT};
pub use error::{DecodeError, OxoError, Result};
pub use network::{RoomChannel, RoomKeyexpr, DEFAULT_PREFIX};
pub use node::{
    ClaimProtocol, ClaimState, Node, NodeBuilder, NodeCommand, NodeStats, ProtocolEvent,
    SessionExt, StepResult, Transition,
};
pub use types::{GameEvent, RoomName, SessionId, Slot};

/// Connect to a zenoh router at `host:port`
///
/// Shorthand for [`network::connect`] with [`TransportConfig::router`].
pub async fn connect(host: &str, port: u16) -> Result<zenoh::Session> {
    network::connect(&TransportConfig::router(host, port)).await
}
