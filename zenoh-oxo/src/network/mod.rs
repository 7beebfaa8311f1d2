//! Network layer for zenoh-oxo

pub mod keyexpr;
pub mod room_channel;

pub use keyexpr::{RoomKeyexpr, DEFAULT_PREFIX};
pub use room_channel::{connect, RoomChannel};
