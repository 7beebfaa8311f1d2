//! Key expression types for room topics

use crate::error::OxoError;
use crate::types::RoomName;
use zenoh::key_expr::KeyExpr;

/// Default prefix of every room topic
pub const DEFAULT_PREFIX: &str = "oxo-hh";

/// Room keyexpr - the topic shared by both players of a room
///
/// Pattern: `<prefix>/<room>`
///
/// Both clients derive it independently from the room name, so the scheme
/// must stay stable: room `fortnite` under the default prefix is
/// `oxo-hh/fortnite`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomKeyexpr {
    prefix: String,
    room: RoomName,
}

impl RoomKeyexpr {
    /// Create a new RoomKeyexpr
    pub fn new(prefix: &KeyExpr, room: RoomName) -> Self {
        Self {
            prefix: prefix.to_string(),
            room,
        }
    }

    /// Get the room name
    pub fn room(&self) -> &RoomName {
        &self.room
    }

    /// Get the prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Display for RoomKeyexpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.prefix, self.room)
    }
}

impl TryFrom<KeyExpr<'_>> for RoomKeyexpr {
    type Error = OxoError;

    fn try_from(keyexpr: KeyExpr<'_>) -> Result<Self, Self::Error> {
        // Expected pattern: [...prefix]/<room>
        let (prefix, room) = keyexpr.as_str().rsplit_once('/').ok_or_else(|| {
            OxoError::InvalidKeyexpr(format!("Invalid RoomKeyexpr pattern: {}", keyexpr.as_str()))
        })?;

        Ok(Self {
            prefix: prefix.to_string(),
            room: RoomName::from_name(room)?,
        })
    }
}

impl TryFrom<RoomKeyexpr> for KeyExpr<'static> {
    type Error = OxoError;

    fn try_from(room_keyexpr: RoomKeyexpr) -> Result<Self, Self::Error> {
        let keyexpr_str = room_keyexpr.to_string();
        KeyExpr::try_from(keyexpr_str)
            .map(|keyexpr| keyexpr.into_owned())
            .map_err(|e| OxoError::InvalidKeyexpr(e.to_string()))
    }
}

/// The default prefix as a key expression
pub fn default_prefix() -> KeyExpr<'static> {
    KeyExpr::try_from(DEFAULT_PREFIX)
        .expect("default prefix is a valid keyexpr")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> RoomName {
        RoomName::from_name(name).unwrap()
    }

    #[test]
    fn test_room_keyexpr_creation() {
        let keyexpr = RoomKeyexpr::new(&default_prefix(), room("fortnite"));
        assert_eq!(keyexpr.prefix(), "oxo-hh");
        assert_eq!(keyexpr.room().as_str(), "fortnite");
        assert_eq!(keyexpr.to_string(), "oxo-hh/fortnite");
    }

    #[test]
    fn test_room_keyexpr_roundtrip() {
        let prefix = KeyExpr::try_from("games/oxo").unwrap();
        let original = RoomKeyexpr::new(&prefix, room("lobby_7"));
        let keyexpr: KeyExpr = original.clone().try_into().unwrap();
        assert_eq!(keyexpr.as_str(), "games/oxo/lobby_7");

        let parsed = RoomKeyexpr::try_from(keyexpr).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_distinct_rooms_have_distinct_topics() {
        let a = RoomKeyexpr::new(&default_prefix(), room("alpha"));
        let b = RoomKeyexpr::new(&default_prefix(), room("alphabet"));
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_room_keyexpr_invalid_pattern() {
        let keyexpr = KeyExpr::try_from("single").unwrap();
        assert!(matches!(
            RoomKeyexpr::try_from(keyexpr),
            Err(OxoError::InvalidKeyexpr(_))
        ));
    }
}
