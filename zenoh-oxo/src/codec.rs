//! Binary envelope exchanged over the room topic
//!
//! Layout (integers use the zenoh-ext fixed-width little-endian encoding):
//!
//! | Offset | Size | Meaning |
//! |--------|------|---------|
//! | 0      | 8    | sender session identity |
//! | 8      | 1    | type tag: 0 = claim slot, 1 = slot already claimed, 2 = make move |
//! | 9      | 1    | slot |
//! | 10     | 1    | x (make move only) |
//! | 11     | 1    | y (make move only) |
//!
//! Slots are normalized modulo 2 on read. Bytes after a complete message are
//! ignored so that newer peers may append fields.

use zenoh::bytes::ZBytes;
use zenoh_ext::{Deserialize, Serialize, ZDeserializer, ZSerializer};

use crate::error::DecodeError;
use crate::types::{SessionId, Slot};

/// Message type tag (byte 8 of the envelope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Sent by a node joining a room
    ClaimSlot = 0,
    /// Sent by the slot owner in response to a conflicting claim
    SlotAlreadyClaimed = 1,
    /// Move played by the sender
    MakeMove = 2,
}

impl TryFrom<u8> for MessageType {
    type Error = DecodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(MessageType::ClaimSlot),
            1 => Ok(MessageType::SlotAlreadyClaimed),
            2 => Ok(MessageType::MakeMove),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

/// Type-specific part of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Intent to occupy `slot`
    ClaimSlot {
        /// Claimed slot
        slot: Slot,
    },
    /// `slot` is already held by the sender
    SlotAlreadyClaimed {
        /// Contested slot
        slot: Slot,
    },
    /// The owner of `slot` played at (x, y)
    MakeMove {
        /// Slot of the player making the move
        slot: Slot,
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
}

impl Payload {
    /// Type tag of this payload
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::ClaimSlot { .. } => MessageType::ClaimSlot,
            Payload::SlotAlreadyClaimed { .. } => MessageType::SlotAlreadyClaimed,
            Payload::MakeMove { .. } => MessageType::MakeMove,
        }
    }
}

/// A message as published on the room topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Identity of the publishing node
    pub sender: SessionId,
    /// Type-specific content
    pub payload: Payload,
}

impl Message {
    /// Create a new message
    pub fn new(sender: SessionId, payload: Payload) -> Self {
        Self { sender, payload }
    }

    /// Encode into a zenoh payload
    pub fn encode(&self) -> ZBytes {
        zenoh_ext::z_serialize(self)
    }

    /// Encode into plain bytes
    pub fn to_vec(&self) -> Vec<u8> {
        self.encode().to_bytes().into_owned()
    }

    /// Decode a zenoh payload
    pub fn decode(bytes: &ZBytes) -> Result<Self, DecodeError> {
        let mut deserializer = ZDeserializer::new(bytes);
        let sender = SessionId::from(read::<u64>(&mut deserializer)?);
        let message_type = MessageType::try_from(read::<u8>(&mut deserializer)?)?;
        let slot = Slot::from_wire(read::<u8>(&mut deserializer)?);

        let payload = match message_type {
            MessageType::ClaimSlot => Payload::ClaimSlot { slot },
            MessageType::SlotAlreadyClaimed => Payload::SlotAlreadyClaimed { slot },
            MessageType::MakeMove => {
                let x = read::<u8>(&mut deserializer)?;
                let y = read::<u8>(&mut deserializer)?;
                Payload::MakeMove { slot, x, y }
            }
        };

        Ok(Message { sender, payload })
    }

    /// Decode plain bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&ZBytes::from(bytes.to_vec()))
    }
}

fn read<T: Deserialize>(deserializer: &mut ZDeserializer) -> Result<T, DecodeError> {
    T::deserialize(deserializer).map_err(|_| DecodeError::Truncated)
}

impl Serialize for Message {
    fn serialize(&self, serializer: &mut ZSerializer) {
        self.sender.as_u64().serialize(serializer);
        (self.payload.message_type() as u8).serialize(serializer);
        match self.payload {
            Payload::ClaimSlot { slot } | Payload::SlotAlreadyClaimed { slot } => {
                slot.to_wire().serialize(serializer);
            }
            Payload::MakeMove { slot, x, y } => {
                slot.to_wire().serialize(serializer);
                x.serialize(serializer);
                y.serialize(serializer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENDER: u64 = 0x0102_0304_0506_0708;

    #[test]
    fn test_claim_slot_layout() {
        let msg = Message::new(SENDER.into(), Payload::ClaimSlot { slot: Slot::One });
        assert_eq!(
            msg.to_vec(),
            vec![0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0, 1]
        );
    }

    #[test]
    fn test_make_move_layout() {
        let msg = Message::new(
            SENDER.into(),
            Payload::MakeMove { slot: Slot::Zero, x: 2, y: 1 },
        );
        let bytes = msg.to_vec();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[8..], &[2, 0, 2, 1]);
        assert_eq!(Message::from_bytes(&bytes), Ok(msg));
    }

    #[test]
    fn test_slot_already_claimed_decodes() {
        let mut bytes = 0x2222u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[1, 0]);
        let msg = Message::from_bytes(&bytes).unwrap();
        assert_eq!(msg.sender, SessionId::from(0x2222));
        assert_eq!(msg.payload, Payload::SlotAlreadyClaimed { slot: Slot::Zero });
    }

    #[test]
    fn test_out_of_range_slot_is_normalized() {
        let mut bytes = SENDER.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 7]);
        let msg = Message::from_bytes(&bytes).unwrap();
        assert_eq!(msg.payload, Payload::ClaimSlot { slot: Slot::One });

        let mut bytes = SENDER.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[2, 4, 0, 0]);
        let msg = Message::from_bytes(&bytes).unwrap();
        assert_eq!(msg.payload, Payload::MakeMove { slot: Slot::Zero, x: 0, y: 0 });
    }

    #[test]
    fn test_short_buffers_are_truncated() {
        let full = Message::new(SENDER.into(), Payload::ClaimSlot { slot: Slot::Zero }).to_vec();
        for len in 0..=8 {
            assert_eq!(
                Message::from_bytes(&full[..len]),
                Err(DecodeError::Truncated),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_unknown_type_tag() {
        for tag in [3u8, 42, 255] {
            let mut bytes = SENDER.to_le_bytes().to_vec();
            bytes.extend_from_slice(&[tag, 0, 0, 0]);
            assert_eq!(Message::from_bytes(&bytes), Err(DecodeError::UnknownType(tag)));
        }
    }

    #[test]
    fn test_missing_payload_bytes() {
        let mut claim = SENDER.to_le_bytes().to_vec();
        claim.push(0);
        assert_eq!(Message::from_bytes(&claim), Err(DecodeError::Truncated));

        let mut moved = SENDER.to_le_bytes().to_vec();
        moved.extend_from_slice(&[2, 1, 1]);
        assert_eq!(Message::from_bytes(&moved), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = Message::new(SENDER.into(), Payload::ClaimSlot { slot: Slot::One }).to_vec();
        bytes.extend_from_slice(&[9, 9, 9]);
        assert_eq!(
            Message::from_bytes(&bytes),
            Ok(Message::new(SENDER.into(), Payload::ClaimSlot { slot: Slot::One }))
        );
    }
}
