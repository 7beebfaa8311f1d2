//! Slot claim and move relay state machine
//!
//! [`ClaimProtocol`] holds no transport: it consumes [`ProtocolEvent`]s and
//! answers with a [`Transition`] naming the message to publish and the event
//! to hand to the orchestrator, if any. The node feeds it from a single task,
//! so the machine itself needs no locking.
//!
//! Negotiation in short: a joining node optimistically claims slot 0. The
//! current owner of a claimed slot answers with "slot already claimed". A
//! node told that slot 0 is taken claims slot 1 and starts right away; a
//! node told that slot 1 is taken gives up. The owner of slot 0 starts when
//! it sees a claim for slot 1.

use crate::codec::{Message, Payload};
use crate::error::{OxoError, Result};
use crate::types::{GameEvent, SessionId, Slot};

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// The node subscribed to a room
    Joined,
    /// A decoded message arrived from the room
    Received(Message),
    /// The orchestrator wants to play at (x, y)
    SendMoveRequested {
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
    /// The node is shutting down
    Stopped,
}

/// Negotiation state for the current room membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimState {
    /// Not in a room
    #[default]
    Unassigned,
    /// Claimed a slot, waiting for the peer
    Claimed(Slot),
    /// Game running; moves are relayed
    Active(Slot),
    /// Both slots of the room were taken by others
    Rejected,
    /// Node stopped; everything is a no-op
    Stopped,
}

impl ClaimState {
    /// Slot currently held, if any
    pub fn slot(&self) -> Option<Slot> {
        match self {
            ClaimState::Claimed(slot) | ClaimState::Active(slot) => Some(*slot),
            _ => None,
        }
    }

    /// Whether moves can be sent and received
    pub fn is_active(&self) -> bool {
        matches!(self, ClaimState::Active(_))
    }
}

impl std::fmt::Display for ClaimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimState::Unassigned => write!(f, "Unassigned"),
            ClaimState::Claimed(slot) => write!(f, "Claimed {}", slot),
            ClaimState::Active(slot) => write!(f, "Playing as {}", slot),
            ClaimState::Rejected => write!(f, "Rejected, room is full"),
            ClaimState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// What the node must do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Message to broadcast on the room topic
    pub publish: Option<Message>,
    /// Notification for the orchestrator
    pub event: Option<GameEvent>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn publish(message: Message) -> Self {
        Self {
            publish: Some(message),
            event: None,
        }
    }

    fn notify(event: GameEvent) -> Self {
        Self {
            publish: None,
            event: Some(event),
        }
    }
}

/// The claim/relay protocol for one node
#[derive(Debug, Clone)]
pub struct ClaimProtocol {
    session_id: SessionId,
    state: ClaimState,
}

impl ClaimProtocol {
    /// Create the machine for a node with the given identity
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: ClaimState::Unassigned,
        }
    }

    /// Identity stamped on outgoing messages
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Current state
    pub fn state(&self) -> ClaimState {
        self.state
    }

    /// Slot currently held, if any
    pub fn slot(&self) -> Option<Slot> {
        self.state.slot()
    }

    /// Whether `message` is one of our own broadcasts coming back
    pub fn is_self(&self, message: &Message) -> bool {
        message.sender == self.session_id
    }

    /// Advance the machine by one event
    ///
    /// Received messages never fail; `Joined` and `SendMoveRequested`
    /// fail without touching the state when they make no sense.
    pub fn handle(&mut self, event: ProtocolEvent) -> Result<Transition> {
        match event {
            ProtocolEvent::Joined => self.joined(),
            ProtocolEvent::Received(message) => Ok(self.received(message)),
            ProtocolEvent::SendMoveRequested { x, y } => self.send_move(x, y),
            ProtocolEvent::Stopped => {
                self.state = ClaimState::Stopped;
                Ok(Transition::none())
            }
        }
    }

    fn message(&self, payload: Payload) -> Message {
        Message::new(self.session_id, payload)
    }

    fn joined(&mut self) -> Result<Transition> {
        if self.state == ClaimState::Stopped {
            return Err(OxoError::Stopped);
        }
        self.state = ClaimState::Claimed(Slot::Zero);
        Ok(Transition::publish(
            self.message(Payload::ClaimSlot { slot: Slot::Zero }),
        ))
    }

    fn send_move(&mut self, x: u8, y: u8) -> Result<Transition> {
        match self.state {
            ClaimState::Active(slot) => Ok(Transition::publish(
                self.message(Payload::MakeMove { slot, x, y }),
            )),
            ClaimState::Stopped => Err(OxoError::Stopped),
            other => Err(OxoError::NotActive {
                state: other.to_string(),
            }),
        }
    }

    fn received(&mut self, message: Message) -> Transition {
        if self.is_self(&message) {
            tracing::trace!("Node '{}' dropped its own echo", self.session_id);
            return Transition::none();
        }

        let Some(my_slot) = self.state.slot() else {
            return Transition::none();
        };

        match message.payload {
            Payload::ClaimSlot { slot } if slot == my_slot => {
                tracing::debug!(
                    "Node '{}' defends {} against '{}'",
                    self.session_id,
                    slot,
                    message.sender
                );
                Transition::publish(self.message(Payload::SlotAlreadyClaimed { slot }))
            }
            Payload::ClaimSlot { slot: Slot::One } if self.state == ClaimState::Claimed(Slot::Zero) => {
                tracing::info!(
                    "Node '{}' starts as player one against '{}'",
                    self.session_id,
                    message.sender
                );
                self.state = ClaimState::Active(Slot::Zero);
                Transition::notify(GameEvent::GameStart { is_player_one: true })
            }
            Payload::ClaimSlot { .. } => Transition::none(),

            Payload::SlotAlreadyClaimed { slot } if slot == my_slot => match self.state {
                ClaimState::Claimed(Slot::Zero) => {
                    // Start without waiting: a later conflict on slot 1 still rejects us.
                    tracing::info!(
                        "Node '{}' lost slot 0 to '{}', starts as player two",
                        self.session_id,
                        message.sender
                    );
                    self.state = ClaimState::Active(Slot::One);
                    Transition {
                        publish: Some(self.message(Payload::ClaimSlot { slot: Slot::One })),
                        event: Some(GameEvent::GameStart { is_player_one: false }),
                    }
                }
                ClaimState::Claimed(Slot::One) | ClaimState::Active(Slot::One) => {
                    tracing::info!(
                        "Node '{}' rejected: '{}' holds slot 1",
                        self.session_id,
                        message.sender
                    );
                    self.state = ClaimState::Rejected;
                    Transition::notify(GameEvent::GameAlreadyStarted)
                }
                _ => Transition::none(),
            },
            Payload::SlotAlreadyClaimed { .. } => Transition::none(),

            Payload::MakeMove { slot, x, y } => {
                if !self.state.is_active() || slot == my_slot {
                    return Transition::none();
                }
                tracing::debug!(
                    "Node '{}' relays move ({}, {}) from '{}'",
                    self.session_id,
                    x,
                    y,
                    message.sender
                );
                Transition::notify(GameEvent::MoveMade { x, y })
            }
        }
    }
}
