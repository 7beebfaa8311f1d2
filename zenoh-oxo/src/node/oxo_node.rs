/// Node management module
use std::sync::Arc;

use zenoh::bytes::ZBytes;

use super::config::NodeConfig;
use super::protocol::{ClaimProtocol, ClaimState, ProtocolEvent, Transition};
use super::stats::{NodeStats, StatsTracker};
use super::types::{NodeCommand, StepResult};
use crate::codec::Message;
use crate::error::{OxoError, Result};
use crate::network::RoomChannel;
use crate::types::{GameEvent, RoomName, SessionId, Slot};

/// A player in a room: owns the claim protocol and the room channel
///
/// All state transitions happen on `&mut self`, fed one at a time from the
/// room subscription and from the command channel returned by
/// [`Node::sender`]. Drive it by calling [`Node::step`] in a loop.
pub struct Node {
    /// Node identity
    id: SessionId,

    /// Node configuration
    config: NodeConfig,

    /// Slot negotiation state machine
    protocol: ClaimProtocol,

    /// Room topic access
    channel: RoomChannel,

    /// Receiver for commands from the application
    command_rx: flume::Receiver<NodeCommand>,

    /// Sender for commands from the application
    command_tx: flume::Sender<NodeCommand>,

    /// Statistics tracker, shared with the channel
    stats_tracker: Arc<StatsTracker>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("state", &self.protocol.state())
            .field("channel", &self.channel)
            .finish()
    }
}

impl Node {
    /// Create a new Node instance (internal use only - use builder pattern via SessionExt)
    pub(crate) async fn new_internal(config: NodeConfig, session: zenoh::Session) -> Result<Self> {
        let id = config.session_id;
        let stats_tracker = Arc::new(StatsTracker::new());
        let channel = RoomChannel::new(
            session,
            config.keyexpr_prefix.clone(),
            config.close_session_on_stop,
            stats_tracker.clone(),
        );
        let (command_tx, command_rx) = flume::unbounded();

        tracing::info!("Node '{}' initialized with Zenoh session", id);

        Ok(Self {
            id,
            protocol: ClaimProtocol::new(id),
            config,
            channel,
            command_rx,
            command_tx,
            stats_tracker,
        })
    }

    /// Get node identity
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Get a sender for sending commands to this node
    pub fn sender(&self) -> flume::Sender<NodeCommand> {
        self.command_tx.clone()
    }

    /// Current negotiation state
    pub fn state(&self) -> ClaimState {
        self.protocol.state()
    }

    /// Slot currently held, if any
    pub fn slot(&self) -> Option<Slot> {
        self.protocol.slot()
    }

    /// Room currently joined, if any
    pub fn room(&self) -> Option<&RoomName> {
        self.channel.topic().map(|topic| topic.room())
    }

    /// Get current node statistics
    pub fn stats(&self) -> NodeStats {
        self.stats_tracker.get_stats()
    }

    /// Reset node statistics
    pub fn reset_stats(&self) {
        self.stats_tracker.reset();
    }

    /// Join a room and claim slot 0
    ///
    /// Leaves the previous room first, if any.
    pub async fn join(&mut self, room: RoomName) -> Result<()> {
        if self.protocol.state() == ClaimState::Stopped {
            return Err(OxoError::Stopped);
        }

        self.channel.join(&room).await?;
        let transition = self.protocol.handle(ProtocolEvent::Joined)?;
        tracing::info!("Node '{}' joined room '{}'", self.id, room);

        self.apply(transition).await?;
        Ok(())
    }

    /// Relay a move to the opponent
    ///
    /// Fails with [`OxoError::NotActive`] until the game has started. Turn
    /// order is not checked.
    pub async fn make_move(&mut self, x: u8, y: u8) -> Result<()> {
        let transition = self
            .protocol
            .handle(ProtocolEvent::SendMoveRequested { x, y })?;
        tracing::debug!("Node '{}' plays ({}, {})", self.id, x, y);

        self.apply(transition).await?;
        Ok(())
    }

    /// Leave the room and silence the node
    ///
    /// Calling it again is a no-op once the channel is closed; a failed
    /// cleanup is retried.
    pub async fn stop(&mut self) -> Result<()> {
        if self.channel.is_closed() {
            return Ok(());
        }

        self.protocol.handle(ProtocolEvent::Stopped)?;
        self.channel.stop().await?;
        tracing::info!("Node '{}' stopped", self.id);
        Ok(())
    }

    /// Execute one step of the node
    ///
    /// Processes room messages and commands until either:
    /// - A game event is produced (returns Event)
    /// - The step timeout (configured in NodeConfig) elapses (returns Timeout)
    /// - The node is stopped (returns Stop)
    pub async fn step(&mut self) -> Result<StepResult> {
        if self.protocol.state() == ClaimState::Stopped {
            return Ok(StepResult::Stop);
        }

        let timeout = tokio::time::Duration::from_millis(self.config.step_timeout_break_ms);
        let sleep = tokio::time::sleep(timeout);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                () = &mut sleep => {
                    return Ok(StepResult::Timeout);
                }
                command = self.command_rx.recv_async() => {
                    // The node holds a sender itself, so the channel never disconnects
                    let Ok(command) = command else {
                        continue;
                    };
                    if let Some(result) = self.handle_command(command).await? {
                        return Ok(result);
                    }
                }
                payload = self.channel.recv() => {
                    if let Some(event) = self.handle_payload(payload?).await? {
                        return Ok(StepResult::Event(event));
                    }
                }
            }
        }
    }

    async fn handle_command(&mut self, command: NodeCommand) -> Result<Option<StepResult>> {
        let outcome = match command {
            NodeCommand::Join(room) => self.join(room).await,
            NodeCommand::MakeMove { x, y } => self.make_move(x, y).await,
            NodeCommand::Stop => {
                self.stop().await?;
                return Ok(Some(StepResult::Stop));
            }
        };

        match outcome {
            Ok(()) => Ok(None),
            Err(e @ (OxoError::NotActive { .. } | OxoError::NotJoined | OxoError::Stopped)) => {
                tracing::warn!("Node '{}' ignored command: {}", self.id, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn handle_payload(&mut self, payload: ZBytes) -> Result<Option<GameEvent>> {
        let message = match Message::decode(&payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::trace!("Node '{}' discarded sample: {}", self.id, e);
                self.stats_tracker.add_discarded_malformed();
                return Ok(None);
            }
        };

        if self.protocol.is_self(&message) {
            self.stats_tracker.add_discarded_self();
        }

        let transition = self.protocol.handle(ProtocolEvent::Received(message))?;
        self.apply(transition).await
    }

    async fn apply(&mut self, transition: Transition) -> Result<Option<GameEvent>> {
        if let Some(message) = transition.publish {
            self.channel.publish(message.encode()).await?;
        }
        Ok(transition.event)
    }
}
