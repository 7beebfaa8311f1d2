//! Publish/subscribe access to a room topic

use std::sync::Arc;

use zenoh::bytes::ZBytes;
use zenoh::handlers::FifoChannelHandler;
use zenoh::key_expr::KeyExpr;
use zenoh::pubsub::{Publisher, Subscriber};
use zenoh::sample::Sample;

use crate::config::TransportConfig;
use crate::error::{OxoError, Result};
use crate::network::keyexpr::RoomKeyexpr;
use crate::node::stats::StatsTracker;
use crate::types::RoomName;

/// Open the transport session described by `config`
///
/// Failure is fatal for the caller; nothing here retries.
pub async fn connect(config: &TransportConfig) -> Result<zenoh::Session> {
    let endpoint = config.endpoint().unwrap_or_else(|| "<scouting>".to_string());
    let zenoh_config = config.to_zenoh_config()?;

    let session = zenoh::open(zenoh_config)
        .await
        .map_err(|e| OxoError::Connect {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

    tracing::info!("Transport session {} open ({})", session.zid(), endpoint);
    Ok(session)
}

/// Subscription and publisher for the currently joined room
struct JoinedRoom {
    topic: RoomKeyexpr,
    subscriber: Subscriber<FifoChannelHandler<Sample>>,
    publisher: Publisher<'static>,
}

/// A node's view of one room topic at a time
///
/// Joining a room first undeclares the previous room's subscriber and
/// publisher. Every subscriber, the publisher's own session included,
/// receives each payload published on the topic.
pub struct RoomChannel {
    session: zenoh::Session,
    prefix: KeyExpr<'static>,
    owns_session: bool,
    joined: Option<JoinedRoom>,
    closed: bool,
    stats_tracker: Arc<StatsTracker>,
}

impl std::fmt::Debug for RoomChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomChannel")
            .field("prefix", &self.prefix)
            .field("topic", &self.topic())
            .field("owns_session", &self.owns_session)
            .field("closed", &self.closed)
            .finish()
    }
}

impl RoomChannel {
    /// Create a channel on an open session
    ///
    /// When `owns_session` is true, [`RoomChannel::stop`] also closes the session.
    pub(crate) fn new(
        session: zenoh::Session,
        prefix: KeyExpr<'static>,
        owns_session: bool,
        stats_tracker: Arc<StatsTracker>,
    ) -> Self {
        Self {
            session,
            prefix,
            owns_session,
            joined: None,
            closed: false,
            stats_tracker,
        }
    }

    /// Topic of the joined room, if any
    pub fn topic(&self) -> Option<&RoomKeyexpr> {
        self.joined.as_ref().map(|joined| &joined.topic)
    }

    /// Whether a room is currently joined
    pub fn is_joined(&self) -> bool {
        self.joined.is_some()
    }

    /// Whether [`RoomChannel::stop`] has completed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Subscribe to `<prefix>/<room>` and prepare a publisher on it
    pub async fn join(&mut self, room: &RoomName) -> Result<()> {
        if self.closed {
            return Err(OxoError::Stopped);
        }
        self.leave().await?;

        let topic = RoomKeyexpr::new(&self.prefix, room.clone());
        let keyexpr: KeyExpr<'static> = topic.clone().try_into()?;

        let subscriber = self
            .session
            .declare_subscriber(keyexpr.clone())
            .await
            .map_err(OxoError::Zenoh)?;
        let publisher = self
            .session
            .declare_publisher(keyexpr)
            .await
            .map_err(OxoError::Zenoh)?;

        tracing::debug!("Subscribed to '{}'", topic);
        self.joined = Some(JoinedRoom {
            topic,
            subscriber,
            publisher,
        });
        Ok(())
    }

    /// Publish a payload on the joined room's topic
    ///
    /// Best effort: no delivery acknowledgement is awaited.
    pub async fn publish(&self, payload: ZBytes) -> Result<()> {
        let joined = self.joined.as_ref().ok_or(OxoError::NotJoined)?;
        let len = payload.len();

        joined
            .publisher
            .put(payload)
            .await
            .map_err(OxoError::Zenoh)?;

        self.stats_tracker.add_published(len);
        Ok(())
    }

    /// Receive the next raw payload from the joined room
    ///
    /// Pends forever while no room is joined, so it can sit in a
    /// `select!` branch unconditionally.
    pub async fn recv(&self) -> Result<ZBytes> {
        let Some(joined) = self.joined.as_ref() else {
            return std::future::pending().await;
        };

        let sample = joined
            .subscriber
            .recv_async()
            .await
            .map_err(|e| OxoError::Internal(format!("Failed to receive sample: {}", e)))?;

        self.stats_tracker.add_received(sample.payload().len());
        Ok(sample.payload().clone())
    }

    /// Undeclare the current room's subscriber and publisher
    pub async fn leave(&mut self) -> Result<()> {
        if let Some(joined) = self.joined.take() {
            tracing::debug!("Unsubscribing from '{}'", joined.topic);
            joined.subscriber.undeclare().await.map_err(OxoError::Zenoh)?;
            joined.publisher.undeclare().await.map_err(OxoError::Zenoh)?;
        }
        Ok(())
    }

    /// Leave the room and, if owned, close the session
    ///
    /// Calling it again after success is a no-op. The channel only counts
    /// as closed once every step succeeded, so a failed stop can be retried.
    pub async fn stop(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.leave().await?;

        if self.owns_session {
            tracing::debug!("Closing transport session {}", self.session.zid());
            self.session.close().await.map_err(OxoError::Zenoh)?;
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Message, Payload};
    use crate::network::keyexpr::default_prefix;
    use crate::types::{SessionId, Slot};

    async fn open_local_session() -> zenoh::Session {
        let config = TransportConfig::new()
            .with_multicast_scouting(false)
            .to_zenoh_config()
            .unwrap();
        zenoh::open(config).await.unwrap()
    }

    fn channel(session: &zenoh::Session) -> RoomChannel {
        RoomChannel::new(
            session.clone(),
            default_prefix(),
            false,
            Arc::new(StatsTracker::new()),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_publisher_receives_own_publication() {
        let session = open_local_session().await;
        let mut room_channel = channel(&session);
        room_channel
            .join(&RoomName::from_name("channel_echo").unwrap())
            .await
            .unwrap();

        let msg = Message::new(SessionId::from(7), Payload::ClaimSlot { slot: Slot::Zero });
        room_channel.publish(msg.encode()).await.unwrap();

        let received = room_channel.recv().await.unwrap();
        assert_eq!(Message::decode(&received), Ok(msg));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_rooms_are_isolated() {
        let session = open_local_session().await;
        let mut first = channel(&session);
        let mut second = channel(&session);
        first.join(&RoomName::from_name("channel_a").unwrap()).await.unwrap();
        second.join(&RoomName::from_name("channel_b").unwrap()).await.unwrap();

        first.publish(ZBytes::from(vec![1u8])).await.unwrap();
        second.publish(ZBytes::from(vec![2u8])).await.unwrap();

        let got = second.recv().await.unwrap();
        assert_eq!(got.to_bytes().as_ref(), &[2u8]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_publish_without_room_fails() {
        let session = open_local_session().await;
        let room_channel = channel(&session);
        assert!(matches!(
            room_channel.publish(ZBytes::from(vec![0u8])).await,
            Err(OxoError::NotJoined)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_stop_is_idempotent() {
        let session = open_local_session().await;
        let mut room_channel = RoomChannel::new(
            session.clone(),
            default_prefix(),
            true,
            Arc::new(StatsTracker::new()),
        );
        room_channel
            .join(&RoomName::from_name("channel_stop").unwrap())
            .await
            .unwrap();

        assert!(!room_channel.is_closed());
        room_channel.stop().await.unwrap();
        room_channel.stop().await.unwrap();
        assert!(room_channel.is_closed());
        assert!(!room_channel.is_joined());
        assert!(matches!(
            room_channel.join(&RoomName::from_name("channel_stop").unwrap()).await,
            Err(OxoError::Stopped)
        ));
    }
}
