use zenoh::{key_expr::KeyExpr, Resolvable};

use crate::error::Result;
use crate::node::{config::NodeConfig, oxo_node::Node};
use crate::types::SessionId;

/// Extension trait for zenoh::Session to add oxo node declaration
pub trait SessionExt {
    /// Declare an oxo node
    ///
    /// # Example
    /// ```no_run
    /// use zenoh_oxo::{RoomName, SessionExt};
    ///
    /// # async fn example() {
    /// let session = zenoh::open(zenoh::Config::default()).await.unwrap();
    /// let mut node = session.declare_oxo_node().await.unwrap();
    /// node.join(RoomName::from_name("fortnite").unwrap()).await.unwrap();
    /// # }
    /// ```
    fn declare_oxo_node(&self) -> NodeBuilder<'_>;
}

impl SessionExt for zenoh::Session {
    fn declare_oxo_node(&self) -> NodeBuilder<'_> {
        NodeBuilder::new(self)
    }
}

/// Builder for oxo nodes
///
/// Allows configuring the node before creating it, similar to zenoh's builder pattern.
#[must_use = "Resolvables do nothing unless you resolve them using `.await` or `zenoh::Wait::wait`"]
pub struct NodeBuilder<'a> {
    session: &'a zenoh::Session,
    config: NodeConfig,
}

impl<'a> NodeBuilder<'a> {
    fn new(session: &'a zenoh::Session) -> Self {
        Self {
            session,
            config: NodeConfig::default(),
        }
    }

    /// Use a fixed session identity instead of a random one
    pub fn session_id(mut self, session_id: SessionId) -> Self {
        self.config.session_id = session_id;
        self
    }

    /// Set the step timeout in milliseconds
    pub fn step_timeout_break_ms(mut self, timeout_ms: u64) -> Self {
        self.config.step_timeout_break_ms = timeout_ms;
        self
    }

    /// Set the key expression prefix
    pub fn prefix(mut self, prefix: KeyExpr<'static>) -> Self {
        self.config.keyexpr_prefix = prefix;
        self
    }

    /// Whether [`Node::stop`] closes the underlying session
    ///
    /// Turn it off when several nodes share one session.
    pub fn close_session_on_stop(mut self, close: bool) -> Self {
        self.config.close_session_on_stop = close;
        self
    }
}

impl Resolvable for NodeBuilder<'_> {
    type To = Result<Node>;
}

impl<'a> std::future::IntoFuture for NodeBuilder<'a> {
    type Output = <Self as Resolvable>::To;
    type IntoFuture =
        std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            // Node::new_internal takes ownership of a session handle
            let session = self.session.clone();
            Node::new_internal(self.config, session).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ClaimState;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_builder_applies_options() {
        let mut config = zenoh::Config::default();
        config
            .insert_json5("scouting/multicast/enabled", "false")
            .unwrap();
        let session = zenoh::open(config).await.unwrap();

        let node = session
            .declare_oxo_node()
            .session_id(SessionId::from(42))
            .prefix(KeyExpr::try_from("test/oxo").unwrap().into_owned())
            .step_timeout_break_ms(10)
            .close_session_on_stop(false)
            .await
            .unwrap();

        assert_eq!(node.id(), SessionId::from(42));
        assert_eq!(node.state(), ClaimState::Unassigned);
    }
}
