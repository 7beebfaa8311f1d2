//! Configuration for a Node

use zenoh::key_expr::KeyExpr;

use crate::network::keyexpr::default_prefix;
use crate::types::SessionId;

// Main configuration for a Node
#[derive(Debug, Clone)]
pub(crate) struct NodeConfig {
    /// Identity stamped on every published message
    pub session_id: SessionId,

    /// Timeout for step() method in milliseconds
    /// step() returns when either a game event is produced or this timeout elapses
    pub step_timeout_break_ms: u64,

    /// Key expression prefix of every room topic
    pub keyexpr_prefix: KeyExpr<'static>,

    /// Whether stop() closes the zenoh session
    /// Disable when the session is shared with other nodes
    pub close_session_on_stop: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            session_id: SessionId::generate(),
            step_timeout_break_ms: 5000,
            keyexpr_prefix: default_prefix(),
            close_session_on_stop: true,
        }
    }
}
