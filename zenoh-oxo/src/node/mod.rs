// Module declarations
pub(crate) mod config;
pub(crate) mod name_generator;
pub(crate) mod oxo_node;
pub(crate) mod protocol;
pub(crate) mod session_ext;
pub(crate) mod stats;
pub(crate) mod types;

pub use oxo_node::Node;
pub use protocol::{ClaimProtocol, ClaimState, ProtocolEvent, Transition};
pub use session_ext::{NodeBuilder, SessionExt};
pub use stats::{NodeStats, StatsTracker};
pub use types::{NodeCommand, StepResult};
