//! Message delivery port.
//!
//! The use case and gateway layers hand pre-serialized JSON events to this
//! port; the WebSocket implementation in the infrastructure layer owns the
//! per-connection sender channels.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// Channel used to push serialized events to one connection's socket task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Outbound event delivery, fire-and-forget per connection.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's sender channel.
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection's sender channel.
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Deliver to a single connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Deliver to each target in order. A send failure to one connection
    /// must not block or fail delivery to the others.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Deliver to every registered connection.
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;
}
