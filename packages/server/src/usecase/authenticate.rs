//! UseCase: bind a verified identity to a connection.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Identity, LobbyError, MessagePusher, OnlinePlayer, PusherChannel, TokenVerifier,
};
use crate::infrastructure::registry::ConnectionRegistry;

/// Result of a successful authentication.
#[derive(Debug)]
pub struct AuthOutcome {
    pub identity: Identity,
    /// Online player snapshot including the newcomer.
    pub online: Vec<OnlinePlayer>,
}

/// Authenticates a connection and makes it addressable for broadcasts.
pub struct AuthenticateUseCase {
    token_verifier: Arc<dyn TokenVerifier>,
    registry: Arc<ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl AuthenticateUseCase {
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        registry: Arc<ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            token_verifier,
            registry,
            message_pusher,
        }
    }

    /// Verify the token, bind the identity to the connection, and register
    /// the connection's sender channel with the pusher.
    ///
    /// The sender channel is registered only after a successful bind, so an
    /// unauthenticated connection is never a broadcast target.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        token: &str,
        sender: PusherChannel,
    ) -> Result<AuthOutcome, LobbyError> {
        let identity = self.token_verifier.verify(token).await?;
        self.registry.bind(connection_id.clone(), &identity).await?;
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;

        tracing::info!(
            "User '{}' ('{}') authenticated",
            identity.user_id.as_str(),
            identity.username.as_str()
        );

        Ok(AuthOutcome {
            identity,
            online: self.registry.snapshot().await,
        })
    }
}
