//! Connection registry: which identity is bound to which live connection.
//!
//! Answers "who is online" and enforces the one-live-session-per-user rule:
//! a user id can be bound to at most one connection at a time.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Identity, LobbyError, OnlinePlayer, UserId};

#[derive(Default)]
struct RegistryInner {
    by_connection: HashMap<ConnectionId, OnlinePlayer>,
    by_user: HashMap<UserId, ConnectionId>,
}

/// Registry of authenticated connections.
pub struct ConnectionRegistry {
    inner: Mutex<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Bind a verified identity to a connection.
    ///
    /// Fails with [`LobbyError::SessionAlreadyActive`] when the user is
    /// already bound to another live connection.
    pub async fn bind(
        &self,
        connection_id: ConnectionId,
        identity: &Identity,
    ) -> Result<(), LobbyError> {
        let mut inner = self.inner.lock().await;
        if inner.by_user.contains_key(&identity.user_id) {
            return Err(LobbyError::SessionAlreadyActive);
        }
        inner
            .by_user
            .insert(identity.user_id.clone(), connection_id.clone());
        inner.by_connection.insert(
            connection_id.clone(),
            OnlinePlayer {
                user_id: identity.user_id.clone(),
                username: identity.username.clone(),
                connection_id,
            },
        );
        Ok(())
    }

    /// Remove a connection's binding; idempotent.
    pub async fn unbind(&self, connection_id: &ConnectionId) -> Option<OnlinePlayer> {
        let mut inner = self.inner.lock().await;
        let entry = inner.by_connection.remove(connection_id)?;
        inner.by_user.remove(&entry.user_id);
        Some(entry)
    }

    /// Snapshot of all online players, sorted by user id for consistent
    /// ordering.
    pub async fn snapshot(&self) -> Vec<OnlinePlayer> {
        let inner = self.inner.lock().await;
        let mut players: Vec<OnlinePlayer> = inner.by_connection.values().cloned().collect();
        players.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        players
    }

    /// The live connection of a user, if any.
    pub async fn connection_of(&self, user_id: &UserId) -> Option<ConnectionId> {
        let inner = self.inner.lock().await;
        inner.by_user.get(user_id).cloned()
    }

    /// Resolve a set of user ids to their live connections, dropping users
    /// who are no longer online.
    pub async fn connections_of(&self, user_ids: &[UserId]) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        user_ids
            .iter()
            .filter_map(|id| inner.by_user.get(id).cloned())
            .collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
