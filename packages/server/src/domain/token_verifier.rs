//! Identity verification port.
//!
//! User identity storage and credential verification are external
//! collaborators; the coordinator only consumes an already-verified
//! identity per connection.

use async_trait::async_trait;

use super::entity::Identity;
use super::error::LobbyError;

/// Verifies a credential token into an [`Identity`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the verified identity or [`LobbyError::InvalidToken`].
    async fn verify(&self, token: &str) -> Result<Identity, LobbyError>;
}
