//! Development implementation of the `TokenVerifier` port.
//!
//! The real deployment verifies signed tokens issued by the account
//! service. This stand-in accepts `<user_id>:<username>` tokens so the
//! lobby can run without that service; both halves still go through the
//! domain value objects.

use async_trait::async_trait;

use crate::domain::{Identity, LobbyError, TokenVerifier, UserId, Username};

/// Token verifier for local development and tests.
pub struct DevTokenVerifier;

#[async_trait]
impl TokenVerifier for DevTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, LobbyError> {
        let (user_id, username) = token.split_once(':').ok_or(LobbyError::InvalidToken)?;
        let user_id = UserId::new(user_id.to_string()).map_err(|_| LobbyError::InvalidToken)?;
        let username = Username::new(username.to_string()).map_err(|_| LobbyError::InvalidToken)?;
        Ok(Identity { user_id, username })
    }
}
