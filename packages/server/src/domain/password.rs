//! Room password digests.
//!
//! Room passwords are never stored or compared in the clear; both the stored
//! value and join candidates go through the same SHA-256 digest.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a raw room password.
pub fn digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Normalize a client-supplied password: an empty string means "no
/// password", matching the original lobby's behavior.
pub fn normalize(raw: Option<String>) -> Option<String> {
    raw.filter(|p| !p.is_empty()).map(|p| digest(&p))
}
