//! Shared-secret digests for the summary upload endpoint
//!
//! The uploader and the stats server never exchange the secret itself.
//! Both sides hash their configured `SERVER_AUTH` value and the server
//! compares the digest it receives in the `auth` header with its own.

use sha2::{Digest, Sha256};

/// Name of the request header carrying the digest
pub const AUTH_HEADER: &str = "auth";

/// Lowercase hex SHA-256 of the secret with surrounding whitespace removed
pub fn digest_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a digest received from a client against the configured secret
pub fn verify_digest(secret: &str, presented: &str) -> bool {
    digest_secret(secret) == presented.trim()
}
