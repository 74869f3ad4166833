//! Random token and hashing utilities.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short, stable fingerprint of an external identity for log fields.
///
/// Identity-provider subjects are treated as personal data, so logs carry
/// only the first 12 hex characters of their SHA-256.
pub fn identity_fingerprint(external_id: &str) -> String {
    sha256_hex(external_id)[..12].to_string()
}

/// Generates `len` random ASCII alphanumeric characters (`[A-Za-z0-9]`).
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
