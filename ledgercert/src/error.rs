// LedgerCert error types

use thiserror::Error;

/// Top-level error type for the LedgerCert crate.
#[derive(Debug, Error)]
pub enum LedgerCertError {
    // ── Codec errors ────────────────────────────────────────────────────
    /// The payload could not be decoded into a certificate record.
    #[error("certificate parse error: {0}")]
    Parse(String),

    /// The payload decoded, but its recomputed hash disagrees with the
    /// reference hash recorded alongside it.
    #[error("certificate integrity check failed: expected {expected}, computed {computed}")]
    Integrity { expected: String, computed: String },

    // ── Validation errors ───────────────────────────────────────────────
    /// A field or extension list is out of bounds. `message` is user-facing.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("certificate build error: {0}")]
    Build(String),

    // ── Ledger errors ───────────────────────────────────────────────────
    #[error("no certificate payload found in transaction")]
    NotFound,

    // ── Crypto errors ───────────────────────────────────────────────────
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("AEAD encryption failed: {0}")]
    Encryption(String),

    #[error("AEAD decryption failed: {0}")]
    Decryption(String),

    #[error("malformed envelope: {0}")]
    Envelope(String),
}

impl LedgerCertError {
    /// The name of the offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LedgerCertError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, LedgerCertError>;
