// LedgerCert — ledger-anchored identity certificates
//
// Crate root: module declarations and public re-exports.

pub mod cert;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod presentation;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export key types at crate root for convenience.
pub use cert::limits::FieldLimits;
pub use cert::{Certificate, ExtensionKind, LinkageState};
pub use crypto::hash::Hash256;
pub use crypto::keys::IdentityKeyPair;
pub use error::{LedgerCertError, Result};
pub use ledger::{resolve_transaction, CertificateLedger, CertificateOp, EmbeddedPayload};
pub use presentation::{ChainClock, CertificateView};
