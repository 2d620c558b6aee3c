// Ledger linkage: read certificates out of transactions and record which
// transaction requested or approved them.

use std::str::FromStr;

use tracing::debug;

use crate::cert::serializer;
use crate::cert::Certificate;
use crate::crypto::hash::Hash256;
use crate::error::{LedgerCertError, Result};

/// The certificate operation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateOp {
    /// "new certificate": the subject publishes a signed request.
    NewCertificate,
    /// "approve certificate": an issuer publishes the counter-signed record.
    ApproveCertificate,
    /// Any other operation. Not an error; linkage is left untouched.
    Unrecognized,
}

impl FromStr for CertificateOp {
    type Err = std::convert::Infallible;

    /// Map an operation-type name from the ledger's opcode classifier.
    /// The classifier reports `bdap_`-prefixed names; the bare names are
    /// accepted too.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.strip_prefix("bdap_").unwrap_or(s) {
            "new_certificate" => CertificateOp::NewCertificate,
            "approve_certificate" => CertificateOp::ApproveCertificate,
            _ => CertificateOp::Unrecognized,
        })
    }
}

/// Auxiliary data attached to a transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPayload {
    /// Serialized certificate.
    pub data: Vec<u8>,
    /// Reference hash as stored on the ledger (ASCII hex of the full hash).
    pub hash: Vec<u8>,
    /// Output carrying the payload.
    pub output_index: u32,
}

/// The ledger collaborator: transaction lookups the resolver depends on.
pub trait CertificateLedger {
    type Transaction;

    fn transaction_hash(&self, tx: &Self::Transaction) -> Hash256;

    /// Locate the certificate payload in `tx`, if any.
    fn extract_payload(&self, tx: &Self::Transaction) -> Option<EmbeddedPayload>;

    /// Classify the certificate operation `tx` carries.
    fn classify_operation(&self, tx: &Self::Transaction) -> CertificateOp;
}

impl Certificate {
    /// Record that transaction `txid`, confirmed at `height`, performed `op`
    /// on this certificate.
    ///
    /// Approvals are recorded whether or not a request was seen first.
    pub fn apply_operation(&mut self, op: CertificateOp, txid: Hash256, height: u32) {
        match op {
            CertificateOp::NewCertificate => {
                self.tx_hash_request = txid;
                self.height_request = height;
            }
            CertificateOp::ApproveCertificate => {
                self.tx_hash_approve = txid;
                self.height_approve = height;
            }
            // TODO: a revoke operation needs a revoked state and its own linkage fields.
            CertificateOp::Unrecognized => {}
        }
    }
}

/// Read the certificate embedded in `tx` (confirmed at `height`) and link it
/// to the transaction.
///
/// Only integrity is checked here. Field validation and signature checks are
/// left to the caller.
pub fn resolve_transaction<L: CertificateLedger>(
    ledger: &L,
    tx: &L::Transaction,
    height: u32,
) -> Result<Certificate> {
    let payload = ledger.extract_payload(tx).ok_or(LedgerCertError::NotFound)?;
    let mut cert = serializer::deserialize(&payload.data, &payload.hash)?;

    let txid = ledger.transaction_hash(tx);
    let op = ledger.classify_operation(tx);
    cert.apply_operation(op, txid, height);

    match op {
        CertificateOp::Unrecognized => {
            debug!(%txid, height, "transaction carries no certificate operation")
        }
        _ => debug!(
            %txid,
            height,
            output = payload.output_index,
            state = ?cert.linkage_state(),
            "linked certificate to transaction"
        ),
    }

    Ok(cert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::LinkageState;

    #[test]
    fn op_names() {
        let parse = |s: &str| s.parse::<CertificateOp>().unwrap();
        assert_eq!(parse("bdap_new_certificate"), CertificateOp::NewCertificate);
        assert_eq!(parse("bdap_approve_certificate"), CertificateOp::ApproveCertificate);
        assert_eq!(parse("new_certificate"), CertificateOp::NewCertificate);
        assert_eq!(parse("approve_certificate"), CertificateOp::ApproveCertificate);
        assert_eq!(parse("bdap_revoke_certificate"), CertificateOp::Unrecognized);
        assert_eq!(parse("bdap_new_account"), CertificateOp::Unrecognized);
        assert_eq!(parse("bdap_"), CertificateOp::Unrecognized);
        assert_eq!(parse(""), CertificateOp::Unrecognized);
    }

    #[test]
    fn apply_request_then_approve() {
        let mut cert = Certificate::new();
        let req = Hash256::from_bytes([1; 32]);
        let app = Hash256::from_bytes([2; 32]);

        cert.apply_operation(CertificateOp::NewCertificate, req, 100);
        assert_eq!(cert.linkage_state(), LinkageState::Requested);
        assert_eq!(cert.height_request, 100);
        assert!(!cert.is_approved());

        cert.apply_operation(CertificateOp::ApproveCertificate, app, 150);
        assert_eq!(cert.linkage_state(), LinkageState::Approved);
        assert_eq!(cert.tx_hash_request, req);
        assert_eq!(cert.tx_hash_approve, app);
    }

    #[test]
    fn approve_without_request_is_accepted() {
        let mut cert = Certificate::new();
        cert.apply_operation(CertificateOp::ApproveCertificate, Hash256::from_bytes([9; 32]), 7);
        assert!(cert.is_approved());
        assert_eq!(cert.height_request, 0);
    }

    #[test]
    fn unrecognized_leaves_linkage() {
        let mut cert = Certificate::new();
        cert.apply_operation(CertificateOp::NewCertificate, Hash256::from_bytes([1; 32]), 10);
        let before = cert.clone();
        cert.apply_operation(CertificateOp::Unrecognized, Hash256::from_bytes([3; 32]), 99);
        assert_eq!(cert, before);
    }
}
