// Certificate validator: field bounds and the full verification flow.

use super::limits::FieldLimits;
use super::{Certificate, ExtensionKind};
use crate::error::{LedgerCertError, Result};

/// A single bounds violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field.
    pub field: &'static str,
    /// User-facing description.
    pub message: String,
}

impl From<Violation> for LedgerCertError {
    fn from(v: Violation) -> Self {
        LedgerCertError::Validation {
            field: v.field,
            message: v.message,
        }
    }
}

/// Check every field against the consensus limits, returning the first
/// violation.
pub fn validate(cert: &Certificate) -> Result<()> {
    validate_with_limits(cert, &FieldLimits::CONSENSUS)
}

/// [`validate`] with caller-supplied limits.
pub fn validate_with_limits(cert: &Certificate, limits: &FieldLimits) -> Result<()> {
    match violations_with_limits(cert, limits).into_iter().next() {
        Some(v) => Err(v.into()),
        None => Ok(()),
    }
}

/// Every violation against the consensus limits, in check order.
pub fn violations(cert: &Certificate) -> Vec<Violation> {
    violations_with_limits(cert, &FieldLimits::CONSENSUS)
}

/// Every violation against `limits`, in check order:
/// required fields, then field lengths, then extension lists.
pub fn violations_with_limits(cert: &Certificate, limits: &FieldLimits) -> Vec<Violation> {
    let mut out = Vec::new();

    // 1. Required fields.
    let required: [(&'static str, &[u8], &str); 3] = [
        ("subject", cert.subject.as_slice(), "Subject cannot be empty."),
        (
            "subject_signature",
            cert.subject_signature.as_slice(),
            "Subject Signature cannot be empty.",
        ),
        ("public_key", cert.public_key.as_slice(), "Public Key cannot be empty."),
    ];
    for (field, value, message) in required {
        if value.is_empty() {
            out.push(Violation {
                field,
                message: message.to_string(),
            });
        }
    }

    // 2. Field lengths.
    let lengths: [(&'static str, &str, &[u8], usize); 8] = [
        (
            "signature_algorithm",
            "Signature Algorithm",
            cert.signature_algorithm.as_slice(),
            limits.algorithm_type_length,
        ),
        (
            "signature_hash_algorithm",
            "Signature Hash Algorithm",
            cert.signature_hash_algorithm.as_slice(),
            limits.algorithm_type_length,
        ),
        ("fingerprint", "Finger Print", cert.fingerprint.as_slice(), limits.fingerprint_length),
        ("subject", "Subject full path name", cert.subject.as_slice(), limits.full_path_length),
        (
            "subject_signature",
            "SubjectSignature",
            cert.subject_signature.as_slice(),
            limits.signature_length,
        ),
        ("issuer", "Issuer full path name", cert.issuer.as_slice(), limits.full_path_length),
        ("public_key", "PublicKey", cert.public_key.as_slice(), limits.key_length),
        (
            "signature_value",
            "SignatureValue",
            cert.signature_value.as_slice(),
            limits.signature_length,
        ),
    ];
    for (field, label, value, max) in lengths {
        if value.len() > max {
            out.push(Violation {
                field,
                message: format!("Invalid {label}. Can not have more than {max} characters."),
            });
        }
    }

    // 3. Extension lists: record count, then each record's length.
    for kind in ExtensionKind::ALL {
        let list = cert.extension(kind);
        let name = kind.name();
        if list.len() > limits.extension_records {
            out.push(Violation {
                field: kind.field(),
                message: format!(
                    "Invalid {name} size. Can not have more than {} records.",
                    limits.extension_records
                ),
            });
        }
        if list.iter().any(|item| item.len() > limits.extension_length) {
            out.push(Violation {
                field: kind.field(),
                message: format!(
                    "Invalid {name}. Can not have more than {} characters.",
                    limits.extension_length
                ),
            });
        }
    }

    out
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// The subject signature verifies against the record's own public key.
    pub subject_signature_valid: bool,
    /// The issuer signature verifies against the supplied issuer key.
    /// `false` when the record has no counter-signature yet.
    pub issuer_signature_valid: bool,
    pub approved: bool,
}

/// Full check of a record read from the ledger: field bounds first, then the
/// subject self-attestation against `cert.public_key`, then the issuer
/// counter-attestation against `issuer_public_key`.
///
/// Bounds violations are errors; signature outcomes are reported as flags.
pub fn verify(cert: &Certificate, issuer_public_key: &[u8]) -> Result<VerificationResult> {
    validate(cert)?;
    Ok(VerificationResult {
        subject_signature_valid: cert.check_subject_signature(&cert.public_key),
        issuer_signature_valid: !cert.signature_value.is_empty()
            && cert.check_issuer_signature(issuer_public_key),
        approved: cert.is_approved(),
    })
}
