// Certificate builders: fluent API for the two issuance steps.

use super::limits::FieldLimits;
use super::validator::validate_with_limits;
use super::{Certificate, ExtensionKind};
use crate::crypto::keys::IdentityKeyPair;
use crate::error::{LedgerCertError, Result};

pub const DEFAULT_SIGNATURE_ALGORITHM: &[u8] = b"ed25519";
pub const DEFAULT_SIGNATURE_HASH_ALGORITHM: &[u8] = b"sha256d";

/// Builder for the subject's certificate request.
///
/// # Example
/// ```ignore
/// let request = RequestBuilder::new(&subject_keypair)
///     .subject("alice@public.bdap.io")
///     .serial_number(7)
///     .add_extension(ExtensionKind::KeyUsage, "digitalSignature")
///     .build()?;
/// ```
pub struct RequestBuilder<'a> {
    keypair: &'a IdentityKeyPair,
    cert: Certificate,
    self_signed: bool,
    limits: FieldLimits,
}

impl<'a> RequestBuilder<'a> {
    /// Start a request that will be signed by `keypair`. The public key
    /// defaults to the keypair's own.
    pub fn new(keypair: &'a IdentityKeyPair) -> Self {
        let cert = Certificate {
            signature_algorithm: DEFAULT_SIGNATURE_ALGORITHM.to_vec(),
            signature_hash_algorithm: DEFAULT_SIGNATURE_HASH_ALGORITHM.to_vec(),
            public_key: keypair.public_key_bytes().to_vec(),
            ..Certificate::default()
        };
        Self {
            keypair,
            cert,
            self_signed: false,
            limits: FieldLimits::CONSENSUS,
        }
    }

    /// Full path of the requesting identity. Required.
    pub fn subject(mut self, subject: impl Into<Vec<u8>>) -> Self {
        self.cert.subject = subject.into();
        self
    }

    pub fn serial_number(mut self, serial: u64) -> Self {
        self.cert.serial_number = serial;
        self
    }

    pub fn months_valid(mut self, months: u16) -> Self {
        self.cert.months_valid = months;
        self
    }

    pub fn fingerprint(mut self, fingerprint: impl Into<Vec<u8>>) -> Self {
        self.cert.fingerprint = fingerprint.into();
        self
    }

    /// Override the certified public key (defaults to the signing keypair's).
    pub fn public_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.cert.public_key = public_key.into();
        self
    }

    pub fn algorithms(mut self, signature: impl Into<Vec<u8>>, hash: impl Into<Vec<u8>>) -> Self {
        self.cert.signature_algorithm = signature.into();
        self.cert.signature_hash_algorithm = hash.into();
        self
    }

    /// Append one record to an extension list.
    pub fn add_extension(mut self, kind: ExtensionKind, value: impl Into<Vec<u8>>) -> Self {
        self.cert.extension_mut(kind).push(value.into());
        self
    }

    /// Make the subject its own issuer and counter-sign with the same key.
    pub fn self_signed(mut self) -> Self {
        self.self_signed = true;
        self
    }

    /// Validate against `limits` instead of the consensus limits.
    pub fn limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Consume the builder and produce a subject-signed [`Certificate`].
    pub fn build(self) -> Result<Certificate> {
        let mut cert = self.cert;
        if cert.subject.is_empty() {
            return Err(LedgerCertError::Build("subject is required".into()));
        }

        if self.self_signed {
            cert.issuer = cert.subject.clone();
        }
        cert.sign_subject(self.keypair);
        if self.self_signed {
            cert.sign_issuer(self.keypair);
        }

        validate_with_limits(&cert, &self.limits)?;
        Ok(cert)
    }
}

/// Builder for the issuer's counter-attestation of a request.
pub struct ApprovalBuilder<'a> {
    keypair: &'a IdentityKeyPair,
    request: Certificate,
    issuer: Option<Vec<u8>>,
    months_valid: Option<u16>,
    limits: FieldLimits,
}

impl<'a> ApprovalBuilder<'a> {
    pub fn new(keypair: &'a IdentityKeyPair, request: Certificate) -> Self {
        Self {
            keypair,
            request,
            issuer: None,
            months_valid: None,
            limits: FieldLimits::CONSENSUS,
        }
    }

    /// Full path of the approving identity. Required.
    pub fn issuer(mut self, issuer: impl Into<Vec<u8>>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Override the validity requested by the subject.
    pub fn months_valid(mut self, months: u16) -> Self {
        self.months_valid = Some(months);
        self
    }

    pub fn limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check the subject's attestation, then counter-sign.
    pub fn build(self) -> Result<Certificate> {
        let issuer = self
            .issuer
            .ok_or_else(|| LedgerCertError::Build("issuer is required".into()))?;

        let mut cert = self.request;
        if !cert.check_subject_signature(&cert.public_key) {
            return Err(LedgerCertError::Build(
                "subject signature does not verify against the certified public key".into(),
            ));
        }

        cert.issuer = issuer;
        if let Some(months) = self.months_valid {
            cert.months_valid = months;
        }
        cert.sign_issuer(self.keypair);

        validate_with_limits(&cert, &self.limits)?;
        Ok(cert)
    }
}
