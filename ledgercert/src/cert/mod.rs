// Ledger-anchored identity certificate record.

pub mod builder;
pub mod hash;
pub mod limits;
pub mod serializer;
pub mod signer;
pub mod validator;
mod wire;

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::crypto::hash::{hash160, Hash160, Hash256};

// ── Extensions ───────────────────────────────────────────────────────────

/// The extension lists carried by every certificate, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    KeyUsage,
    ExtendedKeyUsage,
    AuthorityInformationAccess,
    SubjectAlternativeName,
    Policies,
    CrlDistributionPoints,
    SctList,
}

impl ExtensionKind {
    /// Every extension list, in wire and hash order.
    pub const ALL: [ExtensionKind; 7] = [
        ExtensionKind::KeyUsage,
        ExtensionKind::ExtendedKeyUsage,
        ExtensionKind::AuthorityInformationAccess,
        ExtensionKind::SubjectAlternativeName,
        ExtensionKind::Policies,
        ExtensionKind::CrlDistributionPoints,
        ExtensionKind::SctList,
    ];

    /// Name used in validation messages.
    pub fn name(self) -> &'static str {
        match self {
            ExtensionKind::KeyUsage => "KeyUsage",
            ExtensionKind::ExtendedKeyUsage => "ExtendedKeyUsage",
            ExtensionKind::AuthorityInformationAccess => "AuthorityInformationAccess",
            ExtensionKind::SubjectAlternativeName => "SubjectAlternativeName",
            ExtensionKind::Policies => "Policies",
            ExtensionKind::CrlDistributionPoints => "CRLDistributionPoints",
            ExtensionKind::SctList => "SCTList",
        }
    }

    /// Field name, as exposed in the presentation view.
    pub fn field(self) -> &'static str {
        match self {
            ExtensionKind::KeyUsage => "key_usage",
            ExtensionKind::ExtendedKeyUsage => "extended_key_usage",
            ExtensionKind::AuthorityInformationAccess => "authority_information_access",
            ExtensionKind::SubjectAlternativeName => "subject_alternative_name",
            ExtensionKind::Policies => "policies",
            ExtensionKind::CrlDistributionPoints => "crl_distribution_points",
            ExtensionKind::SctList => "sct_list",
        }
    }
}

// ── Linkage ──────────────────────────────────────────────────────────────

/// Where a certificate stands with respect to its ledger transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkageState {
    /// No transaction has been observed.
    Unlinked,
    /// The "new certificate" transaction has been observed.
    Requested,
    /// The "approve certificate" transaction has been observed.
    Approved,
}

// ── Certificate ──────────────────────────────────────────────────────────

/// A certificate record.
///
/// The subject fills in its identity, signs the subject hash domain and
/// publishes the record in a "new certificate" transaction. An issuer then
/// fills in its own identity, counter-signs the issuer hash domain (which
/// covers the subject's signature) and publishes the record again in an
/// "approve certificate" transaction. The linkage fields are populated from
/// those transactions when the record is read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Format version tag.
    pub version: u32,
    /// Validity in calendar months, counted from the approval block time.
    pub months_valid: u16,
    /// Display / identification aid. Not covered by either signature.
    pub fingerprint: Vec<u8>,
    pub signature_algorithm: Vec<u8>,
    pub signature_hash_algorithm: Vec<u8>,
    /// Full path of the requesting identity.
    pub subject: Vec<u8>,
    /// Subject's signature over the subject hash domain.
    pub subject_signature: Vec<u8>,
    /// Full path of the approving identity. Equal to `subject` when self-signed.
    pub issuer: Vec<u8>,
    /// Subject's public key material.
    pub public_key: Vec<u8>,
    /// Issuer's counter-signature over the issuer hash domain.
    pub signature_value: Vec<u8>,
    /// Unique per issuer. Uniqueness is the issuer's responsibility.
    pub serial_number: u64,
    pub key_usage: Vec<Vec<u8>>,
    pub extended_key_usage: Vec<Vec<u8>>,
    pub authority_information_access: Vec<Vec<u8>>,
    pub subject_alternative_name: Vec<Vec<u8>>,
    pub policies: Vec<Vec<u8>>,
    pub crl_distribution_points: Vec<Vec<u8>>,
    pub sct_list: Vec<Vec<u8>>,
    pub tx_hash_request: Hash256,
    pub height_request: u32,
    pub tx_hash_approve: Hash256,
    /// Zero until the approval transaction has been observed.
    pub height_approve: u32,
}

impl Default for Certificate {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            months_valid: 0,
            fingerprint: Vec::new(),
            signature_algorithm: Vec::new(),
            signature_hash_algorithm: Vec::new(),
            subject: Vec::new(),
            subject_signature: Vec::new(),
            issuer: Vec::new(),
            public_key: Vec::new(),
            signature_value: Vec::new(),
            serial_number: 0,
            key_usage: Vec::new(),
            extended_key_usage: Vec::new(),
            authority_information_access: Vec::new(),
            subject_alternative_name: Vec::new(),
            policies: Vec::new(),
            crl_distribution_points: Vec::new(),
            sct_list: Vec::new(),
            tx_hash_request: Hash256::ZERO,
            height_request: 0,
            tx_hash_approve: Hash256::ZERO,
            height_approve: 0,
        }
    }
}

impl Certificate {
    /// The record format version written by this crate.
    pub const CURRENT_VERSION: u32 = 1;

    /// An empty record at the current version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow one extension list.
    pub fn extension(&self, kind: ExtensionKind) -> &[Vec<u8>] {
        match kind {
            ExtensionKind::KeyUsage => &self.key_usage,
            ExtensionKind::ExtendedKeyUsage => &self.extended_key_usage,
            ExtensionKind::AuthorityInformationAccess => &self.authority_information_access,
            ExtensionKind::SubjectAlternativeName => &self.subject_alternative_name,
            ExtensionKind::Policies => &self.policies,
            ExtensionKind::CrlDistributionPoints => &self.crl_distribution_points,
            ExtensionKind::SctList => &self.sct_list,
        }
    }

    /// Mutably borrow one extension list.
    pub fn extension_mut(&mut self, kind: ExtensionKind) -> &mut Vec<Vec<u8>> {
        match kind {
            ExtensionKind::KeyUsage => &mut self.key_usage,
            ExtensionKind::ExtendedKeyUsage => &mut self.extended_key_usage,
            ExtensionKind::AuthorityInformationAccess => &mut self.authority_information_access,
            ExtensionKind::SubjectAlternativeName => &mut self.subject_alternative_name,
            ExtensionKind::Policies => &mut self.policies,
            ExtensionKind::CrlDistributionPoints => &mut self.crl_distribution_points,
            ExtensionKind::SctList => &mut self.sct_list,
        }
    }

    /// All extension lists in canonical order.
    pub fn extensions(&self) -> impl Iterator<Item = (ExtensionKind, &[Vec<u8>])> + '_ {
        ExtensionKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.extension(kind)))
    }

    pub fn is_approved(&self) -> bool {
        self.height_approve != 0
    }

    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }

    pub fn linkage_state(&self) -> LinkageState {
        if self.is_approved() {
            LinkageState::Approved
        } else if self.height_request != 0 || !self.tx_hash_request.is_zero() {
            LinkageState::Requested
        } else {
            LinkageState::Unlinked
        }
    }

    /// Key id of the certified public key: Hash160 of `public_key`.
    pub fn key_id(&self) -> Hash160 {
        hash160(&self.public_key)
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    pub fn fingerprint_hex(&self) -> String {
        hex::encode(&self.fingerprint)
    }

    pub fn subject_signature_base64(&self) -> String {
        BASE64.encode(&self.subject_signature)
    }

    pub fn signature_value_base64(&self) -> String {
        BASE64.encode(&self.signature_value)
    }
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Certificate(")?;
        writeln!(f, "    Version                  = {}", self.version)?;
        writeln!(f, "    Months Valid             = {}", self.months_valid)?;
        writeln!(f, "    Fingerprint              = {}", self.fingerprint_hex())?;
        writeln!(f, "    Signature Algorithm      = {}", lossy(&self.signature_algorithm))?;
        writeln!(f, "    Signature Hash Algorithm = {}", lossy(&self.signature_hash_algorithm))?;
        writeln!(f, "    Subject                  = {}", lossy(&self.subject))?;
        writeln!(f, "    Subject Signature        = {}", self.subject_signature_base64())?;
        writeln!(f, "    Public Key               = {}", self.public_key_hex())?;
        writeln!(f, "    Issuer                   = {}", lossy(&self.issuer))?;
        writeln!(f, "    Signature Value          = {}", self.signature_value_base64())?;
        writeln!(f, "    Serial Number            = {}", self.serial_number)?;
        writeln!(f, "    Key ID                   = {}", self.key_id())?;
        writeln!(f, "    Self Signed              = {}", yes_no(self.is_self_signed()))?;
        writeln!(f, "    Approved                 = {}", yes_no(self.is_approved()))?;
        writeln!(f, "    Request TxId             = {}", self.tx_hash_request)?;
        writeln!(f, "    Approve TxId             = {}", self.tx_hash_approve)?;
        write!(f, ")")
    }
}
