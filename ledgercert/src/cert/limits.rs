// Field size limits.

use serde::{Deserialize, Serialize};

pub const MAX_ALGORITHM_TYPE_LENGTH: usize = 32;
pub const MAX_CERTIFICATE_FINGERPRINT: usize = 64;
pub const MAX_OBJECT_FULL_PATH_LENGTH: usize = 255;
pub const MAX_CERTIFICATE_SIGNATURE_LENGTH: usize = 96;
pub const MAX_CERTIFICATE_KEY_LENGTH: usize = 156;
pub const MAX_CERTIFICATE_EXTENSION_RECORDS: usize = 10;
pub const MAX_CERTIFICATE_EXTENSION_LENGTH: usize = 512;

/// Size limits applied by the field validator.
///
/// [`FieldLimits::default`] holds the limits every node enforces. A deployment
/// may load tighter limits (for example from a JSON config file) for its own
/// issuance flow, but records read from the ledger should be judged against
/// the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub algorithm_type_length: usize,
    pub fingerprint_length: usize,
    pub full_path_length: usize,
    pub signature_length: usize,
    pub key_length: usize,
    pub extension_records: usize,
    pub extension_length: usize,
}

impl FieldLimits {
    pub const CONSENSUS: FieldLimits = FieldLimits {
        algorithm_type_length: MAX_ALGORITHM_TYPE_LENGTH,
        fingerprint_length: MAX_CERTIFICATE_FINGERPRINT,
        full_path_length: MAX_OBJECT_FULL_PATH_LENGTH,
        signature_length: MAX_CERTIFICATE_SIGNATURE_LENGTH,
        key_length: MAX_CERTIFICATE_KEY_LENGTH,
        extension_records: MAX_CERTIFICATE_EXTENSION_RECORDS,
        extension_length: MAX_CERTIFICATE_EXTENSION_LENGTH,
    };

    /// Parse limits from JSON. Missing keys fall back to the consensus values.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self::CONSENSUS
    }
}
