// Cryptographic hashing: SHA-256, double SHA-256, Hash160 and the digest types.

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::{LedgerCertError, Result};

/// SHA-256 hash of `data`, returning a 32-byte digest.
pub fn hash_sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// Double SHA-256 (`SHA-256(SHA-256(data))`), the digest used for every
/// certificate hash domain and for transaction ids.
pub fn hash_sha256d(data: &[u8]) -> Hash256 {
    Hash256(hash_sha256(&hash_sha256(data)))
}

/// `RIPEMD-160(SHA-256(data))`, the digest behind key ids.
pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = hash_sha256(data);
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripemd.finalize());
    Hash160(out)
}

/// A 160-bit digest. Printed byte-reversed, like [`Hash256`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash160([u8; 20]);

impl Hash160 {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }
}

impl fmt::Display for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash160({})", self.to_hex())
    }
}

/// A 256-bit digest.
///
/// Bytes are held in digest order. The textual form treats the digest as a
/// little-endian 256-bit integer and prints it most significant byte first,
/// so `to_hex` is the byte-reversed hex of the raw digest. That textual form
/// is what gets signed and what the ledger stores as a reference hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// The all-zero value, used for "no transaction yet".
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// 64-character lowercase hex, most significant byte first.
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Parse the textual form produced by [`Hash256::to_hex`].
    pub fn from_hex(s: &str) -> Result<Self> {
        let decoded =
            hex::decode(s).map_err(|e| LedgerCertError::Parse(format!("invalid hash hex: {e}")))?;
        let mut bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            LedgerCertError::Parse(format!("hash must be 32 bytes, got {}", v.len()))
        })?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = LedgerCertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
