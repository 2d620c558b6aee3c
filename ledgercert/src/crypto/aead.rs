// AEAD ciphers for certificate envelopes: ChaCha20-Poly1305 and AES-256-GCM.
//
// Envelope suite IDs:
//   0x0001 X25519_HKDF_SHA256_AES256GCM
//   0x0002 X25519_HKDF_SHA256_CHACHA20POLY1305

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{LedgerCertError, Result};

pub const KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;

/// Cipher suite identifier as written in the envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherSuite {
    Aes256Gcm,
    #[default]
    ChaCha20Poly1305,
}

impl CipherSuite {
    pub fn wire_id(self) -> u16 {
        match self {
            CipherSuite::Aes256Gcm => 0x0001,
            CipherSuite::ChaCha20Poly1305 => 0x0002,
        }
    }

    pub fn from_wire_id(id: u16) -> Option<Self> {
        match id {
            0x0001 => Some(CipherSuite::Aes256Gcm),
            0x0002 => Some(CipherSuite::ChaCha20Poly1305),
            _ => None,
        }
    }
}

/// ChaCha20-Poly1305 (RFC 8439).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AeadCipher {
    key: [u8; KEY_LENGTH],
}

impl AeadCipher {
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Returns ciphertext || 16-byte Poly1305 tag.
    pub fn encrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| LedgerCertError::Encryption(format!("cipher init: {e}")))?;
        cipher
            .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|e| LedgerCertError::Encryption(format!("{e}")))
    }

    /// `ciphertext` includes the appended tag; `aad` must match encryption.
    pub fn decrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| LedgerCertError::Decryption(format!("cipher init: {e}")))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|e| LedgerCertError::Decryption(format!("{e}")))
    }
}

/// AES-256-GCM.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Aes256GcmCipher {
    key: [u8; KEY_LENGTH],
}

impl Aes256GcmCipher {
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Returns ciphertext || 16-byte GCM tag.
    pub fn encrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| LedgerCertError::Encryption(format!("aes-gcm init: {e}")))?;
        cipher
            .encrypt(AesNonce::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|e| LedgerCertError::Encryption(format!("{e}")))
    }

    pub fn decrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| LedgerCertError::Decryption(format!("aes-gcm init: {e}")))?;
        cipher
            .decrypt(AesNonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|e| LedgerCertError::Decryption(format!("{e}")))
    }
}

/// A key bound to one of the supported suites.
pub enum AeadKey {
    ChaCha20Poly1305(AeadCipher),
    Aes256Gcm(Aes256GcmCipher),
}

impl AeadKey {
    pub fn new(suite: CipherSuite, key: [u8; KEY_LENGTH]) -> Self {
        match suite {
            CipherSuite::ChaCha20Poly1305 => AeadKey::ChaCha20Poly1305(AeadCipher::new(key)),
            CipherSuite::Aes256Gcm => AeadKey::Aes256Gcm(Aes256GcmCipher::new(key)),
        }
    }

    pub fn suite(&self) -> CipherSuite {
        match self {
            AeadKey::ChaCha20Poly1305(_) => CipherSuite::ChaCha20Poly1305,
            AeadKey::Aes256Gcm(_) => CipherSuite::Aes256Gcm,
        }
    }

    pub fn encrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        match self {
            AeadKey::ChaCha20Poly1305(c) => c.encrypt(nonce, plaintext, aad),
            AeadKey::Aes256Gcm(c) => c.encrypt(nonce, plaintext, aad),
        }
    }

    pub fn decrypt(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        match self {
            AeadKey::ChaCha20Poly1305(c) => c.decrypt(nonce, ciphertext, aad),
            AeadKey::Aes256Gcm(c) => c.decrypt(nonce, ciphertext, aad),
        }
    }
}
