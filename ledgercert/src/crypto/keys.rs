// Ed25519 identity keypairs and detached signature verification.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::{LedgerCertError, Result};

/// Length of an Ed25519 detached signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 keypair used by subjects and issuers to attest certificates.
#[derive(Debug)]
pub struct IdentityKeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl IdentityKeyPair {
    /// Generate a fresh random Ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct from a seed slice, rejecting anything that is not 32 bytes.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self> {
        let seed: &[u8; 32] = seed.try_into().map_err(|_| {
            LedgerCertError::InvalidKey(format!("seed must be 32 bytes, got {}", seed.len()))
        })?;
        Ok(Self::from_seed(seed))
    }

    /// The 32-byte Ed25519 public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// The 32-byte secret key seed.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Access the raw verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Access the raw signing (private) key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Sign arbitrary data.
    pub fn sign(&self, data: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        let sig: Signature = self.signing_key.sign(data);
        sig.to_bytes()
    }

    /// Verify a signature against the public key.
    pub fn verify(&self, data: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
        let sig = Signature::from_bytes(signature);
        self.verifying_key.verify(data, &sig).is_ok()
    }
}

/// Verify a detached signature given untrusted public key and signature
/// bytes. Wrong lengths, non-canonical points and mismatches all yield `false`.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(pk) = <&[u8; 32]>::try_from(public_key) else {
        return false;
    };
    let Ok(vk) = VerifyingKey::from_bytes(pk) else {
        return false;
    };
    let Ok(sig) = Signature::from_slice(signature) else {
        return false;
    };
    vk.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_roundtrip() {
        let kp = IdentityKeyPair::generate();
        let seed = kp.secret_key_bytes();
        let kp2 = IdentityKeyPair::from_seed(&seed);
        assert_eq!(kp.public_key_bytes(), kp2.public_key_bytes());
    }

    #[test]
    fn test_sign_verify() {
        let kp = IdentityKeyPair::generate();
        let msg = b"hello ledgercert";
        let sig = kp.sign(msg);
        assert!(kp.verify(msg, &sig));
    }

    #[test]
    fn test_verify_wrong_message() {
        let kp = IdentityKeyPair::generate();
        let sig = kp.sign(b"correct message");
        assert!(!kp.verify(b"wrong message", &sig));
    }

    #[test]
    fn test_verify_malformed_inputs() {
        let kp = IdentityKeyPair::generate();
        let sig = kp.sign(b"msg");
        let pk = kp.public_key_bytes();
        assert!(verify_signature(&pk, b"msg", &sig));
        assert!(!verify_signature(&pk[..31], b"msg", &sig));
        assert!(!verify_signature(&pk, b"msg", &sig[..63]));
        assert!(!verify_signature(&[], b"msg", &[]));
    }

    #[test]
    fn test_seed_slice_length() {
        assert!(IdentityKeyPair::from_seed_slice(&[7u8; 32]).is_ok());
        assert!(IdentityKeyPair::from_seed_slice(&[7u8; 31]).is_err());
    }
}
