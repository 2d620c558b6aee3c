// X25519 agreement for envelope key wrapping.
//
// Certificates carry Ed25519 keys. Envelopes address recipients by those keys
// and convert them to their X25519 (Montgomery) form.

use ed25519_dalek::VerifyingKey;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::keys::IdentityKeyPair;
use crate::error::{LedgerCertError, Result};

const WRAP_INFO: &[u8] = b"ledgercert envelope key wrap v1";

/// An X25519 keypair: ephemeral for senders, derived from an identity for
/// recipients.
pub struct X25519KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl X25519KeyPair {
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Create from existing secret bytes (used in deterministic tests).
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The X25519 counterpart of an Ed25519 identity. Its public key equals
    /// [`recipient_public_key`] of the identity's public key.
    pub fn from_identity(identity: &IdentityKeyPair) -> Self {
        let scalar = Zeroizing::new(identity.signing_key().to_scalar_bytes());
        Self::from_secret_bytes(*scalar)
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Diffie-Hellman with a peer. Low-order peer keys yield an all-zero
    /// secret and are rejected.
    pub fn diffie_hellman(&self, peer_public: &[u8; 32]) -> Result<Zeroizing<[u8; 32]>> {
        let shared = self.secret.diffie_hellman(&PublicKey::from(*peer_public));
        if !shared.was_contributory() {
            return Err(LedgerCertError::InvalidKey("non-contributory X25519 peer key".into()));
        }
        Ok(Zeroizing::new(*shared.as_bytes()))
    }
}

/// Convert an Ed25519 public key to X25519.
pub fn recipient_public_key(ed25519_public: &[u8; 32]) -> Result<[u8; 32]> {
    let key = VerifyingKey::from_bytes(ed25519_public)
        .map_err(|e| LedgerCertError::InvalidKey(format!("recipient key: {e}")))?;
    if key.is_weak() {
        return Err(LedgerCertError::InvalidKey("recipient key has small order".into()));
    }
    Ok(key.to_montgomery().to_bytes())
}

/// Key-encryption key for one recipient:
/// `HKDF-SHA256(salt = ephemeral_pub || recipient_pub, ikm = shared, info)`.
pub fn derive_wrapping_key(
    shared: &[u8; 32],
    ephemeral_public: &[u8; 32],
    recipient_public: &[u8; 32],
) -> Result<Zeroizing<[u8; 32]>> {
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(ephemeral_public);
    salt[32..].copy_from_slice(recipient_public);

    let hk = Hkdf::<Sha256>::new(Some(&salt), shared);
    let mut kek = Zeroizing::new([0u8; 32]);
    hk.expand(WRAP_INFO, &mut kek[..])
        .map_err(|e| LedgerCertError::Encryption(format!("HKDF expand error: {e}")))?;
    Ok(kek)
}
