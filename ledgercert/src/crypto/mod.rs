// Crypto primitives: identity keys, digests, and envelope encryption.

pub mod hash;
pub mod keys;

#[cfg(feature = "envelope")]
pub mod aead;
#[cfg(feature = "envelope")]
pub mod envelope;
#[cfg(feature = "envelope")]
pub mod x25519;
