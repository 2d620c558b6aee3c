// Subject and issuer attestations.
//
// The signed message is the ASCII hex text of the domain hash (as printed by
// Hash256::to_hex), not the raw 32 digest bytes. Existing signed records
// depend on this, so it must not be "fixed".

use super::Certificate;
use crate::crypto::keys::{verify_signature, IdentityKeyPair};

impl Certificate {
    /// Message bytes the subject signs.
    pub fn subject_signing_message(&self) -> Vec<u8> {
        self.subject_hash().to_hex().into_bytes()
    }

    /// Message bytes the issuer signs.
    pub fn issuer_signing_message(&self) -> Vec<u8> {
        self.issuer_hash().to_hex().into_bytes()
    }

    /// Sign the subject hash domain and store the signature in
    /// `subject_signature`.
    pub fn sign_subject(&mut self, keypair: &IdentityKeyPair) -> [u8; 64] {
        let sig = keypair.sign(&self.subject_signing_message());
        self.subject_signature = sig.to_vec();
        sig
    }

    /// Sign the issuer hash domain and store the signature in
    /// `signature_value`. Call after the subject has signed.
    pub fn sign_issuer(&mut self, keypair: &IdentityKeyPair) -> [u8; 64] {
        let sig = keypair.sign(&self.issuer_signing_message());
        self.signature_value = sig.to_vec();
        sig
    }

    /// Whether `subject_signature` is a valid signature by `public_key` over
    /// the current subject hash domain.
    pub fn check_subject_signature(&self, public_key: &[u8]) -> bool {
        verify_signature(public_key, &self.subject_signing_message(), &self.subject_signature)
    }

    /// Whether `signature_value` is a valid signature by `public_key` over
    /// the current issuer hash domain.
    pub fn check_issuer_signature(&self, public_key: &[u8]) -> bool {
        verify_signature(public_key, &self.issuer_signing_message(), &self.signature_value)
    }
}
