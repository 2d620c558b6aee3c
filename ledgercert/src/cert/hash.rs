// Canonical hash domains.
//
// Three digests are defined over a certificate, all double SHA-256 over the
// wire encoding of an ordered field subset:
//
//   full    every field, in wire order (see serializer.rs)
//   subject sig_alg, sig_hash_alg, subject, serial, extensions
//   issuer  sig_alg, sig_hash_alg, months_valid, subject, subject_signature,
//           issuer, public_key, serial, extensions
//
// The field order is part of the wire contract. Reordering invalidates every
// signature and every ledger reference hash already issued.

use bytes::BufMut;

use super::wire::{put_bytes, put_list};
use super::{serializer, Certificate};
use crate::crypto::hash::{hash_sha256d, Hash256};

impl Certificate {
    /// Hash of the complete serialized record. This is the reference hash
    /// stored on the ledger next to the payload.
    pub fn full_hash(&self) -> Hash256 {
        hash_sha256d(&serializer::serialize(self))
    }

    /// Bytes covered by the subject's self-attestation.
    ///
    /// Issuer, public key and both signatures are outside this domain.
    pub fn subject_hash_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        put_bytes(&mut buf, &self.signature_algorithm);
        put_bytes(&mut buf, &self.signature_hash_algorithm);
        put_bytes(&mut buf, &self.subject);
        buf.put_u64_le(self.serial_number);
        self.put_extensions(&mut buf);
        buf
    }

    /// Bytes covered by the issuer's counter-attestation. Includes the
    /// subject signature, so it must be computed after the subject signs.
    pub fn issuer_hash_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        put_bytes(&mut buf, &self.signature_algorithm);
        put_bytes(&mut buf, &self.signature_hash_algorithm);
        buf.put_u16_le(self.months_valid);
        put_bytes(&mut buf, &self.subject);
        put_bytes(&mut buf, &self.subject_signature);
        put_bytes(&mut buf, &self.issuer);
        put_bytes(&mut buf, &self.public_key);
        buf.put_u64_le(self.serial_number);
        self.put_extensions(&mut buf);
        buf
    }

    pub fn subject_hash(&self) -> Hash256 {
        hash_sha256d(&self.subject_hash_bytes())
    }

    pub fn issuer_hash(&self) -> Hash256 {
        hash_sha256d(&self.issuer_hash_bytes())
    }

    pub(crate) fn put_extensions<B: BufMut>(&self, buf: &mut B) {
        for (_, list) in self.extensions() {
            put_list(buf, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Certificate {
        let mut cert = Certificate::new();
        cert.signature_algorithm = b"ed25519".to_vec();
        cert.signature_hash_algorithm = b"sha256d".to_vec();
        cert.subject = b"alice@public.bdap.io".to_vec();
        cert.public_key = vec![0x11; 32];
        cert.serial_number = 42;
        cert.months_valid = 12;
        cert.key_usage = vec![b"digitalSignature".to_vec()];
        cert
    }

    #[test]
    fn hashes_are_deterministic() {
        let cert = sample();
        assert_eq!(cert.full_hash(), cert.clone().full_hash());
        assert_eq!(cert.subject_hash(), cert.clone().subject_hash());
        assert_eq!(cert.issuer_hash(), cert.clone().issuer_hash());
    }

    #[test]
    fn domains_are_distinct() {
        let cert = sample();
        assert_ne!(cert.subject_hash(), cert.issuer_hash());
        assert_ne!(cert.subject_hash(), cert.full_hash());
    }

    #[test]
    fn issuer_and_key_outside_subject_domain() {
        let base = sample();
        let mut changed = base.clone();
        changed.issuer = b"ca1@public.bdap.io".to_vec();
        changed.public_key = vec![0x22; 32];
        assert_eq!(base.subject_hash(), changed.subject_hash());
        assert_ne!(base.issuer_hash(), changed.issuer_hash());
    }

    #[test]
    fn subject_in_both_domains() {
        let base = sample();
        let mut changed = base.clone();
        changed.subject = b"bob@public.bdap.io".to_vec();
        assert_ne!(base.subject_hash(), changed.subject_hash());
        assert_ne!(base.issuer_hash(), changed.issuer_hash());
    }

    #[test]
    fn subject_signature_chains_into_issuer_domain() {
        let base = sample();
        let mut changed = base.clone();
        changed.subject_signature = vec![0xAB; 64];
        assert_eq!(base.subject_hash(), changed.subject_hash());
        assert_ne!(base.issuer_hash(), changed.issuer_hash());
    }

    #[test]
    fn months_valid_only_in_issuer_domain() {
        let base = sample();
        let mut changed = base.clone();
        changed.months_valid = 24;
        assert_eq!(base.subject_hash(), changed.subject_hash());
        assert_ne!(base.issuer_hash(), changed.issuer_hash());
    }

    #[test]
    fn fingerprint_and_linkage_only_in_full_hash() {
        let base = sample();
        let mut changed = base.clone();
        changed.fingerprint = b"display".to_vec();
        changed.height_request = 100;
        assert_eq!(base.subject_hash(), changed.subject_hash());
        assert_eq!(base.issuer_hash(), changed.issuer_hash());
        assert_ne!(base.full_hash(), changed.full_hash());
    }

    #[test]
    fn extension_moved_between_lists_changes_hash() {
        let base = sample();
        let mut changed = base.clone();
        changed.key_usage.clear();
        changed.extended_key_usage = vec![b"digitalSignature".to_vec()];
        assert_ne!(base.subject_hash(), changed.subject_hash());
    }
}
