// Certificate binary serializer / deserializer.
//
// Wire format (little-endian integers, CompactSize-prefixed byte strings):
// [version:4B][months_valid:2B]
// [fingerprint][signature_algorithm][signature_hash_algorithm]
// [subject][subject_signature][issuer][public_key][signature_value]
// [serial_number:8B]
// [key_usage][extended_key_usage][authority_information_access]
// [subject_alternative_name][policies][crl_distribution_points][sct_list]
// [tx_hash_request:32B][height_request:4B]
// [tx_hash_approve:32B][height_approve:4B]
//
// Byte string: [len:CompactSize][bytes]
// Extension list: [count:CompactSize][byte string]*count

use bytes::BufMut;
use tracing::{debug, warn};

use super::wire::{put_bytes, put_hash, Reader};
use super::{Certificate, ExtensionKind};
use crate::error::{LedgerCertError, Result};

/// Serialize a [`Certificate`] into its canonical binary form.
pub fn serialize(cert: &Certificate) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512);

    buf.put_u32_le(cert.version);
    buf.put_u16_le(cert.months_valid);

    put_bytes(&mut buf, &cert.fingerprint);
    put_bytes(&mut buf, &cert.signature_algorithm);
    put_bytes(&mut buf, &cert.signature_hash_algorithm);
    put_bytes(&mut buf, &cert.subject);
    put_bytes(&mut buf, &cert.subject_signature);
    put_bytes(&mut buf, &cert.issuer);
    put_bytes(&mut buf, &cert.public_key);
    put_bytes(&mut buf, &cert.signature_value);

    buf.put_u64_le(cert.serial_number);

    cert.put_extensions(&mut buf);

    // Linkage
    put_hash(&mut buf, &cert.tx_hash_request);
    buf.put_u32_le(cert.height_request);
    put_hash(&mut buf, &cert.tx_hash_approve);
    buf.put_u32_le(cert.height_approve);

    buf
}

/// Decode a certificate without checking it against a reference hash.
///
/// Bytes following a complete record are ignored. Prefer [`deserialize`]
/// for anything sourced from the ledger.
pub fn decode_unverified(data: &[u8]) -> Result<Certificate> {
    let mut r = Reader::new(data);

    let mut cert = Certificate {
        version: r.u32("version")?,
        months_valid: r.u16("months_valid")?,
        fingerprint: r.bytes("fingerprint")?,
        signature_algorithm: r.bytes("signature_algorithm")?,
        signature_hash_algorithm: r.bytes("signature_hash_algorithm")?,
        subject: r.bytes("subject")?,
        subject_signature: r.bytes("subject_signature")?,
        issuer: r.bytes("issuer")?,
        public_key: r.bytes("public_key")?,
        signature_value: r.bytes("signature_value")?,
        serial_number: r.u64("serial_number")?,
        ..Certificate::default()
    };

    for kind in ExtensionKind::ALL {
        *cert.extension_mut(kind) = r.list(kind.field())?;
    }

    cert.tx_hash_request = r.hash("tx_hash_request")?;
    cert.height_request = r.u32("height_request")?;
    cert.tx_hash_approve = r.hash("tx_hash_approve")?;
    cert.height_approve = r.u32("height_approve")?;

    if r.remaining() > 0 {
        debug!(trailing = r.remaining(), "certificate payload has trailing bytes");
    }

    Ok(cert)
}

/// Deserialize a [`Certificate`] and verify it against `reference_hash`,
/// the textual full hash (ASCII hex, see [`crate::Hash256::to_hex`]) recorded
/// on the ledger alongside the payload.
///
/// The decoded record is re-serialized and hashed, so a payload that parses
/// but was altered relative to what the ledger attests is rejected with
/// [`LedgerCertError::Integrity`]. Bytes after a complete record are ignored.
pub fn deserialize(data: &[u8], reference_hash: &[u8]) -> Result<Certificate> {
    let cert = decode_unverified(data).map_err(|e| {
        warn!(error = %e, len = data.len(), "certificate payload failed to parse");
        e
    })?;

    let computed = cert.full_hash().to_hex();
    if computed.as_bytes() != reference_hash {
        let expected = String::from_utf8_lossy(reference_hash).into_owned();
        warn!(%expected, %computed, "certificate payload hash mismatch");
        return Err(LedgerCertError::Integrity { expected, computed });
    }

    debug!(hash = %computed, serial = cert.serial_number, "certificate payload verified");
    Ok(cert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Hash256;

    fn sample() -> Certificate {
        let mut cert = Certificate::new();
        cert.months_valid = 12;
        cert.fingerprint = b"fp".to_vec();
        cert.signature_algorithm = b"ed25519".to_vec();
        cert.signature_hash_algorithm = b"sha256d".to_vec();
        cert.subject = b"alice@public.bdap.io".to_vec();
        cert.subject_signature = vec![0x5A; 64];
        cert.public_key = vec![0x11; 32];
        cert.serial_number = 0x0102_0304_0506_0708;
        cert.key_usage = vec![b"digitalSignature".to_vec(), b"keyAgreement".to_vec()];
        cert.sct_list = vec![vec![0xEE; 300]];
        cert
    }

    #[test]
    fn roundtrip_with_reference_hash() {
        let cert = sample();
        let bytes = serialize(&cert);
        let hash = cert.full_hash().to_hex();
        let decoded = deserialize(&bytes, hash.as_bytes()).unwrap();
        assert_eq!(decoded, cert);
    }

    #[test]
    fn roundtrip_preserves_linkage() {
        let mut cert = sample();
        cert.tx_hash_request = Hash256::from_bytes([0x01; 32]);
        cert.height_request = 100;
        cert.tx_hash_approve = Hash256::from_bytes([0x02; 32]);
        cert.height_approve = 150;
        let bytes = serialize(&cert);
        let decoded = deserialize(&bytes, cert.full_hash().to_hex().as_bytes()).unwrap();
        assert_eq!(decoded, cert);
    }

    #[test]
    fn version_is_first_four_bytes() {
        let bytes = serialize(&sample());
        assert_eq!(&bytes[..4], &Certificate::CURRENT_VERSION.to_le_bytes());
    }

    #[test]
    fn empty_record_has_fixed_size() {
        // 4 + 2 + 8 one-byte prefixes + 8 + 7 one-byte counts + 2 * (32 + 4)
        let bytes = serialize(&Certificate::new());
        assert_eq!(bytes.len(), 4 + 2 + 8 + 8 + 7 + 72);
    }

    #[test]
    fn wrong_reference_hash_is_integrity_error() {
        let cert = sample();
        let bytes = serialize(&cert);
        let err = deserialize(&bytes, Hash256::ZERO.to_hex().as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerCertError::Integrity { .. }));
    }

    #[test]
    fn raw_digest_bytes_are_not_a_reference_hash() {
        let cert = sample();
        let bytes = serialize(&cert);
        let raw = *cert.full_hash().as_bytes();
        assert!(matches!(
            deserialize(&bytes, &raw),
            Err(LedgerCertError::Integrity { .. })
        ));
    }

    #[test]
    fn truncated_data_is_parse_error() {
        let cert = sample();
        let bytes = serialize(&cert);
        let hash = cert.full_hash().to_hex();
        let err = deserialize(&bytes[..bytes.len() - 1], hash.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerCertError::Parse(_)));
    }

    #[test]
    fn trailing_bytes_are_not_part_of_the_record() {
        let cert = sample();
        let mut bytes = serialize(&cert);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let hash = cert.full_hash().to_hex();
        let decoded = deserialize(&bytes, hash.as_bytes()).unwrap();
        assert_eq!(decoded, cert);
    }

    #[test]
    fn mutated_length_prefix_is_rejected() {
        let cert = sample();
        let mut bytes = serialize(&cert);
        // fingerprint prefix sits right after version and months_valid
        bytes[6] = 0x01;
        let hash = cert.full_hash().to_hex();
        assert!(deserialize(&bytes, hash.as_bytes()).is_err());
    }

    #[test]
    fn empty_payload_is_parse_error() {
        assert!(matches!(
            deserialize(&[], b""),
            Err(LedgerCertError::Parse(_))
        ));
    }
}
