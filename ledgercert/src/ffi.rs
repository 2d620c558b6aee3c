// C FFI bindings for LedgerCert core operations.
//
// All functions return 0 on success, -1 on error or a failed check.
// Buffers are caller-allocated; lengths are checked.

use std::slice;

use crate::cert::serializer;
use crate::cert::validator;
use crate::cert::Certificate;
use crate::crypto::keys::IdentityKeyPair;

/// Decode a payload and check it against its reference hash.
///
/// # Safety
/// `data` and `hash` must be valid for reads of their lengths.
unsafe fn decode_verified(
    data: *const u8,
    data_len: usize,
    hash: *const u8,
    hash_len: usize,
) -> Option<Certificate> {
    if data.is_null() || hash.is_null() {
        return None;
    }
    let data = unsafe { slice::from_raw_parts(data, data_len) };
    let hash = unsafe { slice::from_raw_parts(hash, hash_len) };
    serializer::deserialize(data, hash).ok()
}

// ── Keypair generation ───────────────────────────────────────────────────

/// Generate a new Ed25519 identity keypair.
///
/// `public_key_out`: pointer to 32-byte buffer for the public key.
/// `secret_key_out`: pointer to 32-byte buffer for the secret key seed.
///
/// # Safety
/// Both pointers must be valid for writes of 32 bytes.
#[no_mangle]
pub unsafe extern "C" fn ledgercert_keypair_generate(
    public_key_out: *mut u8,
    secret_key_out: *mut u8,
) -> i32 {
    if public_key_out.is_null() || secret_key_out.is_null() {
        return -1;
    }
    let kp = IdentityKeyPair::generate();
    let pk = kp.public_key_bytes();
    let sk = kp.secret_key_bytes();
    unsafe {
        std::ptr::copy_nonoverlapping(pk.as_ptr(), public_key_out, 32);
        std::ptr::copy_nonoverlapping(sk.as_ptr(), secret_key_out, 32);
    }
    0
}

// ── Certificate checks ───────────────────────────────────────────────────

/// Decode a certificate payload, check it against `hash` (the ASCII hex
/// reference hash stored on the ledger), and validate every field bound.
///
/// # Safety
/// `data` and `hash` must be valid for reads of `data_len` and `hash_len`.
#[no_mangle]
pub unsafe extern "C" fn ledgercert_certificate_verify(
    data: *const u8,
    data_len: usize,
    hash: *const u8,
    hash_len: usize,
) -> i32 {
    let Some(cert) = (unsafe { decode_verified(data, data_len, hash, hash_len) }) else {
        return -1;
    };
    match validator::validate(&cert) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Check the subject signature of a verified payload against the public key
/// the certificate itself carries.
///
/// # Safety
/// `data` and `hash` must be valid for reads of `data_len` and `hash_len`.
#[no_mangle]
pub unsafe extern "C" fn ledgercert_check_subject_signature(
    data: *const u8,
    data_len: usize,
    hash: *const u8,
    hash_len: usize,
) -> i32 {
    match unsafe { decode_verified(data, data_len, hash, hash_len) } {
        Some(cert) if cert.check_subject_signature(&cert.public_key) => 0,
        _ => -1,
    }
}

/// Check the issuer signature of a verified payload against
/// `issuer_public_key`.
///
/// # Safety
/// `data` and `hash` must be valid for reads of `data_len` and `hash_len`;
/// `issuer_public_key` must be valid for reads of `issuer_public_key_len`.
#[no_mangle]
pub unsafe extern "C" fn ledgercert_check_issuer_signature(
    data: *const u8,
    data_len: usize,
    hash: *const u8,
    hash_len: usize,
    issuer_public_key: *const u8,
    issuer_public_key_len: usize,
) -> i32 {
    if issuer_public_key.is_null() {
        return -1;
    }
    let issuer_pk = unsafe { slice::from_raw_parts(issuer_public_key, issuer_public_key_len) };
    match unsafe { decode_verified(data, data_len, hash, hash_len) } {
        Some(cert) if cert.check_issuer_signature(issuer_pk) => 0,
        _ => -1,
    }
}

/// Write the 64-character hex subject hash of a verified payload to
/// `hex_out`.
///
/// # Safety
/// `data` and `hash` must be valid for reads of `data_len` and `hash_len`;
/// `hex_out` must be valid for writes of 64 bytes.
#[no_mangle]
pub unsafe extern "C" fn ledgercert_subject_hash(
    data: *const u8,
    data_len: usize,
    hash: *const u8,
    hash_len: usize,
    hex_out: *mut u8,
) -> i32 {
    if hex_out.is_null() {
        return -1;
    }
    let Some(cert) = (unsafe { decode_verified(data, data_len, hash, hash_len) }) else {
        return -1;
    };
    let hex = cert.subject_hash().to_hex();
    unsafe {
        std::ptr::copy_nonoverlapping(hex.as_ptr(), hex_out, hex.len());
    }
    0
}
