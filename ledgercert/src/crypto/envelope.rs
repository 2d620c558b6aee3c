// Multi-recipient envelopes: encrypt a payload (typically a serialized
// certificate) so that any one of several identities can open it.
//
// Layout:
//   version u8 | suite u16 BE | ephemeral_pub [32] | count u16 BE |
//   count x wrapped_key [48] | nonce [12] | body ciphertext (tag appended)
//
// The header (everything before the body ciphertext) is the body's AAD.
// Each wrapped key is the content key sealed under that recipient's
// key-encryption key with an all-zero nonce; a KEK is only ever used once.

use bytes::{Buf, BufMut};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::aead::{AeadKey, CipherSuite, KEY_LENGTH, NONCE_LENGTH, TAG_LENGTH};
use crate::crypto::keys::IdentityKeyPair;
use crate::crypto::x25519::{derive_wrapping_key, recipient_public_key, X25519KeyPair};
use crate::error::{LedgerCertError, Result};

pub const ENVELOPE_VERSION: u8 = 1;
pub const WRAPPED_KEY_LENGTH: usize = KEY_LENGTH + TAG_LENGTH;

const FIXED_HEADER_LENGTH: usize = 1 + 2 + 32 + 2;
const WRAP_NONCE: [u8; NONCE_LENGTH] = [0; NONCE_LENGTH];

/// Encrypt `plaintext` to every Ed25519 public key in `recipients` with the
/// default suite.
pub fn encrypt(recipients: &[[u8; 32]], plaintext: &[u8]) -> Result<Vec<u8>> {
    encrypt_with_suite(CipherSuite::default(), recipients, plaintext)
}

pub fn encrypt_with_suite(
    suite: CipherSuite,
    recipients: &[[u8; 32]],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    if recipients.is_empty() {
        return Err(LedgerCertError::Envelope("no recipients".into()));
    }
    let count = u16::try_from(recipients.len()).map_err(|_| {
        LedgerCertError::Envelope(format!("too many recipients: {}", recipients.len()))
    })?;

    let mut content_key = Zeroizing::new([0u8; KEY_LENGTH]);
    OsRng.fill_bytes(&mut content_key[..]);
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let ephemeral = X25519KeyPair::generate();
    let ephemeral_public = ephemeral.public_key_bytes();

    let header_len = FIXED_HEADER_LENGTH + recipients.len() * WRAPPED_KEY_LENGTH + NONCE_LENGTH;
    let mut out = Vec::with_capacity(header_len + plaintext.len() + TAG_LENGTH);
    out.put_u8(ENVELOPE_VERSION);
    out.put_u16(suite.wire_id());
    out.put_slice(&ephemeral_public);
    out.put_u16(count);

    for recipient in recipients {
        let recipient_x = recipient_public_key(recipient)?;
        let shared = ephemeral.diffie_hellman(&recipient_x)?;
        let kek = derive_wrapping_key(&shared, &ephemeral_public, &recipient_x)?;
        let wrapped = AeadKey::new(suite, *kek).encrypt(&WRAP_NONCE, &content_key[..], b"")?;
        out.put_slice(&wrapped);
    }
    out.put_slice(&nonce);

    let body = AeadKey::new(suite, *content_key).encrypt(&nonce, plaintext, &out)?;
    out.put_slice(&body);

    debug!(recipients = recipients.len(), suite = ?suite, bytes = out.len(), "sealed envelope");
    Ok(out)
}

/// Parsed view of an envelope header.
struct Header<'a> {
    suite: CipherSuite,
    ephemeral_public: [u8; 32],
    wrapped_keys: &'a [u8],
    nonce: [u8; NONCE_LENGTH],
    header_len: usize,
}

fn parse_header(data: &[u8]) -> Result<Header<'_>> {
    let malformed = |what: &str| LedgerCertError::Envelope(what.to_string());

    let mut buf = data;
    if buf.remaining() < FIXED_HEADER_LENGTH {
        return Err(malformed("truncated header"));
    }
    let version = buf.get_u8();
    if version != ENVELOPE_VERSION {
        return Err(LedgerCertError::Envelope(format!("unsupported version {version}")));
    }
    let suite_id = buf.get_u16();
    let suite = CipherSuite::from_wire_id(suite_id).ok_or_else(|| {
        LedgerCertError::Envelope(format!("unknown cipher suite 0x{suite_id:04x}"))
    })?;
    let mut ephemeral_public = [0u8; 32];
    buf.copy_to_slice(&mut ephemeral_public);
    let count = usize::from(buf.get_u16());
    if count == 0 {
        return Err(malformed("no wrapped keys"));
    }

    let keys_len = count * WRAPPED_KEY_LENGTH;
    if buf.remaining() < keys_len + NONCE_LENGTH + TAG_LENGTH {
        return Err(malformed("truncated body"));
    }
    let start = FIXED_HEADER_LENGTH;
    let wrapped_keys = &data[start..start + keys_len];
    buf.advance(keys_len);
    let mut nonce = [0u8; NONCE_LENGTH];
    buf.copy_to_slice(&mut nonce);

    Ok(Header {
        suite,
        ephemeral_public,
        wrapped_keys,
        nonce,
        header_len: start + keys_len + NONCE_LENGTH,
    })
}

/// Open an envelope with the identity whose 32-byte Ed25519 seed is `seed`.
pub fn decrypt(seed: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let header = parse_header(ciphertext)?;

    let identity = IdentityKeyPair::from_seed(seed);
    let own = X25519KeyPair::from_identity(&identity);
    let shared = own.diffie_hellman(&header.ephemeral_public)?;
    let kek = derive_wrapping_key(&shared, &header.ephemeral_public, &own.public_key_bytes())?;
    let unwrap = AeadKey::new(header.suite, *kek);

    let content_key = header
        .wrapped_keys
        .chunks_exact(WRAPPED_KEY_LENGTH)
        .find_map(|wrapped| unwrap.decrypt(&WRAP_NONCE, wrapped, b"").ok())
        .ok_or_else(|| {
            LedgerCertError::Decryption("no wrapped key opens for this identity".into())
        })?;
    let content_key = Zeroizing::new(content_key);
    let key: [u8; KEY_LENGTH] = content_key
        .as_slice()
        .try_into()
        .map_err(|_| LedgerCertError::Envelope("wrapped key has wrong length".into()))?;
    let key = Zeroizing::new(key);

    let (aad, body) = ciphertext.split_at(header.header_len);
    AeadKey::new(header.suite, *key).decrypt(&header.nonce, body, aad)
}

/// Number of recipients an envelope is addressed to.
pub fn recipient_count(ciphertext: &[u8]) -> Result<usize> {
    Ok(parse_header(ciphertext)?.wrapped_keys.len() / WRAPPED_KEY_LENGTH)
}
