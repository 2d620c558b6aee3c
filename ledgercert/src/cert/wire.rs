// Wire primitives shared by the codec and the hash domains.
//
// Integers are little-endian and fixed width. Variable-length fields carry a
// CompactSize prefix:
//
//   n < 0xFD          [n:1B]
//   n <= 0xFFFF       [0xFD][n:2B]
//   n <= 0xFFFF_FFFF  [0xFE][n:4B]
//   otherwise         [0xFF][n:8B]
//
// Decoding rejects non-minimal prefixes and sizes above MAX_SIZE.

use bytes::{Buf, BufMut};

use crate::crypto::hash::Hash256;
use crate::error::{LedgerCertError, Result};

/// Largest length or element count accepted by the decoder.
pub(crate) const MAX_SIZE: u64 = 0x0200_0000;

pub(crate) fn put_compact_size<B: BufMut>(buf: &mut B, n: u64) {
    if n < 0xFD {
        buf.put_u8(n as u8);
    } else if n <= 0xFFFF {
        buf.put_u8(0xFD);
        buf.put_u16_le(n as u16);
    } else if n <= 0xFFFF_FFFF {
        buf.put_u8(0xFE);
        buf.put_u32_le(n as u32);
    } else {
        buf.put_u8(0xFF);
        buf.put_u64_le(n);
    }
}

pub(crate) fn put_bytes<B: BufMut>(buf: &mut B, bytes: &[u8]) {
    put_compact_size(buf, bytes.len() as u64);
    buf.put_slice(bytes);
}

pub(crate) fn put_list<B: BufMut>(buf: &mut B, list: &[Vec<u8>]) {
    put_compact_size(buf, list.len() as u64);
    for item in list {
        put_bytes(buf, item);
    }
}

pub(crate) fn put_hash<B: BufMut>(buf: &mut B, hash: &Hash256) {
    buf.put_slice(hash.as_bytes());
}

fn truncated(what: &str) -> LedgerCertError {
    LedgerCertError::Parse(format!("unexpected end of data reading {what}"))
}

/// Cursor over an untrusted payload.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn need(&self, n: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(truncated(what));
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self, what: &str) -> Result<u8> {
        self.need(1, what)?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn u16(&mut self, what: &str) -> Result<u16> {
        self.need(2, what)?;
        Ok(self.buf.get_u16_le())
    }

    pub(crate) fn u32(&mut self, what: &str) -> Result<u32> {
        self.need(4, what)?;
        Ok(self.buf.get_u32_le())
    }

    pub(crate) fn u64(&mut self, what: &str) -> Result<u64> {
        self.need(8, what)?;
        Ok(self.buf.get_u64_le())
    }

    pub(crate) fn compact_size(&mut self, what: &str) -> Result<u64> {
        let (n, min) = match self.u8(what)? {
            0xFD => (u64::from(self.u16(what)?), 0xFD),
            0xFE => (u64::from(self.u32(what)?), 0x1_0000),
            0xFF => (self.u64(what)?, 0x1_0000_0000),
            small => return Ok(u64::from(small)),
        };
        if n < min {
            return Err(LedgerCertError::Parse(format!(
                "non-canonical length prefix for {what}"
            )));
        }
        if n > MAX_SIZE {
            return Err(LedgerCertError::Parse(format!(
                "length {n} for {what} exceeds maximum {MAX_SIZE}"
            )));
        }
        Ok(n)
    }

    pub(crate) fn bytes(&mut self, what: &str) -> Result<Vec<u8>> {
        let len = self.compact_size(what)? as usize;
        self.need(len, what)?;
        let out = self.buf[..len].to_vec();
        self.buf.advance(len);
        Ok(out)
    }

    pub(crate) fn list(&mut self, what: &str) -> Result<Vec<Vec<u8>>> {
        let count = self.compact_size(what)? as usize;
        // every element needs at least its one-byte prefix
        let mut out = Vec::with_capacity(count.min(self.buf.remaining()));
        for _ in 0..count {
            out.push(self.bytes(what)?);
        }
        Ok(out)
    }

    pub(crate) fn hash(&mut self, what: &str) -> Result<Hash256> {
        self.need(32, what)?;
        let mut raw = [0u8; 32];
        self.buf.copy_to_slice(&mut raw);
        Ok(Hash256::from_bytes(raw))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}
