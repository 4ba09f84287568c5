//! Codec implementations for strings and byte blobs.
//!
//! Both are written as a compact byte length followed by the raw bytes. Strings must be valid
//! UTF-8; the length counts bytes, not characters.

use crate::{compact, util::at_least, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut, Bytes};

fn write_blob(bytes: &[u8], buf: &mut impl BufMut) {
    compact::write_len(bytes.len(), buf);
    buf.put_slice(bytes);
}

fn blob_size(len: usize) -> usize {
    compact::len_size(len) + len
}

fn read_blob_len(buf: &mut impl Buf, range: &RangeCfg<usize>) -> Result<usize, Error> {
    let len = compact::read_len(buf, range)?;
    at_least(buf, len)?;
    Ok(len)
}

impl Write for str {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write_blob(self.as_bytes(), buf);
    }
}

impl EncodeSize for str {
    #[inline]
    fn encode_size(&self) -> usize {
        blob_size(self.len())
    }
}

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.as_str().write(buf);
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self) -> usize {
        self.as_str().encode_size()
    }
}

impl Read for String {
    type Cfg = RangeCfg<usize>;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &Self::Cfg) -> Result<Self, Error> {
        let len = read_blob_len(buf, range)?;
        let mut raw = vec![0u8; len];
        buf.copy_to_slice(&mut raw);
        String::from_utf8(raw).map_err(|_| Error::InvalidUtf8)
    }
}

impl Write for Bytes {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write_blob(self, buf);
    }
}

impl EncodeSize for Bytes {
    #[inline]
    fn encode_size(&self) -> usize {
        blob_size(self.len())
    }
}

impl Read for Bytes {
    type Cfg = RangeCfg<usize>;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &Self::Cfg) -> Result<Self, Error> {
        let len = read_blob_len(buf, range)?;
        Ok(buf.copy_to_bytes(len))
    }
}
