//! Codec utility functions

use crate::Error;
use bytes::Buf;

/// Checks if the buffer has at least `len` bytes remaining. Returns an [Error::InsufficientBytes]
/// if not.
#[inline]
pub fn at_least<B: Buf>(buf: &mut B, len: usize) -> Result<(), Error> {
    let remaining = buf.remaining();
    if remaining < len {
        return Err(Error::InsufficientBytes {
            needed: len,
            remaining,
        });
    }
    Ok(())
}

/// Strips module paths from a type name (`alloc::vec::Vec<u8>` becomes `Vec<u8>`).
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}
