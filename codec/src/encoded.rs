//! Splicing pre-encoded values into a larger encoding.
//!
//! [MaybeEncoded] holds either a value or bytes produced by encoding such a value earlier. When
//! written, the bytes are copied verbatim instead of walking the value again. Decoding never
//! produces the encoded form, so [MaybeEncoded] has no [crate::Read] implementation; decode the
//! inner type instead.

use crate::{Encode, EncodeSize, Write};
use bytes::{BufMut, Bytes};

/// A value, or its encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaybeEncoded<T> {
    Value(T),
    /// Must hold the encoding of a `T`; the bytes are not checked.
    Encoded(Bytes),
}

impl<T: Encode> MaybeEncoded<T> {
    /// Encodes `value` once so it can be written many times.
    pub fn preencode(value: &T) -> Self {
        Self::Encoded(value.encode().freeze())
    }
}

impl<T> From<T> for MaybeEncoded<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Write> Write for MaybeEncoded<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Self::Value(value) => value.write(buf),
            Self::Encoded(bytes) => buf.put_slice(bytes),
        }
    }
}

impl<T: EncodeSize> EncodeSize for MaybeEncoded<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        match self {
            Self::Value(value) => value.encode_size(),
            Self::Encoded(bytes) => bytes.len(),
        }
    }
}
