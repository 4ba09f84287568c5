//! Codec implementations for fixed-size arrays.
//!
//! The length is part of the type, so `N` items are concatenated with no prefix.

use crate::{
    trace::{self, Index},
    EncodeSize, Error, Read, Write,
};
use bytes::{Buf, BufMut};

impl<T: Write, const N: usize> Write for [T; N] {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        for item in self {
            item.write(buf);
        }
    }
}

impl<T: EncodeSize, const N: usize> EncodeSize for [T; N] {
    #[inline]
    fn encode_size(&self) -> usize {
        self.iter().map(EncodeSize::encode_size).sum()
    }
}

impl<T: Read, const N: usize> Read for [T; N] {
    type Cfg = T::Cfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut items = Vec::with_capacity(N);
        for i in 0..N {
            items.push(trace::decode(Index(i), buf, |buf| T::read_cfg(buf, cfg))?);
        }
        items
            .try_into()
            .map_err(|_| Error::Invalid("array", "item count mismatch"))
    }
}
