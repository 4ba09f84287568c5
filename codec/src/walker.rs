//! Position-tracking cursor over an input slice, and the encode/decode drivers built on it.

use crate::Error;
use bytes::{Buf, Bytes, BytesMut};

/// Read cursor over a borrowed byte slice.
///
/// Implements [Buf], so every [crate::Read] implementation can consume from it. Unlike `&[u8]`,
/// it remembers how far it has advanced, which is how [decode_prefix_with] reports the number of
/// bytes consumed.
#[derive(Clone, Debug)]
pub struct Walker<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Walker<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The full input, including consumed bytes.
    pub fn input(&self) -> &'a [u8] {
        self.input
    }
}

impl Buf for Walker<'_> {
    fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    fn chunk(&self) -> &[u8] {
        &self.input[self.position..]
    }

    fn advance(&mut self, cnt: usize) {
        let remaining = self.remaining();
        assert!(
            cnt <= remaining,
            "cannot advance past end of input: {cnt} > {remaining}"
        );
        self.position += cnt;
    }
}

/// Encodes `value` into a buffer preallocated with `size_hint(value)` bytes.
///
/// Returns [Error::EncodeSizeMismatch] if `write` does not produce exactly the hinted number of
/// bytes.
pub fn encode_with<T: ?Sized>(
    value: &T,
    size_hint: impl FnOnce(&T) -> Result<usize, Error>,
    write: impl FnOnce(&T, &mut BytesMut) -> Result<(), Error>,
) -> Result<Bytes, Error> {
    let expected = size_hint(value)?;
    let mut buf = BytesMut::with_capacity(expected);
    write(value, &mut buf)?;
    if buf.len() != expected {
        return Err(Error::EncodeSizeMismatch {
            expected,
            written: buf.len(),
        });
    }
    Ok(buf.freeze())
}

/// Decodes a value from `bytes`, failing with [Error::ExtraData] if any input is left over.
pub fn decode_with<T>(
    bytes: &[u8],
    decode: impl FnOnce(&mut Walker<'_>) -> Result<T, Error>,
) -> Result<T, Error> {
    let (value, consumed) = decode_prefix_with(bytes, decode)?;
    let extra = bytes.len() - consumed;
    if extra > 0 {
        return Err(Error::ExtraData(extra));
    }
    Ok(value)
}

/// Decodes a value from the start of `bytes`, returning it with the number of bytes consumed.
pub fn decode_prefix_with<T>(
    bytes: &[u8],
    decode: impl FnOnce(&mut Walker<'_>) -> Result<T, Error>,
) -> Result<(T, usize), Error> {
    let mut walker = Walker::new(bytes);
    let value = decode(&mut walker)?;
    Ok((value, walker.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Encode, EncodeSize, ReadExt, Write};

    #[test]
    fn test_walker_tracks_position() {
        let mut walker = Walker::new(&[1, 2, 3, 4, 5]);
        assert_eq!(walker.get_u8(), 1);
        assert_eq!(walker.get_u16_le(), 0x0302);
        assert_eq!(walker.position(), 3);
        assert_eq!(walker.remaining(), 2);
        assert_eq!(walker.chunk(), &[4, 5]);
    }

    #[test]
    #[should_panic(expected = "cannot advance past end of input")]
    fn test_walker_advance_past_end() {
        let mut walker = Walker::new(&[1]);
        walker.advance(2);
    }

    #[test]
    fn test_encode_with() {
        let encoded = encode_with(
            &0x0102u16,
            |v| Ok(v.encode_size()),
            |v, buf| {
                v.write(buf);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(&encoded[..], &[0x02, 0x01]);
        assert_eq!(encoded, 0x0102u16.encode().freeze());
    }

    #[test]
    fn test_encode_with_size_mismatch() {
        let result = encode_with(
            &7u32,
            |_| Ok(3),
            |v, buf| {
                v.write(buf);
                Ok(())
            },
        );
        assert!(matches!(
            result,
            Err(Error::EncodeSizeMismatch {
                expected: 3,
                written: 4
            })
        ));
    }

    #[test]
    fn test_decode_with() {
        assert_eq!(decode_with(&[0x2a], |w| u8::read(w)).unwrap(), 42);
        assert!(matches!(
            decode_with(&[0x2a, 0x00], |w| u8::read(w)),
            Err(Error::ExtraData(1))
        ));
        assert_eq!(
            decode_prefix_with(&[0x2a, 0x00], |w| u8::read(w)).unwrap(),
            (42, 1)
        );
    }
}
