//! Core codec traits

use crate::{error::Error, trace, walker::Walker};
use bytes::{Buf, BufMut, BytesMut};

/// Marker for types that can be used as [`Read::Cfg`].
pub trait Config: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Config for T {}

/// Trait for types that can be written (encoded) to a buffer.
pub trait Write {
    /// Encodes this value by writing to a buffer.
    ///
    /// Implementations should panic if the buffer doesn't have enough capacity.
    fn write(&self, buf: &mut impl BufMut);
}

/// Trait for types that know their encoded size ahead of writing.
pub trait EncodeSize {
    /// Returns the encoded size of this value (in bytes).
    ///
    /// This method MUST return the exact number of bytes that will be written by `write()`.
    fn encode_size(&self) -> usize;
}

/// Trait for types with a known, fixed encoded size.
pub trait FixedSize {
    /// The size of the encoded value (in bytes).
    const SIZE: usize;
}

// Automatically implement `EncodeSize` for types with a known size.
impl<T: FixedSize> EncodeSize for T {
    #[inline]
    fn encode_size(&self) -> usize {
        T::SIZE
    }
}

/// Trait for types that can be read/decoded from a buffer.
pub trait Read: Sized {
    /// The configuration used while reading.
    ///
    /// For example, it bounds the length prefixes accepted from untrusted input. Use `()` for
    /// types that do not require configuration.
    type Cfg: Config;

    /// Reads a value from the buffer, consuming exactly the bytes it was encoded with.
    ///
    /// Returns an error if decoding fails (e.g., invalid data, not enough bytes).
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Trait for types that can be encoded to a buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes a value to a `BytesMut` buffer sized by [`EncodeSize::encode_size`].
    ///
    /// Panics if the `write` implementation does not write the expected number of bytes.
    ///
    /// (Provided method).
    fn encode(&self) -> BytesMut {
        let len = self.encode_size();
        let mut buffer = BytesMut::with_capacity(len);
        self.write(&mut buffer);
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        buffer
    }
}

// Automatically implement `Encode` for types that implement `Write` and `EncodeSize`.
impl<T: Write + EncodeSize + ?Sized> Encode for T {}

/// Trait for types that can be decoded from a buffer.
pub trait Decode: Read {
    /// Decodes a value from a buffer, ensuring the buffer is fully consumed.
    ///
    /// (Provided method).
    fn decode_cfg(mut buf: impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let value = trace::decode(trace::TypeName::<Self>::new(), &mut buf, |buf| {
            Self::read_cfg(buf, cfg)
        })?;

        // Check that the buffer is fully consumed.
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(value)
    }

    /// Decodes a value from the start of `bytes`, returning it with the number of bytes consumed.
    ///
    /// Bytes after the value are left untouched.
    ///
    /// (Provided method).
    fn decode_prefix_cfg(bytes: &[u8], cfg: &Self::Cfg) -> Result<(Self, usize), Error> {
        let mut walker = Walker::new(bytes);
        let value = trace::decode(trace::TypeName::<Self>::new(), &mut walker, |walker| {
            Self::read_cfg(walker, cfg)
        })?;
        Ok((value, walker.position()))
    }
}

// Automatically implement `Decode` for types that implement `Read`.
impl<T: Read> Decode for T {}

/// Trait for types that can be encoded and decoded.
pub trait Codec: Encode + Decode {}

// Automatically implement `Codec` for types that implement `Encode` and `Decode`.
impl<T: Encode + Decode> Codec for T {}

/// Extension trait providing ergonomic read methods for types whose configuration has a default.
///
/// For length-prefixed types the default [crate::RangeCfg] accepts any length.
pub trait ReadExt: Read {
    /// Reads a value using the default config.
    fn read(buf: &mut impl Buf) -> Result<Self, Error>
    where
        Self::Cfg: Default,
    {
        Self::read_cfg(buf, &Self::Cfg::default())
    }
}

// Automatically implement `ReadExt` for types that implement `Read`.
impl<T: Read> ReadExt for T {}

/// Extension trait providing ergonomic decode methods for types whose configuration has a default.
pub trait DecodeExt: Decode {
    /// Decodes a value using the default config.
    fn decode(buf: impl Buf) -> Result<Self, Error>
    where
        Self::Cfg: Default,
    {
        Self::decode_cfg(buf, &Self::Cfg::default())
    }

    /// Decodes a value from the start of `bytes` using the default config.
    fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize), Error>
    where
        Self::Cfg: Default,
    {
        Self::decode_prefix_cfg(bytes, &Self::Cfg::default())
    }
}

// Automatically implement `DecodeExt` for types that implement `Decode`.
impl<T: Decode> DecodeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_insufficient_buffer() {
        let mut reader = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(
            u32::read(&mut reader),
            Err(Error::InsufficientBytes {
                needed: 4,
                remaining: 2
            })
        ));
    }

    #[test]
    fn test_extra_data() {
        let encoded = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(u8::decode(encoded), Err(Error::ExtraData(1))));
    }

    #[test]
    fn test_decode_prefix() {
        let (value, consumed) = u16::decode_prefix(&[0x34, 0x12, 0xFF, 0xFF]).unwrap();
        assert_eq!(value, 0x1234);
        assert_eq!(consumed, 2);
    }

    #[test]
    #[should_panic(expected = "write() did not write expected bytes")]
    fn test_encode_size_mismatch_panics() {
        struct Liar;

        impl Write for Liar {
            fn write(&self, buf: &mut impl BufMut) {
                buf.put_u8(1);
                buf.put_u8(2);
            }
        }

        impl EncodeSize for Liar {
            fn encode_size(&self) -> usize {
                1
            }
        }

        let _ = Liar.encode();
    }
}
