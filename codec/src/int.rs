//! Fixed-width integers of a width and signedness chosen at runtime.
//!
//! Native Rust integers implement [crate::Write] and [crate::Read] directly. [IntKind] serves
//! the schema-driven codecs, where the width is only known from a [crate::dynamic::Shape]:
//! values travel as `u128`/`i128` and are narrowed to `width / 8` little-endian bytes on the
//! wire, using two's complement for signed kinds.

use crate::{util::at_least, Error};
use bytes::{Buf, BufMut};
use std::fmt;

/// Bit width of a fixed-size integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl IntWidth {
    /// Number of bits.
    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
            IntWidth::W128 => 128,
        }
    }

    /// Number of bytes on the wire.
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Looks up the width with the given number of bits.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            128 => Some(IntWidth::W128),
            _ => None,
        }
    }
}

/// Width and signedness of a fixed-size integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntKind {
    pub width: IntWidth,
    pub signed: bool,
}

impl IntKind {
    pub const U8: Self = Self::new(IntWidth::W8, false);
    pub const U16: Self = Self::new(IntWidth::W16, false);
    pub const U32: Self = Self::new(IntWidth::W32, false);
    pub const U64: Self = Self::new(IntWidth::W64, false);
    pub const U128: Self = Self::new(IntWidth::W128, false);
    pub const I8: Self = Self::new(IntWidth::W8, true);
    pub const I16: Self = Self::new(IntWidth::W16, true);
    pub const I32: Self = Self::new(IntWidth::W32, true);
    pub const I64: Self = Self::new(IntWidth::W64, true);
    pub const I128: Self = Self::new(IntWidth::W128, true);

    pub const fn new(width: IntWidth, signed: bool) -> Self {
        Self { width, signed }
    }

    /// Number of bytes on the wire.
    pub const fn size(&self) -> usize {
        self.width.bytes()
    }

    /// Largest value representable by this kind.
    pub fn max(&self) -> u128 {
        let bits = self.width.bits() - u32::from(self.signed);
        if bits == 128 {
            u128::MAX
        } else {
            (1u128 << bits) - 1
        }
    }

    /// Smallest value representable by this kind.
    pub fn min(&self) -> i128 {
        if !self.signed {
            return 0;
        }
        match self.width {
            IntWidth::W128 => i128::MIN,
            width => -(1i128 << (width.bits() - 1)),
        }
    }

    /// Returns an error if `value` is not representable by this kind.
    pub fn check_unsigned(&self, value: u128) -> Result<(), Error> {
        if value > self.max() {
            return Err(Error::IntOutOfRange {
                value: value.to_string(),
                kind: *self,
            });
        }
        Ok(())
    }

    /// Returns an error if `value` is not representable by this kind.
    pub fn check_signed(&self, value: i128) -> Result<(), Error> {
        let fits = match u128::try_from(value) {
            Ok(positive) => positive <= self.max(),
            Err(_) => value >= self.min(),
        };
        if !fits {
            return Err(Error::IntOutOfRange {
                value: value.to_string(),
                kind: *self,
            });
        }
        Ok(())
    }

    /// Writes the low `size()` bytes of `value`, little-endian.
    ///
    /// The value must already have been checked with [IntKind::check_unsigned].
    pub fn write_unsigned(&self, value: u128, buf: &mut impl BufMut) {
        debug_assert!(value <= self.max());
        buf.put_slice(&value.to_le_bytes()[..self.size()]);
    }

    /// Writes the low `size()` bytes of the two's-complement `value`, little-endian.
    ///
    /// The value must already have been checked with [IntKind::check_signed].
    pub fn write_signed(&self, value: i128, buf: &mut impl BufMut) {
        buf.put_slice(&value.to_le_bytes()[..self.size()]);
    }

    /// Reads `size()` little-endian bytes as an unsigned value.
    pub fn read_unsigned(&self, buf: &mut impl Buf) -> Result<u128, Error> {
        let size = self.size();
        at_least(buf, size)?;
        let mut raw = [0u8; 16];
        buf.copy_to_slice(&mut raw[..size]);
        Ok(u128::from_le_bytes(raw))
    }

    /// Reads `size()` little-endian bytes and sign-extends them from this width.
    pub fn read_signed(&self, buf: &mut impl Buf) -> Result<i128, Error> {
        let raw = self.read_unsigned(buf)?;
        let shift = 128 - self.width.bits();
        Ok(((raw << shift) as i128) >> shift)
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { 'i' } else { 'u' };
        write!(f, "{sign}{}", self.width.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use paste::paste;

    fn encode_signed(kind: IntKind, value: i128) -> Vec<u8> {
        kind.check_signed(value).unwrap();
        let mut buf = BytesMut::new();
        kind.write_signed(value, &mut buf);
        buf.to_vec()
    }

    #[test]
    fn test_negative_two_complement() {
        assert_eq!(encode_signed(IntKind::I8, -1), vec![0xff]);
        assert_eq!(encode_signed(IntKind::I16, -1234), vec![0x2e, 0xfb]);
        assert_eq!(
            encode_signed(IntKind::I32, -1234),
            vec![0x2e, 0xfb, 0xff, 0xff]
        );

        let mut bytes = &[0x2e, 0xfb][..];
        assert_eq!(IntKind::I16.read_signed(&mut bytes).unwrap(), -1234);
        let mut bytes = &[0x2e, 0xfb, 0xff, 0xff][..];
        assert_eq!(IntKind::I32.read_signed(&mut bytes).unwrap(), -1234);
    }

    #[test]
    fn test_unsigned_read_does_not_sign_extend() {
        let mut bytes = &[0x2e, 0xfb][..];
        assert_eq!(IntKind::U16.read_unsigned(&mut bytes).unwrap(), 0xfb2e);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            IntKind::U8.check_unsigned(256),
            Err(Error::IntOutOfRange { kind: IntKind::U8, .. })
        ));
        assert!(IntKind::I8.check_signed(-129).is_err());
        assert!(IntKind::I8.check_signed(128).is_err());
        assert!(IntKind::I8.check_signed(-128).is_ok());
        assert!(IntKind::U32.check_signed(-1).is_err());
        assert!(IntKind::I128.check_signed(i128::MIN).is_ok());
        assert!(IntKind::U128.check_unsigned(u128::MAX).is_ok());
    }

    #[test]
    fn test_insufficient_bytes() {
        let mut bytes = &[0x01, 0x02, 0x03][..];
        assert!(matches!(
            IntKind::U32.read_unsigned(&mut bytes),
            Err(Error::InsufficientBytes {
                needed: 4,
                remaining: 3
            })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(IntKind::I16.to_string(), "i16");
        assert_eq!(IntKind::U128.to_string(), "u128");
        assert_eq!(IntWidth::from_bits(64), Some(IntWidth::W64));
        assert_eq!(IntWidth::from_bits(24), None);
    }

    macro_rules! impl_native_agreement {
        ($($ty:ident => $kind:ident),+) => {
            paste! {
                $(
                    #[test]
                    fn [<test_matches_native_ $ty>]() {
                        for value in [$ty::MIN, $ty::MIN / 3, 0, 1, $ty::MAX / 7, $ty::MAX] {
                            let mut buf = BytesMut::new();
                            if IntKind::$kind.signed {
                                IntKind::$kind.write_signed(value as i128, &mut buf);
                            } else {
                                IntKind::$kind.write_unsigned(value as u128, &mut buf);
                            }
                            assert_eq!(&buf[..], &value.to_le_bytes()[..]);
                        }
                    }
                )+
            }
        };
    }

    impl_native_agreement!(
        u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128,
        i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128
    );
}
