//! Codec implementations for Rust primitive types.
//!
//! All fixed-size integers are written little-endian, signed integers in two's complement.
//! Booleans take a single byte that must be `0x00` or `0x01`. The unit type takes no bytes.

use crate::{util::at_least, Error, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};

macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, buf: &mut impl BufMut) {
                buf.$write_method(*self);
            }
        }

        impl Read for $type {
            type Cfg = ();
            #[inline]
            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
        }
    };
}

impl_numeric!(u8, get_u8, put_u8);
impl_numeric!(u16, get_u16_le, put_u16_le);
impl_numeric!(u32, get_u32_le, put_u32_le);
impl_numeric!(u64, get_u64_le, put_u64_le);
impl_numeric!(u128, get_u128_le, put_u128_le);
impl_numeric!(i8, get_i8, put_i8);
impl_numeric!(i16, get_i16_le, put_i16_le);
impl_numeric!(i32, get_i32_le, put_i32_le);
impl_numeric!(i64, get_i64_le, put_i64_le);
impl_numeric!(i128, get_i128_le, put_i128_le);

// Bool implementation
impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(u8::from(*self));
    }
}

impl Read for bool {
    type Cfg = ();
    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        match u8::read(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidBool(other)),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

// Unit implementation
impl Write for () {
    #[inline]
    fn write(&self, _: &mut impl BufMut) {}
}

impl Read for () {
    type Cfg = ();
    #[inline]
    fn read_cfg(_: &mut impl Buf, _: &()) -> Result<Self, Error> {
        Ok(())
    }
}

impl FixedSize for () {
    const SIZE: usize = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode, EncodeSize};
    use bytes::Bytes;
    use paste::paste;

    macro_rules! impl_num_test {
        ($type:ty, $size:expr) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let expected_len = std::mem::size_of::<$type>();
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let encoded = value.encode();
                        assert_eq!(encoded.len(), expected_len);
                        assert_eq!(&encoded[..], &value.to_le_bytes()[..]);
                        let decoded = <$type>::decode(encoded).unwrap();
                        assert_eq!(*value, decoded);
                        assert_eq!(value.encode_size(), expected_len);
                        assert_eq!(<$type as FixedSize>::SIZE, $size);
                    }
                }
            }
        };
    }
    impl_num_test!(u8, 1);
    impl_num_test!(u16, 2);
    impl_num_test!(u32, 4);
    impl_num_test!(u64, 8);
    impl_num_test!(u128, 16);
    impl_num_test!(i8, 1);
    impl_num_test!(i16, 2);
    impl_num_test!(i32, 4);
    impl_num_test!(i64, 8);
    impl_num_test!(i128, 16);

    #[test]
    fn test_little_endian() {
        assert_eq!(&0x01020304u32.encode()[..], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&(-1234i16).encode()[..], &[0x2e, 0xfb]);
        assert_eq!(&(-1234i32).encode()[..], &[0x2e, 0xfb, 0xff, 0xff]);
        assert_eq!(i16::decode(&[0x2e, 0xfb][..]).unwrap(), -1234);
        assert_eq!(i32::decode(&[0x2e, 0xfb, 0xff, 0xff][..]).unwrap(), -1234);
    }

    #[test]
    fn test_bool() {
        for value in [true, false] {
            let encoded = value.encode();
            assert_eq!(encoded.len(), 1);
            assert_eq!(bool::decode(encoded).unwrap(), value);
        }
        assert!(matches!(
            bool::decode(Bytes::from_static(&[2])),
            Err(Error::InvalidBool(2))
        ));
    }

    #[test]
    fn test_unit() {
        assert!(().encode().is_empty());
        <()>::decode(Bytes::new()).unwrap();
        assert!(matches!(
            <()>::decode(Bytes::from_static(&[0])),
            Err(Error::ExtraData(1))
        ));
    }
}
