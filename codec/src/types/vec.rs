//! Codec implementations for vectors and slices.
//!
//! A compact item count is followed by the items. Decoding stops after the declared number of
//! items, so bytes that follow the vector are left in the buffer.
//!
//! Items that encode to zero bytes, such as `()`, consume no input, so only the [RangeCfg]
//! bounds how many are decoded. Decoding such vectors from untrusted input needs an explicit
//! range; the default accepts any length.

use crate::{
    compact,
    trace::{self, Index},
    EncodeSize, Error, RangeCfg, Read, Write,
};
use bytes::{Buf, BufMut};

impl<T: Write> Write for [T] {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        compact::write_len(self.len(), buf);
        for item in self {
            item.write(buf);
        }
    }
}

impl<T: EncodeSize> EncodeSize for [T] {
    #[inline]
    fn encode_size(&self) -> usize {
        compact::len_size(self.len()) + self.iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.as_slice().write(buf);
    }
}

impl<T: EncodeSize> EncodeSize for Vec<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        self.as_slice().encode_size()
    }
}

impl<T: Read> Read for Vec<T> {
    type Cfg = (RangeCfg<usize>, T::Cfg);

    #[inline]
    fn read_cfg(buf: &mut impl Buf, (range, cfg): &Self::Cfg) -> Result<Self, Error> {
        let len = compact::read_len(buf, range)?;

        // Every item takes at least one byte unless it is zero-sized, so the remaining input
        // bounds the allocation for any well-formed encoding.
        let mut vec = Vec::with_capacity(len.min(buf.remaining()));
        for i in 0..len {
            vec.push(trace::decode(Index(i), buf, |buf| T::read_cfg(buf, cfg))?);
        }
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, DecodeExt, Encode};

    #[test]
    fn test_vec() {
        let vec_values = [vec![], vec![1u8], vec![1u8, 2u8, 3u8]];
        for value in vec_values {
            let encoded = value.encode();
            assert_eq!(encoded.len(), value.len() + 1);

            // Valid decoding
            let len = value.len();
            let decoded = Vec::<u8>::decode_cfg(encoded, &(RangeCfg::exact(len), ())).unwrap();
            assert_eq!(value, decoded);

            // Failure for too long
            assert!(matches!(
                Vec::<u8>::decode_cfg(value.encode(), &((0..len).into(), ())),
                Err(Error::InvalidLength(_))
            ));

            // Failure for too short
            assert!(matches!(
                Vec::<u8>::decode_cfg(value.encode(), &((len + 1..).into(), ())),
                Err(Error::InvalidLength(_))
            ));
        }
    }

    #[test]
    fn test_trailing_noise_is_not_consumed() {
        let value = vec![100u32, 200, 300];
        let mut input = value.encode().to_vec();
        let own_len = input.len();
        input.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let (decoded, consumed) = Vec::<u32>::decode_prefix(&input).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, own_len);

        assert!(matches!(
            Vec::<u32>::decode(&input[..]),
            Err(Error::ExtraData(4))
        ));
    }

    #[test]
    fn test_nested_vec() {
        let value = vec![vec![1u16], vec![], vec![2, 3]];
        let encoded = value.encode();
        assert_eq!(
            &encoded[..],
            &[0x0c, 0x04, 0x01, 0x00, 0x00, 0x08, 0x02, 0x00, 0x03, 0x00]
        );
        assert_eq!(Vec::<Vec<u16>>::decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_slice_matches_vec() {
        let items = [5u8, 6, 7];
        assert_eq!(items[..].encode(), items.to_vec().encode());
    }

    #[test]
    fn test_huge_declared_length() {
        // Declares 2^30 items with no items present.
        let input = [0x03, 0x00, 0x00, 0x00, 0x40];
        assert!(matches!(
            Vec::<u8>::decode(&input[..]),
            Err(Error::InsufficientBytes { .. })
        ));
    }

    #[test]
    fn test_zero_sized_items_bounded_by_range() {
        // Declares 2^24 units in four bytes.
        let input = [0x02, 0x00, 0x00, 0x04];
        assert!(matches!(
            Vec::<()>::decode_cfg(&input[..], &(RangeCfg::new(..=1024), ())),
            Err(Error::InvalidLength(16_777_216))
        ));

        let units = Vec::<()>::decode_cfg(&[0x0c][..], &(RangeCfg::new(..=1024), ())).unwrap();
        assert_eq!(units.len(), 3);
    }
}
