//! SCALE compact integers.
//!
//! The two least significant bits of the first byte select the mode:
//!
//! | mode | range                | layout                                              |
//! |------|----------------------|-----------------------------------------------------|
//! | `00` | `0..=63`             | 1 byte, `value << 2`                                |
//! | `01` | `64..=16383`         | 2 bytes LE, `(value << 2) \| 0b01`                  |
//! | `10` | `16384..=2^30 - 1`   | 4 bytes LE, `(value << 2) \| 0b10`                  |
//! | `11` | `2^30..`             | `((n - 4) << 2) \| 0b11`, then `n` value bytes LE   |
//!
//! In mode `11`, `n` is the minimal number of bytes holding the value (at least 4). Values are
//! carried as `u128`, so at most 16 value bytes are accepted.
//!
//! Decoding only accepts the canonical (shortest) encoding of each value.

use crate::{util::at_least, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut};

const MAX_SINGLE: u128 = (1 << 6) - 1;
const MAX_TWO: u128 = (1 << 14) - 1;
const MAX_FOUR: u128 = (1 << 30) - 1;

/// Largest number of value bytes accepted in mode `11`.
pub const MAX_BIG_BYTES: usize = 16;

/// Returns the number of significant little-endian bytes in `value`, at least 4.
fn big_len(value: u128) -> usize {
    let significant = (128 - value.leading_zeros() as usize).div_ceil(8);
    significant.max(4)
}

/// Writes `value` as a compact integer.
pub fn write(value: u128, buf: &mut impl BufMut) {
    if value <= MAX_SINGLE {
        buf.put_u8((value as u8) << 2);
    } else if value <= MAX_TWO {
        buf.put_u16_le(((value as u16) << 2) | 0b01);
    } else if value <= MAX_FOUR {
        buf.put_u32_le(((value as u32) << 2) | 0b10);
    } else {
        let len = big_len(value);
        buf.put_u8((((len - 4) as u8) << 2) | 0b11);
        buf.put_slice(&value.to_le_bytes()[..len]);
    }
}

/// Returns the number of bytes [write] produces for `value`.
pub fn size(value: u128) -> usize {
    if value <= MAX_SINGLE {
        1
    } else if value <= MAX_TWO {
        2
    } else if value <= MAX_FOUR {
        4
    } else {
        1 + big_len(value)
    }
}

/// Reads a compact integer.
pub fn read(buf: &mut impl Buf) -> Result<u128, Error> {
    at_least(buf, 1)?;
    let prefix = buf.get_u8();
    match prefix & 0b11 {
        0b00 => Ok(u128::from(prefix >> 2)),
        0b01 => {
            at_least(buf, 1)?;
            let value = u128::from(u16::from_le_bytes([prefix, buf.get_u8()]) >> 2);
            if value <= MAX_SINGLE {
                return Err(non_canonical(prefix));
            }
            Ok(value)
        }
        0b10 => {
            at_least(buf, 3)?;
            let mut raw = [prefix, 0, 0, 0];
            buf.copy_to_slice(&mut raw[1..]);
            let value = u128::from(u32::from_le_bytes(raw) >> 2);
            if value <= MAX_TWO {
                return Err(non_canonical(prefix));
            }
            Ok(value)
        }
        _ => {
            let len = usize::from(prefix >> 2) + 4;
            if len > MAX_BIG_BYTES {
                return Err(Error::InvalidCompactPrefix {
                    prefix,
                    reason: "value wider than 128 bits",
                });
            }
            at_least(buf, len)?;
            let mut raw = [0u8; 16];
            buf.copy_to_slice(&mut raw[..len]);
            if raw[len - 1] == 0 {
                return Err(non_canonical(prefix));
            }
            let value = u128::from_le_bytes(raw);
            if value <= MAX_FOUR {
                return Err(non_canonical(prefix));
            }
            Ok(value)
        }
    }
}

fn non_canonical(prefix: u8) -> Error {
    Error::InvalidCompactPrefix {
        prefix,
        reason: "non-canonical encoding",
    }
}

/// Writes a collection length prefix.
pub fn write_len(len: usize, buf: &mut impl BufMut) {
    write(len as u128, buf);
}

/// Returns the size of a collection length prefix.
pub fn len_size(len: usize) -> usize {
    size(len as u128)
}

/// Reads a collection length prefix, rejecting lengths outside `range`.
pub fn read_len(buf: &mut impl Buf, range: &RangeCfg<usize>) -> Result<usize, Error> {
    let value = read(buf)?;
    let len = usize::try_from(value).map_err(|_| Error::CompactOverflow {
        value,
        target: "usize",
    })?;
    if !range.contains(&len) {
        return Err(Error::InvalidLength(len));
    }
    Ok(len)
}

/// Unsigned integers that can be carried by [Compact].
pub trait CompactInt: Copy {
    /// Name used in overflow errors.
    const NAME: &'static str;

    fn to_u128(self) -> u128;

    fn from_u128(value: u128) -> Option<Self>;
}

macro_rules! impl_compact_int {
    ($($ty:ty),+) => {
        $(
            impl CompactInt for $ty {
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn to_u128(self) -> u128 {
                    self as u128
                }

                #[inline]
                fn from_u128(value: u128) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )+
    };
}

impl_compact_int!(u8, u16, u32, u64, u128, usize);

/// An unsigned integer encoded in compact form rather than at its fixed width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Compact<T>(pub T);

impl<T: CompactInt> From<T> for Compact<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: CompactInt> Write for Compact<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write(self.0.to_u128(), buf);
    }
}

impl<T: CompactInt> EncodeSize for Compact<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        size(self.0.to_u128())
    }
}

impl<T: CompactInt> Read for Compact<T> {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let value = read(buf)?;
        T::from_u128(value)
            .map(Compact)
            .ok_or(Error::CompactOverflow {
                value,
                target: T::NAME,
            })
    }
}
