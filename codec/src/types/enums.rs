//! Codec implementations for tagged unions.
//!
//! A single discriminant byte selects the variant and is followed by the variant's payload, if
//! it has one. `Option<T>` uses `0` for `None` and `1` for `Some`; `Result<T, E>` uses `0` for
//! `Ok` and `1` for `Err`. [OptionBool] packs an optional boolean into the discriminant alone.
//!
//! Hand-written sum types can follow the same layout with [read_discriminant] and
//! [unknown_discriminant]:
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use scale_codec::{
//!     types::enums::{read_discriminant, unknown_discriminant},
//!     EncodeSize, Error, Read, ReadExt, Write,
//! };
//!
//! enum Shape {
//!     Dot,
//!     Square(u32),
//! }
//!
//! impl Write for Shape {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         match self {
//!             Shape::Dot => buf.put_u8(0),
//!             Shape::Square(side) => {
//!                 buf.put_u8(1);
//!                 side.write(buf);
//!             }
//!         }
//!     }
//! }
//!
//! impl EncodeSize for Shape {
//!     fn encode_size(&self) -> usize {
//!         match self {
//!             Shape::Dot => 1,
//!             Shape::Square(side) => 1 + side.encode_size(),
//!         }
//!     }
//! }
//!
//! impl Read for Shape {
//!     type Cfg = ();
//!
//!     fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
//!         match read_discriminant(buf)? {
//!             0 => Ok(Shape::Dot),
//!             1 => Ok(Shape::Square(u32::read(buf)?)),
//!             other => Err(unknown_discriminant("Shape", other)),
//!         }
//!     }
//! }
//! ```

use crate::{trace, util::at_least, EncodeSize, Error, FixedSize, Read, Write};
use bytes::{Buf, BufMut};

/// Reads a variant discriminant.
#[inline]
pub fn read_discriminant(buf: &mut impl Buf) -> Result<u8, Error> {
    at_least(buf, 1)?;
    Ok(buf.get_u8())
}

/// Builds the error for a discriminant with no registered variant.
pub fn unknown_discriminant(context: impl Into<String>, discriminant: u8) -> Error {
    Error::UnknownDiscriminant {
        context: context.into(),
        discriminant,
    }
}

// Option implementation
impl<T: Write> Write for Option<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            None => buf.put_u8(0),
            Some(inner) => {
                buf.put_u8(1);
                inner.write(buf);
            }
        }
    }
}

impl<T: EncodeSize> EncodeSize for Option<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        1 + self.as_ref().map_or(0, EncodeSize::encode_size)
    }
}

impl<T: Read> Read for Option<T> {
    type Cfg = T::Cfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        match read_discriminant(buf)? {
            0 => Ok(None),
            1 => trace::decode("Some", buf, |buf| T::read_cfg(buf, cfg)).map(Some),
            other => Err(unknown_discriminant("Option", other)),
        }
    }
}

// Result implementation
impl<T: Write, E: Write> Write for Result<T, E> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Ok(value) => {
                buf.put_u8(0);
                value.write(buf);
            }
            Err(err) => {
                buf.put_u8(1);
                err.write(buf);
            }
        }
    }
}

impl<T: EncodeSize, E: EncodeSize> EncodeSize for Result<T, E> {
    #[inline]
    fn encode_size(&self) -> usize {
        1 + match self {
            Ok(value) => value.encode_size(),
            Err(err) => err.encode_size(),
        }
    }
}

impl<T: Read, E: Read> Read for Result<T, E> {
    type Cfg = (T::Cfg, E::Cfg);

    #[inline]
    fn read_cfg(buf: &mut impl Buf, (ok_cfg, err_cfg): &Self::Cfg) -> Result<Self, Error> {
        match read_discriminant(buf)? {
            0 => trace::decode("Ok", buf, |buf| T::read_cfg(buf, ok_cfg)).map(Ok),
            1 => trace::decode("Err", buf, |buf| E::read_cfg(buf, err_cfg)).map(Err),
            other => Err(unknown_discriminant("Result", other)),
        }
    }
}

/// An optional boolean packed into one byte: `0` is `None`, `1` is `Some(true)` and `2` is
/// `Some(false)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionBool(pub Option<bool>);

impl From<Option<bool>> for OptionBool {
    fn from(value: Option<bool>) -> Self {
        Self(value)
    }
}

impl From<OptionBool> for Option<bool> {
    fn from(value: OptionBool) -> Self {
        value.0
    }
}

impl Write for OptionBool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(match self.0 {
            None => 0,
            Some(true) => 1,
            Some(false) => 2,
        });
    }
}

impl Read for OptionBool {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        match read_discriminant(buf)? {
            0 => Ok(Self(None)),
            1 => Ok(Self(Some(true))),
            2 => Ok(Self(Some(false))),
            other => Err(unknown_discriminant("OptionBool", other)),
        }
    }
}

impl FixedSize for OptionBool {
    const SIZE: usize = 1;
}
