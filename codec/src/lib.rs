//! Encode and decode structured data in the SCALE binary format.
//!
//! # Overview
//!
//! SCALE is a compact, non-self-describing format: the reader must know the layout it expects.
//! This crate provides:
//! - Static codecs for Rust types via the [Write], [EncodeSize] and [Read] traits
//! - [Compact] integers, the variable-length encoding used for lengths and large counts
//! - A [dynamic] layer that encodes [dynamic::Value]s against schemas registered at runtime
//! - A [trace] layer that records where in the input a decode failed
//!
//! # Supported Types
//!
//! Natively supports:
//! - Primitives: `u8` through `u128`, `i8` through `i128`, `bool` and `()`
//! - Strings and byte blobs: `String`, `str` and [bytes::Bytes]
//! - Collections: `Vec<T>`, `[T]`, `[T; N]`, tuples up to twelve elements, `BTreeMap`,
//!   `HashMap`, `BTreeSet` and `HashSet`
//! - Tagged unions: `Option<T>`, `Result<T, E>` and [OptionBool]
//!
//! Decoding untrusted input is bounded by a per-type configuration ([Read::Cfg]). Collection
//! lengths are checked against a [RangeCfg] before anything is allocated.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use scale_codec::{Decode, Encode, EncodeSize, Error, RangeCfg, Read, ReadExt, Write};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Item {
//!     id: u64,
//!     name: String,
//!     tags: Vec<u16>,
//! }
//!
//! impl Write for Item {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         self.id.write(buf);
//!         self.name.write(buf);
//!         self.tags.write(buf);
//!     }
//! }
//!
//! impl EncodeSize for Item {
//!     fn encode_size(&self) -> usize {
//!         self.id.encode_size() + self.name.encode_size() + self.tags.encode_size()
//!     }
//! }
//!
//! impl Read for Item {
//!     // Limits on the name length and the number of tags.
//!     type Cfg = (RangeCfg<usize>, RangeCfg<usize>);
//!
//!     fn read_cfg(buf: &mut impl Buf, (name, tags): &Self::Cfg) -> Result<Self, Error> {
//!         let id = u64::read(buf)?;
//!         let name = String::read_cfg(buf, name)?;
//!         let tags = Vec::<u16>::read_cfg(buf, &(tags.clone(), ()))?;
//!         Ok(Self { id, name, tags })
//!     }
//! }
//!
//! let item = Item { id: 1, name: "one".into(), tags: vec![7, 8] };
//! let encoded = item.encode();
//! assert_eq!(encoded.len(), 8 + 4 + 5);
//!
//! let cfg = (RangeCfg::new(..=16), RangeCfg::new(..=4));
//! assert_eq!(Item::decode_cfg(encoded, &cfg).unwrap(), item);
//! ```

mod codec;
pub mod compact;
mod config;
pub mod dynamic;
pub mod encoded;
mod error;
pub mod int;
pub mod trace;
pub mod types;
pub mod util;
pub mod walker;

pub use codec::{
    Codec, Config, Decode, DecodeExt, Encode, EncodeSize, FixedSize, Read, ReadExt, Write,
};
pub use compact::Compact;
pub use config::RangeCfg;
pub use encoded::MaybeEncoded;
pub use error::Error;
pub use int::{IntKind, IntWidth};
pub use types::enums::OptionBool;
pub use walker::{decode_prefix_with, decode_with, encode_with, Walker};
