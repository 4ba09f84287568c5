//! Schema-driven encoding of dynamic values.
//!
//! When the types being encoded are only known at runtime, their layouts are described as
//! [Shape]s in a [Registry] and values are carried as [Value]s. The wire format is identical to
//! the one produced by the static [crate::Write] and [crate::Read] implementations, so the two
//! layers interoperate.
//!
//! # Example
//!
//! ```
//! use scale_codec::dynamic::{Registry, Shape, Value, Variant};
//! use scale_codec::{int::IntKind, Encode};
//!
//! let mut registry = Registry::new();
//! let number = registry.add(Shape::Int(IntKind::U64)).unwrap();
//! let choice = registry
//!     .register("Choice", Shape::Enum(vec![Variant::empty("One", 0), Variant::valuable("Two", 1, number)]))
//!     .unwrap();
//!
//! let two = Value::valuable("Two", Value::from(7u64));
//! let bytes = registry.encode(choice, &two).unwrap();
//! assert_eq!(&bytes[..], &Some(7u64).encode()[..]);
//! assert_eq!(registry.decode(choice, &bytes).unwrap(), two);
//! ```

mod registry;
mod value;

pub use registry::{
    CodecId, Describe, Field, Handle, Registry, Shape, Variant, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_LEN,
};
pub use value::{EnumValue, Value};
