//! Codec implementations for common types

pub mod array;
pub mod enums;
pub mod map;
pub mod primitives;
pub mod string;
pub mod tuple;
pub mod vec;
