//! Error types for codec operations

use crate::int::IntKind;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("insufficient bytes: needed {needed}, remaining {remaining}")]
    InsufficientBytes { needed: usize, remaining: usize },
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid compact prefix {prefix:#04x}: {reason}")]
    InvalidCompactPrefix { prefix: u8, reason: &'static str },
    #[error("compact value {value} does not fit in {target}")]
    CompactOverflow { value: u128, target: &'static str },
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("invalid bool: {0:#04x}")]
    InvalidBool(u8),
    #[error("invalid utf-8 string")]
    InvalidUtf8,
    #[error("unknown discriminant {discriminant} for {context}")]
    UnknownDiscriminant { context: String, discriminant: u8 },
    #[error("variant mismatch: expected {expected}, found {found}")]
    VariantMismatch { expected: String, found: String },
    #[error("encoder wrote {written} bytes, size hint promised {expected}")]
    EncodeSizeMismatch { expected: usize, written: usize },
    #[error("integer {value} out of range for {kind}")]
    IntOutOfRange { value: String, kind: IntKind },
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: &'static str },
    #[error("unresolved codec: {0}")]
    UnresolvedCodec(String),
    #[error("decode depth exceeded limit of {0}")]
    DepthExceeded(usize),
    #[error("invalid data in {0}: {1}")]
    Invalid(&'static str, &'static str), // context, message
    #[error("{source} (at {path})")]
    Traced { path: String, source: Box<Error> },
}

impl Error {
    /// Returns the underlying error, looking through any [`Error::Traced`] annotation.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Traced { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
