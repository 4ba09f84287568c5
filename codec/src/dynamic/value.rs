//! Dynamic values.

use crate::Error;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A decoded (or to-be-encoded) value whose structure is given by a [super::Shape].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Unit,
    Bool(bool),
    /// An unsigned integer, or a non-negative value for a signed shape.
    Uint(u128),
    /// A signed integer. Decoding a signed shape always produces this variant.
    Int(i128),
    Str(String),
    Bytes(Bytes),
    /// Items of an array, vector or set shape.
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    /// Struct fields by name. The wire order comes from the shape, not from this map.
    Struct(BTreeMap<String, Value>),
    /// Map entries in the order they are written.
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    Enum(EnumValue),
    /// Bytes produced by an earlier encode of this shape, written verbatim.
    Encoded(Bytes),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "seq",
            Value::Tuple(_) => "tuple",
            Value::Struct(_) => "struct",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Enum(_) => "enum",
            Value::Encoded(_) => "encoded",
        }
    }

    /// Builds a struct value from `(name, value)` pairs.
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        Value::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// An empty enum variant.
    pub fn variant(tag: impl Into<String>) -> Self {
        Value::Enum(EnumValue::empty(tag))
    }

    /// An enum variant carrying `content`.
    pub fn valuable(tag: impl Into<String>, content: Value) -> Self {
        Value::Enum(EnumValue::valuable(tag, content))
    }

    pub fn none() -> Self {
        Self::variant("None")
    }

    pub fn some(content: Value) -> Self {
        Self::valuable("Some", content)
    }

    pub fn ok(content: Value) -> Self {
        Self::valuable("Ok", content)
    }

    pub fn err(content: Value) -> Self {
        Self::valuable("Err", content)
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(value) => Some(value),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Uint: u8, u16, u32, u64, u128);
impl_from!(Int: i8, i16, i32, i64, i128);
impl_from!(Str: String, &str);
impl_from!(Bytes: Bytes);
impl_from!(Seq: Vec<Value>);

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

/// A variant of a tagged union.
///
/// `content` is present exactly when the variant carries a payload. Encoding checks this
/// against the shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub tag: String,
    pub content: Option<Box<Value>>,
}

impl EnumValue {
    pub fn empty(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            content: None,
        }
    }

    pub fn valuable(tag: impl Into<String>, content: Value) -> Self {
        Self {
            tag: tag.into(),
            content: Some(Box::new(content)),
        }
    }

    /// Returns true if this is the variant named `tag`.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Returns the payload of the variant named `tag`.
    ///
    /// Fails with [Error::VariantMismatch] if this is another variant or carries no payload.
    pub fn as_valuable(&self, tag: &str) -> Result<&Value, Error> {
        match &self.content {
            Some(content) if self.is(tag) => Ok(content),
            _ => Err(Error::VariantMismatch {
                expected: format!("{tag} with content"),
                found: self.describe(),
            }),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self.content {
            Some(_) => format!("{} with content", self.tag),
            None => format!("empty {}", self.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_helpers() {
        let two = EnumValue::valuable("Two", Value::from(5u8));
        assert!(two.is("Two"));
        assert!(!two.is("One"));
        assert_eq!(two.as_valuable("Two").unwrap(), &Value::Uint(5));

        let err = two.as_valuable("Three").unwrap_err();
        assert_eq!(
            err.to_string(),
            "variant mismatch: expected Three with content, found Two with content"
        );

        let one = EnumValue::empty("One");
        assert!(matches!(
            one.as_valuable("One"),
            Err(Error::VariantMismatch { ref found, .. }) if found == "empty One"
        ));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Value::none(), Value::Enum(EnumValue::empty("None")));
        assert_eq!(
            Value::some(Value::Bool(true)).as_enum().unwrap().tag,
            "Some"
        );
        assert_eq!(Value::from(-3i16), Value::Int(-3));
        assert_eq!(Value::from("hi"), Value::Str("hi".into()));

        let record = Value::record([("b", Value::Unit), ("a", Value::from(1u8))]);
        let Value::Struct(fields) = record else {
            panic!("expected struct");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
