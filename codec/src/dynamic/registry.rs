//! Codec arena and the schema-driven encoder/decoder.

use super::value::{EnumValue, Value};
use crate::{
    compact,
    int::IntKind,
    trace::{self, Index},
    types::enums::{read_discriminant, unknown_discriminant, OptionBool},
    util::at_least,
    walker, EncodeSize, Error, RangeCfg, Read, ReadExt, Write,
};
use bytes::{Buf, BufMut, Bytes};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

/// Default bound on nested codecs during encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default bound on the item count of a decoded sequence, set or map.
pub const DEFAULT_MAX_LEN: usize = 1 << 20;

/// Index of a codec in a [Registry].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodecId(usize);

impl CodecId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A named struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub codec: CodecId,
}

impl Field {
    pub fn new(name: impl Into<String>, codec: CodecId) -> Self {
        Self {
            name: name.into(),
            codec,
        }
    }
}

/// A variant of an enum shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variant {
    pub tag: String,
    pub discriminant: u8,
    /// Codec of the payload, for valuable variants.
    pub payload: Option<CodecId>,
}

impl Variant {
    pub fn empty(tag: impl Into<String>, discriminant: u8) -> Self {
        Self {
            tag: tag.into(),
            discriminant,
            payload: None,
        }
    }

    pub fn valuable(tag: impl Into<String>, discriminant: u8, payload: CodecId) -> Self {
        Self {
            tag: tag.into(),
            discriminant,
            payload: Some(payload),
        }
    }
}

/// The wire layout of a codec. Nested codecs are referenced by [CodecId].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Zero bytes.
    Unit,
    Bool,
    /// Fixed-width little-endian integer.
    Int(IntKind),
    /// Compact unsigned integer.
    Compact,
    /// Compact byte length followed by UTF-8.
    Str,
    /// Compact byte length followed by raw bytes.
    Bytes,
    /// Exactly `n` raw bytes.
    ByteArray(usize),
    /// Exactly `len` items, no prefix.
    Array { item: CodecId, len: usize },
    /// Compact item count followed by the items.
    Vec(CodecId),
    Tuple(Vec<CodecId>),
    /// Fields in declaration order.
    Struct(Vec<Field>),
    /// Compact entry count followed by alternating keys and values.
    Map { key: CodecId, value: CodecId },
    /// Compact item count followed by the items.
    Set(CodecId),
    /// Discriminant byte followed by the payload of valuable variants.
    Enum(Vec<Variant>),
    /// `None` = 0, `Some` = 1.
    Option(CodecId),
    /// `Ok` = 0, `Err` = 1.
    Result { ok: CodecId, err: CodecId },
    /// `None` = 0, `Some(true)` = 1, `Some(false)` = 2.
    OptionBool,
    /// Same layout as another codec.
    Alias(CodecId),
}

struct Entry {
    name: Option<String>,
    shape: Option<Shape>,
}

/// Arena of codecs.
///
/// Codecs refer to each other by [CodecId], so a codec can be reserved under a name before its
/// shape is known and bound later with [Registry::define]. This is how recursive schemas are
/// built.
///
/// # Example
///
/// ```
/// use scale_codec::dynamic::{Field, Registry, Shape, Value};
/// use scale_codec::int::IntKind;
///
/// let mut registry = Registry::new();
/// let tree = registry.reserve("Tree");
/// let byte = registry.add(Shape::Int(IntKind::U8)).unwrap();
/// let children = registry.add(Shape::Vec(tree)).unwrap();
/// registry
///     .define(tree, Shape::Struct(vec![Field::new("value", byte), Field::new("children", children)]))
///     .unwrap();
///
/// let leaf = Value::record([("value", Value::from(2u8)), ("children", Value::Seq(vec![]))]);
/// let root = Value::record([("value", Value::from(1u8)), ("children", Value::Seq(vec![leaf]))]);
/// let bytes = registry.encode(tree, &root).unwrap();
/// assert_eq!(&bytes[..], &[1, 4, 2, 0]);
/// assert_eq!(registry.decode(tree, &bytes).unwrap(), root);
/// ```
pub struct Registry {
    entries: Vec<Entry>,
    names: HashMap<String, CodecId>,
    max_depth: usize,
    max_len: RangeCfg<usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// An enum-like arm, shared by [Shape::Enum], [Shape::Option] and [Shape::Result].
struct Arm<'a> {
    tag: &'a str,
    discriminant: u8,
    payload: Option<CodecId>,
}

fn arms(shape: &Shape) -> Option<Vec<Arm<'_>>> {
    let arm = |tag, discriminant, payload| Arm {
        tag,
        discriminant,
        payload,
    };
    match shape {
        Shape::Enum(variants) => Some(
            variants
                .iter()
                .map(|variant| arm(&variant.tag, variant.discriminant, variant.payload))
                .collect(),
        ),
        Shape::Option(item) => Some(vec![arm("None", 0, None), arm("Some", 1, Some(*item))]),
        Shape::Result { ok, err } => {
            Some(vec![arm("Ok", 0, Some(*ok)), arm("Err", 1, Some(*err))])
        }
        _ => None,
    }
}

/// Rejects enums with ambiguous variants and structs with repeated field names.
fn validate(shape: &Shape) -> Result<(), Error> {
    match shape {
        Shape::Enum(variants) => {
            let mut discriminants = HashSet::new();
            let mut tags = HashSet::new();
            for variant in variants {
                if !discriminants.insert(variant.discriminant) {
                    return Err(Error::Invalid("Registry", "duplicate discriminant"));
                }
                if !tags.insert(variant.tag.as_str()) {
                    return Err(Error::Invalid("Registry", "duplicate tag"));
                }
            }
        }
        Shape::Struct(fields) => {
            let mut names = HashSet::new();
            if !fields.iter().all(|field| names.insert(field.name.as_str())) {
                return Err(Error::Invalid("Registry", "duplicate field"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// An integer checked against its kind.
enum Checked {
    Unsigned(u128),
    Signed(i128),
}

fn out_of_range(value: impl ToString, kind: IntKind) -> Error {
    Error::IntOutOfRange {
        value: value.to_string(),
        kind,
    }
}

fn check_int(kind: IntKind, value: &Value) -> Result<Option<Checked>, Error> {
    let checked = match (value, kind.signed) {
        (&Value::Uint(n), false) => {
            kind.check_unsigned(n)?;
            Checked::Unsigned(n)
        }
        (&Value::Uint(n), true) => {
            let n = i128::try_from(n).map_err(|_| out_of_range(n, kind))?;
            kind.check_signed(n)?;
            Checked::Signed(n)
        }
        (&Value::Int(n), true) => {
            kind.check_signed(n)?;
            Checked::Signed(n)
        }
        (&Value::Int(n), false) => {
            let n = u128::try_from(n).map_err(|_| out_of_range(n, kind))?;
            kind.check_unsigned(n)?;
            Checked::Unsigned(n)
        }
        _ => return Ok(None),
    };
    Ok(Some(checked))
}

/// Compact values follow the rule of unsigned integers: any non-negative integer fits.
fn check_compact(value: &Value) -> Result<Option<u128>, Error> {
    match *value {
        Value::Uint(n) => Ok(Some(n)),
        Value::Int(n) => u128::try_from(n)
            .map(Some)
            .map_err(|_| out_of_range(n, IntKind::U128)),
        _ => Ok(None),
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a registry that refuses to nest codecs deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            names: HashMap::new(),
            max_depth,
            max_len: RangeCfg::new(..=DEFAULT_MAX_LEN),
        }
    }

    /// Refuses to decode sequences, sets and maps of more than `max_len` items.
    ///
    /// Items of zero width consume no input, so this is the only bound on their count.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = RangeCfg::new(..=max_len);
        self
    }

    /// Returns the id registered under `name`, reserving a new one if there is none.
    pub fn reserve(&mut self, name: impl Into<String>) -> CodecId {
        let name = name.into();
        if let Some(id) = self.names.get(&name) {
            return *id;
        }
        let id = CodecId(self.entries.len());
        self.entries.push(Entry {
            name: Some(name.clone()),
            shape: None,
        });
        self.names.insert(name, id);
        id
    }

    /// Binds the shape of a reserved codec.
    pub fn define(&mut self, id: CodecId, shape: Shape) -> Result<(), Error> {
        validate(&shape)?;
        let entry = self
            .entries
            .get_mut(id.0)
            .ok_or_else(|| Error::UnresolvedCodec(format!("#{}", id.0)))?;
        if entry.shape.is_some() {
            return Err(Error::Invalid("Registry", "codec already defined"));
        }
        entry.shape = Some(shape);
        Ok(())
    }

    /// Registers a named codec.
    pub fn register(&mut self, name: impl Into<String>, shape: Shape) -> Result<CodecId, Error> {
        let id = self.reserve(name);
        self.define(id, shape)?;
        Ok(id)
    }

    /// Adds an anonymous codec.
    pub fn add(&mut self, shape: Shape) -> Result<CodecId, Error> {
        validate(&shape)?;
        let id = CodecId(self.entries.len());
        self.entries.push(Entry {
            name: None,
            shape: Some(shape),
        });
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<CodecId> {
        self.names.get(name).copied()
    }

    pub fn name(&self, id: CodecId) -> Option<&str> {
        self.entries.get(id.0)?.name.as_deref()
    }

    /// Returns the shape of `id`, failing if it has not been defined.
    pub fn shape(&self, id: CodecId) -> Result<&Shape, Error> {
        self.entries
            .get(id.0)
            .and_then(|entry| entry.shape.as_ref())
            .ok_or_else(|| Error::UnresolvedCodec(self.describe(id).to_string()))
    }

    /// Human-readable name of a codec: its registered name, or a description of its shape.
    pub fn describe(&self, id: CodecId) -> Describe<'_> {
        Describe {
            registry: self,
            id,
            depth: 0,
        }
    }

    /// Returns a handle bundling this registry with `id`.
    pub fn handle(&self, id: CodecId) -> Handle<'_> {
        Handle { registry: self, id }
    }

    /// Checks `value` against the codec and returns its encoded size.
    pub fn encode_size(&self, id: CodecId, value: &Value) -> Result<usize, Error> {
        self.size_at(id, value, 0)
    }

    /// Writes `value`. The value is validated as it is written; call [Registry::encode_size]
    /// first to avoid partial output on invalid values.
    pub fn write(&self, id: CodecId, value: &Value, buf: &mut impl BufMut) -> Result<(), Error> {
        self.write_at(id, value, buf, 0)
    }

    /// Encodes `value` into a buffer preallocated from [Registry::encode_size].
    pub fn encode(&self, id: CodecId, value: &Value) -> Result<Bytes, Error> {
        walker::encode_with(
            value,
            |value| self.encode_size(id, value),
            |value, buf| self.write(id, value, buf),
        )
    }

    /// Decodes a value, requiring all of `bytes` to be consumed.
    pub fn decode(&self, id: CodecId, bytes: &[u8]) -> Result<Value, Error> {
        walker::decode_with(bytes, |walker| self.read(id, walker))
    }

    /// Decodes a value from the start of `bytes`, returning it with the number of bytes consumed.
    pub fn decode_prefix(&self, id: CodecId, bytes: &[u8]) -> Result<(Value, usize), Error> {
        walker::decode_prefix_with(bytes, |walker| self.read(id, walker))
    }

    /// Reads a value from `buf`.
    pub fn read(&self, id: CodecId, buf: &mut impl Buf) -> Result<Value, Error> {
        self.read_at(id, buf, 0)
    }

    fn enter(&self, depth: usize) -> Result<usize, Error> {
        if depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        Ok(depth + 1)
    }

    fn mismatch(&self, id: CodecId, value: &Value) -> Error {
        Error::ShapeMismatch {
            expected: self.describe(id).to_string(),
            found: value.kind(),
        }
    }

    /// Finds the arm `value` selects and checks its payload.
    fn select<'s, 'v>(
        &self,
        id: CodecId,
        arms: &[Arm<'s>],
        value: &'v EnumValue,
    ) -> Result<(u8, Option<(CodecId, &'v Value)>), Error> {
        let arm = arms
            .iter()
            .find(|arm| value.is(arm.tag))
            .ok_or_else(|| Error::VariantMismatch {
                expected: format!("a variant of {}", self.describe(id)),
                found: value.tag.clone(),
            })?;
        match (arm.payload, value.content.as_deref()) {
            (Some(payload), Some(content)) => Ok((arm.discriminant, Some((payload, content)))),
            (None, None) => Ok((arm.discriminant, None)),
            (Some(_), None) => Err(Error::VariantMismatch {
                expected: format!("{} with content", arm.tag),
                found: value.describe(),
            }),
            (None, Some(_)) => Err(Error::VariantMismatch {
                expected: format!("empty {}", arm.tag),
                found: value.describe(),
            }),
        }
    }

    fn option_bool(&self, id: CodecId, value: &Value) -> Result<OptionBool, Error> {
        let Value::Enum(inner) = value else {
            return Err(self.mismatch(id, value));
        };
        match (inner.tag.as_str(), inner.content.as_deref()) {
            ("None", None) => Ok(OptionBool(None)),
            ("Some", Some(Value::Bool(flag))) => Ok(OptionBool(Some(*flag))),
            _ => Err(Error::VariantMismatch {
                expected: "None or Some with a bool".to_string(),
                found: inner.describe(),
            }),
        }
    }

    fn size_seq(&self, item: CodecId, items: &[Value], depth: usize) -> Result<usize, Error> {
        items
            .iter()
            .map(|value| self.size_at(item, value, depth))
            .sum()
    }

    fn size_at(&self, id: CodecId, value: &Value, depth: usize) -> Result<usize, Error> {
        if let Value::Encoded(bytes) = value {
            return Ok(bytes.len());
        }
        let depth = self.enter(depth)?;
        let shape = self.shape(id)?;

        if let Some(arms) = arms(shape) {
            let Value::Enum(inner) = value else {
                return Err(self.mismatch(id, value));
            };
            let (_, payload) = self.select(id, &arms, inner)?;
            return Ok(1 + match payload {
                Some((payload, content)) => self.size_at(payload, content, depth)?,
                None => 0,
            });
        }

        let size = match (shape, value) {
            (Shape::Unit, Value::Unit) => 0,
            (Shape::Bool, Value::Bool(_)) => 1,
            (Shape::Int(kind), value) => {
                check_int(*kind, value)?.ok_or_else(|| self.mismatch(id, value))?;
                kind.size()
            }
            (Shape::Compact, value) => {
                compact::size(check_compact(value)?.ok_or_else(|| self.mismatch(id, value))?)
            }
            (Shape::Str, Value::Str(s)) => s.encode_size(),
            (Shape::Bytes, Value::Bytes(bytes)) => bytes.encode_size(),
            (Shape::ByteArray(len), Value::Bytes(bytes)) => {
                if bytes.len() != *len {
                    return Err(Error::InvalidLength(bytes.len()));
                }
                *len
            }
            (Shape::Array { item, len }, Value::Seq(items)) => {
                if items.len() != *len {
                    return Err(Error::InvalidLength(items.len()));
                }
                self.size_seq(*item, items, depth)?
            }
            (Shape::Vec(item), Value::Seq(items)) | (Shape::Set(item), Value::Set(items)) => {
                compact::len_size(items.len()) + self.size_seq(*item, items, depth)?
            }
            (Shape::Tuple(ids), Value::Tuple(items)) => {
                if ids.len() != items.len() {
                    return Err(Error::InvalidLength(items.len()));
                }
                let mut size = 0;
                for (id, item) in ids.iter().zip(items) {
                    size += self.size_at(*id, item, depth)?;
                }
                size
            }
            (Shape::Struct(fields), Value::Struct(values)) => {
                let mut size = 0;
                for field in fields {
                    let value = values.get(&field.name).ok_or_else(|| missing(field))?;
                    size += self.size_at(field.codec, value, depth)?;
                }
                if values.len() != fields.len() {
                    return Err(Error::Invalid("struct", "unknown field"));
                }
                size
            }
            (Shape::Map { key, value: val }, Value::Map(entries)) => {
                let mut size = compact::len_size(entries.len());
                for (k, v) in entries {
                    size += self.size_at(*key, k, depth)?;
                    size += self.size_at(*val, v, depth)?;
                }
                size
            }
            (Shape::OptionBool, value) => {
                self.option_bool(id, value)?;
                1
            }
            (Shape::Alias(target), value) => self.size_at(*target, value, depth)?,
            (_, value) => return Err(self.mismatch(id, value)),
        };
        Ok(size)
    }

    fn write_at(
        &self,
        id: CodecId,
        value: &Value,
        buf: &mut impl BufMut,
        depth: usize,
    ) -> Result<(), Error> {
        if let Value::Encoded(bytes) = value {
            buf.put_slice(bytes);
            return Ok(());
        }
        let depth = self.enter(depth)?;
        let shape = self.shape(id)?;

        if let Some(arms) = arms(shape) {
            let Value::Enum(inner) = value else {
                return Err(self.mismatch(id, value));
            };
            let (discriminant, payload) = self.select(id, &arms, inner)?;
            buf.put_u8(discriminant);
            if let Some((payload, content)) = payload {
                self.write_at(payload, content, buf, depth)?;
            }
            return Ok(());
        }

        match (shape, value) {
            (Shape::Unit, Value::Unit) => {}
            (Shape::Bool, Value::Bool(flag)) => flag.write(buf),
            (Shape::Int(kind), value) => {
                match check_int(*kind, value)?.ok_or_else(|| self.mismatch(id, value))? {
                    Checked::Unsigned(n) => kind.write_unsigned(n, buf),
                    Checked::Signed(n) => kind.write_signed(n, buf),
                }
            }
            (Shape::Compact, value) => {
                compact::write(check_compact(value)?.ok_or_else(|| self.mismatch(id, value))?, buf)
            }
            (Shape::Str, Value::Str(s)) => s.write(buf),
            (Shape::Bytes, Value::Bytes(bytes)) => bytes.write(buf),
            (Shape::ByteArray(len), Value::Bytes(bytes)) => {
                if bytes.len() != *len {
                    return Err(Error::InvalidLength(bytes.len()));
                }
                buf.put_slice(bytes);
            }
            (Shape::Array { item, len }, Value::Seq(items)) => {
                if items.len() != *len {
                    return Err(Error::InvalidLength(items.len()));
                }
                for value in items {
                    self.write_at(*item, value, buf, depth)?;
                }
            }
            (Shape::Vec(item), Value::Seq(items)) | (Shape::Set(item), Value::Set(items)) => {
                compact::write_len(items.len(), buf);
                for value in items {
                    self.write_at(*item, value, buf, depth)?;
                }
            }
            (Shape::Tuple(ids), Value::Tuple(items)) => {
                if ids.len() != items.len() {
                    return Err(Error::InvalidLength(items.len()));
                }
                for (id, item) in ids.iter().zip(items) {
                    self.write_at(*id, item, buf, depth)?;
                }
            }
            (Shape::Struct(fields), Value::Struct(values)) => {
                if values.len() != fields.len() {
                    return Err(Error::Invalid("struct", "unknown field"));
                }
                for field in fields {
                    let value = values.get(&field.name).ok_or_else(|| missing(field))?;
                    self.write_at(field.codec, value, buf, depth)?;
                }
            }
            (Shape::Map { key, value: val }, Value::Map(entries)) => {
                compact::write_len(entries.len(), buf);
                for (k, v) in entries {
                    self.write_at(*key, k, buf, depth)?;
                    self.write_at(*val, v, buf, depth)?;
                }
            }
            (Shape::OptionBool, value) => self.option_bool(id, value)?.write(buf),
            (Shape::Alias(target), value) => self.write_at(*target, value, buf, depth)?,
            (_, value) => return Err(self.mismatch(id, value)),
        }
        Ok(())
    }

    fn read_at(&self, id: CodecId, buf: &mut impl Buf, depth: usize) -> Result<Value, Error> {
        let depth = self.enter(depth)?;
        let shape = self.shape(id)?;
        trace::decode_inspect(self.describe(id), buf, |buf| {
            self.read_shape(id, shape, buf, depth)
        })
    }

    fn read_items(
        &self,
        item: CodecId,
        len: usize,
        buf: &mut impl Buf,
        depth: usize,
    ) -> Result<Vec<Value>, Error> {
        let mut items = Vec::with_capacity(len.min(buf.remaining()));
        for i in 0..len {
            items.push(trace::refine(Index(i), || self.read_at(item, buf, depth))?);
        }
        Ok(items)
    }

    fn read_shape(
        &self,
        id: CodecId,
        shape: &Shape,
        buf: &mut impl Buf,
        depth: usize,
    ) -> Result<Value, Error> {
        if let Some(arms) = arms(shape) {
            let discriminant = read_discriminant(buf)?;
            let arm = arms
                .iter()
                .find(|arm| arm.discriminant == discriminant)
                .ok_or_else(|| unknown_discriminant(self.describe(id).to_string(), discriminant))?;
            let content = match arm.payload {
                Some(payload) => Some(Box::new(trace::refine(arm.tag, || {
                    self.read_at(payload, buf, depth)
                })?)),
                None => None,
            };
            return Ok(Value::Enum(EnumValue {
                tag: arm.tag.to_string(),
                content,
            }));
        }

        let value = match shape {
            Shape::Unit => Value::Unit,
            Shape::Bool => Value::Bool(bool::read(buf)?),
            Shape::Int(kind) if kind.signed => Value::Int(kind.read_signed(buf)?),
            Shape::Int(kind) => Value::Uint(kind.read_unsigned(buf)?),
            Shape::Compact => Value::Uint(compact::read(buf)?),
            // Byte lengths are bounded by the input itself.
            Shape::Str => Value::Str(String::read_cfg(buf, &RangeCfg::full())?),
            Shape::Bytes => Value::Bytes(Bytes::read_cfg(buf, &RangeCfg::full())?),
            Shape::ByteArray(len) => {
                at_least(buf, *len)?;
                Value::Bytes(buf.copy_to_bytes(*len))
            }
            Shape::Array { item, len } => Value::Seq(self.read_items(*item, *len, buf, depth)?),
            Shape::Vec(item) => {
                let len = compact::read_len(buf, &self.max_len)?;
                Value::Seq(self.read_items(*item, len, buf, depth)?)
            }
            Shape::Set(item) => {
                let len = compact::read_len(buf, &self.max_len)?;
                Value::Set(self.read_items(*item, len, buf, depth)?)
            }
            Shape::Tuple(ids) => {
                let mut items = Vec::with_capacity(ids.len());
                for (i, id) in ids.iter().enumerate() {
                    items.push(trace::refine(Index(i), || self.read_at(*id, buf, depth))?);
                }
                Value::Tuple(items)
            }
            Shape::Struct(fields) => {
                let mut values = BTreeMap::new();
                for field in fields {
                    let value =
                        trace::refine(&field.name, || self.read_at(field.codec, buf, depth))?;
                    values.insert(field.name.clone(), value);
                }
                Value::Struct(values)
            }
            Shape::Map { key, value } => {
                let len = compact::read_len(buf, &self.max_len)?;
                let mut entries = Vec::with_capacity(len.min(buf.remaining()));
                for i in 0..len {
                    let k = trace::refine(format_args!("[{i}] key"), || {
                        self.read_at(*key, buf, depth)
                    })?;
                    let v = trace::refine(format_args!("[{i}] value"), || {
                        self.read_at(*value, buf, depth)
                    })?;
                    entries.push((k, v));
                }
                Value::Map(entries)
            }
            Shape::OptionBool => match OptionBool::read(buf)?.0 {
                None => Value::none(),
                Some(flag) => Value::some(Value::Bool(flag)),
            },
            Shape::Alias(target) => self.read_at(*target, buf, depth)?,
            Shape::Enum(_) | Shape::Option(_) | Shape::Result { .. } => {
                unreachable!("enum-like shapes are handled above")
            }
        };
        Ok(value)
    }
}

fn missing(field: &Field) -> Error {
    Error::ShapeMismatch {
        expected: format!("field {}", field.name),
        found: "nothing",
    }
}

/// Displays a codec by name, or by shape when it is anonymous.
pub struct Describe<'a> {
    registry: &'a Registry,
    id: CodecId,
    depth: usize,
}

impl Describe<'_> {
    fn nested(&self, id: CodecId) -> Self {
        Describe {
            registry: self.registry,
            id,
            depth: self.depth + 1,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, ids: impl Iterator<Item = CodecId>) -> fmt::Result {
        for (i, id) in ids.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.nested(id))?;
        }
        Ok(())
    }
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(entry) = self.registry.entries.get(self.id.0) else {
            return write!(f, "#{}", self.id.0);
        };
        if let Some(name) = &entry.name {
            return f.write_str(name);
        }
        if self.depth > 4 {
            return f.write_str("..");
        }
        let Some(shape) = &entry.shape else {
            return write!(f, "#{}", self.id.0);
        };
        match shape {
            Shape::Unit => f.write_str("()"),
            Shape::Bool => f.write_str("bool"),
            Shape::Int(kind) => write!(f, "{kind}"),
            Shape::Compact => f.write_str("Compact"),
            Shape::Str => f.write_str("str"),
            Shape::Bytes => f.write_str("Bytes"),
            Shape::ByteArray(len) => write!(f, "[u8; {len}]"),
            Shape::Array { item, len } => write!(f, "[{}; {len}]", self.nested(*item)),
            Shape::Vec(item) => write!(f, "Vec<{}>", self.nested(*item)),
            Shape::Set(item) => write!(f, "Set<{}>", self.nested(*item)),
            Shape::Tuple(ids) => {
                f.write_str("(")?;
                self.list(f, ids.iter().copied())?;
                f.write_str(")")
            }
            Shape::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, self.nested(field.codec))?;
                }
                f.write_str(" }")
            }
            Shape::Map { key, value } => {
                write!(f, "Map<{}, {}>", self.nested(*key), self.nested(*value))
            }
            Shape::Enum(variants) => {
                f.write_str("enum { ")?;
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&variant.tag)?;
                }
                f.write_str(" }")
            }
            Shape::Option(item) => write!(f, "Option<{}>", self.nested(*item)),
            Shape::Result { ok, err } => {
                write!(f, "Result<{}, {}>", self.nested(*ok), self.nested(*err))
            }
            Shape::OptionBool => f.write_str("OptionBool"),
            Shape::Alias(target) => write!(f, "{}", self.nested(*target)),
        }
    }
}

/// A codec bound to the registry that defines it.
#[derive(Clone, Copy)]
pub struct Handle<'a> {
    registry: &'a Registry,
    id: CodecId,
}

impl Handle<'_> {
    pub fn id(&self) -> CodecId {
        self.id
    }

    pub fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.registry.encode_size(self.id, value)
    }

    pub fn encode(&self, value: &Value) -> Result<Bytes, Error> {
        self.registry.encode(self.id, value)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        self.registry.decode(self.id, bytes)
    }

    pub fn decode_prefix(&self, bytes: &[u8]) -> Result<(Value, usize), Error> {
        self.registry.decode_prefix(self.id, bytes)
    }
}
