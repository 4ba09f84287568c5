#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use scale_codec::{
    compact,
    dynamic::{Field, Registry, Shape, Value},
    Compact, Decode, DecodeExt, Encode, EncodeSize, Error, IntKind, OptionBool, RangeCfg, Read,
};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt::Debug,
};

fn roundtrip<T>(value: T)
where
    T: Encode + Decode + PartialEq + Debug,
    T::Cfg: Default,
{
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let decoded = T::decode(encoded).expect("Failed to decode a successfully encoded input!");
    assert_eq!(value, decoded);
}

fn roundtrip_compact(value: u128) {
    let encoded = Compact(value).encode();
    assert_eq!(encoded.len(), compact::size(value));
    let decoded = Compact::<u128>::decode(encoded.clone()).expect("Failed to decode compact!");
    assert_eq!(decoded.0, value);

    // Narrower targets either agree or report overflow.
    match Compact::<u32>::decode(encoded) {
        Ok(narrow) => assert_eq!(u128::from(narrow.0), value),
        Err(err) => assert!(matches!(err, Error::CompactOverflow { .. })),
    }
}

fn roundtrip_vec<T>(vec: Vec<T>)
where
    T: Encode + Read<Cfg = ()> + PartialEq + Debug,
{
    let len = vec.len();
    let encoded = vec.encode();
    assert_eq!(encoded.len(), vec.encode_size());

    // Decode with too short a limit
    assert!(matches!(
        Vec::<T>::decode_cfg(encoded.clone(), &(RangeCfg::new(0..len), ())),
        Err(Error::InvalidLength(_))
    ));

    let decoded = Vec::<T>::decode_cfg(encoded, &(RangeCfg::exact(len), ()))
        .expect("Failed to decode Vec<T>!");
    assert_eq!(vec, decoded);
}

fn roundtrip_string(text: String) {
    let encoded = text.encode();
    let (len, _) = <Compact<u64>>::decode_prefix(&encoded).expect("Failed to decode prefix!");
    assert_eq!(len.0 as usize, text.len());
    let decoded = String::decode_cfg(encoded, &RangeCfg::exact(text.len()))
        .expect("Failed to decode String!");
    assert_eq!(text, decoded);
}

fn roundtrip_hash_map(map: HashMap<u64, u32>) {
    let ordered: BTreeMap<u64, u32> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(map.encode(), ordered.encode());
    roundtrip(map);
}

fn roundtrip_hash_set(set: HashSet<u16>) {
    let ordered: BTreeSet<u16> = set.iter().copied().collect();
    assert_eq!(set.encode(), ordered.encode());
    roundtrip(set);
}

/// Untrusted input must fail cleanly, never panic.
fn decode_untrusted(input: &[u8]) {
    let _ = Vec::<Option<u16>>::decode(input);
    let _ = BTreeMap::<String, Vec<u8>>::decode(input);
    let _ = <(Compact<u64>, Result<bool, String>, [u32; 2])>::decode(input);
    let _ = Compact::<u128>::decode(input);
    let _ = OptionBool::decode(input);

    let mut registry = Registry::with_max_depth(32);
    let byte = registry.add(Shape::Int(IntKind::U8)).expect("Failed to add shape!");
    let tree = registry.reserve("Tree");
    let children = registry.add(Shape::Vec(tree)).expect("Failed to add shape!");
    if registry
        .define(
            tree,
            Shape::Struct(vec![Field::new("value", byte), Field::new("children", children)]),
        )
        .is_err()
    {
        return;
    }
    if let Ok(value) = registry.decode(tree, input) {
        // Whatever decodes must encode back to the same bytes.
        let encoded = registry.encode(tree, &value).expect("Failed to re-encode value!");
        assert_eq!(&encoded[..], input);
    }
}

fn roundtrip_dynamic(value: i64, flag: Option<bool>, text: String) {
    let mut registry = Registry::new();
    let int = registry.add(Shape::Int(IntKind::I64)).expect("Failed to add shape!");
    let option = registry.add(Shape::OptionBool).expect("Failed to add shape!");
    let string = registry.add(Shape::Str).expect("Failed to add shape!");
    let record = registry
        .add(Shape::Tuple(vec![int, option, string]))
        .expect("Failed to add shape!");

    let flag_value = match flag {
        None => Value::none(),
        Some(flag) => Value::some(Value::Bool(flag)),
    };
    let dynamic = Value::Tuple(vec![Value::from(value), flag_value, Value::from(text.clone())]);
    let encoded = registry
        .encode(record, &dynamic)
        .expect("Failed to encode dynamic value!");
    assert_eq!(encoded, (value, OptionBool(flag), text).encode().freeze());
    let decoded = registry
        .decode(record, &encoded)
        .expect("Failed to decode dynamic value!");
    assert_eq!(decoded, dynamic);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Untrusted(&'a [u8]),
    Bytes(&'a [u8]),
    Compact(u128),
    String(String),

    // Collections
    Vec(Vec<u32>),
    NestedVec(Vec<Vec<u8>>),
    Map(HashMap<u64, u32>),
    Set(HashSet<u16>),
    BTreeMap(BTreeMap<u32, Vec<bool>>),

    // Tagged unions
    Option(Option<u64>),
    Result(Result<u16, String>),
    OptionBool(Option<bool>),

    // Tuples and arrays
    Tuple(u8, i16, (u128, bool)),
    Array([i32; 4]),

    Dynamic(i64, Option<bool>, String),

    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Untrusted(it) => decode_untrusted(it),
        FuzzInput::Bytes(it) => roundtrip(Bytes::from(it.to_vec())),
        FuzzInput::Compact(v) => roundtrip_compact(v),
        FuzzInput::String(it) => roundtrip_string(it),
        // Collections
        FuzzInput::Vec(it) => roundtrip_vec(it),
        FuzzInput::NestedVec(it) => roundtrip(it),
        FuzzInput::Map(it) => roundtrip_hash_map(it),
        FuzzInput::Set(it) => roundtrip_hash_set(it),
        FuzzInput::BTreeMap(it) => roundtrip(it),
        // Tagged unions
        FuzzInput::Option(it) => roundtrip(it),
        FuzzInput::Result(it) => roundtrip(it),
        FuzzInput::OptionBool(it) => roundtrip(OptionBool(it)),
        // Tuples and arrays
        FuzzInput::Tuple(a, b, c) => roundtrip((a, b, c)),
        FuzzInput::Array(it) => roundtrip(it),
        FuzzInput::Dynamic(value, flag, text) => roundtrip_dynamic(value, flag, text),
        // Primitives
        FuzzInput::Bool(v) => roundtrip(v),
        FuzzInput::U8(v) => roundtrip(v),
        FuzzInput::U16(v) => roundtrip(v),
        FuzzInput::U32(v) => roundtrip(v),
        FuzzInput::U64(v) => roundtrip(v),
        FuzzInput::U128(v) => roundtrip(v),
        FuzzInput::I8(v) => roundtrip(v),
        FuzzInput::I16(v) => roundtrip(v),
        FuzzInput::I32(v) => roundtrip(v),
        FuzzInput::I64(v) => roundtrip(v),
        FuzzInput::I128(v) => roundtrip(v),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
