//! Wire-format conformance of the static codecs.

use bytes::{Buf, BufMut};
use scale_codec::{
    types::enums::{read_discriminant, unknown_discriminant},
    Compact, DecodeExt, Encode, EncodeSize, Error, Read, ReadExt, Write,
};
use std::collections::{BTreeMap, BTreeSet};
use test_case::test_case;

#[derive(Clone, Debug, PartialEq)]
enum Sample {
    One,
    Two((u64, bool, (String, i32))),
}

impl Write for Sample {
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Sample::One => buf.put_u8(0),
            Sample::Two(payload) => {
                buf.put_u8(1);
                payload.write(buf);
            }
        }
    }
}

impl EncodeSize for Sample {
    fn encode_size(&self) -> usize {
        1 + match self {
            Sample::One => 0,
            Sample::Two(payload) => payload.encode_size(),
        }
    }
}

impl Read for Sample {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        match read_discriminant(buf)? {
            0 => Ok(Sample::One),
            1 => Ok(Sample::Two(ReadExt::read(buf)?)),
            other => Err(unknown_discriminant("Sample", other)),
        }
    }
}

#[test_case(63, 1; "largest single byte")]
#[test_case(64, 2; "smallest two byte")]
#[test_case(16383, 2; "largest two byte")]
#[test_case(16384, 4; "smallest four byte")]
#[test_case((1 << 30) - 1, 4; "largest four byte")]
#[test_case(1 << 30, 5; "smallest big integer")]
fn test_compact_boundaries(value: u64, len: usize) {
    let encoded = Compact(value).encode();
    assert_eq!(encoded.len(), len);
    assert_eq!(Compact::<u64>::decode(encoded).unwrap(), Compact(value));
}

#[test]
fn test_vector_ignores_trailing_noise() {
    let mut input = vec![1u16, 2, 3].encode().to_vec();
    input.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let (items, consumed) = Vec::<u16>::decode_prefix(&input).unwrap();
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(consumed, 7);
    assert!(matches!(
        Vec::<u16>::decode(&input[..]),
        Err(Error::ExtraData(4))
    ));
}

#[test]
fn test_twos_complement() {
    let short = (-1234i16).encode();
    assert_eq!(&short[..], &[0x2e, 0xfb]);
    assert_eq!(i16::decode(short).unwrap(), -1234);

    let long = (-1234i32).encode();
    assert_eq!(&long[..], &[0x2e, 0xfb, 0xff, 0xff]);
    assert_eq!(i32::decode(long).unwrap(), -1234);

    assert_eq!(&(-1i8).encode()[..], &[0xff]);
    assert_eq!(i128::decode((i128::MIN).encode()).unwrap(), i128::MIN);
}

#[test]
fn test_enum_discriminants() {
    let one = Sample::One;
    assert_eq!(&one.encode()[..], &[0x00]);
    assert_eq!(Sample::decode(one.encode()).unwrap(), one);

    let two = Sample::Two((7, true, ("hi".into(), -1)));
    let encoded = two.encode();
    assert_eq!(
        &encoded[..],
        &[
            0x01, // variant
            0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // u64
            0x01, // bool
            0x08, b'h', b'i', // string
            0xff, 0xff, 0xff, 0xff, // i32
        ]
    );
    assert_eq!(Sample::decode(encoded).unwrap(), two);

    assert!(matches!(
        Sample::decode(&[0x02][..]),
        Err(Error::UnknownDiscriminant { discriminant: 2, .. })
    ));
}

#[test]
fn test_cyrillic_string() {
    let text = String::from("Привет, мир!");
    let encoded = text.encode();
    assert_eq!(text.len(), 21);
    assert_eq!(encoded[0], 21 << 2);
    assert_eq!(&encoded[1..], text.as_bytes());
    assert_eq!(String::decode(encoded).unwrap(), text);
}

#[test]
fn test_empty_collections() {
    assert_eq!(&Vec::<u64>::new().encode()[..], &[0x00]);
    assert_eq!(&BTreeMap::<String, u8>::new().encode()[..], &[0x00]);
    assert_eq!(&BTreeSet::<u32>::new().encode()[..], &[0x00]);
    assert_eq!(&String::new().encode()[..], &[0x00]);
}

#[test]
fn test_nested_containers() {
    let value: (Option<Vec<bool>>, Result<u8, String>, [u16; 2]) =
        (Some(vec![true, false]), Err("x".into()), [1, 0x0102]);
    let encoded = value.encode();
    assert_eq!(
        &encoded[..],
        &[0x01, 0x08, 0x01, 0x00, 0x01, 0x04, b'x', 0x01, 0x00, 0x02, 0x01]
    );
    assert_eq!(
        <(Option<Vec<bool>>, Result<u8, String>, [u16; 2])>::decode(encoded).unwrap(),
        value
    );
}
