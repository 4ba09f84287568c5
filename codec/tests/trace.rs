//! Failure paths reported by the decode tracer.

use scale_codec::{
    dynamic::{Field, Registry, Shape, Variant},
    trace::{Collector, CollectorConfig, Mount, TraceResult},
    DecodeExt, Error, IntKind,
};
use std::collections::BTreeMap;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn traced_path(err: &Error) -> &str {
    match err {
        Error::Traced { path, .. } => path,
        other => panic!("expected a traced error, got {other:?}"),
    }
}

fn tree_registry() -> (Registry, scale_codec::dynamic::CodecId) {
    let mut registry = Registry::new();
    let byte = registry.add(Shape::Int(IntKind::U8)).unwrap();
    let tree = registry.reserve("Tree");
    let children = registry.add(Shape::Vec(tree)).unwrap();
    registry
        .define(
            tree,
            Shape::Struct(vec![Field::new("value", byte), Field::new("children", children)]),
        )
        .unwrap();
    (registry, tree)
}

#[test]
fn test_untraced_errors_are_plain() {
    let err = Vec::<u16>::decode(&[0x08, 0x01][..]).unwrap_err();
    assert!(matches!(err, Error::InsufficientBytes { .. }));
}

#[test]
fn test_static_option_in_vec() {
    init_logging();
    let collector = Collector::default();
    let _guard = Mount::new(collector.clone());

    let err = Vec::<Option<u16>>::decode(&[0x08, 0x00, 0x01, 0x05][..]).unwrap_err();
    assert_eq!(traced_path(&err), "Vec<Option<u16>> / [1] / Some");
    assert!(matches!(
        err.root_cause(),
        Error::InsufficientBytes {
            needed: 2,
            remaining: 1
        }
    ));
    assert!(err.to_string().ends_with("(at Vec<Option<u16>> / [1] / Some)"));
}

#[test]
fn test_static_map_value() {
    init_logging();
    let collector = Collector::default();
    let _guard = Mount::new(collector.clone());

    // One entry whose string value claims three bytes but carries one.
    let err = BTreeMap::<u8, String>::decode(&[0x04, 0x07, 0x0c, b'a'][..]).unwrap_err();
    assert!(traced_path(&err).ends_with(" / [0] / value"), "{err}");
}

#[test]
fn test_dynamic_recursive_path() {
    init_logging();
    let (registry, tree) = tree_registry();
    let collector = Collector::default();
    let _guard = Mount::new(collector.clone());

    // The root declares two children; the second one is cut off.
    let err = registry.decode(tree, &[0x01, 0x08, 0x02, 0x00]).unwrap_err();
    assert_eq!(
        traced_path(&err),
        "Tree / children: Vec<Tree> / [1]: Tree / value: u8"
    );

    let trace = collector.last_trace().unwrap();
    assert_eq!(trace.locations, vec!["Tree"]);
    assert_eq!(trace.children[0].locations, vec!["value", "u8"]);
    assert_eq!(
        trace.children[0].result,
        Some(TraceResult::Decoded(Some("Uint(1)".into())))
    );
    let chain = trace.failure_chain();
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[2].start, 4);
}

#[test]
fn test_dynamic_variant_path() {
    init_logging();
    let mut registry = Registry::new();
    let u64_ = registry.add(Shape::Int(IntKind::U64)).unwrap();
    let i32_ = registry.add(Shape::Int(IntKind::I32)).unwrap();
    let bool_ = registry.add(Shape::Bool).unwrap();
    let str_ = registry.add(Shape::Str).unwrap();
    let inner = registry.add(Shape::Tuple(vec![str_, i32_])).unwrap();
    let payload = registry.add(Shape::Tuple(vec![u64_, bool_, inner])).unwrap();
    let sample = registry
        .register(
            "Sample",
            Shape::Enum(vec![Variant::empty("One", 0), Variant::valuable("Two", 1, payload)]),
        )
        .unwrap();

    let collector = Collector::default();
    let _guard = Mount::new(collector.clone());

    let mut input = vec![0x01];
    input.extend_from_slice(&7u64.to_le_bytes());
    input.extend_from_slice(&[0x01, 0x08, b'h']);
    let err = registry.decode(sample, &input).unwrap_err();
    assert_eq!(
        traced_path(&err),
        "Sample / Two: (u64, bool, (str, i32)) / [2]: (str, i32) / [0]: str"
    );

    let err = registry.decode(sample, &[0x09]).unwrap_err();
    assert_eq!(traced_path(&err), "Sample");
    assert!(matches!(
        err.root_cause(),
        Error::UnknownDiscriminant { discriminant: 9, .. }
    ));
}

#[test]
fn test_successful_decode_rendering() {
    init_logging();
    let (registry, tree) = tree_registry();
    let collector = Collector::new(CollectorConfig {
        log_successes: true,
        bytes_print_limit: 4,
        ..Default::default()
    });
    let _guard = Mount::new(collector.clone());

    registry.decode(tree, &[0x01, 0x04, 0x02, 0x00]).unwrap();
    let rendered = collector.render_last().unwrap();
    assert!(rendered.starts_with("Tree\n"), "{rendered}");
    assert!(
        rendered.contains("Tree / children: Vec<Tree> / [0]: Tree / value: u8\n"),
        "{rendered}"
    );
    assert!(rendered.contains("Result: Ok(Uint(2))"), "{rendered}");
    assert!(!collector.last_trace().unwrap().is_failed());
}
