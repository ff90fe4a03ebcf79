//! Caster behaviour through `ObjectBuilder::cast`: idempotence, null handling
//! and the failure triple.

mod common;

use brrtdto::caster::{
    CollectionCaster, DateTimeCaster, EnumCaster, NestedObjectCaster, ScalarCaster, UuidCaster,
};
use brrtdto::dto::{enum_tag, object_tag};
use brrtdto::{Caster, CasterRegistry, ObjectBuilder, TypeDescriptor, TypeTag, Value};
use common::*;
use serde_json::json;

fn builder() -> ObjectBuilder {
    ObjectBuilder::new(CasterRegistry::with_defaults())
}

fn desc(tag: TypeTag) -> TypeDescriptor {
    TypeDescriptor::new("Probe", "p", tag)
}

fn assert_idempotent(builder: &ObjectBuilder, descriptor: &TypeDescriptor, raw: Value) {
    let once = builder.cast(descriptor, raw).unwrap();
    let twice = builder.cast(descriptor, once.clone()).unwrap();
    assert_eq!(once, twice, "{}", descriptor.declared_type());
}

#[test]
fn test_casting_is_idempotent() {
    let builder = builder();
    let cases = vec![
        (desc(TypeTag::String), Value::Int(7)),
        (desc(TypeTag::Int), Value::from("42")),
        (desc(TypeTag::Int), Value::from("not a number")),
        (desc(TypeTag::Float), Value::from("2.5")),
        (desc(TypeTag::Bool), Value::from("off")),
        (desc(TypeTag::Mixed), Value::from(json!({"a": [1, 2]}))),
        (desc(TypeTag::DateTime), Value::from("2024-11-25T10:00:00+02:00")),
        (desc(TypeTag::DateTime), Value::Int(1_700_000_000)),
        (desc(TypeTag::Uuid), Value::from(ORDER_ID)),
        (desc(enum_tag::<Status>()), Value::from("inactive")),
        (desc(enum_tag::<Priority>()), Value::Int(2)),
        (
            desc(object_tag::<LineItem>()),
            Value::from(json!({"sku": "A1", "qty": "3"})),
        ),
        (
            desc(TypeTag::List).with_element(Some(object_tag::<LineItem>())),
            Value::from(json!([{"sku": "A1", "qty": 1}, {"sku": "B2", "qty": 2}])),
        ),
        (
            desc(TypeTag::List).with_element(Some(TypeTag::Int)),
            Value::from(json!(["1", 2, "3.0"])),
        ),
    ];
    for (descriptor, raw) in cases {
        assert_idempotent(&builder, &descriptor, raw);
    }
}

#[test]
fn test_nested_instance_passes_through_unchanged() {
    let builder = builder();
    let descriptor = desc(object_tag::<LineItem>());
    let built = builder
        .cast(&descriptor, Value::from(json!({"sku": "A1", "qty": 1})))
        .unwrap();
    let Value::Object(instance) = &built else {
        panic!("expected an object, got {built}");
    };
    assert_eq!(instance.type_name(), "LineItem");

    // Same allocation, not a rebuilt copy.
    let again = builder.cast(&descriptor, built.clone()).unwrap();
    assert_eq!(again, built);
}

#[test]
fn test_nullable_null_yields_null() {
    let builder = builder();
    for tag in [
        TypeTag::String,
        TypeTag::DateTime,
        TypeTag::Uuid,
        enum_tag::<Status>(),
        object_tag::<LineItem>(),
    ] {
        let descriptor = desc(tag).with_nullable(true);
        assert_eq!(builder.cast(&descriptor, Value::Null).unwrap(), Value::Null);
    }
    let list = desc(TypeTag::List)
        .with_nullable(true)
        .with_element(Some(TypeTag::Int));
    assert_eq!(builder.cast(&list, Value::Null).unwrap(), Value::Null);
}

#[test]
fn test_non_nullable_null_fails_for_typed_casters() {
    let builder = builder();
    for tag in [TypeTag::DateTime, TypeTag::Uuid, enum_tag::<Status>()] {
        let err = builder.cast(&desc(tag), Value::Null).unwrap_err();
        assert_eq!(err.as_cast().map(|c| c.actual.as_str()), Some("null"));
    }
}

#[test]
fn test_scalar_garbage_passes_through() {
    let builder = builder();
    assert_eq!(
        builder.cast(&desc(TypeTag::Int), Value::from("abc")).unwrap(),
        Value::from("abc")
    );
    assert_eq!(
        builder.cast(&desc(TypeTag::Float), Value::from("")).unwrap(),
        Value::from("")
    );
}

#[test]
fn test_enum_backing_forms() {
    let builder = builder();
    let priority = desc(enum_tag::<Priority>());
    let by_int = builder.cast(&priority, Value::Int(1)).unwrap();
    let by_text = builder.cast(&priority, Value::from("1")).unwrap();
    assert_eq!(by_int, by_text);
    assert!(matches!(by_int, Value::Enum(ref e) if e.name == "Low"));

    let err = builder.cast(&priority, Value::Int(9)).unwrap_err();
    let cast = err.as_cast().unwrap();
    assert_eq!(cast.target, "Priority");
    assert_eq!(cast.reason, "no matching member");

    // String-backed enums do not match on member names.
    let err = builder.cast(&desc(enum_tag::<Status>()), Value::from("Active")).unwrap_err();
    assert!(err.as_cast().is_some());
}

#[test]
fn test_numeric_string_backings_accept_integers() {
    let builder = builder();
    let code = desc(enum_tag::<Code>());
    let by_int = builder.cast(&code, Value::Int(20)).unwrap();
    let by_text = builder.cast(&code, Value::from("20")).unwrap();
    assert_eq!(by_int, by_text);
    assert!(matches!(by_int, Value::Enum(ref e) if e.name == "Twenty"));

    let err = builder.cast(&code, Value::Int(30)).unwrap_err();
    assert_eq!(err.as_cast().map(|c| c.reason.as_str()), Some("no matching member"));
}

#[test]
fn test_collection_failure_carries_element_triple() {
    let builder = builder();
    let descriptor = desc(TypeTag::List).with_element(Some(TypeTag::Uuid));
    let err = builder
        .cast(&descriptor, Value::from(json!([ORDER_ID, "nope"])))
        .unwrap_err();
    let cast = err.as_cast().unwrap();
    assert_eq!(cast.target, "Uuid");
    assert_eq!(cast.actual, "string(\"nope\")");
    assert!(!cast.reason.is_empty());
}

#[test]
fn test_supports_is_exact() {
    let list = desc(TypeTag::List).with_element(Some(TypeTag::String));
    let bare_list = desc(TypeTag::List);
    let item = desc(object_tag::<LineItem>());
    let abstract_shape = desc(object_tag::<Shape2d>());
    let unbacked = desc(enum_tag::<Color>());

    assert!(ScalarCaster.supports(&desc(TypeTag::Mixed)));
    assert!(!ScalarCaster.supports(&list));
    assert!(DateTimeCaster.supports(&desc(TypeTag::DateTime)));
    assert!(!DateTimeCaster.supports(&desc(TypeTag::String)));
    assert!(UuidCaster.supports(&desc(TypeTag::Uuid)));
    assert!(EnumCaster.supports(&desc(enum_tag::<Status>())));
    assert!(!EnumCaster.supports(&unbacked));
    assert!(NestedObjectCaster.supports(&item));
    assert!(!NestedObjectCaster.supports(&abstract_shape));
    assert!(CollectionCaster.supports(&list));
    assert!(!CollectionCaster.supports(&bare_list));
}
