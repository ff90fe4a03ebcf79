//! Integration tests for the metadata cache
//!
//! # Test Coverage
//!
//! - Reference-stable descriptors across repeated lookups and builds
//! - Concurrent first use of a never-seen type
//! - Descriptor contents: order, nullability, defaults, element types
//! - Clear and named lookup
//! - Name collisions and element annotations resolved on use

mod common;

use brrtdto::{
    BuildError, CasterRegistry, MetadataCache, ObjectBuilder, ObjectRef, TypeTag, Value,
};
use common::*;
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_same_arc_on_repeated_lookup() {
    let cache = MetadataCache::new();
    assert!(cache.is_empty());

    let first = cache.parameters_of(&ObjectRef::of::<Point>());
    let second = cache.parameters_of(&ObjectRef::of::<Point>());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_rebuilding_reuses_descriptors() {
    let builder = ObjectBuilder::new(CasterRegistry::with_defaults());
    let _: Point = builder.build(input(json!({"x": 1, "y": 2}))).unwrap();
    let first = builder.cache().parameters_of(&ObjectRef::of::<Point>());
    let _: Point = builder.build(input(json!({"x": 3, "y": 4}))).unwrap();
    let second = builder.cache().parameters_of(&ObjectRef::of::<Point>());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_first_use_is_consistent() {
    let cache = Arc::new(MetadataCache::new());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.parameters_of(&ObjectRef::of::<Shipment>())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for other in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], other));
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_concurrent_builds_share_one_builder() {
    let builder = Arc::new(ObjectBuilder::new(CasterRegistry::with_defaults()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let builder = Arc::clone(&builder);
            thread::spawn(move || {
                let container: Container = builder
                    .build(input(json!({"items": [{"sku": format!("S{i}"), "qty": i}]})))
                    .unwrap();
                container.items[0].qty
            })
        })
        .collect();
    let mut qtys: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    qtys.sort_unstable();
    assert_eq!(qtys, vec![0, 1, 2, 3]);
}

#[test]
fn test_descriptor_contents() {
    let cache = MetadataCache::new();
    let meta = cache.parameters_of(&ObjectRef::of::<Shipment>());

    let names: Vec<&str> = meta.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["order", "items", "priorities", "limit"]);

    let items = meta.parameter("items").unwrap();
    assert_eq!(items.declared_type(), &TypeTag::List);
    assert!(items.is_nullable());
    assert_eq!(
        items.element_type(),
        Some(&brrtdto::dto::object_tag::<LineItem>())
    );

    let limit = meta.parameter("limit").unwrap();
    assert!(limit.has_default());
    assert_eq!(limit.default_value(), Some(&Value::Int(20)));
    assert_eq!(limit.owner(), "Shipment");

    let order = meta.parameter("order").unwrap();
    assert!(!order.is_nullable());
    assert!(order.element_type().is_none());
}

#[test]
fn test_renamed_and_overridden_parameters() {
    let cache = MetadataCache::new();
    let order = cache.parameters_of(&ObjectRef::of::<Order>());
    assert!(order.parameter("createdAt").is_some());
    assert!(order.parameter("created_at").is_none());

    let labelled = cache.parameters_of(&ObjectRef::of::<Labelled>());
    let label = labelled.parameter("label").unwrap();
    assert_eq!(label.explicit_caster(), Some("shout"));
    assert_eq!(label.default_value(), Some(&Value::from("quiet")));
}

#[test]
fn test_no_constructor_has_no_parameters() {
    let cache = MetadataCache::new();
    let meta = cache.parameters_of(&ObjectRef::of::<Opaque>());
    assert!(meta.parameters().is_empty());
    assert!(!meta.has_constructor());
    assert!(matches!(
        meta.ensure_constructible(),
        Err(BuildError::NoConstructor { .. })
    ));

    let meta = cache.parameters_of(&ObjectRef::of::<Shape2d>());
    assert!(meta.is_abstract());
    assert!(matches!(
        meta.instantiate(vec![]),
        Err(BuildError::TypeNotConstructible { .. })
    ));
}

#[test]
fn test_catalog_learns_mentioned_types() {
    let cache = MetadataCache::new();
    assert!(cache.lookup("LineItem").is_none());
    cache.parameters_of(&ObjectRef::of::<Shipment>());

    assert!(matches!(cache.lookup("Order"), Some(TypeTag::Object(_))));
    assert!(matches!(cache.lookup("\\App\\Dto\\LineItem"), Some(TypeTag::Object(_))));
    assert!(matches!(cache.lookup("Priority"), Some(TypeTag::Enum(_))));
    assert_eq!(cache.lookup("integer"), Some(TypeTag::Int));
    assert_eq!(cache.lookup("DateTimeImmutable"), Some(TypeTag::DateTime));
}

#[test]
fn test_first_registration_of_a_name_wins() {
    #[derive(Debug, Clone, brrtdto::Dto)]
    #[dto(name = "Point")]
    struct OtherPoint {
        label: String,
    }

    let cache = MetadataCache::new();
    assert!(cache.register::<Point>());
    assert!(cache.register::<Point>());
    assert!(!cache.register::<OtherPoint>());
    assert_eq!(cache.lookup("Point"), Some(brrtdto::dto::object_tag::<Point>()));

    // Describing the impostor does not take the name over either.
    let meta = cache.parameters_of(&ObjectRef::of::<OtherPoint>());
    assert_eq!(meta.name(), "Point");
    assert_eq!(cache.lookup("Point"), Some(brrtdto::dto::object_tag::<Point>()));
}

#[test]
fn test_element_shape_is_described() {
    let cache = MetadataCache::new();
    let grid = cache.parameters_of(&ObjectRef::of::<Grid>());
    let rows = grid.parameter("rows").unwrap().element().unwrap();
    assert_eq!(rows.tag(), &TypeTag::List);
    assert_eq!(rows.element().map(|e| *e.tag()), Some(TypeTag::Int));

    let ids = cache.parameters_of(&ObjectRef::of::<Ids>());
    let id = ids.parameter("ids").unwrap().element().unwrap();
    assert_eq!(id.tag(), &TypeTag::Uuid);
    assert!(id.is_nullable());
}

#[test]
fn test_unknown_annotation_stays_pending() {
    let cache = MetadataCache::new();
    let basket = cache.parameters_of(&ObjectRef::of::<Basket>());
    let items = basket.parameter("items").unwrap();
    assert_eq!(items.element_annotation(), Some("LineItem"));
    assert!(items.element_type().is_none());
    assert!(matches!(
        cache.resolve_element(items),
        Err(BuildError::TypeNotConstructible { .. })
    ));

    cache.register::<LineItem>();
    let resolved = cache.resolve_element(items).unwrap();
    assert_eq!(
        resolved.element_type(),
        Some(&brrtdto::dto::object_tag::<LineItem>())
    );
    assert!(resolved.element_annotation().is_none());
}

#[test]
fn test_parameters_of_named() {
    let cache = MetadataCache::new();
    assert!(cache.register::<Point>());
    assert!(!cache.register::<String>());

    let meta = cache.parameters_of_named("Point").unwrap();
    assert_eq!(meta.name(), "Point");

    let err = cache.parameters_of_named("Priority").unwrap_err();
    assert!(matches!(err, BuildError::TypeNotConstructible { .. }));
}

#[test]
fn test_clear_forgets_entries_keeps_catalog() {
    let cache = MetadataCache::new();
    let before = cache.parameters_of(&ObjectRef::of::<Point>());
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.lookup("Point").is_some());

    let after = cache.parameters_of(&ObjectRef::of::<Point>());
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.parameters(), after.parameters());
}
