//! Request mapping: merged request input, construction, then validation.

mod common;

use brrtdto::input::RequestInput;
use brrtdto::mapper::{MapError, Mapper, NoValidation, ValidationErrors};
use common::*;
use http::StatusCode;
use serde_json::json;

fn shipment_rules(shipment: &Shipment) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if shipment.limit > 100 {
        errors.add("limit", "must be at most 100");
    }
    for (i, item) in shipment.items.iter().flatten().enumerate() {
        if item.qty <= 0 {
            errors.add(format!("items[{i}].qty"), "must be positive");
        }
    }
    errors.into_result()
}

fn order_json() -> serde_json::Value {
    json!({"id": ORDER_ID, "createdAt": "2024-11-25T10:00:00Z", "status": "active"})
}

#[test]
fn test_map_request_merges_sources() {
    let mapper = Mapper::default();
    let request = RequestInput::from_uri("/points?x=1.5&y=9")
        .path_param("x", "0")
        .with_body(json!({"y": 2}));

    let point: Point = mapper.map_request(request, &NoValidation).unwrap();
    assert_eq!(point, Point { x: 1.5, y: 2.0 });
}

#[test]
fn test_build_failure_is_bad_request() {
    let mapper = Mapper::default();
    let err = mapper
        .map::<Thing, _>(input(json!({})), &NoValidation)
        .unwrap_err();
    assert!(matches!(err, MapError::Build(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_json()["error"], "Invalid request data");
    assert!(err.to_json()["message"]
        .as_str()
        .unwrap_or_default()
        .contains("name"));
}

#[test]
fn test_validation_aggregates_every_field() {
    let mapper = Mapper::default();
    let err = mapper
        .map::<Shipment, _>(
            input(json!({
                "order": order_json(),
                "items": [{"sku": "A", "qty": 0}, {"sku": "B", "qty": 1}, {"sku": "C", "qty": -2}],
                "priorities": [],
                "limit": 500
            })),
            &shipment_rules,
        )
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let MapError::Invalid(errors) = &err else {
        panic!("expected validation errors, got {err}");
    };
    let paths: Vec<&str> = errors.iter().map(|(path, _)| path).collect();
    assert_eq!(paths, vec!["items[0].qty", "items[2].qty", "limit"]);
}

#[test]
fn test_construction_runs_before_validation() {
    // A malformed field never reaches the validator.
    let mapper = Mapper::default();
    let err = mapper
        .map::<Shipment, _>(
            input(json!({
                "order": order_json(),
                "items": [],
                "priorities": ["urgent"],
                "limit": 500
            })),
            &shipment_rules,
        )
        .unwrap_err();
    assert!(matches!(err, MapError::Build(_)), "{err}");
}

#[test]
fn test_valid_request_maps() {
    let mapper = Mapper::default();
    let shipment: Shipment = mapper
        .map(
            input(json!({"order": order_json(), "items": [{"sku": "A", "qty": 2}], "priorities": [1]})),
            &shipment_rules,
        )
        .unwrap();
    assert_eq!(shipment.limit, 20);
    assert_eq!(shipment.order.status, Status::Active);
}
