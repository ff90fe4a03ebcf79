//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use brrtdto::{
    Args, BackedEnum, BuildResult, CastContext, Caster, ConstructResult, Dto, Map, ParamSpec,
    Shape, TypeDescriptor, TypeTag, Value,
};
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

pub const ORDER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Route builder logs to the test writer. Set `RUST_LOG=brrtdto=debug` to see
/// per-parameter decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, BackedEnum)]
pub enum Status {
    #[dto(value = "active")]
    Active,
    #[dto(value = "inactive")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, BackedEnum)]
pub enum Priority {
    #[dto(value = 1)]
    Low,
    #[dto(value = 2)]
    High,
}

/// No backing values: never castable.
#[derive(Debug, Clone, Copy, PartialEq, BackedEnum)]
pub enum Color {
    Red,
    Green,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Order {
    pub id: Uuid,
    #[dto(rename = "createdAt")]
    pub created_at: DateTime<FixedOffset>,
    pub status: Status,
    #[dto(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct LineItem {
    pub sku: String,
    pub qty: i64,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Container {
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Thing {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Shipment {
    pub order: Order,
    pub items: Option<Vec<LineItem>>,
    pub priorities: Vec<Priority>,
    #[dto(default = 20)]
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Labelled {
    #[dto(caster = "shout", default = String::from("quiet"))]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Tree {
    pub name: String,
    #[dto(default)]
    pub children: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Ids {
    pub ids: Vec<Option<Uuid>>,
}

#[derive(Debug, Clone, PartialEq, Dto)]
pub struct Grid {
    pub rows: Vec<Vec<i64>>,
}

/// String backings that look like numbers.
#[derive(Debug, Clone, Copy, PartialEq, BackedEnum)]
pub enum Code {
    #[dto(value = "10")]
    Ten,
    #[dto(value = "20")]
    Twenty,
}

/// Element type known only from the type-level annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub items: Vec<LineItem>,
}

impl Dto for Basket {
    const NAME: &'static str = "Basket";
    const DOC: Option<&'static str> = Some(
        "A basket.\n\
         @param array<int, LineItem> $items the goods\n\
         @param string $owner unused",
    );

    fn shape() -> Shape {
        Shape::constructor(vec![ParamSpec::new("items", TypeTag::List)])
    }

    fn construct(args: &mut Args) -> ConstructResult<Self> {
        Ok(Basket { items: args.next()? })
    }
}

/// Declares no constructor at all.
#[derive(Debug, Clone)]
pub struct Opaque;

impl Dto for Opaque {
    const NAME: &'static str = "Opaque";

    fn shape() -> Shape {
        Shape::NoConstructor
    }

    fn construct(_args: &mut Args) -> ConstructResult<Self> {
        Ok(Opaque)
    }
}

#[derive(Debug, Clone)]
pub struct Shape2d;

impl Dto for Shape2d {
    const NAME: &'static str = "Shape2d";
    const ABSTRACT: bool = true;

    fn shape() -> Shape {
        Shape::constructor(vec![])
    }

    fn construct(_args: &mut Args) -> ConstructResult<Self> {
        Ok(Shape2d)
    }
}

/// Rejects non-finite or negative radii.
#[derive(Debug, Clone)]
pub struct Circle {
    pub radius: f64,
}

impl Dto for Circle {
    const NAME: &'static str = "Circle";

    fn shape() -> Shape {
        Shape::constructor(vec![ParamSpec::of::<f64>("radius")])
    }

    fn construct(args: &mut Args) -> ConstructResult<Self> {
        let radius: f64 = args.next()?;
        if radius < 0.0 {
            anyhow::bail!("radius must not be negative");
        }
        if radius > 1e9 {
            panic!("radius overflow");
        }
        Ok(Circle { radius })
    }
}

/// Upper-cases strings; referenced by explicit overrides.
#[derive(Debug, Default)]
pub struct ShoutCaster;

impl Caster for ShoutCaster {
    fn id(&self) -> &str {
        "shout"
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::String)
    }

    fn cast(&self, value: Value, _descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        Ok(match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        })
    }
}

/// Returns a fixed marker string for whatever it is asked to cast.
#[derive(Debug)]
pub struct MarkerCaster(pub &'static str);

impl Caster for MarkerCaster {
    fn id(&self) -> &str {
        self.0
    }

    fn supports(&self, _descriptor: &TypeDescriptor) -> bool {
        true
    }

    fn cast(&self, _value: Value, _descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        Ok(Value::from(self.0))
    }
}

/// Build an input map from a JSON object literal.
pub fn input(json: serde_json::Value) -> Map {
    match Value::from(json) {
        Value::Map(map) => map,
        other => panic!("fixture input must be a JSON object, got {other}"),
    }
}
