use std::collections::BTreeMap;

use json_contract::{
    CheckedError, Constraint, DeriveConfig, DeriveError, FieldMetadata, JsonSchema, Nullable, Record, Schema,
    TypeMetadata, ValidationConfig, ValidationError, Variants, derive, derive_with, from_value_checked,
    from_value_checked_with, overlay,
};
use serde::Deserialize;
use serde_json::{Value, json};
use test_case::test_case;

#[derive(Debug, PartialEq, Deserialize)]
struct Address {
    street: String,
    zip: Option<String>,
}

impl JsonSchema for Address {
    fn structural_schema() -> Schema {
        Record::new().field::<String>("street").field::<Option<String>>("zip").build()
    }

    fn metadata() -> TypeMetadata {
        TypeMetadata::new()
            .title("Address")
            .field("street", FieldMetadata::of([Constraint::MinLength(1)]))
            .field("zip", Constraint::Pattern("^[0-9]{5}$".into()).into())
    }
}

#[derive(Debug, PartialEq, Deserialize)]
struct Customer {
    name: String,
    #[serde(default)]
    tier: u8,
    email: Nullable<String>,
    address: Address,
    tags: Vec<String>,
    #[serde(default)]
    scores: BTreeMap<String, f64>,
}

impl JsonSchema for Customer {
    fn structural_schema() -> Schema {
        Record::new()
            .field::<String>("name")
            .field_with_default::<u8>("tier", json!(0))
            .field::<Nullable<String>>("email")
            .field::<Address>("address")
            .field::<Vec<String>>("tags")
            .field_with_default::<BTreeMap<String, f64>>("scores", json!({}))
            .build()
    }

    fn metadata() -> TypeMetadata {
        TypeMetadata::new()
            .description("A paying customer")
            .field("name", FieldMetadata::of([Constraint::MinLength(1), Constraint::MaxLength(64)]))
            .field("tier", FieldMetadata::of([Constraint::Maximum(3.0)]))
            .field("email", Constraint::Format("email".into()).into())
            .nested::<Address>("address")
            .field("tags", FieldMetadata::new().nested(TypeMetadata::new().items(
                TypeMetadata::new().constraint(Constraint::Pattern("^[a-z]+$".into())),
            )))
            .field("scores", FieldMetadata::new().nested(TypeMetadata::new().values(
                TypeMetadata::new().constraint(Constraint::Minimum(0.0)),
            )))
    }
}

fn customer() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "address": { "street": "1 Loop Rd" },
        "tags": ["vip"],
    })
}

#[test]
fn required_set_is_exactly_the_non_optional_non_defaulted_fields() {
    let schema = derive::<Customer>().unwrap().to_json_schema();
    assert_eq!(schema["required"], json!(["name", "email", "address", "tags"]));
    assert_eq!(schema["properties"]["address"]["required"], json!(["street"]));
}

#[test]
fn nullable_fields_stay_required() {
    let schema = derive::<Customer>().unwrap();
    let mut doc = customer();
    doc["email"] = Value::Null;
    assert!(schema.validate(&doc).is_valid());
    doc.as_object_mut().unwrap().remove("email");
    let out = schema.validate(&doc);
    assert_eq!(out.errors(), [ValidationError::MissingField { path: "/".into(), name: "email".into() }]);
}

#[test]
fn overlay_is_idempotent_and_keeps_required() {
    let once = derive::<Customer>().unwrap();
    let twice = overlay(once.clone(), &Customer::metadata()).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        Customer::structural_schema().to_json_schema()["required"],
        once.to_json_schema()["required"]
    );
}

#[test_case("/name", json!(""))]
#[test_case("/tier", json!(9))]
#[test_case("/email", json!("not-an-email"))]
#[test_case("/address/street", json!(""))]
#[test_case("/address/zip", json!("ABCDE"))]
#[test_case("/tags/0", json!("VIP"))]
#[test_case("/scores/math", json!(-1))]
fn declared_constraints_are_enforced_at_their_path(pointer: &str, bad: Value) {
    let schema = derive::<Customer>().unwrap();
    let mut doc = customer();
    doc["address"]["zip"] = json!("12345");
    doc["scores"] = json!({ "math": 1.5 });
    assert!(schema.validate(&doc).is_valid());

    *doc.pointer_mut(pointer).unwrap() = bad;
    let out = schema.validate(&doc);
    assert_eq!(out.errors().len(), 1, "{out:?}");
    assert_eq!(out.errors()[0].path(), pointer);
}

#[test]
fn format_assertion_can_be_turned_off() {
    let schema = derive::<Customer>().unwrap();
    let mut doc = customer();
    doc["email"] = json!("not-an-email");
    let lenient = ValidationConfig { assert_formats: false };
    assert!(schema.validate_with(&doc, lenient).is_valid());
}

struct Broken;

impl JsonSchema for Broken {
    fn structural_schema() -> Schema {
        Record::new().field::<String>("label").field::<u32>("count").build()
    }

    fn metadata() -> TypeMetadata {
        TypeMetadata::new()
            .field("label", FieldMetadata::of([Constraint::Minimum(1.0), Constraint::Maximum(2.0)]))
            .field("count", FieldMetadata::of([Constraint::Pattern("^x$".into())]))
            .field("ghost", FieldMetadata::of([Constraint::Title("Ghost".into())]))
    }
}

#[test]
fn mismatched_metadata_is_reported_once_per_field() {
    let Err(DeriveError::IncompatibleConstraints(mismatches)) = derive::<Broken>() else {
        panic!("expected a derivation error");
    };
    let fields: Vec<_> = mismatches.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, ["/label", "/count", "/ghost"]);
    assert_eq!(mismatches[0].found, "string");
    assert_eq!(mismatches[0].constraints.len(), 2);
}

#[test]
fn strict_mode_rejects_unknown_keys_at_every_level() {
    let strict = derive_with::<Customer>(&DeriveConfig::strict()).unwrap();
    let mut doc = customer();
    doc["extra"] = json!(1);
    doc["address"]["floor"] = json!(2);
    doc["scores"] = json!({ "any": 3 });
    let paths: Vec<_> = strict.validate(&doc).errors().iter().map(|e| e.path().to_string()).collect();
    assert_eq!(paths, ["/address", "/"]);

    let lenient = derive::<Customer>().unwrap();
    assert!(lenient.validate(&doc).is_valid());
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "kind")]
enum Event {
    Created { id: u64 },
    Renamed { id: u64, name: String },
    Archived,
}

impl JsonSchema for Event {
    fn structural_schema() -> Schema {
        Variants::internal("kind")
            .record("Created", Record::new().field::<u64>("id"))
            .record("Renamed", Record::new().field::<u64>("id").field::<String>("name"))
            .unit("Archived")
            .build()
    }
}

#[test_case(json!({ "kind": "Created", "id": 1 }), true)]
#[test_case(json!({ "kind": "Renamed", "id": 1, "name": "b" }), true)]
#[test_case(json!({ "kind": "Archived" }), true)]
#[test_case(json!({ "kind": "Renamed", "id": 1 }), false)]
#[test_case(json!({ "kind": "Deleted" }), false)]
#[test_case(json!({ "id": 1 }), false)]
fn internally_tagged_events(doc: Value, valid: bool) {
    assert_eq!(derive::<Event>().unwrap().validate(&doc).is_valid(), valid);
}

#[test]
fn checked_deserialization_succeeds() {
    let event: Event = from_value_checked(json!({ "kind": "Renamed", "id": 4, "name": "x" })).unwrap();
    assert_eq!(event, Event::Renamed { id: 4, name: "x".into() });

    let customer: Customer = from_value_checked(customer()).unwrap();
    assert_eq!(customer.email, Nullable(Some("ada@example.com".to_string())));
    assert_eq!(customer.tier, 0);
    assert_eq!(customer.address.zip, None);
}

#[test]
fn checked_deserialization_reports_every_violation() {
    let doc = json!({ "name": "", "email": null, "address": {}, "tags": [1] });
    let Err(CheckedError::Invalid(errors)) = from_value_checked::<Customer>(doc) else {
        panic!("expected validation errors");
    };
    let paths: Vec<_> = errors.errors().iter().map(ValidationError::path).collect();
    assert_eq!(paths, ["/name", "/address", "/tags/0"]);
}

#[test]
fn checked_deserialization_honors_strict_config() {
    let mut doc = customer();
    doc["unexpected"] = json!(true);
    assert!(from_value_checked::<Customer>(doc.clone()).is_ok());
    let err = from_value_checked_with::<Customer>(doc, &DeriveConfig::strict(), ValidationConfig::default());
    assert!(matches!(err, Err(CheckedError::Invalid(_))));
}

struct Zip;

impl JsonSchema for Zip {
    fn structural_schema() -> Schema {
        Schema::string()
    }

    fn metadata() -> TypeMetadata {
        TypeMetadata::new().constraint(Constraint::Pattern("^[0-9]{5}$".into()))
    }
}

/// Declares no metadata of its own.
struct Shipment;

impl JsonSchema for Shipment {
    fn structural_schema() -> Schema {
        Record::new()
            .field::<Address>("addr")
            .field::<Option<Zip>>("zip")
            .field::<Vec<Zip>>("zips")
            .build()
    }
}

#[test]
fn constraints_of_field_types_apply_without_parent_metadata() {
    let schema = derive::<Shipment>().unwrap();
    assert!(schema.validate(&json!({ "addr": { "street": "1 Loop Rd" }, "zip": "12345", "zips": [] })).is_valid());

    let out = schema.validate(&json!({ "addr": { "street": "" }, "zip": "abc", "zips": ["abc"] }));
    let paths: Vec<_> = out.errors().iter().map(ValidationError::path).collect();
    assert_eq!(paths, ["/addr/street", "/zip", "/zips/0"]);
    assert_eq!(schema.to_json_schema()["required"], json!(["addr", "zips"]));
}

#[test]
fn newtype_variant_payloads_keep_their_constraints() {
    let schema = Variants::external().newtype::<Zip>("Z").unit("None").build();
    assert!(schema.validate(&json!({ "Z": "12345" })).is_valid());
    assert!(!schema.validate(&json!({ "Z": "abc" })).is_valid());
}
