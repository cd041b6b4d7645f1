//! Canonical JSON Schema 2020-12 emission.
//!
//! Every variant emits a JSON object; modifiers merge their keyword into the
//! object emitted by their inner schema, so the outermost modifier wins when
//! the same keyword is set twice.
use serde_json::{Map, Value, json};

use super::{AdditionalProperties, Annotations, ArraySchema, NumericSchema, ObjectSchema, Schema, StringSchema};

pub const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

impl Schema {
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::Null => json!({ "type": "null" }),
            Schema::Boolean { const_value } => {
                let mut o = json!({ "type": "boolean" });
                if let Some(c) = const_value {
                    o["const"] = Value::Bool(*c);
                }
                o
            }
            Schema::String(s) => emit_string(s),
            Schema::Integer(n) => emit_numeric("integer", n),
            Schema::Number(n) => emit_numeric("number", n),
            Schema::Enum { values } => json!({ "enum": values }),

            Schema::Object(o) => emit_object(o),
            Schema::Array(a) => emit_array(a),

            Schema::AllOf(xs) if xs.is_empty() => json!({}),
            Schema::AllOf(xs) => json!({ "allOf": emit_all(xs) }),
            Schema::AnyOf(xs) if xs.is_empty() => never(),
            Schema::AnyOf(xs) => json!({ "anyOf": emit_all(xs) }),
            Schema::OneOf(xs) if xs.is_empty() => never(),
            Schema::OneOf(xs) => json!({ "oneOf": emit_all(xs) }),
            Schema::Not(inner) => json!({ "not": inner.to_json_schema() }),
            Schema::IfThenElse { condition, then_schema, else_schema } => {
                let mut o = json!({ "if": condition.to_json_schema() });
                if let Some(t) = then_schema {
                    o["then"] = t.to_json_schema();
                }
                if let Some(e) = else_schema {
                    o["else"] = e.to_json_schema();
                }
                o
            }
            Schema::Ref(target) => json!({ "$ref": target }),

            // optionality is expressed by the parent's `required`
            Schema::Optional(inner) => inner.to_json_schema(),
            Schema::Nullable(inner) => emit_nullable(inner.to_json_schema()),
            Schema::WithDefault { inner, value } => merge(inner.to_json_schema(), "default", value.clone()),
            Schema::WithTitle { inner, text } => merge(inner.to_json_schema(), "title", Value::from(text.as_str())),
            Schema::WithDescription { inner, text } => {
                merge(inner.to_json_schema(), "description", Value::from(text.as_str()))
            }
            Schema::WithDefs { inner, defs } => {
                let defs: Map<String, Value> = defs.iter().map(|(k, v)| (k.clone(), v.to_json_schema())).collect();
                merge(inner.to_json_schema(), "$defs", Value::Object(defs))
            }
            Schema::WithId { inner, uri } => merge(inner.to_json_schema(), "$id", Value::from(uri.as_str())),
            Schema::WithAnnotations { inner, annotations } => emit_annotations(inner.to_json_schema(), annotations),
        }
    }

    /// Root document: the canonical schema plus the `$schema` dialect.
    pub fn to_json_schema_document(&self) -> Value {
        let body = self.to_json_schema();
        let mut out = Map::new();
        out.insert("$schema".into(), Value::from(DIALECT));
        if let Value::Object(map) = body {
            for (k, v) in map {
                out.insert(k, v);
            }
        }
        Value::Object(out)
    }
}

// -------------------------------- Leaves ---------------------------------- //

fn emit_string(s: &StringSchema) -> Value {
    let mut o = json!({ "type": "string" });
    if let Some(n) = s.min_length {
        o["minLength"] = Value::from(n);
    }
    if let Some(n) = s.max_length {
        o["maxLength"] = Value::from(n);
    }
    if let Some(p) = &s.pattern {
        o["pattern"] = Value::from(p.as_str());
    }
    if let Some(f) = &s.format {
        o["format"] = Value::from(f.as_str());
    }
    if let Some(c) = &s.const_value {
        o["const"] = Value::from(c.as_str());
    }
    if let Some(values) = &s.enum_values {
        o["enum"] = Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect());
    }
    o
}

fn emit_numeric(kind: &str, n: &NumericSchema) -> Value {
    let mut o = json!({ "type": kind });
    let keywords = [
        ("minimum", n.minimum),
        ("maximum", n.maximum),
        ("exclusiveMinimum", n.exclusive_minimum),
        ("exclusiveMaximum", n.exclusive_maximum),
        ("multipleOf", n.multiple_of),
        ("const", n.const_value),
    ];
    for (key, value) in keywords {
        if let Some(v) = value {
            o[key] = json_num_pref_i64(v);
        }
    }
    o
}

// Helper: prefer emitting integers when exact
pub(crate) fn json_num_pref_i64(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

// ------------------------------ Structural -------------------------------- //

fn emit_object(o: &ObjectSchema) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::from("object"));
    if !o.properties.is_empty() {
        let props: Map<String, Value> = o
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json_schema()))
            .collect();
        map.insert("properties".into(), Value::Object(props));
    }
    if !o.required.is_empty() {
        map.insert(
            "required".into(),
            Value::Array(o.required.iter().map(|n| Value::from(n.as_str())).collect()),
        );
    }
    if !o.pattern_properties.is_empty() {
        let pats: Map<String, Value> = o
            .pattern_properties
            .iter()
            .map(|(p, s)| (p.as_str().to_string(), s.to_json_schema()))
            .collect();
        map.insert("patternProperties".into(), Value::Object(pats));
    }
    match &o.additional_properties {
        AdditionalProperties::Allow => {}
        AdditionalProperties::Deny => {
            map.insert("additionalProperties".into(), Value::Bool(false));
        }
        AdditionalProperties::Schema(s) => {
            map.insert("additionalProperties".into(), s.to_json_schema());
        }
    }
    Value::Object(map)
}

fn emit_array(a: &ArraySchema) -> Value {
    let mut o = json!({ "type": "array" });
    if let Some(prefix) = &a.prefix_items {
        o["prefixItems"] = Value::Array(emit_all(prefix));
    }
    // `items: {}` is the default; leave it out
    if *a.items != Schema::any() {
        o["items"] = a.items.to_json_schema();
    }
    if let Some(n) = a.min_items {
        o["minItems"] = Value::from(n);
    }
    if let Some(n) = a.max_items {
        o["maxItems"] = Value::from(n);
    }
    if a.unique_items {
        o["uniqueItems"] = Value::Bool(true);
    }
    if let Some(c) = &a.contains {
        o["contains"] = c.to_json_schema();
    }
    if let Some(n) = a.min_contains {
        o["minContains"] = Value::from(n);
    }
    if let Some(n) = a.max_contains {
        o["maxContains"] = Value::from(n);
    }
    o
}

fn emit_all(xs: &[Schema]) -> Vec<Value> {
    xs.iter().map(Schema::to_json_schema).collect()
}

fn never() -> Value {
    json!({ "not": {} })
}

// ------------------------------- Modifiers -------------------------------- //

/// `"type": "x"` widens to `["x", "null"]` when nothing else pins the value;
/// anything fancier goes through `anyOf`.
fn emit_nullable(inner: Value) -> Value {
    if let Value::Object(mut map) = inner {
        let widenable = !map.contains_key("const") && !map.contains_key("enum");
        if widenable {
            if let Some(Value::String(kind)) = map.get("type") {
                if kind == "null" {
                    return Value::Object(map);
                }
                let widened = Value::Array(vec![Value::from(kind.as_str()), Value::from("null")]);
                map.insert("type".into(), widened);
                return Value::Object(map);
            }
        }
        return json!({ "anyOf": [Value::Object(map), { "type": "null" }] });
    }
    json!({ "anyOf": [inner, { "type": "null" }] })
}

fn emit_annotations(inner: Value, a: &Annotations) -> Value {
    let mut out = inner;
    if !a.examples.is_empty() {
        out = merge(out, "examples", Value::Array(a.examples.clone()));
    }
    if a.deprecated {
        out = merge(out, "deprecated", Value::Bool(true));
    }
    if a.read_only {
        out = merge(out, "readOnly", Value::Bool(true));
    }
    if a.write_only {
        out = merge(out, "writeOnly", Value::Bool(true));
    }
    out
}

fn merge(inner: Value, key: &str, value: Value) -> Value {
    match inner {
        Value::Object(mut map) => {
            map.insert(key.to_string(), value);
            Value::Object(map)
        }
        other => {
            let mut map = Map::new();
            map.insert("allOf".into(), Value::Array(vec![other]));
            map.insert(key.to_string(), value);
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ObjectSchema;

    #[test]
    fn object_required_follows_declaration_order() {
        let s: Schema = ObjectSchema::new()
            .field("b", Schema::string())
            .field("a", Schema::integer())
            .field("c", Schema::boolean().optional())
            .into();
        let out = s.to_json_schema();
        assert_eq!(out["required"], json!(["b", "a"]));
        assert_eq!(out["properties"]["c"], json!({ "type": "boolean" }));
        assert!(out.get("additionalProperties").is_none());
    }

    #[test]
    fn nullable_widens_plain_type() {
        let s = Schema::string().nullable();
        assert_eq!(s.to_json_schema(), json!({ "type": ["string", "null"] }));
    }

    #[test]
    fn nullable_const_goes_through_any_of() {
        let s = Schema::const_string("x").nullable();
        assert_eq!(
            s.to_json_schema(),
            json!({ "anyOf": [{ "type": "string", "const": "x" }, { "type": "null" }] })
        );
    }

    #[test]
    fn metadata_merges_from_every_modifier() {
        let s = Schema::Integer(NumericSchema::new().minimum(0.0))
            .with_title("Age")
            .with_description("in years")
            .with_default(json!(18))
            .deprecated()
            .optional();
        assert_eq!(
            s.to_json_schema(),
            json!({
                "type": "integer",
                "minimum": 0,
                "title": "Age",
                "description": "in years",
                "default": 18,
                "deprecated": true
            })
        );
    }

    #[test]
    fn empty_combinators_have_canonical_forms() {
        assert_eq!(Schema::AllOf(vec![]).to_json_schema(), json!({}));
        assert_eq!(Schema::AnyOf(vec![]).to_json_schema(), json!({ "not": {} }));
        assert_eq!(Schema::OneOf(vec![]).to_json_schema(), json!({ "not": {} }));
    }

    #[test]
    fn tuple_emits_prefix_items_and_closed_tail() {
        let s: Schema = ArraySchema::tuple(vec![Schema::string(), Schema::number()]).into();
        assert_eq!(
            s.to_json_schema(),
            json!({
                "type": "array",
                "prefixItems": [{ "type": "string" }, { "type": "number" }],
                "items": { "not": {} },
                "minItems": 2,
                "maxItems": 2
            })
        );
    }

    #[test]
    fn document_carries_dialect_first() {
        let doc = Schema::Null.to_json_schema_document();
        let first = doc.as_object().unwrap().keys().next().unwrap().clone();
        assert_eq!(first, "$schema");
        assert_eq!(doc["type"], "null");
    }

    #[test]
    fn fractional_bounds_stay_floats() {
        let s = Schema::Number(NumericSchema::new().minimum(0.5).maximum(10.0));
        assert_eq!(s.to_json_schema(), json!({ "type": "number", "minimum": 0.5, "maximum": 10 }));
    }
}
