//! JSON Schema document → [`Schema`].
//!
//! Accepts the 2020-12 keywords this model understands and ignores the
//! rest. When `type` is missing the kind is inferred from kind-specific
//! keywords, which is stricter than JSON Schema proper (a bare
//! `{"minLength": 1}` rejects non-strings here).
use serde_json::{Map, Value};

use super::{AdditionalProperties, ArraySchema, NumericSchema, ObjectSchema, Pattern, Schema, StringSchema};
use crate::error::{Result, SchemaError};
use crate::validate::context::escape_pointer_segment;

impl Schema {
    pub fn from_json_schema(doc: &Value) -> Result<Schema> {
        parse(doc, "")
    }
}

// -------------------------------- Policy ---------------------------------- //

const OBJECT_KEYWORDS: [&str; 4] = ["properties", "patternProperties", "additionalProperties", "required"];
const ARRAY_KEYWORDS: [&str; 8] = [
    "items",
    "prefixItems",
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "minContains",
    "maxContains",
];
const STRING_KEYWORDS: [&str; 4] = ["minLength", "maxLength", "pattern", "format"];
const NUMBER_KEYWORDS: [&str; 5] = ["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum", "multipleOf"];

// --------------------------------- Entry ---------------------------------- //

fn parse(v: &Value, at: &str) -> Result<Schema> {
    match v {
        Value::Bool(true) => Ok(Schema::any()),
        Value::Bool(false) => Ok(Schema::never()),
        Value::Object(map) => parse_map(map, at),
        _ => Err(SchemaError::invalid_schema(at, "a schema must be an object or a boolean")),
    }
}

fn parse_map(map: &Map<String, Value>, at: &str) -> Result<Schema> {
    let mut parts: Vec<Schema> = Vec::new();
    if let Some(core) = parse_core(map, at)? {
        parts.push(core);
    }
    parts.extend(parse_composition(map, at)?);

    let body = match parts.len() {
        0 => Schema::any(),
        1 => parts.remove(0),
        _ => Schema::AllOf(parts),
    };
    wrap_metadata(body, map, at)
}

// ------------------------------ Kind + leaves ----------------------------- //

fn parse_core(map: &Map<String, Value>, at: &str) -> Result<Option<Schema>> {
    match map.get("type") {
        Some(Value::String(kind)) => parse_kind(kind, map, at).map(Some),
        Some(Value::Array(kinds)) => {
            let mut names = Vec::with_capacity(kinds.len());
            for (i, k) in kinds.iter().enumerate() {
                match k.as_str() {
                    Some(name) => names.push(name),
                    None => {
                        return Err(SchemaError::invalid_schema(
                            &child(&child(at, "type"), &i.to_string()),
                            "type names must be strings",
                        ));
                    }
                }
            }
            let nullable = names.contains(&"null");
            let mut arms = Vec::new();
            for name in names.iter().filter(|n| **n != "null") {
                arms.push(parse_kind(name, map, at)?);
            }
            let core = match arms.len() {
                0 => Schema::Null,
                1 => arms.remove(0),
                _ => Schema::AnyOf(arms),
            };
            Ok(Some(if nullable && !matches!(core, Schema::Null) { core.nullable() } else { core }))
        }
        Some(_) => Err(SchemaError::invalid_schema(&child(at, "type"), "expected a string or an array of strings")),
        None => {
            if let Some(c) = map.get("const") {
                return Ok(Some(Schema::constant(c.clone())));
            }
            if let Some(values) = map.get("enum") {
                return parse_enum(values, &child(at, "enum")).map(Some);
            }
            let inferred = if has_any(map, &OBJECT_KEYWORDS) {
                Some("object")
            } else if has_any(map, &ARRAY_KEYWORDS) {
                Some("array")
            } else if has_any(map, &STRING_KEYWORDS) {
                Some("string")
            } else if has_any(map, &NUMBER_KEYWORDS) {
                Some("number")
            } else {
                None
            };
            inferred.map(|kind| parse_kind(kind, map, at)).transpose()
        }
    }
}

fn parse_kind(kind: &str, map: &Map<String, Value>, at: &str) -> Result<Schema> {
    let constant = map.get("const");
    let core = match kind {
        "null" => return Ok(Schema::Null),
        "boolean" => Schema::Boolean { const_value: constant.and_then(Value::as_bool) },
        "string" => Schema::String(parse_string(map, at)?),
        "integer" => Schema::Integer(parse_numeric(map, at)?),
        "number" => Schema::Number(parse_numeric(map, at)?),
        "object" => Schema::Object(parse_object(map, at)?),
        "array" => Schema::Array(parse_array(map, at)?),
        other => {
            return Err(SchemaError::invalid_schema(&child(at, "type"), format!("unknown type `{other}`")));
        }
    };

    // Whatever the leaf could not hold narrows the kind. A `const` of another
    // kind (`null` beside `"type": ["integer", "null"]`) leaves this arm
    // accepting nothing, which is what JSON Schema means by it.
    let mut narrowing = Vec::new();
    if kind != "string" {
        if let Some(values) = map.get("enum") {
            narrowing.push(parse_enum(values, &child(at, "enum"))?);
        }
    }
    if let Some(c) = constant {
        if !leaf_holds_const(kind, c) {
            narrowing.push(Schema::constant(c.clone()));
        }
    }
    if narrowing.is_empty() {
        Ok(core)
    } else {
        narrowing.insert(0, core);
        Ok(Schema::AllOf(narrowing))
    }
}

fn leaf_holds_const(kind: &str, c: &Value) -> bool {
    match kind {
        "boolean" => c.is_boolean(),
        "string" => c.is_string(),
        "integer" | "number" => c.is_number(),
        _ => false,
    }
}

fn parse_enum(values: &Value, at: &str) -> Result<Schema> {
    match values {
        Value::Array(xs) => Ok(Schema::enumeration(xs.iter().cloned())),
        _ => Err(SchemaError::invalid_schema(at, "expected an array")),
    }
}

fn parse_string(map: &Map<String, Value>, at: &str) -> Result<StringSchema> {
    let mut s = StringSchema::new();
    s.min_length = get_u64(map, "minLength", at)?;
    s.max_length = get_u64(map, "maxLength", at)?;
    if let Some(src) = get_str(map, "pattern", at)? {
        s.pattern = Some(Pattern::new(src)?);
    }
    s.format = get_str(map, "format", at)?.map(str::to_string);
    s.const_value = map.get("const").and_then(Value::as_str).map(str::to_string);
    if let Some(values) = map.get("enum") {
        let Value::Array(xs) = values else {
            return Err(SchemaError::invalid_schema(&child(at, "enum"), "expected an array"));
        };
        // non-strings can never match a string; `null` is the nullable arm's
        s.enum_values = Some(xs.iter().filter_map(Value::as_str).map(str::to_string).collect());
    }
    Ok(s)
}

fn parse_numeric(map: &Map<String, Value>, at: &str) -> Result<NumericSchema> {
    Ok(NumericSchema {
        minimum: get_f64(map, "minimum", at)?,
        maximum: get_f64(map, "maximum", at)?,
        exclusive_minimum: get_f64(map, "exclusiveMinimum", at)?,
        exclusive_maximum: get_f64(map, "exclusiveMaximum", at)?,
        multiple_of: get_f64(map, "multipleOf", at)?,
        const_value: map.get("const").and_then(Value::as_f64),
    })
}

// ------------------------------ Structural -------------------------------- //

fn parse_object(map: &Map<String, Value>, at: &str) -> Result<ObjectSchema> {
    let mut o = ObjectSchema::new();
    if let Some(props) = map.get("properties") {
        let props_at = child(at, "properties");
        for (name, sub) in expect_object(props, &props_at)? {
            o.properties.insert(name.clone(), parse(sub, &child(&props_at, name))?);
        }
    }
    if let Some(required) = map.get("required") {
        let req_at = child(at, "required");
        let Value::Array(names) = required else {
            return Err(SchemaError::invalid_schema(&req_at, "expected an array of property names"));
        };
        for (i, name) in names.iter().enumerate() {
            match name.as_str() {
                Some(name) => {
                    o.required.insert(name.to_string());
                }
                None => {
                    return Err(SchemaError::invalid_schema(&child(&req_at, &i.to_string()), "expected a string"));
                }
            }
        }
    }
    if let Some(pats) = map.get("patternProperties") {
        let pats_at = child(at, "patternProperties");
        for (src, sub) in expect_object(pats, &pats_at)? {
            let schema = parse(sub, &child(&pats_at, src))?;
            o.pattern_properties.push((Pattern::new(src)?, schema));
        }
    }
    o.additional_properties = match map.get("additionalProperties") {
        None | Some(Value::Bool(true)) => AdditionalProperties::Allow,
        Some(Value::Bool(false)) => AdditionalProperties::Deny,
        Some(sub) => AdditionalProperties::Schema(Box::new(parse(sub, &child(at, "additionalProperties"))?)),
    };
    Ok(o)
}

fn parse_array(map: &Map<String, Value>, at: &str) -> Result<ArraySchema> {
    let items = match map.get("items") {
        None => Schema::any(),
        Some(sub) => parse(sub, &child(at, "items"))?,
    };
    let mut a = ArraySchema::of(items);
    if let Some(prefix) = map.get("prefixItems") {
        let prefix_at = child(at, "prefixItems");
        let Value::Array(xs) = prefix else {
            return Err(SchemaError::invalid_schema(&prefix_at, "expected an array of schemas"));
        };
        let elems = xs
            .iter()
            .enumerate()
            .map(|(i, x)| parse(x, &child(&prefix_at, &i.to_string())))
            .collect::<Result<Vec<_>>>()?;
        a.prefix_items = Some(elems);
    }
    a.min_items = get_u64(map, "minItems", at)?;
    a.max_items = get_u64(map, "maxItems", at)?;
    a.unique_items = get_bool(map, "uniqueItems", at)?.unwrap_or(false);
    if let Some(sub) = map.get("contains") {
        a.contains = Some(Box::new(parse(sub, &child(at, "contains"))?));
    }
    a.min_contains = get_u64(map, "minContains", at)?;
    a.max_contains = get_u64(map, "maxContains", at)?;
    Ok(a)
}

// ------------------------------ Composition ------------------------------- //

fn parse_composition(map: &Map<String, Value>, at: &str) -> Result<Vec<Schema>> {
    let mut out = Vec::new();
    if let Some(xs) = map.get("allOf") {
        out.push(Schema::AllOf(parse_list(xs, &child(at, "allOf"))?));
    }
    if let Some(xs) = map.get("anyOf") {
        out.push(Schema::AnyOf(parse_list(xs, &child(at, "anyOf"))?));
    }
    if let Some(xs) = map.get("oneOf") {
        out.push(Schema::OneOf(parse_list(xs, &child(at, "oneOf"))?));
    }
    if let Some(sub) = map.get("not") {
        out.push(Schema::not(parse(sub, &child(at, "not"))?));
    }
    if let Some(cond) = map.get("if") {
        let condition = parse(cond, &child(at, "if"))?;
        let then_schema = map.get("then").map(|t| parse(t, &child(at, "then"))).transpose()?;
        let else_schema = map.get("else").map(|e| parse(e, &child(at, "else"))).transpose()?;
        out.push(Schema::if_then_else(condition, then_schema, else_schema));
    }
    if let Some(target) = get_str(map, "$ref", at)? {
        out.push(Schema::reference(target));
    }
    Ok(out)
}

fn parse_list(xs: &Value, at: &str) -> Result<Vec<Schema>> {
    let Value::Array(xs) = xs else {
        return Err(SchemaError::invalid_schema(at, "expected an array of schemas"));
    };
    xs.iter()
        .enumerate()
        .map(|(i, x)| parse(x, &child(at, &i.to_string())))
        .collect()
}

// ------------------------------- Metadata --------------------------------- //

fn wrap_metadata(body: Schema, map: &Map<String, Value>, at: &str) -> Result<Schema> {
    let mut s = body;

    if let Some(Value::Array(examples)) = map.get("examples") {
        s = s.with_examples(examples.clone());
    }
    if get_bool(map, "deprecated", at)? == Some(true) {
        s = s.deprecated();
    }
    if get_bool(map, "readOnly", at)? == Some(true) {
        s = s.read_only();
    }
    if get_bool(map, "writeOnly", at)? == Some(true) {
        s = s.write_only();
    }
    if let Some(default) = map.get("default") {
        s = s.with_default(default.clone());
    }
    if let Some(text) = get_str(map, "description", at)? {
        s = s.with_description(text);
    }
    if let Some(text) = get_str(map, "title", at)? {
        s = s.with_title(text);
    }
    if let Some(uri) = get_str(map, "$id", at)? {
        s = s.with_id(uri);
    }
    for key in ["$defs", "definitions"] {
        if let Some(defs) = map.get(key) {
            let defs_at = child(at, key);
            let mut parsed = s.defs().cloned().unwrap_or_default();
            for (name, sub) in expect_object(defs, &defs_at)? {
                parsed.insert(name.clone(), parse(sub, &child(&defs_at, name))?);
            }
            s = s.with_defs(parsed);
        }
    }
    Ok(s)
}

// -------------------------------- Helpers --------------------------------- //

fn child(at: &str, segment: &str) -> String {
    format!("{at}/{}", escape_pointer_segment(segment))
}

fn has_any(map: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| map.contains_key(*k))
}

fn expect_object<'a>(v: &'a Value, at: &str) -> Result<&'a Map<String, Value>> {
    v.as_object().ok_or_else(|| SchemaError::invalid_schema(at, "expected an object"))
}

fn get_u64(map: &Map<String, Value>, key: &str, at: &str) -> Result<Option<u64>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .map(Some)
            .ok_or_else(|| SchemaError::invalid_schema(&child(at, key), "expected a non-negative integer")),
    }
}

fn get_f64(map: &Map<String, Value>, key: &str, at: &str) -> Result<Option<f64>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| SchemaError::invalid_schema(&child(at, key), "expected a number")),
    }
}

fn get_str<'a>(map: &'a Map<String, Value>, key: &str, at: &str) -> Result<Option<&'a str>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SchemaError::invalid_schema(&child(at, key), "expected a string")),
    }
}

fn get_bool(map: &Map<String, Value>, key: &str, at: &str) -> Result<Option<bool>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SchemaError::invalid_schema(&child(at, key), "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(doc: Value) {
        let once = Schema::from_json_schema(&doc).unwrap().to_json_schema();
        let twice = Schema::from_json_schema(&once).unwrap().to_json_schema();
        assert_eq!(once, twice);
    }

    #[test]
    fn parses_object_with_required_and_nested() {
        let s = Schema::from_json_schema(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "tags": { "type": "array", "items": { "type": "string" }, "uniqueItems": true }
            },
            "required": ["name"],
            "additionalProperties": false
        }))
        .unwrap();
        let Schema::Object(o) = &s else { panic!("expected object, got {s:?}") };
        assert_eq!(o.required.iter().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(o.additional_properties, AdditionalProperties::Deny);
        assert!(matches!(&o.properties["name"], Schema::String(st) if st.min_length == Some(1)));
        assert!(matches!(&o.properties["tags"], Schema::Array(a) if a.unique_items));
    }

    #[test]
    fn type_array_with_null_becomes_nullable() {
        let s = Schema::from_json_schema(&json!({ "type": ["integer", "null"], "minimum": 0 })).unwrap();
        assert!(s.is_nullable());
        assert!(matches!(s.base(), Schema::Integer(n) if n.minimum == Some(0.0)));
    }

    #[test]
    fn null_in_enum_goes_to_the_nullable_arm() {
        let s = Schema::from_json_schema(&json!({ "type": ["string", "null"], "enum": ["a", null] })).unwrap();
        assert!(s.is_nullable());
        assert!(matches!(s.base(), Schema::String(st) if st.enum_values == Some(vec!["a".to_string()])));
        assert!(s.validate(&json!("a")).is_valid());
        assert!(s.validate(&json!(null)).is_valid());
        assert!(!s.validate(&json!("b")).is_valid());
    }

    #[test]
    fn const_of_another_kind_narrows_the_arm() {
        let s = Schema::from_json_schema(&json!({ "type": ["integer", "null"], "const": null })).unwrap();
        assert!(s.validate(&json!(null)).is_valid());
        assert!(!s.validate(&json!(1)).is_valid());

        let s = Schema::from_json_schema(&json!({ "type": "boolean", "enum": [true, "yes"] })).unwrap();
        assert!(s.validate(&json!(true)).is_valid());
        assert!(!s.validate(&json!(false)).is_valid());
        assert!(!s.validate(&json!("yes")).is_valid());
    }

    #[test]
    fn kind_is_inferred_from_keywords() {
        let s = Schema::from_json_schema(&json!({ "properties": { "a": true } })).unwrap();
        assert_eq!(s.kind_name(), "object");
        let s = Schema::from_json_schema(&json!({ "maxLength": 3 })).unwrap();
        assert_eq!(s.kind_name(), "string");
    }

    #[test]
    fn boolean_schemas() {
        assert_eq!(Schema::from_json_schema(&json!(true)).unwrap(), Schema::any());
        assert_eq!(Schema::from_json_schema(&json!(false)).unwrap(), Schema::never());
    }

    #[test]
    fn metadata_and_defs_wrap_the_body() {
        let s = Schema::from_json_schema(&json!({
            "$id": "urn:example:thing",
            "title": "Thing",
            "$defs": { "pos": { "type": "integer", "minimum": 1 } },
            "$ref": "#/$defs/pos"
        }))
        .unwrap();
        assert_eq!(s.title(), Some("Thing"));
        assert_eq!(s.id(), Some("urn:example:thing"));
        assert!(s.defs().unwrap().contains_key("pos"));
        assert_eq!(s.base(), &Schema::reference("#/$defs/pos"));
    }

    #[test]
    fn errors_point_into_the_document() {
        let err = Schema::from_json_schema(&json!({
            "type": "object",
            "properties": { "a/b": { "type": "string", "minLength": -1 } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidSchema {
                path: "/properties/a~1b/minLength".into(),
                message: "expected a non-negative integer".into(),
            }
        );
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Schema::from_json_schema(&json!({ "type": "string", "pattern": "(" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn emission_is_stable_across_parse() {
        round_trip(json!({
            "title": "Shape",
            "oneOf": [
                {
                    "type": "object",
                    "properties": { "type": { "const": "circle" }, "radius": { "type": "number", "minimum": 0 } },
                    "required": ["type", "radius"]
                },
                {
                    "type": "object",
                    "properties": { "type": { "const": "rectangle" } },
                    "required": ["type"]
                }
            ]
        }));
        round_trip(json!({
            "type": "array",
            "prefixItems": [{ "type": "string" }],
            "items": { "type": ["number", "null"] },
            "contains": { "type": "number" },
            "minContains": 2
        }));
        round_trip(json!({ "if": { "required": ["a"] }, "then": { "required": ["b"] } }));
    }
}
