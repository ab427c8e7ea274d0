//! Schema validation helpers.
//!
//! Validates a `serde_json::Value` configuration against a [`Schema`]
//! before any API call is attempted. Beyond presence and type checks this
//! enforces the simple constraints SonarCloud imposes on its inputs:
//! string length bounds and fixed value sets.

use crate::schema::{
    Attribute, AttributeType, Diagnostic, DiagnosticSeverity, Diagnostics, Schema,
};
use serde_json::Value;
use std::collections::HashMap;

/// Validate a JSON value against a schema.
///
/// Returns the diagnostics for any violations found; an empty collection
/// means the value is valid. Computed-only attributes are skipped (the
/// provider sets those), optional attributes may be absent or null.
pub fn validate(schema: &Schema, value: &Value) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        other => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(other))),
            );
            return diagnostics;
        }
    };

    for (name, attr) in &schema.attributes {
        validate_attribute(attr, obj.get(name.as_str()), name, &mut diagnostics);
    }

    diagnostics
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    !validate(schema, value).has_errors()
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Diagnostics,
) {
    // Computed-only attributes are set by the provider, not the user.
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        }
        Some(v) => {
            validate_type(&attr.attr_type, v, path, diagnostics);
            validate_constraints(attr, v, path, diagnostics);
        }
    }
}

fn validate_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        }
        AttributeType::Int64 => {
            if !value.is_i64() && !value.is_u64() {
                diagnostics.push(type_error(path, "int64", value));
            }
        }
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        }
        AttributeType::Object(attrs) => {
            if let Some(obj) = value.as_object() {
                validate_object_type(attrs, obj, path, diagnostics);
            } else {
                diagnostics.push(type_error(path, "object", value));
            }
        }
    }
}

fn validate_object_type(
    attrs: &HashMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Diagnostics,
) {
    // Object attributes within a type carry no required/optional flags,
    // so only present fields are checked.
    for (name, attr_type) in attrs {
        if let Some(value) = obj.get(name) {
            let attr_path = format!("{}.{}", path, name);
            validate_type(attr_type, value, &attr_path, diagnostics);
        }
    }
}

fn validate_constraints(attr: &Attribute, value: &Value, path: &str, diagnostics: &mut Diagnostics) {
    if let Some(s) = value.as_str() {
        validate_string_constraints(attr, s, path, diagnostics);
    }

    if let Some(arr) = value.as_array() {
        for (i, elem) in arr.iter().enumerate() {
            if let Some(s) = elem.as_str() {
                let elem_path = format!("{}.{}", path, i);
                validate_string_constraints(attr, s, &elem_path, diagnostics);
            }
        }
    }
}

fn validate_string_constraints(
    attr: &Attribute,
    value: &str,
    path: &str,
    diagnostics: &mut Diagnostics,
) {
    let length = value.chars().count();

    if let Some(min) = attr.min_length {
        if length < min {
            diagnostics.push(
                Diagnostic::error(format!("Invalid length for attribute '{}'", path))
                    .with_detail(format!("Expected at least {} character(s), got {}", min, length))
                    .with_attribute(path),
            );
        }
    }

    if let Some(max) = attr.max_length {
        if length > max {
            diagnostics.push(
                Diagnostic::error(format!("Invalid length for attribute '{}'", path))
                    .with_detail(format!("Expected at most {} character(s), got {}", max, length))
                    .with_attribute(path),
            );
        }
    }

    if let Some(allowed) = &attr.one_of {
        if !allowed.iter().any(|a| a == value) {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!("Expected one of [{}], got '{}'", allowed.join(", "), value))
                    .with_attribute(path),
            );
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Error,
        summary: format!("Invalid type for attribute '{}'", path),
        detail: Some(format!("Expected {}, got {}", expected, value_type_name(got))),
        attribute: Some(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("project_key", Attribute::required_string());

        assert!(validate(&schema, &json!({"project_key": "proj1"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert!(diagnostics.has_errors());
        assert_eq!(
            diagnostics.as_slice()[0].attribute,
            Some("project_key".to_string())
        );

        let diagnostics = validate(&schema, &json!({"project_key": null}));
        assert!(diagnostics.has_errors());

        let diagnostics = validate(&schema, &json!({"project_key": 123}));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.as_slice()[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_attribute() {
        let schema = Schema::v0().with_attribute("visibility", Attribute::optional_string());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"visibility": null})).is_empty());
        assert!(validate(&schema, &json!({"visibility": "public"})).is_empty());
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("id", Attribute::computed_string());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"id": 123})).is_empty());
    }

    #[test]
    fn test_validate_length_bounds() {
        let schema = Schema::v0().with_attribute(
            "project_key",
            Attribute::required_string().with_length_between(1, 400),
        );

        assert!(validate(&schema, &json!({"project_key": "proj1"})).is_empty());

        let diagnostics = validate(&schema, &json!({"project_key": ""}));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.as_slice()[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("at least 1"));

        let long_key = "k".repeat(401);
        let diagnostics = validate(&schema, &json!({"project_key": long_key}));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.as_slice()[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("at most 400"));

        let max_key = "k".repeat(400);
        assert!(validate(&schema, &json!({"project_key": max_key})).is_empty());
    }

    #[test]
    fn test_validate_one_of() {
        let schema = Schema::v0().with_attribute(
            "visibility",
            Attribute::optional_string().with_one_of(["public", "private"]),
        );

        assert!(validate(&schema, &json!({"visibility": "public"})).is_empty());

        let diagnostics = validate(&schema, &json!({"visibility": "hidden"}));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.as_slice()[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("public, private"));
    }

    #[test]
    fn test_validate_one_of_on_list_elements() {
        let schema = Schema::v0().with_attribute(
            "permissions",
            Attribute::required_string_list().with_one_of(["admin", "scan", "provisioning"]),
        );

        assert!(validate(&schema, &json!({"permissions": ["admin", "scan"]})).is_empty());

        let diagnostics = validate(&schema, &json!({"permissions": ["admin", "deploy"]}));
        assert!(diagnostics.has_errors());
        assert_eq!(
            diagnostics.as_slice()[0].attribute,
            Some("permissions.1".to_string())
        );
    }

    #[test]
    fn test_validate_list_element_type() {
        let schema =
            Schema::v0().with_attribute("permissions", Attribute::required_string_list());

        let diagnostics = validate(&schema, &json!({"permissions": ["admin", 42]}));
        assert!(diagnostics.has_errors());
        assert_eq!(
            diagnostics.as_slice()[0].attribute,
            Some("permissions.1".to_string())
        );
    }

    #[test]
    fn test_validate_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("url", Attribute::required_string());

        let diagnostics = validate(&schema, &json!({"name": 1, "url": true}));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        let diagnostics = validate(&schema, &json!("not an object"));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.as_slice()[0].summary.contains("Expected object"));
    }

    #[test]
    fn test_is_valid_helper() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(is_valid(&schema, &json!({"name": "devs"})));
        assert!(!is_valid(&schema, &json!({})));
    }
}
