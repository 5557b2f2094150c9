//! Conversion between the textual values carried by form fields and typed [`Value`]s.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Type hint attached to a field. Serialized as an optional string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldType {
    #[default]
    Unspecified,
    Number,
    Boolean,
}

impl FieldType {
    /// Maps an OpenAPI `type` keyword onto a field hint.
    pub fn from_schema_type(schema_type: &str) -> Self {
        match schema_type {
            "integer" | "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            _ => FieldType::Unspecified,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            FieldType::Unspecified => None,
            FieldType::Number => Some("number"),
            FieldType::Boolean => Some("boolean"),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, FieldType::Unspecified)
    }
}

impl From<Option<String>> for FieldType {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("number") => FieldType::Number,
            Some("boolean") => FieldType::Boolean,
            _ => FieldType::Unspecified,
        }
    }
}

impl From<FieldType> for Option<String> {
    fn from(value: FieldType) -> Self {
        value.as_str().map(str::to_string)
    }
}

/// Turns a raw field value into a typed scalar.
///
/// Numbers win over booleans, booleans over strings. A declared type forces the
/// attempt even when the text does not look like that type; if a forced number
/// does not parse the field falls through to the boolean and string rules.
pub fn coerce(raw: &str, field_type: FieldType) -> Value {
    let trimmed = raw.trim();

    if (field_type == FieldType::Number || NUMBER.is_match(trimmed))
        && let Some(number) = parse_number(trimmed)
    {
        return number;
    }

    if field_type == FieldType::Boolean || trimmed == "true" || trimmed == "false" {
        return Value::Bool(trimmed == "true");
    }

    Value::String(raw.to_string())
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Integer(integer));
    }
    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        Some(Value::Integer(float as i64))
    } else {
        Some(Value::Float(float))
    }
}

/// Renders a schema value as the text a form field would carry.
///
/// Strings are kept verbatim, null becomes empty, and containers use the
/// compact flow form.
pub fn format_literal(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Sequence(_) | Value::Mapping(_) => value.to_string(),
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e+20`,
/// `2.5e-07`) when the decimal exponent is below -4 or at least 6.
pub(crate) fn format_float(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return value.to_string();
    }
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    if (-4..6).contains(&exponent) {
        return value.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Mapping;

    #[test]
    fn numeric_text_becomes_integer() {
        assert_eq!(coerce("3", FieldType::Unspecified), Value::Integer(3));
        assert_eq!(coerce(" -42 ", FieldType::Unspecified), Value::Integer(-42));
    }

    #[test]
    fn integral_decimal_becomes_integer() {
        assert_eq!(coerce("3.0", FieldType::Unspecified), Value::Integer(3));
    }

    #[test]
    fn fractional_decimal_becomes_float() {
        assert_eq!(coerce("0.25", FieldType::Unspecified), Value::Float(0.25));
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(coerce("true", FieldType::Unspecified), Value::Bool(true));
        assert_eq!(coerce(" false", FieldType::Unspecified), Value::Bool(false));
        assert_eq!(
            coerce("True", FieldType::Unspecified),
            Value::String("True".to_string())
        );
    }

    #[test]
    fn declared_number_accepts_exponent_form() {
        assert_eq!(coerce("1e3", FieldType::Number), Value::Integer(1000));
        assert_eq!(
            coerce("1e3", FieldType::Unspecified),
            Value::String("1e3".to_string())
        );
    }

    #[test]
    fn declared_number_that_fails_falls_through() {
        assert_eq!(
            coerce("lots", FieldType::Number),
            Value::String("lots".to_string())
        );
        assert_eq!(coerce("true", FieldType::Number), Value::Bool(true));
        assert_eq!(
            coerce("inf", FieldType::Number),
            Value::String("inf".to_string())
        );
    }

    #[test]
    fn declared_boolean_is_true_only_for_literal_true() {
        assert_eq!(coerce("yes", FieldType::Boolean), Value::Bool(false));
        assert_eq!(coerce(" true ", FieldType::Boolean), Value::Bool(true));
    }

    #[test]
    fn plain_text_is_kept_untrimmed() {
        assert_eq!(
            coerce("  nginx:1.25 ", FieldType::Unspecified),
            Value::String("  nginx:1.25 ".to_string())
        );
        assert_eq!(coerce("", FieldType::Unspecified), Value::String(String::new()));
    }

    #[test]
    fn oversized_integer_text_becomes_float() {
        assert_eq!(
            coerce("99999999999999999999", FieldType::Unspecified),
            Value::Float(1e20)
        );
    }

    #[test]
    fn extreme_floats_use_exponent_form() {
        assert_eq!(format_literal(&Value::Float(1e20)), "1e+20");
        assert_eq!(format_literal(&Value::Float(1234567.5)), "1.2345675e+06");
        assert_eq!(format_literal(&Value::Float(-2.5e-7)), "-2.5e-07");
        assert_eq!(format_literal(&Value::Float(1e100)), "1e+100");
        assert_eq!(format_literal(&Value::Float(0.0001)), "0.0001");
        assert_eq!(format_literal(&Value::Float(0.0)), "0");
    }

    #[test]
    fn field_type_from_schema_type() {
        assert_eq!(FieldType::from_schema_type("integer"), FieldType::Number);
        assert_eq!(FieldType::from_schema_type("number"), FieldType::Number);
        assert_eq!(FieldType::from_schema_type("boolean"), FieldType::Boolean);
        assert_eq!(FieldType::from_schema_type("string"), FieldType::Unspecified);
    }

    #[test]
    fn format_literal_renders_schema_values() {
        assert_eq!(format_literal(&Value::from("nginx")), "nginx");
        assert_eq!(format_literal(&Value::Integer(3)), "3");
        assert_eq!(format_literal(&Value::Float(0.5)), "0.5");
        assert_eq!(format_literal(&Value::Float(123456.5)), "123456.5");
        assert_eq!(format_literal(&Value::Bool(false)), "false");
        assert_eq!(format_literal(&Value::Null), "");

        let mut map = Mapping::new();
        map.insert("cpu".to_string(), Value::from("100m"));
        assert_eq!(format_literal(&Value::Mapping(map)), r#"{cpu: "100m"}"#);
        assert_eq!(
            format_literal(&Value::Sequence(vec![Value::Integer(1), Value::Integer(2)])),
            "[1, 2]"
        );
    }
}
