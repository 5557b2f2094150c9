use crdform_document::{Mapping, Value};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::{Error, Result};

/// Convert a Value to YAML
pub fn value_to_yaml(value: &Value) -> YamlValue {
    match value {
        Value::Null => YamlValue::Null,
        Value::Bool(b) => YamlValue::Bool(*b),
        Value::Integer(i) => YamlValue::Number((*i).into()),
        Value::Float(f) => YamlValue::Number((*f).into()),
        Value::String(s) => YamlValue::String(s.clone()),
        Value::Sequence(items) => YamlValue::Sequence(items.iter().map(value_to_yaml).collect()),
        Value::Mapping(map) => {
            let mut yaml_map = serde_yaml::Mapping::new();
            for (k, v) in map {
                yaml_map.insert(YamlValue::String(k.clone()), value_to_yaml(v));
            }
            YamlValue::Mapping(yaml_map)
        }
    }
}

/// Convert YAML to Value
///
/// Scalar mapping keys are stringified and tags are dropped.
pub fn yaml_to_value(yaml: &YamlValue) -> Result<Value> {
    match yaml {
        YamlValue::Null => Ok(Value::Null),
        YamlValue::Bool(b) => Ok(Value::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(Error::ConversionError("Invalid number value".to_string()))
            }
        }
        YamlValue::String(s) => Ok(Value::String(s.clone())),
        YamlValue::Sequence(seq) => {
            let values: Result<Vec<_>> = seq.iter().map(yaml_to_value).collect();
            Ok(Value::Sequence(values?))
        }
        YamlValue::Mapping(map) => {
            let mut result = Mapping::with_capacity(map.len());
            for (k, v) in map {
                result.insert(yaml_key_to_string(k)?, yaml_to_value(v)?);
            }
            Ok(Value::Mapping(result))
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn yaml_key_to_string(yaml: &YamlValue) -> Result<String> {
    match yaml {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key_to_string(&tagged.value),
        _ => Err(Error::ConversionError(
            "Cannot use a sequence or mapping as a mapping key".to_string(),
        )),
    }
}

/// Parses every document of a (possibly multi-document) YAML stream.
///
/// Empty documents and bare `null` documents are skipped.
pub fn parse_documents(raw: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(raw) {
        let yaml = YamlValue::deserialize(document)?;
        let value = yaml_to_value(&yaml)?;
        let empty = match &value {
            Value::Null => true,
            Value::Mapping(map) => map.is_empty(),
            _ => false,
        };
        if !empty {
            documents.push(value);
        }
    }
    if documents.is_empty() {
        return Err(Error::NoDocuments);
    }
    Ok(documents)
}

/// Serializes a value as a single block-style YAML document.
pub fn to_yaml_string(value: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(&value_to_yaml(value))?)
}
