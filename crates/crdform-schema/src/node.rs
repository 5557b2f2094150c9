use std::collections::BTreeSet;

use crdform_document::{FieldType, Mapping, Value, format_literal};

const PRESERVE_UNKNOWN_FIELDS: &str = "x-kubernetes-preserve-unknown-fields";

/// Read-only view over one OpenAPI v3 schema object.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a>(&'a Mapping);

impl<'a> SchemaNode<'a> {
    pub fn new(mapping: &'a Mapping) -> Self {
        SchemaNode(mapping)
    }

    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_mapping().map(SchemaNode)
    }

    fn text(&self, key: &str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).map_or("", str::trim)
    }

    fn child(&self, key: &str) -> Option<SchemaNode<'a>> {
        self.0.get(key).and_then(SchemaNode::from_value)
    }

    /// The declared `type`, or an empty string.
    pub fn type_name(&self) -> &'a str {
        self.text("type")
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.type_name() == name
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::from_schema_type(self.type_name())
    }

    pub fn description(&self) -> Option<&'a str> {
        Some(self.text("description")).filter(|text| !text.is_empty())
    }

    /// Object-valued properties, sorted by name.
    pub fn properties(&self) -> Vec<(&'a str, SchemaNode<'a>)> {
        let Some(properties) = self.0.get("properties").and_then(Value::as_mapping) else {
            return Vec::new();
        };
        let mut out: Vec<_> = properties
            .iter()
            .filter_map(|(name, node)| Some((name.as_str(), SchemaNode::from_value(node)?)))
            .collect();
        out.sort_by(|left, right| left.0.cmp(right.0));
        out
    }

    /// Whether `properties` is a non-empty mapping.
    pub fn has_properties(&self) -> bool {
        self.0
            .get("properties")
            .and_then(Value::as_mapping)
            .is_some_and(|properties| !properties.is_empty())
    }

    pub fn property(&self, name: &str) -> Option<SchemaNode<'a>> {
        self.child("properties")?.child(name)
    }

    pub fn items(&self) -> Option<SchemaNode<'a>> {
        self.child("items")
    }

    pub fn additional_properties(&self) -> Option<SchemaNode<'a>> {
        self.child("additionalProperties")
    }

    /// `additionalProperties` is present with any non-null value, including `true`.
    pub fn declares_additional_properties(&self) -> bool {
        self.0
            .get("additionalProperties")
            .is_some_and(|value| !value.is_null())
    }

    pub fn required(&self) -> BTreeSet<&'a str> {
        self.0
            .get("required")
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn preserves_unknown_fields(&self) -> bool {
        self.0
            .get(PRESERVE_UNKNOWN_FIELDS)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The literal `default`, else the first `enum` entry.
    pub fn default_value(&self) -> Option<&'a Value> {
        if let Some(value) = self.0.get("default") {
            return Some(value);
        }
        self.0
            .get("enum")
            .and_then(Value::as_sequence)
            .and_then(|values| values.first())
    }

    pub fn default_text(&self) -> Option<String> {
        self.default_value().map(format_literal)
    }
}
