//! Bounded walk over a schema's property tree.

use std::collections::BTreeSet;

use crdform_document::{FieldPath, Value, format_literal};
use tracing::debug;

use crate::field::FieldDefinition;
use crate::node::SchemaNode;

/// Key used for the single example entry of a map-shaped node.
pub const MAP_ENTRY_KEY: &str = "exampleKey";

/// A field found during the walk, with the metadata ranking needs.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub field: FieldDefinition,
    pub required: bool,
    pub depth: usize,
    pub has_default: bool,
}

struct Frame<'a> {
    prefix: FieldPath,
    properties: std::vec::IntoIter<(&'a str, SchemaNode<'a>)>,
    required: BTreeSet<&'a str>,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn new(prefix: FieldPath, node: SchemaNode<'a>, depth: usize) -> Self {
        Self {
            prefix,
            properties: node.properties().into_iter(),
            required: node.required(),
            depth,
        }
    }
}

/// Collects field candidates below `schema`, whose properties are addressed
/// relative to `prefix`.
///
/// Properties are visited in name order, depth first. The walk uses an explicit
/// stack, so schema depth never translates into call depth, and stops as soon
/// as `limit` candidates exist.
pub(crate) fn collect_fields(
    prefix: FieldPath,
    schema: SchemaNode<'_>,
    max_depth: usize,
    limit: usize,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut stack = vec![Frame::new(prefix, schema, 0)];

    while let Some(frame) = stack.last_mut() {
        if out.len() >= limit {
            debug!(limit, "candidate limit reached");
            break;
        }
        let Some((name, node)) = frame.properties.next() else {
            stack.pop();
            continue;
        };
        let depth = frame.depth;

        if node.preserves_unknown_fields() && depth >= 2 {
            continue;
        }
        if depth > max_depth {
            continue;
        }
        if !FieldPath::is_valid_key(name) {
            debug!(name, "skipping property that cannot be addressed");
            continue;
        }

        let path = frame.prefix.child(name);
        let required = frame.required.contains(name);
        let description = node
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Inferred from CRD schema field '{name}'."));
        let default = node.default_value();

        if node.is_type("array") {
            let items = node.items();
            if let Some(items) = items.filter(|items| {
                items.has_properties() && !items.preserves_unknown_fields()
            }) {
                stack.push(Frame::new(path.index(0), items, depth));
                continue;
            }
            let field_type = items.map(|items| items.field_type()).unwrap_or_default();
            let value = match default {
                Some(Value::Sequence(values)) => values.first().map(format_literal),
                Some(other) => Some(format_literal(other)),
                None => items.and_then(|items| items.default_text()),
            };
            out.push(Candidate {
                field: FieldDefinition::new(path.index(0).to_string(), description)
                    .with_value(value.unwrap_or_default())
                    .with_type(field_type),
                required,
                depth,
                has_default: default.is_some(),
            });
            continue;
        }

        if node.has_properties() {
            if depth < max_depth && !node.preserves_unknown_fields() {
                stack.push(Frame::new(path, node, depth + 1));
            }
            continue;
        }

        if (node.is_type("object")
            || (node.type_name().is_empty() && node.declares_additional_properties()))
            && let Some(field) = map_entry_field(&path, node, &description)
        {
            out.push(Candidate {
                field,
                required,
                depth,
                has_default: default.is_some(),
            });
            continue;
        }

        out.push(Candidate {
            field: FieldDefinition::new(path.to_string(), description)
                .with_value(default.map(format_literal).unwrap_or_default())
                .with_type(node.field_type()),
            required,
            depth,
            has_default: default.is_some(),
        });
    }

    out
}

/// One example key/value pair standing in for a map-shaped node.
pub(crate) fn map_entry_field(
    path: &FieldPath,
    node: SchemaNode<'_>,
    description: &str,
) -> Option<FieldDefinition> {
    let additional = node.additional_properties()?;
    Some(
        FieldDefinition::new(
            path.child(MAP_ENTRY_KEY).to_string(),
            format!("{description} (map entry key/value)."),
        )
        .with_value(additional.default_text().unwrap_or_default())
        .with_type(additional.field_type()),
    )
}
