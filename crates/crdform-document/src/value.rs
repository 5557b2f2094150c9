use core::fmt::{self, Display};

use indexmap::IndexMap;
use thiserror::Error;

use crate::coerce::format_float;
use crate::path::{FieldPath, PathSegment};

/// Ordered mapping; keys keep their first-insertion position.
pub type Mapping = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Sequence => write!(f, "sequence"),
            Self::Mapping => write!(f, "mapping"),
        }
    }
}

/// A write through a [`FieldPath`] met a node of the wrong shape.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {path}")]
pub struct InsertError {
    pub kind: InsertErrorKind,
    /// Location of the node that could not be descended into.
    pub path: FieldPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertErrorKind {
    #[error("Expected mapping but found {found}")]
    ExpectedMapping { found: ValueKind },
    #[error("Expected sequence but found {found}")]
    ExpectedSequence { found: ValueKind },
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        if let Self::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        if let Self::Sequence(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        if let Self::Mapping(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Looks up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Reads the node addressed by `path`.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(self, |current, segment| match (segment, current) {
                (PathSegment::Key(key), Value::Mapping(map)) => map.get(key.as_str()),
                (PathSegment::Index(index), Value::Sequence(items)) => items.get(*index),
                _ => None,
            })
    }

    /// Writes `value` at `path`, creating missing mappings and sequences on the way.
    ///
    /// Null nodes count as missing. Sequences shorter than an addressed index
    /// are padded with nulls. Containers are only ever created below the deepest
    /// existing node, so when a segment meets an incompatible node the tree is
    /// returned unchanged together with the offending location.
    pub fn set_path(&mut self, path: &FieldPath, value: Value) -> Result<(), InsertError> {
        let segments = path.segments();
        let mut current = self;
        for (position, segment) in segments.iter().enumerate() {
            current = current.child_mut(segment).map_err(|kind| InsertError {
                kind,
                path: path.prefix(position),
            })?;
        }
        *current = value;
        Ok(())
    }

    fn child_mut(&mut self, segment: &PathSegment) -> Result<&mut Value, InsertErrorKind> {
        match segment {
            PathSegment::Key(key) => {
                if self.is_null() {
                    *self = Value::Mapping(Mapping::new());
                }
                match self {
                    Value::Mapping(map) => Ok(map.entry(key.clone()).or_insert(Value::Null)),
                    other => Err(InsertErrorKind::ExpectedMapping {
                        found: other.kind(),
                    }),
                }
            }
            PathSegment::Index(index) => {
                if self.is_null() {
                    *self = Value::Sequence(Vec::new());
                }
                match self {
                    Value::Sequence(items) => {
                        if items.len() <= *index {
                            items.resize(*index + 1, Value::Null);
                        }
                        Ok(&mut items[*index])
                    }
                    other => Err(InsertErrorKind::ExpectedSequence {
                        found: other.kind(),
                    }),
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Compact flow form: `{name: "a", ports: [80, 443]}`.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::String(s) => write_quoted(f, s),
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if is_plain_key(key) {
                        write!(f, "{key}")?;
                    } else {
                        write_quoted(f, key)?;
                    }
                    write!(f, ": {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

fn is_plain_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
}
