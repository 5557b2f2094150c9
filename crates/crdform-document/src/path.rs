use core::fmt::{self, Display};
use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Largest sequence index a path may address.
///
/// Writing `a[n]` backfills every slot below `n` with nulls, so the index is
/// bounded to keep a single field from allocating an arbitrarily large array.
pub const MAX_SEQUENCE_INDEX: usize = 10_000;

static SEGMENT_PARSER: LazyLock<SegmentParser> = LazyLock::new(SegmentParser::init);

/// Splits one dot-separated part (`containers[0][1]`) into its key and indices.
struct SegmentParser {
    segment: Regex,
    index: Regex,
}

impl SegmentParser {
    fn init() -> Self {
        Self {
            segment: Regex::new(r"^([^.\[\]]+)((?:\[[^\[\]]*\])*)$").unwrap(),
            index: Regex::new(r"\[([^\[\]]*)\]").unwrap(),
        }
    }

    fn parse_into(&self, part: &str, out: &mut Vec<PathSegment>) -> Result<(), PathError> {
        let Some(captures) = self.segment.captures(part) else {
            return Err(PathError::MalformedSegment {
                segment: part.to_string(),
            });
        };

        out.push(PathSegment::Key(captures[1].to_string()));

        let indices = captures.get(2).map_or("", |m| m.as_str());
        for index in self.index.captures_iter(indices) {
            let text = &index[1];
            let parsed = text
                .parse::<usize>()
                .ok()
                .filter(|value| *value <= MAX_SEQUENCE_INDEX)
                .ok_or_else(|| PathError::InvalidIndex {
                    segment: part.to_string(),
                    index: text.to_string(),
                })?;
            out.push(PathSegment::Index(parsed));
        }
        Ok(())
    }
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key, written as a bare dot-separated name.
    Key(String),
    /// Sequence position, written as `[n]` right after the key it indexes.
    Index(usize),
}

/// A parsed field address such as `spec.template.spec.containers[0].image`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<PathSegment>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Empty path")]
    Empty,
    #[error("Empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("Malformed path segment '{segment}'")]
    MalformedSegment { segment: String },
    #[error("Invalid index '{index}' in segment '{segment}'")]
    InvalidIndex { segment: String, index: String },
}

impl FieldPath {
    /// Path consisting of a single mapping key.
    pub fn key(key: impl Into<String>) -> Self {
        FieldPath(vec![PathSegment::Key(key.into())])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns a new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        FieldPath(segments)
    }

    /// Returns a new path with `[index]` appended.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        FieldPath(segments)
    }

    /// The first `len` segments of this path.
    pub fn prefix(&self, len: usize) -> Self {
        FieldPath(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Whether `key` can appear as a bare key segment and still parse back.
    pub fn is_valid_key(key: &str) -> bool {
        !key.trim().is_empty() && !key.contains(['.', '[', ']'])
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for (position, part) in s.split('.').enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment { position });
            }
            SEGMENT_PARSER.parse_into(part, &mut segments)?;
        }
        Ok(FieldPath(segments))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
