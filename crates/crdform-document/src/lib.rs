//! Value model shared by schema extraction and manifest generation.
//!
//! Both the schema being walked and the manifest being built are plain
//! [`Value`] trees. Locations inside them are addressed with [`FieldPath`]
//! (`spec.containers[0].image`), and textual form input is turned into typed
//! scalars with [`coerce`].

/// Conversion between textual field values and typed scalars.
pub mod coerce;

/// Dotted/indexed addresses into a value tree.
pub mod path;

/// The tagged value tree.
pub mod value;

pub use coerce::{FieldType, coerce, format_literal};
pub use path::{FieldPath, MAX_SEQUENCE_INDEX, PathError, PathSegment};
pub use value::{InsertError, InsertErrorKind, Mapping, Value, ValueKind};
