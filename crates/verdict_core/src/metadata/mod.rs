mod annotation;
mod array;
mod merge;
mod object;
mod value;

/// Placement flags describing where a value may be serialized.
pub use annotation::Annotation;
/// Immutable array view and its builder.
pub use array::{Array, ArrayBuilder};
/// Metadata merge strategies.
pub use merge::MergeStrategy;
/// Immutable, ordinally sorted object view and its builder.
pub use object::{Object, ObjectBuilder, ObjectIter};
/// Tagged metadata value and its kind.
pub use value::{Value, ValueKind};

pub(crate) use value::Repr;

#[cfg(test)]
mod tests;
