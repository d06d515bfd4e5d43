use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::metadata::{Annotation, Array, Object};
use crate::{Result, VerdictError};

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// JSON `null`.
	Null,
	/// `true` or `false`.
	Boolean,
	/// Signed 64-bit integer.
	Int64,
	/// Finite double.
	Double,
	/// UTF-8 string.
	String,
	/// Ordered list of values.
	Array,
	/// String-keyed map of values.
	Object,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Boolean => "boolean",
			Self::Int64 => "int64",
			Self::Double => "double",
			Self::String => "string",
			Self::Array => "array",
			Self::Object => "object",
		}
	}

	/// Whether values of this kind are scalars.
	pub fn is_primitive(self) -> bool {
		!matches!(self, Self::Array | Self::Object)
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone)]
pub(crate) enum Repr {
	Null,
	Boolean(bool),
	Int64(i64),
	Double(f64),
	String(Arc<str>),
	Array(Array),
	Object(Object),
}

/// Metadata value: a small tagged union plus its placement [`Annotation`].
///
/// Strings and containers are reference counted, so clones are cheap. Equality and
/// hashing look at the data only and ignore the annotation.
#[derive(Debug, Clone)]
pub struct Value {
	repr: Repr,
	annotation: Annotation,
}

impl Value {
	/// JSON `null` with the default annotation.
	pub const fn null() -> Self {
		Self::from_repr(Repr::Null)
	}

	/// Boolean value.
	pub const fn bool(value: bool) -> Self {
		Self::from_repr(Repr::Boolean(value))
	}

	/// 64-bit integer value.
	pub const fn int(value: i64) -> Self {
		Self::from_repr(Repr::Int64(value))
	}

	/// Double value; NaN and infinities are rejected, `-0.0` becomes `0.0`.
	pub fn double(value: f64) -> Result<Self> {
		if !value.is_finite() {
			return Err(VerdictError::NonFiniteNumber { value });
		}
		let value = if value == 0.0 { 0.0 } else { value };
		Ok(Self::from_repr(Repr::Double(value)))
	}

	/// String value.
	pub fn string(value: impl Into<Arc<str>>) -> Self {
		Self::from_repr(Repr::String(value.into()))
	}

	/// High-precision decimal stored in its canonical (normalized) string form.
	pub fn decimal(value: Decimal) -> Self {
		Self::string(value.normalize().to_string())
	}

	/// Array value.
	pub fn array(value: Array) -> Self {
		Self::from_repr(Repr::Array(value))
	}

	/// Object value.
	pub fn object(value: Object) -> Self {
		Self::from_repr(Repr::Object(value))
	}

	/// Replace the annotation, validating that primitive-only placements hold a primitive
	/// value or an array of primitives.
	pub fn with_annotation(mut self, annotation: Annotation) -> Result<Self> {
		if annotation.requires_primitive() && !self.fits_primitive_placement() {
			return Err(VerdictError::IncompatibleAnnotation {
				kind: self.kind(),
				annotation,
			});
		}
		self.annotation = annotation;
		Ok(self)
	}

	/// Placement flags.
	pub fn annotation(&self) -> Annotation {
		self.annotation
	}

	/// Value discriminant.
	pub fn kind(&self) -> ValueKind {
		match &self.repr {
			Repr::Null => ValueKind::Null,
			Repr::Boolean(_) => ValueKind::Boolean,
			Repr::Int64(_) => ValueKind::Int64,
			Repr::Double(_) => ValueKind::Double,
			Repr::String(_) => ValueKind::String,
			Repr::Array(_) => ValueKind::Array,
			Repr::Object(_) => ValueKind::Object,
		}
	}

	/// Whether this is `null`.
	pub fn is_null(&self) -> bool {
		matches!(self.repr, Repr::Null)
	}

	/// Whether this is a scalar (null, boolean, number or string).
	pub fn is_primitive(&self) -> bool {
		self.kind().is_primitive()
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self.repr {
			Repr::Boolean(value) => Some(value),
			_ => None,
		}
	}

	/// Integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		match self.repr {
			Repr::Int64(value) => Some(value),
			_ => None,
		}
	}

	/// Double payload.
	pub fn as_f64(&self) -> Option<f64> {
		match self.repr {
			Repr::Double(value) => Some(value),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match &self.repr {
			Repr::String(value) => Some(value),
			_ => None,
		}
	}

	/// Array payload.
	pub fn as_array(&self) -> Option<&Array> {
		match &self.repr {
			Repr::Array(value) => Some(value),
			_ => None,
		}
	}

	/// Object payload.
	pub fn as_object(&self) -> Option<&Object> {
		match &self.repr {
			Repr::Object(value) => Some(value),
			_ => None,
		}
	}

	/// Reinterpret a canonical decimal string (or an integer) as a [`Decimal`].
	pub fn as_decimal(&self) -> Option<Decimal> {
		match &self.repr {
			Repr::String(value) => Decimal::from_str(value).ok(),
			Repr::Int64(value) => Some(Decimal::from(*value)),
			_ => None,
		}
	}

	pub(crate) const fn from_repr(repr: Repr) -> Self {
		Self {
			repr,
			annotation: Annotation::BODIES,
		}
	}

	/// Objects never carry primitive-only placements, so annotations copied between them need no check.
	pub(crate) fn with_annotation_unchecked(mut self, annotation: Annotation) -> Self {
		self.annotation = annotation;
		self
	}

	pub(crate) fn repr(&self) -> &Repr {
		&self.repr
	}

	/// Single-line text for primitive-only placements: a primitive's display form, or the
	/// non-null items of an array joined with `", "`. `None` for null, objects and arrays
	/// with nothing to render.
	pub(crate) fn placement_text(&self) -> Option<String> {
		match &self.repr {
			Repr::Array(items) => {
				let parts: Vec<String> = items.iter().filter_map(Value::primitive_text).collect();
				(!parts.is_empty()).then(|| parts.join(", "))
			}
			_ => self.primitive_text(),
		}
	}

	fn primitive_text(&self) -> Option<String> {
		match &self.repr {
			Repr::Null | Repr::Array(_) | Repr::Object(_) => None,
			Repr::Boolean(flag) => Some(flag.to_string()),
			Repr::Int64(number) => Some(number.to_string()),
			Repr::Double(number) => Some(number.to_string()),
			Repr::String(text) => Some(text.to_string()),
		}
	}

	fn fits_primitive_placement(&self) -> bool {
		match &self.repr {
			Repr::Object(_) => false,
			Repr::Array(items) => items.iter().all(Value::is_primitive),
			_ => true,
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Self::null()
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (&self.repr, &other.repr) {
			(Repr::Null, Repr::Null) => true,
			(Repr::Boolean(a), Repr::Boolean(b)) => a == b,
			(Repr::Int64(a), Repr::Int64(b)) => a == b,
			(Repr::Double(a), Repr::Double(b)) => a.to_bits() == b.to_bits(),
			(Repr::String(a), Repr::String(b)) => a == b,
			(Repr::Array(a), Repr::Array(b)) => a == b,
			(Repr::Object(a), Repr::Object(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.kind().hash(state);
		match &self.repr {
			Repr::Null => {}
			Repr::Boolean(value) => value.hash(state),
			Repr::Int64(value) => value.hash(state),
			Repr::Double(value) => value.to_bits().hash(state),
			Repr::String(value) => value.hash(state),
			Repr::Array(value) => value.hash(state),
			Repr::Object(value) => value.hash(state),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::int(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::int(i64::from(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		match i64::try_from(value) {
			Ok(value) => Self::int(value),
			Err(_) => Self::from_repr(Repr::Double(value as f64)),
		}
	}
}

impl TryFrom<f64> for Value {
	type Error = VerdictError;

	fn try_from(value: f64) -> Result<Self> {
		Self::double(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::string(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::string(value)
	}
}

impl From<Arc<str>> for Value {
	fn from(value: Arc<str>) -> Self {
		Self::string(value)
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Self::decimal(value)
	}
}

impl From<Array> for Value {
	fn from(value: Array) -> Self {
		Self::array(value)
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Self::object(value)
	}
}
