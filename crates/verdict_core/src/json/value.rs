use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::json::BorrowedStr;
use crate::metadata::{Annotation, Array, ArrayBuilder, Object, ObjectBuilder, Repr, Value, ValueKind};

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self.repr() {
			Repr::Null => serializer.serialize_unit(),
			Repr::Boolean(value) => serializer.serialize_bool(*value),
			Repr::Int64(value) => serializer.serialize_i64(*value),
			Repr::Double(value) => serializer.serialize_f64(*value),
			Repr::String(value) => serializer.serialize_str(value),
			Repr::Array(value) => value.serialize(serializer),
			Repr::Object(value) => value.serialize(serializer),
		}
	}
}

impl Serialize for Array {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.len()))?;
		for item in self {
			seq.serialize_element(item)?;
		}
		seq.end()
	}
}

impl Serialize for Object {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (key, value) in self {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

/// Top-level entries of an [`Object`] whose annotation includes a placement flag.
///
/// Serializes as a JSON object holding only the matching entries; nested values are
/// written whole.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedEntries<'a> {
	object: &'a Object,
	annotation: Annotation,
}

impl<'a> AnnotatedEntries<'a> {
	/// Select entries of `object` annotated with any flag in `annotation`.
	pub fn new(object: &'a Object, annotation: Annotation) -> Self {
		Self { object, annotation }
	}

	/// Iterate matching entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
		let annotation = self.annotation;
		self.object.iter().filter(move |(_, value)| value.annotation().intersects(annotation))
	}

	/// Whether no entry matches.
	pub fn is_empty(&self) -> bool {
		self.iter().next().is_none()
	}
}

impl Serialize for AnnotatedEntries<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.iter().count()))?;
		for (key, value) in self.iter() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a JSON value")
	}

	fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::null())
	}

	fn visit_none<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::null())
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
		Value::deserialize(deserializer)
	}

	fn visit_bool<E: de::Error>(self, value: bool) -> Result<Value, E> {
		Ok(Value::bool(value))
	}

	fn visit_i64<E: de::Error>(self, value: i64) -> Result<Value, E> {
		Ok(Value::int(value))
	}

	fn visit_u64<E: de::Error>(self, value: u64) -> Result<Value, E> {
		Ok(Value::from(value))
	}

	fn visit_f64<E: de::Error>(self, value: f64) -> Result<Value, E> {
		Value::double(value).map_err(E::custom)
	}

	fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
		Ok(Value::string(value))
	}

	fn visit_string<E: de::Error>(self, value: String) -> Result<Value, E> {
		Ok(Value::string(value))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
		let mut builder = ArrayBuilder::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element::<Value>()? {
			builder.add(item);
		}
		Ok(Value::array(builder.build()))
	}

	fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
		visit_object(map).map(Value::object)
	}
}

fn visit_object<'de, A: MapAccess<'de>>(mut map: A) -> Result<Object, A::Error> {
	let mut builder = ObjectBuilder::with_capacity(map.size_hint().unwrap_or(0));
	while let Some(BorrowedStr(key)) = map.next_key::<BorrowedStr<'de>>()? {
		let value = map.next_value::<Value>()?;
		builder.add(Arc::<str>::from(key), value);
	}
	builder.build().map_err(de::Error::custom)
}

/// Integral numbers within `i64` become `Int64`, every other number becomes `Double`,
/// strings stay strings. Values read from the wire carry [`Annotation::BODIES`].
impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(ValueVisitor)
	}
}

impl<'de> Deserialize<'de> for Array {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		match value.as_array() {
			Some(array) => Ok(array.clone()),
			None => Err(de::Error::custom(format_args!("expected an array, got {}", value.kind()))),
		}
	}
}

impl<'de> Deserialize<'de> for Object {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct ObjectVisitor;

		impl<'de> Visitor<'de> for ObjectVisitor {
			type Value = Object;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "a JSON {}", ValueKind::Object)
			}

			fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Object, A::Error> {
				visit_object(map)
			}
		}

		deserializer.deserialize_map(ObjectVisitor)
	}
}
