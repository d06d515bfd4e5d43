use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::value::RawValue;

use crate::cloudevents::attributes::is_extension_name;
use crate::cloudevents::{OUTCOME_ATTRIBUTE, SPEC_VERSION};
use crate::json::{BorrowedStr, is_json_content_type};
use crate::metadata::{Value, ValueKind};
use crate::{Result, VerdictError};

/// Byte range of the `data` member inside the parsed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataSpan {
	/// Offset of the first byte of `data`.
	pub start: usize,
	/// Length of `data` in bytes.
	pub len: usize,
}

impl DataSpan {
	/// One past the last byte of `data`.
	pub fn end(&self) -> usize {
		self.start + self.len
	}
}

/// Validated structured-mode event whose attributes borrow from the input buffer.
///
/// `data` is located but not parsed; see [`EventEnvelope::data`].
#[derive(Debug, Clone)]
pub struct EventEnvelope<'a> {
	/// `specversion`, always `1.0`.
	pub spec_version: Cow<'a, str>,
	/// `type`.
	pub event_type: Cow<'a, str>,
	/// `source`.
	pub source: Cow<'a, str>,
	/// `id`.
	pub id: Cow<'a, str>,
	/// `subject`.
	pub subject: Option<Cow<'a, str>>,
	/// `time`.
	pub time: Option<Cow<'a, str>>,
	/// `datacontenttype`.
	pub data_content_type: Option<Cow<'a, str>>,
	/// `dataschema`.
	pub data_schema: Option<Cow<'a, str>>,
	/// Outcome marker attribute, unvalidated.
	pub outcome: Option<Cow<'a, str>>,
	/// Extension attributes in document order; null values are dropped.
	pub extensions: Vec<(Cow<'a, str>, Value)>,
	/// Position of `data` in the input buffer.
	pub data_span: Option<DataSpan>,
	buffer: &'a [u8],
}

impl<'a> EventEnvelope<'a> {
	/// Raw JSON text of `data`, sliced from the input buffer.
	pub fn data(&self) -> Option<&'a [u8]> {
		self.data_span.and_then(|span| self.buffer.get(span.start..span.end()))
	}

	/// Whether `data` is present and not JSON `null`.
	pub fn has_data(&self) -> bool {
		self.data().is_some_and(|data| data != b"null")
	}

	/// Extension attribute `name`.
	pub fn extension(&self, name: &str) -> Option<&Value> {
		self.extensions.iter().find(|(key, _)| key == name).map(|(_, value)| value)
	}
}

/// Parse and validate a structured-mode CloudEvent in one pass over `bytes`.
///
/// Attributes borrow from `bytes` when unescaped, and `data` is recorded as a byte span
/// without being materialized. Rejects duplicate attributes, `data_base64`, missing
/// required attributes, a `specversion` other than `1.0`, non-JSON content types,
/// extension names outside lowercase ASCII letters and digits, and non-primitive
/// extension values.
pub fn parse_envelope(bytes: &[u8]) -> Result<EventEnvelope<'_>> {
	let fields: Fields<'_> = serde_json::from_slice(bytes)?;
	if let Some(violation) = fields.violation {
		return Err(violation.into_error());
	}

	let spec_version = fields.spec_version.ok_or(VerdictError::MissingAttribute { name: "specversion" })?;
	if spec_version != SPEC_VERSION {
		return Err(VerdictError::SpecVersionMismatch { found: spec_version.into_owned() });
	}
	let event_type = fields.event_type.ok_or(VerdictError::MissingAttribute { name: "type" })?;
	let source = fields.source.ok_or(VerdictError::MissingAttribute { name: "source" })?;
	let id = fields.id.ok_or(VerdictError::MissingAttribute { name: "id" })?;
	if let Some(content_type) = fields.data_content_type.as_deref().filter(|value| !is_json_content_type(value)) {
		return Err(VerdictError::UnsupportedContentType { content_type: content_type.to_owned() });
	}

	let data_span = fields.data.map(|raw| span_of(bytes, raw)).transpose()?;
	tracing::trace!(event_type = %event_type, start = data_span.map(|s| s.start), len = data_span.map(|s| s.len), "parsed event envelope");

	Ok(EventEnvelope {
		spec_version,
		event_type,
		source,
		id,
		subject: fields.subject,
		time: fields.time,
		data_content_type: fields.data_content_type,
		data_schema: fields.data_schema,
		outcome: fields.outcome,
		extensions: fields.extensions,
		data_span,
		buffer: bytes,
	})
}

/// Offset of `raw` inside `buffer`. Borrowed raw values always point into the input.
pub(super) fn span_of(buffer: &[u8], raw: &RawValue) -> Result<DataSpan> {
	let text = raw.get().as_bytes();
	if !buffer.as_ptr_range().contains(&text.as_ptr()) {
		return Err(VerdictError::DetachedEventData);
	}
	let start = text.as_ptr() as usize - buffer.as_ptr() as usize;
	if start + text.len() > buffer.len() {
		return Err(VerdictError::DetachedEventData);
	}
	Ok(DataSpan { start, len: text.len() })
}

/// First structural problem seen while streaming; the rest of the document is skipped.
enum Violation {
	Duplicate(String),
	Base64Data,
	NonPrimitiveExtension { name: String, kind: ValueKind },
	ExtensionName(String),
}

impl Violation {
	fn into_error(self) -> VerdictError {
		match self {
			Self::Duplicate(name) => VerdictError::DuplicateAttribute { name },
			Self::Base64Data => VerdictError::Base64DataUnsupported,
			Self::NonPrimitiveExtension { name, kind } => VerdictError::NonPrimitiveExtensionValue { name, kind },
			Self::ExtensionName(name) => VerdictError::MalformedExtensionName { name },
		}
	}
}

#[derive(Default)]
struct Fields<'a> {
	spec_version: Option<Cow<'a, str>>,
	event_type: Option<Cow<'a, str>>,
	source: Option<Cow<'a, str>>,
	id: Option<Cow<'a, str>>,
	subject: Option<Cow<'a, str>>,
	time: Option<Cow<'a, str>>,
	data_content_type: Option<Cow<'a, str>>,
	data_schema: Option<Cow<'a, str>>,
	outcome: Option<Cow<'a, str>>,
	extensions: Vec<(Cow<'a, str>, Value)>,
	data: Option<&'a RawValue>,
	seen_data: bool,
	seen_null_extensions: Vec<Cow<'a, str>>,
	violation: Option<Violation>,
}

impl<'a> Fields<'a> {
	fn attribute_slot(&mut self, name: &str) -> Option<&mut Option<Cow<'a, str>>> {
		match name {
			"specversion" => Some(&mut self.spec_version),
			"type" => Some(&mut self.event_type),
			"source" => Some(&mut self.source),
			"id" => Some(&mut self.id),
			"subject" => Some(&mut self.subject),
			"time" => Some(&mut self.time),
			"datacontenttype" => Some(&mut self.data_content_type),
			"dataschema" => Some(&mut self.data_schema),
			OUTCOME_ATTRIBUTE => Some(&mut self.outcome),
			_ => None,
		}
	}

	fn has_extension(&self, name: &str) -> bool {
		self.extensions.iter().any(|(key, _)| key == name) || self.seen_null_extensions.iter().any(|key| key == name)
	}
}

impl<'de: 'a, 'a> Deserialize<'de> for Fields<'a> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct FieldsVisitor<'a>(std::marker::PhantomData<&'a ()>);

		impl<'de: 'a, 'a> Visitor<'de> for FieldsVisitor<'a> {
			type Value = Fields<'a>;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a CloudEvents JSON object")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
				let mut fields = Fields::default();
				while let Some(BorrowedStr(name)) = map.next_key::<BorrowedStr<'de>>()? {
					if fields.violation.is_some() {
						map.next_value::<IgnoredAny>()?;
						continue;
					}
					if let Some(slot) = fields.attribute_slot(&name) {
						let BorrowedStr(value) = map.next_value::<BorrowedStr<'de>>().map_err(|_| <A::Error as de::Error>::custom(format_args!("attribute {name:?} must be a string")))?;
						if slot.replace(value).is_some() {
							fields.violation = Some(Violation::Duplicate(name.into_owned()));
						}
						continue;
					}
					match name.as_ref() {
						"data" => {
							let raw = map.next_value::<&'de RawValue>()?;
							if std::mem::replace(&mut fields.seen_data, true) {
								fields.violation = Some(Violation::Duplicate(name.into_owned()));
							}
							fields.data = Some(raw);
						}
						"data_base64" => {
							map.next_value::<IgnoredAny>()?;
							fields.violation = Some(Violation::Base64Data);
						}
						_ => {
							let value = map.next_value::<Value>()?;
							if fields.has_extension(&name) {
								fields.violation = Some(Violation::Duplicate(name.into_owned()));
							} else if !is_extension_name(&name) {
								fields.violation = Some(Violation::ExtensionName(name.into_owned()));
							} else if !value.is_primitive() {
								fields.violation = Some(Violation::NonPrimitiveExtension {
									name: name.into_owned(),
									kind: value.kind(),
								});
							} else if value.is_null() {
								fields.seen_null_extensions.push(name);
							} else {
								fields.extensions.push((name, value));
							}
						}
					}
				}
				Ok(fields)
			}
		}

		deserializer.deserialize_map(FieldsVisitor(std::marker::PhantomData))
	}
}
