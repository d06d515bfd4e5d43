use std::borrow::Cow;

use crate::cloudevents::OUTCOME_ATTRIBUTE;
use crate::metadata::{Annotation, Object, Value};
use crate::{Result, VerdictError};

/// Context attributes the writer resolves from options or metadata.
pub(crate) const STANDARD: [&str; 6] = ["type", "source", "id", "subject", "time", "dataschema"];

/// Names metadata can never supply.
pub(crate) const RESERVED: [&str; 5] = ["data", "data_base64", "specversion", "datacontenttype", OUTCOME_ATTRIBUTE];

/// Extension attribute names are lowercase ASCII letters and digits.
pub(crate) fn is_extension_name(name: &str) -> bool {
	!name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Call-site value first, then a string metadata entry annotated for extension attributes.
pub(crate) fn resolve<'a>(name: &'static str, explicit: Option<&'a str>, metadata: Option<&'a Object>) -> Result<Option<&'a str>> {
	if let Some(value) = explicit {
		return Ok(Some(value));
	}
	let Some(value) = metadata.and_then(|object| object.get(name)).filter(|value| value.annotation().contains(Annotation::EVENT_EXTENSION)) else {
		return Ok(None);
	};
	match value.as_str() {
		Some(text) => Ok(Some(text)),
		None => Err(VerdictError::AttributeNotString {
			name: name.to_owned(),
			kind: value.kind(),
		}),
	}
}

/// Like [`resolve`], failing when neither source has the attribute.
pub(crate) fn require<'a>(name: &'static str, explicit: Option<&'a str>, metadata: Option<&'a Object>) -> Result<&'a str> {
	resolve(name, explicit, metadata)?.ok_or(VerdictError::UnresolvedAttribute { name })
}

/// Extension attributes from metadata, in key order. Standard attribute names are
/// skipped since [`resolve`] already consumed them; nulls are dropped. Arrays of
/// primitives become one string of their items joined with `", "`, since extension
/// attributes only carry scalars.
pub(crate) fn extensions(metadata: Option<&Object>) -> Result<Vec<(&str, Cow<'_, Value>)>> {
	let Some(metadata) = metadata else {
		return Ok(Vec::new());
	};
	let mut out = Vec::new();
	for (name, value) in metadata {
		if !value.annotation().contains(Annotation::EVENT_EXTENSION) || STANDARD.contains(&name) {
			continue;
		}
		if RESERVED.contains(&name) {
			return Err(VerdictError::ReservedAttribute { name: name.to_owned() });
		}
		if !is_extension_name(name) {
			return Err(VerdictError::InvalidExtensionAttributeName { name: name.to_owned() });
		}
		let rendered = match value.as_array() {
			Some(items) if items.iter().all(Value::is_primitive) => match value.placement_text() {
				Some(text) => Cow::Owned(Value::string(text)),
				None => continue,
			},
			_ if !value.is_primitive() => {
				return Err(VerdictError::NonPrimitiveExtensionAttribute {
					name: name.to_owned(),
					kind: value.kind(),
				});
			}
			_ if value.is_null() => continue,
			_ => Cow::Borrowed(value),
		};
		out.push((name, rendered));
	}
	Ok(out)
}
