use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::metadata::{Annotation, Object};
use crate::{Result, VerdictError};

/// Maps a metadata key onto the HTTP header name it is written under.
pub trait HeaderNameConversion: fmt::Debug + Send + Sync {
	/// Header name for metadata `key`.
	fn header_name<'a>(&self, key: &'a str) -> Cow<'a, str>;
}

/// Uses metadata keys as header names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimHeaderNames;

impl HeaderNameConversion for VerbatimHeaderNames {
	fn header_name<'a>(&self, key: &'a str) -> Cow<'a, str> {
		Cow::Borrowed(key)
	}
}

/// Explicit key-to-header table; unmapped keys are used verbatim.
#[derive(Debug, Clone, Default)]
pub struct MappedHeaderNames {
	names: HashMap<String, String>,
}

impl MappedHeaderNames {
	/// Build from `(metadata key, header name)` pairs.
	pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			names: pairs.into_iter().map(|(key, name)| (key.into(), name.into())).collect(),
		}
	}
}

impl HeaderNameConversion for MappedHeaderNames {
	fn header_name<'a>(&self, key: &'a str) -> Cow<'a, str> {
		match self.names.get(key) {
			Some(name) => Cow::Owned(name.clone()),
			None => Cow::Borrowed(key),
		}
	}
}

/// RFC 9110 `token`: one or more tchar.
pub(crate) fn is_token(name: &str) -> bool {
	!name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Field values may not break the header line: no CR, LF or NUL.
pub(crate) fn is_field_value(value: &str) -> bool {
	!value.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0'))
}

/// Headers for every top-level metadata entry annotated [`Annotation::HTTP_HEADER`].
pub(crate) fn collect_headers(metadata: Option<&Object>, names: &dyn HeaderNameConversion) -> Result<Vec<(String, String)>> {
	let Some(metadata) = metadata else {
		return Ok(Vec::new());
	};
	let mut headers = Vec::new();
	for (key, value) in metadata {
		if !value.annotation().contains(Annotation::HTTP_HEADER) {
			continue;
		}
		let Some(rendered) = value.placement_text() else {
			continue;
		};
		let name = names.header_name(key);
		if !is_token(&name) {
			return Err(VerdictError::InvalidHeaderName { name: name.into_owned() });
		}
		if !is_field_value(&rendered) {
			return Err(VerdictError::InvalidHeaderValue { name: name.into_owned() });
		}
		tracing::trace!(key, header = %name, "metadata routed to header");
		headers.push((name.into_owned(), rendered));
	}
	Ok(headers)
}
