use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::metadata::Object;
use crate::outcome::{Error, ErrorCategory, Errors};

/// Rich error shape: `message` always, other members only when set.
/// `Unclassified` is the implied category and is not written.
impl Serialize for Error {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let len = 1 + usize::from(self.code.is_some()) + usize::from(self.target.is_some()) + usize::from(self.category != ErrorCategory::Unclassified) + usize::from(self.metadata.is_some());
		let mut map = serializer.serialize_map(Some(len))?;
		map.serialize_entry("message", &self.message)?;
		if let Some(code) = &self.code {
			map.serialize_entry("code", code)?;
		}
		if let Some(target) = &self.target {
			map.serialize_entry("target", target)?;
		}
		if self.category != ErrorCategory::Unclassified {
			map.serialize_entry("category", &self.category)?;
		}
		if let Some(metadata) = &self.metadata {
			map.serialize_entry("metadata", metadata)?;
		}
		map.end()
	}
}

#[derive(serde::Deserialize)]
struct ErrorRecord {
	message: String,
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	target: Option<String>,
	#[serde(default)]
	category: Option<ErrorCategory>,
	#[serde(default)]
	metadata: Option<Object>,
}

impl<'de> Deserialize<'de> for Error {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let record = ErrorRecord::deserialize(deserializer)?;
		if record.message.is_empty() {
			return Err(de::Error::custom("error message must not be empty"));
		}
		let mut error = Error::new(record.message).with_category(record.category.unwrap_or_default());
		error.code = record.code;
		error.target = record.target;
		if let Some(metadata) = record.metadata {
			error = error.with_metadata(metadata);
		}
		Ok(error)
	}
}

impl Serialize for Errors {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.len()))?;
		for error in self {
			seq.serialize_element(error)?;
		}
		seq.end()
	}
}

/// Non-empty JSON array of rich error objects.
impl<'de> Deserialize<'de> for Errors {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let errors = Vec::<Error>::deserialize(deserializer)?;
		Errors::from_vec(errors).map_err(de::Error::custom)
	}
}
