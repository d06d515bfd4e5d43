use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;

mod errors;
mod pool;
mod text;
mod value;

/// Buffer pool abstraction and pooled writer.
pub use pool::{BufferPool, PooledBuffer, SlabBufferPool};
/// Writer for the metadata entries carrying one placement flag.
pub use value::AnnotatedEntries;

pub(crate) use text::BorrowedStr;

/// Media type for JSON payloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// When outcome metadata is written into bodies and event `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataSerializationMode {
	/// Only failures carry metadata in the payload.
	#[default]
	ErrorsOnly,
	/// Successes and failures both carry metadata.
	Always,
}

impl MetadataSerializationMode {
	/// Whether metadata belongs in the payload of an outcome with the given validity.
	pub fn includes(self, is_valid: bool) -> bool {
		match self {
			Self::ErrorsOnly => !is_valid,
			Self::Always => true,
		}
	}
}

/// Media type essence of a `Content-Type` value: parameters and surrounding
/// whitespace removed, still in its original case.
pub fn media_type(content_type: &str) -> &str {
	content_type.split(';').next().unwrap_or_default().trim()
}

/// Whether `content_type` names a JSON payload: `application/json`, `text/json` or any
/// `+json` structured syntax suffix, parameters allowed.
pub fn is_json_content_type(content_type: &str) -> bool {
	let essence = media_type(content_type);
	essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE)
		|| essence.eq_ignore_ascii_case("text/json")
		|| (essence.len() > 5 && essence.get(essence.len() - 5..).is_some_and(|suffix| suffix.eq_ignore_ascii_case("+json")))
}

/// Write `value` as JSON into `sink` using its host `Serialize` implementation.
pub fn to_writer<T, W>(sink: W, value: &T) -> Result<()>
where
	T: Serialize + ?Sized,
	W: io::Write,
{
	serde_json::to_writer(sink, value)?;
	Ok(())
}

/// Read a `T` from a JSON byte slice using its host `Deserialize` implementation.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
	Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests;
