use std::borrow::Cow;
use std::io;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::Result;
use crate::cloudevents::attributes::{extensions, require, resolve};
use crate::cloudevents::{CloudEventsWriteOptions, OUTCOME_ATTRIBUTE, SPEC_VERSION};
use crate::json::{AnnotatedEntries, BufferPool, JSON_CONTENT_TYPE, PooledBuffer};
use crate::metadata::{Annotation, Object, Value};
use crate::outcome::{Errors, Outcome};

/// Write `outcome` as a structured-mode CloudEvent into `sink`.
///
/// Successes carry `{ "value": ..., "metadata": ... }` as `data`, failures
/// `{ "errors": [...], "metadata": ... }`. The `outcome` attribute marks which one it is.
pub fn write_event<T, W>(outcome: &Outcome<T>, options: &CloudEventsWriteOptions, sink: W) -> Result<()>
where
	T: Serialize,
	W: io::Write,
{
	write_parts(outcome.as_result().map(Some), outcome.metadata(), options, sink)
}

/// Write a value-less outcome; successes without data metadata carry no `data`.
pub fn write_unit_event<W: io::Write>(outcome: &Outcome, options: &CloudEventsWriteOptions, sink: W) -> Result<()> {
	write_parts(outcome.as_result().map(|_| None::<&()>), outcome.metadata(), options, sink)
}

/// [`write_event`] into a buffer rented from `pool`.
pub fn to_event<'p, T: Serialize>(outcome: &Outcome<T>, options: &CloudEventsWriteOptions, pool: Option<&'p dyn BufferPool>) -> Result<PooledBuffer<'p>> {
	let mut buffer = PooledBuffer::rent(pool, 0);
	write_event(outcome, options, &mut buffer)?;
	Ok(buffer)
}

/// [`write_unit_event`] into a buffer rented from `pool`.
pub fn to_unit_event<'p>(outcome: &Outcome, options: &CloudEventsWriteOptions, pool: Option<&'p dyn BufferPool>) -> Result<PooledBuffer<'p>> {
	let mut buffer = PooledBuffer::rent(pool, 0);
	write_unit_event(outcome, options, &mut buffer)?;
	Ok(buffer)
}

fn write_parts<T, W>(state: std::result::Result<Option<&T>, &Errors>, metadata: Option<&Object>, options: &CloudEventsWriteOptions, mut sink: W) -> Result<()>
where
	T: Serialize,
	W: io::Write,
{
	let is_valid = state.is_ok();
	let explicit_type = if is_valid { options.success_type.as_deref() } else { options.failure_type.as_deref() };
	let data_metadata = metadata
		.map(|object| AnnotatedEntries::new(object, Annotation::EVENT_DATA))
		.filter(|entries| options.metadata_mode.includes(is_valid) && !entries.is_empty());

	let data = match state {
		Ok(Some(value)) => Some(EventData::Success { value: Some(value), metadata: data_metadata }),
		Ok(None) => data_metadata.map(|metadata| EventData::Success { value: None, metadata: Some(metadata) }),
		Err(errors) => Some(EventData::Failure { errors, metadata: data_metadata }),
	};

	let event = EventDocument {
		event_type: require("type", explicit_type, metadata)?,
		source: require("source", options.source.as_deref(), metadata)?,
		id: require("id", options.id.as_deref(), metadata)?,
		subject: resolve("subject", options.subject.as_deref(), metadata)?,
		time: resolve("time", options.time.as_deref(), metadata)?,
		data_schema: resolve("dataschema", options.data_schema.as_deref(), metadata)?,
		outcome: if is_valid { "success" } else { "failure" },
		extensions: extensions(metadata)?,
		data,
	};
	tracing::debug!(event_type = event.event_type, outcome = event.outcome, extensions = event.extensions.len(), has_data = event.data.is_some(), "writing cloud event");
	serde_json::to_writer(&mut sink, &event)?;
	Ok(())
}

struct EventDocument<'a, T> {
	event_type: &'a str,
	source: &'a str,
	id: &'a str,
	subject: Option<&'a str>,
	time: Option<&'a str>,
	data_schema: Option<&'a str>,
	outcome: &'static str,
	extensions: Vec<(&'a str, Cow<'a, Value>)>,
	data: Option<EventData<'a, T>>,
}

impl<T: Serialize> Serialize for EventDocument<'_, T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("specversion", SPEC_VERSION)?;
		map.serialize_entry("type", self.event_type)?;
		map.serialize_entry("source", self.source)?;
		map.serialize_entry("id", self.id)?;
		for (name, value) in [("subject", self.subject), ("time", self.time), ("dataschema", self.data_schema)] {
			if let Some(value) = value {
				map.serialize_entry(name, value)?;
			}
		}
		if self.data.is_some() {
			map.serialize_entry("datacontenttype", JSON_CONTENT_TYPE)?;
		}
		map.serialize_entry(OUTCOME_ATTRIBUTE, self.outcome)?;
		for (name, value) in &self.extensions {
			map.serialize_entry(name, value)?;
		}
		if let Some(data) = &self.data {
			map.serialize_entry("data", data)?;
		}
		map.end()
	}
}

enum EventData<'a, T> {
	Success { value: Option<&'a T>, metadata: Option<AnnotatedEntries<'a>> },
	Failure { errors: &'a Errors, metadata: Option<AnnotatedEntries<'a>> },
}

impl<T: Serialize> Serialize for EventData<'_, T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		let metadata = match self {
			Self::Success { value, metadata } => {
				if let Some(value) = value {
					map.serialize_entry("value", value)?;
				}
				metadata
			}
			Self::Failure { errors, metadata } => {
				map.serialize_entry("errors", errors)?;
				metadata
			}
		};
		if let Some(metadata) = metadata {
			map.serialize_entry("metadata", metadata)?;
		}
		map.end()
	}
}
