use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::cloudevents::{CloudEventsReadOptions, EventEnvelope, parse_envelope};
use crate::metadata::{Annotation, Object, ObjectBuilder};
use crate::outcome::{Errors, Outcome};
use crate::{Result, VerdictError};

/// Read a structured-mode CloudEvent into an outcome.
///
/// The event is classified by its `outcome` attribute, falling back to
/// [`CloudEventsReadOptions::classifier`]. Outcome metadata is the `data` metadata
/// merged with the extension attributes, which win on conflicting keys.
pub fn read_event<T: DeserializeOwned>(bytes: &[u8], options: &CloudEventsReadOptions) -> Result<Outcome<T>> {
	let envelope = parse_envelope(bytes)?;
	let is_failure = classify(&envelope, options)?;
	let data = envelope.data().filter(|_| envelope.has_data());

	if is_failure {
		return read_failure(&envelope, data);
	}
	let data = data.ok_or(VerdictError::MissingEventData { outcome: "success" })?;
	let record: SuccessData<T> = serde_json::from_slice(data)?;
	Ok(Outcome::from_parts(Ok(record.value), merge_extensions(record.metadata, &envelope)?))
}

/// Read a value-less CloudEvent; successes may omit `data`.
pub fn read_unit_event(bytes: &[u8], options: &CloudEventsReadOptions) -> Result<Outcome> {
	let envelope = parse_envelope(bytes)?;
	let is_failure = classify(&envelope, options)?;
	let data = envelope.data().filter(|_| envelope.has_data());

	if is_failure {
		return read_failure(&envelope, data);
	}
	let metadata = match data {
		Some(data) => serde_json::from_slice::<UnitData>(data)?.metadata,
		None => None,
	};
	Ok(Outcome::from_parts(Ok(()), merge_extensions(metadata, &envelope)?))
}

/// `true` for failures: the `outcome` attribute decides, then the classifier.
fn classify(envelope: &EventEnvelope<'_>, options: &CloudEventsReadOptions) -> Result<bool> {
	if let Some(marker) = envelope.outcome.as_deref() {
		let is_failure = match marker {
			"success" => false,
			"failure" => true,
			other => return Err(VerdictError::InvalidOutcomeAttribute { found: other.to_owned() }),
		};
		tracing::debug!(event_type = %envelope.event_type, is_failure, "classified event by outcome attribute");
		return Ok(is_failure);
	}
	match &options.classifier {
		Some(classifier) => {
			let is_failure = classifier(&envelope.event_type);
			tracing::debug!(event_type = %envelope.event_type, is_failure, "classified event by type");
			Ok(is_failure)
		}
		None => Err(VerdictError::NoOutcomeClassifier {
			event_type: envelope.event_type.clone().into_owned(),
		}),
	}
}

fn read_failure<T>(envelope: &EventEnvelope<'_>, data: Option<&[u8]>) -> Result<Outcome<T>> {
	let data = data.ok_or(VerdictError::MissingEventData { outcome: "failure" })?;
	let record: FailureData = serde_json::from_slice(data)?;
	Ok(Outcome::from_parts(Err(record.errors), merge_extensions(record.metadata, envelope)?))
}

/// Extension attributes as metadata annotated for extension placement, layered over `data` metadata.
fn merge_extensions(data_metadata: Option<Object>, envelope: &EventEnvelope<'_>) -> Result<Option<Object>> {
	if envelope.extensions.is_empty() {
		return Ok(data_metadata);
	}
	let mut builder = ObjectBuilder::with_capacity(envelope.extensions.len());
	for (name, value) in &envelope.extensions {
		builder.add(&**name, value.clone().with_annotation(Annotation::EVENT_EXTENSION)?);
	}
	let extensions = builder.build()?;
	Ok(Some(match data_metadata {
		Some(metadata) => metadata.merge_replacing(&extensions),
		None => extensions,
	}))
}

#[derive(Deserialize)]
struct SuccessData<T> {
	value: T,
	#[serde(default)]
	metadata: Option<Object>,
}

#[derive(Deserialize)]
struct UnitData {
	#[serde(default)]
	metadata: Option<Object>,
}

#[derive(Deserialize)]
struct FailureData {
	errors: Errors,
	#[serde(default)]
	metadata: Option<Object>,
}
