use std::fmt;
use std::sync::Arc;

use crate::json::MetadataSerializationMode;

/// Decides from an event `type` whether the event reports a failure.
pub type OutcomeClassifier = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Configuration for writing CloudEvents.
///
/// Explicit attributes win over metadata entries of the same name annotated
/// [`Annotation::EVENT_EXTENSION`](crate::Annotation::EVENT_EXTENSION).
#[derive(Debug, Clone)]
pub struct CloudEventsWriteOptions {
	/// `type` written for successes.
	pub success_type: Option<String>,
	/// `type` written for failures.
	pub failure_type: Option<String>,
	/// `source` attribute.
	pub source: Option<String>,
	/// `id` attribute.
	pub id: Option<String>,
	/// `subject` attribute.
	pub subject: Option<String>,
	/// `time` attribute, RFC 3339.
	pub time: Option<String>,
	/// `dataschema` attribute.
	pub data_schema: Option<String>,
	/// Whether successful events carry data metadata.
	pub metadata_mode: MetadataSerializationMode,
}

impl Default for CloudEventsWriteOptions {
	fn default() -> Self {
		Self {
			success_type: None,
			failure_type: None,
			source: None,
			id: None,
			subject: None,
			time: None,
			data_schema: None,
			metadata_mode: MetadataSerializationMode::Always,
		}
	}
}

impl CloudEventsWriteOptions {
	/// Options with the success/failure type pair and source set.
	pub fn new(success_type: impl Into<String>, failure_type: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			success_type: Some(success_type.into()),
			failure_type: Some(failure_type.into()),
			source: Some(source.into()),
			..Self::default()
		}
	}

	/// Set the event id.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Set the subject.
	pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = Some(subject.into());
		self
	}

	/// Set the event time.
	pub fn with_time(mut self, time: impl Into<String>) -> Self {
		self.time = Some(time.into());
		self
	}

	/// Set the data schema URI.
	pub fn with_data_schema(mut self, data_schema: impl Into<String>) -> Self {
		self.data_schema = Some(data_schema.into());
		self
	}
}

/// Configuration for reading CloudEvents.
#[derive(Clone, Default)]
pub struct CloudEventsReadOptions {
	/// Fallback classification for events without an `outcome` attribute.
	pub classifier: Option<OutcomeClassifier>,
}

impl CloudEventsReadOptions {
	/// Options classifying unmarked events with `classifier` (returns `true` for failures).
	pub fn with_classifier(classifier: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
		Self {
			classifier: Some(Arc::new(classifier)),
		}
	}
}

impl fmt::Debug for CloudEventsReadOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CloudEventsReadOptions").field("classifier", &self.classifier.is_some()).finish()
	}
}
