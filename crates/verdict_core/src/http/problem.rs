use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::http::ProblemFormat;
use crate::json::{AnnotatedEntries, BorrowedStr};
use crate::metadata::Object;
use crate::outcome::{Error, ErrorCategory, Errors};
use crate::{Result, VerdictError};

/// RFC 9457 document written for a failed outcome.
pub(crate) struct ProblemDocument<'a> {
	pub(crate) category: ErrorCategory,
	pub(crate) status: u16,
	pub(crate) errors: &'a Errors,
	pub(crate) format: ProblemFormat,
	pub(crate) metadata: Option<AnnotatedEntries<'a>>,
}

impl Serialize for ProblemDocument<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("type", self.category.problem_type())?;
		map.serialize_entry("title", self.category.reason_phrase())?;
		map.serialize_entry("status", &self.status)?;
		match self.format {
			ProblemFormat::Rich => map.serialize_entry("errors", self.errors)?,
			ProblemFormat::Grouped => {
				let groups = TargetGroups::new(self.errors);
				map.serialize_entry("errors", &groups)?;
				let implied = ErrorCategory::from_status(self.status);
				let details = ErrorDetails { groups: &groups, implied };
				if !details.is_empty() {
					map.serialize_entry("errorDetails", &details)?;
				}
			}
		}
		if let Some(metadata) = self.metadata.as_ref().filter(|entries| !entries.is_empty()) {
			map.serialize_entry("metadata", metadata)?;
		}
		map.end()
	}
}

/// Errors grouped by target in order of first appearance; target-less errors use `""`.
struct TargetGroups<'a> {
	groups: Vec<(&'a str, Vec<&'a Error>)>,
}

impl<'a> TargetGroups<'a> {
	fn new(errors: &'a Errors) -> Self {
		let mut groups: Vec<(&'a str, Vec<&'a Error>)> = Vec::new();
		for error in errors {
			let target = error.target.as_deref().unwrap_or("");
			match groups.iter_mut().find(|(name, _)| *name == target) {
				Some((_, members)) => members.push(error),
				None => groups.push((target, vec![error])),
			}
		}
		Self { groups }
	}
}

impl Serialize for TargetGroups<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.groups.len()))?;
		for (target, members) in &self.groups {
			let messages: Vec<&str> = members.iter().map(|error| error.message.as_str()).collect();
			map.serialize_entry(target, &messages)?;
		}
		map.end()
	}
}

/// `errorDetails`: fields the grouped layout cannot express inline.
struct ErrorDetails<'g, 'a> {
	groups: &'g TargetGroups<'a>,
	implied: ErrorCategory,
}

impl<'g, 'a> ErrorDetails<'g, 'a> {
	fn entries(&self) -> impl Iterator<Item = (&'a str, usize, &'a Error)> + '_ {
		let implied = self.implied;
		self.groups
			.groups
			.iter()
			.flat_map(|(target, members)| members.iter().enumerate().map(move |(index, error)| (*target, index, *error)))
			.filter(move |(_, _, error)| error.code.is_some() || error.metadata.is_some() || error.category != implied)
	}

	fn is_empty(&self) -> bool {
		self.entries().next().is_none()
	}
}

impl Serialize for ErrorDetails<'_, '_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(None)?;
		for (target, index, error) in self.entries() {
			seq.serialize_element(&DetailEntry {
				target,
				index,
				code: error.code.as_deref(),
				category: (error.category != self.implied).then_some(error.category),
				metadata: error.metadata.as_ref(),
			})?;
		}
		seq.end()
	}
}

#[derive(serde::Serialize)]
struct DetailEntry<'a> {
	target: &'a str,
	index: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	code: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	category: Option<ErrorCategory>,
	#[serde(skip_serializing_if = "Option::is_none")]
	metadata: Option<&'a Object>,
}

/// Problem document as read from the wire. Unknown members are ignored.
#[derive(Deserialize)]
pub(crate) struct ProblemRecord<'a> {
	#[serde(borrow, default)]
	errors: Option<&'a RawValue>,
	#[serde(default, rename = "errorDetails")]
	error_details: Option<Vec<DetailRecord>>,
	#[serde(default)]
	detail: Option<String>,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	metadata: Option<Object>,
}

#[derive(Deserialize)]
struct DetailRecord {
	target: String,
	index: usize,
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	category: Option<ErrorCategory>,
	#[serde(default)]
	metadata: Option<Object>,
}

impl ProblemRecord<'_> {
	/// Materialize errors and metadata; `status` supplies the implied category of grouped
	/// and fallback errors.
	pub(crate) fn into_parts(self, status: u16) -> Result<(Errors, Option<Object>)> {
		let implied = ErrorCategory::from_status(status);
		let errors = match self.errors {
			Some(raw) => match raw.get().trim_start().as_bytes().first() {
				Some(b'[') => {
					tracing::debug!(status, "reading rich problem errors");
					serde_json::from_str::<Errors>(raw.get())?
				}
				Some(b'{') => {
					tracing::debug!(status, "reading grouped problem errors");
					let groups: GroupedMessages = serde_json::from_str(raw.get())?;
					expand_groups(groups, self.error_details.unwrap_or_default(), implied)?
				}
				_ => return Err(VerdictError::InvalidProblemErrors),
			},
			None => {
				let message = [self.detail, self.title].into_iter().flatten().find(|text| !text.is_empty()).ok_or(VerdictError::MissingProblemErrors)?;
				tracing::debug!(status, "problem document without errors, using detail or title");
				Errors::one(Error::new(message).with_category(implied))?
			}
		};
		Ok((errors, self.metadata))
	}
}

fn expand_groups(groups: GroupedMessages, details: Vec<DetailRecord>, implied: ErrorCategory) -> Result<Errors> {
	let mut grouped: Vec<(String, Vec<Error>)> = groups
		.0
		.into_iter()
		.map(|(target, messages)| {
			let errors = messages
				.into_iter()
				.map(|message| {
					let error = Error::new(message).with_category(implied);
					if target.is_empty() { error } else { error.with_target(target.as_str()) }
				})
				.collect();
			(target, errors)
		})
		.collect();

	for detail in details {
		let slot = grouped
			.iter_mut()
			.find(|(target, _)| *target == detail.target)
			.and_then(|(_, errors)| errors.get_mut(detail.index))
			.ok_or_else(|| VerdictError::UnmatchedErrorDetail {
				target: detail.target.clone(),
				index: detail.index,
			})?;
		if detail.code.is_some() {
			slot.code = detail.code;
		}
		if let Some(category) = detail.category {
			slot.category = category;
		}
		if let Some(metadata) = detail.metadata {
			slot.metadata = (!metadata.is_empty()).then_some(metadata);
		}
	}

	Errors::from_vec(grouped.into_iter().flat_map(|(_, errors)| errors).collect())
}

/// `target -> [message]` pairs in document order.
struct GroupedMessages(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for GroupedMessages {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct GroupsVisitor;

		impl<'de> Visitor<'de> for GroupsVisitor {
			type Value = GroupedMessages;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("an object mapping targets to message arrays")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
				let mut groups: Vec<(String, Vec<String>)> = Vec::new();
				while let Some(BorrowedStr(target)) = map.next_key::<BorrowedStr<'de>>()? {
					if groups.iter().any(|(existing, _)| *existing == target) {
						return Err(de::Error::custom(format_args!("duplicate errors target {target:?}")));
					}
					let messages = map.next_value::<Messages>()?.0;
					groups.push((target.into_owned(), messages));
				}
				if groups.is_empty() {
					return Err(de::Error::invalid_length(0, &self));
				}
				Ok(GroupedMessages(groups))
			}
		}

		deserializer.deserialize_map(GroupsVisitor)
	}
}

/// Non-empty message list, also accepting a single bare string.
struct Messages(Vec<String>);

impl<'de> Deserialize<'de> for Messages {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct MessagesVisitor;

		impl<'de> Visitor<'de> for MessagesVisitor {
			type Value = Messages;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a message or an array of messages")
			}

			fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
				if value.is_empty() {
					return Err(E::invalid_value(de::Unexpected::Str(value), &"a non-empty message"));
				}
				Ok(Messages(vec![value.to_owned()]))
			}

			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
				let mut messages = Vec::with_capacity(seq.size_hint().unwrap_or(0));
				while let Some(message) = seq.next_element::<String>()? {
					if message.is_empty() {
						return Err(de::Error::invalid_value(de::Unexpected::Str(&message), &"a non-empty message"));
					}
					messages.push(message);
				}
				if messages.is_empty() {
					return Err(de::Error::invalid_length(0, &self));
				}
				Ok(Messages(messages))
			}
		}

		deserializer.deserialize_any(MessagesVisitor)
	}
}
