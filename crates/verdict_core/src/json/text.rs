use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// String that borrows from the input buffer when it contains no escapes.
pub(crate) struct BorrowedStr<'de>(pub(crate) Cow<'de, str>);

impl<'de> Deserialize<'de> for BorrowedStr<'de> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct StrVisitor;

		impl<'de> Visitor<'de> for StrVisitor {
			type Value = BorrowedStr<'de>;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a string")
			}

			fn visit_borrowed_str<E: de::Error>(self, value: &'de str) -> Result<Self::Value, E> {
				Ok(BorrowedStr(Cow::Borrowed(value)))
			}

			fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
				Ok(BorrowedStr(Cow::Owned(value.to_owned())))
			}

			fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
				Ok(BorrowedStr(Cow::Owned(value)))
			}
		}

		deserializer.deserialize_str(StrVisitor)
	}
}
