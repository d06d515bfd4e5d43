use crate::metadata::{MergeStrategy, Object};
use crate::outcome::{Error, Errors};
use crate::{Result, VerdictError};

/// Either a success carrying `T` or a failure carrying [`Errors`], plus optional metadata.
///
/// `Outcome<()>` is the value-less variant. Every transformation returns a new outcome;
/// an empty metadata object is stored as no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Outcome<T = ()> {
	state: State<T>,
	metadata: Option<Object>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum State<T> {
	Success(T),
	Failure(Errors),
}

impl<T> Outcome<T> {
	/// Successful outcome.
	pub fn ok(value: T) -> Self {
		Self::from_parts(Ok(value), None)
	}

	/// Successful outcome with metadata.
	pub fn ok_with_metadata(value: T, metadata: Object) -> Self {
		Self::from_parts(Ok(value), Some(metadata))
	}

	/// Failed outcome.
	pub fn fail(errors: Errors) -> Self {
		Self::from_parts(Err(errors), None)
	}

	/// Failed outcome with metadata.
	pub fn fail_with_metadata(errors: Errors, metadata: Object) -> Self {
		Self::from_parts(Err(errors), Some(metadata))
	}

	/// Failed outcome holding exactly `error`.
	pub fn from_error(error: Error) -> Result<Self> {
		Ok(Self::fail(Errors::one(error)?))
	}

	pub(crate) fn from_parts(state: std::result::Result<T, Errors>, metadata: Option<Object>) -> Self {
		Self {
			state: match state {
				Ok(value) => State::Success(value),
				Err(errors) => State::Failure(errors),
			},
			metadata: metadata.filter(|item| !item.is_empty()),
		}
	}

	/// Whether this is a success.
	pub fn is_valid(&self) -> bool {
		matches!(self.state, State::Success(_))
	}

	/// Whether this is a failure.
	pub fn is_failure(&self) -> bool {
		!self.is_valid()
	}

	/// Success value; fails with `WrongOutcomeState` on a failure.
	pub fn value(&self) -> Result<&T> {
		self.try_value().ok_or(VerdictError::WrongOutcomeState {
			actual: "failure",
			requested: "value",
		})
	}

	/// Success value, if any.
	pub fn try_value(&self) -> Option<&T> {
		match &self.state {
			State::Success(value) => Some(value),
			State::Failure(_) => None,
		}
	}

	/// Consume into the success value; fails with `WrongOutcomeState` on a failure.
	pub fn into_value(self) -> Result<T> {
		match self.state {
			State::Success(value) => Ok(value),
			State::Failure(_) => Err(VerdictError::WrongOutcomeState {
				actual: "failure",
				requested: "value",
			}),
		}
	}

	/// Failure errors; fails with `WrongOutcomeState` on a success.
	pub fn errors(&self) -> Result<&Errors> {
		self.try_errors().ok_or(VerdictError::WrongOutcomeState {
			actual: "success",
			requested: "errors",
		})
	}

	/// Failure errors, if any.
	pub fn try_errors(&self) -> Option<&Errors> {
		match &self.state {
			State::Success(_) => None,
			State::Failure(errors) => Some(errors),
		}
	}

	/// First error of a failure.
	pub fn first_error(&self) -> Option<&Error> {
		self.try_errors().map(Errors::first)
	}

	/// Attached metadata.
	pub fn metadata(&self) -> Option<&Object> {
		self.metadata.as_ref()
	}

	/// Borrow as a standard result.
	pub fn as_result(&self) -> std::result::Result<&T, &Errors> {
		match &self.state {
			State::Success(value) => Ok(value),
			State::Failure(errors) => Err(errors),
		}
	}

	/// Consume into a standard result, dropping metadata.
	pub fn into_result(self) -> std::result::Result<T, Errors> {
		match self.state {
			State::Success(value) => Ok(value),
			State::Failure(errors) => Err(errors),
		}
	}

	/// Consume into the state and metadata.
	pub fn into_parts(self) -> (std::result::Result<T, Errors>, Option<Object>) {
		let metadata = self.metadata;
		let state = match self.state {
			State::Success(value) => Ok(value),
			State::Failure(errors) => Err(errors),
		};
		(state, metadata)
	}

	/// Transform the success value; failures pass through unchanged.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
		let (state, metadata) = self.into_parts();
		Outcome::from_parts(state.map(f), metadata)
	}

	/// Chain an outcome-producing step.
	///
	/// On success the step runs and both metadata objects are merged with
	/// [`MergeStrategy::AddOrReplace`]; on failure the original errors and metadata
	/// propagate and the step is skipped.
	pub fn bind<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
		let (state, metadata) = self.into_parts();
		match state {
			Ok(value) => {
				let next = f(value);
				let merged = match (metadata, next.metadata.as_ref()) {
					(Some(original), Some(incoming)) => Some(original.merge_replacing(incoming)),
					(original, incoming) => original.or_else(|| incoming.cloned()),
				};
				let (state, _) = next.into_parts();
				Outcome::from_parts(state, merged)
			}
			Err(errors) => Outcome::from_parts(Err(errors), metadata),
		}
	}

	/// Run `f` on the success value for its side effects.
	pub fn tap(self, f: impl FnOnce(&T)) -> Self {
		if let State::Success(value) = &self.state {
			f(value);
		}
		self
	}

	/// Run `f` on the errors for its side effects.
	pub fn tap_error(self, f: impl FnOnce(&Errors)) -> Self {
		if let State::Failure(errors) = &self.state {
			f(errors);
		}
		self
	}

	/// Merge `incoming` into the metadata using `strategy`.
	pub fn merge_metadata(self, incoming: &Object, strategy: MergeStrategy) -> Result<Self> {
		let metadata = match &self.metadata {
			Some(original) => original.merge(incoming, strategy)?,
			None => incoming.clone(),
		};
		Ok(Self {
			state: self.state,
			metadata: Some(metadata).filter(|item| !item.is_empty()),
		})
	}

	/// Replace the metadata.
	pub fn with_metadata(self, metadata: Object) -> Self {
		Self {
			state: self.state,
			metadata: Some(metadata).filter(|item| !item.is_empty()),
		}
	}

	/// Drop the metadata.
	pub fn clear_metadata(self) -> Self {
		Self {
			state: self.state,
			metadata: None,
		}
	}
}

impl Outcome<()> {
	/// Value-less success.
	pub fn success() -> Self {
		Self::ok(())
	}
}

impl<T> From<Errors> for Outcome<T> {
	fn from(errors: Errors) -> Self {
		Self::fail(errors)
	}
}
