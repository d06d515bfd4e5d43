use serde::{Deserialize, Serialize};

/// Classification of an error, mapped one-to-one onto an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCategory {
	/// No category; also the result of mixing categories. Maps to 500.
	#[default]
	Unclassified,
	/// 400 Bad Request.
	Validation,
	/// 401 Unauthorized.
	Unauthorized,
	/// 402 Payment Required.
	PaymentRequired,
	/// 403 Forbidden.
	Forbidden,
	/// 404 Not Found.
	NotFound,
	/// 405 Method Not Allowed.
	MethodNotAllowed,
	/// 406 Not Acceptable.
	NotAcceptable,
	/// 408 Request Timeout.
	Timeout,
	/// 409 Conflict.
	Conflict,
	/// 410 Gone.
	Gone,
	/// 411 Length Required.
	LengthRequired,
	/// 412 Precondition Failed.
	PreconditionFailed,
	/// 413 Content Too Large.
	ContentTooLarge,
	/// 414 URI Too Long.
	UriTooLong,
	/// 415 Unsupported Media Type.
	UnsupportedMediaType,
	/// 416 Range Not Satisfiable.
	RequestedRangeNotSatisfiable,
	/// 417 Expectation Failed.
	ExpectationFailed,
	/// 421 Misdirected Request.
	MisdirectedRequest,
	/// 422 Unprocessable Content.
	UnprocessableContent,
	/// 423 Locked.
	Locked,
	/// 424 Failed Dependency.
	FailedDependency,
	/// 426 Upgrade Required.
	UpgradeRequired,
	/// 428 Precondition Required.
	PreconditionRequired,
	/// 429 Too Many Requests.
	TooManyRequests,
	/// 431 Request Header Fields Too Large.
	RequestHeaderFieldsTooLarge,
	/// 451 Unavailable For Legal Reasons.
	UnavailableForLegalReasons,
	/// 500 Internal Server Error.
	InternalError,
	/// 501 Not Implemented.
	NotImplemented,
	/// 502 Bad Gateway.
	BadGateway,
	/// 503 Service Unavailable.
	ServiceUnavailable,
	/// 504 Gateway Timeout.
	GatewayTimeout,
	/// 507 Insufficient Storage.
	InsufficientStorage,
}

impl ErrorCategory {
	/// Every category, in declaration order.
	pub const ALL: [Self; 33] = [
		Self::Unclassified,
		Self::Validation,
		Self::Unauthorized,
		Self::PaymentRequired,
		Self::Forbidden,
		Self::NotFound,
		Self::MethodNotAllowed,
		Self::NotAcceptable,
		Self::Timeout,
		Self::Conflict,
		Self::Gone,
		Self::LengthRequired,
		Self::PreconditionFailed,
		Self::ContentTooLarge,
		Self::UriTooLong,
		Self::UnsupportedMediaType,
		Self::RequestedRangeNotSatisfiable,
		Self::ExpectationFailed,
		Self::MisdirectedRequest,
		Self::UnprocessableContent,
		Self::Locked,
		Self::FailedDependency,
		Self::UpgradeRequired,
		Self::PreconditionRequired,
		Self::TooManyRequests,
		Self::RequestHeaderFieldsTooLarge,
		Self::UnavailableForLegalReasons,
		Self::InternalError,
		Self::NotImplemented,
		Self::BadGateway,
		Self::ServiceUnavailable,
		Self::GatewayTimeout,
		Self::InsufficientStorage,
	];

	/// HTTP status code for this category.
	pub fn status_code(self) -> u16 {
		self.info().0
	}

	/// RFC reason phrase, used as the problem `title`.
	pub fn reason_phrase(self) -> &'static str {
		self.info().1
	}

	/// Problem `type` URI pointing at the defining RFC section.
	pub fn problem_type(self) -> &'static str {
		self.info().2
	}

	/// Category for an HTTP status code; 500 and unknown codes are `Unclassified`.
	pub fn from_status(status: u16) -> Self {
		if status == 500 {
			return Self::Unclassified;
		}
		Self::ALL
			.iter()
			.copied()
			.find(|category| category.status_code() == status)
			.unwrap_or(Self::Unclassified)
	}

	/// Stable variant name, as written on the wire.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Unclassified => "Unclassified",
			Self::Validation => "Validation",
			Self::Unauthorized => "Unauthorized",
			Self::PaymentRequired => "PaymentRequired",
			Self::Forbidden => "Forbidden",
			Self::NotFound => "NotFound",
			Self::MethodNotAllowed => "MethodNotAllowed",
			Self::NotAcceptable => "NotAcceptable",
			Self::Timeout => "Timeout",
			Self::Conflict => "Conflict",
			Self::Gone => "Gone",
			Self::LengthRequired => "LengthRequired",
			Self::PreconditionFailed => "PreconditionFailed",
			Self::ContentTooLarge => "ContentTooLarge",
			Self::UriTooLong => "UriTooLong",
			Self::UnsupportedMediaType => "UnsupportedMediaType",
			Self::RequestedRangeNotSatisfiable => "RequestedRangeNotSatisfiable",
			Self::ExpectationFailed => "ExpectationFailed",
			Self::MisdirectedRequest => "MisdirectedRequest",
			Self::UnprocessableContent => "UnprocessableContent",
			Self::Locked => "Locked",
			Self::FailedDependency => "FailedDependency",
			Self::UpgradeRequired => "UpgradeRequired",
			Self::PreconditionRequired => "PreconditionRequired",
			Self::TooManyRequests => "TooManyRequests",
			Self::RequestHeaderFieldsTooLarge => "RequestHeaderFieldsTooLarge",
			Self::UnavailableForLegalReasons => "UnavailableForLegalReasons",
			Self::InternalError => "InternalError",
			Self::NotImplemented => "NotImplemented",
			Self::BadGateway => "BadGateway",
			Self::ServiceUnavailable => "ServiceUnavailable",
			Self::GatewayTimeout => "GatewayTimeout",
			Self::InsufficientStorage => "InsufficientStorage",
		}
	}

	fn info(self) -> (u16, &'static str, &'static str) {
		match self {
			Self::Unclassified => (500, "Internal Server Error", "https://tools.ietf.org/html/rfc9110#section-15.6.1"),
			Self::Validation => (400, "Bad Request", "https://tools.ietf.org/html/rfc9110#section-15.5.1"),
			Self::Unauthorized => (401, "Unauthorized", "https://tools.ietf.org/html/rfc9110#section-15.5.2"),
			Self::PaymentRequired => (402, "Payment Required", "https://tools.ietf.org/html/rfc9110#section-15.5.3"),
			Self::Forbidden => (403, "Forbidden", "https://tools.ietf.org/html/rfc9110#section-15.5.4"),
			Self::NotFound => (404, "Not Found", "https://tools.ietf.org/html/rfc9110#section-15.5.5"),
			Self::MethodNotAllowed => (405, "Method Not Allowed", "https://tools.ietf.org/html/rfc9110#section-15.5.6"),
			Self::NotAcceptable => (406, "Not Acceptable", "https://tools.ietf.org/html/rfc9110#section-15.5.7"),
			Self::Timeout => (408, "Request Timeout", "https://tools.ietf.org/html/rfc9110#section-15.5.9"),
			Self::Conflict => (409, "Conflict", "https://tools.ietf.org/html/rfc9110#section-15.5.10"),
			Self::Gone => (410, "Gone", "https://tools.ietf.org/html/rfc9110#section-15.5.11"),
			Self::LengthRequired => (411, "Length Required", "https://tools.ietf.org/html/rfc9110#section-15.5.12"),
			Self::PreconditionFailed => (412, "Precondition Failed", "https://tools.ietf.org/html/rfc9110#section-15.5.13"),
			Self::ContentTooLarge => (413, "Content Too Large", "https://tools.ietf.org/html/rfc9110#section-15.5.14"),
			Self::UriTooLong => (414, "URI Too Long", "https://tools.ietf.org/html/rfc9110#section-15.5.15"),
			Self::UnsupportedMediaType => (415, "Unsupported Media Type", "https://tools.ietf.org/html/rfc9110#section-15.5.16"),
			Self::RequestedRangeNotSatisfiable => (416, "Range Not Satisfiable", "https://tools.ietf.org/html/rfc9110#section-15.5.17"),
			Self::ExpectationFailed => (417, "Expectation Failed", "https://tools.ietf.org/html/rfc9110#section-15.5.18"),
			Self::MisdirectedRequest => (421, "Misdirected Request", "https://tools.ietf.org/html/rfc9110#section-15.5.20"),
			Self::UnprocessableContent => (422, "Unprocessable Content", "https://tools.ietf.org/html/rfc9110#section-15.5.21"),
			Self::Locked => (423, "Locked", "https://tools.ietf.org/html/rfc4918#section-11.3"),
			Self::FailedDependency => (424, "Failed Dependency", "https://tools.ietf.org/html/rfc4918#section-11.4"),
			Self::UpgradeRequired => (426, "Upgrade Required", "https://tools.ietf.org/html/rfc9110#section-15.5.22"),
			Self::PreconditionRequired => (428, "Precondition Required", "https://tools.ietf.org/html/rfc6585#section-3"),
			Self::TooManyRequests => (429, "Too Many Requests", "https://tools.ietf.org/html/rfc6585#section-4"),
			Self::RequestHeaderFieldsTooLarge => (431, "Request Header Fields Too Large", "https://tools.ietf.org/html/rfc6585#section-5"),
			Self::UnavailableForLegalReasons => (451, "Unavailable For Legal Reasons", "https://tools.ietf.org/html/rfc7725#section-3"),
			Self::InternalError => (500, "Internal Server Error", "https://tools.ietf.org/html/rfc9110#section-15.6.1"),
			Self::NotImplemented => (501, "Not Implemented", "https://tools.ietf.org/html/rfc9110#section-15.6.2"),
			Self::BadGateway => (502, "Bad Gateway", "https://tools.ietf.org/html/rfc9110#section-15.6.3"),
			Self::ServiceUnavailable => (503, "Service Unavailable", "https://tools.ietf.org/html/rfc9110#section-15.6.4"),
			Self::GatewayTimeout => (504, "Gateway Timeout", "https://tools.ietf.org/html/rfc9110#section-15.6.5"),
			Self::InsufficientStorage => (507, "Insufficient Storage", "https://tools.ietf.org/html/rfc4918#section-11.5"),
		}
	}
}
