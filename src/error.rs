//! Client-level error types shared across the credential manager, API operations, and dispatcher.

// std
use std::io::Error as IoError;
// self
use crate::{_prelude::*, account::IdentifierError, obs::OperationKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, HTTP status, malformed body).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint rejected the app id + secret pair.
	#[error("Failed to get access token: {message} (errcode {code}).")]
	Authentication {
		/// Remote `errcode`.
		code: i64,
		/// Remote `errmsg`, verbatim.
		message: String,
	},
	/// An API operation reported a non-zero `errcode`.
	#[error("Failed to {action}: {message} (errcode {code}).", action = .operation.action())]
	Remote {
		/// Operation that failed.
		operation: OperationKind,
		/// Remote `errcode`.
		code: i64,
		/// Remote `errmsg`, verbatim.
		message: String,
	},
	/// Caller-supplied input violates an operation precondition.
	#[error("Invalid argument: {reason}.")]
	InvalidArgument {
		/// Which precondition failed.
		reason: String,
	},
	/// Upload source file cannot be inspected.
	#[error("Cannot read upload file `{}`: {source}.", .path.display())]
	File {
		/// Path supplied by the caller.
		path: PathBuf,
		/// Underlying filesystem failure.
		#[source]
		source: IoError,
	},
}
impl Error {
	/// Builds an [`Error::InvalidArgument`] from any displayable reason.
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument { reason: reason.into() }
	}

	/// Returns the remote `errcode`, when the failure came from the remote platform.
	pub fn remote_code(&self) -> Option<i64> {
		match self {
			Self::Authentication { code, .. } | Self::Remote { code, .. } => Some(*code),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while wiring the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// App id is missing or malformed.
	#[error(transparent)]
	InvalidAppId(#[from] IdentifierError),
	/// App secret is missing.
	#[error("App secret cannot be empty.")]
	MissingAppSecret,
	/// API base URL cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidApiBase {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL parses but cannot host the endpoint set.
	#[error("API base URL must be an http(s) base URL: {url}.")]
	UnsupportedApiBase {
		/// Offending URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, unexpected responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API: {0}.")]
	Io(#[from] IoError),
	/// Remote endpoint answered with a non-success status and no error envelope.
	#[error("API returned unexpected HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Remote endpoint responded with JSON that does not match the expected shape.
	#[error("API returned malformed JSON: {source}.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint returned a lifetime that is non-positive or past the representable range.
	#[error("Token endpoint returned an unusable expires_in value: {expires_in}.")]
	InvalidExpiresIn {
		/// Lifetime in seconds as returned.
		expires_in: i64,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn remote_errors_embed_errmsg_verbatim() {
		let err = Error::Remote {
			operation: OperationKind::PublishDraft,
			code: 40007,
			message: "invalid media_id".into(),
		};

		assert_eq!(err.to_string(), "Failed to publish: invalid media_id (errcode 40007).");
		assert_eq!(err.remote_code(), Some(40007));

		let err = Error::Authentication { code: 40001, message: "invalid credential".into() };

		assert!(err.to_string().contains("invalid credential"));
	}

	#[test]
	fn transport_errors_expose_their_source() {
		let io = IoError::other("connection reset");
		let err: Error = TransportError::from(io).into();

		assert!(err.to_string().contains("connection reset"));
		assert!(StdError::source(&err).is_some());
		assert_eq!(err.remote_code(), None);
	}
}
