//! Client-level error types shared across login flows, the poller, and resource calls.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS). Never retried automatically.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response content could not be interpreted.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Remote resource does not exist.
	///
	/// After a cleanup job has been polled this signals completion, because the platform drops
	/// the job together with the allocation unit.
	#[error("The {resource} {identifier} was not found.")]
	NotFound {
		/// Kind of resource that was requested.
		resource: &'static str,
		/// Identifier of the missing resource.
		identifier: String,
	},
	/// Deadline elapsed before an asynchronous job finished.
	#[error("{action} {identifier} has not finished within {duration:?}.")]
	Timeout {
		/// Action that was being awaited.
		action: &'static str,
		/// Identifier of the awaited resource.
		identifier: String,
		/// Configured deadline.
		duration: StdDuration,
	},
	/// Remote service answered with a status outside the expected set.
	#[error("The {operation} call failed with HTTP status {status}, body: {body}")]
	UnexpectedStatus {
		/// API call or login stage that failed.
		operation: &'static str,
		/// HTTP status code.
		status: u16,
		/// Response body, as returned.
		body: String,
	},
	/// Work observed cancellation before it completed.
	#[error("Operation was cancelled before it completed.")]
	Cancelled,
	/// Background worker panicked or was aborted.
	#[error("Background worker for {action} failed.")]
	Worker {
		/// Action the worker was running.
		action: &'static str,
		/// Join failure reported by the runtime.
		#[source]
		source: tokio::task::JoinError,
	},
}
impl Error {
	/// Returns `true` for [`Error::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}

	/// Returns `true` for [`Error::Timeout`].
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint or derived URL cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint is missing.
	#[error("Missing KYPO endpoint.")]
	MissingEndpoint,
	/// Client identifier is empty.
	#[error("Client identifier must not be empty.")]
	MissingClientId,
	/// Neither a token nor a username/password pair is available.
	#[error("Missing KYPO credentials; supply a username and password or a token.")]
	MissingCredentials,
	/// Operation needs a username and password but the client holds a static token.
	#[error("The {operation} call requires username and password credentials.")]
	PasswordRequired {
		/// Operation that required the password.
		operation: &'static str,
	},
	/// Poll interval must be positive.
	#[error("The {name} poll interval must be greater than zero.")]
	ZeroPollInterval {
		/// Which interval failed validation.
		name: &'static str,
	},
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the KYPO API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the KYPO API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() {
			ConfigError::http_client_build(e).into()
		} else {
			TransportError::from(e).into()
		}
	}
}

/// Failures while interpreting HTML pages, redirect fragments, or JSON payloads.
#[derive(Debug, ThisError)]
pub enum ParseError {
	/// Login page did not carry exactly one CSRF field.
	#[error("Failed to match csrf token (found {matches} candidates).")]
	Csrf {
		/// Number of matching hidden inputs.
		matches: usize,
	},
	/// Final redirect carried no access token.
	#[error("The {stage} stage failed, token is empty.")]
	EmptyToken {
		/// Login stage that was expected to yield the token.
		stage: &'static str,
	},
	/// JSON payload did not match the expected shape.
	#[error("The {operation} response is not valid JSON.")]
	Json {
		/// API call whose response failed to parse.
		operation: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Response carried a different number of items than the call asked for.
	#[error("The {operation} call returned {actual} items, expected {expected}.")]
	UnexpectedCount {
		/// API call whose response had the wrong length.
		operation: &'static str,
		/// Number of items requested.
		expected: usize,
		/// Number of items returned.
		actual: usize,
	},
	/// Request payload could not be encoded.
	#[error("The {operation} payload could not be encoded as JSON.")]
	Encode {
		/// API call whose payload failed to encode.
		operation: &'static str,
		/// Encoder failure.
		#[source]
		source: serde_json::Error,
	},
}
