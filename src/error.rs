//! Crate-level error types shared across flows, transports, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller input was rejected before any network activity.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure or provider-reported failure during a token exchange.
	#[error(transparent)]
	AuthExchange(#[from] AuthExchangeError),
	/// Provider answered, but the payload did not carry a usable token.
	#[error(transparent)]
	ResponseParse(#[from] ResponseParseError),
}

/// Invalid caller input; always recoverable by correcting the input.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// Requested scope is not part of the provider's fixed scope set.
	#[error("Scope must be one of {allowed} (found scope '{scope}').")]
	UnknownScope {
		/// The offending scope string.
		scope: String,
		/// Human-readable list of accepted scopes.
		allowed: String,
	},
	/// Required input was empty.
	#[error("The {field} value cannot be empty.")]
	EmptyField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// Redirect carried a `state` that differs from the one sent to the provider.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Redirect did not carry an authorization code.
	#[error("Authorization redirect is missing the code parameter.")]
	MissingCode,
}

/// Configuration failures raised while preparing requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// API root cannot be parsed as a URL.
	#[error("API root is not a valid URL.")]
	InvalidApiRoot {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API root parsed but cannot serve as a base for endpoint paths.
	#[error("API root must be an http(s) URL without query or fragment: {url}.")]
	UnsupportedApiRoot {
		/// API root that failed validation.
		url: String,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
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

/// Failures reported while talking to the token endpoint or the authorization redirect.
#[derive(Debug, ThisError)]
pub enum AuthExchangeError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a structured error.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {}.", describe(.error, .description))]
	Status {
		/// HTTP status code.
		status: u16,
		/// Provider-supplied `error` field, when the body was JSON.
		error: Option<String>,
		/// Provider-supplied `error_description` field, when the body was JSON.
		description: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// User or provider declined the authorization request.
	#[error("Authorization was denied: {error}{}.", detail(.description))]
	Denied {
		/// Provider-supplied `error` parameter.
		error: String,
		/// Provider-supplied `error_description` parameter.
		description: Option<String>,
	},
}
impl AuthExchangeError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for AuthExchangeError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Token endpoint was reachable but returned an unexpected payload.
#[derive(Debug, ThisError)]
pub enum ResponseParseError {
	/// Body is not JSON or lacks the expected structure.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Body parsed but `access_token` was empty.
	#[error("Token endpoint returned an empty access_token.")]
	EmptyAccessToken {
		/// HTTP status code of the response.
		status: u16,
	},
}

fn describe(error: &Option<String>, description: &Option<String>) -> String {
	match (error, description) {
		(Some(error), Some(description)) => format!("{error} ({description})"),
		(Some(error), None) => error.to_owned(),
		(None, Some(description)) => description.to_owned(),
		(None, None) => "no error details".into(),
	}
}

fn detail(description: &Option<String>) -> String {
	description.as_ref().map(|d| format!(" ({d})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_errors_render_provider_details() {
		let err = AuthExchangeError::Status {
			status: 400,
			error: Some("invalid_grant".into()),
			description: Some("code already used".into()),
			retry_after: None,
		};

		assert_eq!(
			err.to_string(),
			"Token endpoint returned HTTP 400: invalid_grant (code already used)."
		);

		let err =
			AuthExchangeError::Status { status: 502, error: None, description: None, retry_after: None };

		assert_eq!(err.to_string(), "Token endpoint returned HTTP 502: no error details.");

		let err = AuthExchangeError::Denied {
			error: "access_denied".into(),
			description: Some("The user denied the request".into()),
		};

		assert_eq!(
			err.to_string(),
			"Authorization was denied: access_denied (The user denied the request)."
		);
	}

	#[test]
	fn validation_errors_convert_into_crate_error() {
		let err = Error::from(ValidationError::EmptyField { field: "client_id" });

		assert!(matches!(err, Error::Validation(ValidationError::EmptyField { field: "client_id" })));
		assert_eq!(err.to_string(), "The client_id value cannot be empty.");
	}
}
