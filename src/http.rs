//! Transport primitives for token exchanges.
//!
//! The module exposes [`TokenHttpClient`], the crate's only dependency on an HTTP stack, and
//! [`ResponseMetadata`], which captures the status and retry hints of a token endpoint
//! response. Requests and responses use the `oauth2` crate's [`HttpRequest`] and
//! [`HttpResponse`] types so any client that speaks [`AsyncHttpClient`] can be injected.

// std
use std::ops::Deref;
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{HeaderMap, header::RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing token exchanges.
///
/// Callers provide an implementation (typically behind `Arc<T>`) and every exchange asks it
/// for a short-lived [`AsyncHttpClient`] handle. Implementations must be
/// `Send + Sync + 'static` so one transport can back many authenticators, and the handles
/// they return must own whatever state they need so request futures stay `Send`.
///
/// TLS certificate validation is the transport's responsibility; the bundled
/// [`ReqwestHttpClient`] keeps reqwest's default (validation on).
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single exchange.
	///
	/// The request future returned by [`AsyncHttpClient::call`] must be `Send` so flows can
	/// run on multi-threaded executors.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle for the next request.
	fn handle(&self) -> Self::Handle;
}

/// Metadata read from a token endpoint response.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the token endpoint.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures the status and `Retry-After` hint of `response`.
	pub fn from_response(response: &HttpResponse) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly, so a custom [`ReqwestClient`] should disable redirect
/// following; [`ReqwestHttpClient::new`] does.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with certificate validation on and redirects disabled.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`AsyncHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{HeaderValue, StatusCode};
	// self
	use super::*;

	fn response_with_retry_after(value: &str) -> HttpResponse {
		let mut response = HttpResponse::new(Vec::new());

		*response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
		response.headers_mut().insert(
			RETRY_AFTER,
			HeaderValue::from_str(value).expect("Retry-After fixture should be a valid header."),
		);

		response
	}

	#[test]
	fn metadata_reads_status_and_delta_seconds() {
		let meta = ResponseMetadata::from_response(&response_with_retry_after("30"));

		assert_eq!(meta.status, Some(429));
		assert_eq!(meta.retry_after, Some(Duration::seconds(30)));
	}

	#[test]
	fn metadata_ignores_past_or_garbled_dates() {
		let past = ResponseMetadata::from_response(&response_with_retry_after(
			"Wed, 21 Oct 2015 07:28:00 +0000",
		));

		assert_eq!(past.retry_after, None);

		let garbled = ResponseMetadata::from_response(&response_with_retry_after("soon"));

		assert_eq!(garbled.retry_after, None);
	}

	#[test]
	fn metadata_without_header_is_empty() {
		let meta = ResponseMetadata::from_response(&HttpResponse::new(Vec::new()));

		assert_eq!(meta, ResponseMetadata { status: Some(200), retry_after: None });
	}
}
