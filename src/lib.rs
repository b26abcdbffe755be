//! Vimeo OAuth 2.0 client: build consent URLs, exchange authorization codes, and mint
//! client-credentials tokens over an injectable async HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// std
	use std::io::{Error as IoError, ErrorKind};
	// crates.io
	use oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderMap, Method, StatusCode},
	};
	use parking_lot::Mutex;
	// self
	use crate::http::TokenHttpClient;
	#[cfg(feature = "reqwest")]
	use crate::{
		auth::ClientCredentials,
		flows::ReqwestAuthenticator,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::ProviderDescriptor,
	};

	/// Request captured by [`RecordingHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		method: Method,
		uri: String,
		headers: HeaderMap,
		body: Vec<u8>,
	}
	impl RecordedRequest {
		/// HTTP method of the request.
		pub fn method(&self) -> &Method {
			&self.method
		}

		/// Absolute request URI.
		pub fn uri(&self) -> &str {
			&self.uri
		}

		/// Request headers.
		pub fn headers(&self) -> &HeaderMap {
			&self.headers
		}

		/// Raw request body.
		pub fn body(&self) -> &[u8] {
			&self.body
		}
	}

	#[derive(Clone, Debug)]
	enum Reply {
		Respond { status: StatusCode, body: String },
		Fail(String),
	}

	/// In-process [`TokenHttpClient`] that records every request and answers with a canned
	/// reply.
	#[derive(Clone, Debug)]
	pub struct RecordingHttpClient {
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
		reply: Reply,
	}
	impl RecordingHttpClient {
		/// Answers every request with `status` and `body`.
		pub fn replying(status: u16, body: impl Into<String>) -> Self {
			let status =
				StatusCode::from_u16(status).expect("Canned status should be a valid HTTP status.");

			Self {
				requests: Default::default(),
				reply: Reply::Respond { status, body: body.into() },
			}
		}

		/// Fails every request with a connection-level I/O error.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { requests: Default::default(), reply: Reply::Fail(message.into()) }
		}

		/// Requests captured so far, in send order.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		/// Returns the only captured request, panicking unless exactly one was sent.
		pub fn single_request(&self) -> RecordedRequest {
			let requests = self.requests();

			assert_eq!(requests.len(), 1, "Expected exactly one request to be sent.");

			requests.into_iter().next().expect("One request should be recorded.")
		}
	}
	impl TokenHttpClient for RecordingHttpClient {
		type Handle = RecordingHandle;
		type TransportError = IoError;

		fn handle(&self) -> Self::Handle {
			RecordingHandle(self.clone())
		}
	}

	/// Handle returned by [`RecordingHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordingHandle(RecordingHttpClient);
	impl<'c> AsyncHttpClient<'c> for RecordingHandle {
		type Error = HttpClientError<IoError>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			let (parts, body) = request.into_parts();

			self.0.requests.lock().push(RecordedRequest {
				method: parts.method,
				uri: parts.uri.to_string(),
				headers: parts.headers,
				body,
			});

			let reply = self.0.reply.clone();

			Box::pin(async move {
				match reply {
					Reply::Respond { status, body } => {
						let mut response = HttpResponse::new(body.into_bytes());

						*response.status_mut() = status;

						Ok(response)
					},
					Reply::Fail(message) =>
						Err(HttpClientError::Io(IoError::new(ErrorKind::ConnectionRefused, message))),
				}
			})
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a reqwest-backed authenticator pointed at `descriptor`.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_authenticator(
		descriptor: ProviderDescriptor,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestAuthenticator {
		let credentials = ClientCredentials::new(client_id, client_secret)
			.expect("Test credentials should be valid.");

		ReqwestAuthenticator::with_http_client(
			descriptor,
			credentials,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
