//! Token endpoint plumbing: request construction, dispatch, and response classification.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials},
	error::{AuthExchangeError, ConfigError, ResponseParseError},
	http::{ResponseMetadata, TokenHttpClient},
	obs::{self, FlowSpan},
	provider::{GrantType, ProviderDescriptor},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into crate [`Error`] values.
///
/// Transport failures never reach the response parser; whatever the mapper returns is
/// surfaced to the caller as-is.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, grant: GrantType, error: HttpClientError<E>) -> Error;
}

/// Mapper usable with any transport: every client failure becomes an
/// [`AuthExchangeError`].
#[derive(Clone, Debug, Default)]
pub struct GenericTransportErrorMapper;
impl<E> TransportErrorMapper<E> for GenericTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, grant: GrantType, error: HttpClientError<E>) -> Error {
		let _ = grant;

		map_common_transport_error(error)
	}
}

/// Default mapper for reqwest-backed transports.
///
/// Request-builder failures are local misconfiguration and surface as [`ConfigError`];
/// everything else is an [`AuthExchangeError`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		grant: GrantType,
		error: HttpClientError<ReqwestError>,
	) -> Error {
		let _ = grant;

		match error {
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => AuthExchangeError::from(*inner).into(),
			other => map_common_transport_error(other),
		}
	}
}

/// Form-encoded token request for a single grant.
#[derive(Clone, Debug)]
pub(crate) struct TokenRequest {
	grant: GrantType,
	form: Vec<(&'static str, String)>,
}
impl TokenRequest {
	pub(crate) fn new(grant: GrantType) -> Self {
		Self { grant, form: vec![("grant_type", grant.as_str().into())] }
	}

	pub(crate) fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
		self.form.push((key, value.into()));

		self
	}

	pub(crate) fn encode_form(&self) -> String {
		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in &self.form {
			serializer.append_pair(key, value);
		}

		serializer.finish()
	}

	pub(crate) fn into_http_request(
		self,
		descriptor: &ProviderDescriptor,
		credentials: &ClientCredentials,
	) -> Result<HttpRequest> {
		let body = self.encode_form();

		Request::builder()
			.method(Method::POST)
			.uri(descriptor.token_endpoint(self.grant))
			.header(AUTHORIZATION, credentials.basic_authorization())
			.header(ACCEPT, descriptor.accept.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.body(body.into_bytes())
			.map_err(|e| ConfigError::from(e).into())
	}
}

/// Sends `request` through `http_client` and extracts the access token.
pub(crate) async fn request_access_token<C, M>(
	http_client: &C,
	mapper: &M,
	descriptor: &ProviderDescriptor,
	credentials: &ClientCredentials,
	request: TokenRequest,
	span: &FlowSpan,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let grant = request.grant;
	let http_request = request.into_http_request(descriptor, credentials)?;
	let handle = http_client.handle();
	let response = handle
		.call(http_request)
		.await
		.map_err(|err| mapper.map_transport_error(grant, err))?;

	let status = response.status().as_u16();

	span.record_status(status);
	obs::record_token_status(grant.into(), status);

	parse_token_response(&response)
}

#[derive(Deserialize)]
struct TokenResponseBody {
	access_token: String,
}

#[derive(Default, Deserialize)]
struct ErrorResponseBody {
	error: Option<String>,
	#[serde(alias = "developer_message")]
	error_description: Option<String>,
}

/// Classifies a token endpoint response.
///
/// Non-success statuses are exchange failures (with any OAuth error fields the body
/// carries); success statuses must hold JSON with a non-empty `access_token`.
pub(crate) fn parse_token_response(response: &HttpResponse) -> Result<AccessToken> {
	let meta = ResponseMetadata::from_response(response);
	let status = response.status().as_u16();

	if !response.status().is_success() {
		let body =
			serde_json::from_slice::<ErrorResponseBody>(response.body()).unwrap_or_default();

		return Err(AuthExchangeError::Status {
			status,
			error: body.error,
			description: body.error_description,
			retry_after: meta.retry_after,
		}
		.into());
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body: TokenResponseBody = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseParseError::Json { source, status })?;

	if body.access_token.is_empty() {
		return Err(ResponseParseError::EmptyAccessToken { status }.into());
	}

	Ok(AccessToken::new(body.access_token))
}

fn map_common_transport_error<E>(error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => AuthExchangeError::Io(inner).into(),
		HttpClientError::Other(message) => AuthExchangeError::Other { message }.into(),
		HttpClientError::Reqwest(inner) => AuthExchangeError::Network { source: inner }.into(),
		_ => AuthExchangeError::Other { message: "unrecognized transport failure".into() }.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
	// self
	use super::*;

	fn response(status: StatusCode, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = status;

		response
	}

	fn credentials() -> ClientCredentials {
		ClientCredentials::new("abc", "s3cret").expect("Credential fixture should be valid.")
	}

	#[test]
	fn token_requests_carry_basic_auth_accept_and_form_body() {
		let request = TokenRequest::new(GrantType::AuthorizationCode)
			.param("code", "c0de")
			.param("redirect_uri", "https://app.example.com/cb?x=1&y=2")
			.into_http_request(&ProviderDescriptor::vimeo(), &credentials())
			.expect("Token request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://api.vimeo.com/oauth/access_token");
		assert_eq!(request.headers()[AUTHORIZATION], "Basic YWJjOnMzY3JldA==");
		assert_eq!(request.headers()[ACCEPT], "application/vnd.vimeo.*+json; version=3.2");
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"grant_type=authorization_code&code=c0de&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fx%3D1%26y%3D2"
		);
	}

	#[test]
	fn successful_responses_yield_the_token() {
		let token = parse_token_response(&response(
			StatusCode::OK,
			r#"{"access_token":"tok123","token_type":"bearer","scope":"public private"}"#,
		))
		.expect("Well-formed responses should parse.");

		assert_eq!(token.expose(), "tok123");
	}

	#[test]
	fn malformed_success_bodies_are_parse_errors() {
		let err = parse_token_response(&response(StatusCode::OK, "<html>oops</html>"))
			.expect_err("Non-JSON bodies must fail.");

		assert!(matches!(err, Error::ResponseParse(ResponseParseError::Json { status: 200, .. })));

		let err = parse_token_response(&response(StatusCode::OK, r#"{"token_type":"bearer"}"#))
			.expect_err("Bodies without access_token must fail.");

		match err {
			Error::ResponseParse(ResponseParseError::Json { source, .. }) =>
				assert!(source.to_string().contains("access_token")),
			other => panic!("Unexpected error variant: {other:?}."),
		}

		let err = parse_token_response(&response(StatusCode::OK, r#"{"access_token":""}"#))
			.expect_err("Empty tokens must fail.");

		assert!(matches!(err, Error::ResponseParse(ResponseParseError::EmptyAccessToken { .. })));
	}

	#[test]
	fn error_statuses_are_exchange_errors_with_details() {
		let mut throttled = response(StatusCode::TOO_MANY_REQUESTS, "slow down");

		throttled.headers_mut().insert(RETRY_AFTER, HeaderValue::from_static("12"));

		match parse_token_response(&throttled).expect_err("429 responses must fail.") {
			Error::AuthExchange(AuthExchangeError::Status {
				status,
				error,
				description,
				retry_after,
			}) => {
				assert_eq!(status, 429);
				assert_eq!(error, None);
				assert_eq!(description, None);
				assert_eq!(retry_after, Some(Duration::seconds(12)));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}

		let rejected = response(
			StatusCode::BAD_REQUEST,
			r#"{"error":"invalid_grant","developer_message":"The authorization code is invalid."}"#,
		);

		match parse_token_response(&rejected).expect_err("400 responses must fail.") {
			Error::AuthExchange(AuthExchangeError::Status { status, error, description, .. }) => {
				assert_eq!(status, 400);
				assert_eq!(error.as_deref(), Some("invalid_grant"));
				assert_eq!(description.as_deref(), Some("The authorization code is invalid."));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn generic_mapper_wraps_transport_failures() {
		let mapper = GenericTransportErrorMapper;
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
		let err = TransportErrorMapper::<std::io::Error>::map_transport_error(
			&mapper,
			GrantType::ClientCredentials,
			HttpClientError::Reqwest(Box::new(io)),
		);

		assert!(matches!(err, Error::AuthExchange(AuthExchangeError::Network { .. })));

		let err = TransportErrorMapper::<std::io::Error>::map_transport_error(
			&mapper,
			GrantType::AuthorizationCode,
			HttpClientError::Other("boom".into()),
		);

		assert!(matches!(err, Error::AuthExchange(AuthExchangeError::Other { .. })));
	}
}
