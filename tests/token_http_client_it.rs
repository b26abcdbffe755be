// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
// self
use vimeo_auth::{
	auth::{ClientCredentials, Scope, ScopeList},
	error::{AuthExchangeError, Error, Result},
	flows::Authenticator,
	http::TokenHttpClient,
	oauth::{
		GenericTransportErrorMapper, TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	},
	provider::{GrantType, ProviderDescriptor},
};

#[derive(Debug)]
enum FakeTransportError {
	Offline,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Offline => write!(f, "Transport offline."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Default)]
struct FakeHttpClient {
	offline: bool,
	bodies: Arc<Mutex<Vec<String>>>,
}
impl FakeHttpClient {
	fn offline() -> Self {
		Self { offline: true, ..Default::default() }
	}

	fn recorded_bodies(&self) -> Vec<String> {
		self.bodies.lock().clone()
	}
}
impl TokenHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		FakeHttpHandle(self.clone())
	}
}

struct FakeHttpHandle(FakeHttpClient);
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		self.0.bodies.lock().push(String::from_utf8_lossy(request.body()).into_owned());

		let offline = self.0.offline;

		Box::pin(async move {
			if offline {
				return Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Offline)));
			}

			let mut response = HttpResponse::new(b"{\"access_token\":\"fake-token\"}".to_vec());

			*response.status_mut() = StatusCode::OK;

			Ok(response)
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	grants: Arc<Mutex<Vec<GrantType>>>,
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		grant: GrantType,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.grants.lock().push(grant);

		AuthExchangeError::Other { message: format!("Fake transport failed: {err}") }.into()
	}
}

fn credentials() -> ClientCredentials {
	ClientCredentials::new("abc", "s3cret").expect("Test credentials should be valid.")
}

#[tokio::test]
async fn custom_transport_carries_scope_only_when_requested() {
	let http_client = FakeHttpClient::default();
	let authenticator = <Authenticator<FakeHttpClient, GenericTransportErrorMapper>>::with_http_client(
		ProviderDescriptor::vimeo(),
		credentials(),
		http_client.clone(),
		GenericTransportErrorMapper,
	);
	let scopes = ScopeList::from([Scope::Private, Scope::Upload]);
	let unscoped = authenticator
		.request_client_credentials_token(None)
		.await
		.expect("Unscoped request should succeed.");
	let scoped = authenticator
		.request_client_credentials_token(Some(&scopes))
		.await
		.expect("Scoped request should succeed.");

	assert_eq!(unscoped.expose(), "fake-token");
	assert_eq!(scoped.expose(), "fake-token");
	assert_eq!(
		http_client.recorded_bodies(),
		vec![
			"grant_type=client_credentials".to_owned(),
			"grant_type=client_credentials&scope=private+upload".to_owned(),
		]
	);
}

#[tokio::test]
async fn transport_failures_go_through_the_mapper() {
	let mapper = RecordingTransportErrorMapper::default();
	let authenticator =
		<Authenticator<FakeHttpClient, RecordingTransportErrorMapper>>::with_http_client(
			ProviderDescriptor::vimeo(),
			credentials(),
			FakeHttpClient::offline(),
			mapper.clone(),
		);
	let err = authenticator
		.exchange_auth_code_for_token("c0de", "https://app.example.com/cb")
		.await
		.expect_err("Offline transports should fail.");

	match err {
		Error::AuthExchange(AuthExchangeError::Other { message }) =>
			assert!(message.starts_with("Fake transport failed")),
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(*mapper.grants.lock(), vec![GrantType::AuthorizationCode]);

	let err = authenticator
		.request_client_credentials_token(None)
		.await
		.expect_err("Offline transports should fail.");

	assert!(matches!(err, Error::AuthExchange(AuthExchangeError::Other { .. })));
	assert_eq!(
		*mapper.grants.lock(),
		vec![GrantType::AuthorizationCode, GrantType::ClientCredentials]
	);
}

#[tokio::test]
async fn generic_mapper_classifies_custom_errors_as_network_failures() {
	let err = vimeo_auth::flows::exchange_auth_code_for_token(
		&FakeHttpClient::offline(),
		"c0de",
		"abc",
		"s3cret",
		"https://app.example.com/cb",
		"https://api.vimeo.com",
	)
	.await
	.expect_err("Offline transports should fail.");

	match err {
		Error::AuthExchange(err @ AuthExchangeError::Network { .. }) => {
			let source = StdError::source(&err).expect("Network errors keep their source.");

			assert_eq!(source.to_string(), "Transport offline.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
