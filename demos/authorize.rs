//! Walks the authorization-code flow against a local mock provider: build the consent URL,
//! parse the redirect the browser lands on, then exchange the code for a token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use vimeo_auth::{
	auth::{ClientCredentials, Scope, ScopeList},
	flows::{AuthorizationCallback, ReqwestAuthenticator},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::ProviderDescriptor,
	reqwest::Client,
};

const REDIRECT_URI: &str = "https://app.example.com/cb";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-user-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	// The mock server uses a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let authenticator = ReqwestAuthenticator::with_http_client(
		ProviderDescriptor::with_api_root(server.base_url())?,
		ClientCredentials::new("demo-client", "super-secret")?,
		http_client,
		ReqwestTransportErrorMapper,
	);
	let request = authenticator
		.authorization_request(ScopeList::from([Scope::Public, Scope::Private]), REDIRECT_URI)
		.with_random_state();

	println!("Send the user to: {}", request.authorize_url(&authenticator.descriptor));

	let state = request.state.clone().unwrap_or_default();
	// What the provider would redirect to after consent.
	let redirect = format!("{REDIRECT_URI}?code=demo-code&state={state}");
	let callback = AuthorizationCallback::from_redirect(&redirect, request.state.as_deref())?;
	let token = authenticator.exchange_callback(&callback, REDIRECT_URI).await?;

	println!("Authorization header: {}", token.bearer());

	token_mock.assert_async().await;

	Ok(())
}
