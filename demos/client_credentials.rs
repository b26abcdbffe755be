//! Requests an application-only token with the default reqwest transport against a local
//! mock provider.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use vimeo_auth::{
	auth::{ClientCredentials, ScopeList},
	flows::ReqwestAuthenticator,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::ProviderDescriptor,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/authorize/client")
				.body("grant_type=client_credentials&scope=public+upload");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-app-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	let descriptor = ProviderDescriptor::builder().api_root(server.base_url()).build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let authenticator = ReqwestAuthenticator::with_http_client(
		descriptor,
		ClientCredentials::new("demo-client", "super-secret")?,
		http_client,
		ReqwestTransportErrorMapper,
	);
	let scopes: ScopeList = "public upload".parse()?;
	let token = authenticator.request_client_credentials_token(Some(&scopes)).await?;

	println!("Application token: {}.", token.expose());

	token_mock.assert_async().await;

	Ok(())
}
