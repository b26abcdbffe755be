//! Authorization-code token exchange.
//!
//! The code delivered to `redirect_uri` is posted to the provider's access-token endpoint
//! together with the same `redirect_uri`; the client authenticates with HTTP Basic.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials},
	error::ValidationError,
	flows::{Authenticator, AuthorizationCallback},
	http::TokenHttpClient,
	oauth::{self, GenericTransportErrorMapper, TokenRequest, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{GrantType, ProviderDescriptor},
};

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code for an access token.
	///
	/// `redirect_uri` must be the value used when building the consent URL.
	pub async fn exchange_auth_code_for_token(
		&self,
		auth_code: &str,
		redirect_uri: &str,
	) -> Result<AccessToken> {
		exchange_code(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			&self.descriptor,
			&self.credentials,
			auth_code,
			redirect_uri,
		)
		.await
	}

	/// Exchanges the code carried by a parsed [`AuthorizationCallback`].
	pub async fn exchange_callback(
		&self,
		callback: &AuthorizationCallback,
		redirect_uri: &str,
	) -> Result<AccessToken> {
		self.exchange_auth_code_for_token(&callback.code, redirect_uri).await
	}
}

/// Exchanges an authorization code for an access token against `api_root`.
///
/// Transport failures are classified by [`GenericTransportErrorMapper`]; build an
/// [`Authenticator`] to pick a different mapper.
pub async fn exchange_auth_code_for_token<C>(
	http_client: &C,
	auth_code: &str,
	client_id: &str,
	client_secret: &str,
	redirect_uri: &str,
	api_root: &str,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
{
	let descriptor = ProviderDescriptor::with_api_root(api_root)?;
	let credentials = ClientCredentials::new(client_id, client_secret)?;

	exchange_code(
		http_client,
		&GenericTransportErrorMapper,
		&descriptor,
		&credentials,
		auth_code,
		redirect_uri,
	)
	.await
}

async fn exchange_code<C, M>(
	http_client: &C,
	mapper: &M,
	descriptor: &ProviderDescriptor,
	credentials: &ClientCredentials,
	auth_code: &str,
	redirect_uri: &str,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	const KIND: FlowKind = FlowKind::AuthorizationCode;

	let span = FlowSpan::new(KIND, "exchange_auth_code_for_token");

	obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

	let result = span
		.instrument(async {
			if auth_code.is_empty() {
				return Err(Error::from(ValidationError::EmptyField { field: "auth_code" }));
			}

			let request = TokenRequest::new(GrantType::AuthorizationCode)
				.param("code", auth_code)
				.param("redirect_uri", redirect_uri);

			oauth::request_access_token(http_client, mapper, descriptor, credentials, request, &span)
				.await
		})
		.await;

	obs::finish(KIND, result)
}
