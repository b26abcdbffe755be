//! Client-credentials token request for application-only access.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials, ScopeList},
	flows::Authenticator,
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
	/// Requests an application-scoped token.
	///
	/// `scope` is sent only when `scopes` is `Some` and non-empty; the provider applies its
	/// own default otherwise.
	pub async fn request_client_credentials_token(
		&self,
		scopes: Option<&ScopeList>,
	) -> Result<AccessToken> {
		request_token(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			&self.descriptor,
			&self.credentials,
			scopes,
		)
		.await
	}
}

/// Requests an application-scoped token from `api_root`.
///
/// Scope names are validated before any request is made.
pub async fn request_client_credentials_token<C, I, S>(
	http_client: &C,
	client_id: &str,
	client_secret: &str,
	scopes: Option<I>,
	api_root: &str,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let scopes = scopes.map(ScopeList::parse).transpose()?;
	let descriptor = ProviderDescriptor::with_api_root(api_root)?;
	let credentials = ClientCredentials::new(client_id, client_secret)?;

	request_token(
		http_client,
		&GenericTransportErrorMapper,
		&descriptor,
		&credentials,
		scopes.as_ref(),
	)
	.await
}

async fn request_token<C, M>(
	http_client: &C,
	mapper: &M,
	descriptor: &ProviderDescriptor,
	credentials: &ClientCredentials,
	scopes: Option<&ScopeList>,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	const KIND: FlowKind = FlowKind::ClientCredentials;

	let span = FlowSpan::new(KIND, "request_client_credentials_token");

	obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

	let result = span
		.instrument(async {
			let mut request = TokenRequest::new(GrantType::ClientCredentials);

			if let Some(scopes) = scopes.filter(|scopes| !scopes.is_empty()) {
				request = request
					.param("scope", scopes.join(descriptor.quirks.form_scope_delimiter, false));
			}

			oauth::request_access_token(http_client, mapper, descriptor, credentials, request, &span)
				.await
		})
		.await;

	obs::finish(KIND, result)
}
