//! OAuth flows: consent URL construction, authorization-code exchange, and client
//! credentials.
//!
//! Every operation is available both as a method on [`Authenticator`], which bundles the
//! provider descriptor, client credentials, and injected transport, and as a free function
//! that takes those pieces per call.

pub mod auth_code;
pub mod authorize;
pub mod callback;
pub mod client_credentials;

pub use auth_code::*;
pub use authorize::*;
pub use callback::*;
pub use client_credentials::*;

// self
use crate::{
	_prelude::*, auth::ClientCredentials, http::TokenHttpClient, oauth::TransportErrorMapper,
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Runs the provider's OAuth flows for one registered application.
///
/// The authenticator holds no mutable state: each call performs at most one round trip
/// through the injected HTTP client and hands the token back. Clones share the transport
/// and mapper, so one value can serve many concurrent tasks.
pub struct Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines the API root, endpoints, and quirks.
	pub descriptor: ProviderDescriptor,
	/// Application credentials used for Basic client authentication.
	pub credentials: ClientCredentials,
}
impl<C, M> Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an authenticator that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		credentials: ClientCredentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			credentials,
		}
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an authenticator with its own reqwest transport (certificate validation on,
	/// redirects off).
	pub fn new(descriptor: ProviderDescriptor, credentials: ClientCredentials) -> Result<Self> {
		Ok(Self::with_http_client(
			descriptor,
			credentials,
			ReqwestHttpClient::new()?,
			ReqwestTransportErrorMapper,
		))
	}

	/// Creates an authenticator for `https://api.vimeo.com`.
	pub fn vimeo(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
		let credentials = ClientCredentials::new(client_id, client_secret)?;

		Self::new(ProviderDescriptor::vimeo(), credentials)
	}
}
impl<C, M> Clone for Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			descriptor: self.descriptor.clone(),
			credentials: self.credentials.clone(),
		}
	}
}
impl<C, M> Debug for Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("descriptor", &self.descriptor)
			.field("credentials", &self.credentials)
			.finish()
	}
}
