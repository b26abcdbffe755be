//! Consent URL construction for the authorization-code flow.
//!
//! [`AuthorizationRequest::authorize_url`] reproduces the provider's documented URL layout
//! verbatim: values are concatenated without percent-encoding and every scope is followed
//! by `+` (`scope=public+private+`). Redirect URIs that carry reserved characters (`&`, `?`,
//! `#`) cannot survive that layout, so
//! [`AuthorizationRequest::authorize_url_encoded`] builds the same query with proper
//! `application/x-www-form-urlencoded` serialization.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::ScopeList,
	error::ConfigError,
	flows::Authenticator,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{FlowKind, FlowSpan},
	provider::ProviderDescriptor,
};

const STATE_LEN: usize = 32;

/// Parameters of a consent page redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Client identifier of the application asking for consent.
	pub client_id: String,
	/// Requested scopes; empty means every scope.
	pub scopes: ScopeList,
	/// Redirect URI registered for the application.
	///
	/// Must match the value later passed to the code exchange.
	pub redirect_uri: String,
	/// Optional CSRF `state` that must round-trip via the redirect.
	pub state: Option<String>,
}
impl AuthorizationRequest {
	/// Creates a request without `state`.
	pub fn new(
		client_id: impl Into<String>,
		scopes: ScopeList,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self { client_id: client_id.into(), scopes, redirect_uri: redirect_uri.into(), state: None }
	}

	/// Attaches a caller-chosen `state`.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Attaches a freshly generated 32-character alphanumeric `state`.
	pub fn with_random_state(self) -> Self {
		let state = rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from);

		self.with_state(state.collect::<String>())
	}

	/// Builds the consent URL in the provider's verbatim layout.
	pub fn authorize_url(&self, descriptor: &ProviderDescriptor) -> String {
		let _span = FlowSpan::new(FlowKind::Authorize, "authorize_url").entered();
		let quirks = descriptor.quirks;
		let scopes = self.scopes.clone().or_all();
		let mut url = format!(
			"{}?response_type=code&client_id={}&scope={}&redirect_uri={}",
			descriptor.authorization_endpoint(),
			self.client_id,
			scopes.join(quirks.scope_delimiter, quirks.trailing_scope_delimiter),
			self.redirect_uri,
		);

		if let Some(state) = &self.state {
			url.push_str("&state=");
			url.push_str(state);
		}

		url
	}

	/// Builds the consent URL with every query value percent-encoded.
	///
	/// The redirect URI must parse as an absolute URL.
	pub fn authorize_url_encoded(&self, descriptor: &ProviderDescriptor) -> Result<Url> {
		let _span = FlowSpan::new(FlowKind::Authorize, "authorize_url_encoded").entered();
		let redirect = Url::parse(&self.redirect_uri)
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut url = Url::parse(&descriptor.authorization_endpoint())
			.map_err(|source| ConfigError::InvalidApiRoot { source })?;
		let scopes = self.scopes.clone().or_all();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_id);
		pairs.append_pair("scope", &scopes.join(descriptor.quirks.form_scope_delimiter, false));
		pairs.append_pair("redirect_uri", redirect.as_str());

		if let Some(state) = &self.state {
			pairs.append_pair("state", state);
		}

		drop(pairs);

		Ok(url)
	}
}

/// Builds the consent URL the user's browser must be sent to.
///
/// Scope names are validated before anything else; an unknown name fails with
/// [`ValidationError::UnknownScope`](crate::error::ValidationError::UnknownScope). Passing no
/// scopes (an empty slice or `None`) requests every scope.
///
/// `api_root` is then validated as an [`ApiRoot`](crate::provider::ApiRoot): surrounding
/// whitespace and trailing `/` are dropped, and a root that is not an absolute `http(s)` URL
/// without query or fragment fails with
/// [`ConfigError::InvalidApiRoot`] or [`ConfigError::UnsupportedApiRoot`].
///
/// ```
/// let url = vimeo_auth::flows::build_authorization_url(
/// 	"https://api.vimeo.com",
/// 	"abc",
/// 	["public"],
/// 	"https://app.example.com/cb",
/// )?;
///
/// assert_eq!(
/// 	url,
/// 	"https://api.vimeo.com/oauth/authorize?response_type=code&client_id=abc&scope=public+&redirect_uri=https://app.example.com/cb"
/// );
/// # Ok::<(), vimeo_auth::error::Error>(())
/// ```
pub fn build_authorization_url<I, S>(
	api_root: &str,
	client_id: &str,
	scopes: I,
	redirect_uri: &str,
) -> Result<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let scopes = ScopeList::parse(scopes)?;
	let descriptor = ProviderDescriptor::with_api_root(api_root)?;

	Ok(AuthorizationRequest::new(client_id, scopes, redirect_uri).authorize_url(&descriptor))
}

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Starts an [`AuthorizationRequest`] for this application.
	pub fn authorization_request(
		&self,
		scopes: ScopeList,
		redirect_uri: impl Into<String>,
	) -> AuthorizationRequest {
		AuthorizationRequest::new(self.credentials.client_id.clone(), scopes, redirect_uri)
	}

	/// Builds the consent URL for this application; see [`build_authorization_url`].
	pub fn build_authorization_url<I, S>(&self, scopes: I, redirect_uri: &str) -> Result<String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let scopes = ScopeList::parse(scopes)?;

		Ok(self.authorization_request(scopes, redirect_uri).authorize_url(&self.descriptor))
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;
	use crate::{auth::Scope, error::ValidationError};

	#[test]
	fn verbatim_url_matches_provider_layout() {
		let url = build_authorization_url(
			"https://api.vimeo.com",
			"abc",
			["public"],
			"https://app.example.com/cb",
		)
		.expect("Valid inputs should build a URL.");

		assert_eq!(
			url,
			"https://api.vimeo.com/oauth/authorize?response_type=code&client_id=abc&scope=public+&redirect_uri=https://app.example.com/cb"
		);
	}

	#[test]
	fn missing_scopes_request_everything() {
		let expected = "scope=interact+private+public+create+edit+delete+upload+&";
		let empty: [&str; 0] = [];
		let from_empty =
			build_authorization_url("https://api.vimeo.com", "abc", empty, "https://a.test/cb")
				.expect("Empty scopes should build a URL.");
		let from_none =
			build_authorization_url("https://api.vimeo.com", "abc", None::<&str>, "https://a.test/cb")
				.expect("Absent scopes should build a URL.");

		assert!(from_empty.contains(expected));
		assert_eq!(from_empty, from_none);
	}

	#[test]
	fn unknown_scopes_fail_before_building() {
		let err = build_authorization_url(
			"not even a url",
			"abc",
			["public", "superuser"],
			"https://app.example.com/cb",
		)
		.expect_err("Unknown scopes must be rejected.");

		match err {
			Error::Validation(ValidationError::UnknownScope { scope, allowed }) => {
				assert_eq!(scope, "superuser");
				assert!(allowed.contains("'upload'"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn state_is_appended_after_redirect() {
		let request =
			AuthorizationRequest::new("abc", Scope::Private.into(), "https://app.example.com/cb")
				.with_state("xyz");

		assert!(
			request
				.authorize_url(&ProviderDescriptor::vimeo())
				.ends_with("scope=private+&redirect_uri=https://app.example.com/cb&state=xyz")
		);

		let random = AuthorizationRequest::new("abc", ScopeList::default(), "https://a.test/cb")
			.with_random_state();
		let state = random.state.expect("Random state should be attached.");

		assert_eq!(state.len(), STATE_LEN);
		assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[test]
	fn encoded_url_survives_reserved_characters() {
		let request = AuthorizationRequest::new(
			"abc",
			ScopeList::from([Scope::Public, Scope::Upload]),
			"https://app.example.com/cb?next=/home&lang=en",
		)
		.with_state("s t");
		let url = request
			.authorize_url_encoded(&ProviderDescriptor::vimeo())
			.expect("Encoded URL should build.");
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(url.path(), "/oauth/authorize");
		assert_eq!(pairs.get("scope"), Some(&"public upload".to_owned()));
		assert_eq!(
			pairs.get("redirect_uri"),
			Some(&"https://app.example.com/cb?next=/home&lang=en".to_owned())
		);
		assert_eq!(pairs.get("state"), Some(&"s t".to_owned()));

		let bad = AuthorizationRequest::new("abc", ScopeList::default(), "/relative/cb");

		assert!(matches!(
			bad.authorize_url_encoded(&ProviderDescriptor::vimeo()),
			Err(Error::Config(ConfigError::InvalidRedirect { .. }))
		));
	}

	#[test]
	fn api_roots_are_normalized_or_rejected() {
		let build = |api_root| {
			build_authorization_url(api_root, "abc", ["public"], "https://a.test/cb")
		};
		let url = build(" https://api.vimeo.com/ ").expect("Padded roots should build a URL.");

		assert!(url.starts_with("https://api.vimeo.com/oauth/authorize?"));
		assert!(matches!(
			build("ftp://api.vimeo.com"),
			Err(Error::Config(ConfigError::UnsupportedApiRoot { .. }))
		));
		assert!(matches!(
			build("https://api.vimeo.com?x=1"),
			Err(Error::Config(ConfigError::UnsupportedApiRoot { .. }))
		));
		assert!(matches!(
			build("api.vimeo.com"),
			Err(Error::Config(ConfigError::InvalidApiRoot { .. }))
		));
	}
}
