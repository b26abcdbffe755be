//! Provider descriptor data structures and helpers shared by all flows.
//!
//! The module exposes validated metadata, supporting builder utilities, and
//! grant-specific helpers so flows can stay agnostic of the concrete provider layout.

/// API root parsing and endpoint joining.
pub mod api_root;
/// Builder API for assembling provider descriptors.
pub mod builder;
/// Grant helpers wired into provider descriptors.
pub mod grant;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use api_root::*;
pub use builder::*;
pub use grant::*;
pub use quirks::*;

// self
use crate::_prelude::*;

/// Endpoint paths declared by a provider descriptor, relative to the API root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoints {
	/// Consent page the user's browser is sent to.
	pub authorization: String,
	/// Token endpoint for the authorization-code grant.
	pub access_token: String,
	/// Token endpoint for the client-credentials grant.
	pub client_credentials: String,
}
impl ProviderEndpoints {
	/// Returns the token endpoint path serving `grant`.
	pub fn token(&self, grant: GrantType) -> &str {
		match grant {
			GrantType::AuthorizationCode => &self.access_token,
			GrantType::ClientCredentials => &self.client_credentials,
		}
	}
}
impl Default for ProviderEndpoints {
	fn default() -> Self {
		Self {
			authorization: "/oauth/authorize".into(),
			access_token: "/oauth/access_token".into(),
			client_credentials: "/oauth/authorize/client".into(),
		}
	}
}

/// Immutable provider descriptor consumed by flows.
///
/// Deserializing fills missing fields from [`ProviderDescriptor::vimeo`]; call
/// [`ProviderDescriptor::validate`] on values that did not come from the builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDescriptor {
	/// Base URL every endpoint path is appended to.
	pub api_root: ApiRoot,
	/// Endpoint paths exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Versioned media type sent in the `Accept` header of token requests.
	pub accept: String,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Versioned media type pinned for token requests.
	pub const VIMEO_ACCEPT: &'static str = "application/vnd.vimeo.*+json; version=3.2";

	/// Descriptor for `https://api.vimeo.com` with API version 3.2.
	pub fn vimeo() -> Self {
		Self {
			api_root: ApiRoot::default(),
			endpoints: ProviderEndpoints::default(),
			accept: Self::VIMEO_ACCEPT.into(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Vimeo descriptor pointed at a different API root (staging hosts, mock servers).
	pub fn with_api_root(api_root: impl AsRef<str>) -> Result<Self> {
		Ok(Self { api_root: ApiRoot::new(api_root)?, ..Self::vimeo() })
	}

	/// Creates a new builder seeded with the Vimeo defaults.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Absolute URL of the consent page, without query.
	pub fn authorization_endpoint(&self) -> String {
		self.api_root.join(&self.endpoints.authorization)
	}

	/// Absolute URL of the token endpoint serving `grant`.
	pub fn token_endpoint(&self, grant: GrantType) -> String {
		self.api_root.join(self.endpoints.token(grant))
	}
}
impl Default for ProviderDescriptor {
	fn default() -> Self {
		Self::vimeo()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn vimeo_descriptor_resolves_endpoints() {
		let descriptor = ProviderDescriptor::vimeo();

		assert_eq!(descriptor.authorization_endpoint(), "https://api.vimeo.com/oauth/authorize");
		assert_eq!(
			descriptor.token_endpoint(GrantType::AuthorizationCode),
			"https://api.vimeo.com/oauth/access_token"
		);
		assert_eq!(
			descriptor.token_endpoint(GrantType::ClientCredentials),
			"https://api.vimeo.com/oauth/authorize/client"
		);
		assert_eq!(descriptor.accept, "application/vnd.vimeo.*+json; version=3.2");
	}

	#[test]
	fn partial_config_fills_defaults() {
		let descriptor: ProviderDescriptor =
			serde_json::from_str(r#"{"api_root":"http://127.0.0.1:8080/"}"#)
				.expect("Partial descriptor config should deserialize.");

		assert_eq!(descriptor.api_root.as_str(), "http://127.0.0.1:8080");
		assert_eq!(descriptor.endpoints, ProviderEndpoints::default());
		assert_eq!(descriptor.accept, ProviderDescriptor::VIMEO_ACCEPT);
		assert!(descriptor.validate().is_ok());
		assert!(serde_json::from_str::<ProviderDescriptor>(r#"{"api_root":"not a url"}"#).is_err());
	}
}
