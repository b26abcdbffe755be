// crates.io
use oauth2::http::HeaderValue;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::{ApiRoot, ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Endpoint paths are joined onto the API root and must be absolute.
	#[error("The {endpoint} endpoint path must start with '/': {path}.")]
	RelativeEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// `Accept` value cannot be sent as an HTTP header.
	#[error("Accept media type is not a valid header value: {value}.")]
	InvalidAccept {
		/// Rejected media type.
		value: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
}

/// Builder for [`ProviderDescriptor`] values, seeded with the Vimeo defaults.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Raw API root, parsed during [`build`](Self::build).
	pub api_root: Option<String>,
	/// Endpoint paths.
	pub endpoints: ProviderEndpoints,
	/// Versioned `Accept` media type.
	pub accept: String,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with [`ProviderDescriptor::vimeo`].
	pub fn new() -> Self {
		let ProviderDescriptor { endpoints, accept, quirks, .. } = ProviderDescriptor::vimeo();

		Self { api_root: None, endpoints, accept, quirks }
	}

	/// Sets the API root.
	pub fn api_root(mut self, api_root: impl Into<String>) -> Self {
		self.api_root = Some(api_root.into());

		self
	}

	/// Sets the consent page path.
	pub fn authorization_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.authorization = path.into();

		self
	}

	/// Sets the authorization-code token endpoint path.
	pub fn access_token_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.access_token = path.into();

		self
	}

	/// Sets the client-credentials token endpoint path.
	pub fn client_credentials_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.client_credentials = path.into();

		self
	}

	/// Overrides the `Accept` media type (e.g. to pin another API version).
	pub fn accept(mut self, accept: impl Into<String>) -> Self {
		self.accept = accept.into();

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ConfigError> {
		let api_root = match self.api_root {
			Some(raw) => ApiRoot::new(raw)?,
			None => ApiRoot::default(),
		};
		let descriptor = ProviderDescriptor {
			api_root,
			endpoints: self.endpoints,
			accept: self.accept,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl Default for ProviderDescriptorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_path("authorization", &self.endpoints.authorization)?;
		validate_path("access_token", &self.endpoints.access_token)?;
		validate_path("client_credentials", &self.endpoints.client_credentials)?;

		if HeaderValue::from_str(&self.accept).is_err() {
			return Err(ProviderDescriptorError::InvalidAccept { value: self.accept.clone() });
		}

		validate_scope_delimiter(self.quirks.scope_delimiter)?;
		validate_scope_delimiter(self.quirks.form_scope_delimiter)?;

		Ok(())
	}
}

fn validate_path(name: &'static str, path: &str) -> Result<(), ProviderDescriptorError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(ProviderDescriptorError::RelativeEndpoint { endpoint: name, path: path.to_owned() })
	}
}

fn validate_scope_delimiter(delimiter: char) -> Result<(), ProviderDescriptorError> {
	if delimiter.is_control() {
		Err(ProviderDescriptorError::InvalidScopeDelimiter { delimiter })
	} else {
		Ok(())
	}
}
