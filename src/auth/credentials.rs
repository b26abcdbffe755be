//! Application credentials used for HTTP Basic client authentication.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ValidationError};

/// Application identifier/secret pair registered with the provider.
///
/// The pair only ever leaves the process as an `Authorization: Basic` header value; the
/// secret is redacted from every formatter. Deserializing (e.g. from an application config
/// file) applies the same checks as [`ClientCredentials::new`]; there is no `Serialize`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientCredentials")]
pub struct ClientCredentials {
	/// Public client identifier.
	pub client_id: String,
	client_secret: String,
}
impl ClientCredentials {
	/// Creates a credential pair, rejecting empty identifiers or secrets.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ValidationError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();

		if client_id.is_empty() {
			return Err(ValidationError::EmptyField { field: "client_id" });
		}
		if client_secret.is_empty() {
			return Err(ValidationError::EmptyField { field: "client_secret" });
		}

		Ok(Self { client_id, client_secret })
	}

	/// Returns the client secret. Callers must avoid logging this string.
	pub fn expose_secret(&self) -> &str {
		&self.client_secret
	}

	/// Builds the `Authorization` header value: `Basic base64(client_id:client_secret)`.
	pub fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.client_id, self.client_secret);

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl TryFrom<RawClientCredentials> for ClientCredentials {
	type Error = ValidationError;

	fn try_from(raw: RawClientCredentials) -> Result<Self, Self::Error> {
		Self::new(raw.client_id, raw.client_secret)
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.finish()
	}
}

#[derive(Deserialize)]
struct RawClientCredentials {
	client_id: String,
	client_secret: String,
}
