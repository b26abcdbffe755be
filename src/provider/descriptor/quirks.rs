// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how requests are shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Character placed between scopes in the authorization URL.
	pub scope_delimiter: char,
	/// Whether every scope in the authorization URL is followed by the delimiter,
	/// including the last one (`scope=public+private+`).
	pub trailing_scope_delimiter: bool,
	/// Character used to join scopes in token request form bodies.
	pub form_scope_delimiter: char,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { scope_delimiter: '+', trailing_scope_delimiter: true, form_scope_delimiter: ' ' }
	}
}
