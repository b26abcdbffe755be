// self
use crate::{_prelude::*, error::ConfigError};

/// Base URL of the provider API, stored without a trailing slash.
///
/// The value keeps the caller's spelling (no URL normalization) so generated URLs match the
/// configured root byte for byte.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiRoot(String);
impl ApiRoot {
	/// Production Vimeo API root.
	pub const VIMEO: &'static str = "https://api.vimeo.com";

	/// Parses and validates an API root.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = value.as_ref().trim();
		let url = Url::parse(raw).map_err(|source| ConfigError::InvalidApiRoot { source })?;

		if !matches!(url.scheme(), "http" | "https")
			|| url.cannot_be_a_base()
			|| url.query().is_some()
			|| url.fragment().is_some()
		{
			return Err(ConfigError::UnsupportedApiRoot { url: raw.to_owned() });
		}

		Ok(Self(raw.trim_end_matches('/').to_owned()))
	}

	/// Returns the root as configured, minus any trailing slash.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Appends an endpoint path (which starts with `/`) to the root.
	pub fn join(&self, path: &str) -> String {
		format!("{}{path}", self.0)
	}
}
impl Default for ApiRoot {
	fn default() -> Self {
		Self(Self::VIMEO.into())
	}
}
impl AsRef<str> for ApiRoot {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for ApiRoot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ApiRoot({})", self.0)
	}
}
impl Display for ApiRoot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<ApiRoot> for String {
	fn from(value: ApiRoot) -> Self {
		value.0
	}
}
impl TryFrom<String> for ApiRoot {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ApiRoot {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_root_strips_trailing_slashes() {
		let root = ApiRoot::new("https://api.vimeo.com/").expect("API root should parse.");

		assert_eq!(root.as_str(), "https://api.vimeo.com");
		assert_eq!(root.join("/oauth/authorize"), "https://api.vimeo.com/oauth/authorize");

		let nested = ApiRoot::new("https://proxy.example.com/vimeo//")
			.expect("API root with a path prefix should parse.");

		assert_eq!(
			nested.join("/oauth/access_token"),
			"https://proxy.example.com/vimeo/oauth/access_token"
		);
	}

	#[test]
	fn api_root_rejects_unusable_urls() {
		assert!(matches!(ApiRoot::new("api.vimeo.com"), Err(ConfigError::InvalidApiRoot { .. })));
		assert!(matches!(
			ApiRoot::new("ftp://api.vimeo.com"),
			Err(ConfigError::UnsupportedApiRoot { .. })
		));
		assert!(matches!(
			ApiRoot::new("https://api.vimeo.com?x=1"),
			Err(ConfigError::UnsupportedApiRoot { .. })
		));
		assert!(matches!(
			ApiRoot::new("mailto:dev@example.com"),
			Err(ConfigError::UnsupportedApiRoot { .. })
		));
	}
}
