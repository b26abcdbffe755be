//! Parsing of the provider's redirect back to the application.

// self
use crate::{
	_prelude::*,
	error::{AuthExchangeError, ConfigError, ValidationError},
};

/// Authorization code delivered to `redirect_uri` after the user consents.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
	/// Short-lived authorization code to exchange for a token.
	pub code: String,
	/// `state` echoed by the provider, if any.
	pub state: Option<String>,
}
impl AuthorizationCallback {
	/// Parses the full redirect URL the provider sent the browser to.
	///
	/// When `expected_state` is set, the echoed `state` must match it exactly; this is checked
	/// before the redirect's `error` parameter.
	pub fn from_redirect(redirect: &str, expected_state: Option<&str>) -> Result<Self> {
		let url = Url::parse(redirect).map_err(|source| ConfigError::InvalidRedirect { source })?;

		Self::from_url(&url, expected_state)
	}

	/// Parses an already-parsed redirect URL.
	pub fn from_url(url: &Url, expected_state: Option<&str>) -> Result<Self> {
		let mut code = None;
		let mut state = None;
		let mut error = None;
		let mut description = None;

		for (key, value) in url.query_pairs() {
			match key.as_ref() {
				"code" => code = Some(value.into_owned()),
				"state" => state = Some(value.into_owned()),
				"error" => error = Some(value.into_owned()),
				"error_description" => description = Some(value.into_owned()),
				_ => {},
			}
		}

		// Error redirects echo `state` as well.
		if expected_state.is_some_and(|expected| state.as_deref() != Some(expected)) {
			return Err(ValidationError::StateMismatch.into());
		}
		if let Some(error) = error {
			return Err(AuthExchangeError::Denied { error, description }.into());
		}

		let code = code.filter(|code| !code.is_empty()).ok_or(ValidationError::MissingCode)?;

		Ok(Self { code, state })
	}
}
impl Debug for AuthorizationCallback {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCallback")
			.field("code", &"<redacted>")
			.field("state", &self.state)
			.finish()
	}
}
