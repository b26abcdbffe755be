//! Optional observability helpers for auth flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `vimeo_auth.flow` with the `flow` (grant)
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `vimeo_auth_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and
//!   `vimeo_auth_token_status_total` for every token endpoint answer, labeled by `flow` +
//!   status `class`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, provider::GrantType};

/// Flow kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Consent URL construction.
	Authorize,
	/// Authorization-code token exchange.
	AuthorizationCode,
	/// Client-credentials token request.
	ClientCredentials,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::ClientCredentials => "client_credentials",
		}
	}
}
impl From<GrantType> for FlowKind {
	fn from(grant: GrantType) -> Self {
		match grant {
			GrantType::AuthorizationCode => FlowKind::AuthorizationCode,
			GrantType::ClientCredentials => FlowKind::ClientCredentials,
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the final outcome of `result` for `kind` and hands the result back.
pub(crate) fn finish<T>(kind: FlowKind, result: Result<T>) -> Result<T> {
	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(flow = kind.as_str(), error = %_e, "Flow failed.");

			record_flow_outcome(kind, FlowOutcome::Failure)
		},
	}

	result
}
