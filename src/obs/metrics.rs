// self
use crate::obs::{FlowKind, FlowOutcome};

const FLOW_TOTAL: &str = "vimeo_auth_flow_total";
const TOKEN_STATUS_TOTAL: &str = "vimeo_auth_token_status_total";

/// Counts one flow attempt, success, or failure (`vimeo_auth_flow_total{flow, outcome}`).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_TOTAL, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (FLOW_TOTAL, kind, outcome);
	}
}

/// Counts a token endpoint answer by HTTP status class
/// (`vimeo_auth_token_status_total{flow, class}`).
pub fn record_token_status(kind: FlowKind, status: u16) {
	#[cfg(feature = "metrics")]
	{
		let class = status_class(status);

		metrics::counter!(TOKEN_STATUS_TOTAL, "flow" => kind.as_str(), "class" => class)
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (TOKEN_STATUS_TOTAL, kind, status_class(status));
	}
}

fn status_class(status: u16) -> &'static str {
	match status {
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}
