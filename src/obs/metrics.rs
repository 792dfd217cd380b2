//! Counters emitted through the global `metrics` recorder.

// self
use crate::{
	flows::TokenValidity,
	obs::{FlowKind, FlowOutcome},
};

/// Counter incremented once per authenticator attempt, success, and failure.
pub const FLOW_COUNTER: &str = "oauth1_broker_flow_total";
/// Counter incremented once per verify-endpoint answer, labeled by the resulting validity.
pub const VERIFY_COUNTER: &str = "oauth1_broker_verify_total";

/// Records a flow outcome under [`FLOW_COUNTER`].
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records what the verify endpoint said about a user's credentials under [`VERIFY_COUNTER`].
///
/// `Missing` never reaches the provider, so only `valid` and `revoked` are counted.
pub fn record_verification(validity: TokenValidity) {
	if validity == TokenValidity::Missing {
		return;
	}

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(VERIFY_COUNTER, "validity" => validity.as_str()).increment(1);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn counters_are_safe_without_a_recorder() {
		record_flow_outcome(FlowKind::Callback, FlowOutcome::Failure);
		record_verification(TokenValidity::Revoked);
		record_verification(TokenValidity::Missing);

		assert_ne!(FLOW_COUNTER, VERIFY_COUNTER);
	}
}
