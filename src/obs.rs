//! Optional observability helpers for authenticator flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_broker.flow` with the `flow` and
//!   `stage` (call site) fields, plus a warning event when a flow fails.
//! - Enable `metrics` to increment the `oauth1_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and `oauth1_broker_verify_total` for
//!   every verify-endpoint answer, labeled by `validity`.
//!
//! Both compile to no-ops when their feature is disabled. Secrets never reach either sink: only
//! flow labels and error messages, which carry no token material, are recorded.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Authenticator operations observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Temporary-token request and authorize URL construction.
	Authorize,
	/// Callback processing and verifier exchange.
	Callback,
	/// Verification probe against stored credentials.
	Verify,
	/// `Authorization` header computation for a resource request.
	Sign,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::Callback => "callback",
			FlowKind::Verify => "verify",
			FlowKind::Sign => "sign",
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
	/// Entry to an authenticator operation.
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

/// Runs `fut` inside a [`FlowSpan`] and records its attempt and outcome.
pub async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(e) => {
			span.record_failure(e);
			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}

	result
}
