//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the temporary-token,
//! access-token, authorize, and verification endpoints, the registered callback, and provider
//! quirks. `strategy` defines [`ProviderStrategy`], the narrow capability each provider injects:
//! its name, how to resolve the owning user from fresh credentials, and how to classify error
//! responses.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
