//! Public extension contracts for attaching signed `Authorization` headers to outbound requests.
//!
//! [`RequestSignerExt`] stays generic over the request type so callers can integrate any client
//! builder; [`HttpRequestSigner`] covers the [`::http`] request type the broker itself speaks.

pub mod request_signer;

pub use request_signer::*;
