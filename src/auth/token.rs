//! Token secrets, long-lived credentials, and pending temporary tokens.

pub mod credentials;
pub mod pending;
pub mod secret;
