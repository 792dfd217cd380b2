//! Auth-domain identifiers, consumer configuration, and credential models.

pub mod consumer;
pub mod id;
pub mod token;

pub use consumer::*;
pub use id::*;
pub use token::{credentials::*, pending::*, secret::*};
