//! Authentication module
//!
//! Supports: API Key, Basic, Bearer, Custom Headers
//!
//! The `Authenticator` applies credentials to each outgoing request. Token
//! acquisition flows are left to the caller, who passes the resulting token
//! in as a bearer credential.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
