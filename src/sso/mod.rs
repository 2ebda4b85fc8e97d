//! OIDC single sign-on interceptor.
//!
//! Requests carry an `id_token` (query or cookie) and a request forgery
//! protection secret (cookie). The token's `nonce` must be the SHA-256 of that
//! secret. Anything else restarts the login flow at the identity provider.

pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod jwks;
pub mod request;
pub mod response;
pub mod same_site;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{IdentityProvider, InterceptorConfig};
pub use handler::{Outcome, SsoHandler};
pub use request::SsoRequest;
pub use response::SsoResponse;
