#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! HTTP adapters for the application API and the SSO token endpoint.

mod api;
mod endpoint;
mod error;
mod http;
mod sso;

pub use api::ApiClient;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use sso::SsoClient;
