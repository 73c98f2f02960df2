#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod constants;
pub mod cookies;
pub mod options;
pub mod session;
pub mod token;

pub use crate::api::*;
pub use crate::constants::*;
pub use crate::cookies::*;
pub use crate::options::*;
pub use crate::session::*;
pub use crate::token::*;
