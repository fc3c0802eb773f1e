//! Identity provider adapters.
//!
//! A thin HTTP implementation of the `IdentityOracle` port against an
//! OAuth2 token-info endpoint.

mod dto;
mod tokeninfo;

pub use tokeninfo::{DEFAULT_TOKENINFO_URL, TokenInfoOracle};
