//! Driving port for resolving bearer credentials to local users.
//!
//! Inbound adapters call this before any other port so that handlers only
//! ever see an authenticated [`User`].

use async_trait::async_trait;

use crate::domain::{BearerCredential, Error, User};

/// Result of a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub user: User,
    /// Whether the account was provisioned by this call.
    pub created: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify the credential and provision an account on first contact.
    async fn sign_in(&self, credential: &BearerCredential) -> Result<SignInOutcome, Error>;

    /// Verify the credential and require an existing, usable account.
    async fn authenticate(&self, credential: &BearerCredential) -> Result<User, Error>;
}
