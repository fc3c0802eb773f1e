//! Driven port for verifying bearer credentials with an identity provider.

use async_trait::async_trait;

use crate::domain::{BearerCredential, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Failures reported by identity oracle adapters.
    pub enum IdentityError {
        /// The provider rejected the credential.
        InvalidCredential { message: String } => "credential rejected: {message}",
        /// The provider could not be reached or answered unexpectedly.
        ProviderUnavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Exchanges a bearer credential for a verified identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityOracle: Send + Sync {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityError>;
}

/// Oracle that accepts a fixed set of tokens.
///
/// Only compiled for tests and the `test-support` feature; production builds
/// always talk to a real provider.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone)]
pub struct FixtureIdentityOracle {
    identities: std::collections::HashMap<String, VerifiedIdentity>,
}

#[cfg(any(test, feature = "test-support"))]
impl FixtureIdentityOracle {
    /// Accept `token` as proof of `identity`.
    #[must_use]
    pub fn with_identity(mut self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl IdentityOracle for FixtureIdentityOracle {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityError> {
        self.identities
            .get(credential.expose())
            .cloned()
            .ok_or_else(|| IdentityError::invalid_credential("unknown fixture token"))
    }
}
