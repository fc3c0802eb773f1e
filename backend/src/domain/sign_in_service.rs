//! Sign-in and per-request authentication.
//!
//! Credentials are verified by the identity oracle on every call. Sign-in
//! provisions an account on first contact; every other request requires the
//! account to exist already.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::persistence_errors::map_user_error;
use crate::domain::ports::{
    Authenticator, IdentityError, IdentityOracle, SignInOutcome, UserPersistenceError,
    UserRepository,
};
use crate::domain::timestamps::stored_now;
use crate::domain::{
    BearerCredential, Error, NewUser, OAuthLink, User, UserId, UserStatus, VerifiedIdentity,
};

/// Authenticator backed by an identity oracle and the user repository.
pub struct SignInService<U, O> {
    users: Arc<U>,
    oracle: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<U, O> SignInService<U, O> {
    pub fn new(users: Arc<U>, oracle: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            oracle,
            clock,
        }
    }
}

fn map_identity_error(error: IdentityError) -> Error {
    match error {
        IdentityError::InvalidCredential { message } => {
            warn!(reason = %message, "bearer credential rejected");
            Error::unauthorized("invalid or expired credential")
        }
        IdentityError::ProviderUnavailable { message } => {
            warn!(reason = %message, "identity provider unavailable");
            Error::service_unavailable("identity provider unavailable")
        }
    }
}

fn ensure_usable(user: User) -> Result<User, Error> {
    if user.status == UserStatus::Deactivated {
        Err(Error::forbidden("account is deactivated"))
    } else {
        Ok(user)
    }
}

impl<U, O> SignInService<U, O>
where
    U: UserRepository,
    O: IdentityOracle,
{
    async fn verify(&self, credential: &BearerCredential) -> Result<VerifiedIdentity, Error> {
        self.oracle
            .verify(credential)
            .await
            .map_err(map_identity_error)
    }

    fn registration(&self, identity: VerifiedIdentity) -> NewUser {
        let status = if identity.email_verified {
            UserStatus::Active
        } else {
            UserStatus::Unverified
        };
        NewUser {
            id: UserId::random(),
            email: identity.email,
            given_name: identity.given_name.unwrap_or_default(),
            family_name: identity.family_name.unwrap_or_default(),
            picture_url: identity.picture_url,
            oauth: Some(OAuthLink {
                provider: identity.provider,
                subject_id: identity.subject_id,
            }),
            status,
            created_at: stored_now(&*self.clock),
        }
    }
}

#[async_trait]
impl<U, O> Authenticator for SignInService<U, O>
where
    U: UserRepository,
    O: IdentityOracle,
{
    async fn sign_in(&self, credential: &BearerCredential) -> Result<SignInOutcome, Error> {
        let identity = self.verify(credential).await?;
        if let Some(existing) = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_error)?
        {
            return Ok(SignInOutcome {
                user: ensure_usable(existing)?,
                created: false,
            });
        }

        let email = identity.email.clone();
        match self.users.insert(&self.registration(identity)).await {
            Ok(user) => {
                info!(user_id = %user.id, status = %user.status, "user provisioned");
                Ok(SignInOutcome {
                    user,
                    created: true,
                })
            }
            // A concurrent sign-in won the insert; use its row.
            Err(UserPersistenceError::DuplicateEmail { .. }) => {
                let user = self
                    .users
                    .find_by_email(&email)
                    .await
                    .map_err(map_user_error)?
                    .ok_or_else(|| Error::internal("user vanished after duplicate insert"))?;
                Ok(SignInOutcome {
                    user: ensure_usable(user)?,
                    created: false,
                })
            }
            Err(other) => Err(map_user_error(other)),
        }
    }

    async fn authenticate(&self, credential: &BearerCredential) -> Result<User, Error> {
        let identity = self.verify(credential).await?;
        let user = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("no account for this identity; sign in first"))?;
        ensure_usable(user)
    }
}

#[cfg(test)]
#[path = "sign_in_service_tests.rs"]
mod tests;
