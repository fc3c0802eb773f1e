//! Credentials presented by callers and the identities an oracle vouches for.

use std::fmt;

use super::user::EmailAddress;

/// Opaque bearer token taken from the `Authorization` header.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(String);

impl BearerCredential {
    /// Wrap a raw token; returns `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_owned()))
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// # Examples
    /// ```
    /// use tripshare::domain::BearerCredential;
    ///
    /// let credential = BearerCredential::from_authorization_header("Bearer abc").expect("token");
    /// assert_eq!(credential.expose(), "abc");
    /// assert!(BearerCredential::from_authorization_header("Basic abc").is_none());
    /// ```
    #[must_use]
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") {
            Self::new(token)
        } else {
            None
        }
    }

    /// Raw token for handing to the identity oracle.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerCredential(<redacted>)")
    }
}

/// Identity asserted by the identity oracle for a valid credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: EmailAddress,
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture_url: Option<String>,
    /// Provider-scoped subject identifier.
    pub subject_id: String,
    /// Name of the provider that issued the credential, e.g. `google`.
    pub provider: String,
}
