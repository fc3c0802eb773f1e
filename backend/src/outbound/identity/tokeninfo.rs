//! Reqwest-backed token-info identity oracle.
//!
//! The adapter owns transport details only: building the lookup request,
//! timeout and status mapping, and decoding the provider payload. Rejected
//! tokens and provider outages are kept apart so callers can answer 401 and
//! 503 respectively.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::TokenInfoDto;
use crate::domain::ports::{IdentityError, IdentityOracle};
use crate::domain::{BearerCredential, VerifiedIdentity};

/// Google's public token-info endpoint.
pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const DEFAULT_PROVIDER: &str = "google";
const USER_AGENT: &str = concat!("tripshare/", env!("CARGO_PKG_VERSION"));

/// Identity oracle that validates ID tokens against a token-info endpoint.
pub struct TokenInfoOracle {
    client: Client,
    endpoint: Url,
    provider: String,
    audience: Option<String>,
}

impl TokenInfoOracle {
    /// Build an oracle with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            provider: DEFAULT_PROVIDER.to_owned(),
            audience: None,
        })
    }

    /// Only accept tokens issued for `audience` (the OAuth client id).
    #[must_use]
    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience.filter(|value| !value.trim().is_empty());
        self
    }

    /// Attribute verified identities to `provider` instead of `google`.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }
}

#[async_trait]
impl IdentityOracle for TokenInfoOracle {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("id_token", credential.expose())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_identity(body.as_ref(), &self.provider, self.audience.as_deref())
    }
}

fn parse_identity(
    body: &[u8],
    provider: &str,
    audience: Option<&str>,
) -> Result<VerifiedIdentity, IdentityError> {
    let decoded: TokenInfoDto = serde_json::from_slice(body).map_err(|error| {
        IdentityError::provider_unavailable(format!("invalid token info payload: {error}"))
    })?;
    if let Some(expected) = audience {
        if decoded.aud.as_deref() != Some(expected) {
            return Err(IdentityError::invalid_credential(
                "token was issued for another audience",
            ));
        }
    }
    decoded
        .into_identity(provider)
        .map_err(IdentityError::invalid_credential)
}

fn map_transport_error(error: reqwest::Error) -> IdentityError {
    debug!(timeout = error.is_timeout(), "token info request failed");
    IdentityError::provider_unavailable(error.to_string())
}

/// Token-info answers 400 for unknown or expired tokens; anything else that
/// is not a success means the provider itself is struggling.
fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityError::invalid_credential(message)
        }
        _ => IdentityError::provider_unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network token-info helpers.

    use rstest::rstest;

    use super::*;

    const VERIFIED: &str = r#"{
        "aud": "client-1",
        "sub": "1234567890",
        "email": "Ada@Example.com",
        "email_verified": "true",
        "given_name": "Ada",
        "family_name": "Lovelace",
        "picture": "https://example.com/ada.png"
    }"#;

    #[test]
    fn decodes_a_verified_identity() {
        let identity = parse_identity(VERIFIED.as_bytes(), "google", None).expect("decodes");
        assert_eq!(identity.email.as_str(), "ada@example.com");
        assert!(identity.email_verified);
        assert_eq!(identity.subject_id, "1234567890");
        assert_eq!(identity.provider, "google");
        assert_eq!(identity.given_name.as_deref(), Some("Ada"));
    }

    #[rstest]
    #[case(r#"{"sub": "1", "email": "a@b.c", "email_verified": true}"#, true)]
    #[case(r#"{"sub": "1", "email": "a@b.c", "email_verified": "false"}"#, false)]
    #[case(r#"{"sub": "1", "email": "a@b.c"}"#, false)]
    fn accepts_both_verified_flag_encodings(#[case] body: &str, #[case] expected: bool) {
        let identity = parse_identity(body.as_bytes(), "google", None).expect("decodes");
        assert_eq!(identity.email_verified, expected);
    }

    #[rstest]
    #[case(Some("client-1"), true)]
    #[case(Some("client-2"), false)]
    #[case(None, true)]
    fn enforces_the_configured_audience(#[case] audience: Option<&str>, #[case] accepted: bool) {
        let result = parse_identity(VERIFIED.as_bytes(), "google", audience);
        assert_eq!(result.is_ok(), accepted);
    }

    #[rstest]
    #[case(r#"{"email": "a@b.c"}"#)]
    #[case(r#"{"sub": "1"}"#)]
    #[case(r#"{"sub": "1", "email": "not-an-email"}"#)]
    fn incomplete_payloads_reject_the_credential(#[case] body: &str) {
        let error = parse_identity(body.as_bytes(), "google", None).expect_err("incomplete");
        assert!(matches!(error, IdentityError::InvalidCredential { .. }));
    }

    #[test]
    fn garbage_payloads_mean_the_provider_is_unwell() {
        let error = parse_identity(b"<html>oops</html>", "google", None).expect_err("garbage");
        assert!(matches!(error, IdentityError::ProviderUnavailable { .. }));
    }

    #[rstest]
    #[case::invalid_token(StatusCode::BAD_REQUEST, true)]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, true)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, false)]
    fn maps_statuses(#[case] status: StatusCode, #[case] rejects_credential: bool) {
        let error = map_status_error(status, br#"{"error_description": "Invalid Value"}"#);
        assert_eq!(
            matches!(error, IdentityError::InvalidCredential { .. }),
            rejects_credential
        );
        assert!(error.to_string().contains(&status.as_u16().to_string()));
    }
}
