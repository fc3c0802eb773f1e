//! DTOs for decoding token-info responses.
//!
//! Providers disagree on whether `email_verified` is a JSON boolean or the
//! string `"true"`; both are accepted.

use serde::Deserialize;

use crate::domain::{EmailAddress, VerifiedIdentity};

#[derive(Debug, Deserialize)]
pub(super) struct TokenInfoDto {
    pub(super) sub: Option<String>,
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) email_verified: Option<FlexibleBool>,
    pub(super) given_name: Option<String>,
    pub(super) family_name: Option<String>,
    pub(super) picture: Option<String>,
    pub(super) aud: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum FlexibleBool {
    Bool(bool),
    Text(String),
}

impl FlexibleBool {
    fn is_true(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

impl TokenInfoDto {
    /// Convert into a verified identity attributed to `provider`.
    pub(super) fn into_identity(self, provider: &str) -> Result<VerifiedIdentity, String> {
        let subject_id = self
            .sub
            .filter(|sub| !sub.trim().is_empty())
            .ok_or_else(|| "token info is missing a subject".to_owned())?;
        let raw_email = self
            .email
            .ok_or_else(|| "token info is missing an email".to_owned())?;
        let email = EmailAddress::new(&raw_email).map_err(|err| err.to_string())?;
        Ok(VerifiedIdentity {
            email,
            email_verified: self.email_verified.as_ref().is_some_and(FlexibleBool::is_true),
            given_name: non_blank(self.given_name),
            family_name: non_blank(self.family_name),
            picture_url: non_blank(self.picture),
            subject_id,
            provider: provider.to_owned(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
