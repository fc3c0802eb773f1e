//! Bearer authentication for HTTP handlers.
//!
//! Every `/api/v1` route except sign-in takes an [`AuthenticatedUser`], so an
//! unauthenticated request is rejected before any port is called.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{BearerCredential, Error, User, UserId};

use super::state::HttpState;

/// Extract the bearer credential from the `Authorization` header.
pub(crate) fn bearer_credential(req: &HttpRequest) -> Result<BearerCredential, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    BearerCredential::from_authorization_header(value)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

/// The caller, resolved from a verified bearer credential.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credential = bearer_credential(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let credential = credential?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state.authenticator.authenticate(&credential).await.map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(None)]
    #[case(Some("Basic YWRhOnNlY3JldA=="))]
    #[case(Some("Bearer "))]
    #[case(Some("token-without-scheme"))]
    fn rejects_missing_or_foreign_credentials(#[case] header: Option<&str>) {
        let mut request = TestRequest::default();
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let error = bearer_credential(&request.to_http_request()).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn accepts_case_insensitive_bearer_scheme() {
        let request = TestRequest::default()
            .insert_header((AUTHORIZATION, "bearer ada-token"))
            .to_http_request();
        let credential = bearer_credential(&request).expect("credential");
        assert_eq!(credential.expose(), "ada-token");
    }
}
