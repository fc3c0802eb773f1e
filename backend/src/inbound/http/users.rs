//! Sign-in HTTP handler.
//!
//! ```text
//! POST /api/v1/signin
//! ```

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SignInOutcome;
use crate::domain::{Error, User, UserStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::bearer_credential;
use crate::inbound::http::state::HttpState;

/// Public view of a user account.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "email")]
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub picture_url: Option<String>,
    pub status: UserStatus,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.into(),
            given_name: user.given_name,
            family_name: user.family_name,
            picture_url: user.picture_url,
            status: user.status,
        }
    }
}

/// Sign-in result.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: UserResponse,
    /// Whether this call provisioned the account.
    pub created: bool,
}

impl From<SignInOutcome> for SignInResponse {
    fn from(outcome: SignInOutcome) -> Self {
        Self {
            user: UserResponse::from(outcome.user),
            created: outcome.created,
        }
    }
}

/// Verify the bearer credential and provision the account on first contact.
#[utoipa::path(
    post,
    path = "/api/v1/signin",
    responses(
        (status = 200, description = "Signed in to an existing account", body = SignInResponse),
        (status = 201, description = "Account provisioned", body = SignInResponse),
        (status = 401, description = "Credential missing or rejected", body = Error),
        (status = 403, description = "Account deactivated", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "signIn",
    security(("BearerAuth" = []))
)]
#[post("/signin")]
pub async fn sign_in(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let credential = bearer_credential(&req)?;
    let outcome = state.authenticator.sign_in(&credential).await?;
    let mut response = if outcome.created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(response.json(SignInResponse::from(outcome)))
}
