//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, OAuthLink, User, UserId, UserStatus};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error_with, map_pool_error_with};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error_with(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error_with(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("invalid email in database: {err}")))?;
    let status: UserStatus = row
        .status
        .parse()
        .map_err(|err| {
            UserPersistenceError::query(format!("invalid user status in database: {err}"))
        })?;
    let oauth = match (row.oauth_provider, row.oauth_subject_id) {
        (Some(provider), Some(subject_id)) => Some(OAuthLink {
            provider,
            subject_id,
        }),
        _ => None,
    };
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        given_name: row.given_name,
        family_name: row.family_name,
        picture_url: row.picture_url,
        oauth,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_str(),
            given_name: &user.given_name,
            family_name: &user.family_name,
            picture_url: user.picture_url.as_deref(),
            oauth_provider: user.oauth.as_ref().map(|link| link.provider.as_str()),
            oauth_subject_id: user.oauth.as_ref().map(|link| link.subject_id.as_str()),
            status: user.status.as_str(),
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;
        row_to_user(row)
    }
}
