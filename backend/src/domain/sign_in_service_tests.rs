//! Tests for sign-in and authentication.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockIdentityOracle, MockUserRepository};
use crate::test_support::clock::fixture_clock;
use crate::test_support::fixtures::{at, user, verified_identity};

fn credential() -> BearerCredential {
    BearerCredential::new("token").expect("token")
}

fn oracle_returning(identity: VerifiedIdentity) -> MockIdentityOracle {
    let mut oracle = MockIdentityOracle::new();
    oracle
        .expect_verify()
        .times(1)
        .return_once(move |_| Ok(identity));
    oracle
}

fn make_service(
    users: MockUserRepository,
    oracle: MockIdentityOracle,
) -> SignInService<MockUserRepository, MockIdentityOracle> {
    SignInService::new(Arc::new(users), Arc::new(oracle), fixture_clock(at(1, 12)))
}

#[rstest]
#[case(true, UserStatus::Active)]
#[case(false, UserStatus::Unverified)]
#[tokio::test]
async fn first_sign_in_provisions_an_account(
    #[case] email_verified: bool,
    #[case] expected: UserStatus,
) {
    let mut identity = verified_identity("ada@example.com");
    identity.email_verified = email_verified;

    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|new_user| {
            new_user.oauth.as_ref().is_some_and(|link| link.subject_id == "sub-ada")
        })
        .times(1)
        .returning(|new_user| {
            Ok(User {
                id: new_user.id,
                email: new_user.email.clone(),
                given_name: new_user.given_name.clone(),
                family_name: new_user.family_name.clone(),
                picture_url: new_user.picture_url.clone(),
                oauth: new_user.oauth.clone(),
                status: new_user.status,
                created_at: new_user.created_at,
                updated_at: new_user.created_at,
            })
        });

    let service = make_service(users, oracle_returning(identity));
    let outcome = service.sign_in(&credential()).await.expect("sign in");
    assert!(outcome.created);
    assert_eq!(outcome.user.status, expected);
    assert_eq!(outcome.user.created_at, at(1, 12));
}

#[tokio::test]
async fn returning_users_are_not_provisioned_again() {
    let existing = user("ada@example.com");
    let id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    users.expect_insert().never();

    let service = make_service(users, oracle_returning(verified_identity("ada@example.com")));
    let outcome = service.sign_in(&credential()).await.expect("sign in");
    assert!(!outcome.created);
    assert_eq!(outcome.user.id, id);
}

#[tokio::test]
async fn losing_the_provisioning_race_reuses_the_winner() {
    let winner = user("ada@example.com");
    let winner_id = winner.id;
    let mut users = MockUserRepository::new();
    let mut lookups = 0;
    users.expect_find_by_email().times(2).returning(move |_| {
        lookups += 1;
        Ok((lookups > 1).then(|| winner.clone()))
    });
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_email("ada@example.com")));

    let service = make_service(users, oracle_returning(verified_identity("ada@example.com")));
    let outcome = service.sign_in(&credential()).await.expect("sign in");
    assert_eq!(outcome.user.id, winner_id);
    assert!(!outcome.created);
}

#[rstest]
#[case(IdentityError::invalid_credential("expired"), ErrorCode::Unauthorized)]
#[case(IdentityError::provider_unavailable("timeout"), ErrorCode::ServiceUnavailable)]
#[tokio::test]
async fn oracle_failures_are_mapped(#[case] failure: IdentityError, #[case] expected: ErrorCode) {
    let mut oracle = MockIdentityOracle::new();
    oracle
        .expect_verify()
        .times(1)
        .return_once(move |_| Err(failure));
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().never();

    let service = make_service(users, oracle);
    let error = service
        .authenticate(&credential())
        .await
        .expect_err("oracle failure");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn authentication_requires_an_existing_account() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));

    let service = make_service(users, oracle_returning(verified_identity("ada@example.com")));
    let error = service
        .authenticate(&credential())
        .await
        .expect_err("unknown user");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn deactivated_accounts_are_forbidden() {
    let mut existing = user("ada@example.com");
    existing.status = UserStatus::Deactivated;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));

    let service = make_service(users, oracle_returning(verified_identity("ada@example.com")));
    let error = service
        .authenticate(&credential())
        .await
        .expect_err("deactivated");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}
