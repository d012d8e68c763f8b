//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAuthProvider, MockUserRepository};
use crate::domain::test_fixtures::{caller, fixture_clock, fixture_timestamp};
use crate::domain::{ErrorCode, UserId, UserProfile, UserRole};

fn make_service(provider: MockAuthProvider, users: MockUserRepository) -> AuthService {
    AuthService::new(Arc::new(provider), Arc::new(users), fixture_clock())
}

fn account(id: UserId) -> AuthAccount {
    AuthAccount {
        id,
        email: "ada@example.com".to_owned(),
        name: None,
        role: UserRole::Traveler,
    }
}

fn registration() -> Registration {
    Registration::try_from_parts("ada@example.com", "secret1", "Ada").expect("valid registration")
}

#[tokio::test]
async fn register_inserts_profile_with_name_and_timestamp() {
    let id = UserId::random();
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_up()
        .times(1)
        .return_once(move |_| Ok(account(id)));
    let mut users = MockUserRepository::new();
    users
        .expect_insert_profile()
        .withf(move |scope, profile| {
            *scope == AccessScope::Anonymous
                && profile.id == id
                && profile.name == "Ada"
                && profile.created_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_, profile| {
            Ok(UserProfile {
                id: profile.id,
                email: profile.email.clone(),
                name: profile.name.clone(),
                bio: None,
                profile_picture: None,
                preferences: None,
                created_at: profile.created_at,
                updated_at: None,
            })
        });

    let registered = make_service(provider, users)
        .register(&registration())
        .await
        .expect("registration succeeds");

    assert_eq!(registered.id, id);
    assert_eq!(registered.name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn register_relays_provider_rejection_as_bad_request() {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_up()
        .return_once(|_| Err(BackendError::rejected("User already registered")));
    let mut users = MockUserRepository::new();
    users.expect_insert_profile().never();

    let err = make_service(provider, users)
        .register(&registration())
        .await
        .expect_err("duplicate email fails");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "User already registered");
}

#[tokio::test]
async fn register_hides_profile_insert_failures() {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_up()
        .return_once(|_| Ok(account(UserId::random())));
    let mut users = MockUserRepository::new();
    users
        .expect_insert_profile()
        .return_once(|_, _| Err(BackendError::transport("socket closed")));

    let err = make_service(provider, users)
        .register(&registration())
        .await
        .expect_err("insert failure surfaces");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Failed to register user");
}

#[rstest]
#[case(BackendError::unauthorized("Invalid login credentials"), ErrorCode::Unauthorized, "Invalid credentials")]
#[case(BackendError::rejected("Email not confirmed"), ErrorCode::Unauthorized, "Invalid credentials")]
#[case(BackendError::timeout("elapsed"), ErrorCode::InternalError, "Failed to login")]
#[tokio::test]
async fn login_maps_provider_failures(
    #[case] failure: BackendError,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in()
        .return_once(move |_| Err(failure));
    let credentials = Credentials::try_from_parts("ada@example.com", "wrong").expect("valid");

    let err = make_service(provider, MockUserRepository::new())
        .login(&credentials)
        .await
        .expect_err("login fails");

    assert_eq!(err.code(), code);
    assert_eq!(err.message(), message);
}

#[tokio::test]
async fn logout_without_token_skips_the_provider() {
    let mut provider = MockAuthProvider::new();
    provider.expect_sign_out().never();

    make_service(provider, MockUserRepository::new())
        .logout(None)
        .await
        .expect("anonymous logout succeeds");
}

#[rstest]
#[case(BackendError::unauthorized("jwt expired"), ErrorCode::Unauthorized, NOT_AUTHENTICATED)]
#[case(BackendError::transport("dns failure"), ErrorCode::InternalError, "Authentication failed")]
#[tokio::test]
async fn authenticate_distinguishes_bad_tokens_from_outages(
    #[case] failure: BackendError,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_current_user()
        .return_once(move |_| Err(failure));
    let token = AccessToken::new("stale").expect("non-empty");

    let err = make_service(provider, MockUserRepository::new())
        .authenticate(token)
        .await
        .expect_err("verification fails");

    assert_eq!(err.code(), code);
    assert_eq!(err.message(), message);
}

#[tokio::test]
async fn me_reports_missing_profile() {
    let mut users = MockUserRepository::new();
    users.expect_find_profile().return_once(|_, _| Ok(None));

    let err = make_service(MockAuthProvider::new(), users)
        .me(&caller())
        .await
        .expect_err("profile missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}
