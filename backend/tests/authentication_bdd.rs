//! Behaviour tests for the authentication workflow.
//!
//! Scenarios drive `AuthService` end to end through the in-memory adapters,
//! seeded from a fixture file, with a controllable clock for expiry.

use std::sync::Arc;

use auth_backend::config::AuthSettings;
use auth_backend::domain::ports::UserStore;
use auth_backend::domain::{
    AuthService, Error, ErrorCode, LoginResult, PasswordResetResult, TokenValidationResult,
    UserId,
};
use auth_backend::outbound::{
    InMemoryUserStore, JwtTokenService, OutboundEmail, OutboxEmailService, load_user_fixtures,
    seed_users,
};
use auth_backend::test_support::clock::MutableClock;
use auth_backend::test_support::fixtures::UserFixtureFile;
use chrono::{TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;
use tokio::runtime::Runtime;

type Service = AuthService<InMemoryUserStore, JwtTokenService, OutboxEmailService>;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Clone)]
struct Harness {
    service: Arc<Service>,
    store: Arc<InMemoryUserStore>,
    outbox: Arc<OutboxEmailService>,
    clock: Arc<MutableClock>,
}

#[derive(Default, ScenarioState)]
struct AuthWorld {
    runtime: Slot<RuntimeHandle>,
    harness: Slot<Harness>,
    login: Slot<Result<LoginResult, Error>>,
    reset: Slot<Result<PasswordResetResult, Error>>,
    validation: Slot<Result<TokenValidationResult, Error>>,
    strength: Slot<Result<(), Error>>,
}

impl AuthWorld {
    fn setup(&self) {
        let runtime = Runtime::new().expect("create runtime");
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        let clock = Arc::new(MutableClock::new(start));
        let store = Arc::new(InMemoryUserStore::new(clock.clone()));
        let tokens = Arc::new(JwtTokenService::new(
            &AuthSettings::default(),
            clock.clone(),
        ));
        let outbox = Arc::new(OutboxEmailService::default());

        let file = UserFixtureFile::write(&json!([
            {
                "id": "user123",
                "email": "john.doe@example.com",
                "name": "John Doe",
                "password": "ValidPassword123!"
            },
            {
                "id": "user456",
                "email": "former@example.com",
                "name": "Former User",
                "password": "ValidPassword123!",
                "is_active": false
            }
        ]))
        .expect("fixture file written");
        let fixtures = load_user_fixtures(file.path()).expect("fixtures load");
        runtime
            .block_on(seed_users(&store, tokens.as_ref(), fixtures, clock.utc()))
            .expect("fixtures seed");

        let service = Arc::new(AuthService::new(
            store.clone(),
            tokens,
            outbox.clone(),
            clock.clone(),
        ));
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.harness.set(Harness {
            service,
            store,
            outbox,
            clock,
        });
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().expect("runtime");
        runtime.0.block_on(future)
    }

    fn harness(&self) -> Harness {
        self.harness.get().expect("service configured")
    }

    fn access_token(&self) -> String {
        let result = self.login.get().expect("login attempted");
        let login = result.expect("login succeeded");
        login.access_token().to_owned()
    }

    fn validate(&self, token: &str) {
        let harness = self.harness();
        let result = self.block_on(harness.service.validate_token(token));
        self.validation.set(result);
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[fixture]
fn world() -> AuthWorld {
    AuthWorld::default()
}

#[given("an authentication service seeded with fixture users")]
fn an_authentication_service_seeded_with_fixture_users(world: &AuthWorld) {
    world.setup();
}

#[when("a user logs in with email {email} and password {password}")]
fn a_user_logs_in(world: &AuthWorld, email: String, password: String) {
    let harness = world.harness();
    let result = world.block_on(
        harness
            .service
            .login(unquote(&email), unquote(&password)),
    );
    world.login.set(result);
}

#[when("a password reset is requested for {email}")]
fn a_password_reset_is_requested(world: &AuthWorld, email: String) {
    let harness = world.harness();
    let result = world.block_on(harness.service.request_password_reset(unquote(&email)));
    world.reset.set(result);
}

#[when("the issued access token is validated")]
fn the_issued_access_token_is_validated(world: &AuthWorld) {
    let token = world.access_token();
    world.validate(&token);
}

#[when("the issued access token is validated by a freshly started service")]
fn the_issued_access_token_is_validated_by_a_fresh_service(world: &AuthWorld) {
    let token = world.access_token();
    let harness = world.harness();
    let restarted: Service = AuthService::new(
        harness.store.clone(),
        Arc::new(JwtTokenService::new(
            &AuthSettings::default(),
            harness.clock.clone(),
        )),
        Arc::new(OutboxEmailService::default()),
        harness.clock.clone(),
    );
    let result = world.block_on(restarted.validate_token(&token));
    world.validation.set(result);
}

#[when("the token {token} is validated")]
fn the_token_is_validated(world: &AuthWorld, token: String) {
    world.validate(unquote(&token));
}

#[when("the clock advances by {seconds} seconds")]
fn the_clock_advances(world: &AuthWorld, seconds: i64) {
    world.harness().clock.advance_seconds(seconds);
}

#[when("the password {password} is checked for strength")]
fn the_password_is_checked(world: &AuthWorld, password: String) {
    let harness = world.harness();
    let result = harness
        .service
        .validate_password_strength(unquote(&password));
    world.strength.set(result);
}

#[then("login succeeds with an access and a refresh token")]
fn login_succeeds(world: &AuthWorld) {
    let result = world.login.get().expect("login attempted");
    let login = result.expect("login succeeded");
    assert!(login.success());
    assert!(!login.access_token().is_empty());
    assert!(!login.refresh_token().is_empty());
    assert_ne!(login.access_token(), login.refresh_token());
    assert_eq!(login.user().email(), "john.doe@example.com");
}

#[then("the user's last login is recorded")]
fn the_last_login_is_recorded(world: &AuthWorld) {
    let harness = world.harness();
    let id = UserId::new("user123").expect("valid id");
    let stored = world
        .block_on(harness.store.get_user_by_id(&id))
        .expect("lookup succeeds")
        .expect("user exists");
    assert_eq!(stored.last_login(), Some(harness.clock.utc()));
}

#[then("the validated token resolves to {email}")]
fn the_validated_token_resolves_to(world: &AuthWorld, email: String) {
    let result = world.validation.get().expect("validation attempted");
    let validation = result.expect("validation did not raise");
    assert!(validation.is_valid());
    assert_eq!(
        validation.user().map(|user| user.email().to_owned()),
        Some(unquote(&email).to_owned())
    );
}

#[then("login fails with invalid credentials and message {message}")]
fn login_fails_with_invalid_credentials(world: &AuthWorld, message: String) {
    let result = world.login.get().expect("login attempted");
    let err = result.expect_err("login should fail");
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert_eq!(err.message(), unquote(&message));
}

#[then("login fails with a validation error on {field} and message {message}")]
fn login_fails_with_a_validation_error(world: &AuthWorld, field: String, message: String) {
    let result = world.login.get().expect("login attempted");
    let err = result.expect_err("login should fail");
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.field(), Some(unquote(&field)));
    assert_eq!(err.message(), unquote(&message));
}

#[then("the reset response reports {message}")]
fn the_reset_response_reports(world: &AuthWorld, message: String) {
    let result = world.reset.get().expect("reset attempted");
    let reset = result.expect("reset succeeded");
    assert!(reset.success());
    assert_eq!(reset.message(), unquote(&message));
}

#[then("{count} reset emails are in the outbox")]
fn reset_emails_are_in_the_outbox(world: &AuthWorld, count: usize) {
    let harness = world.harness();
    let sent = world.block_on(harness.outbox.sent());
    let resets = sent
        .iter()
        .filter(|email| matches!(email, OutboundEmail::Reset { .. }))
        .count();
    assert_eq!(resets, count);
}

#[then("token validation fails with an expired token error")]
fn token_validation_fails_with_expiry(world: &AuthWorld) {
    let result = world.validation.get().expect("validation attempted");
    let err = result.expect_err("expiry should raise");
    assert_eq!(err.code(), ErrorCode::TokenExpired);
}

#[then("token validation reports invalid with error {message}")]
fn token_validation_reports_invalid(world: &AuthWorld, message: String) {
    let result = world.validation.get().expect("validation attempted");
    let validation = result.expect("validation did not raise");
    assert!(!validation.is_valid());
    assert_eq!(validation.error(), Some(unquote(&message)));
}

#[then("the password is rejected with message {message}")]
fn the_password_is_rejected(world: &AuthWorld, message: String) {
    let result = world.strength.get().expect("strength checked");
    let err = result.expect_err("password should be rejected");
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.message(), unquote(&message));
}

#[then("the password is accepted")]
fn the_password_is_accepted(world: &AuthWorld) {
    let result = world.strength.get().expect("strength checked");
    assert!(result.is_ok());
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "An active user logs in and the access token validates"
)]
fn an_active_user_logs_in(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "An unknown email is rejected with the generic message"
)]
fn an_unknown_email_is_rejected(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "A wrong password is rejected with the generic message"
)]
fn a_wrong_password_is_rejected(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "A deactivated account is rejected with its own message"
)]
fn a_deactivated_account_is_rejected(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "A malformed email is rejected before lookup"
)]
fn a_malformed_email_is_rejected(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "A password reset for a registered email sends one email"
)]
fn a_password_reset_for_a_registered_email(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "A password reset for an unknown email looks identical"
)]
fn a_password_reset_for_an_unknown_email(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "An expired access token raises an expiry error"
)]
fn an_expired_access_token(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "An access token stays valid after the service restarts"
)]
fn an_access_token_survives_a_restart(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "An unrecognised token is reported as invalid"
)]
fn an_unrecognised_token(world: AuthWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authentication.feature",
    name = "Weak passwords are rejected with the first failing rule"
)]
fn weak_passwords_are_rejected(world: AuthWorld) {
    drop(world);
}
