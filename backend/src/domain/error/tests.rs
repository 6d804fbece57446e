//! Tests for error construction and the serialised payload shape.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn validation_constructor_sets_code_and_field() {
    let err = Error::validation("password", "Password is required");
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.field(), Some("password"));
    assert_eq!(err.message(), "Password is required");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InternalError, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn unknown_email_and_wrong_password_share_one_message() {
    let generic = Error::invalid_credentials();
    assert_eq!(generic.code(), ErrorCode::InvalidCredentials);
    assert_eq!(generic.message(), "Invalid email or password");
    assert!(!generic.message().to_lowercase().contains("not found"));
}

#[rstest]
fn deactivated_account_is_distinguishable_from_generic_rejection() {
    let deactivated = Error::deactivated_account();
    assert_eq!(deactivated.code(), ErrorCode::InvalidCredentials);
    assert_ne!(deactivated.message(), Error::invalid_credentials().message());
    assert!(deactivated.message().contains("deactivated"));
}

#[rstest]
#[case("", TOKEN_EXPIRED_MESSAGE)]
#[case("  ", TOKEN_EXPIRED_MESSAGE)]
#[case("signature expired at 12:00", "signature expired at 12:00")]
fn token_expired_keeps_decoder_message(#[case] input: &str, #[case] expected: &str) {
    let err = Error::token_expired(input);
    assert_eq!(err.code(), ErrorCode::TokenExpired);
    assert_eq!(err.message(), expected);
}

#[rstest]
fn serialises_with_screaming_snake_codes() {
    let value = serde_json::to_value(Error::validation("email", "Invalid email format"))
        .expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "VALIDATION_ERROR",
            "message": "Invalid email format",
            "field": "email",
        })
    );

    let value = serde_json::to_value(Error::user_not_found()).expect("error serialises");
    assert_eq!(
        value,
        json!({ "code": "USER_NOT_FOUND", "message": "User not found" })
    );
}

#[rstest]
fn deserialising_blank_message_fails() {
    let payload = json!({ "code": "INTERNAL_ERROR", "message": "" });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn deserialising_round_trips_field() {
    let payload = json!({
        "code": "VALIDATION_ERROR",
        "message": "Email is required",
        "field": "email",
    });
    let err: Error = serde_json::from_value(payload).expect("valid payload");
    assert_eq!(err, Error::validation("email", "Email is required"));
}
