//! Integration tests for the validation module
//!
//! Exercises the validator the way form handlers use it: several fields,
//! mixed validators, one aggregated error.

use agencydesk_common::validation::{
    EmailValidator, FieldValidator, StringValidator, ValidationError, Validator,
};

/// Test basic field validation
#[test]
fn test_basic_field_validation() {
    let mut validator = Validator::new();

    let email = "test@example.com";
    validator.validate_field("email", &email, &EmailValidator::new());

    assert!(!validator.has_errors());
    assert!(validator.finalize().is_ok());
}

/// Test invalid email validation
#[test]
fn test_invalid_email_validation() {
    let mut validator = Validator::new();

    let invalid_email = "not-an-email";
    validator.validate_field("email", &invalid_email, &EmailValidator::new());

    assert!(validator.has_errors());
    assert_eq!(validator.error_count(), 1);
    assert_eq!(validator.errors().errors[0].field, "email");
}

/// A registration form with several problems reports all of them
#[test]
fn test_form_collects_every_failure() {
    let name = String::from("   ");
    let email = String::from("ana@");
    let password = String::from("abc");

    let mut validator = Validator::new();
    validator.validate_field("name", &name, &StringValidator::new().not_empty());
    validator.validate_field("email", &email, &EmailValidator::new());
    validator.validate_field("password", &password, &StringValidator::new().min_length(6));
    validator.ensure(password == "abcd", "confirm_password", "Passwords do not match");

    let err: ValidationError = validator.finalize().unwrap_err();
    let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email", "password", "confirm_password"]);
}

#[test]
fn test_pattern_validator() {
    let phone = StringValidator::new().pattern(r"^\+?[0-9 ]{7,15}$").unwrap();
    assert!(phone.validate("+34 600 123 456").is_ok());
    assert!(phone.validate("call me").is_err());
}

#[test]
fn test_max_length() {
    let validator = StringValidator::new().max_length(5);
    let err = validator.validate("Acme Corporation").unwrap_err();
    assert_eq!(err, "Length must not exceed 5 characters");
}
