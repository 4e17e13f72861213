//! Form validation run before any remote call
//!
//! Each check collects every failing field so the UI can highlight them all
//! at once; the result is folded into a single
//! [`AgencyError::Validation`](agencydesk_domain::AgencyError::Validation).

use agencydesk_common::validation::{EmailValidator, StringValidator, Validator};
use agencydesk_domain::constants::MIN_PASSWORD_LENGTH;
use agencydesk_domain::{
    Client, NewClient, NewTask, NewUser, Password, PasswordChange, Result, SignUpRequest, Task,
    User,
};

use crate::errors::from_validation;

fn required() -> StringValidator {
    StringValidator::new().not_empty()
}

fn check_passwords(validator: &mut Validator, password: &Password, confirmation: &Password) {
    validator.ensure(!password.is_empty(), "password", "Password is required");
    validator.ensure(
        password.is_empty() || password.char_len() >= MIN_PASSWORD_LENGTH,
        "password",
        format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
    );
    validator.ensure(
        password.expose() == confirmation.expose(),
        "confirm_password",
        "Passwords do not match",
    );
}

fn check_person(validator: &mut Validator, name: &str, email: &str) {
    validator.validate_field("name", name, &required());
    validator.validate_field("email", email, &EmailValidator::new());
}

fn check_client(validator: &mut Validator, name: &str, contact: &str, email: &str) {
    validator.validate_field("name", name, &required());
    validator.validate_field("contact", contact, &required());
    validator.validate_field("email", email, &EmailValidator::new());
}

fn check_task(validator: &mut Validator, title: &str, client_id: &str) {
    validator.validate_field("title", title, &required());
    validator.validate_field("client_id", client_id, &required());
}

pub fn new_user(draft: &NewUser) -> Result<()> {
    let mut validator = Validator::new();
    check_person(&mut validator, &draft.name, &draft.email);
    check_passwords(&mut validator, &draft.password, &draft.confirm_password);
    validator.finalize().map_err(from_validation)
}

/// Validate an edited profile and, when present, the new password.
pub fn user_update(user: &User, password: Option<&PasswordChange>) -> Result<()> {
    let mut validator = Validator::new();
    check_person(&mut validator, &user.name, &user.email);
    if let Some(change) = password {
        check_passwords(&mut validator, &change.password, &change.confirm_password);
    }
    validator.finalize().map_err(from_validation)
}

pub fn sign_up(request: &SignUpRequest) -> Result<()> {
    let mut validator = Validator::new();
    check_person(&mut validator, &request.name, &request.email);
    check_passwords(&mut validator, &request.password, &request.confirm_password);
    validator.finalize().map_err(from_validation)
}

pub fn login(email: &str, password: &Password) -> Result<()> {
    let mut validator = Validator::new();
    validator.validate_field("email", email, &required());
    validator.ensure(!password.is_empty(), "password", "Password is required");
    validator.finalize().map_err(from_validation)
}

pub fn recovery_email(email: &str) -> Result<()> {
    let mut validator = Validator::new();
    validator.validate_field("email", email, &EmailValidator::new());
    validator.finalize().map_err(from_validation)
}

pub fn new_client(draft: &NewClient) -> Result<()> {
    let mut validator = Validator::new();
    check_client(&mut validator, &draft.name, &draft.contact, &draft.email);
    validator.finalize().map_err(from_validation)
}

pub fn client(client: &Client) -> Result<()> {
    let mut validator = Validator::new();
    check_client(&mut validator, &client.name, &client.contact, &client.email);
    validator.finalize().map_err(from_validation)
}

pub fn new_task(draft: &NewTask) -> Result<()> {
    let mut validator = Validator::new();
    check_task(&mut validator, &draft.title, &draft.client_id);
    validator.finalize().map_err(from_validation)
}

pub fn task(task: &Task) -> Result<()> {
    let mut validator = Validator::new();
    check_task(&mut validator, &task.title, &task.client_id);
    validator.finalize().map_err(from_validation)
}
