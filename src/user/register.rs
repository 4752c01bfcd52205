//! The endpoint for signing up new users.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error, FieldIssue,
    app_state::DatabaseState,
    db::lock_connection,
    response::{ApiResponse, parse_json},
    user::{NewUser, PasswordHash, ValidatedPassword, create_user, get_user_by_email},
};

/// The request body for registering a user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A registration request whose fields have all been checked.
struct ValidatedRegistration {
    email: String,
    first_name: String,
    last_name: String,
    password: ValidatedPassword,
}

fn required<'a>(
    value: &'a Option<String>,
    field: &str,
    message: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            issues.push(FieldIssue::new(field, message));
            None
        }
    }
}

fn validate(request: &RegisterUserRequest) -> Result<ValidatedRegistration, Error> {
    let mut issues = Vec::new();

    let email = required(&request.email, "email", "Email is required", &mut issues);
    let email = email.filter(|email| {
        let is_valid = EmailAddress::is_valid(email);

        if !is_valid {
            issues.push(FieldIssue::new("email", "Email is invalid"));
        }

        is_valid
    });

    let first_name = required(
        &request.first_name,
        "firstName",
        "First name is required",
        &mut issues,
    );
    let last_name = required(
        &request.last_name,
        "lastName",
        "Last name is required",
        &mut issues,
    );

    let password = match request.password.as_deref() {
        None | Some("") => {
            issues.push(FieldIssue::new("password", "Password is required"));
            None
        }
        Some(password) => match ValidatedPassword::new(password) {
            Ok(password) => Some(password),
            Err(error) => {
                issues.push(FieldIssue::new("password", capitalize(&error.to_string())));
                None
            }
        },
    };

    match (email, first_name, last_name, password) {
        (Some(email), Some(first_name), Some(last_name), Some(password)) if issues.is_empty() => {
            Ok(ValidatedRegistration {
                email: email.to_owned(),
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                password,
            })
        }
        _ => Err(Error::ValidationFailed(issues)),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A route handler for creating a new user.
///
/// Responds with 201 and the new user, without their password.
pub async fn register_user(
    State(state): State<DatabaseState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Response {
    let request = match parse_json(payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    let registration = match validate(&request) {
        Ok(registration) => registration,
        Err(error) => return error.into_response(),
    };

    // Checked before hashing since hashing is slow.
    match lock_connection(&state.db_connection)
        .and_then(|connection| get_user_by_email(&registration.email, &connection))
    {
        Ok(_) => return Error::DuplicateUser.into_response(),
        Err(Error::UserNotFound) => {}
        Err(error) => return error.into_response(),
    }

    let password_hash = match PasswordHash::new(registration.password, PasswordHash::DEFAULT_COST)
    {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_response();
        }
    };

    let new_user = NewUser {
        email: registration.email,
        first_name: registration.first_name,
        last_name: registration.last_name,
        password_hash,
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_user(new_user, &connection) {
        Ok(user) => {
            tracing::info!("Registered user {}", user.id);
            (StatusCode::CREATED, ApiResponse::success(user)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
