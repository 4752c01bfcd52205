//! Expenses is a JSON API for tracking personal finances.
//!
//! Users register and log in, group their transactions into categories, and
//! record incomes, expenses, savings and installments in Uruguayan pesos,
//! US dollars or euros. Balance, month and savings summaries are computed
//! from the stored transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod calendar;
mod category;
mod config;
mod db;
mod endpoints;
mod field_issue;
mod flexible;
mod health;
mod logging;
mod money;
mod response;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SessionSettings};
pub use calendar::Month;
pub use category::{Category, CategoryId, CategoryName, NewCategory, create_category};
pub use config::Config;
pub use db::initialize as initialize_db;
pub use field_issue::FieldIssue;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::{Currency, TransactionType};
pub use routing::{build_cors_layer, build_router};
pub use transaction::{
    BalanceSummary, CreateTransactionRequest, Transaction, TransactionBalances,
    TransactionFilter, create_transactions, get_balances, get_months_by_year, get_total_savings,
    list_transactions,
};
pub use user::{
    NewUser, PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    update_password,
};

use crate::response::{ApiResponse, ErrorCode};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A string could not be parsed into one of the closed sets of values, e.g.
/// a currency or a month.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{value}\" is not a valid {kind}")]
pub struct UnknownVariant {
    /// What was being parsed, e.g. "currency".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The password does not match the user's password.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The request needs a valid session, but the session cookie is missing,
    /// invalid or expired.
    #[error("you need to be logged in")]
    NotLoggedIn,

    /// The request did not include a JSON body.
    #[error("too few parameters")]
    TooFewParams,

    /// One or more fields of the request body are invalid.
    ///
    /// Every issue found is included so that the client can fix all of them
    /// at once.
    #[error("{} request field(s) are invalid", .0.len())]
    ValidationFailed(Vec<FieldIssue>),

    /// The request body or query string could not be parsed or contained an
    /// invalid value.
    #[error("invalid request parameters: {0}")]
    InvalidParams(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error occurs when a query returns no rows. Feature
    /// code should narrow it down to a more specific variant, e.g.
    /// [Error::CategoryNotFound], before it reaches the client.
    #[error("the requested resource could not be found")]
    NotFound,

    /// There is no user with the given email or ID.
    #[error("the user does not exist")]
    UserNotFound,

    /// A user with the same email address already exists.
    #[error("the user already exists")]
    DuplicateUser,

    /// The transaction does not exist or belongs to another user.
    #[error("the transaction does not exist")]
    TransactionNotFound,

    /// The type of a transaction does not match the type of its category.
    #[error("the transaction and category are not of the same type")]
    TypeMismatch,

    /// The category does not exist or belongs to another user.
    #[error("the category does not exist")]
    CategoryNotFound,

    /// A category that still has transactions was deleted without asking
    /// for its transactions to be deleted as well.
    #[error("cannot delete a category with transactions")]
    CategoryHasTransactions,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The password is shorter than [user::MIN_PASSWORD_LENGTH] characters.
    #[error("password must be at least {} characters long", user::MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The session cookie's expiry could not be computed.
    #[error("could not compute the session expiry")]
    SessionExpiryError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateUser
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The client facing error code, or `None` for internal errors whose
    /// details must not be shown to the client.
    fn error_code(&self) -> Option<ErrorCode> {
        let code = match self {
            Error::InvalidCredentials => ErrorCode::AuthBadAuth,
            Error::NotLoggedIn => ErrorCode::AuthNeedLogin,
            Error::TooFewParams => ErrorCode::ServerTooFewParams,
            Error::ValidationFailed(_)
            | Error::InvalidParams(_)
            | Error::EmptyCategoryName
            | Error::PasswordTooShort => ErrorCode::ServerParamsMissing,
            Error::NotFound => ErrorCode::ServerNotFound,
            Error::UserNotFound => ErrorCode::UserNotFound,
            Error::DuplicateUser => ErrorCode::UserExists,
            Error::TransactionNotFound => ErrorCode::TransactionNotFound,
            Error::TypeMismatch => ErrorCode::TransactionCategoryTypeMismatch,
            Error::CategoryNotFound => ErrorCode::CategoryNotFound,
            Error::CategoryHasTransactions => ErrorCode::CategoryHasTransactions,
            Error::HashingError(_)
            | Error::SessionExpiryError
            | Error::SqlError(_)
            | Error::DatabaseLockError => return None,
        };

        Some(code)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let Some(code) = self.error_code() else {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            return ApiResponse::internal_server_error().into_response();
        };

        match self {
            Error::ValidationFailed(issues) => ApiResponse::failure(code, Some(issues)),
            Error::InvalidParams(message) => ApiResponse::failure(code, Some(message)),
            error @ (Error::EmptyCategoryName | Error::PasswordTooShort) => {
                ApiResponse::failure(code, Some(error.to_string()))
            }
            _ => ApiResponse::<()>::failure(code, None),
        }
    }
}
