//! The JSON envelope shared by every API response.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// The body of every response sent by the API.
///
/// Successful responses only carry `result` and `data`. Failed responses
/// also carry the error code with a message that can be shown to the user
/// in English or Spanish.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_message: Option<ShowMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

/// A translated message for display in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShowMessage {
    #[serde(rename = "EN")]
    pub en: &'static str,
    #[serde(rename = "ES")]
    pub es: &'static str,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            result: true,
            data: Some(data),
            message: None,
            show_message: None,
            error_code: None,
        }
    }

    /// A failed response for `code`, with an optional payload describing the
    /// failure, e.g. the list of invalid fields.
    pub fn failure(code: ErrorCode, data: Option<T>) -> Response {
        let definition = code.definition();

        let body = Self {
            result: false,
            data,
            message: Some(definition.message),
            show_message: Some(definition.show_message),
            error_code: Some(code as u16),
        };

        (definition.status, Json(body)).into_response()
    }
}

impl ApiResponse<()> {
    /// A successful response without any data.
    pub fn empty() -> Self {
        Self {
            result: true,
            data: None,
            message: None,
            show_message: None,
            error_code: None,
        }
    }

    /// The opaque response for errors whose details stay on the server.
    pub fn internal_server_error() -> Response {
        let body = Self {
            result: false,
            data: None,
            message: Some("Internal server error"),
            show_message: None,
            error_code: None,
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// The error codes that are exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    AuthBadAuth = 1002,
    AuthNeedLogin = 1005,
    ServerTooFewParams = 2001,
    ServerParamsMissing = 2002,
    ServerNotFound = 2003,
    UserNotFound = 3001,
    UserExists = 3004,
    TransactionNotFound = 4001,
    TransactionCategoryTypeMismatch = 4002,
    CategoryNotFound = 5001,
    CategoryHasTransactions = 5002,
}

/// The messages and HTTP status attached to an [ErrorCode].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDefinition {
    pub message: &'static str,
    pub show_message: ShowMessage,
    pub status: StatusCode,
}

impl ErrorCode {
    pub fn definition(self) -> ErrorDefinition {
        let (message, es, status) = match self {
            ErrorCode::AuthBadAuth => (
                "Bad auth",
                "Email o contraseña incorrectos",
                StatusCode::BAD_REQUEST,
            ),
            ErrorCode::AuthNeedLogin => (
                "You need to be logged in",
                "Debe estar conectado",
                StatusCode::UNAUTHORIZED,
            ),
            ErrorCode::ServerTooFewParams => (
                "Too few parameters",
                "Faltan parametros",
                StatusCode::BAD_REQUEST,
            ),
            ErrorCode::ServerParamsMissing => (
                "Some body parameters are missing or are incorrect",
                "Faltan o son incorrectos algunos parametros de la solicitud",
                StatusCode::BAD_REQUEST,
            ),
            ErrorCode::ServerNotFound => {
                ("Not found", "Recurso no encontrado", StatusCode::NOT_FOUND)
            }
            ErrorCode::UserNotFound => (
                "User does not exist",
                "El usuario no existe",
                StatusCode::NOT_FOUND,
            ),
            ErrorCode::UserExists => (
                "User already exists",
                "El usuario ya existe",
                StatusCode::CONFLICT,
            ),
            ErrorCode::TransactionNotFound => (
                "Transaction not exist",
                "La transacción no existe",
                StatusCode::NOT_FOUND,
            ),
            ErrorCode::TransactionCategoryTypeMismatch => (
                "Transaction and category are not of the same type.",
                "La transacción y la categoría no son del mismo tipo.",
                StatusCode::CONFLICT,
            ),
            ErrorCode::CategoryNotFound => (
                "Category not exist",
                "La categoria no existe",
                StatusCode::NOT_FOUND,
            ),
            ErrorCode::CategoryHasTransactions => (
                "Cannot delete a category with transactions",
                "No se puede eliminar una categoría con transacciones, pruebe con la query \
                 ?deleteTransactions=true para eliminar todas las transacciones",
                StatusCode::CONFLICT,
            ),
        };

        let en = match self {
            ErrorCode::AuthBadAuth => "Incorrect email/password",
            ErrorCode::CategoryHasTransactions => {
                "Cannot delete a category with transactions, try with the query \
                 ?deleteTransactions=true to delete all transactions."
            }
            _ => message,
        };

        ErrorDefinition {
            message,
            show_message: ShowMessage { en, es },
            status,
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into the API's error
/// envelope instead of a plain text response.
pub fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(Error::TooFewParams),
        Err(rejection) => {
            tracing::debug!("Rejected JSON body: {}", rejection.body_text());
            Err(Error::InvalidParams(rejection.body_text()))
        }
    }
}
