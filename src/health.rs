//! A route for checking that the server is up.

use axum::response::{IntoResponse, Response};

use crate::response::ApiResponse;

/// Respond with a short message while the server is running.
pub async fn get_health() -> Response {
    ApiResponse::success("Up & running ;)!").into_response()
}
