//! Endpoints for reading categories.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    Error,
    app_state::DatabaseState,
    category::{get_all_categories, get_category},
    db::lock_connection,
    response::ApiResponse,
    user::UserID,
};

/// A route handler that lists the user's categories, newest first.
pub async fn get_categories_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let categories = lock_connection(&state.db_connection)
        .and_then(|connection| get_all_categories(user_id, &connection));

    match categories {
        Ok(categories) => ApiResponse::success(categories).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for getting one of the user's categories.
pub async fn get_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
) -> Response {
    let Ok(category_id) = Uuid::parse_str(&category_id) else {
        return Error::CategoryNotFound.into_response();
    };

    let category = lock_connection(&state.db_connection)
        .and_then(|connection| get_category(category_id, user_id, &connection));

    match category {
        Ok(category) => ApiResponse::success(category).into_response(),
        Err(error) => error.into_response(),
    }
}
