use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::DatabaseState,
    db::lock_connection,
    response::ApiResponse,
    user::{UserID, get_user_by_id},
};

/// A route handler that returns the logged in user.
pub async fn get_current_user(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let user = lock_connection(&state.db_connection)
        .and_then(|connection| get_user_by_id(user_id, &connection));

    match user {
        Ok(user) => ApiResponse::success(user).into_response(),
        Err(error) => error.into_response(),
    }
}
