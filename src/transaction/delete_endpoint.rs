//! Transaction deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    Error, app_state::DatabaseState, db::lock_connection, response::ApiResponse,
    transaction::delete_transaction, user::UserID,
};

/// A route handler for deleting one of the user's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Ok(transaction_id) = Uuid::parse_str(&transaction_id) else {
        return Error::TransactionNotFound.into_response();
    };

    let result = lock_connection(&state.db_connection)
        .and_then(|connection| delete_transaction(transaction_id, user_id, &connection));

    match result {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            ApiResponse::empty().into_response()
        }
        Err(error) => error.into_response(),
    }
}
