//! Endpoints for reading transactions.

use axum::{
    Extension,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    Error,
    app_state::DatabaseState,
    db::lock_connection,
    response::ApiResponse,
    transaction::{
        TransactionFilter, filter::TransactionFilterQuery, get_transaction, list_transactions,
    },
    user::UserID,
};

/// A route handler that lists the user's transactions matching the query
/// string, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<TransactionFilterQuery>, QueryRejection>,
) -> Response {
    let filter = match query
        .map_err(|rejection| Error::InvalidParams(rejection.body_text()))
        .and_then(|Query(query)| TransactionFilter::try_from(query))
    {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let transactions = lock_connection(&state.db_connection)
        .and_then(|connection| list_transactions(user_id, &filter, &connection));

    match transactions {
        Ok(transactions) => ApiResponse::success(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for getting one of the user's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Ok(transaction_id) = Uuid::parse_str(&transaction_id) else {
        return Error::TransactionNotFound.into_response();
    };

    let transaction = lock_connection(&state.db_connection)
        .and_then(|connection| get_transaction(transaction_id, user_id, &connection));

    match transaction {
        Ok(transaction) => ApiResponse::success(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}
