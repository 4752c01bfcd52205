//! The total amount a user has saved.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    app_state::DatabaseState,
    db::lock_connection,
    money::{TransactionType, round_to_cents},
    response::ApiResponse,
    user::UserID,
};

/// The response body of the total savings endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalSavings {
    total_savings: f64,
}

/// Sum the amounts of the saving transactions of `user_id`, rounded to cents.
///
/// The amounts are added as they are, regardless of their currency.
pub fn get_total_savings(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    let total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\" WHERE user_id = ?1 AND type = ?2",
        (user_id.as_uuid(), TransactionType::Saving),
        |row| row.get(0),
    )?;

    Ok(round_to_cents(total))
}

/// A route handler for the user's total savings.
pub async fn get_total_savings_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let total = lock_connection(&state.db_connection)
        .and_then(|connection| get_total_savings(user_id, &connection));

    match total {
        Ok(total_savings) => ApiResponse::success(TotalSavings { total_savings }).into_response(),
        Err(error) => error.into_response(),
    }
}
