//! Category deletion endpoint.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    Error,
    app_state::DatabaseState,
    category::delete_category,
    db::lock_connection,
    response::ApiResponse,
    user::UserID,
};

/// The query string for deleting a category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryQuery {
    /// Only the exact value "true" deletes the category's transactions.
    #[serde(default)]
    pub delete_transactions: Option<String>,
}

/// Handle category deletion.
///
/// Categories with transactions are only deleted when the query contains
/// `deleteTransactions=true`.
pub async fn delete_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Response {
    let Ok(category_id) = Uuid::parse_str(&category_id) else {
        return Error::CategoryNotFound.into_response();
    };

    let delete_transactions = query.delete_transactions.as_deref() == Some("true");

    let result = lock_connection(&state.db_connection).and_then(|connection| {
        delete_category(category_id, user_id, delete_transactions, &connection)
    });

    match result {
        Ok(()) => {
            tracing::info!("Deleted category {category_id}");
            ApiResponse::empty().into_response()
        }
        Err(error) => error.into_response(),
    }
}
